//! Resource type wildcard patterns

use super::FilterError;
use std::fmt;
use wildmatch::WildMatchPattern;

type TypeMatcher = WildMatchPattern<'*', '?'>;

/// A compiled, case-insensitive wildcard over resource type strings
///
/// `/` and `.` both separate segments and are interchangeable, so
/// `*.subnets` matches `Microsoft.Network/virtualNetworks/subnets`.
#[derive(Debug, Clone)]
pub struct FilterPattern {
    source: String,
    matcher: TypeMatcher,
}

impl FilterPattern {
    pub fn parse(pattern: &str) -> Result<Self, FilterError> {
        let source = pattern.trim();
        if source.is_empty() {
            return Err(invalid(pattern, "pattern is empty"));
        }
        if let Some(bad) = source
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '/' | '*' | '?' | '-')))
        {
            return Err(invalid(pattern, &format!("unsupported character '{}'", bad)));
        }

        let normalized = unify_separators(source);
        if normalized.contains("..") {
            return Err(invalid(pattern, "empty segment"));
        }

        Ok(Self {
            source: source.to_string(),
            matcher: TypeMatcher::new_case_insensitive(&normalized),
        })
    }

    pub fn matches(&self, resource_type: &str) -> bool {
        self.matcher.matches(&unify_separators(resource_type))
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for FilterPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

fn unify_separators(s: &str) -> String {
    s.replace('/', ".")
}

fn invalid(pattern: &str, reason: &str) -> FilterError {
    FilterError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separators_are_equivalent() {
        let pattern = FilterPattern::parse("*.subnets").unwrap();
        assert!(pattern.matches("Microsoft.Network/virtualNetworks/subnets"));
        assert!(!pattern.matches("Microsoft.Network/virtualNetworks"));

        let slashed = FilterPattern::parse("microsoft.network/*").unwrap();
        assert!(slashed.matches("Microsoft.Network/publicIPAddresses"));
    }

    #[test]
    fn test_single_character_wildcard() {
        let pattern = FilterPattern::parse("Microsoft.Compute/disk?").unwrap();
        assert!(pattern.matches("Microsoft.Compute/disks"));
        assert!(!pattern.matches("Microsoft.Compute/diskss"));
    }

    #[test]
    fn test_rejects_malformed() {
        for bad in ["", "   ", "Microsoft.Network//subnets", "a..b", "a b", "Micro$oft/*"] {
            assert!(
                matches!(FilterPattern::parse(bad), Err(FilterError::InvalidPattern { .. })),
                "{:?} should be rejected",
                bad
            );
        }
    }
}
