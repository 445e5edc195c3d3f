//! Logging initialization

use std::path::PathBuf;

/// Initialize logging based on debug flag
/// Returns the log file path if debug logging is enabled
///
/// With `--debug` everything down to debug level goes to a temp file so the
/// exported graph on stdout stays clean. Otherwise only warnings reach stderr.
/// `RUST_LOG` overrides the level in both modes.
pub fn init_logging(debug: bool) -> Option<PathBuf> {
    if debug {
        let log_path = tempfile::Builder::new()
            .prefix("azgraph-")
            .suffix(".log")
            .tempfile()
            .and_then(|f| f.keep().map_err(|e| e.error))
            .map(|(_, path)| path)
            .unwrap_or_else(|_| std::env::temp_dir().join(format!("azgraph-{}.log", std::process::id())));

        let file = match std::fs::OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(&log_path)
        {
            Ok(file) => file,
            Err(e) => {
                eprintln!("Could not open log file {}: {}", log_path.display(), e);
                init_stderr("debug");
                return None;
            }
        };

        tracing_subscriber::fmt()
            .with_writer(file)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .with_ansi(false)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .init();

        Some(log_path)
    } else {
        init_stderr("warn");
        None
    }
}

fn init_stderr(default_level: &str) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();
}
