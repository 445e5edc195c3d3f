//! Resource model layer
//!
//! Structure:
//! - `resource.rs` - Raw and normalized resource records
//! - `resource_kind.rs` - Typed enum of the Azure resource types with dedicated handling
//! - `resource_id.rs` - ARM id parsing helpers

pub mod resource;
pub mod resource_id;
pub mod resource_kind;

pub use resource::{PowerState, RawResource, Resource};
pub use resource_kind::{ComputeTier, ResourceCategory, ResourceKind, category_of};
