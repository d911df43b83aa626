pub mod config;
pub mod error;
pub mod loader;
pub mod module;
pub mod shim;

// Re-exports
pub use config::ConfigSnapshot;
pub use error::LoadError;
pub use loader::{load_tree, LoadedTree};
pub use module::{
    BazelRuleInfo, DepRef, FieldKind, Module, Property, PropertyDescriptor, PropertyValue,
};
pub use shim::{RuleShim, ShimBody};
