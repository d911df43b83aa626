pub mod canonical;
pub mod convert;
pub mod filter;
pub mod metrics;
pub mod mode;
pub mod target;

// Re-exports
pub use canonical::{canonicalize_module_type, RuleIdent};
pub use convert::{convert_modules, Conversion};
pub use filter::AttributeFilter;
pub use metrics::CodegenMetrics;
pub use mode::CodegenMode;
pub use target::{AttrValue, BazelTarget, BazelTargets, TargetKind};
