use bp2bzl_ir::{BazelTargets, CodegenMode};
use bp2bzl_model::RuleShim;

use crate::generator::BazelFile;

/// Destination-tree dialect: what surrounds the rendered targets of each
/// BUILD file, and which extra files the tree needs.
pub trait TreeDialect {
    /// Which mode this dialect implements.
    fn mode(&self) -> CodegenMode;

    /// Text placed before the serialized targets of a directory's BUILD file.
    /// May be empty. Only collection-level metadata is consulted.
    fn preamble(&self, targets: &BazelTargets) -> String;

    /// Files the tree needs besides per-directory BUILD files, in a fixed
    /// order. Default: none.
    fn scaffolding(&self, _rule_shims: &[RuleShim]) -> Vec<BazelFile> {
        Vec::new()
    }
}
