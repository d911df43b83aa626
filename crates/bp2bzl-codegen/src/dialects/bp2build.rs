use bp2bzl_ir::{BazelTargets, CodegenMode};

use crate::dialects::DEFAULT_VISIBILITY_PUBLIC;
use crate::starlark::load_statements;
use crate::traits::TreeDialect;

/// Advisory header at the top of every generated BUILD file.
pub const GENERATED_FILE_HEADER: &str = "# READ THIS FIRST:\n\
# This file was automatically generated by bp2bzl.\n\
# Feel free to edit or test it, but do *not* check it into your version control system.";

/// Replaces the default visibility in files that also carry hand-maintained
/// targets; the checked-in BUILD file owns `package()` there.
pub const MIXED_CONTENT_NOTICE: &str = "# This file contains generated targets and handcrafted \
targets that are manually managed in the source tree.";

/// Fully generated tree, merged with hand-maintained content where kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bp2BuildDialect;

impl TreeDialect for Bp2BuildDialect {
    fn mode(&self) -> CodegenMode {
        CodegenMode::Bp2Build
    }

    fn preamble(&self, targets: &BazelTargets) -> String {
        let mut lines = vec![GENERATED_FILE_HEADER.to_string()];
        if targets.has_handcrafted_targets() {
            lines.push(MIXED_CONTENT_NOTICE.to_string());
        } else {
            lines.push(DEFAULT_VISIBILITY_PUBLIC.to_string());
        }
        let loads = load_statements(targets);
        if !loads.is_empty() {
            lines.push(loads);
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bp2bzl_ir::BazelTarget;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fully_generated_preamble() {
        let targets: BazelTargets = vec![BazelTarget::generated("a", "cc_library")
            .with_load_location(Some("//build/bazel/rules/cc:defs.bzl".into()))]
        .into_iter()
        .collect();

        assert_eq!(
            Bp2BuildDialect.preamble(&targets),
            format!(
                "{}\n{}\nload(\"//build/bazel/rules/cc:defs.bzl\", \"cc_library\")",
                GENERATED_FILE_HEADER, DEFAULT_VISIBILITY_PUBLIC
            )
        );
    }

    #[test]
    fn test_handcrafted_preamble_has_no_visibility() {
        let mut targets = BazelTargets::new();
        targets.push(BazelTarget::generated("a", "filegroup"));
        targets.push(BazelTarget::handcrafted("# kept"));

        let preamble = Bp2BuildDialect.preamble(&targets);
        assert!(!preamble.contains("default_visibility"));
        assert_eq!(
            preamble,
            format!("{}\n{}", GENERATED_FILE_HEADER, MIXED_CONTENT_NOTICE)
        );
    }

    #[test]
    fn test_empty_collection_still_gets_visibility() {
        let preamble = Bp2BuildDialect.preamble(&BazelTargets::new());
        assert!(preamble.ends_with(DEFAULT_VISIBILITY_PUBLIC));
    }
}
