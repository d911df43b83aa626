use std::path::PathBuf;

use bp2bzl_ir::filter::IGNORED_PROPERTY_NAMES;
use bp2bzl_ir::{convert_modules, AttrValue, CodegenMode};
use bp2bzl_model::LoadedTree;

fn load_fixture(fixture: &str) -> LoadedTree {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("fixtures")
        .join(fixture);
    bp2bzl_model::load_tree(&path)
        .unwrap_or_else(|e| panic!("Failed to load fixture '{}': {}", fixture, e))
}

#[test]
fn test_no_target_carries_blocklisted_attributes() {
    let tree = load_fixture("sample-tree");
    for mode in [CodegenMode::Bp2Build, CodegenMode::QueryView] {
        let conversion = convert_modules(&tree.modules, &tree.handcrafted, mode);
        for targets in conversion.build_to_targets.values() {
            for target in targets {
                for name in target.attr_names() {
                    assert!(
                        !IGNORED_PROPERTY_NAMES.contains(&name),
                        "{} ({}) carries blocklisted attribute '{}'",
                        target.name,
                        mode,
                        name
                    );
                }
            }
        }
    }
}

#[test]
fn test_bp2build_metrics_from_fixture() {
    let tree = load_fixture("sample-tree");
    let conversion = convert_modules(&tree.modules, &tree.handcrafted, CodegenMode::Bp2Build);
    let metrics = &conversion.metrics;

    assert_eq!(
        metrics.converted_modules,
        vec!["framework-minus-apex", "framework-srcs", "libc", "libz"]
    );
    assert_eq!(metrics.unconverted_module_count, 2);
    assert_eq!(metrics.handcrafted_target_count, 1);
    assert_eq!(metrics.rule_class_count["cc_library_static"], 2);
}

#[test]
fn test_queryview_types_resolved_once() {
    let tree = load_fixture("sample-tree");
    let conversion = convert_modules(&tree.modules, &tree.handcrafted, CodegenMode::QueryView);
    let libc = &conversion.build_to_targets["bionic/libc"];

    let types: Vec<_> = libc
        .sorted()
        .iter()
        .filter_map(|t| match t.attr("soong_module_type") {
            Some(AttrValue::String(s)) => Some(s.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(
        types,
        vec![
            "cc_library_static",
            "cc_library_static",
            "cc_library_headers_tests",
            "cc_test_",
        ]
    );
}
