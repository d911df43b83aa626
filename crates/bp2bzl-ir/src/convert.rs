use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use indexmap::map::Entry;
use indexmap::IndexMap;
use tracing::debug;

use bp2bzl_model::{FieldKind, Module, Property, PropertyValue};

use crate::canonical::RuleIdent;
use crate::filter::AttributeFilter;
use crate::metrics::CodegenMetrics;
use crate::mode::CodegenMode;
use crate::target::{AttrValue, BazelTarget, BazelTargets};

/// Rule class every module becomes in the query-view tree.
pub const SOONG_MODULE_RULE_CLASS: &str = "soong_module";

/// Result of converting a module graph: targets keyed by output directory.
#[derive(Debug, Clone, Default)]
pub struct Conversion {
    /// Output directory -> targets. Iteration order is unspecified.
    pub build_to_targets: HashMap<String, BazelTargets>,
    pub metrics: CodegenMetrics,
}

/// Convert all modules for the given mode.
///
/// `handcrafted` maps a directory to its hand-written BUILD content; it only
/// applies to [`CodegenMode::Bp2Build`].
pub fn convert_modules(
    modules: &[Module],
    handcrafted: &BTreeMap<String, String>,
    mode: CodegenMode,
) -> Conversion {
    let filter = AttributeFilter;
    let mut conversion = Conversion::default();
    let mut seen: HashSet<(&str, &str)> = HashSet::new();

    for module in modules {
        let target = match mode {
            CodegenMode::Bp2Build => {
                let Some(rule) = &module.bazel_rule else {
                    debug!(module = %module.name, module_type = %module.module_type, "no bp2build conversion");
                    conversion.metrics.record_unconverted();
                    continue;
                };
                if !seen.insert((module.dir.as_str(), module.name.as_str())) {
                    debug!(module = %module.name, variant = %module.variant, "variant already converted");
                    continue;
                }
                BazelTarget::generated(&module.name, &rule.rule_class)
                    .with_load_location(rule.load_location.clone())
                    .with_attrs(extract_attributes(&module.properties, &filter))
            }
            CodegenMode::QueryView => soong_module_target(module, &filter),
        };

        conversion
            .metrics
            .record_converted(&module.name, &target.rule_class);
        conversion
            .build_to_targets
            .entry(module.dir.clone())
            .or_default()
            .push(target);
    }

    if mode == CodegenMode::Bp2Build {
        for (dir, content) in handcrafted {
            conversion
                .build_to_targets
                .entry(dir.clone())
                .or_default()
                .push(BazelTarget::handcrafted(content));
            conversion.metrics.record_handcrafted();
        }
    }

    conversion.metrics.finish();
    conversion
}

/// Query-view target name: `name--variant`, or just `name` without a variant.
pub fn target_name_with_variant(name: &str, variant: &str) -> String {
    if variant.is_empty() {
        name.to_string()
    } else {
        format!("{}--{}", name, variant)
    }
}

fn soong_module_target(module: &Module, filter: &AttributeFilter) -> BazelTarget {
    let module_type = RuleIdent::from_module_type(&module.module_type);

    let deps: BTreeSet<String> = module
        .deps
        .iter()
        .map(|dep| {
            format!(
                "//{}:{}",
                dep.dir,
                target_name_with_variant(&dep.name, &dep.variant)
            )
        })
        .collect();

    BazelTarget::generated(
        target_name_with_variant(&module.name, &module.variant),
        SOONG_MODULE_RULE_CLASS,
    )
    .with_fixed_attr("soong_module_name", AttrValue::string(&module.name))
    .with_fixed_attr("soong_module_type", AttrValue::string(module_type.as_str()))
    .with_fixed_attr("soong_module_variant", AttrValue::string(&module.variant))
    .with_fixed_attr("soong_module_deps", AttrValue::strings(deps))
    .with_attrs(extract_attributes(&module.properties, filter))
}

/// Turn a module's property tree into target attributes.
///
/// Embedded struct fields are promoted into the enclosing level. Empty
/// strings, empty lists, and structs with no surviving fields are dropped.
pub fn extract_attributes(
    properties: &[Property],
    filter: &AttributeFilter,
) -> IndexMap<String, AttrValue> {
    let mut attrs = IndexMap::new();
    collect_fields(properties, filter, true, &mut attrs);
    attrs
}

fn collect_fields(
    properties: &[Property],
    filter: &AttributeFilter,
    top_level: bool,
    out: &mut IndexMap<String, AttrValue>,
) {
    let mut embedded = Vec::new();
    for prop in properties {
        let admitted = if top_level {
            filter.admits(&prop.descriptor)
        } else {
            filter.admits_nested(&prop.descriptor)
        };
        if !admitted {
            continue;
        }

        if let (FieldKind::Embedded, PropertyValue::Struct { fields }) =
            (prop.descriptor.kind, &prop.value)
        {
            embedded.push(fields.as_slice());
            continue;
        }

        if let Some(value) = convert_value(&prop.value, filter, false) {
            insert_field(out, &prop.descriptor.name, value);
        }
    }

    // Promoted fields never shadow a field declared at this level.
    for fields in embedded {
        collect_fields(fields, filter, top_level, out);
    }
}

fn insert_field(out: &mut IndexMap<String, AttrValue>, name: &str, value: AttrValue) {
    match out.entry(name.to_string()) {
        Entry::Occupied(_) => debug!("embedded field '{}' shadowed by an outer field", name),
        Entry::Vacant(slot) => {
            slot.insert(value);
        }
    }
}

fn convert_value(value: &PropertyValue, filter: &AttributeFilter, in_list: bool) -> Option<AttrValue> {
    match value {
        PropertyValue::Bool(b) => Some(AttrValue::Bool(*b)),
        PropertyValue::Int(i) => Some(AttrValue::Int(*i)),
        // List elements keep their position even when empty.
        PropertyValue::String(s) if s.is_empty() && !in_list => None,
        PropertyValue::String(s) => Some(AttrValue::String(s.clone())),
        PropertyValue::List(items) => {
            let items: Vec<_> = items
                .iter()
                .filter_map(|item| convert_value(item, filter, true))
                .collect();
            (!items.is_empty()).then_some(AttrValue::List(items))
        }
        PropertyValue::Struct { fields } => {
            let mut dict = IndexMap::new();
            collect_fields(fields, filter, false, &mut dict);
            (!dict.is_empty()).then_some(AttrValue::Dict(dict))
        }
    }
}
