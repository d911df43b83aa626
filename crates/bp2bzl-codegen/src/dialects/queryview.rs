use bp2bzl_ir::{BazelTargets, CodegenMode};
use bp2bzl_model::RuleShim;

use crate::dialects::DEFAULT_VISIBILITY_PUBLIC;
use crate::generator::{BazelFile, GENERATED_BUILD_FILE_NAME, WORKSPACE_FILE_NAME};
use crate::starlark::quote;
use crate::traits::TreeDialect;

/// Package holding the query-view rule shims and loader.
pub const BAZEL_RULES_SUBDIR: &str = "build/bazel/queryview_rules";

pub const PROVIDERS_BZL_FILE_NAME: &str = "providers.bzl";
pub const SOONG_MODULE_BZL_FILE_NAME: &str = "soong_module.bzl";

/// Scaffolding files emitted besides one `.bzl` per rule shim: the
/// workspace file, the root BUILD file, the rules BUILD file,
/// `providers.bzl`, and `soong_module.bzl`.
pub const NUM_ADDITIONAL_FILES: usize = 5;

/// Provider attached to every query-view target.
pub const PROVIDERS_BZL: &str = r#"SoongModuleInfo = provider(
    fields = {
        "name": "Name of module",
        "type": "Type of module",
        "variant": "Variant of module",
    },
)
"#;

const SOONG_MODULE_BZL_BODY: &str = r#"load("//build/bazel/queryview_rules:providers.bzl", "SoongModuleInfo")

def _generic_soong_module_impl(ctx):
    return [
        SoongModuleInfo(
            name = ctx.attr.soong_module_name,
            type = ctx.attr.soong_module_type,
            variant = ctx.attr.soong_module_variant,
        ),
    ]

generic_soong_module = rule(
    implementation = _generic_soong_module_impl,
    attrs = {
        "soong_module_name": attr.string(mandatory = True),
        "soong_module_type": attr.string(mandatory = True),
        "soong_module_variant": attr.string(),
        "soong_module_deps": attr.label_list(providers = [SoongModuleInfo]),
    },
)

_SUPPORTED_TYPES = ["bool", "int", "string"]

def _is_supported_type(value):
    if type(value) in _SUPPORTED_TYPES:
        return True
    elif type(value) == "list":
        for v in value:
            if type(v) not in _SUPPORTED_TYPES:
                return False
        return True
    return False

# Expands to the shim registered for soong_module_type, or to
# generic_soong_module when the type has none.
def soong_module(name, soong_module_type, **kwargs):
    rule = soong_module_rule_map.get(soong_module_type)

    if rule == None:
        generic_soong_module(
            name = name,
            soong_module_type = soong_module_type,
            soong_module_name = kwargs.pop("soong_module_name", ""),
            soong_module_variant = kwargs.pop("soong_module_variant", ""),
            soong_module_deps = kwargs.pop("soong_module_deps", []),
        )
    else:
        supported_kwargs = dict()
        for key, value in kwargs.items():
            if _is_supported_type(value):
                supported_kwargs[key] = value
        rule(
            name = name,
            **supported_kwargs
        )
"#;

/// Load line every query-view BUILD file starts with.
pub fn soong_module_load() -> String {
    format!(
        "load({}, {})",
        quote(&format!("//{}:{}", BAZEL_RULES_SUBDIR, SOONG_MODULE_BZL_FILE_NAME)),
        quote("soong_module")
    )
}

/// Synthesize `soong_module.bzl`: load every shim's rules, map each rule
/// name to its rule, then the generic `soong_module` macro.
pub fn generate_soong_module_bzl(rule_shims: &[RuleShim]) -> String {
    let mut shims: Vec<&RuleShim> = rule_shims.iter().collect();
    shims.sort_by(|a, b| a.identifier.cmp(&b.identifier));

    let mut loads = String::new();
    let mut rule_map = String::new();
    for shim in shims {
        if shim.rules.is_empty() {
            continue;
        }
        let location = format!("//{}:{}.bzl", BAZEL_RULES_SUBDIR, shim.identifier);
        let symbols: Vec<String> = shim.rules.iter().map(|r| quote(r)).collect();
        loads.push_str(&format!("load({}, {})\n", quote(&location), symbols.join(", ")));
        for rule in &shim.rules {
            rule_map.push_str(&format!("    {}: {},\n", quote(rule), rule));
        }
    }

    let mut out = String::new();
    if !loads.is_empty() {
        out.push_str(&loads);
        out.push('\n');
    }
    out.push_str(SOONG_MODULE_BZL_BODY);
    out.push_str(&format!("\nsoong_module_rule_map = {{\n{}}}\n", rule_map));
    out
}

/// Mirror of the full module graph, with the schemas needed to query it.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryViewDialect;

impl TreeDialect for QueryViewDialect {
    fn mode(&self) -> CodegenMode {
        CodegenMode::QueryView
    }

    fn preamble(&self, _targets: &BazelTargets) -> String {
        format!("{}\n{}", DEFAULT_VISIBILITY_PUBLIC, soong_module_load())
    }

    fn scaffolding(&self, rule_shims: &[RuleShim]) -> Vec<BazelFile> {
        let mut shims: Vec<&RuleShim> = rule_shims.iter().collect();
        shims.sort_by(|a, b| a.identifier.cmp(&b.identifier));

        let mut files = vec![
            BazelFile::new("", WORKSPACE_FILE_NAME, ""),
            // Marks the top-level directory as a package.
            BazelFile::new("", GENERATED_BUILD_FILE_NAME, ""),
            BazelFile::new(BAZEL_RULES_SUBDIR, GENERATED_BUILD_FILE_NAME, ""),
            BazelFile::new(BAZEL_RULES_SUBDIR, PROVIDERS_BZL_FILE_NAME, PROVIDERS_BZL),
        ];
        for shim in shims {
            files.push(BazelFile::new(
                BAZEL_RULES_SUBDIR,
                format!("{}.bzl", shim.identifier),
                shim.content.as_str(),
            ));
        }
        files.push(BazelFile::new(
            BAZEL_RULES_SUBDIR,
            SOONG_MODULE_BZL_FILE_NAME,
            generate_soong_module_bzl(rule_shims),
        ));
        files
    }
}
