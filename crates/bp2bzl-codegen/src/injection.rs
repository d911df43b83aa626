use indexmap::IndexMap;
use serde::Serialize;

use bp2bzl_ir::{AttrValue, CodegenMetrics};
use bp2bzl_model::ConfigSnapshot;

use crate::context::EmitContext;
use crate::error::CodegenError;
use crate::generator::{BazelFile, GENERATED_BUILD_FILE_NAME};
use crate::starlark::render_value;

/// Files exposing toolchain constants, product configuration, API levels,
/// and the converted-module listing to the generated tree.
///
/// Any payload that fails to encode aborts the whole set.
pub fn create_injection_files(
    cfg: &ConfigSnapshot,
    metrics: &CodegenMetrics,
) -> Result<Vec<BazelFile>, CodegenError> {
    let mut files = Vec::new();

    // Each toolchain directory needs a BUILD file to be a package.
    for (dir, constants) in [
        ("cc_toolchain", &cfg.cc_toolchain_vars),
        ("java_toolchain", &cfg.java_toolchain_vars),
        ("apex_toolchain", &cfg.apex_toolchain_vars),
    ] {
        files.push(BazelFile::new(dir, GENERATED_BUILD_FILE_NAME, ""));
        files.push(BazelFile::new(dir, "constants.bzl", constants.as_str()));
    }

    files.push(BazelFile::new(
        "metrics",
        "converted_modules.txt",
        metrics.converted_modules_listing(),
    ));

    files.push(BazelFile::new(
        "product_config",
        "soong_config_variables.bzl",
        cfg.soong_config_definitions.as_str(),
    ));
    files.push(BazelFile::new(
        "product_config",
        "arch_configuration.bzl",
        cfg.arch_configurations.as_str(),
    ));

    let api_levels_json = encode_json("api_levels.json", &cfg.api_levels)?;
    files.push(BazelFile::new(
        "api_levels",
        GENERATED_BUILD_FILE_NAME,
        r#"exports_files(["api_levels.json"])"#,
    ));
    files.push(BazelFile::new("api_levels", "api_levels.json", api_levels_json));
    files.push(BazelFile::new(
        "api_levels",
        "api_levels.bzl",
        api_levels_bzl(cfg),
    ));

    Ok(files)
}

/// Encode a structured payload as JSON.
pub fn encode_json<T: Serialize + ?Sized>(
    payload: &'static str,
    value: &T,
) -> Result<String, CodegenError> {
    serde_json::to_string(value).map_err(|source| CodegenError::Encode { payload, source })
}

fn api_levels_bzl(cfg: &ConfigSnapshot) -> String {
    let levels: IndexMap<String, AttrValue> = cfg
        .api_levels
        .iter()
        .map(|(name, level)| (name.clone(), AttrValue::Int(*level)))
        .collect();
    let mut ctx = EmitContext::default();
    format!("api_levels = {}\n", render_value(&AttrValue::Dict(levels), &mut ctx))
}
