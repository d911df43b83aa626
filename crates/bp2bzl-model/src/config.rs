use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// File name of the configuration snapshot at the root of a dumped tree.
pub const CONFIG_FILE_NAME: &str = "bp2bzl.config.json";

/// Read-only configuration snapshot for one conversion run.
///
/// The toolchain and product-config fields hold pre-rendered Starlark text
/// produced outside the converter; they are passed through to the
/// soong-injection files verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigSnapshot {
    /// `cc_toolchain/constants.bzl` contents
    pub cc_toolchain_vars: String,
    /// `java_toolchain/constants.bzl` contents
    pub java_toolchain_vars: String,
    /// `apex_toolchain/constants.bzl` contents
    pub apex_toolchain_vars: String,
    /// `product_config/soong_config_variables.bzl` contents
    pub soong_config_definitions: String,
    /// `product_config/arch_configuration.bzl` contents
    pub arch_configurations: String,
    /// API level name -> number (e.g., "S" -> 31)
    pub api_levels: BTreeMap<String, i64>,
    /// Directories whose hand-written BUILD file is kept alongside generated
    /// targets. The flag marks the entry as applying to all subdirectories.
    pub keep_existing_build_file: BTreeMap<String, bool>,
}

impl ConfigSnapshot {
    /// Whether `dir` keeps its existing BUILD file, either listed directly or
    /// through an ancestor flagged as recursive.
    pub fn keeps_existing_build_file(&self, dir: &str) -> bool {
        if self.keep_existing_build_file.contains_key(dir) {
            return true;
        }
        let mut prefix = dir;
        while let Some(pos) = prefix.rfind('/') {
            prefix = &prefix[..pos];
            if self.keep_existing_build_file.get(prefix) == Some(&true) {
                return true;
            }
        }
        // The tree root applies to everything when flagged recursive.
        !dir.is_empty() && self.keep_existing_build_file.get("") == Some(&true)
    }
}
