use serde::Deserialize;

/// File name of the optional rule-shim table in a dumped tree.
pub const RULE_SHIMS_FILE_NAME: &str = "rule_shims.json";

/// Identifiers whose `.bzl` names collide with the fixed query-view rule files.
pub const RESERVED_SHIM_IDENTIFIERS: [&str; 2] = ["providers", "soong_module"];

/// A pre-rendered Starlark schema for one group of module types.
///
/// `identifier` names the `.bzl` file the shim is written to; `rules` lists the
/// rule names that file defines, used to synthesize the module loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleShim {
    pub identifier: String,
    pub rules: Vec<String>,
    pub content: String,
}

/// One entry of `rule_shims.json`, keyed by identifier.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ShimBody {
    #[serde(default)]
    pub rules: Vec<String>,
    pub content: String,
}

impl RuleShim {
    pub fn new(
        identifier: impl Into<String>,
        rules: Vec<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            rules,
            content: content.into(),
        }
    }

    pub fn from_body(identifier: impl Into<String>, body: ShimBody) -> Self {
        Self::new(identifier, body.rules, body.content)
    }

    pub fn is_reserved(&self) -> bool {
        RESERVED_SHIM_IDENTIFIERS.contains(&self.identifier.as_str())
    }
}
