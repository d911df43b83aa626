use std::fmt;

/// Suffix that makes a destination rule test-only and taints every dependent.
pub const TEST_RULE_SUFFIX: &str = "_test";

/// Appended to module types that would otherwise end in [`TEST_RULE_SUFFIX`].
pub const RULE_SUFFIX_MARKER: char = '_';

/// Rewrite a module-type identifier so it never ends in `_test`.
///
/// `foo_test` becomes `foo_test_`; everything else passes through. Must be
/// applied once per identifier, at module-type resolution. Callers should go
/// through [`RuleIdent`], which can only be built from a raw module type.
pub fn canonicalize_module_type(module_type: &str) -> String {
    let mut ident = module_type.to_string();
    if module_type.ends_with(TEST_RULE_SUFFIX) {
        ident.push(RULE_SUFFIX_MARKER);
    }
    ident
}

/// A module type resolved to a destination-safe rule identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleIdent(String);

impl RuleIdent {
    /// Resolve a raw module-type identifier.
    pub fn from_module_type(module_type: &str) -> Self {
        Self(canonicalize_module_type(module_type))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
