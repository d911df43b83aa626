use std::fmt;

/// Which destination tree a conversion run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodegenMode {
    /// Fully generated BUILD files for converted modules, merged with
    /// hand-maintained content where the source tree keeps it.
    Bp2Build,
    /// Mirror of the whole module graph as `soong_module` targets, plus the
    /// rule shims needed to query it.
    QueryView,
}

impl fmt::Display for CodegenMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodegenMode::Bp2Build => f.write_str("bp2build"),
            CodegenMode::QueryView => f.write_str("queryview"),
        }
    }
}
