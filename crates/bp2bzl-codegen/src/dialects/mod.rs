pub mod bp2build;
pub mod queryview;

use bp2bzl_ir::CodegenMode;

use crate::traits::TreeDialect;

/// `package()` declaration making every target in a file public.
pub const DEFAULT_VISIBILITY_PUBLIC: &str =
    "package(default_visibility = [\"//visibility:public\"])";

/// Create the dialect for the given mode.
pub fn create_dialect(mode: CodegenMode) -> Box<dyn TreeDialect> {
    match mode {
        CodegenMode::Bp2Build => Box::new(bp2build::Bp2BuildDialect),
        CodegenMode::QueryView => Box::new(queryview::QueryViewDialect),
    }
}
