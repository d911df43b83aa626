pub mod aggregate;
pub mod context;
pub mod error;
pub mod generator;
pub mod injection;
pub mod starlark;
pub mod traits;

// Destination dialects
pub mod dialects;

// Re-exports
pub use context::EmitContext;
pub use error::CodegenError;
pub use generator::{
    create_bazel_files, BazelFile, BuildFileGenerator, GeneratedTree, GENERATED_BUILD_FILE_NAME,
    WORKSPACE_FILE_NAME,
};
pub use injection::create_injection_files;
pub use traits::TreeDialect;
