use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("module tree not found: {0}")]
    TreeNotFound(String),

    #[error("IO error reading {0}: {1}")]
    Io(String, #[source] std::io::Error),

    #[error("failed to parse {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("walking {path}: {source}")]
    Walk {
        path: String,
        #[source]
        source: walkdir::Error,
    },

    #[error("rule shim identifier '{0}' is reserved")]
    ReservedShim(String),
}
