use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodegenError {
    #[error("failed to encode {payload}: {source}")]
    Encode {
        payload: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("duplicate output file: {0}")]
    DuplicateOutput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
