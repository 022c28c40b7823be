use thiserror::Error;

/// Errors surfaced at the run boundary. Everything downstream of a parsed
/// input document is non-fatal: unrecognized constructs degrade to
/// diagnostic placeholder lines instead of erroring.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed input document: {0}")]
    MalformedInput(#[from] serde_json::Error),
}
