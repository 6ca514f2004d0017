use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlaycrackError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Table Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid Parameters: {0}")]
    InvalidParameters(String),

    #[error("Invalid Key: {0}")]
    InvalidKey(String),

    #[error("Malformed Input: {0}")]
    MalformedInput(String),

    #[error("N-gram length mismatch: expected {expected}, found {found}")]
    NgramLengthMismatch { expected: usize, found: usize },

    #[error("Empty distribution: {0}")]
    EmptyDistribution(&'static str),
}

pub type PfResult<T> = Result<T, PlaycrackError>;
