use thiserror::Error;

pub type VeritraceResult<T> = Result<T, VeritraceError>;

#[derive(Error, Debug)]
pub enum VeritraceError {
    #[error("Trace '{trace_id}' is not chronologically ordered at index {index}")]
    UnorderedTrace { trace_id: String, index: usize },

    #[error("Trace '{trace_id}' has no events")]
    EmptyTrace { trace_id: String },

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}
