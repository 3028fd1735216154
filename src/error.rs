use thiserror::Error;

#[derive(Error, Debug)]
pub enum MomoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed {category} message: no {field} found")]
    MalformedMessage {
        category: &'static str,
        field: &'static str,
    },

    #[error("Cannot read source document: {0}")]
    UnreadableSource(String),

    #[error("Cannot write records: {0}")]
    UnwritableDestination(String),

    #[error("No record with id {0}")]
    NotFound(u64),

    #[error("No records to benchmark")]
    EmptyDataset,

    #[error("Unknown transaction type: {0}")]
    UnknownType(String),

    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, MomoError>;
