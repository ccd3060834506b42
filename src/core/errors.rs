use thiserror::Error;

#[derive(Error, Debug)]
pub enum CardboxError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("no entry found with id: {0}")]
    NotFound(String),

    #[error("invalid import document: {0}")]
    Format(String),

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
