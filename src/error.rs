use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("missing parameter: {0}")]
    MissingParameter(&'static str),

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("malformed tick at index {index}: {reason}")]
    MalformedTick { index: usize, reason: String },

    #[error("no cached dataset for {0}")]
    DatasetNotFound(String),
}
