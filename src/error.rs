use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Invalid month {0}: must be between 1 and 12")]
    InvalidMonth(u32),

    #[error("Invalid reporting window: end {end} is before start {start}")]
    InvalidWindow { start: String, end: String },

    #[error("Invalid window format '{0}': expected 'YYYY-MM' or 'YYYY-MM:YYYY-MM'")]
    WindowParse(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;
