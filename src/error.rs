use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RetimeError {
    #[error("timestamp '{timestamp}' is too large to rescale without overflowing")]
    Overflow { timestamp: String },
    #[error("invalid frame rate '{value}': {reason}")]
    InvalidFrameRate { value: String, reason: &'static str },
}

impl RetimeError {
    pub(crate) fn overflow(timestamp: impl Into<String>) -> Self {
        RetimeError::Overflow {
            timestamp: timestamp.into(),
        }
    }
}
