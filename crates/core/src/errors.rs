use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeskError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Venue already claimed: {0}")]
    AlreadyClaimed(String),

    #[error("Malformed booking {id}: {reason}")]
    MalformedBooking { id: String, reason: String },

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl DeskError {
    pub fn invalid_transition(from: impl ToString, to: impl ToString) -> Self {
        DeskError::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    pub fn malformed(id: impl Into<String>, reason: impl Into<String>) -> Self {
        DeskError::MalformedBooking {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

pub type DeskResult<T> = Result<T, DeskError>;
