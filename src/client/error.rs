use thiserror::Error;

use crate::client::draft::DraftErrors;

/// Message shown when the server gives no usable error body
pub const GENERIC_FAILURE_MESSAGE: &str = "An unexpected error occurred.";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Permission to access {0} is required!")]
    PermissionDenied(&'static str),

    #[error("Network timeout")]
    Timeout,

    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx reply; `message` is the server's `{message}` when it sent one
    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("File error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Validation(#[from] DraftErrors),

    /// The AI gate rejected the photo; nothing was sent
    #[error("{0}")]
    Blocked(String),

    #[error("Location unavailable: {0}")]
    LocationUnavailable(String),
}

impl ClientError {
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_shown_to_the_user() {
        assert_eq!(ClientError::Timeout.to_string(), "Network timeout");
        assert_eq!(
            ClientError::PermissionDenied("camera").to_string(),
            "Permission to access camera is required!"
        );
        assert_eq!(
            ClientError::Server {
                status: 500,
                message: "Complaint creation failed: upload failed".to_string()
            }
            .to_string(),
            "Complaint creation failed: upload failed"
        );
    }
}
