//! Error types for the admin API client.

use thiserror::Error;

/// Errors that can occur when calling the shop server.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (network/transport).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The envelope came back with `success: false`.
    #[error("API error: {message}")]
    Api {
        /// Server-supplied message.
        message: String,
    },

    /// Non-success status with a raw text body (the product save contract).
    #[error("HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// Failed to parse a response body.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ApiError {
    /// The message to surface to the user.
    ///
    /// Application-level failures carry the server's message verbatim;
    /// transport and parse failures collapse to the generic network toast.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message } => message.clone(),
            Self::Status { body, .. } if !body.is_empty() => body.clone(),
            Self::Http(_) | Self::Parse(_) | Self::Status { .. } => {
                "Lỗi mạng xảy ra".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_surfaces_server_message() {
        let err = ApiError::Api {
            message: "Sản phẩm không tồn tại".to_string(),
        };
        assert_eq!(err.user_message(), "Sản phẩm không tồn tại");
    }

    #[test]
    fn test_status_error_surfaces_body() {
        let err = ApiError::Status {
            status: 400,
            body: "Tên sản phẩm đã tồn tại".to_string(),
        };
        assert_eq!(err.user_message(), "Tên sản phẩm đã tồn tại");
    }

    #[test]
    fn test_empty_status_body_falls_back_to_network_message() {
        let err = ApiError::Status {
            status: 500,
            body: String::new(),
        };
        assert_eq!(err.user_message(), "Lỗi mạng xảy ra");
    }
}
