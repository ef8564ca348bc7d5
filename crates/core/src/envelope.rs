//! The `{success, message, ...}` JSON wrapper every shop endpoint returns.

use serde::Deserialize;

/// Response envelope with the payload flattened alongside the flags.
///
/// `message` is present on failures and on some successes; the payload
/// struct carries whatever entity fields the endpoint adds
/// (`products`, `customers`, `stats`, cart totals, ...).
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub data: T,
}

impl<T> Envelope<T> {
    /// Convert into the payload, treating `success: false` as an error
    /// carrying the server's message verbatim.
    ///
    /// # Errors
    ///
    /// Returns the server-supplied message, or a generic fallback when the
    /// failure envelope carried none.
    pub fn into_result(self) -> Result<T, String> {
        if self.success {
            Ok(self.data)
        } else {
            Err(self
                .message
                .unwrap_or_else(|| "Yêu cầu không thành công".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct CountPayload {
        cart_count: i64,
    }

    #[test]
    fn test_success_envelope_yields_payload() {
        let envelope: Envelope<CountPayload> =
            serde_json::from_str(r#"{"success": true, "message": "OK", "cart_count": 3}"#)
                .expect("deserialize");
        let payload = envelope.into_result().expect("success");
        assert_eq!(payload.cart_count, 3);
    }

    #[test]
    fn test_failure_envelope_surfaces_message() {
        let envelope: Envelope<serde_json::Value> =
            serde_json::from_str(r#"{"success": false, "message": "Sản phẩm không tồn tại"}"#)
                .expect("deserialize");
        let err = envelope.into_result().expect_err("failure");
        assert_eq!(err, "Sản phẩm không tồn tại");
    }

    #[test]
    fn test_failure_without_message_gets_fallback() {
        let envelope: Envelope<serde_json::Value> =
            serde_json::from_str(r#"{"success": false}"#).expect("deserialize");
        let err = envelope.into_result().expect_err("failure");
        assert!(!err.is_empty());
    }
}
