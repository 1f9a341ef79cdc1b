//! Success envelope returned by business handlers.
//!
//! Failures are rendered by [`AppError`](crate::AppError) with the same
//! `success`/`message` keys, so clients can branch on `success` alone.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

impl Envelope<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_only_skips_data() {
        let body = serde_json::to_value(Envelope::message("Deleted")).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Deleted");
        assert!(body.get("data").is_none());
    }

    #[test]
    fn test_data_only_skips_message() {
        let body = serde_json::to_value(Envelope::data(vec![1, 2, 3])).unwrap();
        assert_eq!(body["data"], serde_json::json!([1, 2, 3]));
        assert!(body.get("message").is_none());
    }
}
