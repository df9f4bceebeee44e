use serde::{Deserialize, Serialize};

/// Error body returned by the remote authority on non-success responses.
///
/// Every field is optional: the authority may send only `message`, a full
/// `{status, error, message}` triple, or nothing decodable at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiError {
    /// Most specific human readable text in the body, if any.
    pub fn describe(&self) -> Option<&str> {
        [self.message.as_deref(), self.error.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|text| !text.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_message_over_error_label() {
        let body: ApiError = serde_json::from_str(
            r#"{"status":400,"error":"Bad Request","message":"Board size must be positive."}"#,
        )
        .expect("decode");
        assert_eq!(body.describe(), Some("Board size must be positive."));
    }

    #[test]
    fn falls_back_to_error_label_when_message_blank() {
        let body: ApiError =
            serde_json::from_str(r#"{"error":"Internal Server Error","message":" "}"#)
                .expect("decode");
        assert_eq!(body.describe(), Some("Internal Server Error"));
        assert_eq!(ApiError::default().describe(), None);
    }
}
