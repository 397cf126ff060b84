use crate::constants::DEFAULT_ERROR_MESSAGE;
use crate::error::{AppError, ErrorBody};
use serde::{Deserialize, Serialize};
use std::fmt;

/// User-facing outcome of an operation: `{"isError": bool, "message": string}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub is_error: bool,
    pub message: String,
}

impl Message {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            is_error: true,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            is_error: false,
            message: message.into(),
        }
    }

    /// Normalizes any error into a displayable message.
    ///
    /// A text body becomes the message as is and a JSON body is serialized. Anything
    /// without a response body, transport failures included, becomes `"unknown error"`,
    /// except the local `NotAuthenticated` and `InvalidResponse` errors.
    pub fn from_error(err: &AppError) -> Self {
        let message = match err.body() {
            Some(ErrorBody::Text(text)) => text.clone(),
            Some(ErrorBody::Json(value)) => value.to_string(),
            Some(ErrorBody::Empty) => DEFAULT_ERROR_MESSAGE.to_string(),
            None => match err {
                AppError::NotAuthenticated => err.to_string(),
                AppError::InvalidResponse(s) => s.clone(),
                _ => DEFAULT_ERROR_MESSAGE.to_string(),
            },
        };
        Self::error(message)
    }
}

impl From<&AppError> for Message {
    fn from(err: &AppError) -> Self {
        Message::from_error(err)
    }
}

impl From<AppError> for Message {
    fn from(err: AppError) -> Self {
        Message::from_error(&err)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => write!(f, "{json}"),
            Err(_) => write!(f, "{}", self.message),
        }
    }
}

#[cfg(test)]
mod tests_message {
    use super::*;
    use assert_json_diff::assert_json_eq;
    use pretty_assertions::assert_eq;
    use reqwest::StatusCode;
    use serde_json::json;

    fn api_error(body: &str) -> AppError {
        AppError::Api {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody::parse(body),
        }
    }

    #[test]
    fn test_text_body_is_the_message() {
        let message = Message::from_error(&api_error("Организация не найдена\n"));
        assert_eq!(message, Message::error("Организация не найдена"));
    }

    #[test]
    fn test_json_body_is_serialized() {
        let message = Message::from_error(&api_error(r#"{"error":"insufficient funds"}"#));
        assert!(message.is_error);
        assert_eq!(message.message, r#"{"error":"insufficient funds"}"#);
    }

    #[test]
    fn test_missing_body_falls_back() {
        assert_eq!(Message::from_error(&api_error("")).message, "unknown error");
        assert_eq!(
            Message::from_error(&AppError::NotAuthenticated).message,
            "not authenticated"
        );
    }

    #[tokio::test]
    async fn test_network_error_uses_default_message() {
        let err = match reqwest::Client::new().get("http://127.0.0.1:9/").send().await {
            Err(e) => AppError::from(e),
            Ok(_) => return,
        };
        assert!(matches!(err, AppError::Network(_)));
        assert_eq!(Message::from_error(&err), Message::error("unknown error"));
    }

    #[test]
    fn test_session_expired_uses_refresh_body() {
        let err = AppError::SessionExpired(Box::new(AppError::Api {
            status: StatusCode::UNAUTHORIZED,
            body: ErrorBody::Text("refresh token expired".to_string()),
        }));
        assert_eq!(Message::from(&err).message, "refresh token expired");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        for err in [
            api_error("bad amount"),
            api_error(r#"{"field":"amount","reason":"negative"}"#),
            AppError::Unauthorized(ErrorBody::Empty),
        ] {
            let first = Message::from_error(&err);
            let second = Message::from_error(&err);
            assert_eq!(first.message, second.message);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_wire_shape() {
        let message = Message::success("Проект создан");
        assert_json_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({"isError": false, "message": "Проект создан"})
        );
        assert_json_eq!(
            serde_json::from_str::<serde_json::Value>(&message.to_string()).unwrap(),
            json!({"isError": false, "message": "Проект создан"})
        );
    }
}
