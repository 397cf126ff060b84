/******************************************************************************
    Author: Joaquín Béjar García
    Email: jb@taunais.com
    Date: 12/5/25
 ******************************************************************************/
use reqwest::StatusCode;
use std::fmt::{Display, Formatter};
use std::{fmt, io};

/// Body of a failed response.
///
/// The backend answers errors either with a bare string (`http.Error`) or with a JSON
/// document, and callers have to cope with both.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorBody {
    Empty,
    Text(String),
    Json(serde_json::Value),
}

impl ErrorBody {
    /// Classifies a raw response body.
    ///
    /// A JSON string literal is unwrapped to its text, any other JSON value is kept
    /// structured, and anything that is not JSON is treated as text. Trailing whitespace
    /// (the newline `http.Error` appends) is dropped from text bodies.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim_end();
        if trimmed.trim_start().is_empty() {
            return ErrorBody::Empty;
        }
        match serde_json::from_str::<serde_json::Value>(trimmed) {
            Ok(serde_json::Value::Null) => ErrorBody::Empty,
            Ok(serde_json::Value::String(text)) => ErrorBody::Text(text),
            Ok(value) => ErrorBody::Json(value),
            Err(_) => ErrorBody::Text(trimmed.to_string()),
        }
    }

    pub fn from_bytes(raw: &[u8]) -> Self {
        Self::parse(&String::from_utf8_lossy(raw))
    }
}

impl Display for ErrorBody {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ErrorBody::Empty => write!(f, ""),
            ErrorBody::Text(text) => write!(f, "{text}"),
            ErrorBody::Json(value) => write!(f, "{value}"),
        }
    }
}

#[derive(Debug)]
pub enum AppError {
    /// Transport failure: connect, DNS, timeout, body read.
    Network(reqwest::Error),
    Io(io::Error),
    Json(serde_json::Error),
    InvalidHeader(String),
    /// A `401` that arrived after the single refresh-and-resend was already spent.
    Unauthorized(ErrorBody),
    /// The refresh call failed; the session has been cleared.
    SessionExpired(Box<AppError>),
    /// Any other non-success status, passed through verbatim.
    Api { status: StatusCode, body: ErrorBody },
    /// The operation needs a logged-in user and the session has none.
    NotAuthenticated,
    InvalidResponse(String),
}

impl AppError {
    /// HTTP status the error originated from, when there was a response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            AppError::Unauthorized(_) => Some(StatusCode::UNAUTHORIZED),
            AppError::Api { status, .. } => Some(*status),
            AppError::Network(e) => e.status(),
            AppError::SessionExpired(inner) => inner.status(),
            _ => None,
        }
    }

    /// Response body carried by the error, if the server sent one.
    pub fn body(&self) -> Option<&ErrorBody> {
        match self {
            AppError::Unauthorized(body) => Some(body),
            AppError::Api { body, .. } => Some(body),
            AppError::SessionExpired(inner) => inner.body(),
            _ => None,
        }
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, AppError::SessionExpired(_))
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Network(e) => write!(f, "network error: {e}"),
            AppError::Io(e) => write!(f, "io error: {e}"),
            AppError::Json(e) => write!(f, "json error: {e}"),
            AppError::InvalidHeader(s) => write!(f, "invalid header: {s}"),
            AppError::Unauthorized(body) => write!(f, "unauthorized: {body}"),
            AppError::SessionExpired(e) => write!(f, "session expired: {e}"),
            AppError::Api { status, body } => write!(f, "api error {status}: {body}"),
            AppError::NotAuthenticated => write!(f, "not authenticated"),
            AppError::InvalidResponse(s) => write!(f, "invalid response: {s}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Network(e) => Some(e),
            AppError::Io(e) => Some(e),
            AppError::Json(e) => Some(e),
            AppError::SessionExpired(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Network(e)
    }
}
impl From<io::Error> for AppError {
    fn from(e: io::Error) -> Self {
        AppError::Io(e)
    }
}
impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Json(e)
    }
}
impl From<reqwest::header::InvalidHeaderValue> for AppError {
    fn from(e: reqwest::header::InvalidHeaderValue) -> Self {
        AppError::InvalidHeader(e.to_string())
    }
}
impl From<reqwest::header::InvalidHeaderName> for AppError {
    fn from(e: reqwest::header::InvalidHeaderName) -> Self {
        AppError::InvalidHeader(e.to_string())
    }
}
