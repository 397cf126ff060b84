/******************************************************************************
    Author: Joaquín Béjar García
    Email: jb@taunais.com
    Date: 8/9/24
 ******************************************************************************/
use crate::error::AppError;
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::Serialize;
use std::fmt;

/// One file of a `multipart/form-data` upload.
///
/// Kept as owned bytes so the form can be rebuilt when a request is resent.
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    /// Form field the backend reads the file from (`avatar`, `picture`, `file`).
    pub field: String,
    pub file_name: String,
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

impl FilePart {
    pub fn new(field: &str, file_name: &str, bytes: Vec<u8>) -> Self {
        Self {
            field: field.to_string(),
            file_name: file_name.to_string(),
            mime: None,
            bytes,
        }
    }

    pub fn with_mime(mut self, mime: &str) -> Self {
        self.mime = Some(mime.to_string());
        self
    }

    fn to_part(&self) -> Result<Part, AppError> {
        let part = Part::bytes(self.bytes.clone()).file_name(self.file_name.clone());
        match &self.mime {
            Some(mime) => part.mime_str(mime).map_err(AppError::from),
            None => Ok(part),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    Multipart(Vec<FilePart>),
}

impl RequestBody {
    pub(crate) fn to_form(parts: &[FilePart]) -> Result<Form, AppError> {
        parts.iter().try_fold(Form::new(), |form, file| {
            Ok(form.part(file.field.clone(), file.to_part()?))
        })
    }
}

/// Immutable description of an outbound call.
///
/// `retries` counts refresh-and-resend cycles already spent on this call. It only ever
/// grows, through [`ApiRequest::retried`], which hands back a new value.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    body: RequestBody,
    retries: u8,
    refreshable: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            query: Vec::new(),
            headers: Vec::new(),
            body: RequestBody::Empty,
            retries: 0,
            refreshable: true,
        }
    }

    pub fn get(path: &str) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: &str) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: &str) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: &str) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, AppError> {
        self.body = RequestBody::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn multipart(mut self, parts: Vec<FilePart>) -> Self {
        self.body = RequestBody::Multipart(parts);
        self
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn queries(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    pub fn header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    /// Sends `token` instead of the session token on the first attempt.
    pub fn bearer(self, token: &str) -> Self {
        let value = super::headers::bearer_value(token);
        self.header(crate::constants::AUTHORIZATION_HEADER_KEY, &value)
    }

    /// Opts out of the refresh cycle: a `401` is returned to the caller as is.
    ///
    /// Used for the credential endpoints themselves, where a `401` means wrong
    /// credentials rather than an expired token.
    pub fn without_refresh(mut self) -> Self {
        self.refreshable = false;
        self
    }

    /// The same request with the retry marker set.
    pub fn retried(mut self) -> Self {
        self.retries = self.retries.saturating_add(1);
        self
    }

    pub fn is_retry(&self) -> bool {
        self.retries > 0
    }

    pub fn retries(&self) -> u8 {
        self.retries
    }

    pub fn is_refreshable(&self) -> bool {
        self.refreshable
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    pub fn has_authorization(&self) -> bool {
        self.headers
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case(crate::constants::AUTHORIZATION_HEADER_KEY))
    }
}

impl fmt::Display for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"method\":\"{}\",\"path\":\"{}\",\"retries\":{}}}",
            self.method, self.path, self.retries
        )
    }
}

#[cfg(test)]
mod tests_api_request {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_builder() {
        let request = ApiRequest::post("/org/create")
            .json(&json!({"name": "Roga"}))
            .unwrap()
            .query("ban", true)
            .header("X-Trace", "abc");

        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.path(), "/org/create");
        assert_eq!(
            request.query_pairs(),
            &[("ban".to_string(), "true".to_string())]
        );
        assert_eq!(request.body(), &RequestBody::Json(json!({"name": "Roga"})));
        assert!(!request.has_authorization());
        assert!(request.is_refreshable());
    }

    #[test]
    fn test_retry_marker_is_sticky() {
        let request = ApiRequest::get("/org/my");
        assert!(!request.is_retry());

        let retried = request.clone().retried();
        assert!(retried.is_retry());
        assert_eq!(retried.retries(), 1);
        assert!(retried.clone().retried().is_retry());

        assert!(!request.is_retry());
    }

    #[test]
    fn test_explicit_bearer() {
        let request = ApiRequest::get("/user/7").bearer("T1");
        assert!(request.has_authorization());
        assert_eq!(
            request.headers(),
            &[("Authorization".to_string(), "Bearer T1".to_string())]
        );
    }

    #[test]
    fn test_form_from_parts() {
        let parts = vec![
            FilePart::new("avatar", "me.png", vec![1, 2, 3]).with_mime("image/png"),
        ];
        assert!(RequestBody::to_form(&parts).is_ok());

        let bad = vec![FilePart::new("avatar", "me.png", vec![]).with_mime("not a mime")];
        assert!(RequestBody::to_form(&bad).is_err());
    }

    #[test]
    fn test_display() {
        let request = ApiRequest::delete("/comments/delete/3").retried();
        assert_eq!(
            request.to_string(),
            r#"{"method":"DELETE","path":"/comments/delete/3","retries":1}"#
        );
    }
}
