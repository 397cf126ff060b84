/******************************************************************************
    Author: Joaquín Béjar García
    Email: jb@taunais.com
    Date: 8/9/24
 ******************************************************************************/

use crate::constants::{AUTHORIZATION_HEADER_KEY, BEARER_PREFIX};
use crate::error::AppError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use std::str::FromStr;
use tracing::debug;

/// `Bearer <token>`.
pub(crate) fn bearer_value(token: &str) -> String {
    format!("{BEARER_PREFIX}{token}")
}

/// Extracts the token from an `Authorization: Bearer <token>` value.
pub fn bearer_token(value: &str) -> Option<&str> {
    value
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Builds the header map for one attempt of a request.
///
/// The request's own headers are applied first. When `token` is given it is set as the
/// bearer credential, replacing any `Authorization` value the request carried.
///
/// # Errors
///
/// Returns [`AppError::InvalidHeader`] if a name or value is not a legal HTTP header.
pub(crate) fn build_headers(
    headers: &[(String, String)],
    token: Option<&str>,
) -> Result<HeaderMap, AppError> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        map.insert(HeaderName::from_str(name)?, HeaderValue::from_str(value)?);
    }
    if let Some(token) = token {
        let mut value = HeaderValue::from_str(&bearer_value(token))?;
        value.set_sensitive(true);
        map.insert(AUTHORIZATION, value);
    }
    debug!(
        "Prepared {} header(s), bearer attached: {}",
        map.len(),
        map.contains_key(AUTHORIZATION_HEADER_KEY)
    );
    Ok(map)
}
