use crate::application::models::user::RefreshResponse;
use crate::config::Config;
use crate::constants::REFRESH_ENDPOINT;
use crate::error::{AppError, ErrorBody};
use crate::session::store::SessionStore;
use crate::transport::headers::build_headers;
use crate::transport::request::{ApiRequest, RequestBody};
use crate::transport::response::ApiResponse;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Something that can execute an [`ApiRequest`].
///
/// Services are written against this trait so they can be exercised without a network.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Sends the request and returns the successful response.
    ///
    /// Non-success statuses come back as errors; see [`ApiClient`] for how a `401` is
    /// handled.
    async fn request(&self, request: ApiRequest) -> Result<ApiResponse, AppError>;
}

/// HTTP client for the platform API with bearer attachment and token refresh.
///
/// Each call runs this sequence:
///
/// 1. Attach `Authorization: Bearer <token>` if the session has a token.
/// 2. Send. Anything but a `401` is returned to the caller.
/// 3. On a `401` for a request that has not been retried yet, mark it retried and call
///    `POST /user/refresh`. The refresh credential travels in the cookie jar, not in a
///    header.
///    - Success: store the new token in the session (the user is untouched), resend once
///      with it and return whatever that attempt yields, including another `401`.
///    - Failure: clear the whole session and return [`AppError::SessionExpired`].
/// 4. A `401` for a request already retried is returned as [`AppError::Unauthorized`].
///
/// Concurrent calls each run their own sequence; two simultaneous `401`s trigger two
/// refresh calls.
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("session", &self.session)
            .finish()
    }
}

impl fmt::Display for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{\"base_url\":\"{}\"}}", self.base_url)
    }
}

impl ApiClient {
    /// Creates a new client.
    ///
    /// # Arguments
    ///
    /// * `config` - Supplies the base URL and the request timeout.
    /// * `session` - Store the client reads the token from and writes refreshes to.
    ///
    /// # Returns
    ///
    /// A Result containing the ApiClient instance or an error.
    pub fn new(config: &Config, session: Arc<SessionStore>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(config.rest_api.timeout))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: config.rest_api.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn build(&self, request: &ApiRequest, token: Option<&str>) -> Result<RequestBuilder, AppError> {
        let url = self.url(request.path());
        let mut builder = self
            .client
            .request(request.method().clone(), &url)
            .headers(build_headers(request.headers(), token)?);
        if !request.query_pairs().is_empty() {
            builder = builder.query(request.query_pairs());
        }
        builder = match request.body() {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(parts) => builder.multipart(RequestBody::to_form(parts)?),
        };
        Ok(builder)
    }

    async fn send(&self, request: &ApiRequest, token: Option<&str>) -> Result<Response, AppError> {
        debug!(
            "Sending {} request to {} (attempt {})",
            request.method(),
            request.path(),
            request.retries() + 1
        );
        match self.build(request, token)?.send().await {
            Ok(response) => Ok(response),
            Err(e) => {
                error!("Failed to send {} {}: {}", request.method(), request.path(), e);
                Err(AppError::Network(e))
            }
        }
    }

    async fn read_body(response: Response) -> Result<(StatusCode, HeaderMap, Vec<u8>), AppError> {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();
        debug!("Response Status: {}", status);
        Ok((status, headers, body))
    }

    /// Turns a non-`401` response into the caller's result.
    async fn finish(response: Response) -> Result<ApiResponse, AppError> {
        let (status, headers, body) = Self::read_body(response).await?;
        if status.is_success() {
            Ok(ApiResponse::with_headers(status, headers, body))
        } else {
            warn!("API request failed. Status: {}", status);
            Err(AppError::Api {
                status,
                body: ErrorBody::from_bytes(&body),
            })
        }
    }

    /// Asks the backend for a new access token using the refresh cookie.
    ///
    /// Does not touch the session; callers decide what to do with the outcome.
    #[instrument(skip(self))]
    pub async fn refresh_access_token(&self) -> Result<String, AppError> {
        let response = self
            .client
            .post(self.url(REFRESH_ENDPOINT))
            .json(&serde_json::json!({}))
            .send()
            .await?;
        let (status, _, body) = Self::read_body(response).await?;
        if !status.is_success() {
            info!("Token refresh rejected with status {}", status);
            return Err(AppError::Api {
                status,
                body: ErrorBody::from_bytes(&body),
            });
        }
        let refreshed: RefreshResponse = serde_json::from_slice(&body)?;
        if refreshed.access_token.is_empty() {
            return Err(AppError::InvalidResponse(
                "refresh returned an empty access token".to_string(),
            ));
        }
        debug!("Token refresh succeeded");
        Ok(refreshed.access_token)
    }
}

#[async_trait]
impl HttpClient for ApiClient {
    #[instrument(skip(self, request), fields(method = %request.method(), path = %request.path(), request_id = %Uuid::new_v4()))]
    async fn request(&self, request: ApiRequest) -> Result<ApiResponse, AppError> {
        let mut request = request;
        // An explicit Authorization header on the first attempt wins over the session.
        let mut token = if request.has_authorization() {
            None
        } else {
            self.session.token()
        };

        loop {
            let response = self.send(&request, token.as_deref()).await?;
            if response.status() != StatusCode::UNAUTHORIZED {
                return Self::finish(response).await;
            }

            let (_, _, body) = Self::read_body(response).await?;
            if request.is_retry() || !request.is_refreshable() {
                warn!("Request {} is unauthorized, not refreshing", request);
                return Err(AppError::Unauthorized(ErrorBody::from_bytes(&body)));
            }

            request = request.retried();
            info!("Access token rejected, refreshing");
            match self.refresh_access_token().await {
                Ok(new_token) => {
                    self.session.set_token(new_token.clone());
                    token = Some(new_token);
                }
                Err(e) => {
                    warn!("Token refresh failed, clearing session: {}", e);
                    self.session.clear();
                    return Err(AppError::SessionExpired(Box::new(e)));
                }
            }
        }
    }
}
