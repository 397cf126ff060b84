use crate::application::models::user::{LoginResponse, RegisterRequest, User};
use crate::constants::{LOGIN_ENDPOINT, LOGOUT_ENDPOINT, REGISTER_ENDPOINT};
use crate::error::AppError;
use crate::session::store::SessionStore;
use crate::transport::http_client::HttpClient;
use crate::transport::request::ApiRequest;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Credential flows that start and end a [`crate::session::store::Session`].
///
/// Login and registration are sent with [`ApiRequest::without_refresh`]: a `401` there
/// means wrong credentials and is returned to the caller as is.
pub struct AuthService<T: HttpClient> {
    client: Arc<T>,
    session: Arc<SessionStore>,
}

impl<T: HttpClient> AuthService<T> {
    pub fn new(client: Arc<T>, session: Arc<SessionStore>) -> Self {
        Self { client, session }
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Logs in and loads the user profile.
    ///
    /// The profile is fetched with the freshly issued token attached explicitly, since the
    /// session has not been populated yet. On success the session holds both.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AppError> {
        debug!("Logging in {}", email);
        let response = self
            .client
            .request(
                ApiRequest::post(LOGIN_ENDPOINT)
                    .json(&LoginRequest { email, password })?
                    .without_refresh(),
            )
            .await?;
        let login: LoginResponse = response.json()?;
        if login.access_token.is_empty() {
            return Err(AppError::InvalidResponse(
                "login returned an empty access token".to_string(),
            ));
        }

        let user: User = self
            .client
            .request(ApiRequest::get(&format!("/user/{}", login.user_id)).bearer(&login.access_token))
            .await?
            .json()?;
        let user = user.with_default_avatar();

        self.session.login(user.clone(), login.access_token);
        info!("Logged in as user {}", user.id);
        Ok(user)
    }

    /// Creates the account, then logs in with the same credentials.
    #[instrument(skip(self, payload), fields(email = %payload.email))]
    pub async fn register(&self, payload: &RegisterRequest) -> Result<User, AppError> {
        self.client
            .request(
                ApiRequest::post(REGISTER_ENDPOINT)
                    .json(payload)?
                    .without_refresh(),
            )
            .await?;
        info!("Account created for {}", payload.email);
        self.login(&payload.email, &payload.password).await
    }

    /// Revokes the refresh cookie server side and clears the session.
    ///
    /// The server call is best effort: the local session is cleared whatever it returns.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        if let Err(e) = self
            .client
            .request(ApiRequest::post(LOGOUT_ENDPOINT).without_refresh())
            .await
        {
            warn!("Logout request failed: {}", e);
        }
        self.session.clear();
    }
}

#[cfg(test)]
mod tests_auth_service {
    use super::*;
    use crate::config::Config;
    use crate::session::store::Session;
    use crate::transport::http_client::{ApiClient, MockHttpClient};
    use crate::transport::response::ApiResponse;
    use crate::utils::logger::setup_logger;
    use mockito::{Matcher, Server, ServerGuard};
    use pretty_assertions::assert_eq;
    use reqwest::StatusCode;
    use serde_json::json;

    fn service(server: &ServerGuard, session: Session) -> AuthService<ApiClient> {
        let store = Arc::new(SessionStore::with_session(session));
        let client = ApiClient::new(&Config::with_base_url(&server.url()), store.clone()).unwrap();
        AuthService::new(Arc::new(client), store)
    }

    #[tokio::test]
    async fn test_login_populates_session() {
        setup_logger();
        let mut server = Server::new_async().await;
        let login = server
            .mock("POST", "/user/login")
            .match_body(Matcher::Json(json!({"email": "a@b.com", "password": "secret"})))
            .with_status(200)
            .with_body(r#"{"access_token":"T1","user_id":7,"expires_in":900}"#)
            .expect(1)
            .create_async()
            .await;
        let profile = server
            .mock("GET", "/user/7")
            .match_header("authorization", "Bearer T1")
            .with_status(200)
            .with_body(r#"{"id":7,"nickname":"ann","email":"a@b.com","balance":250}"#)
            .expect(1)
            .create_async()
            .await;

        let auth = service(&server, Session::default());
        let user = auth.login("a@b.com", "secret").await.unwrap();

        assert_eq!(user.id, 7);
        assert_eq!(user.avatar_path.as_deref(), Some("userpic_7.jpg"));
        let session = auth.session().get();
        assert_eq!(session.access_token.as_deref(), Some("T1"));
        assert_eq!(session.user.map(|u| u.id), Some(7));
        login.assert_async().await;
        profile.assert_async().await;
    }

    #[tokio::test]
    async fn test_login_replaces_stale_token() {
        setup_logger();
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/user/login")
            .match_header("authorization", "Bearer T_old")
            .with_status(200)
            .with_body(r#"{"access_token":"T_new","user_id":7}"#)
            .create_async()
            .await;
        let stale = server
            .mock("GET", "/user/7")
            .match_header("authorization", "Bearer T_old")
            .expect(0)
            .create_async()
            .await;
        let profile = server
            .mock("GET", "/user/7")
            .match_header("authorization", "Bearer T_new")
            .with_status(200)
            .with_body(r#"{"id":7,"nickname":"ann"}"#)
            .expect(1)
            .create_async()
            .await;

        let auth = service(
            &server,
            Session {
                access_token: Some("T_old".to_string()),
                user: Some(User {
                    id: 3,
                    ..Default::default()
                }),
            },
        );
        let user = auth.login("a@b.com", "secret").await.unwrap();

        assert_eq!(user.id, 7);
        assert_eq!(auth.session().token().as_deref(), Some("T_new"));
        stale.assert_async().await;
        profile.assert_async().await;
    }

    #[tokio::test]
    async fn test_login_with_wrong_password_does_not_refresh() {
        setup_logger();
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/user/login")
            .with_status(401)
            .with_body("Неверный логин или пароль\n")
            .create_async()
            .await;
        let refresh = server
            .mock("POST", "/user/refresh")
            .expect(0)
            .create_async()
            .await;

        let auth = service(&server, Session::default());
        let err = auth.login("a@b.com", "wrong").await.unwrap_err();

        assert!(matches!(err, AppError::Unauthorized(_)));
        assert_eq!(err.body().map(|b| b.to_string()), Some("Неверный логин или пароль".to_string()));
        assert!(!auth.session().is_authenticated());
        refresh.assert_async().await;
    }

    #[tokio::test]
    async fn test_register_then_login() {
        setup_logger();
        let mut server = Server::new_async().await;
        let create = server
            .mock("POST", "/user/create")
            .match_body(Matcher::PartialJson(json!({"nickname": "ann", "email": "a@b.com"})))
            .with_status(200)
            .expect(1)
            .create_async()
            .await;
        server
            .mock("POST", "/user/login")
            .with_status(200)
            .with_body(r#"{"access_token":"T1","user_id":8}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/user/8")
            .with_status(200)
            .with_body(r#"{"id":8,"nickname":"ann","avatar_path":"me.png"}"#)
            .create_async()
            .await;

        let auth = service(&server, Session::default());
        let payload = RegisterRequest {
            name: "Anna".to_string(),
            surname: "Ivanova".to_string(),
            patronymic: None,
            nickname: "ann".to_string(),
            email: "a@b.com".to_string(),
            password: "secret".to_string(),
        };
        let user = auth.register(&payload).await.unwrap();

        assert_eq!(user.avatar_path.as_deref(), Some("me.png"));
        assert!(auth.session().is_authenticated());
        create.assert_async().await;
    }

    #[tokio::test]
    async fn test_logout_clears_even_when_server_fails() {
        setup_logger();
        let mut server = Server::new_async().await;
        let logout = server
            .mock("POST", "/user/logout")
            .with_status(500)
            .expect(1)
            .create_async()
            .await;

        let auth = service(
            &server,
            Session {
                access_token: Some("T1".to_string()),
                user: Some(User {
                    id: 7,
                    ..Default::default()
                }),
            },
        );
        auth.logout().await;

        assert_eq!(auth.session().get(), Session::default());
        logout.assert_async().await;
    }

    #[tokio::test]
    async fn test_login_rejects_empty_token() {
        let mut client = MockHttpClient::new();
        client
            .expect_request()
            .withf(|r| r.path() == "/user/login" && !r.is_refreshable())
            .times(1)
            .returning(|_| {
                Ok(ApiResponse::new(
                    StatusCode::OK,
                    r#"{"access_token":"","user_id":7}"#,
                ))
            });

        let store = Arc::new(SessionStore::new());
        let auth = AuthService::new(Arc::new(client), store.clone());
        let err = auth.login("a@b.com", "secret").await.unwrap_err();

        assert!(matches!(err, AppError::InvalidResponse(_)));
        assert!(!store.is_authenticated());
    }
}
