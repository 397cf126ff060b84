use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::{
    application::models::{
        transaction::{EntityType, TransferRequest},
        user::User,
    },
    error::AppError,
    session::store::SessionStore,
    transport::{http_client::HttpClient, request::ApiRequest},
};

#[async_trait]
pub trait TransferService: Send + Sync {
    /// Moves `amount` from the logged-in user's balance to the target entity.
    ///
    /// Returns the session user with the balance already reduced.
    async fn transfer(
        &self,
        to_type: EntityType,
        to_id: i64,
        amount: f64,
    ) -> Result<User, AppError>;
}

pub struct TransferServiceImpl<T: HttpClient> {
    client: Arc<T>,
    session: Arc<SessionStore>,
}

impl<T: HttpClient> TransferServiceImpl<T> {
    pub fn new(client: Arc<T>, session: Arc<SessionStore>) -> Self {
        Self { client, session }
    }
}

#[async_trait]
impl<T: HttpClient + 'static> TransferService for TransferServiceImpl<T> {
    #[instrument(skip(self))]
    async fn transfer(
        &self,
        to_type: EntityType,
        to_id: i64,
        amount: f64,
    ) -> Result<User, AppError> {
        let Some(user) = self.session.user() else {
            warn!("Transfer attempted without a logged-in user");
            return Err(AppError::NotAuthenticated);
        };

        let request = TransferRequest {
            from_type: EntityType::User,
            from_id: user.id,
            to_type,
            to_id,
            amount,
        };
        self.client
            .request(ApiRequest::post("/tx/transfer").json(&request)?)
            .await?;

        // The backend does not echo the new balance.
        let updated = self
            .session
            .update_user(|u| u.balance -= amount)
            .ok_or(AppError::NotAuthenticated)?;
        info!("Transferred {:.2} from user {} to {:?} {}", amount, user.id, to_type, to_id);
        Ok(updated)
    }
}

#[cfg(test)]
mod tests_transfer_service {
    use super::*;
    use crate::error::ErrorBody;
    use crate::session::store::Session;
    use crate::transport::http_client::MockHttpClient;
    use crate::transport::request::RequestBody;
    use crate::transport::response::ApiResponse;
    use pretty_assertions::assert_eq;
    use reqwest::StatusCode;
    use serde_json::json;

    fn session_with_balance(balance: f64) -> Arc<SessionStore> {
        Arc::new(SessionStore::with_session(Session {
            access_token: Some("T1".to_string()),
            user: Some(User {
                id: 7,
                balance,
                ..Default::default()
            }),
        }))
    }

    #[tokio::test]
    async fn test_transfer_decrements_balance() {
        let mut client = MockHttpClient::new();
        client
            .expect_request()
            .withf(|r| {
                r.path() == "/tx/transfer"
                    && r.body()
                        == &RequestBody::Json(json!({
                            "from_type": "user",
                            "from_id": 7,
                            "to_type": "project",
                            "to_id": 5,
                            "amount": 150.0
                        }))
            })
            .times(1)
            .returning(|_| Ok(ApiResponse::new(StatusCode::OK, "")));

        let session = session_with_balance(1000.0);
        let service = TransferServiceImpl::new(Arc::new(client), session.clone());
        let user = service.transfer(EntityType::Project, 5, 150.0).await.unwrap();

        assert_eq!(user.balance, 850.0);
        assert_eq!(session.user().map(|u| u.balance), Some(850.0));
    }

    #[tokio::test]
    async fn test_transfer_without_user_does_no_io() {
        let mut client = MockHttpClient::new();
        client.expect_request().times(0);

        let service = TransferServiceImpl::new(Arc::new(client), Arc::new(SessionStore::new()));
        let err = service.transfer(EntityType::Org, 2, 10.0).await.unwrap_err();

        assert!(matches!(err, AppError::NotAuthenticated));
    }

    #[tokio::test]
    async fn test_rejected_transfer_keeps_balance() {
        let mut client = MockHttpClient::new();
        client.expect_request().times(1).returning(|_| {
            Err(AppError::Api {
                status: StatusCode::BAD_REQUEST,
                body: ErrorBody::Json(json!({"error": "insufficient funds"})),
            })
        });

        let session = session_with_balance(5.0);
        let service = TransferServiceImpl::new(Arc::new(client), session.clone());
        let err = service.transfer(EntityType::User, 3, 10.0).await.unwrap_err();

        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
        assert_eq!(session.user().map(|u| u.balance), Some(5.0));
    }
}
