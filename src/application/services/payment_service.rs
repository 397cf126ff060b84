use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::{
    application::models::{
        payment::{PaymentInit, PaymentInitResponse},
        transaction::EntityType,
    },
    error::AppError,
    session::store::SessionStore,
    transport::{http_client::HttpClient, request::ApiRequest},
};

#[async_trait]
pub trait PaymentService: Send + Sync {
    /// Starts a top-up of the logged-in user's balance.
    ///
    /// Returns the payment provider URL the user has to be sent to.
    async fn init_payment(&self, amount: f64, return_url: &str) -> Result<String, AppError>;
}

pub struct PaymentServiceImpl<T: HttpClient> {
    client: Arc<T>,
    session: Arc<SessionStore>,
}

impl<T: HttpClient> PaymentServiceImpl<T> {
    pub fn new(client: Arc<T>, session: Arc<SessionStore>) -> Self {
        Self { client, session }
    }
}

#[async_trait]
impl<T: HttpClient + 'static> PaymentService for PaymentServiceImpl<T> {
    #[instrument(skip(self))]
    async fn init_payment(&self, amount: f64, return_url: &str) -> Result<String, AppError> {
        let user = self.session.user().ok_or(AppError::NotAuthenticated)?;

        let payment = PaymentInit {
            entity_type: EntityType::User,
            entity_id: user.id,
            amount,
            return_url: return_url.to_string(),
        };
        let response: PaymentInitResponse = self
            .client
            .request(ApiRequest::post("/payment/pay/init").json(&payment)?)
            .await?
            .json()?;
        info!("Payment of {:.2} initialised for user {}", amount, user.id);
        Ok(response.confirmation_url)
    }
}
