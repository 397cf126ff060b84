use serde::{Deserialize, Serialize};

use super::transaction::EntityType;

/// Body of `POST /payment/pay/init`.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentInit {
    pub entity_type: EntityType,
    pub entity_id: i64,
    pub amount: f64,
    pub return_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PaymentInitResponse {
    pub confirmation_url: String,
}
