use serde::{Deserialize, Serialize};

/// Kind of account money moves between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    User,
    Org,
    Project,
}

/// Body of `POST /tx/transfer`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferRequest {
    pub from_type: EntityType,
    pub from_id: i64,
    pub to_type: EntityType,
    pub to_id: i64,
    pub amount: f64,
}

#[cfg(test)]
mod tests_transfer_request {
    use super::*;
    use assert_json_diff::assert_json_eq;
    use serde_json::json;

    #[test]
    fn test_wire_format() {
        let request = TransferRequest {
            from_type: EntityType::User,
            from_id: 7,
            to_type: EntityType::Project,
            to_id: 12,
            amount: 500.0,
        };
        assert_json_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "from_type": "user",
                "from_id": 7,
                "to_type": "project",
                "to_id": 12,
                "amount": 500.0
            })
        );
    }
}
