use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub id: i64,
    pub name: String,
    /// Owning organisation.
    pub creator_id: i64,
    pub quick_peek: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quick_peek_picture_path: Option<String>,
    pub content: String,
    pub is_public: bool,
    pub is_completed: bool,
    pub current_money: f64,
    pub wanted_money: f64,
    pub duration_days: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub is_banned: bool,
    pub monetization_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent: Option<f64>,
    pub payback_started: bool,
    pub money_required_to_payback: f64,
}

impl Project {
    /// Share of the goal collected so far, in percent, capped at 100.
    pub fn progress(&self) -> f64 {
        if self.wanted_money <= 0.0 {
            return 0.0;
        }
        (self.current_money / self.wanted_money * 100.0).min(100.0)
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"id\":{},\"name\":\"{}\",\"creator_id\":{},\"current_money\":{:.2},\"wanted_money\":{:.2}}}",
            self.id, self.name, self.creator_id, self.current_money, self.wanted_money
        )
    }
}

/// Body of `POST /projects/create`.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDraft {
    pub name: String,
    pub creator_id: i64,
    pub quick_peek: String,
    pub content: String,
    pub wanted_money: f64,
    pub duration_days: i64,
    pub monetization_type: String,
    pub percent: f64,
}

impl ProjectDraft {
    pub const DEFAULT_MONETIZATION: &'static str = "donation";

    pub fn new(name: &str, creator_id: i64) -> Self {
        Self {
            name: name.to_string(),
            creator_id,
            quick_peek: String::new(),
            content: String::new(),
            wanted_money: 0.0,
            duration_days: 0,
            monetization_type: Self::DEFAULT_MONETIZATION.to_string(),
            percent: 0.0,
        }
    }
}

/// Fields accepted by `POST /projects/{id}/update`; unset fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quick_peek: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wanted_money: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_days: Option<i64>,
}

/// Filters for the public project listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectQuery {
    pub limit: u32,
    pub offset: u32,
    pub query: Option<String>,
    pub category: Option<String>,
}

impl Default for ProjectQuery {
    fn default() -> Self {
        Self {
            limit: crate::constants::DEFAULT_PAGE_LIMIT,
            offset: 0,
            query: None,
            category: None,
        }
    }
}

impl ProjectQuery {
    pub(crate) fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("limit".to_string(), self.limit.to_string()),
            ("offset".to_string(), self.offset.to_string()),
        ];
        if let Some(q) = self.query.as_ref().filter(|q| !q.is_empty()) {
            pairs.push(("q".to_string(), q.clone()));
        }
        if let Some(category) = self.category.as_ref().filter(|c| !c.is_empty()) {
            pairs.push(("category".to_string(), category.clone()));
        }
        pairs
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CreatedProject {
    pub id: i64,
}

#[cfg(test)]
mod tests_project {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_progress() {
        let project = Project {
            current_money: 250.0,
            wanted_money: 1000.0,
            ..Default::default()
        };
        assert_eq!(project.progress(), 25.0);

        let overfunded = Project {
            current_money: 3000.0,
            wanted_money: 1000.0,
            ..Default::default()
        };
        assert_eq!(overfunded.progress(), 100.0);
        assert_eq!(Project::default().progress(), 0.0);
    }

    #[test]
    fn test_draft_defaults_to_donation() {
        let draft = ProjectDraft::new("Greenhouse", 4);
        let body = serde_json::to_value(&draft).unwrap();
        assert_eq!(body["monetization_type"], json!("donation"));
        assert_eq!(body["percent"], json!(0.0));
        assert_eq!(body["creator_id"], json!(4));
    }

    #[test]
    fn test_update_skips_unset_fields() {
        let update = ProjectUpdate {
            is_public: Some(true),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({"is_public": true}));
    }

    #[test]
    fn test_query_pairs() {
        let query = ProjectQuery {
            query: Some("solar".to_string()),
            category: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(
            query.to_pairs(),
            vec![
                ("limit".to_string(), "50".to_string()),
                ("offset".to_string(), "0".to_string()),
                ("q".to_string(), "solar".to_string()),
            ]
        );
    }
}
