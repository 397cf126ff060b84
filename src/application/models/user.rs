/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 13/5/25
******************************************************************************/
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Platform user as returned by `GET /user/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub surname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patronymic: Option<String>,
    pub nickname: String,
    pub email: String,
    pub balance: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_path: Option<String>,
    pub is_admin: bool,
    pub is_banned: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// Avatar file name the user service stores uploads under.
    pub fn default_avatar_path(id: i64) -> String {
        format!("userpic_{id}.jpg")
    }

    /// Fills in [`User::default_avatar_path`] when the backend sent no avatar.
    pub fn with_default_avatar(mut self) -> Self {
        if self.avatar_path.as_deref().map_or(true, str::is_empty) {
            self.avatar_path = Some(Self::default_avatar_path(self.id));
        }
        self
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"id\":{},\"nickname\":\"{}\",\"email\":\"{}\",\"balance\":{:.2},\"is_admin\":{},\"is_banned\":{}}}",
            self.id, self.nickname, self.email, self.balance, self.is_admin, self.is_banned
        )
    }
}

/// Body of `POST /user/create`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub surname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patronymic: Option<String>,
    pub nickname: String,
    pub email: String,
    pub password: String,
}

/// Editable profile fields accepted by `POST /user/update`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    pub name: String,
    pub surname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patronymic: Option<String>,
    pub nickname: String,
    pub email: String,
}

impl From<&User> for ProfileUpdate {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            surname: user.surname.clone(),
            patronymic: user.patronymic.clone(),
            nickname: user.nickname.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user_id: i64,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AvatarResponse {
    pub avatar_path: String,
}

/// A position the user holds in a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Investment {
    pub project_id: i64,
    pub project_name: String,
    pub quick_peek: String,
    pub monetization_type: String,
    pub total_invested: f64,
    pub total_received: f64,
    pub created_at: Option<DateTime<Utc>>,
    pub is_completed: bool,
    pub is_banned: bool,
}
