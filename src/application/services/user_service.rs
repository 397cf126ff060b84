use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::{
    application::models::user::{AvatarResponse, Investment, ProfileUpdate, User},
    error::AppError,
    session::store::SessionStore,
    transport::{
        http_client::HttpClient,
        request::{ApiRequest, FilePart},
    },
};

/// User profile operations
#[async_trait]
pub trait UserService: Send + Sync {
    /// Fetches a user; a missing avatar is replaced with the default file name
    async fn get_user(&self, id: i64) -> Result<User, AppError>;

    /// Saves the profile of the logged-in user and mirrors it into the session
    async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, AppError>;

    /// Uploads a new avatar, returning its storage path
    async fn upload_avatar(&self, file: FilePart) -> Result<String, AppError>;

    /// Bans or unbans a user (admin only)
    async fn set_banned(&self, id: i64, ban: bool) -> Result<(), AppError>;

    async fn active_investments(&self) -> Result<Vec<Investment>, AppError>;

    async fn archived_investments(&self) -> Result<Vec<Investment>, AppError>;
}

pub struct UserServiceImpl<T: HttpClient> {
    client: Arc<T>,
    session: Arc<SessionStore>,
}

impl<T: HttpClient> UserServiceImpl<T> {
    pub fn new(client: Arc<T>, session: Arc<SessionStore>) -> Self {
        Self { client, session }
    }
}

#[async_trait]
impl<T: HttpClient + 'static> UserService for UserServiceImpl<T> {
    #[instrument(skip(self))]
    async fn get_user(&self, id: i64) -> Result<User, AppError> {
        let user: User = self
            .client
            .request(ApiRequest::get(&format!("/user/{id}")))
            .await?
            .json()?;
        Ok(user.with_default_avatar())
    }

    #[instrument(skip(self, update))]
    async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, AppError> {
        self.session.user().ok_or(AppError::NotAuthenticated)?;

        self.client
            .request(ApiRequest::post("/user/update").json(update)?)
            .await?;

        let update = update.clone();
        let user = self
            .session
            .update_user(move |user| {
                user.name = update.name;
                user.surname = update.surname;
                user.patronymic = update.patronymic;
                user.nickname = update.nickname;
                user.email = update.email;
            })
            .ok_or(AppError::NotAuthenticated)?;
        info!("Profile of user {} updated", user.id);
        Ok(user)
    }

    #[instrument(skip(self, file), fields(file_name = %file.file_name))]
    async fn upload_avatar(&self, file: FilePart) -> Result<String, AppError> {
        let file = FilePart { field: "avatar".to_string(), ..file };
        let response: AvatarResponse = self
            .client
            .request(ApiRequest::post("/user/avatar/upload").multipart(vec![file]))
            .await?
            .json()?;

        let path = response.avatar_path;
        let stored = path.clone();
        self.session.update_user(move |user| user.avatar_path = Some(stored));
        debug!("Avatar stored at {}", path);
        Ok(path)
    }

    #[instrument(skip(self))]
    async fn set_banned(&self, id: i64, ban: bool) -> Result<(), AppError> {
        self.client
            .request(ApiRequest::post(&format!("/user/{id}/active")).query("ban", ban))
            .await?;
        info!("User {} ban set to {}", id, ban);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn active_investments(&self) -> Result<Vec<Investment>, AppError> {
        let investments: Vec<Investment> = self
            .client
            .request(ApiRequest::get("/user/investments/active"))
            .await?
            .json_list()?;
        debug!("Active investments: {}", investments.len());
        Ok(investments)
    }

    #[instrument(skip(self))]
    async fn archived_investments(&self) -> Result<Vec<Investment>, AppError> {
        let investments: Vec<Investment> = self
            .client
            .request(ApiRequest::get("/user/investments/archived"))
            .await?
            .json_list()?;
        debug!("Archived investments: {}", investments.len());
        Ok(investments)
    }
}
