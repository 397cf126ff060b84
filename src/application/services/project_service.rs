use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::{
    application::models::project::{
        CreatedProject, Project, ProjectDraft, ProjectQuery, ProjectUpdate,
    },
    error::AppError,
    transport::{
        http_client::HttpClient,
        request::{ApiRequest, FilePart},
    },
};

#[async_trait]
pub trait ProjectService: Send + Sync {
    async fn get_project(&self, id: i64) -> Result<Project, AppError>;

    /// Lists public projects, paginated and optionally filtered
    async fn list_projects(&self, query: &ProjectQuery) -> Result<Vec<Project>, AppError>;

    /// Creates a project and uploads its cover picture if one is given.
    ///
    /// Returns the id of the new project.
    async fn publish(&self, draft: &ProjectDraft, picture: Option<FilePart>)
        -> Result<i64, AppError>;

    async fn update(&self, id: i64, update: &ProjectUpdate) -> Result<(), AppError>;

    /// Bans or unbans a project (admin only)
    async fn set_banned(&self, id: i64, ban: bool) -> Result<(), AppError>;
}

pub struct ProjectServiceImpl<T: HttpClient> {
    client: Arc<T>,
}

impl<T: HttpClient> ProjectServiceImpl<T> {
    pub fn new(client: Arc<T>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<T: HttpClient + 'static> ProjectService for ProjectServiceImpl<T> {
    #[instrument(skip(self))]
    async fn get_project(&self, id: i64) -> Result<Project, AppError> {
        self.client
            .request(ApiRequest::get(&format!("/projects/{id}")))
            .await?
            .json()
    }

    #[instrument(skip(self))]
    async fn list_projects(&self, query: &ProjectQuery) -> Result<Vec<Project>, AppError> {
        let projects: Vec<Project> = self
            .client
            .request(ApiRequest::get("/projects/").queries(query.to_pairs()))
            .await?
            .json_list()?;
        debug!("Fetched {} projects", projects.len());
        Ok(projects)
    }

    #[instrument(skip(self, draft, picture), fields(name = %draft.name))]
    async fn publish(
        &self,
        draft: &ProjectDraft,
        picture: Option<FilePart>,
    ) -> Result<i64, AppError> {
        let created: CreatedProject = self
            .client
            .request(ApiRequest::post("/projects/create").json(draft)?)
            .await?
            .json()?;
        info!("Project {} created", created.id);

        if let Some(picture) = picture {
            let picture = FilePart { field: "picture".to_string(), ..picture };
            self.client
                .request(
                    ApiRequest::post(&format!("/projects/{}/picture/upload", created.id))
                        .multipart(vec![picture]),
                )
                .await?;
            debug!("Picture uploaded for project {}", created.id);
        }
        Ok(created.id)
    }

    #[instrument(skip(self, update))]
    async fn update(&self, id: i64, update: &ProjectUpdate) -> Result<(), AppError> {
        self.client
            .request(ApiRequest::post(&format!("/projects/{id}/update")).json(update)?)
            .await?;
        info!("Project {} updated", id);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_banned(&self, id: i64, ban: bool) -> Result<(), AppError> {
        self.client
            .request(ApiRequest::post(&format!("/projects/{id}/ban")).query("ban", ban))
            .await?;
        info!("Project {} ban set to {}", id, ban);
        Ok(())
    }
}
