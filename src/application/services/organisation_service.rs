use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::{
    application::models::{
        organisation::{OrgDocType, OrgDocument, Organisation},
        user::AvatarResponse,
    },
    error::AppError,
    transport::{
        http_client::HttpClient,
        request::{ApiRequest, FilePart},
    },
};

/// Organisation management, including the legal documents attached to it
#[async_trait]
pub trait OrganisationService: Send + Sync {
    /// Organisations the logged-in user belongs to
    async fn my_organisations(&self) -> Result<Vec<Organisation>, AppError>;

    /// Full record including the legal face, visible to the owner only
    async fn full_organisation(&self, id: i64) -> Result<Organisation, AppError>;

    async fn create(&self, org: &Organisation) -> Result<Organisation, AppError>;

    async fn update(&self, id: i64, org: &Organisation) -> Result<Organisation, AppError>;

    async fn upload_avatar(&self, id: i64, file: FilePart) -> Result<String, AppError>;

    async fn set_banned(&self, id: i64, ban: bool) -> Result<(), AppError>;

    async fn upload_document(
        &self,
        id: i64,
        doc_type: OrgDocType,
        file: FilePart,
    ) -> Result<(), AppError>;

    async fn download_document(&self, id: i64, doc_type: OrgDocType)
        -> Result<OrgDocument, AppError>;

    async fn delete_document(&self, id: i64, doc_type: OrgDocType) -> Result<(), AppError>;
}

pub struct OrganisationServiceImpl<T: HttpClient> {
    client: Arc<T>,
}

impl<T: HttpClient> OrganisationServiceImpl<T> {
    pub fn new(client: Arc<T>) -> Self {
        Self { client }
    }
}

fn document_path(id: i64, doc_type: OrgDocType) -> String {
    format!("/org/{id}/docs/{doc_type}")
}

#[async_trait]
impl<T: HttpClient + 'static> OrganisationService for OrganisationServiceImpl<T> {
    #[instrument(skip(self))]
    async fn my_organisations(&self) -> Result<Vec<Organisation>, AppError> {
        let orgs: Vec<Organisation> = self
            .client
            .request(ApiRequest::get("/org/my"))
            .await?
            .json_list()?;
        debug!("User belongs to {} organisations", orgs.len());
        Ok(orgs)
    }

    #[instrument(skip(self))]
    async fn full_organisation(&self, id: i64) -> Result<Organisation, AppError> {
        self.client
            .request(ApiRequest::get(&format!("/org/{id}/full")))
            .await?
            .json()
    }

    #[instrument(skip(self, org), fields(name = %org.name))]
    async fn create(&self, org: &Organisation) -> Result<Organisation, AppError> {
        let created: Organisation = self
            .client
            .request(ApiRequest::post("/org/create").json(org)?)
            .await?
            .json()?;
        info!("Organisation {} created", created.id);
        Ok(created)
    }

    #[instrument(skip(self, org))]
    async fn update(&self, id: i64, org: &Organisation) -> Result<Organisation, AppError> {
        let updated: Organisation = self
            .client
            .request(ApiRequest::post(&format!("/org/{id}/update")).json(org)?)
            .await?
            .json()?;
        info!("Organisation {} updated", id);
        Ok(updated)
    }

    #[instrument(skip(self, file))]
    async fn upload_avatar(&self, id: i64, file: FilePart) -> Result<String, AppError> {
        let file = FilePart { field: "avatar".to_string(), ..file };
        let response: AvatarResponse = self
            .client
            .request(ApiRequest::post(&format!("/org/{id}/avatar/upload")).multipart(vec![file]))
            .await?
            .json()?;
        Ok(response.avatar_path)
    }

    #[instrument(skip(self))]
    async fn set_banned(&self, id: i64, ban: bool) -> Result<(), AppError> {
        self.client
            .request(ApiRequest::post(&format!("/org/{id}/active")).query("ban", ban))
            .await?;
        info!("Organisation {} ban set to {}", id, ban);
        Ok(())
    }

    #[instrument(skip(self, file))]
    async fn upload_document(
        &self,
        id: i64,
        doc_type: OrgDocType,
        file: FilePart,
    ) -> Result<(), AppError> {
        let file = FilePart { field: "file".to_string(), ..file };
        self.client
            .request(ApiRequest::post(&document_path(id, doc_type)).multipart(vec![file]))
            .await?;
        info!("Document {} uploaded for organisation {}", doc_type, id);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn download_document(
        &self,
        id: i64,
        doc_type: OrgDocType,
    ) -> Result<OrgDocument, AppError> {
        let response = self
            .client
            .request(ApiRequest::get(&document_path(id, doc_type)))
            .await?;
        let content_type = response.content_type().map(String::from);
        let bytes = response.into_bytes();
        debug!("Downloaded {} bytes of {}", bytes.len(), doc_type);
        Ok(OrgDocument {
            doc_type,
            content_type,
            bytes,
        })
    }

    #[instrument(skip(self))]
    async fn delete_document(&self, id: i64, doc_type: OrgDocType) -> Result<(), AppError> {
        self.client
            .request(ApiRequest::delete(&document_path(id, doc_type)))
            .await?;
        info!("Document {} deleted for organisation {}", doc_type, id);
        Ok(())
    }
}
