use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::{
    application::models::comment::{Comment, NewComment},
    error::AppError,
    transport::{http_client::HttpClient, request::ApiRequest},
};

#[async_trait]
pub trait CommentService: Send + Sync {
    /// Comments of a project, newest first
    async fn list_comments(
        &self,
        project_id: i64,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Comment>, AppError>;

    async fn add_comment(&self, project_id: i64, body: &str) -> Result<Comment, AppError>;

    async fn delete_comment(&self, comment_id: i64) -> Result<(), AppError>;
}

pub struct CommentServiceImpl<T: HttpClient> {
    client: Arc<T>,
}

impl<T: HttpClient> CommentServiceImpl<T> {
    pub fn new(client: Arc<T>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<T: HttpClient + 'static> CommentService for CommentServiceImpl<T> {
    #[instrument(skip(self))]
    async fn list_comments(
        &self,
        project_id: i64,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Comment>, AppError> {
        let comments: Vec<Comment> = self
            .client
            .request(
                ApiRequest::get(&format!("/comments/read/all/{project_id}"))
                    .query("limit", limit)
                    .query("offset", offset),
            )
            .await?
            .json_list()?;
        debug!("Project {} has {} comments on this page", project_id, comments.len());
        Ok(comments)
    }

    #[instrument(skip(self, body))]
    async fn add_comment(&self, project_id: i64, body: &str) -> Result<Comment, AppError> {
        let comment: Comment = self
            .client
            .request(
                ApiRequest::post(&format!("/comments/add/{project_id}"))
                    .json(&NewComment { body })?,
            )
            .await?
            .json()?;
        info!("Comment {} added to project {}", comment.id, project_id);
        Ok(comment)
    }

    #[instrument(skip(self))]
    async fn delete_comment(&self, comment_id: i64) -> Result<(), AppError> {
        self.client
            .request(ApiRequest::delete(&format!("/comments/delete/{comment_id}")))
            .await?;
        info!("Comment {} deleted", comment_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests_comment_service {
    use super::*;
    use crate::constants::DEFAULT_PAGE_LIMIT;
    use crate::transport::http_client::MockHttpClient;
    use crate::transport::request::RequestBody;
    use crate::transport::response::ApiResponse;
    use pretty_assertions::assert_eq;
    use reqwest::{Method, StatusCode};
    use serde_json::json;

    fn ok(body: &str) -> Result<ApiResponse, AppError> {
        Ok(ApiResponse::new(StatusCode::OK, body))
    }

    #[tokio::test]
    async fn test_list_comments() {
        let mut client = MockHttpClient::new();
        client
            .expect_request()
            .withf(|r| {
                r.path() == "/comments/read/all/5"
                    && r.query_pairs()
                        == [
                            ("limit".to_string(), "50".to_string()),
                            ("offset".to_string(), "0".to_string()),
                        ]
            })
            .times(1)
            .returning(|_| {
                ok(r#"[{"id":1,"user_id":7,"username":"ann","project_id":5,"body":"Удачи!","created_at":"2025-03-01T10:00:00Z"}]"#)
            });

        let service = CommentServiceImpl::new(Arc::new(client));
        let comments = service
            .list_comments(5, DEFAULT_PAGE_LIMIT, 0)
            .await
            .unwrap();

        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].body, "Удачи!");
        assert!(comments[0].created_at.is_some());
    }

    #[tokio::test]
    async fn test_empty_page() {
        let mut client = MockHttpClient::new();
        client.expect_request().returning(|_| ok("null"));

        let service = CommentServiceImpl::new(Arc::new(client));
        assert!(service.list_comments(5, 50, 100).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_and_delete() {
        let mut client = MockHttpClient::new();
        client
            .expect_request()
            .withf(|r| {
                r.method() == Method::POST
                    && r.path() == "/comments/add/5"
                    && r.body() == &RequestBody::Json(json!({"body": "Отличный проект"}))
            })
            .times(1)
            .returning(|_| ok(r#"{"id":9,"user_id":7,"project_id":5,"body":"Отличный проект"}"#));
        client
            .expect_request()
            .withf(|r| r.method() == Method::DELETE && r.path() == "/comments/delete/9")
            .times(1)
            .returning(|_| ok(""));

        let service = CommentServiceImpl::new(Arc::new(client));
        let comment = service.add_comment(5, "Отличный проект").await.unwrap();
        assert_eq!(comment.id, 9);
        assert_eq!(comment.username, "");

        tokio_test::assert_ok!(service.delete_comment(comment.id).await);
    }
}
