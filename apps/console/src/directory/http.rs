use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::debug;

use crate::directory::{BatchCallRequest, DirectoryApi, DirectoryError};
use crate::models::folder::{FolderDraft, FolderRecord};
use crate::models::user::{UserDraft, UserRecord};

/// List responses arrive wrapped in a `data` envelope.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct UsersPayload {
    users: Vec<UserRecord>,
}

#[derive(Debug, Deserialize)]
struct FoldersPayload {
    folders: Vec<FolderRecord>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Reqwest-backed client for the remote directory service.
#[derive(Clone)]
pub struct HttpDirectoryClient {
    client: Client,
    base_url: String,
}

impl HttpDirectoryClient {
    pub fn new(base_url: String, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Turns a non-2xx response into `DirectoryError::Api`, extracting the
    /// service's `message` field when the body parses as JSON.
    async fn check(response: Response) -> Result<Response, DirectoryError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(DirectoryError::Api {
            status: status.as_u16(),
            message: extract_message(&body),
        })
    }

    async fn post_json<B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), DirectoryError> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}

fn extract_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|e| e.message)
        .unwrap_or_else(|_| body.to_string())
}

#[async_trait]
impl DirectoryApi for HttpDirectoryClient {
    async fn list_users(&self) -> Result<Vec<UserRecord>, DirectoryError> {
        let response = self.client.get(self.url("/user/all")).send().await?;
        let body = Self::check(response).await?.text().await?;
        let envelope: Envelope<UsersPayload> = serde_json::from_str(&body)?;
        debug!(count = envelope.data.users.len(), "fetched user list");
        Ok(envelope.data.users)
    }

    async fn list_folders(&self) -> Result<Vec<FolderRecord>, DirectoryError> {
        let response = self.client.get(self.url("/folder/all")).send().await?;
        let body = Self::check(response).await?.text().await?;
        let envelope: Envelope<FoldersPayload> = serde_json::from_str(&body)?;
        debug!(count = envelope.data.folders.len(), "fetched folder list");
        Ok(envelope.data.folders)
    }

    async fn create_user(&self, draft: &UserDraft) -> Result<(), DirectoryError> {
        self.post_json("/user/create", draft).await
    }

    async fn update_user(&self, draft: &UserDraft) -> Result<(), DirectoryError> {
        self.post_json("/user/update", draft).await
    }

    async fn delete_user(&self, user_id: &str) -> Result<(), DirectoryError> {
        let response = self
            .client
            .delete(self.url(&format!("/user/delete/{user_id}")))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn create_folder(&self, draft: &FolderDraft) -> Result<(), DirectoryError> {
        self.post_json("/folder/create", draft).await
    }

    async fn update_folder(
        &self,
        folder_id: &str,
        draft: &FolderDraft,
    ) -> Result<(), DirectoryError> {
        let response = self
            .client
            .put(self.url(&format!("/folder/update/{folder_id}")))
            .json(draft)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn delete_folder(&self, folder_id: &str) -> Result<(), DirectoryError> {
        let response = self
            .client
            .delete(self.url(&format!("/folder/{folder_id}")))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn start_call(&self, user_id: &str) -> Result<(), DirectoryError> {
        self.post_json("/call/start", &serde_json::json!({ "user_id": user_id }))
            .await
    }

    async fn batch_call(&self, request: &BatchCallRequest) -> Result<(), DirectoryError> {
        self.post_json("/call/batch-call", request).await
    }

    async fn schedule_batch_call(&self, request: &BatchCallRequest) -> Result<(), DirectoryError> {
        self.post_json("/call/batch-call/schedule", request).await
    }

    async fn import_users(&self, file_name: &str, bytes: Vec<u8>) -> Result<(), DirectoryError> {
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new().part("file", part);
        let response = self
            .client
            .post(self.url("/user/import-users"))
            .multipart(form)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
