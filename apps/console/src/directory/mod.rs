//! Directory Client — the single point of entry for all directory service calls.
//!
//! ARCHITECTURAL RULE: no other module may talk to the remote service
//! directly. Everything the console does ends up as one of the methods below.
//!
//! The console carries the client as `Arc<dyn DirectoryApi>`, so tests swap in
//! an in-memory double without touching the synchronizer or dispatcher.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::models::folder::{FolderDraft, FolderRecord};
use crate::models::user::{UserDraft, UserRecord};

pub mod http;
#[cfg(test)]
pub mod testing;

pub use http::HttpDirectoryClient;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One batched call request: immediate when `schedule_time` is absent,
/// scheduled when present. The service is the source of truth for per-user
/// success/failure, surfaced only through call statuses on the next refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchCallRequest {
    pub user_ids: Vec<String>,
    pub use_default: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_greet_instruction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_instruction: Option<String>,
    /// Local wall-clock timestamp, `YYYY-MM-DDTHH:MM:SS`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_time: Option<String>,
}

/// The remote directory service owning all persistent user and folder records.
#[async_trait]
pub trait DirectoryApi: Send + Sync {
    async fn list_users(&self) -> Result<Vec<UserRecord>, DirectoryError>;
    async fn list_folders(&self) -> Result<Vec<FolderRecord>, DirectoryError>;

    async fn create_user(&self, draft: &UserDraft) -> Result<(), DirectoryError>;
    async fn update_user(&self, draft: &UserDraft) -> Result<(), DirectoryError>;
    async fn delete_user(&self, user_id: &str) -> Result<(), DirectoryError>;

    async fn create_folder(&self, draft: &FolderDraft) -> Result<(), DirectoryError>;
    async fn update_folder(&self, folder_id: &str, draft: &FolderDraft)
        -> Result<(), DirectoryError>;
    async fn delete_folder(&self, folder_id: &str) -> Result<(), DirectoryError>;

    /// Initiates one call for a single user.
    async fn start_call(&self, user_id: &str) -> Result<(), DirectoryError>;
    /// Initiates calls for a set of users in one request.
    async fn batch_call(&self, request: &BatchCallRequest) -> Result<(), DirectoryError>;
    /// Schedules calls for a set of users in one request.
    async fn schedule_batch_call(&self, request: &BatchCallRequest) -> Result<(), DirectoryError>;

    /// Uploads an operator-supplied CSV/XLSX candidate list verbatim; the
    /// service does the parsing.
    async fn import_users(&self, file_name: &str, bytes: Vec<u8>) -> Result<(), DirectoryError>;
}
