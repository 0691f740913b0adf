//! In-memory `DirectoryApi` double for tests: canned list responses,
//! per-endpoint failure injection, and a log of every mutating request.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::directory::{BatchCallRequest, DirectoryApi, DirectoryError};
use crate::models::folder::{FolderDraft, FolderRecord};
use crate::models::user::{UserDraft, UserRecord};

#[derive(Default)]
pub struct StubDirectory {
    pub users: Mutex<Vec<UserRecord>>,
    pub folders: Mutex<Vec<FolderRecord>>,

    pub fail_users: AtomicBool,
    pub fail_folders: AtomicBool,
    pub fail_batch: AtomicBool,

    /// When set, `list_users` parks until the notify fires. Lets tests hold a
    /// refresh in flight while triggering another.
    pub hold_users: Mutex<Option<Arc<Notify>>>,

    pub list_user_calls: AtomicUsize,
    pub batch_requests: Mutex<Vec<BatchCallRequest>>,
    pub schedule_requests: Mutex<Vec<BatchCallRequest>>,
    pub started_calls: Mutex<Vec<String>>,
    pub deleted_users: Mutex<Vec<String>>,
}

impl StubDirectory {
    pub fn with_users(users: Vec<UserRecord>) -> Arc<Self> {
        let stub = Self::default();
        *stub.users.lock().unwrap() = users;
        Arc::new(stub)
    }

    pub fn set_users(&self, users: Vec<UserRecord>) {
        *self.users.lock().unwrap() = users;
    }

    pub fn set_folders(&self, folders: Vec<FolderRecord>) {
        *self.folders.lock().unwrap() = folders;
    }

    fn injected(flag: &AtomicBool) -> Result<(), DirectoryError> {
        if flag.load(Ordering::SeqCst) {
            Err(DirectoryError::Api {
                status: 500,
                message: "injected failure".into(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DirectoryApi for StubDirectory {
    async fn list_users(&self) -> Result<Vec<UserRecord>, DirectoryError> {
        self.list_user_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.hold_users.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        Self::injected(&self.fail_users)?;
        Ok(self.users.lock().unwrap().clone())
    }

    async fn list_folders(&self) -> Result<Vec<FolderRecord>, DirectoryError> {
        Self::injected(&self.fail_folders)?;
        Ok(self.folders.lock().unwrap().clone())
    }

    async fn create_user(&self, _draft: &UserDraft) -> Result<(), DirectoryError> {
        Ok(())
    }

    async fn update_user(&self, _draft: &UserDraft) -> Result<(), DirectoryError> {
        Ok(())
    }

    async fn delete_user(&self, user_id: &str) -> Result<(), DirectoryError> {
        self.deleted_users.lock().unwrap().push(user_id.to_string());
        Ok(())
    }

    async fn create_folder(&self, _draft: &FolderDraft) -> Result<(), DirectoryError> {
        Ok(())
    }

    async fn update_folder(
        &self,
        _folder_id: &str,
        _draft: &FolderDraft,
    ) -> Result<(), DirectoryError> {
        Ok(())
    }

    async fn delete_folder(&self, _folder_id: &str) -> Result<(), DirectoryError> {
        Ok(())
    }

    async fn start_call(&self, user_id: &str) -> Result<(), DirectoryError> {
        self.started_calls.lock().unwrap().push(user_id.to_string());
        Ok(())
    }

    async fn batch_call(&self, request: &BatchCallRequest) -> Result<(), DirectoryError> {
        Self::injected(&self.fail_batch)?;
        self.batch_requests.lock().unwrap().push(request.clone());
        Ok(())
    }

    async fn schedule_batch_call(&self, request: &BatchCallRequest) -> Result<(), DirectoryError> {
        Self::injected(&self.fail_batch)?;
        self.schedule_requests.lock().unwrap().push(request.clone());
        Ok(())
    }

    async fn import_users(&self, _file_name: &str, _bytes: Vec<u8>) -> Result<(), DirectoryError> {
        Ok(())
    }
}

/// Builds a minimal user record for tests.
pub fn user(id: &str, folder: Option<&str>) -> UserRecord {
    UserRecord {
        user_id: id.to_string(),
        name: format!("User {id}"),
        phone: "+918126578265".to_string(),
        folder_id: folder.map(str::to_string),
        instruction: String::new(),
        use_default: true,
        custom_greet_instruction: String::new(),
        custom_instruction: String::new(),
        call_status: Default::default(),
        schedule_time: None,
        transcription: Vec::new(),
    }
}

/// Builds a minimal folder record for tests.
pub fn folder(id: &str, name: &str) -> FolderRecord {
    FolderRecord {
        folder_id: id.to_string(),
        folder_name: name.to_string(),
        voice_model: "aura-2-thalia-en".to_string(),
        llm_model: "gpt-4o-mini".to_string(),
        custom_greet_instruction: String::new(),
        custom_instruction: String::new(),
        is_active: true,
    }
}
