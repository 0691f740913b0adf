use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::user::default_true;

/// Voice models the screening service can speak with.
pub const VOICE_MODELS: &[&str] = &["aura-2-thalia-en", "aura-2-apollo-en", "aura-2-aria-en"];

/// LLM models the screening service can converse with.
pub const LLM_MODELS: &[&str] = &["gpt-4o-mini", "gpt-4.1", "gpt-4-turbo"];

/// A named grouping of users carrying default voice/LLM model and
/// conversation instruction settings. Mirrored read-only from the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderRecord {
    pub folder_id: String,
    pub folder_name: String,
    #[serde(default)]
    pub voice_model: String,
    #[serde(default)]
    pub llm_model: String,
    #[serde(default)]
    pub custom_greet_instruction: String,
    #[serde(default)]
    pub custom_instruction: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Payload for folder create/update.
#[derive(Debug, Clone, Serialize)]
pub struct FolderDraft {
    pub folder_name: String,
    pub voice_model: String,
    pub llm_model: String,
    pub custom_greet_instruction: String,
    pub custom_instruction: String,
    pub is_active: bool,
}

impl FolderDraft {
    /// Rejects drafts before any network call: the folder name must be
    /// non-blank and the models must come from the fixed enumerated sets.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.folder_name.trim().is_empty() {
            return Err(AppError::Validation("folder name must not be blank".into()));
        }
        if !VOICE_MODELS.contains(&self.voice_model.as_str()) {
            return Err(AppError::Validation(format!(
                "unknown voice model '{}', expected one of: {}",
                self.voice_model,
                VOICE_MODELS.join(", ")
            )));
        }
        if !LLM_MODELS.contains(&self.llm_model.as_str()) {
            return Err(AppError::Validation(format!(
                "unknown LLM model '{}', expected one of: {}",
                self.llm_model,
                LLM_MODELS.join(", ")
            )));
        }
        Ok(())
    }
}
