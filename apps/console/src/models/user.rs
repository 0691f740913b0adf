use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Call status as reported by the directory service.
///
/// These are opaque display labels: the service owns the lifecycle and the
/// console never enforces any transition ordering among them. Values the
/// service adds later deserialize as `Unknown` instead of failing the whole
/// roster fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CallStatus {
    #[default]
    NotCalled,
    Pending,
    Completed,
    Busy,
    Failed,
    NoAnswer,
    #[serde(other)]
    Unknown,
}

impl CallStatus {
    pub fn label(&self) -> &'static str {
        match self {
            CallStatus::NotCalled => "not-called",
            CallStatus::Pending => "pending",
            CallStatus::Completed => "completed",
            CallStatus::Busy => "busy",
            CallStatus::Failed => "failed",
            CallStatus::NoAnswer => "no-answer",
            CallStatus::Unknown => "unknown",
        }
    }
}

/// Speaker role tag on a transcription turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Assistant,
    User,
    #[serde(other)]
    Unknown,
}

impl Speaker {
    pub fn label(&self) -> &'static str {
        match self {
            Speaker::Assistant => "assistant",
            Speaker::User => "candidate",
            Speaker::Unknown => "unknown",
        }
    }
}

/// One turn of a call transcription. Append-only server-side; the client
/// replaces the whole sequence on every refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptTurn {
    pub role: Speaker,
    pub content: String,
}

/// A candidate record mirrored read-only from the directory service.
///
/// Local copies are ephemeral: rebuilt wholesale on every synchronization
/// cycle, with no identity beyond what the service returned in that cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub folder_id: Option<String>,
    /// Default conversation instruction inherited from the folder.
    #[serde(default)]
    pub instruction: String,
    /// When false, the custom greet/body instructions below apply instead.
    #[serde(default = "default_true")]
    pub use_default: bool,
    #[serde(default)]
    pub custom_greet_instruction: String,
    #[serde(default)]
    pub custom_instruction: String,
    #[serde(default)]
    pub call_status: CallStatus,
    #[serde(default)]
    pub schedule_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub transcription: Vec<TranscriptTurn>,
}

pub(crate) fn default_true() -> bool {
    true
}

/// Payload for user create/update. `user_id` is absent on create and set on
/// update, matching the directory service's two endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct UserDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
}
