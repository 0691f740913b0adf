//! Bulk Action Dispatcher — validates and submits one batched call operation
//! (immediate or scheduled) against the current selection.
//!
//! Validation failures are rejected before any network call. A dispatch that
//! reaches the service is followed by a roster refresh regardless of the
//! outcome, so any partial server-side effect becomes visible via call
//! statuses. The dispatcher performs no deduplication: dispatching the same
//! selection twice produces two independent batches server-side (a documented
//! limitation of the product, not silently patched here).

use std::sync::Arc;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::{info, warn};

use crate::directory::{BatchCallRequest, DirectoryApi};
use crate::errors::AppError;
use crate::roster::RosterService;

/// Which conversation instructions a batch carries: the folder defaults, or
/// operator-supplied greeting and body text.
#[derive(Debug, Clone)]
pub enum InstructionPayload {
    UseDefault,
    Custom { greeting: String, body: String },
}

impl InstructionPayload {
    fn validate(&self) -> Result<(), AppError> {
        if let InstructionPayload::Custom { greeting, body } = self {
            if greeting.trim().is_empty() {
                return Err(AppError::Validation(
                    "custom greeting instruction must not be blank".into(),
                ));
            }
            if body.trim().is_empty() {
                return Err(AppError::Validation(
                    "custom conversation instruction must not be blank".into(),
                ));
            }
        }
        Ok(())
    }
}

pub struct CallDispatcher {
    directory: Arc<dyn DirectoryApi>,
    roster: Arc<RosterService>,
}

impl CallDispatcher {
    pub fn new(directory: Arc<dyn DirectoryApi>, roster: Arc<RosterService>) -> Self {
        Self { directory, roster }
    }

    /// Places immediate calls for the selection. Returns the number of users
    /// dispatched; the per-user outcome is the service's business and shows
    /// up as call statuses on later refreshes.
    pub async fn place_calls_now(
        &self,
        ids: &[String],
        instructions: &InstructionPayload,
    ) -> Result<usize, AppError> {
        validate_selection(ids)?;
        instructions.validate()?;

        let request = build_request(ids, instructions, None);
        let result = self.directory.batch_call(&request).await;
        if result.is_ok() {
            self.roster.mark_dispatched(ids).await;
            info!(count = ids.len(), "batch call dispatched");
        }
        self.refresh_after_dispatch().await;
        result?;
        Ok(ids.len())
    }

    /// Schedules calls for the selection at the given date and time, supplied
    /// separately by the operator and normalized to one absolute timestamp.
    pub async fn schedule_calls(
        &self,
        ids: &[String],
        instructions: &InstructionPayload,
        date: &str,
        time: &str,
    ) -> Result<String, AppError> {
        validate_selection(ids)?;
        instructions.validate()?;
        let schedule_time = combine_schedule(date, time, Local::now().naive_local())?;

        let request = build_request(ids, instructions, Some(schedule_time.clone()));
        let result = self.directory.schedule_batch_call(&request).await;
        if result.is_ok() {
            info!(count = ids.len(), at = %schedule_time, "batch call scheduled");
        }
        self.refresh_after_dispatch().await;
        result?;
        Ok(schedule_time)
    }

    /// Places one immediate call for a single user (the per-row phone button).
    pub async fn place_single_call(&self, user_id: &str) -> Result<(), AppError> {
        let result = self.directory.start_call(user_id).await;
        if result.is_ok() {
            self.roster.mark_dispatched(&[user_id.to_string()]).await;
            info!(user_id, "single call dispatched");
        }
        self.refresh_after_dispatch().await;
        result?;
        Ok(())
    }

    /// Refresh unconditionally after a dispatch attempt. A refresh failure
    /// here is only logged; the next poll tick covers it.
    async fn refresh_after_dispatch(&self) {
        if let Err(e) = self.roster.refresh().await {
            warn!(error = %e, "post-dispatch refresh failed");
        }
    }
}

fn validate_selection(ids: &[String]) -> Result<(), AppError> {
    if ids.is_empty() {
        return Err(AppError::Validation("select at least one user".into()));
    }
    Ok(())
}

fn build_request(
    ids: &[String],
    instructions: &InstructionPayload,
    schedule_time: Option<String>,
) -> BatchCallRequest {
    match instructions {
        InstructionPayload::UseDefault => BatchCallRequest {
            user_ids: ids.to_vec(),
            use_default: true,
            custom_greet_instruction: None,
            custom_instruction: None,
            schedule_time,
        },
        InstructionPayload::Custom { greeting, body } => BatchCallRequest {
            user_ids: ids.to_vec(),
            use_default: false,
            custom_greet_instruction: Some(greeting.clone()),
            custom_instruction: Some(body.clone()),
            schedule_time,
        },
    }
}

/// Combines operator-supplied date and time into the wire timestamp
/// `YYYY-MM-DDTHH:MM:SS`. The input is interpreted as local wall-clock time
/// and transmitted without a zone designator, matching what the service
/// expects from its web front end. Past instants are rejected; "now" is
/// allowed.
fn combine_schedule(date: &str, time: &str, now: NaiveDateTime) -> Result<String, AppError> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("invalid date '{date}', expected YYYY-MM-DD")))?;
    let time = NaiveTime::parse_from_str(time.trim(), "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time.trim(), "%H:%M:%S"))
        .map_err(|_| AppError::Validation(format!("invalid time '{time}', expected HH:MM")))?;
    let when = date.and_time(time);
    if when < now {
        return Err(AppError::Validation(format!(
            "schedule time {} is in the past",
            when.format("%Y-%m-%dT%H:%M:%S")
        )));
    }
    Ok(when.format("%Y-%m-%dT%H:%M:%S").to_string())
}
