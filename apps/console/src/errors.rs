#![allow(dead_code)]

use thiserror::Error;

use crate::directory::DirectoryError;

/// Application-level error type surfaced to the operator as a notification.
///
/// No variant is fatal: directory errors are retried by the next poll tick or
/// an operator re-command, and validation errors are rejected before any
/// network call is made.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Directory service error: {0}")]
    Directory(#[from] DirectoryError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
