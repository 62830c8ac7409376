//! Errors - dispatch とコラボレータのエラー型
//!
//! 伝播ポリシー:
//! - コラボレータ（store / cache / extension）の失敗は `Collaborator` として
//!   そのまま呼び出し元へ返す（ラップもリトライもしない）
//! - 握りつぶしてよいのは warm-up の contact load だけ（`SuppressedWarmupError`）

use serde_json::Value;
use thiserror::Error;

use super::ids::{CampaignId, MessageId};
use super::task_name::TaskName;

/// Failure reported by an external collaborator or extension.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("{0}")]
    Failed(String),
}

impl CollaboratorError {
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Error returned from `TaskDispatcher::dispatch`.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("task of type {0} not found")]
    UnknownTask(String),

    #[error("payload for task {task} could not be decoded: {source}")]
    InvalidPayload {
        task: TaskName,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to find service {service:?} for message {message_id}")]
    ServiceNotFound {
        message_id: MessageId,
        service: String,
    },

    /// `data.campaign` is present but carries no usable id.
    #[error("campaign reference in {event} has no usable id: {campaign}")]
    InvalidCampaignRef { event: String, campaign: Value },

    /// A spawned unit of work panicked or was cancelled before settling.
    #[error("{branch} aborted: {reason}")]
    BranchAborted { branch: &'static str, reason: String },

    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
}

/// Contact-load failure captured inside the cache warm-up.
///
/// Logged and reported on the outcome, never returned as an error.
#[derive(Debug, Error)]
#[error("contact load for {campaign_id} failed: {source}")]
pub struct SuppressedWarmupError {
    pub campaign_id: CampaignId,
    #[source]
    pub source: CollaboratorError,
}
