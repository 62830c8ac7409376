//! Outcome model: what a handler reports back through `dispatch`.
//!
//! Tasks are fire-and-forget, so callers are free to drop the outcome. It
//! exists to make the no-op branches (skipped cascade, dropped deletion) and
//! the best-effort warm-up observable without turning them into errors.

use serde::{Deserialize, Serialize};

/// We serialize as SCREAMING_SNAKE_CASE: SUCCESS / SKIPPED / DEGRADED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeKind {
    /// The handler ran all of its side effects.
    Success,

    /// A defined no-op branch was taken; nothing was changed.
    Skipped,

    /// The handler finished but a best-effort part of it failed and was
    /// swallowed.
    Degraded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub kind: OutcomeKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Outcome {
    pub fn success() -> Self {
        Self {
            kind: OutcomeKind::Success,
            reason: None,
        }
    }

    pub fn skipped(reason: impl Into<String>) -> Self {
        Self {
            kind: OutcomeKind::Skipped,
            reason: Some(reason.into()),
        }
    }

    pub fn degraded(reason: impl Into<String>) -> Self {
        Self {
            kind: OutcomeKind::Degraded,
            reason: Some(reason.into()),
        }
    }
}
