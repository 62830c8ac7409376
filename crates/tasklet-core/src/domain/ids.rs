//! Domain identifiers (strongly-typed IDs).
//!
//! 外部エンティティ（organization / campaign / contact / message ...）は
//! ストア側の整数 ID でしか参照しません。`Id<T>` は Phantom type パターンで
//! 「CampaignId と OrganizationId を混同できない」ことをコンパイル時に保証します。
//!
//! `DispatchId` だけは ULID ベースで、dispatch 呼び出し 1 回ごとのログ相関に使います。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use ulid::Ulid;

/// IdMarker は各 ID 型のマーカー trait
///
/// Display で使うプレフィックス（"campaign-", "org-" など）を提供します。
pub trait IdMarker: Send + Sync + 'static {
    fn prefix() -> &'static str;
}

/// Store-assigned identifier of an external entity.
///
/// Serialized as the bare integer so payloads stay wire-compatible with the
/// producers that enqueue tasks.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id<T: IdMarker> {
    value: i64,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    pub const fn new(value: i64) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }

    pub fn get(&self) -> i64 {
        self.value
    }
}

impl<T: IdMarker> From<i64> for Id<T> {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::prefix(), self.value)
    }
}

// ========================================
// マーカー型の定義
// ========================================

macro_rules! id_marker {
    ($(#[$meta:meta])* $marker:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $marker {}

        impl IdMarker for $marker {
            fn prefix() -> &'static str {
                $prefix
            }
        }
    };
}

id_marker!(
    /// Organization のマーカー型
    OrganizationMarker,
    "org-"
);
id_marker!(
    /// Campaign のマーカー型
    CampaignMarker,
    "campaign-"
);
id_marker!(
    /// CampaignContact のマーカー型
    ContactMarker,
    "contact-"
);
id_marker!(
    /// Message のマーカー型
    MessageMarker,
    "message-"
);
id_marker!(
    /// Texter (user) のマーカー型
    UserMarker,
    "user-"
);
id_marker!(
    /// InteractionStep のマーカー型
    InteractionStepMarker,
    "step-"
);

pub type OrganizationId = Id<OrganizationMarker>;
pub type CampaignId = Id<CampaignMarker>;
pub type ContactId = Id<ContactMarker>;
pub type MessageId = Id<MessageMarker>;
pub type UserId = Id<UserMarker>;
pub type InteractionStepId = Id<InteractionStepMarker>;

/// Identifier of one `dispatch` call, used only to correlate log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DispatchId(Ulid);

impl DispatchId {
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self(ulid)
    }

    pub fn as_ulid(&self) -> Ulid {
        self.0
    }
}

impl From<Ulid> for DispatchId {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl fmt::Display for DispatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dispatch-{}", self.0)
    }
}
