//! External entities as seen by the task handlers.
//!
//! Handlers never interpret these beyond their identifiers (and the message's
//! `service` name). Everything else the producer sent is kept in `attributes`
//! and handed back to collaborators untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ids::{CampaignId, ContactId, InteractionStepId, MessageId, OrganizationId, UserId};

/// Free-form fields carried alongside an entity id.
pub type Attributes = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: OrganizationId,
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl Organization {
    pub fn new(id: OrganizationId) -> Self {
        Self {
            id,
            attributes: Attributes::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: CampaignId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<OrganizationId>,
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl Campaign {
    pub fn new(id: CampaignId) -> Self {
        Self {
            id,
            organization_id: None,
            attributes: Attributes::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl Contact {
    pub fn new(id: ContactId) -> Self {
        Self {
            id,
            attributes: Attributes::new(),
        }
    }
}

/// An outbound message. `service` names the channel that must deliver it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub service: String,
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl Message {
    pub fn new(id: MessageId, service: impl Into<String>) -> Self {
        Self {
            id,
            service: service.into(),
            attributes: Attributes::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionStep {
    pub id: InteractionStepId,
    #[serde(flatten)]
    pub attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(flatten)]
    pub attributes: Attributes,
}

/// The user who was texting the contact when tags changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Texter {
    pub id: UserId,
    #[serde(flatten)]
    pub attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(flatten)]
    pub attributes: Attributes,
}

/// Opaque handle to the caller's storage scope (e.g. an open transaction).
///
/// Only outbound services interpret it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeHandle(String);

impl ScopeHandle {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}
