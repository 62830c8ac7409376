//! ActionHandler port - 名前で解決されるアクションハンドラ拡張
//!
//! 必須の capability（process_action / on_tag_update）と、
//! 任意の capability（削除された回答の処理）を持ちます。
//! 任意 capability は `deleted_response_handler()` で有無を問い合わせます。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::domain::{
    Campaign, CollaboratorError, Contact, ContactId, InteractionStep, Organization,
    QuestionResponse, Tag, Texter,
};

/// Everything an action handler sees about one question response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionContext {
    pub question_response: QuestionResponse,
    pub interaction_step: InteractionStep,
    pub contact: Contact,
    pub campaign: Campaign,
    pub organization: Organization,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_value: Option<Value>,
}

impl ActionContext {
    pub fn campaign_contact_id(&self) -> ContactId {
        self.contact.id
    }
}

#[async_trait]
pub trait ActionHandler: Send + Sync {
    fn name(&self) -> &str;

    async fn process_action(&self, context: &ActionContext) -> Result<(), CollaboratorError>;

    async fn on_tag_update(
        &self,
        tags: &[Tag],
        contact: &Contact,
        campaign: &Campaign,
        organization: &Organization,
        texter: &Texter,
    ) -> Result<(), CollaboratorError>;

    /// Optional capability: reacting to a question response being deleted.
    ///
    /// `None` means deletions are dropped for this handler.
    fn deleted_response_handler(&self) -> Option<&dyn DeletedResponseHandler> {
        None
    }
}

#[async_trait]
pub trait DeletedResponseHandler: Send + Sync {
    async fn process_deleted_question_response(
        &self,
        context: &ActionContext,
    ) -> Result<(), CollaboratorError>;
}

#[async_trait]
pub trait ActionHandlerRegistry: Send + Sync {
    /// Resolve a handler by name. Unknown or unavailable handlers are errors.
    async fn resolve(&self, name: &str) -> Result<Arc<dyn ActionHandler>, CollaboratorError>;
}
