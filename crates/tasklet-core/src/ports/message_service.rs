//! MessageService port - 送信チャネル（vendor）の抽象化

use async_trait::async_trait;
use std::sync::Arc;

use super::service_manager::PipelineResult;
use crate::domain::{Campaign, CollaboratorError, Contact, Message, Organization, ScopeHandle};

/// A send request after routing and enrichment.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundMessage {
    pub message: Message,
    pub contact: Contact,
    pub scope: Option<ScopeHandle>,
    pub organization: Organization,
    pub campaign: Campaign,
    /// Side-channel data returned by the `onMessageSend` service managers.
    pub service_manager_data: PipelineResult,
}

#[async_trait]
pub trait MessageService: Send + Sync {
    async fn send_message(&self, outbound: OutboundMessage) -> Result<(), CollaboratorError>;
}

pub trait ServiceRegistry: Send + Sync {
    fn resolve(&self, name: &str) -> Option<Arc<dyn MessageService>>;
}
