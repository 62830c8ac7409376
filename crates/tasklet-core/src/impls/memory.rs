//! In-memory collaborators - 開発用・テスト用のコラボレータ実装
//!
//! すべての実装は共有の `Journal` に呼ばれた順で記録を残すので、
//! cascade の順序や「副作用が起きなかったこと」を検証できます。

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::registry::NamedRegistry;
use crate::domain::{
    Attributes, Campaign, CampaignId, CollaboratorError, Contact, ContactId, MessageId,
    Notification, Organization, OrganizationId, Tag, Texter,
};
use crate::ports::{
    ActionContext, ActionHandler, CacheLayer, CampaignStore, Collaborators,
    DeletedResponseHandler, LoadOptions, MessageService, Notifier, OutboundMessage,
    PipelineResult, ServiceManagerPipeline,
};

/// One observed side effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recorded {
    OrganizationLoaded(OrganizationId),
    CampaignLoaded { id: CampaignId, forced: bool },
    AssignmentCacheUpdated(CampaignId),
    ContactsLoaded(CampaignId),
    OptOutsLoaded(OrganizationId),
    CampaignMarkedStarted(CampaignId),
    NotificationSent(Notification),
    PipelineProcessed {
        event: String,
        organization: Option<OrganizationId>,
    },
    ActionProcessed { handler: String, contact: ContactId },
    DeletedResponseProcessed { handler: String, contact: ContactId },
    TagsUpdated { handler: String, tags: Vec<String> },
    MessageSent { service: String, message: MessageId },
}

/// Append-only, shared log of side effects.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: Arc<Mutex<Vec<Recorded>>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record(&self, entry: Recorded) {
        self.entries.lock().await.push(entry);
    }

    pub async fn entries(&self) -> Vec<Recorded> {
        self.entries.lock().await.clone()
    }
}

// ========================================
// Store / Cache
// ========================================

pub struct InMemoryStore {
    journal: Journal,
    started: Mutex<HashSet<CampaignId>>,
}

impl InMemoryStore {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            started: Mutex::new(HashSet::new()),
        }
    }

    pub async fn is_started(&self, campaign_id: CampaignId) -> bool {
        self.started.lock().await.contains(&campaign_id)
    }
}

#[async_trait]
impl CampaignStore for InMemoryStore {
    async fn mark_campaign_started(
        &self,
        campaign_id: CampaignId,
    ) -> Result<(), CollaboratorError> {
        self.started.lock().await.insert(campaign_id);
        self.journal
            .record(Recorded::CampaignMarkedStarted(campaign_id))
            .await;
        Ok(())
    }
}

/// Cache operations that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheOp {
    Organization,
    Campaign,
    AssignmentCache,
    Contacts,
    OptOuts,
}

/// Cache layer that knows every entity by id and records each load.
pub struct InMemoryCache {
    journal: Journal,
    failing: HashSet<CacheOp>,
}

impl InMemoryCache {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            failing: HashSet::new(),
        }
    }

    pub fn failing_on(mut self, op: CacheOp) -> Self {
        self.failing.insert(op);
        self
    }

    /// A failing operation records nothing.
    fn check(&self, op: CacheOp) -> Result<(), CollaboratorError> {
        if self.failing.contains(&op) {
            return Err(CollaboratorError::failed(format!("{op:?} cache unavailable")));
        }
        Ok(())
    }
}

#[async_trait]
impl CacheLayer for InMemoryCache {
    async fn load_organization(
        &self,
        id: OrganizationId,
    ) -> Result<Organization, CollaboratorError> {
        self.check(CacheOp::Organization)?;
        self.journal.record(Recorded::OrganizationLoaded(id)).await;
        Ok(Organization::new(id))
    }

    async fn load_campaign(
        &self,
        id: CampaignId,
        options: LoadOptions,
    ) -> Result<Campaign, CollaboratorError> {
        self.check(CacheOp::Campaign)?;
        self.journal
            .record(Recorded::CampaignLoaded {
                id,
                forced: options.force_load,
            })
            .await;
        Ok(Campaign::new(id))
    }

    async fn update_campaign_assignment_cache(
        &self,
        campaign_id: CampaignId,
    ) -> Result<(), CollaboratorError> {
        self.check(CacheOp::AssignmentCache)?;
        self.journal
            .record(Recorded::AssignmentCacheUpdated(campaign_id))
            .await;
        Ok(())
    }

    async fn load_contacts_many(
        &self,
        campaign: &Campaign,
        _organization: &Organization,
        _context_vars: &Attributes,
    ) -> Result<(), CollaboratorError> {
        self.check(CacheOp::Contacts)?;
        self.journal
            .record(Recorded::ContactsLoaded(campaign.id))
            .await;
        Ok(())
    }

    async fn load_opt_outs_many(
        &self,
        organization_id: OrganizationId,
    ) -> Result<(), CollaboratorError> {
        self.check(CacheOp::OptOuts)?;
        self.journal
            .record(Recorded::OptOutsLoaded(organization_id))
            .await;
        Ok(())
    }
}

// ========================================
// Notifications / Service managers
// ========================================

pub struct RecordingNotifier {
    journal: Journal,
}

impl RecordingNotifier {
    pub fn new(journal: Journal) -> Self {
        Self { journal }
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, notification: Notification) -> Result<(), CollaboratorError> {
        self.journal
            .record(Recorded::NotificationSent(notification))
            .await;
        Ok(())
    }
}

/// Pipeline returning a fixed result per event name.
///
/// Events without a configured result get `PipelineResult::default()`.
pub struct StaticPipeline {
    journal: Journal,
    results: HashMap<String, PipelineResult>,
}

impl StaticPipeline {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            results: HashMap::new(),
        }
    }

    pub fn returning(mut self, event: impl Into<String>, result: PipelineResult) -> Self {
        self.results.insert(event.into(), result);
        self
    }
}

#[async_trait]
impl ServiceManagerPipeline for StaticPipeline {
    async fn process(
        &self,
        event: &str,
        organization: Option<&Organization>,
        _data: &Value,
    ) -> Result<PipelineResult, CollaboratorError> {
        self.journal
            .record(Recorded::PipelineProcessed {
                event: event.to_string(),
                organization: organization.map(|o| o.id),
            })
            .await;
        Ok(self.results.get(event).cloned().unwrap_or_default())
    }
}

// ========================================
// Extensions
// ========================================

pub struct RecordingActionHandler {
    name: String,
    journal: Journal,
    handles_deletions: bool,
}

impl RecordingActionHandler {
    pub fn new(name: impl Into<String>, journal: Journal) -> Self {
        Self {
            name: name.into(),
            journal,
            handles_deletions: false,
        }
    }

    /// Declare the optional deleted-response capability.
    pub fn handling_deletions(mut self) -> Self {
        self.handles_deletions = true;
        self
    }
}

#[async_trait]
impl ActionHandler for RecordingActionHandler {
    fn name(&self) -> &str {
        &self.name
    }

    async fn process_action(&self, context: &ActionContext) -> Result<(), CollaboratorError> {
        self.journal
            .record(Recorded::ActionProcessed {
                handler: self.name.clone(),
                contact: context.campaign_contact_id(),
            })
            .await;
        Ok(())
    }

    async fn on_tag_update(
        &self,
        tags: &[Tag],
        _contact: &Contact,
        _campaign: &Campaign,
        _organization: &Organization,
        _texter: &Texter,
    ) -> Result<(), CollaboratorError> {
        self.journal
            .record(Recorded::TagsUpdated {
                handler: self.name.clone(),
                tags: tags.iter().map(|t| t.name.clone()).collect(),
            })
            .await;
        Ok(())
    }

    fn deleted_response_handler(&self) -> Option<&dyn DeletedResponseHandler> {
        if self.handles_deletions {
            Some(self)
        } else {
            None
        }
    }
}

#[async_trait]
impl DeletedResponseHandler for RecordingActionHandler {
    async fn process_deleted_question_response(
        &self,
        context: &ActionContext,
    ) -> Result<(), CollaboratorError> {
        self.journal
            .record(Recorded::DeletedResponseProcessed {
                handler: self.name.clone(),
                contact: context.campaign_contact_id(),
            })
            .await;
        Ok(())
    }
}

pub struct RecordingMessageService {
    name: String,
    journal: Journal,
    sent: Mutex<Vec<OutboundMessage>>,
}

impl RecordingMessageService {
    pub fn new(name: impl Into<String>, journal: Journal) -> Self {
        Self {
            name: name.into(),
            journal,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub async fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl MessageService for RecordingMessageService {
    async fn send_message(&self, outbound: OutboundMessage) -> Result<(), CollaboratorError> {
        self.journal
            .record(Recorded::MessageSent {
                service: self.name.clone(),
                message: outbound.message.id,
            })
            .await;
        self.sent.lock().await.push(outbound);
        Ok(())
    }
}

/// Wire every port to an in-memory implementation sharing `journal`.
///
/// Registers the `fakeservice` outbound service and the `test-action`
/// action handler (which also handles deletions).
pub fn collaborators(journal: &Journal) -> Collaborators {
    let action_handlers = NamedRegistry::<dyn ActionHandler>::new().with(
        "test-action",
        Arc::new(RecordingActionHandler::new("test-action", journal.clone()).handling_deletions()),
    );
    let services = NamedRegistry::<dyn MessageService>::new().with(
        "fakeservice",
        Arc::new(RecordingMessageService::new("fakeservice", journal.clone())),
    );

    Collaborators {
        store: Arc::new(InMemoryStore::new(journal.clone())),
        cache: Arc::new(InMemoryCache::new(journal.clone())),
        notifier: Arc::new(RecordingNotifier::new(journal.clone())),
        service_managers: Arc::new(StaticPipeline::new(journal.clone())),
        action_handlers: Arc::new(action_handlers),
        services: Arc::new(services),
    }
}
