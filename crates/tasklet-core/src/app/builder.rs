//! DispatcherBuilder - handler の登録と TaskDispatcher の組み立て
//!
//! # Fail-fast 設計
//! - build() 時に「TaskName の全識別子 ⊆ 登録済み集合」をチェック
//! - 不足があれば BuildError を返す（実行時に UnknownTask 以外の未登録は起きない）

use std::sync::Arc;

use super::config::DispatcherConfig;
use super::dispatcher::TaskDispatcher;
use crate::domain::TaskName;
use crate::handlers::{ActionHandlerDispatch, CacheWarmer, MessageDispatch, ServiceManagerTrigger};
use crate::ports::{Collaborators, IdGenerator, SystemClock, UlidGenerator};
use crate::typed::{
    CampaignStartCacheTask, Handler, HandlerRegistry, QuestionResponseTask, RegistryError,
    SendMessageTask, ServiceManagerTriggerTask, TagUpdateTask, Task,
};

/// # 使用例
/// ```ignore
/// let dispatcher = DispatcherBuilder::new()
///     .with_default_handlers(&collaborators, &config)?
///     .build()?;
/// ```
pub struct DispatcherBuilder {
    registry: HandlerRegistry,
    ids: Option<Arc<dyn IdGenerator>>,
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Missing handlers for tasks: {0:?}. Every task identifier must have a handler.")]
    MissingHandlers(Vec<TaskName>),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl DispatcherBuilder {
    pub fn new() -> Self {
        Self {
            registry: HandlerRegistry::new(),
            ids: None,
        }
    }

    pub fn register<T: Task, H: Handler<T> + 'static>(
        mut self,
        handler: H,
    ) -> Result<Self, RegistryError> {
        self.registry.register::<T, H>(handler)?;
        Ok(self)
    }

    /// Register the standard handler for every task identifier.
    pub fn with_default_handlers(
        self,
        collaborators: &Collaborators,
        config: &DispatcherConfig,
    ) -> Result<Self, RegistryError> {
        let warmer = CacheWarmer::new(Arc::clone(&collaborators.cache));

        let mut trigger = ServiceManagerTrigger::new(
            Arc::clone(&collaborators.store),
            Arc::clone(&collaborators.cache),
            Arc::clone(&collaborators.notifier),
            Arc::clone(&collaborators.service_managers),
            config.campaign_start_event.clone(),
        );
        if config.warm_cache_on_campaign_start {
            trigger = trigger.with_warm_up(warmer.clone());
        }

        let actions = ActionHandlerDispatch::new(Arc::clone(&collaborators.action_handlers));
        let messages = MessageDispatch::new(
            Arc::clone(&collaborators.services),
            Arc::clone(&collaborators.service_managers),
            config.message_send_event.clone(),
        );

        self.register::<SendMessageTask, _>(messages)?
            .register::<QuestionResponseTask, _>(actions.clone())?
            .register::<TagUpdateTask, _>(actions)?
            .register::<CampaignStartCacheTask, _>(warmer)?
            .register::<ServiceManagerTriggerTask, _>(trigger)
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    pub fn build(self) -> Result<TaskDispatcher, BuildError> {
        let registered = self.registry.registered_names();
        let missing: Vec<TaskName> = TaskName::ALL
            .into_iter()
            .filter(|name| !registered.contains(name))
            .collect();
        if !missing.is_empty() {
            return Err(BuildError::MissingHandlers(missing));
        }

        let ids: Arc<dyn IdGenerator> = match self.ids {
            Some(ids) => ids,
            None => Arc::new(UlidGenerator::new(SystemClock)),
        };
        Ok(TaskDispatcher::new(Arc::new(self.registry), ids))
    }
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}
