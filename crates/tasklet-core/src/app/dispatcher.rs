//! TaskDispatcher - task 識別子 + payload を受け取る唯一の入口
//!
//! 登録済み handler を引いて実行し、その結果（成功・失敗）をそのまま返します。
//! リトライ・タイムアウト・隔離は一切しません。上限時間が必要なら
//! 呼び出し側が `tokio::time::timeout` で包むこと。

use serde_json::Value;
use std::sync::Arc;
use tracing::{Instrument, debug, info_span, warn};

use super::builder::{BuildError, DispatcherBuilder};
use super::config::DispatcherConfig;
use crate::domain::{DispatchError, Outcome, TaskName};
use crate::ports::{Collaborators, IdGenerator};
use crate::typed::{HandlerRegistry, Task};

/// Cheap to clone; clones share the same frozen handler table.
#[derive(Clone)]
pub struct TaskDispatcher {
    registry: Arc<HandlerRegistry>,
    ids: Arc<dyn IdGenerator>,
}

impl TaskDispatcher {
    pub(crate) fn new(registry: Arc<HandlerRegistry>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { registry, ids }
    }

    /// Dispatcher with the standard handler set over `collaborators`.
    pub fn from_collaborators(
        collaborators: &Collaborators,
        config: &DispatcherConfig,
    ) -> Result<Self, BuildError> {
        Ok(DispatcherBuilder::new()
            .with_default_handlers(collaborators, config)?
            .build()?)
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Run the handler bound to `task` with `payload`.
    ///
    /// Fails with `UnknownTask` (and does nothing) for identifiers outside
    /// the closed set.
    pub async fn dispatch(&self, task: &str, payload: Value) -> Result<Outcome, DispatchError> {
        let name: TaskName = match task.parse() {
            Ok(name) => name,
            Err(err) => {
                warn!(task, "rejected unknown task");
                return Err(err);
            }
        };
        let handler = self
            .registry
            .get(name)
            .ok_or_else(|| DispatchError::UnknownTask(task.to_string()))?;

        let dispatch_id = self.ids.generate_dispatch_id();
        let span = info_span!("dispatch", task = %name, %dispatch_id);
        async move {
            debug!("dispatching task");
            let result = handler.handle_dyn(payload).await;
            match &result {
                Ok(outcome) => debug!(outcome = ?outcome.kind, "task finished"),
                Err(err) => warn!(error = %err, "task failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    /// Typed entry point: serializes `task` and dispatches it under `T::NAME`.
    pub async fn dispatch_task<T: Task>(&self, task: T) -> Result<Outcome, DispatchError> {
        let payload = serde_json::to_value(&task).map_err(|source| {
            DispatchError::InvalidPayload {
                task: T::NAME,
                source,
            }
        })?;
        self.dispatch(T::NAME.as_str(), payload).await
    }
}
