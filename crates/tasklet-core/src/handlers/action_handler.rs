//! ActionHandlerDispatch - 名前で解決した action handler へのルーティング

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::domain::{DispatchError, Outcome};
use crate::ports::ActionHandlerRegistry;
use crate::typed::{Handler, QuestionResponseTask, TagUpdateTask};

/// Routes question-response and tag-update events to action handlers.
#[derive(Clone)]
pub struct ActionHandlerDispatch {
    registry: Arc<dyn ActionHandlerRegistry>,
}

impl ActionHandlerDispatch {
    pub fn new(registry: Arc<dyn ActionHandlerRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl Handler<QuestionResponseTask> for ActionHandlerDispatch {
    #[instrument(skip_all, fields(handler = %task.name, was_deleted = task.was_deleted))]
    async fn handle(&self, task: QuestionResponseTask) -> Result<Outcome, DispatchError> {
        let handler = self.registry.resolve(&task.name).await?;

        if !task.was_deleted {
            handler.process_action(&task.context).await?;
            return Ok(Outcome::success());
        }

        // 削除対応は任意 capability。持っていない handler では黙って捨てる
        match handler.deleted_response_handler() {
            Some(deleted) => {
                deleted
                    .process_deleted_question_response(&task.context)
                    .await?;
                Ok(Outcome::success())
            }
            None => {
                debug!("handler does not process deleted responses");
                Ok(Outcome::skipped(format!(
                    "{} does not process deleted responses",
                    task.name
                )))
            }
        }
    }
}

#[async_trait]
impl Handler<TagUpdateTask> for ActionHandlerDispatch {
    #[instrument(skip_all, fields(handler = %task.name, tags = task.tags.len()))]
    async fn handle(&self, task: TagUpdateTask) -> Result<Outcome, DispatchError> {
        let handler = self.registry.resolve(&task.name).await?;
        handler
            .on_tag_update(
                &task.tags,
                &task.contact,
                &task.campaign,
                &task.organization,
                &task.texter,
            )
            .await?;
        Ok(Outcome::success())
    }
}
