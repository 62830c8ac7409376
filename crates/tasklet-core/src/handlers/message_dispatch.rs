//! MessageDispatch - message.service で送信チャネルを選び、送信要求を転送する
//!
//! 転送前に `onMessageSend` の service manager を通し、その結果を
//! side-channel データとしてチャネルに渡します。配送結果には関与しません。

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tracing::instrument;

use crate::domain::{DispatchError, Outcome};
use crate::ports::{OutboundMessage, ServiceManagerPipeline, ServiceRegistry};
use crate::typed::{Handler, SendMessageTask};

pub struct MessageDispatch {
    services: Arc<dyn ServiceRegistry>,
    service_managers: Arc<dyn ServiceManagerPipeline>,
    message_send_event: String,
}

impl MessageDispatch {
    pub fn new(
        services: Arc<dyn ServiceRegistry>,
        service_managers: Arc<dyn ServiceManagerPipeline>,
        message_send_event: impl Into<String>,
    ) -> Self {
        Self {
            services,
            service_managers,
            message_send_event: message_send_event.into(),
        }
    }
}

#[async_trait]
impl Handler<SendMessageTask> for MessageDispatch {
    #[instrument(skip_all, fields(message_id = %task.message.id, service = %task.message.service))]
    async fn handle(&self, task: SendMessageTask) -> Result<Outcome, DispatchError> {
        let service = self.services.resolve(&task.message.service).ok_or_else(|| {
            DispatchError::ServiceNotFound {
                message_id: task.message.id,
                service: task.message.service.clone(),
            }
        })?;

        let event_data = json!({
            "message": task.message,
            "contact": task.contact,
            "campaign": task.campaign,
        });
        let service_manager_data = self
            .service_managers
            .process(
                &self.message_send_event,
                Some(&task.organization),
                &event_data,
            )
            .await?;

        service
            .send_message(OutboundMessage {
                message: task.message,
                contact: task.contact,
                scope: task.trx,
                organization: task.organization,
                campaign: task.campaign,
                service_manager_data,
            })
            .await?;
        Ok(Outcome::success())
    }
}
