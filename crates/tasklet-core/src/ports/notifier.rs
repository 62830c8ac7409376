//! Notifier port - ユーザー向け通知の配信

use async_trait::async_trait;

use crate::domain::{CollaboratorError, Notification};

/// Delivery side of user notifications.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: Notification) -> Result<(), CollaboratorError>;
}
