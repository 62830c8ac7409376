//! Ports - 外部コラボレータへのインターフェース
//!
//! このモジュールは Hexagonal Architecture の「ポート」を定義します。
//! task handler はストア・キャッシュ・通知・拡張レジストリに、
//! ここで定義した trait を通してのみアクセスします。

pub mod action_handler;
pub mod cache;
pub mod clock;
pub mod id_generator;
pub mod message_service;
pub mod notifier;
pub mod service_manager;
pub mod store;

use std::sync::Arc;

pub use self::action_handler::{
    ActionContext, ActionHandler, ActionHandlerRegistry, DeletedResponseHandler,
};
pub use self::cache::{CacheLayer, LoadOptions};
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::message_service::{MessageService, OutboundMessage, ServiceRegistry};
pub use self::notifier::Notifier;
pub use self::service_manager::{PipelineResult, ServiceManagerPipeline};
pub use self::store::CampaignStore;

/// Every collaborator the handler set needs, shared across dispatch calls.
#[derive(Clone)]
pub struct Collaborators {
    pub store: Arc<dyn CampaignStore>,
    pub cache: Arc<dyn CacheLayer>,
    pub notifier: Arc<dyn Notifier>,
    pub service_managers: Arc<dyn ServiceManagerPipeline>,
    pub action_handlers: Arc<dyn ActionHandlerRegistry>,
    pub services: Arc<dyn ServiceRegistry>,
}
