//! Handlers - 各 task 識別子に束縛される handler の実装

pub mod action_handler;
pub mod cache_warmer;
pub mod message_dispatch;
pub mod service_manager_trigger;

pub use self::action_handler::ActionHandlerDispatch;
pub use self::cache_warmer::CacheWarmer;
pub use self::message_dispatch::MessageDispatch;
pub use self::service_manager_trigger::ServiceManagerTrigger;
