//! tasklet-core
//!
//! Named-task dispatcher for fire-and-forget background work.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, entities, task_name, outcome, errors, notification）
//! - **ports**: 外部コラボレータの抽象化（CacheLayer, CampaignStore, Notifier, 拡張レジストリ など）
//! - **typed**: 型付き Task API（Task trait, Handler trait, HandlerRegistry）
//! - **handlers**: 各 task の handler（CacheWarmer, ServiceManagerTrigger, ActionHandlerDispatch, MessageDispatch）
//! - **app**: DispatcherBuilder / TaskDispatcher / DispatcherConfig
//! - **impls**: 実装（NamedRegistry, in-memory コラボレータ）

pub mod app;
pub mod domain;
pub mod handlers;
pub mod impls;
pub mod ports;
pub mod typed;

pub use app::{DispatcherBuilder, DispatcherConfig, TaskDispatcher};
pub use domain::{DispatchError, Outcome, OutcomeKind, TaskName};
