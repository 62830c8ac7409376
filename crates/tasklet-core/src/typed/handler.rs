//! Handler trait - Task を実行する Handler の定義
//!
//! - ジェネリック trait (Handler<T>)
//! - Object-safe trait (DynHandler)
//! - Type erasure パターン (TypedHandler<T, H> → DynHandler)

use async_trait::async_trait;
use std::marker::PhantomData;

use super::task::Task;
use crate::domain::{DispatchError, Outcome, TaskName};

/// Handler は Task を実行して Outcome を返す
///
/// `Handler<SendMessageTask>` は `SendMessageTask` しか受け取れないので、
/// 識別子と payload 型の対応はコンパイル時に保証されます。
#[async_trait]
pub trait Handler<T: Task>: Send + Sync {
    async fn handle(&self, task: T) -> Result<Outcome, DispatchError>;
}

/// DynHandler は object-safe な Handler の抽象化
///
/// TypedHandler<T, H> を DynHandler に変換することで、
/// HashMap<TaskName, Arc<dyn DynHandler>> に格納可能にします。
#[async_trait]
pub trait DynHandler: Send + Sync {
    async fn handle_dyn(&self, payload: serde_json::Value) -> Result<Outcome, DispatchError>;
    fn task_name(&self) -> TaskName;
}

pub struct TypedHandler<T: Task, H: Handler<T>> {
    handler: H,
    _marker: PhantomData<T>,
}

impl<T: Task, H: Handler<T>> TypedHandler<T, H> {
    pub fn new(handler: H) -> Self {
        Self {
            handler,
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<T: Task, H: Handler<T>> DynHandler for TypedHandler<T, H> {
    async fn handle_dyn(&self, payload: serde_json::Value) -> Result<Outcome, DispatchError> {
        let task: T = serde_json::from_value(payload).map_err(|source| {
            DispatchError::InvalidPayload {
                task: T::NAME,
                source,
            }
        })?;
        self.handler.handle(task).await
    }

    fn task_name(&self) -> TaskName {
        T::NAME
    }
}
