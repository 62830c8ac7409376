//! HandlerRegistry - TaskName から Handler への静的なマッピング
//!
//! - 起動時に組み立て（mutable）
//! - 組み立て後は Arc に入れて読み取り専用で共有（lock 不要）

use std::collections::HashMap;
use std::sync::Arc;

use super::handler::{DynHandler, Handler, TypedHandler};
use super::task::Task;
use crate::domain::TaskName;

pub struct HandlerRegistry {
    handlers: HashMap<TaskName, Arc<dyn DynHandler>>,
}

/// RegistryError は HandlerRegistry の操作エラー
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Handler for task '{0}' is already registered")]
    AlreadyRegistered(TaskName),
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    pub fn register<T: Task, H: Handler<T> + 'static>(
        &mut self,
        handler: H,
    ) -> Result<(), RegistryError> {
        if self.handlers.contains_key(&T::NAME) {
            return Err(RegistryError::AlreadyRegistered(T::NAME));
        }
        self.handlers
            .insert(T::NAME, Arc::new(TypedHandler::new(handler)));
        Ok(())
    }

    pub fn get(&self, name: TaskName) -> Option<Arc<dyn DynHandler>> {
        self.handlers.get(&name).cloned()
    }

    pub fn registered_names(&self) -> Vec<TaskName> {
        let mut names: Vec<TaskName> = self.handlers.keys().copied().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
