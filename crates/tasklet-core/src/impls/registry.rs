//! NamedRegistry - 名前 → 拡張実装 の読み取り専用マップ
//!
//! action handler と送信サービスの両方のレジストリとして使えます。
//! 組み立て後は変更しない前提なので lock は持ちません。

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::CollaboratorError;
use crate::ports::{ActionHandler, ActionHandlerRegistry, MessageService, ServiceRegistry};

pub struct NamedRegistry<T: ?Sized> {
    entries: HashMap<String, Arc<T>>,
}

impl<T: ?Sized> NamedRegistry<T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Builder-style insert. A later entry with the same name wins.
    pub fn with(mut self, name: impl Into<String>, entry: Arc<T>) -> Self {
        self.insert(name, entry);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, entry: Arc<T>) {
        self.entries.insert(name.into(), entry);
    }

    pub fn get(&self, name: &str) -> Option<Arc<T>> {
        self.entries.get(name).cloned()
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }
}

impl<T: ?Sized> Default for NamedRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ActionHandlerRegistry for NamedRegistry<dyn ActionHandler> {
    async fn resolve(&self, name: &str) -> Result<Arc<dyn ActionHandler>, CollaboratorError> {
        self.get(name)
            .ok_or_else(|| CollaboratorError::not_found("action handler", name))
    }
}

impl ServiceRegistry for NamedRegistry<dyn MessageService> {
    fn resolve(&self, name: &str) -> Option<Arc<dyn MessageService>> {
        self.get(name)
    }
}
