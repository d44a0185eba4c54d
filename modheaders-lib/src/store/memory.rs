use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{ModHeadersError, Result};
use crate::store::RuleStore;

/// In-process store, used by tests and embedders that persist elsewhere
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let inner = entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        Self { inner: RwLock::new(inner) }
    }
}

impl RuleStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let guard = self
            .inner
            .read()
            .map_err(|_| ModHeadersError::Store("memory store lock poisoned".into()))?;
        Ok(guard.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        let mut guard = self
            .inner
            .write()
            .map_err(|_| ModHeadersError::Store("memory store lock poisoned".into()))?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
