mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::Result;

/// Key holding the configuration JSON
pub const CONFIG_KEY: &str = "config";
/// Key holding the running flag (`on` / `off`)
pub const STARTED_KEY: &str = "started";

/// Host-owned key-value persistence; values are opaque text
pub trait RuleStore: Send + Sync {
    /// Returns `None` when the key was never written
    fn load(&self, key: &str) -> Result<Option<String>>;

    fn save(&self, key: &str, value: &str) -> Result<()>;
}

impl<S: RuleStore + ?Sized> RuleStore for std::sync::Arc<S> {
    fn load(&self, key: &str) -> Result<Option<String>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        (**self).save(key, value)
    }
}
