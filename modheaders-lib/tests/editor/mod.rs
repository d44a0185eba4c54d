
use std::sync::{Arc, Mutex};

use modheaders_lib::config::{to_json, ApplyOn, Config, RuleAction, StoredRule};
use modheaders_lib::engine::{Notifier, Signal};
use modheaders_lib::store::{MemoryStore, CONFIG_KEY};
use modheaders_lib::ModHeadersError;

#[derive(Clone, Default)]
struct Signals(Arc<Mutex<Vec<Signal>>>);

impl Notifier for Signals {
    fn send(&self, signal: Signal) -> modheaders_lib::Result<()> {
        if let Ok(mut sent) = self.0.lock() {
            sent.push(signal);
        }
        Ok(())
    }
}

impl Signals {
    fn taken(&self) -> Vec<Signal> {
        self.0.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

fn seeded_store() -> Result<Arc<MemoryStore>, ModHeadersError> {
    let config = Config {
        headers: vec![StoredRule::new("a", RuleAction::Add, "X-Seed", "1", ApplyOn::Request)],
        debug_mode: true,
        show_comments: false,
    };
    Ok(Arc::new(MemoryStore::with_entries([(CONFIG_KEY, to_json(&config)?)])))
}
