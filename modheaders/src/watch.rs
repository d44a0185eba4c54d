use std::collections::BTreeSet;
use std::time::Duration;

use modheaders_lib::config::RunningState;
use modheaders_lib::engine::{ChannelNotifier, Notifier, Signal};
use modheaders_lib::store::{CONFIG_KEY, STARTED_KEY};
use modheaders_lib::{FileStore, ModHeadersError, Result, RuleStore};
use notify::{recommended_watcher, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Turns writes to the store directory into engine signals:
/// `config` → reload, `started` → on/off.
pub struct StoreWatcher {
    _watcher: RecommendedWatcher,
    task: JoinHandle<()>,
}

impl StoreWatcher {
    pub fn spawn(store: FileStore, notifier: ChannelNotifier, debounce_ms: u64) -> Result<Self> {
        std::fs::create_dir_all(store.root())?;

        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        let mut watcher = recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
                    return;
                }
                for path in &event.paths {
                    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                        continue;
                    };
                    let watched = name == CONFIG_KEY || name == STARTED_KEY;
                    if watched && tx.send(name.to_string()).is_err() {
                        return;
                    }
                }
            }
            Err(e) => warn!(error = %e, "Store watch error"),
        })
        .map_err(|e| ModHeadersError::Watch(format!("Failed to create watcher: {e}")))?;

        watcher
            .watch(store.root(), RecursiveMode::NonRecursive)
            .map_err(|e| {
                ModHeadersError::Watch(format!("Failed to watch {}: {e}", store.root().display()))
            })?;

        info!(path = %store.root().display(), debounce_ms, "Watching store for changes");

        let debounce = Duration::from_millis(debounce_ms);
        let task = tokio::spawn(async move {
            while let Some(first) = rx.recv().await {
                let mut touched = BTreeSet::from([first]);
                while let Ok(Some(key)) = tokio::time::timeout(debounce, rx.recv()).await {
                    touched.insert(key);
                }

                for key in touched {
                    let Some(signal) = signal_for(&store, &key) else {
                        continue;
                    };
                    debug!(%key, %signal, "Store changed");
                    if let Err(e) = notifier.send(signal) {
                        error!(error = %e, "Engine stopped listening, ending store watch");
                        return;
                    }
                }
            }
        });

        Ok(Self { _watcher: watcher, task })
    }
}

impl Drop for StoreWatcher {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn signal_for(store: &FileStore, key: &str) -> Option<Signal> {
    if key == CONFIG_KEY {
        return Some(Signal::Reload);
    }
    match store.load(STARTED_KEY) {
        Ok(Some(raw)) => match RunningState::parse(&raw)? {
            RunningState::On => Some(Signal::On),
            RunningState::Off => Some(Signal::Off),
        },
        Ok(None) => None,
        Err(e) => {
            warn!(error = %e, "Unable to read running flag");
            None
        }
    }
}
