use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::config::{from_json, to_json, Config, RunningState};
use crate::engine::signal::{Notifier, Signal};
use crate::engine::{InterceptionHost, RewriteContext};
use crate::error::Result;
use crate::rules::RuleSet;
use crate::store::{RuleStore, CONFIG_KEY, STARTED_KEY};

/// Owns the rewrite context and drives its lifecycle.
///
/// Two states, `off` and `on`: `on` means both listeners are registered with the
/// host. A reload swaps the rule set in either state.
pub struct Controller<S, H> {
    store: S,
    host: H,
    context: Arc<RewriteContext>,
}

impl<S: RuleStore, H: InterceptionHost> Controller<S, H> {
    /// Load the stored configuration and running flag, seeding defaults on first run
    pub fn start(store: S, host: H) -> Result<Self> {
        let controller = Self { store, host, context: Arc::new(RewriteContext::default()) };

        let running = match controller.store.load(CONFIG_KEY)? {
            None => {
                controller.seed_default_configuration()?;
                RunningState::Off
            }
            Some(txt) => {
                controller.install(&txt);
                controller.stored_running_state()?
            }
        };

        if running == RunningState::On {
            controller.attach();
        }

        info!(
            rules = controller.context.rules().len(),
            running = %running,
            "Header rewriter initialized"
        );
        Ok(controller)
    }

    pub fn context(&self) -> &Arc<RewriteContext> {
        &self.context
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn running_state(&self) -> RunningState {
        if self.context.is_running() {
            RunningState::On
        } else {
            RunningState::Off
        }
    }

    /// Handle one notification
    pub fn notify(&self, signal: Signal) -> Result<()> {
        match signal {
            Signal::Reload => {
                if self.context.debug_mode() {
                    info!("Reload configuration");
                }
                match self.store.load(CONFIG_KEY)? {
                    Some(txt) => self.install(&txt),
                    None => warn!("Reload requested but no configuration is stored"),
                }
            }
            Signal::Off => {
                self.detach();
                if self.context.debug_mode() {
                    info!("Stop modifying headers");
                }
            }
            Signal::On => {
                self.attach();
                if self.context.debug_mode() {
                    info!("Start modifying headers");
                }
            }
        }
        Ok(())
    }

    /// Drain signals until every sender is dropped
    pub async fn run_signal_loop(&self, mut rx: mpsc::UnboundedReceiver<Signal>) {
        while let Some(signal) = rx.recv().await {
            debug!(%signal, "Received signal");
            if let Err(e) = self.notify(signal) {
                error!(%signal, error = %e, "Failed to handle signal");
            }
        }
        debug!("Signal channel closed");
    }

    fn seed_default_configuration(&self) -> Result<()> {
        info!("Load default config");
        let config = Config::with_example_rules();
        self.store.save(STARTED_KEY, RunningState::Off.as_str())?;
        self.store.save(CONFIG_KEY, &to_json(&config)?)?;
        self.context.replace_rules(RuleSet::compile(&config));
        Ok(())
    }

    fn stored_running_state(&self) -> Result<RunningState> {
        let raw = self.store.load(STARTED_KEY)?;
        match raw.as_deref().and_then(RunningState::parse) {
            Some(state) => Ok(state),
            None => {
                debug!(stored = ?raw, "Normalizing running flag to off");
                self.store.save(STARTED_KEY, RunningState::Off.as_str())?;
                Ok(RunningState::Off)
            }
        }
    }

    /// Compile and publish a stored configuration; a malformed blob keeps the current rules
    fn install(&self, txt: &str) {
        match from_json(txt) {
            Ok(config) => {
                let rules = RuleSet::compile(&config);
                debug!(rules = rules.len(), debug_mode = rules.debug_mode(), "Rules compiled");
                self.context.replace_rules(rules);
            }
            Err(e) => {
                warn!(error = %e, "Stored configuration is malformed, keeping current rules");
            }
        }
    }

    fn attach(&self) {
        if !self.context.set_running(true) {
            self.host.add_listeners(Arc::clone(&self.context));
        }
    }

    fn detach(&self) {
        if self.context.set_running(false) {
            self.host.remove_listeners();
        }
    }
}

impl<S: RuleStore, H: InterceptionHost> Notifier for Controller<S, H> {
    fn send(&self, signal: Signal) -> Result<()> {
        self.notify(signal)
    }
}
