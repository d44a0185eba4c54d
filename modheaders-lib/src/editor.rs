//! Producer side of the rule store: the operations a configuration front-end
//! performs on the rule table before handing it to the engine.

use std::path::Path;

use tracing::{debug, info};

use crate::config::{
    from_json, parse_import, to_json, validate, ApplyOn, Config, RuleAction, RuleStatus,
    RunningState, StoredRule,
};
use crate::engine::{Notifier, Signal};
use crate::error::{ModHeadersError, Result};
use crate::store::{RuleStore, CONFIG_KEY, STARTED_KEY};

/// Editable copy of the configuration plus the running flag
pub struct ConfigEditor<S, N> {
    store: S,
    notifier: N,
    rules: Vec<StoredRule>,
    debug_mode: bool,
    show_comments: bool,
    running: RunningState,
}

impl<S: RuleStore, N: Notifier> ConfigEditor<S, N> {
    /// Load the table from the store. A missing configuration opens an empty table.
    pub fn open(store: S, notifier: N) -> Result<Self> {
        let config = match store.load(CONFIG_KEY)? {
            Some(txt) => from_json(&txt)?,
            None => Config::default(),
        };
        let running = store
            .load(STARTED_KEY)?
            .as_deref()
            .and_then(RunningState::parse)
            .unwrap_or_default();

        let mut editor = Self {
            store,
            notifier,
            rules: Vec::new(),
            debug_mode: false,
            show_comments: true,
            running,
        };
        editor.replace_table(config);
        Ok(editor)
    }

    pub fn rules(&self) -> &[StoredRule] {
        &self.rules
    }

    pub fn debug_mode(&self) -> bool {
        self.debug_mode
    }

    pub fn show_comments(&self) -> bool {
        self.show_comments
    }

    pub fn running(&self) -> RunningState {
        self.running
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn set_debug_mode(&mut self, enabled: bool) {
        self.debug_mode = enabled;
    }

    pub fn set_show_comments(&mut self, enabled: bool) {
        self.show_comments = enabled;
    }

    pub fn append_rule(&mut self, rule: StoredRule) -> usize {
        self.rules.push(rule);
        self.rules.len() - 1
    }

    /// Append the blank line a new row starts with: inherit pattern, add, request, on
    pub fn append_default_rule(&mut self) -> usize {
        self.append_rule(StoredRule::new("", RuleAction::Add, "", "", ApplyOn::Request))
    }

    pub fn set_rule(&mut self, index: usize, rule: StoredRule) -> Result<()> {
        let len = self.rules.len();
        let slot = self
            .rules
            .get_mut(index)
            .ok_or(ModHeadersError::LineOutOfRange { index, len })?;
        *slot = rule;
        Ok(())
    }

    /// Remove a line; following lines move up by one
    pub fn delete_rule(&mut self, index: usize) -> Result<StoredRule> {
        if index >= self.rules.len() {
            return Err(ModHeadersError::LineOutOfRange { index, len: self.rules.len() });
        }
        Ok(self.rules.remove(index))
    }

    /// Exchange two lines. Returns `false` and changes nothing when either is out of range.
    pub fn swap_rules(&mut self, a: usize, b: usize) -> bool {
        if a >= self.rules.len() || b >= self.rules.len() {
            return false;
        }
        self.rules.swap(a, b);
        true
    }

    pub fn toggle_status(&mut self, index: usize) -> Result<RuleStatus> {
        let len = self.rules.len();
        let rule = self
            .rules
            .get_mut(index)
            .ok_or(ModHeadersError::LineOutOfRange { index, len })?;
        rule.status = rule.status.toggled();
        Ok(rule.status)
    }

    /// Snapshot of the table as a configuration: text fields trimmed, patterns validated
    pub fn build_configuration(&self) -> Result<Config> {
        let headers = self
            .rules
            .iter()
            .map(|rule| StoredRule {
                url_contains: rule.url_contains.trim().to_string(),
                action: rule.action,
                header_name: rule.header_name.trim().to_string(),
                header_value: rule.header_value.trim().to_string(),
                comment: rule.comment.trim().to_string(),
                apply_on: rule.apply_on,
                status: rule.status,
            })
            .collect();
        let config =
            Config { headers, debug_mode: self.debug_mode, show_comments: self.show_comments };
        validate(&config)?;
        Ok(config)
    }

    /// Persist the table and ask the engine to reload.
    /// Nothing is written when a pattern is invalid.
    pub fn save(&mut self) -> Result<Config> {
        let config = self.build_configuration()?;
        self.store.save(CONFIG_KEY, &to_json(&config)?)?;
        self.notifier.send(Signal::Reload)?;
        info!(rules = config.headers.len(), "Configuration saved");
        Ok(config)
    }

    /// Validated export text
    pub fn export(&self) -> Result<String> {
        to_json(&self.build_configuration()?)
    }

    pub fn export_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let txt = self.export()?;
        std::fs::write(path.as_ref(), txt)?;
        debug!(path = %path.as_ref().display(), "Configuration exported");
        Ok(())
    }

    /// Replace the configuration with an imported one.
    /// Unparseable input leaves both the store and the table untouched.
    pub fn import(&mut self, text: &str) -> Result<()> {
        let config = parse_import(text)?;
        self.store.save(CONFIG_KEY, &to_json(&config)?)?;
        self.notifier.send(Signal::Reload)?;
        info!(rules = config.headers.len(), "Configuration imported");
        self.replace_table(config);
        Ok(())
    }

    pub fn import_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let txt = std::fs::read_to_string(path)?;
        self.import(&txt)
    }

    /// Drop every rule, keeping the display and debug flags
    pub fn delete_all(&mut self) -> Result<()> {
        let config = Config {
            headers: Vec::new(),
            debug_mode: self.debug_mode,
            show_comments: self.show_comments,
        };
        self.store.save(CONFIG_KEY, &to_json(&config)?)?;
        self.notifier.send(Signal::Reload)?;
        self.rules.clear();
        Ok(())
    }

    /// Start (saving first) or stop header modification
    pub fn toggle_running(&mut self) -> Result<RunningState> {
        match self.running {
            RunningState::Off => self.set_running(RunningState::On),
            RunningState::On => self.set_running(RunningState::Off),
        }
    }

    pub fn set_running(&mut self, state: RunningState) -> Result<RunningState> {
        if state == RunningState::On {
            self.save()?;
        }
        self.store.save(STARTED_KEY, state.as_str())?;
        let signal = match state {
            RunningState::On => Signal::On,
            RunningState::Off => Signal::Off,
        };
        self.notifier.send(signal)?;
        self.running = state;
        Ok(state)
    }

    fn replace_table(&mut self, config: Config) {
        self.rules = config.headers;
        self.debug_mode = config.debug_mode;
        self.show_comments = config.show_comments;
    }
}
