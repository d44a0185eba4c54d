use arc_swap::ArcSwap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::rewriter::{Header, Phase, RewriteStats};
use crate::rules::RuleSet;

/// State shared by the interception callbacks.
///
/// The rule set is swapped as a whole; a callback already running keeps the
/// set it loaded until it returns.
#[derive(Debug)]
pub struct RewriteContext {
    rules: ArcSwap<RuleSet>,
    running: AtomicBool,
}

impl Default for RewriteContext {
    fn default() -> Self {
        Self::new(RuleSet::default())
    }
}

impl RewriteContext {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules: ArcSwap::from_pointee(rules), running: AtomicBool::new(false) }
    }

    /// Snapshot of the current rule set
    pub fn rules(&self) -> Arc<RuleSet> {
        self.rules.load_full()
    }

    pub fn replace_rules(&self, rules: RuleSet) {
        self.rules.store(Arc::new(rules));
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Returns the previous value
    pub(crate) fn set_running(&self, running: bool) -> bool {
        self.running.swap(running, Ordering::AcqRel)
    }

    pub fn debug_mode(&self) -> bool {
        self.rules.load().debug_mode()
    }

    pub fn apply(&self, headers: &mut Vec<Header>, url: &str, phase: Phase) -> RewriteStats {
        self.rules.load().apply(headers, url, phase)
    }
}
