use regex::Regex;
use tracing::warn;

use crate::config::{ApplyOn, Config, RuleAction, RuleStatus, StoredRule};
use crate::rules::pattern::compile_pattern;

/// URL condition of a compiled rule
#[derive(Debug, Clone)]
pub enum UrlPattern {
    /// Empty stored pattern: reuse the active one from an earlier rule
    Inherit,
    /// Starts a new pattern group
    Regex(Regex),
    /// Stored pattern that failed to compile. Starts a group that never matches.
    Invalid,
}

/// A rule ready for the hot path
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub pattern: UrlPattern,
    pub action: RuleAction,
    pub header_name: String,
    pub header_value: String,
    pub apply_on: ApplyOn,
    pub enabled: bool,
}

impl CompiledRule {
    pub fn compile(rule: &StoredRule) -> Self {
        let source = rule.url_contains.as_str();
        let pattern = if source.is_empty() {
            UrlPattern::Inherit
        } else {
            match compile_pattern(source) {
                Ok(re) => UrlPattern::Regex(re),
                Err(e) => {
                    warn!(
                        pattern = %source,
                        error = %e,
                        "Skipping rule group with invalid URL pattern"
                    );
                    UrlPattern::Invalid
                }
            }
        };

        Self {
            pattern,
            action: rule.action,
            header_name: rule.header_name.clone(),
            header_value: rule.header_value.clone(),
            apply_on: rule.apply_on,
            enabled: rule.status == RuleStatus::On,
        }
    }
}

/// Immutable, ordered set of compiled rules plus the flags the rewriter needs
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    pub(crate) rules: Vec<CompiledRule>,
    pub(crate) debug_mode: bool,
}

impl RuleSet {
    /// Compile every stored rule once; called on load and on reload
    pub fn compile(config: &Config) -> Self {
        Self {
            rules: config.headers.iter().map(CompiledRule::compile).collect(),
            debug_mode: config.debug_mode,
        }
    }

    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn debug_mode(&self) -> bool {
        self.debug_mode
    }
}
