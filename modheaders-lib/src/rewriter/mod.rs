pub mod header_map;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{ApplyOn, RuleAction};
use crate::rules::{CompiledRule, RuleSet, UrlPattern};

pub use header_map::rewrite_header_map;

/// Which header collection an intercepted event carries
pub type Phase = ApplyOn;

/// One header entry as offered by the host
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: value.into() }
    }

    fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// Counters for one rewrite pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteStats {
    pub added: u64,
    pub modified: u64,
    pub removed: u64,
}

impl RewriteStats {
    pub fn is_noop(&self) -> bool {
        self.added == 0 && self.modified == 0 && self.removed == 0
    }
}

/// Walks the rule list tracking the pattern group each rule belongs to
pub(crate) struct Eligible<'a> {
    rules: std::slice::Iter<'a, CompiledRule>,
    url: &'a str,
    phase: Phase,
    active: Option<&'a Regex>,
    // match result of `active` against the url, evaluated at most once per group
    active_matches: Option<bool>,
}

impl<'a> Iterator for Eligible<'a> {
    type Item = &'a CompiledRule;

    fn next(&mut self) -> Option<Self::Item> {
        for rule in self.rules.by_ref() {
            match &rule.pattern {
                UrlPattern::Inherit => {}
                UrlPattern::Regex(re) => {
                    self.active = Some(re);
                    self.active_matches = None;
                }
                UrlPattern::Invalid => {
                    self.active = None;
                    self.active_matches = None;
                }
            }

            if !rule.enabled || rule.apply_on != self.phase {
                continue;
            }
            let Some(re) = self.active else {
                continue;
            };
            let url = self.url;
            if *self.active_matches.get_or_insert_with(|| re.is_match(url)) {
                return Some(rule);
            }
        }
        None
    }
}

impl RuleSet {
    /// Apply every eligible rule, in order, to `headers`.
    ///
    /// A rule is eligible when it is enabled, targets `phase`, and the pattern of its
    /// group matches `url`. Later rules see the effects of earlier ones.
    pub fn apply(&self, headers: &mut Vec<Header>, url: &str, phase: Phase) -> RewriteStats {
        let mut stats = RewriteStats::default();
        if self.debug_mode {
            info!(phase = phase.describe(), %url, "Start modify headers");
        }

        for rule in self.eligible(url, phase) {
            self.apply_rule(rule, headers, url, phase, &mut stats);
        }

        if self.debug_mode {
            info!(
                phase = phase.describe(),
                %url,
                added = stats.added,
                modified = stats.modified,
                removed = stats.removed,
                "End modify headers"
            );
        }
        stats
    }

    /// Rules that fire for `url` in `phase`, in order
    pub(crate) fn eligible<'a>(&'a self, url: &'a str, phase: Phase) -> Eligible<'a> {
        Eligible { rules: self.rules.iter(), url, phase, active: None, active_matches: None }
    }

    /// Rewrite an owned header list and hand it back
    pub fn rewrite(&self, mut headers: Vec<Header>, url: &str, phase: Phase) -> Vec<Header> {
        self.apply(&mut headers, url, phase);
        headers
    }

    fn apply_rule(
        &self,
        rule: &CompiledRule,
        headers: &mut Vec<Header>,
        url: &str,
        phase: Phase,
        stats: &mut RewriteStats,
    ) {
        match rule.action {
            RuleAction::Add => {
                if self.debug_mode {
                    info!(
                        phase = phase.describe(),
                        name = %rule.header_name,
                        value = %rule.header_value,
                        %url,
                        "Add header"
                    );
                }
                headers.push(Header::new(rule.header_name.clone(), rule.header_value.clone()));
                stats.added = stats.added.saturating_add(1);
            }
            RuleAction::Modify => {
                for header in headers.iter_mut().filter(|h| h.is_named(&rule.header_name)) {
                    if self.debug_mode {
                        info!(
                            phase = phase.describe(),
                            name = %rule.header_name,
                            old_value = %header.value,
                            new_value = %rule.header_value,
                            %url,
                            "Modify header"
                        );
                    }
                    header.value.clone_from(&rule.header_value);
                    stats.modified = stats.modified.saturating_add(1);
                }
            }
            RuleAction::Delete => {
                let before = headers.len();
                headers.retain(|h| !h.is_named(&rule.header_name));
                let removed = (before - headers.len()) as u64;
                if self.debug_mode && removed > 0 {
                    info!(
                        phase = phase.describe(),
                        name = %rule.header_name.to_lowercase(),
                        count = removed,
                        %url,
                        "Delete header"
                    );
                }
                stats.removed = stats.removed.saturating_add(removed);
            }
        }
    }
}
