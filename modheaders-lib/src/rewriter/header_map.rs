use http::{HeaderMap, HeaderName, HeaderValue};
use tracing::{info, warn};

use crate::config::RuleAction;
use crate::rewriter::{Phase, RewriteStats};
use crate::rules::{CompiledRule, RuleSet};

/// Apply a rule set to an `http::HeaderMap`
///
/// Rules operate on the map in place. Entries no rule names keep their original
/// `HeaderValue`, opaque bytes included. A rule whose name or value cannot be
/// represented is skipped with a warning.
///
/// # Example
/// ```
/// use http::HeaderMap;
/// use modheaders_lib::config::{ApplyOn, Config, RuleAction, StoredRule};
/// use modheaders_lib::rewriter::{rewrite_header_map, Phase};
/// use modheaders_lib::rules::RuleSet;
///
/// let config = Config {
///     headers: vec![StoredRule::new(".*", RuleAction::Delete, "Server", "", ApplyOn::Response)],
///     ..Config::default()
/// };
/// let rules = RuleSet::compile(&config);
///
/// let mut headers = HeaderMap::new();
/// headers.insert("server", "nginx".parse().unwrap());
///
/// rewrite_header_map(&rules, &mut headers, "http://a.com/", Phase::Response);
/// assert!(headers.get("server").is_none());
/// ```
pub fn rewrite_header_map(
    rules: &RuleSet,
    headers: &mut HeaderMap,
    url: &str,
    phase: Phase,
) -> RewriteStats {
    let mut stats = RewriteStats::default();
    if rules.debug_mode {
        info!(phase = phase.describe(), %url, "Start modify headers");
    }

    for rule in rules.eligible(url, phase) {
        let Some(name) = parse_name(rule) else {
            continue;
        };
        match rule.action {
            RuleAction::Add => {
                let Some(value) = parse_value(rule) else {
                    continue;
                };
                if rules.debug_mode {
                    info!(
                        phase = phase.describe(),
                        name = %rule.header_name,
                        value = %rule.header_value,
                        %url,
                        "Add header"
                    );
                }
                headers.append(name, value);
                stats.added = stats.added.saturating_add(1);
            }
            RuleAction::Modify => {
                let count = headers.get_all(&name).iter().count();
                if count == 0 {
                    continue;
                }
                let Some(value) = parse_value(rule) else {
                    continue;
                };
                if rules.debug_mode {
                    info!(
                        phase = phase.describe(),
                        name = %rule.header_name,
                        new_value = %rule.header_value,
                        count,
                        %url,
                        "Modify header"
                    );
                }
                headers.remove(&name);
                for _ in 0..count {
                    headers.append(name.clone(), value.clone());
                }
                stats.modified = stats.modified.saturating_add(count as u64);
            }
            RuleAction::Delete => {
                let count = headers.get_all(&name).iter().count();
                if count == 0 {
                    continue;
                }
                if rules.debug_mode {
                    info!(
                        phase = phase.describe(),
                        name = %name,
                        count,
                        %url,
                        "Delete header"
                    );
                }
                headers.remove(&name);
                stats.removed = stats.removed.saturating_add(count as u64);
            }
        }
    }

    if rules.debug_mode {
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

fn parse_name(rule: &CompiledRule) -> Option<HeaderName> {
    HeaderName::from_bytes(rule.header_name.as_bytes())
        .map_err(|e| warn!(header = %rule.header_name, error = %e, "Failed to parse header name"))
        .ok()
}

fn parse_value(rule: &CompiledRule) -> Option<HeaderValue> {
    HeaderValue::from_str(&rule.header_value)
        .map_err(|e| {
            warn!(
                header = %rule.header_name,
                value = %rule.header_value,
                error = %e,
                "Failed to parse header value"
            )
        })
        .ok()
}
