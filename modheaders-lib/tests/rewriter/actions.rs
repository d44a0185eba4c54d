use modheaders_lib::config::{ApplyOn, RuleAction, RuleStatus, StoredRule};
use modheaders_lib::rewriter::Phase;

use super::{compile, headers};

#[test]
fn test_disabled_rule_never_applies() {
    let actions = [RuleAction::Add, RuleAction::Modify, RuleAction::Delete];
    for action in actions {
        let rules = compile(vec![
            StoredRule::new(".*", action, "X-Test", "changed", ApplyOn::Request)
                .with_status(RuleStatus::Off),
        ]);
        let input = headers(&[("X-Test", "original")]);
        let output = rules.rewrite(input.clone(), "http://a.com/", Phase::Request);
        assert_eq!(output, input, "{action:?} rule with status off changed headers");
    }
}

#[test]
fn test_modify_is_idempotent() {
    let rule = StoredRule::new("a", RuleAction::Modify, "H", "new", ApplyOn::Response);
    let once = compile(vec![rule.clone()]);
    let twice = compile(vec![rule.clone(), rule]);

    let input = headers(&[("H", "old")]);
    assert_eq!(
        once.rewrite(input.clone(), "http://a.com/", Phase::Response),
        twice.rewrite(input, "http://a.com/", Phase::Response)
    );
}

#[test]
fn test_add_then_delete_ordering() {
    let add = StoredRule::new(".*", RuleAction::Add, "X", "1", ApplyOn::Request);
    let delete = StoredRule::new("", RuleAction::Delete, "X", "", ApplyOn::Request);

    let add_first = compile(vec![add, delete]);
    let output = add_first.rewrite(Vec::new(), "http://a.com/", Phase::Request);
    assert!(output.iter().all(|h| h.name != "X"));

    // reversed: the delete rule now carries the pattern and the add inherits it
    let delete_first = compile(vec![
        StoredRule::new(".*", RuleAction::Delete, "X", "", ApplyOn::Request),
        StoredRule::new("", RuleAction::Add, "X", "1", ApplyOn::Request),
    ]);
    let output = delete_first.rewrite(Vec::new(), "http://a.com/", Phase::Request);
    assert_eq!(output, headers(&[("X", "1")]));
}

#[test]
fn test_delete_is_case_insensitive() {
    let rules =
        compile(vec![StoredRule::new(".", RuleAction::Delete, "Content-Type", "", ApplyOn::Response)]);
    let output = rules.rewrite(
        headers(&[("content-type", "text/html"), ("content-length", "10")]),
        "http://a.com/",
        Phase::Response,
    );
    assert_eq!(output, headers(&[("content-length", "10")]));
}

#[test]
fn test_scenario_add_on_matching_host() {
    let rules = compile(vec![StoredRule::new(
        "^https?://a\\.com/.*",
        RuleAction::Add,
        "H1",
        "v1",
        ApplyOn::Request,
    )]);
    let base = headers(&[("Accept", "*/*")]);

    let a = rules.rewrite(base.clone(), "http://a.com/x", Phase::Request);
    assert_eq!(a, headers(&[("Accept", "*/*"), ("H1", "v1")]));

    let b = rules.rewrite(base.clone(), "http://b.com/x", Phase::Request);
    assert_eq!(b, base);
}

#[test]
fn test_scenario_modify_response_header() {
    let rules = compile(vec![StoredRule::new("a", RuleAction::Modify, "H", "new", ApplyOn::Response)]);

    let matched = rules.rewrite(headers(&[("H", "old")]), "http://a.com/", Phase::Response);
    assert_eq!(matched, headers(&[("H", "new")]));

    let unmatched = rules.rewrite(headers(&[("H", "old")]), "http://b.org/", Phase::Response);
    assert_eq!(unmatched, headers(&[("H", "old")]));
}

#[test]
fn test_request_rule_ignored_for_response() {
    let rules = compile(vec![StoredRule::new(".", RuleAction::Add, "X", "1", ApplyOn::Request)]);
    let output = rules.rewrite(Vec::new(), "http://a.com/", Phase::Response);
    assert!(output.is_empty());
}

#[test]
fn test_modify_missing_header_is_noop() {
    let rules = compile(vec![StoredRule::new(".", RuleAction::Modify, "X", "1", ApplyOn::Request)]);
    let mut list = headers(&[("Y", "2")]);
    let stats = rules.apply(&mut list, "http://a.com/", Phase::Request);
    assert!(stats.is_noop());
    assert_eq!(list, headers(&[("Y", "2")]));
}
