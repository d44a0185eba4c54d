use std::sync::Arc;

use modheaders_lib::config::{ApplyOn, Config, RuleAction, StoredRule};
use modheaders_lib::engine::{Controller, ListenerRegistry, ResponseDetails, Signal};
use modheaders_lib::rewriter::Header;
use modheaders_lib::store::{MemoryStore, RuleStore, CONFIG_KEY, STARTED_KEY};
use modheaders_lib::RunningState;

use super::{config_with, request};
use crate::TestResult;

#[test]
fn test_first_run_seeds_defaults_and_stays_off() -> TestResult {
    let store = Arc::new(MemoryStore::new());
    let host = Arc::new(ListenerRegistry::new());

    let controller = Controller::start(Arc::clone(&store), Arc::clone(&host))?;

    assert_eq!(controller.running_state(), RunningState::Off);
    assert!(!host.is_attached());
    assert_eq!(store.load(STARTED_KEY)?.as_deref(), Some("off"));
    let stored = store.load(CONFIG_KEY)?.ok_or("config not seeded")?;
    let config: Config = serde_json::from_str(&stored)?;
    assert_eq!(config, Config::with_example_rules());
    assert_eq!(controller.context().rules().len(), 4);
    Ok(())
}

#[test]
fn test_stored_on_flag_attaches_listeners() -> TestResult {
    let rules = vec![StoredRule::new("a\\.com", RuleAction::Add, "X-On", "1", ApplyOn::Request)];
    let store =
        MemoryStore::with_entries([(CONFIG_KEY, config_with(rules)?), (STARTED_KEY, "on".into())]);
    let host = Arc::new(ListenerRegistry::new());

    let controller = Controller::start(store, Arc::clone(&host))?;

    assert_eq!(controller.running_state(), RunningState::On);
    let result = host.on_before_send_headers(request("http://a.com/"));
    assert_eq!(
        result.request_headers,
        vec![Header::new("Accept", "*/*"), Header::new("X-On", "1")]
    );
    Ok(())
}

#[test]
fn test_unknown_flag_is_normalized_to_off() -> TestResult {
    let store = Arc::new(MemoryStore::with_entries([
        (CONFIG_KEY, config_with(Vec::new())?),
        (STARTED_KEY, "maybe".into()),
    ]));

    let controller = Controller::start(Arc::clone(&store), ListenerRegistry::new())?;

    assert_eq!(controller.running_state(), RunningState::Off);
    assert_eq!(store.load(STARTED_KEY)?.as_deref(), Some("off"));
    Ok(())
}

#[test]
fn test_on_off_signals_toggle_attachment() -> TestResult {
    let store = MemoryStore::with_entries([(CONFIG_KEY, config_with(vec![StoredRule::new(
        ".",
        RuleAction::Delete,
        "Server",
        "",
        ApplyOn::Response,
    )])?)]);
    let host = Arc::new(ListenerRegistry::new());
    let controller = Controller::start(store, Arc::clone(&host))?;

    let response = || ResponseDetails {
        url: "http://a.com/".into(),
        response_headers: vec![Header::new("server", "nginx")],
    };

    // detached: passes through
    assert_eq!(host.on_headers_received(response()).response_headers.len(), 1);

    controller.notify(Signal::On)?;
    controller.notify(Signal::On)?;
    assert!(host.is_attached());
    assert!(host.on_headers_received(response()).response_headers.is_empty());

    controller.notify(Signal::Off)?;
    assert!(!host.is_attached());
    assert_eq!(host.on_headers_received(response()).response_headers.len(), 1);
    Ok(())
}

#[test]
fn test_reload_replaces_rules_without_changing_state() -> TestResult {
    let store = Arc::new(MemoryStore::with_entries([
        (CONFIG_KEY, config_with(Vec::new())?),
        (STARTED_KEY, "on".into()),
    ]));
    let host = Arc::new(ListenerRegistry::new());
    let controller = Controller::start(Arc::clone(&store), Arc::clone(&host))?;
    assert!(controller.context().rules().is_empty());

    store.save(
        CONFIG_KEY,
        &config_with(vec![StoredRule::new(".", RuleAction::Add, "X-New", "1", ApplyOn::Request)])?,
    )?;
    controller.notify(Signal::Reload)?;

    assert_eq!(controller.running_state(), RunningState::On);
    let result = host.on_before_send_headers(request("http://b.com/"));
    assert!(result.request_headers.contains(&Header::new("X-New", "1")));
    Ok(())
}

#[test]
fn test_malformed_reload_keeps_previous_rules() -> TestResult {
    let store = Arc::new(MemoryStore::with_entries([(
        CONFIG_KEY,
        config_with(vec![StoredRule::new(".", RuleAction::Add, "X-Old", "1", ApplyOn::Request)])?,
    )]));
    let controller = Controller::start(Arc::clone(&store), ListenerRegistry::new())?;

    store.save(CONFIG_KEY, "{not json")?;
    controller.notify(Signal::Reload)?;

    assert_eq!(controller.context().rules().len(), 1);
    Ok(())
}
