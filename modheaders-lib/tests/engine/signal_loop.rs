use std::sync::Arc;

use modheaders_lib::config::{ApplyOn, RuleAction, StoredRule};
use modheaders_lib::engine::{ChannelNotifier, Controller, ListenerRegistry};
use modheaders_lib::rewriter::Header;
use modheaders_lib::store::{MemoryStore, RuleStore, STARTED_KEY};
use modheaders_lib::{ConfigEditor, RunningState};

use super::request;
use crate::TestResult;

#[tokio::test]
async fn test_editor_drives_engine_over_channel() -> TestResult {
    let store = Arc::new(MemoryStore::new());
    let host = Arc::new(ListenerRegistry::new());
    let controller = Controller::start(Arc::clone(&store), Arc::clone(&host))?;

    let (notifier, rx) = ChannelNotifier::channel();
    {
        let mut editor = ConfigEditor::open(Arc::clone(&store), notifier)?;
        editor.delete_all()?;
        editor.append_rule(StoredRule::new(
            "example",
            RuleAction::Add,
            "X-Edited",
            "yes",
            ApplyOn::Request,
        ));
        editor.toggle_running()?;
        // editor (and its sender) dropped here, closing the channel
    }

    controller.run_signal_loop(rx).await;

    assert_eq!(controller.running_state(), RunningState::On);
    let result = host.on_before_send_headers(request("https://example.org/"));
    assert!(result.request_headers.contains(&Header::new("X-Edited", "yes")));
    assert_eq!(store.load(STARTED_KEY)?.as_deref(), Some("on"));
    Ok(())
}
