use std::sync::Arc;

use modheaders_lib::config::WatchConfig;
use modheaders_lib::engine::{ChannelNotifier, RequestDetails, ResponseDetails, Signal};
use modheaders_lib::{Controller, FileStore, ListenerRegistry, Result};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::watch::StoreWatcher;

/// One line read from stdin
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Inbound {
    Control { signal: Signal },
    Event(InterceptedEvent),
}

#[derive(Debug, Deserialize)]
#[serde(tag = "phase")]
enum InterceptedEvent {
    #[serde(rename = "req", alias = "request")]
    Request(RequestDetails),
    #[serde(rename = "res", alias = "response")]
    Response(ResponseDetails),
}

#[derive(Debug, Serialize)]
struct ErrorLine {
    error: String,
}

type Engine = Controller<FileStore, Arc<ListenerRegistry>>;

/// Act as the interception host: one JSON object per stdin line, one per stdout line
pub async fn run(store: FileStore, watch: &WatchConfig) -> Result<()> {
    let host = Arc::new(ListenerRegistry::new());
    let engine: Arc<Engine> = Arc::new(Controller::start(store.clone(), Arc::clone(&host))?);

    let (notifier, rx) = ChannelNotifier::channel();
    let signal_loop = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move { engine.run_signal_loop(rx).await })
    };

    // the watcher stops when dropped
    let _watcher = if watch.enabled {
        Some(StoreWatcher::spawn(store, notifier, watch.debounce_ms)?)
    } else {
        drop(notifier);
        None
    };

    info!(running = %engine.running_state(), "Serving interception events on stdin");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, shutting down");
                break;
            }
        };
        let Some(line) = line else {
            debug!("stdin closed");
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        if let Some(reply) = handle_line(&engine, &host, &line)? {
            stdout.write_all(reply.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await?;
        }
    }

    signal_loop.abort();
    Ok(())
}

/// Returns the line to write back, if any. Control lines produce no output
/// unless the signal fails, which is reported like a bad input line.
fn handle_line(engine: &Engine, host: &ListenerRegistry, line: &str) -> Result<Option<String>> {
    let inbound: Inbound = match serde_json::from_str(line) {
        Ok(inbound) => inbound,
        Err(e) => {
            warn!(error = %e, "Ignoring unparseable input line");
            let reply = ErrorLine { error: format!("invalid event: {e}") };
            return Ok(Some(serde_json::to_string(&reply)?));
        }
    };

    let reply = match inbound {
        Inbound::Control { signal } => match engine.notify(signal) {
            Ok(()) => return Ok(None),
            Err(e) => {
                error!(%signal, error = %e, "Failed to apply signal");
                serde_json::to_string(&ErrorLine { error: format!("signal {signal} failed: {e}") })?
            }
        },
        Inbound::Event(InterceptedEvent::Request(details)) => {
            serde_json::to_string(&host.on_before_send_headers(details))?
        }
        Inbound::Event(InterceptedEvent::Response(details)) => {
            serde_json::to_string(&host.on_headers_received(details))?
        }
    };
    Ok(Some(reply))
}
