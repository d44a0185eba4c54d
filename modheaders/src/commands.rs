use std::io::Read;
use std::path::Path;

use modheaders_lib::catalog::suggest;
use modheaders_lib::config::{from_json, to_json, validate, Config, RunningState};
use modheaders_lib::engine::{Notifier, Signal};
use modheaders_lib::rewriter::Header;
use modheaders_lib::store::{CONFIG_KEY, STARTED_KEY};
use modheaders_lib::{
    ConfigEditor, Controller, FileStore, ListenerRegistry, ModHeadersError, Result, RuleSet,
    RuleStore,
};
use tracing::{debug, info};

use crate::Command;

/// One-shot commands have no engine in-process; a `serve` instance watching
/// the store picks the change up instead.
struct StoreOnly;

impl Notifier for StoreOnly {
    fn send(&self, signal: Signal) -> Result<()> {
        debug!(%signal, "No engine attached, signal left to store watchers");
        Ok(())
    }
}

pub fn run(command: Command, store: FileStore) -> Result<()> {
    match command {
        Command::Init => {
            let controller = Controller::start(store, ListenerRegistry::new())?;
            info!(
                path = %controller.store().root().display(),
                rules = controller.context().rules().len(),
                "store ready"
            );
            Ok(())
        }
        Command::Show => {
            println!("{}", to_json(&stored_config(&store)?)?);
            Ok(())
        }
        Command::Validate => {
            let config = stored_config(&store)?;
            validate(&config)?;
            info!(rules = config.headers.len(), "configuration is valid");
            Ok(())
        }
        Command::Export { file } => {
            ConfigEditor::open(store, StoreOnly)?.export_to_file(&file)?;
            info!(path = %file.display(), "configuration exported");
            Ok(())
        }
        Command::Import { file } => ConfigEditor::open(store, StoreOnly)?.import_from_file(&file),
        Command::Reset => ConfigEditor::open(store, StoreOnly)?.delete_all(),
        Command::Start => {
            ConfigEditor::open(store, StoreOnly)?.set_running(RunningState::On)?;
            Ok(())
        }
        Command::Stop => {
            ConfigEditor::open(store, StoreOnly)?.set_running(RunningState::Off)?;
            Ok(())
        }
        Command::Status => {
            let running = store
                .load(STARTED_KEY)?
                .as_deref()
                .and_then(RunningState::parse)
                .unwrap_or_default();
            let config = stored_config(&store)?;
            println!("running: {running}");
            println!("rules: {}", config.headers.len());
            println!("debug_mode: {}", config.debug_mode);
            Ok(())
        }
        Command::Rewrite { url, phase, headers } => {
            let input = read_headers(headers.as_deref())?;
            let rules = RuleSet::compile(&stored_config(&store)?);
            let output = rules.rewrite(input, &url, phase);
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        Command::Headers { phase, prefix } => {
            for name in suggest(phase, &prefix) {
                println!("{name}");
            }
            Ok(())
        }
        Command::Serve => {
            Err(ModHeadersError::Config("serve needs the async runtime, not a one-shot run".into()))
        }
    }
}

fn stored_config(store: &FileStore) -> Result<Config> {
    match store.load(CONFIG_KEY)? {
        Some(txt) => from_json(&txt),
        None => Ok(Config::default()),
    }
}

fn read_headers(path: Option<&Path>) -> Result<Vec<Header>> {
    let txt = match path {
        Some(p) => std::fs::read_to_string(p)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    if txt.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(&txt)?)
}
