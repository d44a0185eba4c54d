mod loader;
mod settings;
mod types;
mod validator;

pub use loader::{from_json, parse_import, to_json};
pub use settings::{load_settings, LoggingConfig, Settings, StoreSettings, WatchConfig};
pub use types::{
    ApplyOn, Config, RuleAction, RuleStatus, RunningState, StoredRule, DEFAULT_EXPORT_FILE_NAME,
};
pub use validator::{is_pattern_valid, validate, validate_pattern};
