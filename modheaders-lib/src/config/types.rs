use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModHeadersError;

/// File name suggested when exporting a configuration
pub const DEFAULT_EXPORT_FILE_NAME: &str = "SimpleModifyHeader.conf";

/// What a rule does to a header when it matches
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    /// Append a new header (duplicates allowed)
    #[default]
    Add,
    /// Overwrite the value of every header with the same name
    Modify,
    /// Remove every header with the same name
    Delete,
}

/// Which header collection a rule targets
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ApplyOn {
    #[default]
    #[serde(rename = "req", alias = "request")]
    Request,
    #[serde(rename = "res", alias = "response")]
    Response,
}

impl ApplyOn {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplyOn::Request => "req",
            ApplyOn::Response => "res",
        }
    }

    /// Human readable name used in log lines
    pub fn describe(&self) -> &'static str {
        match self {
            ApplyOn::Request => "request",
            ApplyOn::Response => "response",
        }
    }
}

impl fmt::Display for ApplyOn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplyOn {
    type Err = ModHeadersError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "req" | "request" => Ok(ApplyOn::Request),
            "res" | "response" => Ok(ApplyOn::Response),
            other => Err(ModHeadersError::Config(format!("unknown phase: {other}"))),
        }
    }
}

/// Whether a rule is currently active
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuleStatus {
    #[default]
    On,
    Off,
}

impl RuleStatus {
    pub fn toggled(self) -> Self {
        match self {
            RuleStatus::On => RuleStatus::Off,
            RuleStatus::Off => RuleStatus::On,
        }
    }
}

/// Running flag stored under the `started` key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunningState {
    On,
    #[default]
    Off,
}

impl RunningState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunningState::On => "on",
            RunningState::Off => "off",
        }
    }

    /// Parse a stored flag; anything but `on`/`off` yields `None`
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "on" => Some(RunningState::On),
            "off" => Some(RunningState::Off),
            _ => None,
        }
    }
}

impl fmt::Display for RunningState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rule as it is persisted and edited
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct StoredRule {
    /// Case-insensitive regex tested against the full request URL.
    /// Empty means "use the nearest preceding non-empty pattern".
    #[serde(default, deserialize_with = "string_or_null")]
    pub url_contains: String,
    #[serde(default)]
    pub action: RuleAction,
    #[serde(default, deserialize_with = "string_or_null")]
    pub header_name: String,
    /// Ignored for `delete`
    #[serde(default, deserialize_with = "string_or_null")]
    pub header_value: String,
    /// Free text, never evaluated
    #[serde(default, deserialize_with = "string_or_null")]
    pub comment: String,
    #[serde(default)]
    pub apply_on: ApplyOn,
    #[serde(default)]
    pub status: RuleStatus,
}

impl StoredRule {
    pub fn new(
        url_contains: impl Into<String>,
        action: RuleAction,
        header_name: impl Into<String>,
        header_value: impl Into<String>,
        apply_on: ApplyOn,
    ) -> Self {
        Self {
            url_contains: url_contains.into(),
            action,
            header_name: header_name.into(),
            header_value: header_value.into(),
            comment: String::new(),
            apply_on,
            status: RuleStatus::On,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn with_status(mut self, status: RuleStatus) -> Self {
        self.status = status;
        self
    }
}

/// Root configuration object persisted under the `config` key
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// Ordered rule sequence
    #[serde(default)]
    pub headers: Vec<StoredRule>,
    /// Log every header operation
    /// Default: false
    #[serde(default)]
    pub debug_mode: bool,
    /// Display the comment column when editing
    /// Default: true
    #[serde(default = "default_true")]
    pub show_comments: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self { headers: Vec::new(), debug_mode: false, show_comments: true }
    }
}

impl Config {
    /// Configuration written on first run: two pattern groups with two rules each
    pub fn with_example_rules() -> Self {
        let httpbin = "^https?://httpbin\\.org/.*$";
        let postman = "^https?://postman-echo\\.com/.*$";
        let headers = vec![
            StoredRule::new(
                httpbin,
                RuleAction::Add,
                "test-header-name-1",
                "test-header-value-1",
                ApplyOn::Request,
            )
            .with_comment("test at: https://httpbin.org/headers"),
            StoredRule::new(
                "",
                RuleAction::Add,
                "test-header-name-2",
                "test-header-value-2",
                ApplyOn::Request,
            ),
            StoredRule::new(
                postman,
                RuleAction::Add,
                "test-header-name-3",
                "test-header-value-3",
                ApplyOn::Request,
            )
            .with_comment("test at: http://postman-echo.com/get"),
            StoredRule::new(
                "",
                RuleAction::Add,
                "test-header-name-4",
                "test-header-value-4",
                ApplyOn::Request,
            ),
        ];
        Self { headers, debug_mode: false, show_comments: true }
    }
}

fn default_true() -> bool {
    true
}

fn string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
