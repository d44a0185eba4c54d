use crate::config::types::Config;
use crate::error::{ModHeadersError, Result};

/// Parse a stored configuration blob
pub fn from_json(text: &str) -> Result<Config> {
    Ok(serde_json::from_str(text)?)
}

/// Serialize a configuration the way it is stored and exported (two-space indent)
pub fn to_json(config: &Config) -> Result<String> {
    Ok(serde_json::to_string_pretty(config)?)
}

/// Parse the content of an import file.
///
/// Any parse failure is reported as an invalid file format.
pub fn parse_import(text: &str) -> Result<Config> {
    serde_json::from_str(text).map_err(ModHeadersError::InvalidFormat)
}
