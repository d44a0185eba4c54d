use crate::config::types::Config;
use crate::error::{ModHeadersError, Result};
use crate::rules::compile_pattern;

/// Check that a URL pattern compiles as a case-insensitive regex
pub fn validate_pattern(pattern: &str) -> Result<()> {
    compile_pattern(pattern)
        .map(|_| ())
        .map_err(|e| ModHeadersError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })
}

pub fn is_pattern_valid(pattern: &str) -> bool {
    validate_pattern(pattern).is_ok()
}

/// Validate every non-empty pattern as stored, reporting the first one that fails
pub fn validate(config: &Config) -> Result<()> {
    config
        .headers
        .iter()
        .map(|rule| rule.url_contains.as_str())
        .filter(|pattern| !pattern.is_empty())
        .try_for_each(validate_pattern)
}
