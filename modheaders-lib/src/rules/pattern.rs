use regex::{Regex, RegexBuilder};

/// Compile a URL pattern the way rules are matched: case-insensitive, unanchored search
pub fn compile_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}
