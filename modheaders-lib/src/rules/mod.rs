mod compiled;
mod pattern;

pub use compiled::{CompiledRule, RuleSet, UrlPattern};
pub use pattern::compile_pattern;
