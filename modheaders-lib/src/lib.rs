//! Rule-driven HTTP header rewriting.
//!
//! An ordered list of rules (URL pattern, add/modify/delete, header name and value,
//! request or response, on/off) is compiled once and applied to every intercepted
//! request or response. A rule with an empty pattern reuses the pattern of the
//! nearest rule above it.

#![forbid(unsafe_code)]

pub mod catalog;
pub mod config;
pub mod editor;
pub mod engine;
pub mod error;
pub mod rewriter;
pub mod rules;
pub mod store;
pub mod telemetry;

pub use config::{ApplyOn, Config, RuleAction, RuleStatus, RunningState, StoredRule};
pub use editor::ConfigEditor;
pub use engine::{Controller, InterceptionHost, ListenerRegistry, RewriteContext, Signal};
pub use error::{ModHeadersError, Result};
pub use rewriter::{Header, Phase, RewriteStats};
pub use rules::RuleSet;
pub use store::{FileStore, MemoryStore, RuleStore};
