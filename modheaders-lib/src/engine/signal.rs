use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tokio::sync::mpsc;

use crate::error::{ModHeadersError, Result};

/// Notification sent from the configuration side to the engine
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    /// Re-read the configuration from the store
    Reload,
    /// Attach the interception listeners
    On,
    /// Detach the interception listeners
    Off,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Reload => "reload",
            Signal::On => "on",
            Signal::Off => "off",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Signal {
    type Err = ModHeadersError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "reload" => Ok(Signal::Reload),
            "on" => Ok(Signal::On),
            "off" => Ok(Signal::Off),
            other => Err(ModHeadersError::UnknownSignal(other.to_string())),
        }
    }
}

/// Delivers signals to whoever owns the rewrite engine
pub trait Notifier {
    fn send(&self, signal: Signal) -> Result<()>;
}

impl<T: Notifier + ?Sized> Notifier for &T {
    fn send(&self, signal: Signal) -> Result<()> {
        (**self).send(signal)
    }
}

/// Forwards signals over a channel drained by [`crate::engine::Controller::run_signal_loop`]
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Signal>,
}

impl ChannelNotifier {
    pub fn new(tx: mpsc::UnboundedSender<Signal>) -> Self {
        Self { tx }
    }

    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Signal>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn send(&self, signal: Signal) -> Result<()> {
        self.tx
            .send(signal)
            .map_err(|e| ModHeadersError::Config(format!("Engine is gone, dropped signal {}", e.0)))
    }
}
