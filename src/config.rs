//! # Emitter configuration.
//!
//! Provides [`Config`] centralized settings for an emitter instance.
//!
//! Config is consumed by [`EmitterBuilder::new`](crate::EmitterBuilder::new),
//! or implicitly (`Config::default()`) by `EventEmitter::new` /
//! `AsyncEventEmitter::new`.
//!
//! ## Sentinel values
//! - `max_listeners = 0` → unlimited (no leak warning is ever logged)

use std::borrow::Cow;

/// Settings for one emitter.
///
/// ## Field semantics
/// - `max_listeners`: per-key listener count above which a possible-leak
///   warning is logged once for that key (`0` = unlimited)
/// - `label`: emitter name attached to log records (`None` = unnamed)
///
/// ## Notes
/// All fields are public for flexibility. Prefer the helper accessors to avoid
/// sprinkling sentinel checks (`0`) across the codebase.
#[derive(Clone, Debug)]
pub struct Config {
    /// Listener count per event key above which a warning is logged.
    ///
    /// - `0` = unlimited
    /// - `n > 0` = warn (once per key) when a key holds more than `n` records
    ///
    /// This is a diagnostic only; registration is never refused.
    pub max_listeners: usize,

    /// Name of the emitter, used in log records.
    pub label: Option<Cow<'static, str>>,
}

impl Config {
    /// Returns the per-key listener warning threshold as an `Option`.
    ///
    /// - `None` → unlimited
    /// - `Some(n)` → warn above `n` listeners for one key
    #[inline]
    pub fn listener_limit(&self) -> Option<usize> {
        if self.max_listeners == 0 {
            None
        } else {
            Some(self.max_listeners)
        }
    }

    /// Returns the label, or `"emitter"` when none is set.
    #[inline]
    pub fn label_or_default(&self) -> &str {
        self.label.as_deref().unwrap_or("emitter")
    }

    /// Sets the label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<Cow<'static, str>>) -> Self {
        self.label = Some(label.into());
        self
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `max_listeners = 10` (same threshold as the Node.js `EventEmitter`)
    /// - `label = None`
    fn default() -> Self {
        Self {
            max_listeners: 10,
            label: None,
        }
    }
}
