//! # Synchronous emitter.
//!
//! [`EventEmitter::emit`] runs the listeners of a key inline, in order, and
//! returns the first listener error unchanged.
//!
//! ## Rules
//! - Immediate listeners complete before `emit` returns.
//! - Deferred listeners are handed to the tokio runtime (configured or current)
//!   and not awaited; their failures are logged. Without a runtime, `emit`
//!   returns [`EmitError::NoRuntime`].
//! - Deferred `new_listener`/`remove_listener` observers are the exception:
//!   they finish before `on`/`off` returns, with or without a runtime.
//! - `emit` returns `Ok(true)` iff the key had listeners when the emit began,
//!   even if all of them removed themselves.
//!
//! ## Example
//! ```rust
//! use std::sync::atomic::{AtomicU32, Ordering};
//! use std::sync::Arc;
//! use eventemitter::{args, Emitter, EventEmitter, Listener};
//!
//! let total = Arc::new(AtomicU32::new(0));
//! let ee = EventEmitter::new();
//!
//! let t = Arc::clone(&total);
//! ee.on("add", Listener::new(move |args| {
//!     t.fetch_add(*args.get::<u32>(0).unwrap_or(&0), Ordering::SeqCst);
//!     Ok(())
//! }))?;
//!
//! assert!(ee.emit("add", args![2_u32])?);
//! assert!(ee.emit("add", args![3_u32])?);
//! assert!(!ee.emit("nobody-listens", args![])?);
//! assert_eq!(total.load(Ordering::SeqCst), 5);
//! # Ok::<(), eventemitter::EmitError>(())
//! ```

use crate::config::Config;
use crate::core::{EmitterBuilder, EmitterCore};
use crate::error::EmitError;
use crate::events::{Args, EventKey};

use super::emitter::Emitter;

/// Emitter with synchronous dispatch.
#[derive(Debug)]
pub struct EventEmitter<K: EventKey = String> {
    core: EmitterCore<K>,
}

impl<K: EventKey> Default for EventEmitter<K> {
    fn default() -> Self {
        Self::from(EmitterCore::default())
    }
}

impl EventEmitter {
    /// Creates an emitter with string keys and the default [`Config`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an emitter with string keys and the given [`Config`].
    pub fn with_config(cfg: Config) -> Self {
        EmitterBuilder::new(cfg).build()
    }
}

impl<K: EventKey> EventEmitter<K> {
    /// Starts a builder for an emitter keyed by `K`.
    pub fn builder(cfg: Config) -> EmitterBuilder<K> {
        EmitterBuilder::new(cfg)
    }

    /// Invokes the listeners of `event` with `args`.
    ///
    /// Returns `Ok(false)` if `event` had no listeners. Stops at the first
    /// failing listener and returns its error.
    pub fn emit(&self, event: impl Into<K>, args: Args) -> Result<bool, EmitError> {
        self.core.dispatch_sync(&event.into(), &args)
    }
}

impl<K: EventKey> From<EmitterCore<K>> for EventEmitter<K> {
    fn from(core: EmitterCore<K>) -> Self {
        Self { core }
    }
}

impl<K: EventKey> Emitter<K> for EventEmitter<K> {
    fn core(&self) -> &EmitterCore<K> {
        &self.core
    }
}
