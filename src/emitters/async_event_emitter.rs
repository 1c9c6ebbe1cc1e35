//! # Asynchronous emitter.
//!
//! [`AsyncEventEmitter`] drives deferred listeners to completion and offers two
//! dispatch disciplines:
//!
//! - [`emit`](AsyncEventEmitter::emit): every listener is started in
//!   registration order (immediate ones run inline), then all are awaited
//!   together. Completion order is whatever the listeners make it.
//! - [`emit_in_order`](AsyncEventEmitter::emit_in_order): each listener
//!   completes before the next one starts.
//!
//! Deferred listeners run as tokio tasks, so dropping an `emit` future does not
//! cancel listeners that were already started; [`drain`](AsyncEventEmitter::drain)
//! waits for them.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use tokio::sync::Mutex;
//! use eventemitter::{args, Args, AsyncEventEmitter, Emitter, Listener};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), eventemitter::EmitError> {
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let ee = AsyncEventEmitter::new();
//!
//! let s = Arc::clone(&seen);
//! ee.on("job", Listener::deferred(move |args: Args| {
//!     let s = Arc::clone(&s);
//!     async move {
//!         let id = *args.get::<u32>(0).unwrap_or(&0);
//!         s.lock().await.push(id);
//!         Ok(())
//!     }
//! }))?;
//!
//! assert!(ee.emit("job", args![7_u32]).await?);
//! assert!(ee.emit_in_order("job", args![8_u32]).await?);
//! assert_eq!(*seen.lock().await, vec![7, 8]);
//! # Ok(())
//! # }
//! ```

use crate::config::Config;
use crate::core::{EmitterBuilder, EmitterCore};
use crate::error::EmitError;
use crate::events::{Args, EventKey};

use super::emitter::Emitter;

/// Emitter whose `emit` awaits deferred listeners.
#[derive(Debug)]
pub struct AsyncEventEmitter<K: EventKey = String> {
    core: EmitterCore<K>,
}

impl<K: EventKey> Default for AsyncEventEmitter<K> {
    fn default() -> Self {
        Self::from(EmitterCore::default())
    }
}

impl AsyncEventEmitter {
    /// Creates an emitter with string keys and the default [`Config`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an emitter with string keys and the given [`Config`].
    pub fn with_config(cfg: Config) -> Self {
        EmitterBuilder::new(cfg).build()
    }
}

impl<K: EventKey> AsyncEventEmitter<K> {
    /// Starts a builder for an emitter keyed by `K`.
    pub fn builder(cfg: Config) -> EmitterBuilder<K> {
        EmitterBuilder::new(cfg)
    }

    /// Starts every listener of `event`, then waits for all of them.
    ///
    /// Returns `Ok(false)` if `event` had no listeners. If several listeners
    /// fail, the error of the one registered first is returned; the others are
    /// still run to completion.
    pub async fn emit(&self, event: impl Into<K>, args: Args) -> Result<bool, EmitError> {
        self.core.dispatch_concurrent(&event.into(), args).await
    }

    /// Runs the listeners of `event` one after another.
    ///
    /// Stops at the first failure; later listeners are not started.
    pub async fn emit_in_order(
        &self,
        event: impl Into<K>,
        args: Args,
    ) -> Result<bool, EmitError> {
        self.core.dispatch_in_order(&event.into(), args).await
    }

    /// Waits until every started listener task has finished.
    pub async fn drain(&self) {
        self.core.scheduler().drain().await;
    }

    /// Number of listener tasks still running.
    pub fn in_flight(&self) -> usize {
        self.core.scheduler().in_flight()
    }
}

impl<K: EventKey> From<EmitterCore<K>> for AsyncEventEmitter<K> {
    fn from(core: EmitterCore<K>) -> Self {
        Self { core }
    }
}

impl<K: EventKey> Emitter<K> for AsyncEventEmitter<K> {
    fn core(&self) -> &EmitterCore<K> {
        &self.core
    }
}
