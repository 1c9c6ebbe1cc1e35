//! # Simple logging observer for debugging and demos.
//!
//! [`LogWriter`] registers one listener on each meta key and logs every
//! registry mutation through `tracing` at `info` level.
//!
//! ## Output format
//! ```text
//! [listener-added] event="data" listener=Listener(on_data@7, immediate)
//! [listener-removed] event="data" listener=Listener(on_data@7, immediate)
//! ```
//!
//! ## Example
//! ```rust
//! # use eventemitter::{Emitter, EventEmitter, Listener, LogWriter};
//! let ee = EventEmitter::new();
//! let writer = LogWriter::attach(&ee)?;
//!
//! let l = Listener::new(|_| Ok(())).with_name("on_data");
//! ee.on("data", l.clone())?.off("data", &l)?;
//!
//! writer.detach(&ee)?;
//! assert!(ee.events().is_empty());
//! # Ok::<(), eventemitter::EmitError>(())
//! ```

use crate::emitters::Emitter;
use crate::error::EmitError;
use crate::events::EventKey;
use crate::listeners::Listener;

/// Pair of meta-event listeners that log registry mutations.
///
/// Enabled via the `logging` feature. Not intended for production use;
/// register your own `new_listener`/`remove_listener` listeners for structured
/// auditing.
#[derive(Clone, Debug)]
pub struct LogWriter {
    added: Listener,
    removed: Listener,
}

impl LogWriter {
    /// Registers the logging listeners on `emitter`.
    pub fn attach<K, E>(emitter: &E) -> Result<Self, EmitError>
    where
        K: EventKey,
        E: Emitter<K>,
    {
        let writer = Self {
            added: mutation_logger::<K>("listener-added"),
            removed: mutation_logger::<K>("listener-removed"),
        };
        emitter
            .on(K::new_listener(), writer.added.clone())?
            .on(K::remove_listener(), writer.removed.clone())?;
        Ok(writer)
    }

    /// Removes the logging listeners from `emitter`.
    pub fn detach<K, E>(&self, emitter: &E) -> Result<(), EmitError>
    where
        K: EventKey,
        E: Emitter<K>,
    {
        emitter
            .off(K::remove_listener(), &self.removed)?
            .off(K::new_listener(), &self.added)?;
        Ok(())
    }
}

fn mutation_logger<K: EventKey>(what: &'static str) -> Listener {
    Listener::new(move |args| {
        let event = args.get::<K>(0);
        let listener = args.get::<Listener>(1);
        tracing::info!(event = ?event, listener = ?listener, "[{what}]");
        Ok(())
    })
    .with_name(what)
}
