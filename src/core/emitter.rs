//! # Emitter core: registry mutation and the meta-event protocol.
//!
//! [`EmitterCore`] owns the [`Registry`] and the [`TaskScheduler`]. Every
//! registry mutation goes through it so that observers of the two meta keys
//! are notified with the right timing:
//!
//! ```text
//! add(event, L):     emit_meta(new_listener, [event, L])  ──► insert record
//!                    (observers see the list WITHOUT L)
//!
//! remove(event, L):  remove last record of L ──► emit_meta(remove_listener, [event, L])
//!                    (observers see the list WITHOUT L)
//! ```
//!
//! ## Rules
//! - Meta-events are always dispatched **synchronously**, whatever dispatcher
//!   the owning emitter uses for ordinary events. A deferred observer is run to
//!   completion before the mutation proceeds, and its failure counts like an
//!   immediate one.
//! - The registry lock is held only inside a single registry operation and is
//!   never held while a listener runs: listeners may re-enter the core.
//! - Removing an absent listener is a silent no-op.
//! - A failing `new_listener` observer aborts the registration (nothing is
//!   inserted); a failing `remove_listener` observer surfaces after the removal
//!   already happened.

use parking_lot::Mutex;

use crate::config::Config;
use crate::core::registry::{HandlerList, Registry};
use crate::core::scheduler::TaskScheduler;
use crate::error::EmitError;
use crate::events::{Args, EventKey};
use crate::listeners::{HandlerRecord, Listener};

/// Registry owner and mutation protocol shared by all emitters.
///
/// Higher-level types hold one and expose it through the
/// [`Emitter`](crate::Emitter) trait.
pub struct EmitterCore<K: EventKey = String> {
    registry: Mutex<Registry<K>>,
    scheduler: TaskScheduler,
    cfg: Config,
}

impl<K: EventKey> EmitterCore<K> {
    /// Creates a core with an empty registry.
    pub fn new(cfg: Config, scheduler: TaskScheduler) -> Self {
        Self {
            registry: Mutex::new(Registry::new()),
            scheduler,
            cfg,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Returns the scheduler running deferred listeners.
    pub fn scheduler(&self) -> &TaskScheduler {
        &self.scheduler
    }

    /// Registers `listener` under `event`.
    ///
    /// `new_listener` is emitted first, then the record is appended (or
    /// prepended). Returns the observer's error if one fails; the listener is
    /// not registered in that case.
    pub fn add(
        &self,
        event: K,
        listener: Listener,
        once: bool,
        prepend: bool,
    ) -> Result<(), EmitError> {
        self.dispatch_meta(&K::new_listener(), &meta_args(&event, &listener))?;

        let (len, warn) = {
            let mut reg = self.registry.lock();
            let record = reg.record(listener.clone(), once);
            let len = if prepend {
                reg.prepend(event.clone(), record)
            } else {
                reg.append(event.clone(), record)
            };
            let warn = match self.cfg.listener_limit() {
                Some(limit) if len > limit => reg
                    .list_mut(&event)
                    .is_some_and(HandlerList::mark_warned),
                _ => false,
            };
            (len, warn)
        };

        tracing::debug!(
            emitter = %self.cfg.label_or_default(),
            event = ?event,
            listener = ?listener,
            once,
            prepend,
            "listener added"
        );
        if warn {
            tracing::warn!(
                emitter = %self.cfg.label_or_default(),
                event = ?event,
                count = len,
                max_listeners = self.cfg.max_listeners,
                "possible listener leak: listener count exceeds max_listeners"
            );
        }
        Ok(())
    }

    /// Removes the most recently added registration of `listener` under `event`.
    ///
    /// Returns `Ok(false)` if there was nothing to remove. `remove_listener` is
    /// emitted after the removal.
    pub fn remove(&self, event: &K, listener: &Listener) -> Result<bool, EmitError> {
        let removed = self
            .registry
            .lock()
            .remove_by_identity(event, listener.id(), true);

        match removed {
            Some(record) => {
                self.notify_removed(event, &record)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Removes exactly `record` if it is still registered.
    ///
    /// Used by once-listeners and `remove_all`, which must not take out a
    /// different registration of the same listener.
    pub(crate) fn remove_record(
        &self,
        event: &K,
        record: &HandlerRecord,
    ) -> Result<bool, EmitError> {
        let removed = self.registry.lock().remove_exact(event, record.serial());

        match removed {
            Some(record) => {
                self.notify_removed(event, &record)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Removes every record of `event`, or of every key when `None`.
    ///
    /// Keys are walked in the order `names()` reported at call time; the records
    /// of one key are removed one by one in registration order, each followed by
    /// its `remove_listener` notification. When nobody observes
    /// `remove_listener`, the registry is cleared in one step.
    pub fn remove_all(&self, event: Option<&K>) -> Result<(), EmitError> {
        if !self.has_listeners(&K::remove_listener()) {
            self.registry.lock().clear(event);
            tracing::debug!(
                emitter = %self.cfg.label_or_default(),
                event = ?event,
                "listeners cleared"
            );
            return Ok(());
        }

        match event {
            Some(event) => self.remove_all_of(event),
            None => {
                for name in self.names() {
                    self.remove_all_of(&name)?;
                }
                Ok(())
            }
        }
    }

    fn remove_all_of(&self, event: &K) -> Result<(), EmitError> {
        let records = self.registry.lock().snapshot(event);
        for record in &records {
            self.remove_record(event, record)?;
        }
        Ok(())
    }

    fn notify_removed(&self, event: &K, record: &HandlerRecord) -> Result<(), EmitError> {
        tracing::debug!(
            emitter = %self.cfg.label_or_default(),
            event = ?event,
            listener = ?record.listener(),
            once = record.once(),
            "listener removed"
        );
        self.dispatch_meta(&K::remove_listener(), &meta_args(event, record.listener()))
            .map(drop)
    }

    /// Registered keys in creation order.
    pub fn names(&self) -> Vec<K> {
        self.registry.lock().names()
    }

    /// Copy of the listeners of `event`, in invocation order.
    pub fn listeners(&self, event: &K) -> Vec<Listener> {
        self.registry.lock().listeners(event)
    }

    /// Number of registrations under `event`.
    pub fn listener_count(&self, event: &K) -> usize {
        self.registry.lock().count(event)
    }

    /// True if `event` has at least one registration.
    pub fn has_listeners(&self, event: &K) -> bool {
        self.registry.lock().contains(event)
    }

    /// Snapshot of the records of `event`, `None` if the key is unknown.
    pub(crate) fn snapshot(&self, event: &K) -> Option<Vec<HandlerRecord>> {
        let reg = self.registry.lock();
        reg.contains(event).then(|| reg.snapshot(event))
    }
}

impl<K: EventKey> Default for EmitterCore<K> {
    fn default() -> Self {
        Self::new(Config::default(), TaskScheduler::default())
    }
}

impl<K: EventKey> std::fmt::Debug for EmitterCore<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmitterCore")
            .field("label", &self.cfg.label_or_default())
            .field("events", &self.names())
            .field("in_flight", &self.scheduler.in_flight())
            .finish()
    }
}

/// Arguments of a meta-event: `[event key, listener]`.
fn meta_args<K: EventKey>(event: &K, listener: &Listener) -> Args {
    crate::args![event.clone(), listener.clone()]
}
