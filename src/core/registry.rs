//! # Event registry - ordered map of event keys to handler lists.
//!
//! [`Registry`] stores one [`HandlerList`] per event key, in key creation order.
//! It is plain data: no locking, no meta-events, no dispatch. The
//! [`EmitterCore`](crate::EmitterCore) wraps it in a mutex and layers the
//! `new_listener`/`remove_listener` protocol on top.
//!
//! ## Rules
//! - A key present in the registry always has a **non-empty** list: every
//!   removal that empties a list deletes the key (creation order of the other
//!   keys is preserved).
//! - Lists keep invocation order. `append` adds at the end, `prepend` at index 0.
//! - No deduplication: the same listener may back several records.
//! - Removal by identity with `prefer_last` removes the most recently added
//!   matching record (scan from the end).
//! - Anything handed out (`snapshot`, `names`) is a copy.
//!
//! ```text
//! Registry (IndexMap, creation order)
//!   "data"            ─► [rec#1 L1] [rec#4 L2] [rec#5 L1]
//!   "new_listener"    ─► [rec#2 M1]
//!   "remove_listener" ─► [rec#3 M2]
//! ```

use std::hash::Hash;

use indexmap::IndexMap;

use crate::listeners::{HandlerRecord, Listener, ListenerId};

/// Ordered handler records of one event key.
#[derive(Clone, Debug, Default)]
pub struct HandlerList {
    records: Vec<HandlerRecord>,
    /// Set once the leak warning has been logged for this key.
    warned: bool,
}

impl HandlerList {
    /// Adds a record at the end (invoked last).
    pub fn append(&mut self, record: HandlerRecord) {
        self.records.push(record);
    }

    /// Adds a record at the front (invoked first).
    pub fn prepend(&mut self, record: HandlerRecord) {
        self.records.insert(0, record);
    }

    /// Index of the first record with `identity`.
    pub fn find_by_identity(&self, identity: ListenerId) -> Option<usize> {
        self.records.iter().position(|r| r.identity() == identity)
    }

    /// Index of the last record with `identity`.
    pub fn rfind_by_identity(&self, identity: ListenerId) -> Option<usize> {
        self.records.iter().rposition(|r| r.identity() == identity)
    }

    /// Index of the record with `serial`.
    pub fn find_by_serial(&self, serial: u64) -> Option<usize> {
        self.records.iter().position(|r| r.serial() == serial)
    }

    /// Removes and returns the record at `index`.
    pub fn remove_at(&mut self, index: usize) -> HandlerRecord {
        self.records.remove(index)
    }

    /// Copy of the records, decoupled from later mutation.
    pub fn snapshot(&self) -> Vec<HandlerRecord> {
        self.records.clone()
    }

    /// Listeners in invocation order.
    pub fn listeners(&self) -> Vec<Listener> {
        self.records.iter().map(|r| r.listener().clone()).collect()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if no record is left.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Marks the leak warning as logged; returns `true` only the first time.
    pub fn mark_warned(&mut self) -> bool {
        !std::mem::replace(&mut self.warned, true)
    }
}

/// Mapping of event key to its non-empty [`HandlerList`].
#[derive(Debug)]
pub struct Registry<K> {
    events: IndexMap<K, HandlerList>,
    next_serial: u64,
}

impl<K> Default for Registry<K> {
    fn default() -> Self {
        Self {
            events: IndexMap::new(),
            next_serial: 1,
        }
    }
}

impl<K: Eq + Hash + Clone> Registry<K> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a record with a fresh serial.
    pub fn record(&mut self, listener: Listener, once: bool) -> HandlerRecord {
        let serial = self.next_serial;
        self.next_serial += 1;
        HandlerRecord::new(serial, listener, once)
    }

    /// Returns the list of `event`, creating an empty one if absent.
    ///
    /// Callers must insert into a freshly created list before releasing the
    /// registry, otherwise an empty key would become observable.
    pub fn get_or_create(&mut self, event: K) -> &mut HandlerList {
        self.events.entry(event).or_default()
    }

    /// Appends `record` under `event`; returns the new list length.
    pub fn append(&mut self, event: K, record: HandlerRecord) -> usize {
        let list = self.get_or_create(event);
        list.append(record);
        list.len()
    }

    /// Prepends `record` under `event`; returns the new list length.
    pub fn prepend(&mut self, event: K, record: HandlerRecord) -> usize {
        let list = self.get_or_create(event);
        list.prepend(record);
        list.len()
    }

    /// Removes one record of `event` matching `identity`.
    ///
    /// With `prefer_last`, the most recently added match is removed; otherwise
    /// the oldest. Returns `None` if the key or the identity is absent.
    pub fn remove_by_identity(
        &mut self,
        event: &K,
        identity: ListenerId,
        prefer_last: bool,
    ) -> Option<HandlerRecord> {
        let list = self.events.get_mut(event)?;
        let index = if prefer_last {
            list.rfind_by_identity(identity)?
        } else {
            list.find_by_identity(identity)?
        };
        let removed = list.remove_at(index);
        self.prune(event);
        Some(removed)
    }

    /// Removes exactly the record with `serial`, if it is still registered.
    pub fn remove_exact(&mut self, event: &K, serial: u64) -> Option<HandlerRecord> {
        let list = self.events.get_mut(event)?;
        let index = list.find_by_serial(serial)?;
        let removed = list.remove_at(index);
        self.prune(event);
        Some(removed)
    }

    /// Copy of the records of `event` (empty if absent).
    pub fn snapshot(&self, event: &K) -> Vec<HandlerRecord> {
        self.events
            .get(event)
            .map(HandlerList::snapshot)
            .unwrap_or_default()
    }

    /// Listeners of `event` in invocation order (empty if absent).
    pub fn listeners(&self, event: &K) -> Vec<Listener> {
        self.events
            .get(event)
            .map(HandlerList::listeners)
            .unwrap_or_default()
    }

    /// Number of records of `event`.
    pub fn count(&self, event: &K) -> usize {
        self.events.get(event).map_or(0, HandlerList::len)
    }

    /// True if `event` has at least one record.
    pub fn contains(&self, event: &K) -> bool {
        self.events.contains_key(event)
    }

    /// Registered keys in creation order.
    pub fn names(&self) -> Vec<K> {
        self.events.keys().cloned().collect()
    }

    /// Removes every record of `event`, or of all keys when `None`.
    pub fn clear(&mut self, event: Option<&K>) {
        match event {
            Some(event) => {
                self.events.shift_remove(event);
            }
            None => self.events.clear(),
        }
    }

    /// Mutable access to an existing list.
    pub fn list_mut(&mut self, event: &K) -> Option<&mut HandlerList> {
        self.events.get_mut(event)
    }

    /// Deletes `event` if its list became empty.
    fn prune(&mut self, event: &K) {
        if self.events.get(event).is_some_and(HandlerList::is_empty) {
            self.events.shift_remove(event);
        }
    }
}
