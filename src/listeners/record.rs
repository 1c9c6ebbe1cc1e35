//! # Handler records.
//!
//! A [`HandlerRecord`] is what the registry actually stores per registration:
//! the [`Listener`] handle, its identity, the `once` flag and a registry-wide
//! `serial`.
//!
//! ## Rules
//! - Records are immutable; they are only ever replaced by removal.
//! - Two registrations of the same listener yield two records with the same
//!   [`identity`](HandlerRecord::identity) but different
//!   [`serial`](HandlerRecord::serial)s.
//! - Identity is what `remove_listener` matches on; the serial is what a firing
//!   once-listener uses to remove exactly its own registration.

use crate::listeners::listener::{Listener, ListenerId};

/// One registration of a listener under an event key.
#[derive(Clone, Debug)]
pub(crate) struct HandlerRecord {
    serial: u64,
    listener: Listener,
    once: bool,
}

impl HandlerRecord {
    /// Creates a record. Serials are assigned by the registry.
    pub(crate) fn new(serial: u64, listener: Listener, once: bool) -> Self {
        Self {
            serial,
            listener,
            once,
        }
    }

    /// Returns the registry-unique serial of this registration.
    #[inline]
    pub(crate) fn serial(&self) -> u64 {
        self.serial
    }

    /// Returns the identity of the wrapped listener.
    #[inline]
    pub(crate) fn identity(&self) -> ListenerId {
        self.listener.id()
    }

    /// Returns the wrapped listener.
    #[inline]
    pub(crate) fn listener(&self) -> &Listener {
        &self.listener
    }

    /// True if the record is removed right before its first invocation.
    #[inline]
    pub(crate) fn once(&self) -> bool {
        self.once
    }
}
