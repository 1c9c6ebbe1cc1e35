//! # Listeners and handler records.
//!
//! This module provides the listener-side types:
//! - [`Listener`] - identity-carrying handle over a sync or async callable
//! - [`ListenerId`] - the identity token used for removal matching
//! - [`HandlerRecord`] - one registration (listener + once flag) as stored by the registry

mod listener;
mod record;

pub(crate) use listener::Call;
pub use listener::{Listener, ListenerId};
pub(crate) use record::HandlerRecord;
