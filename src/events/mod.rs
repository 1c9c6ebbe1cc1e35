//! Event keys and emission payloads.
//!
//! ## Contents
//! - [`EventKey`] trait for key types, with the two meta keys
//!   (`new_listener`, `remove_listener`) the emitter reports mutations under
//! - [`Args`] / [`args!`](crate::args) positional, type-erased listener arguments
//!
//! Meta events are emitted with `args![event_key, listener]`, so an observer
//! reads them back with `args.get::<K>(0)` and `args.get::<Listener>(1)`.

mod args;
mod key;

pub use args::{Args, Value};
pub use key::{EventKey, NEW_LISTENER, REMOVE_LISTENER};
