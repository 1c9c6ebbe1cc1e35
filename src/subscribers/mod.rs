//! # Built-in meta-event observers.
//!
//! Observers are plain listeners registered on the two meta keys; anything
//! implementing [`Emitter`](crate::Emitter) can host them.
//!
//! ```text
//! on("data", L) ──► new_listener ──► LogWriter (added)
//! off("data", L) ─► remove_listener ─► LogWriter (removed)
//! ```

mod log;

pub use log::LogWriter;
