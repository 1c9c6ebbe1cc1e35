//! Emitter core: registry, meta-event protocol, dispatch and scheduling.
//!
//! The public emitters are thin facades over [`EmitterCore`]; everything that
//! touches listener state lives here.
//!
//! Internal modules:
//! - [`registry`]: ordered key → handler-list storage, no locking;
//! - [`emitter`]: the locked registry plus `new_listener`/`remove_listener` notifications;
//! - [`dispatch`]: sync, concurrent and in-order dispatch over a snapshot;
//! - [`scheduler`]: tokio task spawning and tracking for deferred listeners;
//! - [`builder`]: assembly of a core (config, runtime) into an emitter.

mod builder;
mod dispatch;
mod emitter;
mod registry;
mod scheduler;

pub use builder::EmitterBuilder;
pub use emitter::EmitterCore;
pub use scheduler::TaskScheduler;
