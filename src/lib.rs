//! # eventemitter
//!
//! **eventemitter** is an in-process publish/subscribe library for Rust.
//!
//! Code registers listeners under event keys and later emits an event to
//! invoke them with positional arguments. Listeners may be synchronous or
//! asynchronous; the emitter decides how an emission drives them.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   on / once / prepend / off                          emit(event, args)
//!            │                                                │
//!            ▼                                                ▼
//! ┌────────────────────────────────────┐      ┌──────────────────────────────┐
//! │ EmitterCore                        │      │ Dispatcher                   │
//! │  - new_listener  (before insert)   │      │  - snapshot handler list     │
//! │  - remove_listener (after remove)  │◄─────┤  - once: remove, then call   │
//! │  - Mutex<Registry>                 │      │  - sync / concurrent / order │
//! └─────────────────┬──────────────────┘      └──────────────┬───────────────┘
//!                   ▼                                        ▼
//!      Registry (IndexMap, creation order)         Listener::call(&Args)
//!        "data" ─► [rec#1 L1] [rec#3 L2]             ├─ Immediate ─► result
//!        "new_listener" ─► [rec#2 M]                 └─ Deferred ──► TaskScheduler
//!                                                                     (tokio tasks,
//!                                                                      TaskTracker)
//! ```
//!
//! ### Emission
//! ```text
//! snapshot = registry[event].clone()        (empty ─► Ok(false))
//! for record in snapshot {
//!   ├─► once? remove exactly this record ─► emit remove_listener (sync)
//!   └─► call listener
//!         ├─ EventEmitter::emit            ─► inline, fail-fast; deferred detached
//!         ├─ AsyncEventEmitter::emit       ─► once-removals first, start all, join all
//!         └─ AsyncEventEmitter::emit_in_order ─► await each, fail-fast
//! }
//! Ok(true)
//! ```
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits                          |
//! |-------------------|---------------------------------------------------------------|---------------------------------------------|
//! | **Emitters**      | Synchronous and asynchronous dispatch.                        | [`EventEmitter`], [`AsyncEventEmitter`]     |
//! | **Listener API**  | Registration, removal, introspection; usable by any type.     | [`Emitter`], [`EmitterCore`]                |
//! | **Listeners**     | Identity-carrying handles over sync or async callables.       | [`Listener`], [`Args`], [`args!`]           |
//! | **Keys**          | Strings or any user key type with two meta keys.              | [`EventKey`]                                |
//! | **Errors**        | Listener errors forwarded verbatim, runtime errors typed.     | [`EmitError`], [`ListenerResult`]           |
//! | **Configuration** | Leak warning threshold, log label, tokio runtime.             | [`Config`], [`EmitterBuilder`]              |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use parking_lot::Mutex;
//! use eventemitter::{args, Args, AsyncEventEmitter, Emitter, Listener};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let ee = AsyncEventEmitter::new();
//!     let log = Arc::new(Mutex::new(Vec::<String>::new()));
//!
//!     // Observe registrations.
//!     let l = Arc::clone(&log);
//!     ee.on("new_listener", Listener::new(move |args: &Args| {
//!         if let Some(event) = args.get::<String>(0) {
//!             l.lock().push(format!("added to {event}"));
//!         }
//!         Ok(())
//!     }))?;
//!
//!     // An async listener, fired once.
//!     let l = Arc::clone(&log);
//!     ee.once("greet", Listener::deferred(move |args: Args| {
//!         let l = Arc::clone(&l);
//!         async move {
//!             let name = args.get::<&str>(0).copied().unwrap_or("nobody");
//!             l.lock().push(format!("hello {name}"));
//!             Ok(())
//!         }
//!     }))?;
//!
//!     assert!(ee.emit("greet", args!["world"]).await?);
//!     assert!(!ee.emit("greet", args!["again"]).await?);
//!
//!     assert_eq!(*log.lock(), vec!["added to greet", "hello world"]);
//!     Ok(())
//! }
//! ```
mod config;
mod core;
mod emitters;
mod error;
mod listeners;

pub mod events;

// ---- Public re-exports ----

pub use crate::config::Config;
pub use crate::core::{EmitterBuilder, EmitterCore, TaskScheduler};
pub use crate::emitters::{AsyncEventEmitter, Emitter, EventEmitter};
pub use crate::error::{BoxError, EmitError, ListenerResult};
pub use crate::events::{Args, EventKey};
pub use crate::listeners::{Listener, ListenerId};

// Optional: expose a simple built-in meta-event logger (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
mod subscribers;
#[cfg(feature = "logging")]
pub use crate::subscribers::LogWriter;
