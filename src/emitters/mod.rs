//! # Public emitters.
//!
//! ```text
//!             Emitter trait (on / once / prepend / off / listeners / events ...)
//!                  │ core()
//!        ┌─────────┴───────────┐
//!        ▼                     ▼
//!   EventEmitter         AsyncEventEmitter          your type { core: EmitterCore }
//!   emit() ─► sync       emit().await ─► concurrent
//!                        emit_in_order().await ─► ordered
//! ```
//!
//! Both emitters are `Send + Sync`; share them with listeners through `Arc`
//! (a `Weak` inside a listener avoids a reference cycle).

mod async_event_emitter;
mod emitter;
mod event_emitter;

pub use async_event_emitter::AsyncEventEmitter;
pub use emitter::Emitter;
pub use event_emitter::EventEmitter;

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use crate::{Args, Listener, ListenerResult};

    /// Records every invocation of the listeners it hands out.
    #[derive(Clone, Default)]
    pub(crate) struct Tracker {
        calls: Arc<Mutex<Vec<Args>>>,
    }

    impl Tracker {
        pub(crate) fn listener(&self) -> Listener {
            self.listener_with(|_| Ok(()))
        }

        pub(crate) fn listener_with<F>(&self, f: F) -> Listener
        where
            F: Fn(&Args) -> ListenerResult + Send + Sync + 'static,
        {
            let calls = Arc::clone(&self.calls);
            Listener::new(move |args| {
                calls.lock().push(args.clone());
                f(args)
            })
        }

        pub(crate) fn deferred(&self) -> Listener {
            let calls = Arc::clone(&self.calls);
            Listener::deferred(move |args: Args| {
                let calls = Arc::clone(&calls);
                async move {
                    tokio::task::yield_now().await;
                    calls.lock().push(args);
                    Ok(())
                }
            })
        }

        pub(crate) fn hits(&self) -> usize {
            self.calls.lock().len()
        }

        /// Argument count of each call.
        pub(crate) fn arg_counts(&self) -> Vec<usize> {
            self.calls.lock().iter().map(Args::len).collect()
        }

        /// Argument `index` of each call that has one of type `T`.
        pub(crate) fn values<T: Clone + 'static>(&self, index: usize) -> Vec<T> {
            self.calls
                .lock()
                .iter()
                .filter_map(|args| args.get::<T>(index).cloned())
                .collect()
        }
    }

    /// Listener that must never run.
    pub(crate) fn fail() -> Listener {
        Listener::new(|_| Err("this listener must not be called".into())).with_name("fail")
    }
}
