//! # Task scheduler for deferred listeners.
//!
//! [`TaskScheduler`] runs the futures produced by deferred listeners as tokio
//! tasks and keeps track of them:
//!
//! - **No silent cancellation**: work is spawned, so it keeps running even if
//!   the `emit` future that launched it is dropped.
//! - **Tracked**: every spawned listener is registered in a
//!   [`TaskTracker`]; [`TaskScheduler::drain`] waits for all of them, including
//!   fire-and-forget ones started by the synchronous dispatcher.
//! - **Runtime selection**: an explicit [`Handle`] (see
//!   [`EmitterBuilder::with_runtime`](crate::EmitterBuilder::with_runtime)), or
//!   the runtime current at spawn time.
//!
//! - **Meta-events complete inline**: a deferred `new_listener` or
//!   `remove_listener` observer is run to completion by
//!   [`TaskScheduler::complete`] on a scoped thread with its own current-thread
//!   runtime, so the registry mutation waits for it. No outer runtime is needed.
//!
//! ```text
//! dispatcher ── spawn(fut) ──► TaskTracker ──► tokio task ──► JoinHandle (awaited by emit)
//!            ├─ detach(fut) ─► TaskTracker ──► tokio task ──► failure logged via tracing
//!            └─ complete(fut) ─► scoped thread ─► current-thread runtime ─► block_on
//! ```

use std::any::Any;
use std::fmt::Debug;

use futures::future::BoxFuture;
use tokio::runtime::Handle;
use tokio::task::{JoinError, JoinHandle};
use tokio_util::task::TaskTracker;

use crate::error::{EmitError, ListenerResult};

/// Spawns and tracks deferred listener executions.
#[derive(Clone, Debug, Default)]
pub struct TaskScheduler {
    runtime: Option<Handle>,
    tracker: TaskTracker,
}

/// How one listener ended, once its task settled.
pub(crate) enum Settled {
    Ok,
    Failed(EmitError),
    Panicked(Box<dyn Any + Send + 'static>),
}

impl Settled {
    /// Maps a join result; panics are kept aside so they can be resumed.
    pub(crate) fn from_join(
        joined: Result<ListenerResult, JoinError>,
        event: &impl Debug,
    ) -> Self {
        match joined {
            Ok(Ok(())) => Settled::Ok,
            Ok(Err(err)) => Settled::Failed(EmitError::Listener(err)),
            Err(je) if je.is_panic() => Settled::Panicked(je.into_panic()),
            Err(_) => Settled::Failed(EmitError::Cancelled {
                event: format!("{event:?}"),
            }),
        }
    }

    /// Converts into the caller-facing result, resuming a listener panic.
    pub(crate) fn into_result(self) -> Result<(), EmitError> {
        match self {
            Settled::Ok => Ok(()),
            Settled::Failed(err) => Err(err),
            Settled::Panicked(payload) => std::panic::resume_unwind(payload),
        }
    }

    pub(crate) fn is_ok(&self) -> bool {
        matches!(self, Settled::Ok)
    }
}

impl TaskScheduler {
    /// Creates a scheduler bound to `runtime`, or to the current runtime when `None`.
    pub fn new(runtime: Option<Handle>) -> Self {
        Self {
            runtime,
            tracker: TaskTracker::new(),
        }
    }

    /// Number of listener tasks still running.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Waits until every tracked listener task has finished.
    ///
    /// New work may be scheduled while draining; it is waited for as well.
    pub async fn drain(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }

    fn handle(&self, event: &impl Debug) -> Result<Handle, EmitError> {
        if let Some(handle) = &self.runtime {
            return Ok(handle.clone());
        }
        Handle::try_current().map_err(|_| EmitError::NoRuntime {
            event: format!("{event:?}"),
        })
    }

    /// Spawns `fut`; the caller awaits the returned handle.
    pub(crate) fn spawn(
        &self,
        event: &impl Debug,
        fut: BoxFuture<'static, ListenerResult>,
    ) -> Result<JoinHandle<ListenerResult>, EmitError> {
        let handle = self.handle(event)?;
        Ok(self.tracker.spawn_on(fut, &handle))
    }

    /// Spawns `fut` without awaiting it; a failure is logged, not returned.
    pub(crate) fn detach(
        &self,
        event: &impl Debug,
        listener: &str,
        fut: BoxFuture<'static, ListenerResult>,
    ) -> Result<(), EmitError> {
        let handle = self.handle(event)?;
        let event = format!("{event:?}");
        let listener = listener.to_string();

        self.tracker.spawn_on(
            async move {
                if let Err(err) = fut.await {
                    tracing::warn!(
                        event = %event,
                        listener = %listener,
                        error = %err,
                        "detached listener failed"
                    );
                }
            },
            &handle,
        );
        Ok(())
    }

    /// Runs `fut` to completion before returning and hands back its result.
    ///
    /// The future runs on a scoped thread inside a fresh current-thread
    /// runtime, so this works from plain threads and from inside a runtime
    /// alike. Tasks the future spawns onto that runtime are dropped with it.
    /// A panic in the future is resumed in the caller.
    pub(crate) fn complete(
        &self,
        event: &impl Debug,
        fut: BoxFuture<'static, ListenerResult>,
    ) -> Result<(), EmitError> {
        let joined = std::thread::scope(|s| {
            s.spawn(move || {
                let rt = tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()?;
                Ok::<_, std::io::Error>(rt.block_on(fut))
            })
            .join()
        });

        match joined {
            Ok(Ok(res)) => res.map_err(EmitError::Listener),
            Ok(Err(source)) => Err(EmitError::MetaRuntime {
                event: format!("{event:?}"),
                source,
            }),
            Err(payload) => std::panic::resume_unwind(payload),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn spawn_without_runtime_is_an_error() {
        let sched = TaskScheduler::default();
        let err = sched.spawn(&"tick", async { Ok(()) }.boxed()).unwrap_err();
        assert_eq!(err.as_label(), "emit_no_runtime");
    }

    #[test]
    fn explicit_runtime_is_used_outside_its_context() {
        let rt = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let sched = TaskScheduler::new(Some(rt.handle().clone()));

        let join = sched.spawn(&"tick", async { Ok(()) }.boxed()).unwrap();
        let res = rt.block_on(join).unwrap();
        assert!(res.is_ok());
    }

    #[tokio::test]
    async fn drain_waits_for_detached_work() {
        let sched = TaskScheduler::default();
        let done = Arc::new(AtomicUsize::new(0));
        let d = Arc::clone(&done);

        sched
            .detach(
                &"tick",
                "slow",
                async move {
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    d.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
                .boxed(),
            )
            .unwrap();

        sched.drain().await;
        assert_eq!(done.load(Ordering::SeqCst), 1);
        assert_eq!(sched.in_flight(), 0);

        // Still usable after a drain.
        let join = sched.spawn(&"tick", async { Ok(()) }.boxed()).unwrap();
        assert!(join.await.unwrap().is_ok());
    }

    #[test]
    fn complete_runs_without_outer_runtime() {
        let sched = TaskScheduler::default();
        let done = Arc::new(AtomicUsize::new(0));
        let d = Arc::clone(&done);

        sched
            .complete(
                &"new_listener",
                async move {
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    d.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
                .boxed(),
            )
            .unwrap();
        assert_eq!(done.load(Ordering::SeqCst), 1);

        let err = sched
            .complete(&"new_listener", async { Err("refused".into()) }.boxed())
            .unwrap_err();
        assert_eq!(err.to_string(), "refused");
    }

    #[tokio::test]
    async fn complete_inside_a_runtime_blocks_until_done() {
        let sched = TaskScheduler::default();
        let done = Arc::new(AtomicUsize::new(0));
        let d = Arc::clone(&done);

        sched
            .complete(
                &"remove_listener",
                async move {
                    tokio::task::yield_now().await;
                    d.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
                .boxed(),
            )
            .unwrap();
        assert_eq!(done.load(Ordering::SeqCst), 1);
        assert_eq!(sched.in_flight(), 0);
    }

    #[tokio::test]
    async fn settled_maps_listener_errors() {
        let sched = TaskScheduler::default();
        let join = sched
            .spawn(&"tick", async { Err("broken".into()) }.boxed())
            .unwrap();
        let settled = Settled::from_join(join.await, &"tick");
        assert!(!settled.is_ok());
        let err = settled.into_result().unwrap_err();
        assert_eq!(err.to_string(), "broken");
    }
}
