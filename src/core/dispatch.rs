//! # Dispatchers: how one `emit` drives the listeners of a key.
//!
//! All three dispatchers share the same prologue: the record list is
//! **snapshotted** at entry, so listeners added or removed during the emit do
//! not change who gets called for this emit. For each snapshotted record, a
//! once-record is removed (exact registration, `remove_listener` emitted) and
//! then invoked. A once-record already removed by an earlier listener is still
//! invoked for this emit.
//!
//! ```text
//!                 ┌──────────────── snapshot ────────────────┐
//!                 │  rec1     rec2(once)     rec3(deferred)   │
//!                 └──────────────────────────────────────────┘
//! sync:        call rec1 ─► remove+call rec2 ─► detach rec3 (fire-and-forget)
//! meta:        call rec1 ─► remove+call rec2 ─► complete rec3 (blocking)
//! concurrent:  remove rec2 ─► call rec1 ─► call rec2 ─► spawn rec3 ─► join all
//! in order:    call rec1 ─► remove+call rec2 ─► spawn rec3 ─► await rec3
//! ```
//!
//! ## Rules
//! - `sync` and `in order` are **fail-fast**: the first failure is returned
//!   and the remaining snapshot entries are not invoked.
//! - `concurrent` launches every entry, waits for all of them, then returns the
//!   failure of the **earliest snapshot position**. Later failures are dropped.
//! - A panicking deferred listener re-panics in the caller once it is its turn
//!   to be reported.
//! - A failing `remove_listener` observer during once-removal is that entry's
//!   failure; the once-listener itself is then not invoked.
//! - `concurrent` removes every once-record of the snapshot before it invokes
//!   the first listener.
//! - Meta-events use the synchronous loop, except that a deferred observer is
//!   run to completion and its failure returned.

use futures::future::{join_all, BoxFuture};
use tokio::task::JoinHandle;

use crate::core::emitter::EmitterCore;
use crate::core::scheduler::Settled;
use crate::error::{EmitError, ListenerResult};
use crate::events::{Args, EventKey};
use crate::listeners::{Call, HandlerRecord};

/// One launched entry of a concurrent emit.
enum Launch {
    Settled(Settled),
    Running(JoinHandle<ListenerResult>),
}

impl<K: EventKey> EmitterCore<K> {
    /// Synchronous dispatch. Returns `Ok(false)` if `event` has no listeners.
    ///
    /// Deferred listeners are handed to the scheduler without waiting; their
    /// failures are logged, not returned.
    pub(crate) fn dispatch_sync(&self, event: &K, args: &Args) -> Result<bool, EmitError> {
        self.dispatch_inline(event, args, "sync", |record, fut| {
            self.scheduler().detach(event, record.listener().name(), fut)
        })
    }

    /// Meta-event dispatch: like [`dispatch_sync`](Self::dispatch_sync), but a
    /// deferred observer is run to completion and its failure is returned.
    pub(crate) fn dispatch_meta(&self, event: &K, args: &Args) -> Result<bool, EmitError> {
        self.dispatch_inline(event, args, "meta", |_, fut| {
            self.scheduler().complete(event, fut)
        })
    }

    fn dispatch_inline<F>(
        &self,
        event: &K,
        args: &Args,
        mode: &'static str,
        mut pending: F,
    ) -> Result<bool, EmitError>
    where
        F: FnMut(&HandlerRecord, BoxFuture<'static, ListenerResult>) -> Result<(), EmitError>,
    {
        let Some(snapshot) = self.snapshot(event) else {
            return Ok(false);
        };
        self.trace_dispatch(event, &snapshot, mode);

        for record in &snapshot {
            self.settle_once(event, record)?;
            match record.listener().call(args) {
                Call::Done(res) => res.map_err(EmitError::Listener)?,
                Call::Pending(fut) => pending(record, fut)?,
            }
        }
        Ok(true)
    }

    /// Concurrent dispatch: everything launched in snapshot order, then joined.
    pub(crate) async fn dispatch_concurrent(
        &self,
        event: &K,
        args: Args,
    ) -> Result<bool, EmitError> {
        let Some(snapshot) = self.snapshot(event) else {
            return Ok(false);
        };
        self.trace_dispatch(event, &snapshot, "concurrent");

        // Every once-record of the pass is gone before any listener runs.
        let settled: Vec<_> = snapshot
            .iter()
            .map(|record| self.settle_once(event, record))
            .collect();

        let mut launched = Vec::with_capacity(snapshot.len());
        for (record, settled) in snapshot.iter().zip(settled) {
            if let Err(err) = settled {
                launched.push(Launch::Settled(Settled::Failed(err)));
                continue;
            }
            let launch = match record.listener().call(&args) {
                Call::Done(Ok(())) => Launch::Settled(Settled::Ok),
                Call::Done(Err(err)) => {
                    Launch::Settled(Settled::Failed(EmitError::Listener(err)))
                }
                Call::Pending(fut) => match self.scheduler().spawn(event, fut) {
                    Ok(join) => Launch::Running(join),
                    Err(err) => Launch::Settled(Settled::Failed(err)),
                },
            };
            launched.push(launch);
        }

        let outcomes = join_all(launched.into_iter().map(|launch| async move {
            match launch {
                Launch::Settled(settled) => settled,
                Launch::Running(join) => Settled::from_join(join.await, event),
            }
        }))
        .await;

        match outcomes.into_iter().find(|settled| !settled.is_ok()) {
            Some(first) => first.into_result().map(|()| true),
            None => Ok(true),
        }
    }

    /// Ordered dispatch: each listener completes before the next one starts.
    pub(crate) async fn dispatch_in_order(
        &self,
        event: &K,
        args: Args,
    ) -> Result<bool, EmitError> {
        let Some(snapshot) = self.snapshot(event) else {
            return Ok(false);
        };
        self.trace_dispatch(event, &snapshot, "in_order");

        for record in &snapshot {
            self.settle_once(event, record)?;
            match record.listener().call(&args) {
                Call::Done(res) => res.map_err(EmitError::Listener)?,
                Call::Pending(fut) => {
                    let join = self.scheduler().spawn(event, fut)?;
                    Settled::from_join(join.await, event).into_result()?;
                }
            }
        }
        Ok(true)
    }

    /// Removes a once-record before its invocation.
    fn settle_once(&self, event: &K, record: &HandlerRecord) -> Result<(), EmitError> {
        if record.once() {
            self.remove_record(event, record)?;
        }
        Ok(())
    }

    fn trace_dispatch(&self, event: &K, snapshot: &[HandlerRecord], mode: &'static str) {
        tracing::trace!(
            emitter = %self.config().label_or_default(),
            event = ?event,
            listeners = snapshot.len(),
            mode,
            "dispatching"
        );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use parking_lot::Mutex;

    use crate::core::emitter::EmitterCore;
    use crate::listeners::Listener;
    use crate::{args, Args};

    type Log = Arc<Mutex<Vec<&'static str>>>;

    fn push(log: &Log, tag: &'static str) -> Listener {
        let log = Arc::clone(log);
        Listener::new(move |_| {
            log.lock().push(tag);
            Ok(())
        })
    }

    fn push_later(log: &Log, tag: &'static str, ms: u64) -> Listener {
        let log = Arc::clone(log);
        Listener::deferred(move |_| {
            let log = Arc::clone(&log);
            async move {
                tokio::time::sleep(Duration::from_millis(ms)).await;
                log.lock().push(tag);
                Ok(())
            }
        })
    }

    fn fail_later(msg: &'static str, ms: u64) -> Listener {
        Listener::deferred(move |_| async move {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            Err(msg.into())
        })
    }

    #[test]
    fn sync_dispatch_of_unknown_event_reports_false() {
        let core = EmitterCore::<String>::default();
        assert!(!core.dispatch_sync(&"nope".into(), &Args::new()).unwrap());
    }

    #[test]
    fn sync_dispatch_is_fail_fast() {
        let core = EmitterCore::<String>::default();
        let log = Log::default();
        core.add("x".into(), push(&log, "a"), false, false).unwrap();
        core.add("x".into(), Listener::new(|_| Err("b failed".into())), false, false)
            .unwrap();
        core.add("x".into(), push(&log, "c"), false, false).unwrap();

        let err = core.dispatch_sync(&"x".into(), &Args::new()).unwrap_err();
        assert_eq!(err.to_string(), "b failed");
        assert_eq!(*log.lock(), vec!["a"]);
    }

    #[test]
    fn snapshot_ignores_listeners_added_during_emit() {
        let core = Arc::new(EmitterCore::<String>::default());
        let log = Log::default();

        let weak = Arc::downgrade(&core);
        let late = push(&log, "late");
        core.add(
            "x".into(),
            Listener::new(move |_| {
                if let Some(core) = weak.upgrade() {
                    core.add("x".into(), late.clone(), false, false)?;
                }
                Ok(())
            }),
            false,
            false,
        )
        .unwrap();

        core.dispatch_sync(&"x".into(), &Args::new()).unwrap();
        assert!(log.lock().is_empty());
        assert_eq!(core.listener_count(&"x".into()), 2);

        core.dispatch_sync(&"x".into(), &Args::new()).unwrap();
        assert_eq!(*log.lock(), vec!["late"]);
    }

    #[test]
    fn sync_dispatch_without_runtime_fails_on_deferred_listener() {
        let core = EmitterCore::<String>::default();
        core.add("x".into(), Listener::deferred(|_| async { Ok(()) }), false, false)
            .unwrap();

        let err = core.dispatch_sync(&"x".into(), &args![1_u8]).unwrap_err();
        assert_eq!(err.as_label(), "emit_no_runtime");
    }

    #[tokio::test]
    async fn sync_dispatch_detaches_deferred_listeners() {
        let core = EmitterCore::<String>::default();
        let log = Log::default();
        core.add("x".into(), push_later(&log, "slow", 10), false, false)
            .unwrap();
        core.add("x".into(), fail_later("ignored", 5), false, false)
            .unwrap();
        core.add("x".into(), push(&log, "fast"), false, false).unwrap();

        assert!(core.dispatch_sync(&"x".into(), &Args::new()).unwrap());
        assert_eq!(*log.lock(), vec!["fast"]);

        core.scheduler().drain().await;
        assert_eq!(*log.lock(), vec!["fast", "slow"]);
    }

    #[tokio::test]
    async fn concurrent_dispatch_overlaps_deferred_listeners() {
        let core = EmitterCore::<String>::default();
        let log = Log::default();
        core.add("x".into(), push_later(&log, "slow", 40), false, false)
            .unwrap();
        core.add("x".into(), push_later(&log, "quick", 5), false, false)
            .unwrap();
        core.add("x".into(), push(&log, "inline"), false, false)
            .unwrap();

        assert!(core.dispatch_concurrent(&"x".into(), Args::new()).await.unwrap());
        assert_eq!(*log.lock(), vec!["inline", "quick", "slow"]);
        assert_eq!(core.scheduler().in_flight(), 0);
    }

    #[tokio::test]
    async fn concurrent_dispatch_reports_earliest_failure_after_all_settle() {
        let core = EmitterCore::<String>::default();
        let log = Log::default();
        core.add("x".into(), fail_later("first", 30), false, false)
            .unwrap();
        core.add("x".into(), fail_later("second", 1), false, false)
            .unwrap();
        core.add("x".into(), push_later(&log, "done", 10), false, false)
            .unwrap();

        let err = core
            .dispatch_concurrent(&"x".into(), Args::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "first");
        assert_eq!(*log.lock(), vec!["done"]);
    }

    #[tokio::test]
    async fn in_order_dispatch_serialises_deferred_listeners() {
        let core = EmitterCore::<String>::default();
        let log = Log::default();
        core.add("x".into(), push_later(&log, "slow", 30), false, false)
            .unwrap();
        core.add("x".into(), push_later(&log, "quick", 1), false, false)
            .unwrap();
        core.add("x".into(), push(&log, "inline"), false, false)
            .unwrap();

        core.dispatch_in_order(&"x".into(), Args::new()).await.unwrap();
        assert_eq!(*log.lock(), vec!["slow", "quick", "inline"]);
    }

    #[tokio::test]
    async fn in_order_dispatch_stops_at_first_failure() {
        let core = EmitterCore::<String>::default();
        let log = Log::default();
        core.add("x".into(), fail_later("stop", 5), false, false)
            .unwrap();
        core.add("x".into(), push(&log, "never"), false, false)
            .unwrap();

        let err = core
            .dispatch_in_order(&"x".into(), Args::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "stop");
        assert!(log.lock().is_empty());
    }

    async fn explode() -> crate::ListenerResult {
        panic!("listener exploded")
    }

    #[tokio::test]
    #[should_panic(expected = "listener exploded")]
    async fn deferred_panic_is_resumed_in_caller() {
        let core = EmitterCore::<String>::default();
        core.add("x".into(), Listener::deferred(|_| explode()), false, false)
            .unwrap();

        let _ = core.dispatch_concurrent(&"x".into(), Args::new()).await;
    }

    #[tokio::test]
    async fn once_listener_runs_once_under_every_dispatcher() {
        let core = EmitterCore::<String>::default();
        let log = Log::default();
        core.add("x".into(), push(&log, "a"), true, false).unwrap();
        core.add("x".into(), push_later(&log, "b", 1), true, false)
            .unwrap();

        core.dispatch_concurrent(&"x".into(), Args::new()).await.unwrap();
        assert!(!core.dispatch_concurrent(&"x".into(), Args::new()).await.unwrap());
        assert!(!core.dispatch_in_order(&"x".into(), Args::new()).await.unwrap());
        assert_eq!(*log.lock(), vec!["a", "b"]);
    }

    #[test]
    fn meta_dispatch_completes_deferred_observers() {
        let core = EmitterCore::<String>::default();
        let log = Log::default();
        core.add("x".into(), push_later(&log, "deferred", 5), false, false)
            .unwrap();
        core.add("x".into(), push(&log, "inline"), false, false).unwrap();

        assert!(core.dispatch_meta(&"x".into(), &Args::new()).unwrap());
        assert_eq!(*log.lock(), vec!["deferred", "inline"]);

        core.add("y".into(), fail_later("refused", 1), false, false)
            .unwrap();
        let err = core.dispatch_meta(&"y".into(), &Args::new()).unwrap_err();
        assert_eq!(err.to_string(), "refused");
    }

    #[tokio::test]
    async fn concurrent_dispatch_removes_once_records_before_calling() {
        let core = Arc::new(EmitterCore::<String>::default());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let weak = Arc::downgrade(&core);
        let s = Arc::clone(&seen);
        core.add(
            "x".into(),
            Listener::new(move |_| {
                let count = weak.upgrade().map_or(0, |c| c.listener_count(&"x".into()));
                s.lock().push(count);
                Ok(())
            }),
            false,
            false,
        )
        .unwrap();
        core.add("x".into(), Listener::new(|_| Ok(())), true, false)
            .unwrap();
        core.add("x".into(), Listener::new(|_| Ok(())), true, false)
            .unwrap();

        core.dispatch_concurrent(&"x".into(), Args::new()).await.unwrap();
        assert_eq!(*seen.lock(), vec![1]);
    }

    #[test]
    fn failing_remove_observer_skips_the_once_listener() {
        let core = EmitterCore::<String>::default();
        let log = Log::default();
        core.add("x".into(), push(&log, "once"), true, false).unwrap();
        core.add(
            "remove_listener".into(),
            Listener::new(|_| Err("observer refused".into())),
            false,
            false,
        )
        .unwrap();

        let err = core.dispatch_sync(&"x".into(), &Args::new()).unwrap_err();
        assert_eq!(err.to_string(), "observer refused");
        assert!(log.lock().is_empty());
        assert_eq!(core.listener_count(&"x".into()), 0);
    }
}
