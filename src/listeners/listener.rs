//! # Listener handles (`Listener`)
//!
//! [`Listener`] wraps a callable together with a stable **identity**. The
//! identity is a process-unique [`ListenerId`] handed out when the handle is
//! constructed; clones share it. Registering two clones of the same handle is
//! therefore "registering the same listener twice", and removal matches by id.
//!
//! The callable is normalised once, at construction, into one of two shapes:
//! - **Immediate**: `Fn(&Args) -> ListenerResult`, runs to completion inline;
//! - **Deferred**: `Fn(Args) -> Future<Output = ListenerResult>`, produces a
//!   fresh future per invocation which the dispatcher hands to the scheduler.
//!
//! Dispatchers never branch on the shape themselves: [`Listener::call`] returns
//! either a finished result or a pending future, and each dispatcher decides
//! what to do with a pending future.
//!
//! ## Example
//! ```rust
//! use eventemitter::{Args, Listener};
//!
//! let sync = Listener::new(|args: &Args| {
//!     let _n = args.get::<u32>(0);
//!     Ok(())
//! });
//!
//! let deferred = Listener::deferred(|_args: Args| async move {
//!     // await something...
//!     Ok(())
//! })
//! .with_name("flush");
//!
//! assert!(!sync.is_deferred());
//! assert!(deferred.is_deferred());
//! assert_eq!(deferred.name(), "flush");
//! assert_eq!(sync.clone(), sync);
//! assert_ne!(sync, deferred);
//! ```

use std::borrow::Cow;
use std::fmt;
use std::future::Future;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::error::ListenerResult;
use crate::events::Args;

/// Global counter for listener identities.
static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identity of a [`Listener`] (shared by its clones).
pub type ListenerId = u64;

type ImmediateFn = dyn Fn(&Args) -> ListenerResult + Send + Sync;
type DeferredFn = dyn Fn(Args) -> BoxFuture<'static, ListenerResult> + Send + Sync;

/// Normalised callable shape, fixed at construction.
#[derive(Clone)]
enum Callable {
    Immediate(Arc<ImmediateFn>),
    Deferred(Arc<DeferredFn>),
}

/// Outcome of invoking a listener.
pub(crate) enum Call {
    /// The listener ran to completion.
    Done(ListenerResult),
    /// The listener produced a future that still has to be driven.
    Pending(BoxFuture<'static, ListenerResult>),
}

/// Shared handle to a registered callable.
#[derive(Clone)]
pub struct Listener {
    id: ListenerId,
    name: Cow<'static, str>,
    callable: Callable,
}

impl Listener {
    /// Wraps a synchronous callable.
    ///
    /// The callable runs inline when the event is dispatched; an `Err` is
    /// returned to the `emit` caller unchanged.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Args) -> ListenerResult + Send + Sync + 'static,
    {
        Self::from_callable(
            std::any::type_name::<F>(),
            Callable::Immediate(Arc::new(f)),
        )
    }

    /// Wraps an asynchronous callable.
    ///
    /// Each dispatch calls `f` once to create a fresh future, which runs on the
    /// emitter's task scheduler.
    pub fn deferred<F, Fut>(f: F) -> Self
    where
        F: Fn(Args) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ListenerResult> + Send + 'static,
    {
        let erased = move |args: Args| -> BoxFuture<'static, ListenerResult> { f(args).boxed() };
        Self::from_callable(
            std::any::type_name::<F>(),
            Callable::Deferred(Arc::new(erased)),
        )
    }

    fn from_callable(name: &'static str, callable: Callable) -> Self {
        Self {
            id: NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed),
            name: Cow::Borrowed(name),
            callable,
        }
    }

    /// Replaces the display name. Identity is unchanged.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Returns the identity shared by all clones of this handle.
    #[inline]
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Returns the display name (closure type name unless overridden).
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True if the callable is asynchronous.
    #[inline]
    pub fn is_deferred(&self) -> bool {
        matches!(self.callable, Callable::Deferred(_))
    }

    /// Invokes the callable with `args`.
    pub(crate) fn call(&self, args: &Args) -> Call {
        match &self.callable {
            Callable::Immediate(f) => Call::Done(f(args)),
            Callable::Deferred(f) => Call::Pending(f(args.clone())),
        }
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Listener {}

impl Hash for Listener {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_deferred() {
            "deferred"
        } else {
            "immediate"
        };
        write!(f, "Listener({}@{}, {kind})", self.name, self.id)
    }
}
