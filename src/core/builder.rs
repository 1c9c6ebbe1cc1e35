use tokio::runtime::Handle;

use crate::{config::Config, events::EventKey};

use super::{emitter::EmitterCore, scheduler::TaskScheduler};

/// Builder for constructing an emitter with optional features.
///
/// # Example
/// ```
/// use eventemitter::{AsyncEventEmitter, Config, EmitterBuilder, Emitter};
///
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// let emitter: AsyncEventEmitter = EmitterBuilder::new(Config::default().with_label("jobs"))
///     .with_runtime(rt.handle().clone())
///     .build();
///
/// assert_eq!(emitter.core().config().label_or_default(), "jobs");
/// ```
pub struct EmitterBuilder<K: EventKey = String> {
    cfg: Config,
    runtime: Option<Handle>,
    _key: std::marker::PhantomData<fn() -> K>,
}

impl<K: EventKey> EmitterBuilder<K> {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            runtime: None,
            _key: std::marker::PhantomData,
        }
    }

    /// Runs deferred listeners on `handle` instead of the runtime current at
    /// emit time.
    ///
    /// Lets synchronous code emit to deferred listeners from outside any
    /// runtime context.
    pub fn with_runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    /// Builds the shared core only.
    ///
    /// Useful for user types that embed an [`EmitterCore`] and implement
    /// [`Emitter`](crate::Emitter) themselves.
    pub fn build_core(self) -> EmitterCore<K> {
        EmitterCore::new(self.cfg, TaskScheduler::new(self.runtime))
    }

    /// Builds any emitter type that wraps an [`EmitterCore`].
    pub fn build<E>(self) -> E
    where
        E: From<EmitterCore<K>>,
    {
        E::from(self.build_core())
    }
}
