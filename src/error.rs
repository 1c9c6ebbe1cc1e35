//! Error types used by the emitters and their listeners.
//!
//! This module defines:
//!
//! - [`BoxError`] / [`ListenerResult`]: what a listener returns.
//! - [`EmitError`]: errors surfaced by `emit`, registration and removal.
//!
//! A listener failure is carried **verbatim** inside [`EmitError::Listener`]:
//! the variant is transparent, so `Display` and `source()` are the listener's
//! own, and [`EmitError::downcast_ref`] gives back the concrete error type.
//!
//! "Listener not found" is never an error: removal is idempotent, emitting an
//! unknown event returns `false`, and introspection returns empty lists.

use thiserror::Error;

/// Type-erased error returned by listeners.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Return type of every listener, synchronous or deferred.
pub type ListenerResult = Result<(), BoxError>;

/// # Errors produced while dispatching events.
///
/// Returned by `emit`/`emit_in_order`, and by registration/removal calls
/// whose `new_listener`/`remove_listener` observers fail.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum EmitError {
    /// A listener returned an error. Forwarded unchanged.
    #[error(transparent)]
    Listener(BoxError),

    /// A deferred listener was cancelled by the runtime before it completed.
    #[error("deferred listener for event {event} was cancelled before completion")]
    Cancelled {
        /// Debug rendering of the event key.
        event: String,
    },

    /// A deferred listener had to be scheduled but no tokio runtime was available.
    #[error("no tokio runtime available to run deferred listener for event {event}")]
    NoRuntime {
        /// Debug rendering of the event key.
        event: String,
    },

    /// The private runtime that completes a deferred meta-event observer could
    /// not be started.
    #[error("failed to start a runtime for meta-event {event}: {source}")]
    MetaRuntime {
        /// Debug rendering of the meta key.
        event: String,
        /// Runtime construction failure.
        #[source]
        source: std::io::Error,
    },
}

impl EmitError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use eventemitter::EmitError;
    ///
    /// let err = EmitError::NoRuntime { event: "\"tick\"".into() };
    /// assert_eq!(err.as_label(), "emit_no_runtime");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            EmitError::Listener(_) => "emit_listener_failed",
            EmitError::Cancelled { .. } => "emit_listener_cancelled",
            EmitError::NoRuntime { .. } => "emit_no_runtime",
            EmitError::MetaRuntime { .. } => "emit_meta_runtime_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            EmitError::Listener(err) => format!("listener failed: {err}"),
            EmitError::Cancelled { event } => format!("cancelled: event={event}"),
            EmitError::NoRuntime { event } => format!("no runtime: event={event}"),
            EmitError::MetaRuntime { event, source } => {
                format!("meta runtime failed: event={event} error={source}")
            }
        }
    }

    /// Returns the listener's original error, if this is a listener failure.
    pub fn into_listener_error(self) -> Option<BoxError> {
        match self {
            EmitError::Listener(err) => Some(err),
            _ => None,
        }
    }

    /// Downcasts a listener failure to its concrete error type.
    ///
    /// # Example
    /// ```
    /// use std::fmt;
    /// use eventemitter::EmitError;
    ///
    /// #[derive(Debug)]
    /// struct Boom;
    /// impl fmt::Display for Boom {
    ///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str("boom") }
    /// }
    /// impl std::error::Error for Boom {}
    ///
    /// let err = EmitError::Listener(Box::new(Boom));
    /// assert!(err.downcast_ref::<Boom>().is_some());
    /// assert_eq!(err.to_string(), "boom");
    /// ```
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        match self {
            EmitError::Listener(err) => err.downcast_ref::<E>(),
            _ => None,
        }
    }

    /// Indicates whether the error came from a listener (as opposed to the runtime).
    pub fn is_listener_error(&self) -> bool {
        matches!(self, EmitError::Listener(_))
    }
}
