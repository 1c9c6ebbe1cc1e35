//! # Event keys.
//!
//! Listeners are grouped under an [`EventKey`]. Any comparable, hashable value
//! can be a key; the trait only adds the two **meta keys** under which the
//! emitter reports its own registry mutations:
//!
//! - [`EventKey::new_listener`] fired *before* a listener is inserted;
//! - [`EventKey::remove_listener`] fired *after* a listener is removed.
//!
//! Meta keys are ordinary registry entries: listening to them, prepending to
//! them or removing them works exactly like for any other key.
//!
//! ## Custom keys
//! ```rust
//! use eventemitter::EventKey;
//!
//! #[derive(Debug, Clone, PartialEq, Eq, Hash)]
//! enum Topic {
//!     Connected,
//!     Closed,
//!     ListenerAdded,
//!     ListenerRemoved,
//! }
//!
//! impl EventKey for Topic {
//!     fn new_listener() -> Self { Topic::ListenerAdded }
//!     fn remove_listener() -> Self { Topic::ListenerRemoved }
//! }
//!
//! assert!(Topic::ListenerAdded.is_meta());
//! assert!(!Topic::Connected.is_meta());
//! ```

use std::borrow::Cow;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

/// Name of the event fired before a listener is added.
pub const NEW_LISTENER: &str = "new_listener";

/// Name of the event fired after a listener is removed.
pub const REMOVE_LISTENER: &str = "remove_listener";

/// Identifier under which listeners are grouped.
pub trait EventKey: Clone + Eq + Hash + Debug + Send + Sync + 'static {
    /// Key of the meta-event fired before a listener is inserted.
    fn new_listener() -> Self;

    /// Key of the meta-event fired after a listener is removed.
    fn remove_listener() -> Self;

    /// True for either meta key.
    fn is_meta(&self) -> bool {
        *self == Self::new_listener() || *self == Self::remove_listener()
    }
}

impl EventKey for String {
    fn new_listener() -> Self {
        NEW_LISTENER.to_string()
    }

    fn remove_listener() -> Self {
        REMOVE_LISTENER.to_string()
    }
}

impl EventKey for &'static str {
    fn new_listener() -> Self {
        NEW_LISTENER
    }

    fn remove_listener() -> Self {
        REMOVE_LISTENER
    }
}

impl EventKey for Cow<'static, str> {
    fn new_listener() -> Self {
        Cow::Borrowed(NEW_LISTENER)
    }

    fn remove_listener() -> Self {
        Cow::Borrowed(REMOVE_LISTENER)
    }
}

impl EventKey for Arc<str> {
    fn new_listener() -> Self {
        Arc::from(NEW_LISTENER)
    }

    fn remove_listener() -> Self {
        Arc::from(REMOVE_LISTENER)
    }
}
