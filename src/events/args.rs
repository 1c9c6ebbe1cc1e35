//! # Positional arguments passed to listeners.
//!
//! [`Args`] is the payload of one emission: an immutable list of type-erased
//! values. It is `Arc`-backed, so handing the same arguments to every listener
//! of a pass (or moving them into a spawned deferred listener) only bumps a
//! reference count.
//!
//! Listeners read positions back with [`Args::get`], which downcasts to the
//! expected type and returns `None` on a type mismatch or a missing position.
//!
//! ## Example
//! ```rust
//! use eventemitter::{args, Args};
//!
//! let a: Args = args![42_u32, "hello", String::from("world")];
//! assert_eq!(a.len(), 3);
//! assert_eq!(a.get::<u32>(0), Some(&42));
//! assert_eq!(a.get::<&str>(1), Some(&"hello"));
//! assert_eq!(a.get::<String>(2).map(String::as_str), Some("world"));
//! assert_eq!(a.get::<u64>(0), None);
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// One type-erased argument value.
pub type Value = Arc<dyn Any + Send + Sync>;

/// Immutable, cheaply clonable argument list.
#[derive(Clone, Default)]
pub struct Args {
    values: Arc<[Value]>,
}

impl Args {
    /// Creates an empty argument list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an argument list from already erased values.
    pub fn from_values(values: Vec<Value>) -> Self {
        Self {
            values: values.into(),
        }
    }

    /// Returns a new list with `value` appended.
    ///
    /// The receiver is consumed; the erased values already present are shared,
    /// not copied.
    #[must_use]
    pub fn with<T: Any + Send + Sync>(self, value: T) -> Self {
        let mut values = self.values.to_vec();
        values.push(Arc::new(value));
        Self::from_values(values)
    }

    /// Downcasts the value at `index` to `T`.
    pub fn get<T: Any>(&self, index: usize) -> Option<&T> {
        self.values.get(index)?.downcast_ref::<T>()
    }

    /// Returns the erased value at `index`.
    pub fn value(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if no argument was passed.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates the erased values in order.
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.values.iter()
    }
}

impl fmt::Debug for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Args").field("len", &self.len()).finish()
    }
}

/// Builds an [`Args`] from a list of expressions.
///
/// ```rust
/// use eventemitter::args;
///
/// assert!(args![].is_empty());
/// assert_eq!(args![1, 2, 3].len(), 3);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        $crate::Args::new()
    };
    ($($value:expr),+ $(,)?) => {
        $crate::Args::from_values(::std::vec![
            $(::std::sync::Arc::new($value) as $crate::events::Value),+
        ])
    };
}
