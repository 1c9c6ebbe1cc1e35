//! # The `Emitter` trait: registration, removal and introspection.
//!
//! Everything except `emit` is shared by all emitters and lives here as
//! provided methods over [`Emitter::core`]. A type becomes an emitter by owning
//! an [`EmitterCore`] and returning it; there is no base type to inherit from.
//!
//! ## Example
//! ```rust
//! use eventemitter::{Emitter, EmitterCore, Listener};
//!
//! #[derive(Default)]
//! struct Door {
//!     events: EmitterCore,
//!     open: bool,
//! }
//!
//! impl Emitter for Door {
//!     fn core(&self) -> &EmitterCore {
//!         &self.events
//!     }
//! }
//!
//! let door = Door::default();
//! door.on("open", Listener::new(|_| Ok(())))?
//!     .once("close", Listener::new(|_| Ok(())))?;
//!
//! assert_eq!(door.events(), vec!["open".to_string(), "close".to_string()]);
//! assert!(!door.open);
//! # Ok::<(), eventemitter::EmitError>(())
//! ```

use crate::core::EmitterCore;
use crate::error::EmitError;
use crate::events::EventKey;
use crate::listeners::Listener;

/// Shared listener-management surface of every emitter.
///
/// All methods take `&self`. Registration and removal return `&Self` so calls
/// can be chained with `?`; they only fail when a `new_listener` or
/// `remove_listener` observer fails.
pub trait Emitter<K: EventKey = String> {
    /// Returns the core holding the registry.
    fn core(&self) -> &EmitterCore<K>;

    /// Appends `listener` to the listeners of `event`.
    fn add_listener(&self, event: impl Into<K>, listener: Listener) -> Result<&Self, EmitError> {
        self.core().add(event.into(), listener, false, false)?;
        Ok(self)
    }

    /// Appends `listener`; it is removed right before its first invocation.
    fn add_once_listener(
        &self,
        event: impl Into<K>,
        listener: Listener,
    ) -> Result<&Self, EmitError> {
        self.core().add(event.into(), listener, true, false)?;
        Ok(self)
    }

    /// Puts `listener` in front of all listeners of `event`.
    fn prepend_listener(
        &self,
        event: impl Into<K>,
        listener: Listener,
    ) -> Result<&Self, EmitError> {
        self.core().add(event.into(), listener, false, true)?;
        Ok(self)
    }

    /// Puts a once-listener in front of all listeners of `event`.
    fn prepend_once_listener(
        &self,
        event: impl Into<K>,
        listener: Listener,
    ) -> Result<&Self, EmitError> {
        self.core().add(event.into(), listener, true, true)?;
        Ok(self)
    }

    /// Alias of [`add_listener`](Emitter::add_listener).
    fn on(&self, event: impl Into<K>, listener: Listener) -> Result<&Self, EmitError> {
        self.add_listener(event, listener)
    }

    /// Alias of [`add_once_listener`](Emitter::add_once_listener).
    fn once(&self, event: impl Into<K>, listener: Listener) -> Result<&Self, EmitError> {
        self.add_once_listener(event, listener)
    }

    /// Returns a registration function for `event`.
    ///
    /// The function registers the listener it is given and hands it back, so a
    /// listener can be defined and registered in one expression.
    ///
    /// ```rust
    /// use eventemitter::{Emitter, EventEmitter, Listener};
    ///
    /// let ee = EventEmitter::new();
    /// let on_tick = ee.handler_for("tick")(Listener::new(|_| Ok(())))?;
    /// assert_eq!(ee.listeners("tick"), vec![on_tick]);
    /// # Ok::<(), eventemitter::EmitError>(())
    /// ```
    fn handler_for(
        &self,
        event: impl Into<K>,
    ) -> impl FnOnce(Listener) -> Result<Listener, EmitError> + '_ {
        let event = event.into();
        move |listener: Listener| {
            self.core().add(event, listener.clone(), false, false)?;
            Ok(listener)
        }
    }

    /// Like [`handler_for`](Emitter::handler_for), registering a once-listener.
    fn once_handler_for(
        &self,
        event: impl Into<K>,
    ) -> impl FnOnce(Listener) -> Result<Listener, EmitError> + '_ {
        let event = event.into();
        move |listener: Listener| {
            self.core().add(event, listener.clone(), true, false)?;
            Ok(listener)
        }
    }

    /// Keys with at least one listener, in creation order.
    fn events(&self) -> Vec<K> {
        self.core().names()
    }

    /// Copy of the listeners of `event` in invocation order.
    fn listeners(&self, event: impl Into<K>) -> Vec<Listener> {
        self.core().listeners(&event.into())
    }

    /// Number of registrations under `event`.
    fn listener_count(&self, event: impl Into<K>) -> usize {
        self.core().listener_count(&event.into())
    }

    /// Removes the most recently added registration of `listener` under `event`.
    ///
    /// Does nothing if `listener` is not registered there.
    fn remove_listener(
        &self,
        event: impl Into<K>,
        listener: &Listener,
    ) -> Result<&Self, EmitError> {
        self.core().remove(&event.into(), listener)?;
        Ok(self)
    }

    /// Alias of [`remove_listener`](Emitter::remove_listener).
    fn off(&self, event: impl Into<K>, listener: &Listener) -> Result<&Self, EmitError> {
        self.remove_listener(event, listener)
    }

    /// Removes every listener of every key.
    fn remove_all_listeners(&self) -> Result<&Self, EmitError> {
        self.core().remove_all(None)?;
        Ok(self)
    }

    /// Removes every listener of `event`.
    fn remove_all_listeners_of(&self, event: impl Into<K>) -> Result<&Self, EmitError> {
        self.core().remove_all(Some(&event.into()))?;
        Ok(self)
    }
}

impl<K: EventKey> Emitter<K> for EmitterCore<K> {
    fn core(&self) -> &EmitterCore<K> {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitters::testing::Tracker;
    use crate::{args, EventEmitter};

    /// Owns an emitter the way an application type would.
    #[derive(Default)]
    struct Thermostat {
        events: EmitterCore,
        target: u32,
    }

    impl Emitter for Thermostat {
        fn core(&self) -> &EmitterCore {
            &self.events
        }
    }

    impl Thermostat {
        fn set(&mut self, target: u32) -> Result<(), EmitError> {
            self.target = target;
            self.events.dispatch_sync(&"changed".into(), &args![target])?;
            Ok(())
        }
    }

    #[test]
    fn composed_type_exposes_the_emitter_surface() {
        let mut t = Thermostat::default();
        let tracker = Tracker::default();
        t.once("changed", tracker.listener()).unwrap();

        t.set(21).unwrap();
        t.set(22).unwrap();
        t.remove_all_listeners().unwrap();

        assert_eq!(tracker.hits(), 1);
        assert_eq!(tracker.values::<u32>(0), vec![21]);
        assert_eq!(t.target, 22);
        assert!(t.events().is_empty());
    }

    #[test]
    fn registration_order_and_prepend() {
        let ee = EventEmitter::new();
        let (a, b, c, d) = (
            Tracker::default().listener(),
            Tracker::default().listener(),
            Tracker::default().listener(),
            Tracker::default().listener(),
        );

        ee.on("x", a.clone())
            .unwrap()
            .on("x", b.clone())
            .unwrap()
            .prepend_listener("x", c.clone())
            .unwrap()
            .prepend_once_listener("x", d.clone())
            .unwrap();

        assert_eq!(ee.listeners("x"), vec![d, c, a, b]);
        assert_eq!(ee.listener_count("x"), 4);
    }

    #[test]
    fn handler_for_registers_and_returns_the_listener() {
        let ee = EventEmitter::new();
        let tracker = Tracker::default();

        let l = ee.once_handler_for("tick")(tracker.listener()).unwrap();
        assert_eq!(ee.listeners("tick"), vec![l]);

        ee.emit("tick", args![1_u8]).unwrap();
        ee.emit("tick", args![2_u8]).unwrap();
        assert_eq!(tracker.values::<u8>(0), vec![1]);
    }

    #[test]
    fn remove_prefers_most_recent_registration() {
        let ee = EventEmitter::new();
        let foo = Tracker::default().listener();
        let bar = Tracker::default().listener();
        let baz = Tracker::default().listener();

        ee.add_listener("alpha", foo.clone()).unwrap();
        ee.add_listener("alpha", bar.clone()).unwrap();
        ee.add_listener("alpha", baz.clone()).unwrap();
        ee.add_listener("alpha", bar.clone()).unwrap();
        ee.add_once_listener("alpha", foo.clone()).unwrap();

        ee.remove_listener("alpha", &bar).unwrap();
        assert_eq!(
            ee.listeners("alpha"),
            vec![foo.clone(), bar.clone(), baz.clone(), foo.clone()]
        );

        ee.off("alpha", &foo).unwrap();
        assert_eq!(ee.listeners("alpha"), vec![foo.clone(), bar, baz]);

        // The remaining `foo` is the plain one: it survives an emit.
        ee.emit("alpha", args![]).unwrap();
        assert_eq!(ee.listeners("alpha")[0], foo);
    }

    #[test]
    fn removing_unknown_listener_is_a_silent_noop() {
        let ee = EventEmitter::new();
        let kept = Tracker::default().listener();
        let stranger = Tracker::default().listener();
        ee.on("hello", kept.clone()).unwrap();
        ee.on("remove_listener", Listener::new(|_| Err("must not fire".into())))
            .unwrap();

        ee.remove_listener("hello", &stranger).unwrap();
        ee.remove_listener("nowhere", &stranger).unwrap();
        assert_eq!(ee.listeners("hello"), vec![kept]);
    }

    #[test]
    fn register_then_remove_restores_events() {
        let ee = EventEmitter::new();
        let l = Tracker::default().listener();
        ee.on("existing", l.clone()).unwrap();
        let before = ee.events();

        ee.on("fresh", l.clone()).unwrap();
        assert_eq!(ee.events(), vec!["existing".to_string(), "fresh".to_string()]);
        ee.off("fresh", &l).unwrap();

        assert_eq!(ee.events(), before);
        assert!(ee.listeners("fresh").is_empty());
    }
}
