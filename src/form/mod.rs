//! Form-owned location state
//!
//! `LocationFormState` is a cheap, cloneable handle to the single location
//! value of a form. Every mutation goes through it and is announced to the
//! registered listeners, and to `watch` subscribers.

use crate::location::{LocationPatch, ResolvedLocation};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::watch;

/// Observer of form location changes
pub trait LocationListener: Send + Sync {
    /// Called after every change, including free-text field edits
    fn on_change(&self, location: &ResolvedLocation);

    /// Called after discrete selection events (search pick, clear)
    fn on_location_select(&self, _location: &ResolvedLocation) {}
}

struct FormInner {
    value: watch::Sender<ResolvedLocation>,
    listeners: RwLock<Vec<Arc<dyn LocationListener>>>,
}

/// Handle to a form's current `ResolvedLocation`
#[derive(Clone)]
pub struct LocationFormState {
    inner: Arc<FormInner>,
}

impl LocationFormState {
    pub fn new(initial: ResolvedLocation) -> Self {
        let (value, _) = watch::channel(initial);
        Self {
            inner: Arc::new(FormInner {
                value,
                listeners: RwLock::new(Vec::new()),
            }),
        }
    }

    /// Current value
    pub fn value(&self) -> ResolvedLocation {
        self.inner.value.borrow().clone()
    }

    /// Receiver that observes every replacement of the value
    pub fn subscribe(&self) -> watch::Receiver<ResolvedLocation> {
        self.inner.value.subscribe()
    }

    pub fn add_listener(&self, listener: Arc<dyn LocationListener>) {
        self.inner
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(listener);
    }

    /// Apply a partial update
    pub fn update(&self, patch: LocationPatch) -> ResolvedLocation {
        self.inner.value.send_modify(|current| patch.apply_to(current));
        self.announce(false)
    }

    /// Replace the whole value
    pub fn replace(&self, location: ResolvedLocation) -> ResolvedLocation {
        self.inner.value.send_replace(location);
        self.announce(false)
    }

    /// Mutate in place; listeners only hear about it when `f` returns true
    pub fn modify_if<F>(&self, f: F) -> bool
    where
        F: FnOnce(&mut ResolvedLocation) -> bool,
    {
        let changed = self.inner.value.send_if_modified(f);
        if changed {
            self.announce(false);
        }
        changed
    }

    /// Record a discrete selection
    pub fn select(&self, location: ResolvedLocation) -> ResolvedLocation {
        self.inner.value.send_replace(location);
        self.announce(true)
    }

    /// Reset to the empty location
    pub fn clear(&self) -> ResolvedLocation {
        self.select(ResolvedLocation::empty())
    }

    fn announce(&self, selection: bool) -> ResolvedLocation {
        let snapshot = self.value();
        let listeners: Vec<_> = self
            .inner
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        for listener in &listeners {
            listener.on_change(&snapshot);
        }
        if selection {
            for listener in &listeners {
                listener.on_location_select(&snapshot);
            }
        }
        snapshot
    }
}

impl Default for LocationFormState {
    fn default() -> Self {
        Self::new(ResolvedLocation::empty())
    }
}

impl std::fmt::Debug for LocationFormState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationFormState")
            .field("value", &*self.inner.value.borrow())
            .finish_non_exhaustive()
    }
}
