//! Per-instance change notification
//!
//! Every observable value owns its own [`ChangeEmitter`]. Two ways to consume
//! changes are offered:
//! - Registered listeners, invoked synchronously in subscription order with
//!   a reference to the value that changed
//! - A dirty flag, raised on every emission and cleared by whoever polls it
//!   during their own update pass (the scene graph does this)
//!
//! There is no queue, no replay for late subscribers and no sharing between
//! instances: cloning an emitter yields an empty one.

use std::fmt;

/// Receives change notifications from an observable value
pub trait ChangeListener<T: ?Sized> {
    /// Called after `source` has been mutated
    fn on_change(&mut self, source: &T);
}

impl<T: ?Sized, F: FnMut(&T)> ChangeListener<T> for F {
    fn on_change(&mut self, source: &T) {
        self(source);
    }
}

/// Handle returned by [`ChangeEmitter::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Listener list plus dirty flag owned by a single value
pub struct ChangeEmitter<T: ?Sized> {
    listeners: Vec<(ListenerId, Box<dyn ChangeListener<T>>)>,
    next_id: u64,
    dirty: bool,
}

impl<T: ?Sized> ChangeEmitter<T> {
    /// Create an emitter with no listeners and a clear dirty flag
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
            dirty: false,
        }
    }

    /// Register a listener for every future emission
    pub fn subscribe(&mut self, listener: impl ChangeListener<T> + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if the id was not registered here.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Whether a change was emitted since the flag was last taken
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Read and clear the dirty flag
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    /// Raise the dirty flag and hand the listeners out for dispatch
    fn begin_emit(&mut self) -> Vec<(ListenerId, Box<dyn ChangeListener<T>>)> {
        self.dirty = true;
        std::mem::take(&mut self.listeners)
    }

    /// Put dispatched listeners back ahead of anything registered meanwhile
    fn end_emit(&mut self, mut listeners: Vec<(ListenerId, Box<dyn ChangeListener<T>>)>) {
        listeners.append(&mut self.listeners);
        self.listeners = listeners;
    }
}

impl<T: ?Sized> Default for ChangeEmitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloning never carries listeners over; the copy starts clean.
impl<T: ?Sized> Clone for ChangeEmitter<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for ChangeEmitter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeEmitter")
            .field("listeners", &self.listeners.len())
            .field("dirty", &self.dirty)
            .finish()
    }
}

/// A value that owns a [`ChangeEmitter`] addressed to itself
pub trait Observable: Sized {
    /// The emitter owned by this value
    fn change_emitter(&mut self) -> &mut ChangeEmitter<Self>;

    /// Subscribe to changes of this value
    fn on_change(&mut self, listener: impl ChangeListener<Self> + 'static) -> ListenerId {
        self.change_emitter().subscribe(listener)
    }

    /// Synchronously notify every listener, in subscription order, and
    /// raise the dirty flag
    fn emit_change(&mut self) {
        let mut listeners = self.change_emitter().begin_emit();
        for (_, listener) in &mut listeners {
            listener.on_change(self);
        }
        self.change_emitter().end_emit(listeners);
    }
}
