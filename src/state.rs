//! Single source of truth for the active effect and the latest hand frame.
//!
//! The store is single-threaded. Every mutation notifies all subscribers
//! synchronously, in subscription order, with a fresh [`AppState`] snapshot
//! before the mutating call returns. Listeners may call back into the store;
//! the state borrow is released before any listener runs.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use log::debug;

use crate::{effects::EffectId, landmarks::LandmarkFrame};

/// Snapshot of the application state
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    /// Effect that should be running, `None` for no effect
    pub active_effect: Option<EffectId>,
    /// Latest hand frame, `None` until a hand has been seen
    pub landmarks: Option<LandmarkFrame>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            active_effect: Some(EffectId::DEFAULT),
            landmarks: None,
        }
    }
}

type Callback = Rc<dyn Fn(&AppState)>;

struct Listener {
    id: u64,
    active: Rc<Cell<bool>>,
    callback: Callback,
}

struct StoreInner {
    state: RefCell<AppState>,
    listeners: RefCell<Vec<Listener>>,
    next_id: Cell<u64>,
}

impl StoreInner {
    fn remove(&self, id: u64) {
        self.listeners.borrow_mut().retain(|l| l.id != id);
    }
}

/// Shared handle to the application state.
///
/// Clones refer to the same store.
#[derive(Clone)]
pub struct StateStore {
    inner: Rc<StoreInner>,
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateStore")
            .field("state", &*self.inner.state.borrow())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl StateStore {
    /// Store with the default effect active and no landmarks
    #[must_use]
    pub fn new() -> Self {
        Self::with_state(AppState::default())
    }

    #[must_use]
    pub fn with_state(state: AppState) -> Self {
        Self {
            inner: Rc::new(StoreInner {
                state: RefCell::new(state),
                listeners: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
            }),
        }
    }

    /// Copy of the current state
    #[must_use]
    pub fn get_state(&self) -> AppState {
        self.inner.state.borrow().clone()
    }

    /// Currently selected effect
    #[must_use]
    pub fn active_effect(&self) -> Option<EffectId> {
        self.inner.state.borrow().active_effect
    }

    /// Select an effect; a no-op when it is already selected
    pub fn set_effect(&self, effect: Option<EffectId>) {
        {
            let mut state = self.inner.state.borrow_mut();
            if state.active_effect == effect {
                return;
            }
            state.active_effect = effect;
        }
        debug!("Active effect set to {:?}", effect);
        self.notify();
    }

    /// Replace the latest frame; always notifies
    pub fn set_landmarks(&self, frame: LandmarkFrame) {
        self.inner.state.borrow_mut().landmarks = Some(frame);
        self.notify();
    }

    /// Register a listener invoked on every mutation.
    ///
    /// The returned [`Subscription`] is the only way to remove it; dropping
    /// the handle leaves the listener registered.
    #[must_use = "dropping the subscription makes the listener impossible to remove"]
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&AppState) + 'static,
    {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        let active = Rc::new(Cell::new(true));

        self.inner.listeners.borrow_mut().push(Listener {
            id,
            active: Rc::clone(&active),
            callback: Rc::new(callback),
        });

        Subscription {
            id,
            active,
            store: Rc::downgrade(&self.inner),
        }
    }

    /// Handle that does not keep the store alive
    #[must_use]
    pub fn downgrade(&self) -> WeakStateStore {
        WeakStateStore {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Number of registered listeners
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    fn notify(&self) {
        // Listeners can subscribe or unsubscribe while we iterate
        let listeners: Vec<(Rc<Cell<bool>>, Callback)> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|l| (Rc::clone(&l.active), Rc::clone(&l.callback)))
            .collect();

        for (active, callback) in listeners {
            if !active.get() {
                continue;
            }
            let snapshot = self.get_state();
            callback(&snapshot);
        }
    }
}

/// Non-owning [`StateStore`] handle, for listeners that read back the store
#[derive(Clone)]
pub struct WeakStateStore {
    inner: Weak<StoreInner>,
}

impl WeakStateStore {
    #[must_use]
    pub fn upgrade(&self) -> Option<StateStore> {
        self.inner.upgrade().map(|inner| StateStore { inner })
    }
}

/// Handle returned by [`StateStore::subscribe`]
pub struct Subscription {
    id: u64,
    active: Rc<Cell<bool>>,
    store: Weak<StoreInner>,
}

impl Subscription {
    /// Remove the listener.
    ///
    /// Once this returns the listener is not invoked by any later
    /// notification, including the remainder of one currently in progress.
    pub fn unsubscribe(&self) {
        self.active.set(false);
        if let Some(store) = self.store.upgrade() {
            store.remove(self.id);
        }
    }

    /// Listener is still registered
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.get()
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.active.get())
            .finish()
    }
}
