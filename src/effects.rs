//! Effect registry and lifecycle management.
//!
//! An [`EffectManager`] owns every registered [`EffectModule`] and guarantees
//! that at most one of them is live at a time. A module is live between its
//! `init` and `dispose` calls and only a live module receives `update`.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::{
    state::{AppState, StateStore, Subscription},
    Error, Result,
};

/// Identifier of a visual effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectId(pub u32);

impl EffectId {
    /// Concentric rings, selected by an open palm
    pub const RINGS: Self = Self(1);
    /// Flower bloom, selected by a pinch
    pub const FLOWER: Self = Self(2);
    /// Particle trail, selected by pointing
    pub const TRAIL: Self = Self(3);
    /// Effect restored by a reset
    pub const DEFAULT: Self = Self::RINGS;

    /// Human-readable name
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self.0 {
            1 => "Rings",
            2 => "Flower",
            3 => "Trail",
            _ => "Custom",
        }
    }
}

impl std::fmt::Display for EffectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A pluggable visual effect.
///
/// `S` is the host's scene handle. Modules must not keep anything borrowed
/// from it past `dispose`.
pub trait EffectModule<S> {
    /// Attach to the scene
    fn init(&mut self, _scene: &S) {}

    /// Receive the state snapshot of the current cycle
    fn update(&mut self, _state: &AppState) {}

    /// Release everything attached in `init`
    fn dispose(&mut self, _scene: &S) {}

    /// Module name for logging
    fn name(&self) -> &str;
}

/// Dispatch rounds allowed for modules that change the effect from `update`
const MAX_CATCH_UP_ROUNDS: usize = 8;

struct Runtime<S> {
    registry: HashMap<EffectId, Box<dyn EffectModule<S>>>,
    scene: Option<S>,
    /// Last id switched to, registered or not
    selected: Option<EffectId>,
    /// Id of the live module
    active: Option<EffectId>,
    started: bool,
}

impl<S> Runtime<S> {
    fn switch_to(&mut self, id: Option<EffectId>) -> Result<()> {
        let Some(scene) = self.scene.as_ref() else {
            return Err(Error::NotInitialized);
        };

        if let Some(current) = self.active.take() {
            if let Some(module) = self.registry.get_mut(&current) {
                module.dispose(scene);
                debug!("Disposed effect {} ({})", current, module.name());
            }
        }

        self.selected = id;
        match id {
            Some(id) => match self.registry.get_mut(&id) {
                Some(module) => {
                    module.init(scene);
                    self.active = Some(id);
                    info!("Switched to effect {} ({})", id, module.name());
                }
                None => warn!("Effect {} is not registered, no effect is active", id),
            },
            None => info!("No effect selected"),
        }

        Ok(())
    }

    fn on_notify(&mut self, state: &AppState) {
        if self.scene.is_none() {
            return;
        }

        if state.active_effect != self.selected {
            // Cannot fail: the scene is present
            let _ = self.switch_to(state.active_effect);
        }

        if let Some(id) = self.active {
            if let Some(module) = self.registry.get_mut(&id) {
                module.update(state);
            }
        }
    }

    fn catch_up(&mut self, store: &StateStore) {
        for _ in 0..MAX_CATCH_UP_ROUNDS {
            if self.scene.is_none() || store.active_effect() == self.selected {
                return;
            }
            debug!("Effect selection changed during dispatch, switching again");
            self.on_notify(&store.get_state());
        }
        if store.active_effect() != self.selected {
            warn!(
                "Effect selection still changing after {} rounds, giving up until the next notification",
                MAX_CATCH_UP_ROUNDS
            );
        }
    }

    fn dispose_active(&mut self) {
        if let (Some(id), Some(scene)) = (self.active.take(), self.scene.as_ref()) {
            if let Some(module) = self.registry.get_mut(&id) {
                module.dispose(scene);
                debug!("Disposed effect {} ({})", id, module.name());
            }
        }
    }
}

/// Owns the effect registry and drives module lifecycles from the state store
pub struct EffectManager<S: 'static> {
    runtime: Rc<RefCell<Runtime<S>>>,
    subscription: Option<Subscription>,
}

impl<S: 'static> Default for EffectManager<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: 'static> EffectManager<S> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            runtime: Rc::new(RefCell::new(Runtime {
                registry: HashMap::new(),
                scene: None,
                selected: None,
                active: None,
                started: false,
            })),
            subscription: None,
        }
    }

    /// Add a module to the registry.
    ///
    /// # Errors
    ///
    /// Fails if `id` is taken or the manager has already been initialized.
    pub fn register<M>(&mut self, id: EffectId, module: M) -> Result<()>
    where
        M: EffectModule<S> + 'static,
    {
        self.register_boxed(id, Box::new(module))
    }

    /// Add an already boxed module to the registry
    ///
    /// # Errors
    ///
    /// Fails if `id` is taken or the manager has already been initialized.
    pub fn register_boxed(&mut self, id: EffectId, module: Box<dyn EffectModule<S>>) -> Result<()> {
        let mut runtime = self.runtime.borrow_mut();
        if runtime.started {
            return Err(Error::RegistryFrozen);
        }
        if runtime.registry.contains_key(&id) {
            return Err(Error::DuplicateEffect(id));
        }
        info!("Registered effect {} ({})", id, module.name());
        runtime.registry.insert(id, module);
        Ok(())
    }

    /// Take the scene handle and start following `store`.
    ///
    /// On every notification the manager switches modules if the selected
    /// effect changed, then forwards the snapshot to the live module. A
    /// selection made by a module from inside `update` is applied before the
    /// notification returns.
    ///
    /// # Errors
    ///
    /// Fails if called more than once.
    pub fn init(&mut self, scene: S, store: &StateStore) -> Result<()> {
        {
            let mut runtime = self.runtime.borrow_mut();
            if runtime.started {
                return Err(Error::AlreadyInitialized);
            }
            runtime.started = true;
            runtime.scene = Some(scene);
        }

        let runtime = Rc::clone(&self.runtime);
        let weak_store = store.downgrade();
        self.subscription = Some(store.subscribe(move |state| {
            let Ok(mut runtime) = runtime.try_borrow_mut() else {
                warn!("Effect manager notified re-entrantly, deferring to the outer dispatch");
                return;
            };
            runtime.on_notify(state);

            // A module may have changed the selection from inside `update`
            if let Some(store) = weak_store.upgrade() {
                runtime.catch_up(&store);
            }
        }));

        info!("Effect manager started with {} effects", self.runtime.borrow().registry.len());
        Ok(())
    }

    /// Dispose the live module, if any, then make `id` live.
    ///
    /// An unregistered id leaves no module live.
    ///
    /// # Errors
    ///
    /// Fails before `init`, after `shutdown`, or when called from inside a
    /// module callback.
    pub fn switch(&self, id: Option<EffectId>) -> Result<()> {
        let mut runtime = self
            .runtime
            .try_borrow_mut()
            .map_err(|_| Error::InvalidInput("Effect switch requested during dispatch".to_string()))?;
        runtime.switch_to(id)
    }

    /// Id of the live module
    #[must_use]
    pub fn active_effect(&self) -> Option<EffectId> {
        self.runtime.borrow().active
    }

    #[must_use]
    pub fn is_registered(&self, id: EffectId) -> bool {
        self.runtime.borrow().registry.contains_key(&id)
    }

    /// Registered ids in ascending order
    #[must_use]
    pub fn registered_ids(&self) -> Vec<EffectId> {
        let mut ids: Vec<EffectId> = self.runtime.borrow().registry.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Dispose the live module, stop following the store and hand the scene
    /// back. No module receives any call afterwards.
    pub fn shutdown(&mut self) -> Option<S> {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        let mut runtime = self.runtime.try_borrow_mut().ok()?;
        runtime.dispose_active();
        runtime.selected = None;
        let scene = runtime.scene.take();
        if scene.is_some() {
            info!("Effect manager shut down");
        }
        scene
    }
}

impl<S: 'static> Drop for EffectManager<S> {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}
