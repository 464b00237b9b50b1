//! Lifecycle Manager
//!
//! Discovers lifecycle components and drives them through their phases.

use super::{LIFECYCLE, Lifecycle, LifecycleError, Phase, Result};
use crate::constants::BASE_NAMESPACE;
use crate::scan::{self, ComponentScanner};
use std::sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use strum_macros::Display;

/// Where a managed component is in its lifecycle.
///
/// ```text
/// Discovered -> PreLoaded -> Loaded -> Destroyed
///      \             \___________________^
///       \________________________________^
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ComponentState {
    Discovered,
    PreLoaded,
    Loaded,
    Destroyed,
}

impl Phase {
    fn accepts(self, state: ComponentState) -> bool {
        match self {
            Phase::PreLoad => state == ComponentState::Discovered,
            Phase::OnLoad => {
                matches!(state, ComponentState::Discovered | ComponentState::PreLoaded)
            }
            Phase::OnDestroy => state != ComponentState::Destroyed,
        }
    }

    fn target(self) -> ComponentState {
        match self {
            Phase::PreLoad => ComponentState::PreLoaded,
            Phase::OnLoad => ComponentState::Loaded,
            Phase::OnDestroy => ComponentState::Destroyed,
        }
    }

    fn invoke(self, component: &dyn Lifecycle) -> Result<()> {
        match self {
            Phase::PreLoad => component.pre_load(),
            Phase::OnLoad => component.on_load(),
            Phase::OnDestroy => component.on_destroy(),
        }
    }
}

struct ManagedComponent {
    name: String,
    component: Arc<dyn Lifecycle>,
    state: ComponentState,
}

/// Drives every registered lifecycle component through its phases
///
/// Components are kept in registration order and de-duplicated by instance
/// identity. Phases run in that order, but components must not rely on it.
///
/// # Example
///
/// ```rust,ignore
/// use bootkit::lifecycle::LifecycleManager;
///
/// let manager = LifecycleManager::global();
/// manager.add_component(Arc::new(MetricsFlusher::default()));
///
/// manager.pre_load()?;
/// // ... host starts ...
/// manager.on_load()?;
/// // ... application runs ...
/// manager.on_destroy()?;
/// ```
pub struct LifecycleManager {
    components: RwLock<Vec<ManagedComponent>>,
}

impl Default for LifecycleManager {
    fn default() -> Self {
        Self::new()
    }
}

impl LifecycleManager {
    /// Create an empty manager, without discovery
    pub fn new() -> Self {
        Self {
            components: RwLock::new(Vec::new()),
        }
    }

    /// Process-wide manager, populated once from every linked component
    pub fn global() -> Arc<LifecycleManager> {
        static INSTANCE: OnceLock<Arc<LifecycleManager>> = OnceLock::new();
        let manager = INSTANCE.get_or_init(|| {
            let manager = LifecycleManager::new();
            manager.discover(ComponentScanner::global(), BASE_NAMESPACE);
            Arc::new(manager)
        });
        Arc::clone(manager)
    }

    /// Register the concrete lifecycle components found under `namespace`.
    ///
    /// A component that cannot be instantiated is logged and skipped.
    /// Returns the number of components added.
    pub fn discover(&self, scanner: &ComponentScanner, namespace: &str) -> usize {
        let candidates = scan::filter(&scanner.scan(namespace), &LIFECYCLE);

        let mut added = 0;
        for handle in &candidates {
            match handle.instantiate_as::<dyn Lifecycle>(&LIFECYCLE) {
                Ok(component) => {
                    if self.add_named(handle.qualified_name(), component) {
                        added += 1;
                    }
                }
                Err(err) => {
                    tracing::warn!(
                        "Skipping lifecycle component {}: {}",
                        handle.qualified_name(),
                        err
                    );
                }
            }
        }

        tracing::info!(
            "Discovered {} lifecycle components under '{}' ({} candidates)",
            added,
            namespace,
            candidates.len()
        );
        added
    }

    /// Register a component manually, named after its type
    pub fn add_component<T>(&self, component: Arc<T>) -> bool
    where
        T: Lifecycle + 'static,
    {
        self.add_named(std::any::type_name::<T>(), component)
    }

    /// Register a component under an explicit name.
    ///
    /// Returns false when this exact instance is already registered.
    pub fn add_named(&self, name: impl Into<String>, component: Arc<dyn Lifecycle>) -> bool {
        let name = name.into();
        let mut components = self.write();

        if components
            .iter()
            .any(|managed| same_instance(&managed.component, &component))
        {
            tracing::debug!("Lifecycle component {} already registered", name);
            return false;
        }

        tracing::debug!("Registered lifecycle component {}", name);
        components.push(ManagedComponent {
            name,
            component,
            state: ComponentState::Discovered,
        });
        true
    }

    pub fn pre_load(&self) -> Result<()> {
        self.run_phase(Phase::PreLoad)
    }

    pub fn on_load(&self) -> Result<()> {
        self.run_phase(Phase::OnLoad)
    }

    pub fn on_destroy(&self) -> Result<()> {
        self.run_phase(Phase::OnDestroy)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Registered component names, in registration order
    pub fn names(&self) -> Vec<String> {
        self.read().iter().map(|managed| managed.name.clone()).collect()
    }

    pub fn states(&self) -> Vec<(String, ComponentState)> {
        self.read()
            .iter()
            .map(|managed| (managed.name.clone(), managed.state))
            .collect()
    }

    pub fn state_of(&self, name: &str) -> Option<ComponentState> {
        self.read()
            .iter()
            .find(|managed| managed.name == name)
            .map(|managed| managed.state)
    }

    /// Hooks run outside the lock, so a component may register others.
    /// The first failing hook stops the phase and is returned.
    fn run_phase(&self, phase: Phase) -> Result<()> {
        let snapshot: Vec<(String, Arc<dyn Lifecycle>, ComponentState)> = self
            .read()
            .iter()
            .map(|managed| {
                (
                    managed.name.clone(),
                    Arc::clone(&managed.component),
                    managed.state,
                )
            })
            .collect();

        tracing::info!("Running {} on {} components...", phase, snapshot.len());

        let mut invoked = 0;
        for (name, component, state) in snapshot {
            if !phase.accepts(state) {
                tracing::debug!("Skipping {} for {} in state {}", phase, name, state);
                continue;
            }

            tracing::debug!("{}: {}", phase, name);
            phase.invoke(component.as_ref()).map_err(|e| {
                tracing::error!("{} failed for {}: {}", phase, name, e);
                LifecycleError::hook_failed(&name, phase, e.to_string())
            })?;

            self.transition(&component, phase.target());
            invoked += 1;
        }

        tracing::info!("{} complete ({} components invoked)", phase, invoked);
        Ok(())
    }

    fn transition(&self, component: &Arc<dyn Lifecycle>, state: ComponentState) {
        if let Some(managed) = self
            .write()
            .iter_mut()
            .find(|managed| same_instance(&managed.component, component))
        {
            managed.state = state;
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<ManagedComponent>> {
        self.components.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<ManagedComponent>> {
        self.components.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn same_instance(a: &Arc<dyn Lifecycle>, b: &Arc<dyn Lifecycle>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
