//! Process-lifetime registry of active plugin names.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::database::{NewPlugin, RecordStore, StoreError, StoreResult};

#[derive(Debug, Default)]
struct ActiveNames {
    active: HashSet<String>,
    /// Names registered by this process. These survive an external reset.
    internal: HashSet<String>,
    /// Subset of `active` announced by out-of-process providers.
    external: HashSet<String>,
}

/// Tracks which plugins are registered in this runtime.
///
/// A plugin only reaches the catalog if its name is active here, no matter
/// what the store says.
pub struct RegistrationTracker {
    store: Arc<dyn RecordStore>,
    names: Mutex<ActiveNames>,
}

impl RegistrationTracker {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            names: Mutex::new(ActiveNames::default()),
        }
    }

    /// Register a plugin by name.
    ///
    /// Creates the persisted row on first sight (enabled, no overrides);
    /// an existing row is left as the admins configured it.
    pub async fn register_plugin(
        &self,
        name: &str,
        internal: bool,
        is_external: bool,
    ) -> StoreResult<()> {
        if self.store.find_plugin_by_name(name).await?.is_none() {
            match self
                .store
                .insert_plugin(NewPlugin::registered(name, internal))
                .await
            {
                Ok(plugin) => info!("Created plugin {} ({})", plugin.name, plugin.id),
                // Lost a race with a concurrent registration
                Err(StoreError::DuplicateKey(_)) => debug!("Plugin {} already exists", name),
                Err(e) => return Err(e),
            }
        }

        let mut names = self.names.lock();
        names.active.insert(name.to_string());
        if is_external {
            names.external.insert(name.to_string());
        } else {
            names.internal.insert(name.to_string());
        }
        debug!("Registered plugin {} (external: {})", name, is_external);

        Ok(())
    }

    /// Deactivate every externally registered plugin.
    ///
    /// A name this process registered itself stays active even if an
    /// external provider announced it too. Returns the names that were
    /// deactivated.
    pub fn clear_external_plugins(&self) -> Vec<String> {
        let mut names = self.names.lock();
        let ActiveNames {
            active,
            internal,
            external,
        } = &mut *names;

        let cleared: Vec<String> = external
            .drain()
            .filter(|name| !internal.contains(name))
            .collect();
        for name in &cleared {
            active.remove(name);
        }

        info!("Cleared {} external plugins", cleared.len());
        cleared
    }

    #[cfg(test)]
    pub fn is_active(&self, name: &str) -> bool {
        self.names.lock().active.contains(name)
    }

    #[cfg(test)]
    pub fn is_external(&self, name: &str) -> bool {
        self.names.lock().external.contains(name)
    }

    /// Snapshot of the active names.
    pub fn active_names(&self) -> HashSet<String> {
        self.names.lock().active.clone()
    }
}

impl std::fmt::Debug for RegistrationTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = self.names.lock();
        f.debug_struct("RegistrationTracker")
            .field("active", &names.active.len())
            .field("external", &names.external.len())
            .finish()
    }
}
