//! Read-through views over the plugin catalog and the group table.
//!
//! Each view is one snapshot under a fixed cache key with its own refresh
//! timer. A snapshot is only replaced by a successful refresh: if the
//! store fails, the error goes to the caller and the previous snapshot
//! stays in place. Concurrent refreshes of the same view are allowed and
//! the last one to finish wins.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};

use super::typed::Stamped;
use super::{CacheConfig, CacheRegistry, TypedCache};
use crate::database::{Group, Plugin, RecordStore, StoreResult};
use crate::registry::RegistrationTracker;

pub const PLUGIN_CATALOG_KEY: &str = "plugin_catalog";
pub const GROUPS_KEY: &str = "groups";

/// Enabled plugins whose names are active in this runtime.
pub type PluginCatalog = Arc<Vec<Plugin>>;

/// Groups keyed by external (chat) id.
pub type GroupMap = Arc<HashMap<i64, Group>>;

/// Cached configuration views.
#[derive(Clone)]
pub struct ConfigCache {
    store: Arc<dyn RecordStore>,
    tracker: Arc<RegistrationTracker>,
    catalog: TypedCache<&'static str, Stamped<PluginCatalog>>,
    groups: TypedCache<&'static str, Stamped<GroupMap>>,
    plugin_ttl: Duration,
    group_ttl: Duration,
}

impl ConfigCache {
    pub fn new(
        store: Arc<dyn RecordStore>,
        tracker: Arc<RegistrationTracker>,
        registry: &CacheRegistry,
        plugin_config: CacheConfig,
        group_config: CacheConfig,
    ) -> Self {
        Self {
            store,
            tracker,
            catalog: registry.get_or_create(PLUGIN_CATALOG_KEY, &plugin_config),
            groups: registry.get_or_create(GROUPS_KEY, &group_config),
            plugin_ttl: plugin_config.ttl,
            group_ttl: group_config.ttl,
        }
    }

    /// Current plugin catalog, refreshed from the store once the TTL has elapsed.
    pub async fn plugin_catalog(&self) -> StoreResult<PluginCatalog> {
        if let Some(entry) = self.catalog.get(&PLUGIN_CATALOG_KEY)
            && !entry.is_expired(Instant::now(), self.plugin_ttl)
        {
            debug!("Plugin catalog cache hit");
            return Ok(entry.value);
        }

        debug!("Plugin catalog cache miss, refreshing");
        self.refresh_plugin_catalog().await
    }

    async fn refresh_plugin_catalog(&self) -> StoreResult<PluginCatalog> {
        let plugins = self.store.get_all_plugins().await.inspect_err(|e| {
            warn!("Plugin catalog refresh failed: {}", e);
        })?;

        let active = self.tracker.active_names();
        let catalog: PluginCatalog = Arc::new(
            plugins
                .into_iter()
                .filter(|p| active.contains(&p.name))
                .filter(|p| p.enabled)
                .collect(),
        );

        self.catalog.insert(
            PLUGIN_CATALOG_KEY,
            Stamped::new(catalog.clone(), Instant::now()),
        );
        debug!("Plugin catalog refreshed: {} active", catalog.len());

        Ok(catalog)
    }

    /// Look up a group by its external id.
    ///
    /// An expired view is refreshed as a whole before the lookup. Unknown
    /// ids are `None`.
    pub async fn group(&self, external_id: i64) -> StoreResult<Option<Group>> {
        let groups = match self.groups.get(&GROUPS_KEY) {
            Some(entry) if !entry.is_expired(Instant::now(), self.group_ttl) => {
                debug!("Group cache hit for {}", external_id);
                entry.value
            }
            _ => {
                debug!("Group cache miss for {}, refreshing", external_id);
                self.refresh_groups().await?
            }
        };

        Ok(groups.get(&external_id).cloned())
    }

    async fn refresh_groups(&self) -> StoreResult<GroupMap> {
        let groups = self.store.get_all_groups().await.inspect_err(|e| {
            warn!("Group cache refresh failed: {}", e);
        })?;

        let map: GroupMap = Arc::new(groups.into_iter().map(|g| (g.external_id, g)).collect());

        self.groups
            .insert(GROUPS_KEY, Stamped::new(map.clone(), Instant::now()));
        debug!("Group cache refreshed: {} groups", map.len());

        Ok(map)
    }

    /// Last plugin catalog snapshot, regardless of age. Never touches the store.
    #[allow(dead_code)]
    pub fn cached_plugin_catalog(&self) -> Option<PluginCatalog> {
        self.catalog.get(&PLUGIN_CATALOG_KEY).map(|entry| entry.value)
    }

    /// Last group snapshot, regardless of age. Never touches the store.
    #[allow(dead_code)]
    pub fn cached_groups(&self) -> Option<GroupMap> {
        self.groups.get(&GROUPS_KEY).map(|entry| entry.value)
    }
}
