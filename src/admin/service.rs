//! Administrative operations on plugins and groups.
//!
//! Writes go straight to the store and never touch the cached views;
//! they become visible to permission checks within one TTL.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::database::{
    Group, GroupPatch, NewGroup, Plugin, PluginPatch, RecordStore, StoreResult,
};
use crate::registry::RegistrationTracker;

/// Result of an update addressed by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateOutcome {
    Updated,
    NotFound,
}

impl From<bool> for UpdateOutcome {
    fn from(matched: bool) -> Self {
        if matched { Self::Updated } else { Self::NotFound }
    }
}

pub struct AdminService {
    store: Arc<dyn RecordStore>,
    tracker: Arc<RegistrationTracker>,
}

impl AdminService {
    pub fn new(store: Arc<dyn RecordStore>, tracker: Arc<RegistrationTracker>) -> Self {
        Self { store, tracker }
    }

    /// All persisted plugins, bypassing the cache.
    pub async fn list_plugins(&self) -> StoreResult<Vec<Plugin>> {
        self.store.get_all_plugins().await
    }

    /// All persisted groups, bypassing the cache.
    pub async fn list_groups(&self) -> StoreResult<Vec<Group>> {
        self.store.get_all_groups().await
    }

    /// Ids of every persisted internal plugin.
    pub async fn internal_plugin_ids(&self) -> StoreResult<Vec<i64>> {
        Ok(self
            .store
            .get_all_plugins()
            .await?
            .into_iter()
            .filter(|p| p.internal)
            .map(|p| p.id)
            .collect())
    }

    pub async fn update_plugin(&self, patch: &PluginPatch) -> StoreResult<UpdateOutcome> {
        if self.store.find_plugin_by_id(patch.id).await?.is_none() {
            return Ok(UpdateOutcome::NotFound);
        }

        let outcome = UpdateOutcome::from(self.store.update_plugin(patch).await?);
        info!("Update plugin {}: {:?}", patch.id, outcome);
        Ok(outcome)
    }

    /// Create a group. Every internal plugin is granted regardless of the
    /// requested plugin list.
    pub async fn add_group(&self, mut group: NewGroup) -> StoreResult<Group> {
        let forced = group.plugins.merge(self.internal_plugin_ids().await?);
        let group = self.store.insert_group(group).await?;
        info!(
            "Added group {} ({}), {} internal plugins forced",
            group.external_id, group.id, forced
        );
        Ok(group)
    }

    /// Update a group. A new plugin list is re-merged with the internal
    /// plugins; admins are stored as given.
    pub async fn update_group(&self, patch: GroupPatch) -> StoreResult<UpdateOutcome> {
        if self.store.find_group_by_id(patch.id).await?.is_none() {
            return Ok(UpdateOutcome::NotFound);
        }

        let mut patch = patch;
        if let Some(plugins) = patch.plugins.as_mut() {
            plugins.merge(self.internal_plugin_ids().await?);
        }

        let outcome = UpdateOutcome::from(self.store.update_group(&patch).await?);
        info!("Update group {}: {:?}", patch.id, outcome);
        Ok(outcome)
    }

    /// Delete a group by id. Returns the number of deleted rows.
    pub async fn delete_group(&self, id: i64) -> StoreResult<u64> {
        let deleted = self.store.delete_group(id).await?;
        info!("Delete group {}: {} removed", id, deleted);
        Ok(deleted)
    }

    /// Register a plugin announced by an out-of-process provider.
    pub async fn register_external_plugin(&self, name: &str, internal: bool) -> StoreResult<()> {
        self.tracker.register_plugin(name, internal, true).await?;
        info!("External plugin registered: {}", name);
        Ok(())
    }

    /// Deactivate all externally registered plugins.
    pub fn clear_external_plugins(&self) -> Vec<String> {
        self.tracker.clear_external_plugins()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;
    use crate::database::IdList;

    pub(crate) async fn setup() -> (Arc<MemoryStore>, Arc<RegistrationTracker>, AdminService) {
        let store = Arc::new(MemoryStore::new());
        let tracker = Arc::new(RegistrationTracker::new(store.clone()));
        // ids: help=1 (internal), ping=2, start=3 (internal)
        tracker.register_plugin("help", true, false).await.unwrap();
        tracker.register_plugin("ping", false, false).await.unwrap();
        tracker.register_plugin("start", true, false).await.unwrap();
        let admin = AdminService::new(store.clone(), tracker.clone());
        (store, tracker, admin)
    }

    pub(crate) fn new_group(plugins: Vec<i64>) -> NewGroup {
        NewGroup {
            name: "staff".into(),
            external_id: -100,
            admins: IdList::from(vec![7]),
            expired_at: "2099-01-01".into(),
            plugins: IdList::from(plugins),
        }
    }

    #[tokio::test]
    async fn test_add_group_forces_internal_plugins() {
        let (store, _tracker, admin) = setup().await;

        let group = admin.add_group(new_group(vec![2, 1])).await.unwrap();

        assert_eq!(group.plugins.as_slice(), &[2, 1, 3]);
        let stored = store.find_group_by_id(group.id).await.unwrap().unwrap();
        assert_eq!(stored.plugins, group.plugins);
    }

    #[tokio::test]
    async fn test_update_group_plugins_reforces_internal() {
        let (store, _tracker, admin) = setup().await;
        let group = admin.add_group(new_group(vec![])).await.unwrap();

        let outcome = admin
            .update_group(GroupPatch {
                id: group.id,
                plugins: Some(IdList::from(vec![2])),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(outcome, UpdateOutcome::Updated);
        let stored = store.find_group_by_id(group.id).await.unwrap().unwrap();
        assert_eq!(stored.plugins.as_slice(), &[2, 1, 3]);
    }

    #[tokio::test]
    async fn test_update_group_admins_not_forced() {
        let (store, _tracker, admin) = setup().await;
        let group = admin.add_group(new_group(vec![])).await.unwrap();

        admin
            .update_group(GroupPatch {
                id: group.id,
                admins: Some(IdList::from(vec![8, 9])),
                ..Default::default()
            })
            .await
            .unwrap();

        let stored = store.find_group_by_id(group.id).await.unwrap().unwrap();
        assert_eq!(stored.admins.as_slice(), &[8, 9]);
        assert_eq!(stored.plugins.as_slice(), &[1, 3]);
    }

    #[tokio::test]
    async fn test_updates_on_missing_ids_are_not_found() {
        let (store, _tracker, admin) = setup().await;

        let group = admin
            .update_group(GroupPatch {
                id: 404,
                plugins: Some(IdList::new()),
                ..Default::default()
            })
            .await
            .unwrap();
        let plugin = admin
            .update_plugin(&PluginPatch {
                id: 404,
                enabled: Some(false),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(group, UpdateOutcome::NotFound);
        assert_eq!(plugin, UpdateOutcome::NotFound);
        assert!(store.get_all_groups().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_plugin_lists() {
        let (store, _tracker, admin) = setup().await;

        let outcome = admin
            .update_plugin(&PluginPatch {
                id: 2,
                white_list_users: Some(IdList::from(vec![1, 2])),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(outcome, UpdateOutcome::Updated);
        let plugin = store.find_plugin_by_id(2).await.unwrap().unwrap();
        assert_eq!(plugin.white_list_users.as_slice(), &[1, 2]);
        assert!(plugin.enabled);
    }

    #[tokio::test]
    async fn test_delete_group_counts() {
        let (_store, _tracker, admin) = setup().await;
        let group = admin.add_group(new_group(vec![])).await.unwrap();

        assert_eq!(admin.delete_group(group.id).await.unwrap(), 1);
        assert_eq!(admin.delete_group(group.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_external_registration_and_clear() {
        let (store, tracker, admin) = setup().await;

        admin.register_external_plugin("weather", false).await.unwrap();
        assert!(tracker.is_active("weather"));
        assert!(store.find_plugin_by_name("weather").await.unwrap().is_some());

        assert_eq!(admin.clear_external_plugins(), vec!["weather".to_string()]);
        assert!(!tracker.is_active("weather"));
        assert!(tracker.is_active("help"));
    }
}
