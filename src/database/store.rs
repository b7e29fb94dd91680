//! Record store interface over persisted plugins and groups.
//!
//! Implementations do no caching and no validation beyond what the
//! backing storage enforces.

use async_trait::async_trait;

use super::error::StoreResult;
use super::models::{Group, GroupPatch, NewGroup, NewPlugin, Plugin, PluginPatch};

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get_all_plugins(&self) -> StoreResult<Vec<Plugin>>;

    async fn get_all_groups(&self) -> StoreResult<Vec<Group>>;

    async fn find_plugin_by_id(&self, id: i64) -> StoreResult<Option<Plugin>>;

    async fn find_plugin_by_name(&self, name: &str) -> StoreResult<Option<Plugin>>;

    async fn find_group_by_id(&self, id: i64) -> StoreResult<Option<Group>>;

    async fn find_group_by_external_id(&self, external_id: i64) -> StoreResult<Option<Group>>;

    async fn insert_plugin(&self, plugin: NewPlugin) -> StoreResult<Plugin>;

    async fn insert_group(&self, group: NewGroup) -> StoreResult<Group>;

    /// Returns `false` if no plugin has this id.
    async fn update_plugin(&self, patch: &PluginPatch) -> StoreResult<bool>;

    /// Returns `false` if no group has this id.
    async fn update_group(&self, patch: &GroupPatch) -> StoreResult<bool>;

    /// Returns the number of deleted rows.
    async fn delete_group(&self, id: i64) -> StoreResult<u64>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::test_support::new_group;
    use crate::database::memory::MemoryStore;

    #[tokio::test]
    async fn test_find_group_by_external_id() {
        let store = MemoryStore::new();
        let inserted = store.insert_group(new_group(-100, vec![1, 2])).await.unwrap();
        store.insert_group(new_group(-200, vec![])).await.unwrap();

        let found = store.find_group_by_external_id(-100).await.unwrap().unwrap();

        assert_eq!(found, inserted);
        assert_eq!(found.plugins.as_slice(), &[1, 2]);
        assert!(store.find_group_by_external_id(-300).await.unwrap().is_none());
    }
}
