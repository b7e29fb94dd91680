//! MongoDB-backed record store.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::Collection;
use tracing::debug;

use super::documents::{by_id, group_set, plugin_set, GroupDoc, PluginDoc};
use super::error::StoreResult;
use super::models::{Group, GroupPatch, NewGroup, NewPlugin, Plugin, PluginPatch};
use super::mongo::{Database, GROUPS, PLUGINS};
use super::store::RecordStore;

/// Record store over the `plugins` and `groups` collections.
#[derive(Clone)]
pub struct MongoStore {
    db: Database,
    plugins: Collection<PluginDoc>,
    groups: Collection<GroupDoc>,
}

impl MongoStore {
    pub fn new(db: &Database) -> Self {
        Self {
            db: db.clone(),
            plugins: db.collection(PLUGINS),
            groups: db.collection(GROUPS),
        }
    }
}

#[async_trait]
impl RecordStore for MongoStore {
    async fn get_all_plugins(&self) -> StoreResult<Vec<Plugin>> {
        let docs: Vec<PluginDoc> = self.plugins.find(doc! {}).await?.try_collect().await?;
        debug!("DB loaded {} plugins", docs.len());
        docs.into_iter().map(PluginDoc::into_model).collect()
    }

    async fn get_all_groups(&self) -> StoreResult<Vec<Group>> {
        let docs: Vec<GroupDoc> = self.groups.find(doc! {}).await?.try_collect().await?;
        debug!("DB loaded {} groups", docs.len());
        docs.into_iter().map(GroupDoc::into_model).collect()
    }

    async fn find_plugin_by_id(&self, id: i64) -> StoreResult<Option<Plugin>> {
        self.plugins
            .find_one(by_id(id))
            .await?
            .map(PluginDoc::into_model)
            .transpose()
    }

    async fn find_plugin_by_name(&self, name: &str) -> StoreResult<Option<Plugin>> {
        self.plugins
            .find_one(doc! { "name": name })
            .await?
            .map(PluginDoc::into_model)
            .transpose()
    }

    async fn find_group_by_id(&self, id: i64) -> StoreResult<Option<Group>> {
        self.groups
            .find_one(by_id(id))
            .await?
            .map(GroupDoc::into_model)
            .transpose()
    }

    async fn find_group_by_external_id(&self, external_id: i64) -> StoreResult<Option<Group>> {
        self.groups
            .find_one(doc! { "external_id": external_id })
            .await?
            .map(GroupDoc::into_model)
            .transpose()
    }

    async fn insert_plugin(&self, plugin: NewPlugin) -> StoreResult<Plugin> {
        let plugin = plugin.with_id(self.db.next_id(PLUGINS).await?);
        self.plugins.insert_one(PluginDoc::from(&plugin)).await?;
        debug!("Inserted plugin {} ({})", plugin.name, plugin.id);
        Ok(plugin)
    }

    async fn insert_group(&self, group: NewGroup) -> StoreResult<Group> {
        let group = group.with_id(self.db.next_id(GROUPS).await?);
        self.groups.insert_one(GroupDoc::from(&group)).await?;
        debug!("Inserted group {} ({})", group.external_id, group.id);
        Ok(group)
    }

    async fn update_plugin(&self, patch: &PluginPatch) -> StoreResult<bool> {
        if patch.is_empty() {
            return Ok(self.find_plugin_by_id(patch.id).await?.is_some());
        }
        let set = plugin_set(patch);

        let result = self
            .plugins
            .update_one(by_id(patch.id), doc! { "$set": set })
            .await?;
        debug!("Updated plugin {}: matched={}", patch.id, result.matched_count);
        Ok(result.matched_count > 0)
    }

    async fn update_group(&self, patch: &GroupPatch) -> StoreResult<bool> {
        if patch.is_empty() {
            return Ok(self.find_group_by_id(patch.id).await?.is_some());
        }
        let set = group_set(patch);

        let result = self
            .groups
            .update_one(by_id(patch.id), doc! { "$set": set })
            .await?;
        debug!("Updated group {}: matched={}", patch.id, result.matched_count);
        Ok(result.matched_count > 0)
    }

    async fn delete_group(&self, id: i64) -> StoreResult<u64> {
        let result = self.groups.delete_one(by_id(id)).await?;
        debug!("Deleted group {}: {}", id, result.deleted_count);
        Ok(result.deleted_count)
    }
}
