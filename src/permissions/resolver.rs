//! Per-request plugin access resolution.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::cache::ConfigCache;
use crate::database::StoreResult;

/// Resolves group validity, admin status and available plugins.
#[derive(Clone)]
pub struct PermissionResolver {
    cache: ConfigCache,
}

impl PermissionResolver {
    pub fn new(cache: ConfigCache) -> Self {
        Self { cache }
    }

    /// Check if a user is listed as admin of a group.
    ///
    /// Unknown groups have no admins.
    pub async fn is_group_admin(&self, group_id: i64, user_id: i64) -> StoreResult<bool> {
        Ok(self
            .cache
            .group(group_id)
            .await?
            .is_some_and(|g| g.is_admin(user_id)))
    }

    /// Check if a group exists and has not expired.
    pub async fn is_group_valid(&self, group_id: i64) -> StoreResult<bool> {
        self.is_group_valid_at(group_id, Utc::now()).await
    }

    pub async fn is_group_valid_at(&self, group_id: i64, now: DateTime<Utc>) -> StoreResult<bool> {
        Ok(self
            .cache
            .group(group_id)
            .await?
            .is_some_and(|g| g.is_valid_at(now)))
    }

    /// Names of the plugins available to `user_id` in a group.
    ///
    /// Starts from the group's grants, then applies each catalog plugin's
    /// whitelist (add) and blacklist (remove) for the user. Blacklist is
    /// applied after whitelist, so it wins when a user is on both. Grants
    /// for plugins missing from the catalog (disabled or not registered)
    /// are dropped.
    pub async fn get_available_plugins(
        &self,
        group_id: i64,
        user_id: Option<i64>,
    ) -> StoreResult<Vec<String>> {
        let Some(group) = self.cache.group(group_id).await? else {
            debug!("No group {}, no plugins available", group_id);
            return Ok(Vec::new());
        };

        let mut granted: HashSet<i64> = group.plugins.iter().collect();
        let catalog = self.cache.plugin_catalog().await?;

        if let Some(user_id) = user_id {
            for plugin in catalog.iter() {
                if plugin.is_whitelisted(user_id) {
                    granted.insert(plugin.id);
                }
                if plugin.is_blacklisted(user_id) {
                    granted.remove(&plugin.id);
                }
            }
        }

        let available: Vec<String> = catalog
            .iter()
            .filter(|p| granted.contains(&p.id))
            .map(|p| p.name.clone())
            .collect();

        debug!(
            "Group {} user {:?}: {} plugins available",
            group_id,
            user_id,
            available.len()
        );
        Ok(available)
    }

    /// Check a single plugin for a user in a group.
    pub async fn is_plugin_available(
        &self,
        group_id: i64,
        user_id: Option<i64>,
        plugin: &str,
    ) -> StoreResult<bool> {
        Ok(self
            .get_available_plugins(group_id, user_id)
            .await?
            .iter()
            .any(|name| name == plugin))
    }
}
