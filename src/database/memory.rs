//! In-memory record store for tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::error::{StoreError, StoreResult};
use super::models::{Group, GroupPatch, NewGroup, NewPlugin, Plugin, PluginPatch};
use super::store::RecordStore;

#[derive(Default)]
struct Tables {
    plugins: Vec<Plugin>,
    groups: Vec<Group>,
    next_plugin_id: i64,
    next_group_id: i64,
}

/// Record store kept in memory, with read counters and failure injection.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    plugin_reads: AtomicUsize,
    group_reads: AtomicUsize,
    failing: AtomicBool,
    hide_plugin_lookups: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail until reset.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Make `find_plugin_by_name` miss, as if another writer inserted the
    /// row between the lookup and the insert.
    pub fn set_hide_plugin_lookups(&self, hide: bool) {
        self.hide_plugin_lookups.store(hide, Ordering::SeqCst);
    }

    /// Number of `get_all_plugins` calls so far.
    pub fn plugin_reads(&self) -> usize {
        self.plugin_reads.load(Ordering::SeqCst)
    }

    /// Number of `get_all_groups` calls so far.
    pub fn group_reads(&self) -> usize {
        self.group_reads.load(Ordering::SeqCst)
    }

    fn check(&self) -> StoreResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected failure".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn get_all_plugins(&self) -> StoreResult<Vec<Plugin>> {
        self.plugin_reads.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.tables.lock().plugins.clone())
    }

    async fn get_all_groups(&self) -> StoreResult<Vec<Group>> {
        self.group_reads.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.tables.lock().groups.clone())
    }

    async fn find_plugin_by_id(&self, id: i64) -> StoreResult<Option<Plugin>> {
        self.check()?;
        Ok(self.tables.lock().plugins.iter().find(|p| p.id == id).cloned())
    }

    async fn find_plugin_by_name(&self, name: &str) -> StoreResult<Option<Plugin>> {
        self.check()?;
        if self.hide_plugin_lookups.load(Ordering::SeqCst) {
            return Ok(None);
        }
        Ok(self
            .tables
            .lock()
            .plugins
            .iter()
            .find(|p| p.name == name)
            .cloned())
    }

    async fn find_group_by_id(&self, id: i64) -> StoreResult<Option<Group>> {
        self.check()?;
        Ok(self.tables.lock().groups.iter().find(|g| g.id == id).cloned())
    }

    async fn find_group_by_external_id(&self, external_id: i64) -> StoreResult<Option<Group>> {
        self.check()?;
        Ok(self
            .tables
            .lock()
            .groups
            .iter()
            .find(|g| g.external_id == external_id)
            .cloned())
    }

    async fn insert_plugin(&self, plugin: NewPlugin) -> StoreResult<Plugin> {
        self.check()?;
        let mut tables = self.tables.lock();
        if tables.plugins.iter().any(|p| p.name == plugin.name) {
            return Err(StoreError::DuplicateKey(format!("plugin name {}", plugin.name)));
        }
        tables.next_plugin_id += 1;
        let plugin = plugin.with_id(tables.next_plugin_id);
        tables.plugins.push(plugin.clone());
        Ok(plugin)
    }

    async fn insert_group(&self, group: NewGroup) -> StoreResult<Group> {
        self.check()?;
        let mut tables = self.tables.lock();
        if tables.groups.iter().any(|g| g.external_id == group.external_id) {
            return Err(StoreError::DuplicateKey(format!(
                "group external id {}",
                group.external_id
            )));
        }
        tables.next_group_id += 1;
        let group = group.with_id(tables.next_group_id);
        tables.groups.push(group.clone());
        Ok(group)
    }

    async fn update_plugin(&self, patch: &PluginPatch) -> StoreResult<bool> {
        self.check()?;
        let mut tables = self.tables.lock();
        match tables.plugins.iter_mut().find(|p| p.id == patch.id) {
            Some(plugin) => {
                patch.apply_to(plugin);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_group(&self, patch: &GroupPatch) -> StoreResult<bool> {
        self.check()?;
        let mut tables = self.tables.lock();
        match tables.groups.iter_mut().find(|g| g.id == patch.id) {
            Some(group) => {
                patch.apply_to(group);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_group(&self, id: i64) -> StoreResult<u64> {
        self.check()?;
        let mut tables = self.tables.lock();
        let before = tables.groups.len();
        tables.groups.retain(|g| g.id != id);
        Ok((before - tables.groups.len()) as u64)
    }
}
