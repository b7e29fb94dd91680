//! Persisted document shapes.
//!
//! List-valued fields are stored as delimited strings; conversion to and
//! from the typed models happens here and nowhere else.

use mongodb::bson::{doc, Document};
use serde::{Deserialize, Serialize};

use super::error::{StoreError, StoreResult};
use super::models::{Group, GroupPatch, IdList, Plugin, PluginPatch};

fn default_true() -> bool {
    true
}

fn parse_list(field: &'static str, raw: Option<String>) -> StoreResult<IdList> {
    let raw = raw.unwrap_or_default();
    IdList::parse_delimited(&raw).map_err(|_| StoreError::MalformedList { field, value: raw })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginDoc {
    #[serde(rename = "_id")]
    pub id: i64,
    pub name: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub internal: bool,
    #[serde(default)]
    pub threshold: i64,
    #[serde(default)]
    pub white_list_users: Option<String>,
    #[serde(default)]
    pub black_list_users: Option<String>,
}

impl PluginDoc {
    pub fn into_model(self) -> StoreResult<Plugin> {
        Ok(Plugin {
            id: self.id,
            name: self.name,
            enabled: self.enabled,
            internal: self.internal,
            threshold: self.threshold,
            white_list_users: parse_list("white_list_users", self.white_list_users)?,
            black_list_users: parse_list("black_list_users", self.black_list_users)?,
        })
    }
}

impl From<&Plugin> for PluginDoc {
    fn from(plugin: &Plugin) -> Self {
        Self {
            id: plugin.id,
            name: plugin.name.clone(),
            enabled: plugin.enabled,
            internal: plugin.internal,
            threshold: plugin.threshold,
            white_list_users: Some(plugin.white_list_users.to_delimited()),
            black_list_users: Some(plugin.black_list_users.to_delimited()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupDoc {
    #[serde(rename = "_id")]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    pub external_id: i64,
    #[serde(default)]
    pub admins: Option<String>,
    #[serde(default)]
    pub expired_at: String,
    #[serde(default)]
    pub plugins: Option<String>,
}

impl GroupDoc {
    pub fn into_model(self) -> StoreResult<Group> {
        Ok(Group {
            id: self.id,
            name: self.name,
            external_id: self.external_id,
            admins: parse_list("admins", self.admins)?,
            expired_at: self.expired_at,
            plugins: parse_list("plugins", self.plugins)?,
        })
    }
}

impl From<&Group> for GroupDoc {
    fn from(group: &Group) -> Self {
        Self {
            id: group.id,
            name: group.name.clone(),
            external_id: group.external_id,
            admins: Some(group.admins.to_delimited()),
            expired_at: group.expired_at.clone(),
            plugins: Some(group.plugins.to_delimited()),
        }
    }
}

/// Build a `$set` document from the present fields of a plugin patch.
pub fn plugin_set(patch: &PluginPatch) -> Document {
    let mut set = Document::new();
    if let Some(enabled) = patch.enabled {
        set.insert("enabled", enabled);
    }
    if let Some(internal) = patch.internal {
        set.insert("internal", internal);
    }
    if let Some(threshold) = patch.threshold {
        set.insert("threshold", threshold);
    }
    if let Some(list) = &patch.white_list_users {
        set.insert("white_list_users", list.to_delimited());
    }
    if let Some(list) = &patch.black_list_users {
        set.insert("black_list_users", list.to_delimited());
    }
    set
}

/// Build a `$set` document from the present fields of a group patch.
pub fn group_set(patch: &GroupPatch) -> Document {
    let mut set = Document::new();
    if let Some(name) = &patch.name {
        set.insert("name", name.as_str());
    }
    if let Some(external_id) = patch.external_id {
        set.insert("external_id", external_id);
    }
    if let Some(admins) = &patch.admins {
        set.insert("admins", admins.to_delimited());
    }
    if let Some(expired_at) = &patch.expired_at {
        set.insert("expired_at", expired_at.as_str());
    }
    if let Some(plugins) = &patch.plugins {
        set.insert("plugins", plugins.to_delimited());
    }
    set
}

/// Filter matching a document by its numeric id.
pub fn by_id(id: i64) -> Document {
    doc! { "_id": id }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plugin_doc_absent_lists_are_empty() {
        let doc = PluginDoc {
            id: 1,
            name: "ping".into(),
            enabled: true,
            internal: false,
            threshold: 0,
            white_list_users: None,
            black_list_users: Some(String::new()),
        };

        let plugin = doc.into_model().unwrap();
        assert!(plugin.white_list_users.is_empty());
        assert!(plugin.black_list_users.is_empty());
    }

    #[test]
    fn test_group_doc_round_trip() {
        let group = Group {
            id: 4,
            name: "staff".into(),
            external_id: -1001234,
            admins: IdList::from(vec![10, 11]),
            expired_at: "2030-01-01 00:00:00".into(),
            plugins: IdList::from(vec![3, 1, 2]),
        };

        let doc = GroupDoc::from(&group);
        assert_eq!(doc.admins.as_deref(), Some("10,11"));
        assert_eq!(doc.plugins.as_deref(), Some("3,1,2"));
        assert_eq!(doc.into_model().unwrap(), group);
    }

    #[test]
    fn test_malformed_list_is_store_error() {
        let doc = GroupDoc {
            id: 1,
            name: String::new(),
            external_id: 1,
            admins: Some("1,x".into()),
            expired_at: String::new(),
            plugins: None,
        };

        match doc.into_model() {
            Err(StoreError::MalformedList { field, value }) => {
                assert_eq!(field, "admins");
                assert_eq!(value, "1,x");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_patch_set_only_present_fields() {
        let patch = GroupPatch {
            id: 1,
            admins: Some(IdList::from(vec![5])),
            ..Default::default()
        };

        let set = group_set(&patch);
        assert_eq!(set.len(), 1);
        assert_eq!(set.get_str("admins").unwrap(), "5");
    }
}
