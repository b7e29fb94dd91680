//! Plugin model.

use serde::{Deserialize, Serialize};

use super::IdList;

/// A capability that can be granted to groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Plugin {
    pub id: i64,

    /// Globally unique plugin name
    pub name: String,

    pub enabled: bool,

    /// Internal plugins are granted to every group
    pub internal: bool,

    /// Reserved
    #[serde(default)]
    pub threshold: i64,

    /// Users who get this plugin even if their group does not
    #[serde(default)]
    pub white_list_users: IdList,

    /// Users who never get this plugin
    #[serde(default)]
    pub black_list_users: IdList,
}

impl Plugin {
    pub fn is_whitelisted(&self, user_id: i64) -> bool {
        self.white_list_users.contains(user_id)
    }

    pub fn is_blacklisted(&self, user_id: i64) -> bool {
        self.black_list_users.contains(user_id)
    }
}

/// A plugin row that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewPlugin {
    pub name: String,
    pub enabled: bool,
    pub internal: bool,
    pub threshold: i64,
    pub white_list_users: IdList,
    pub black_list_users: IdList,
}

impl NewPlugin {
    /// Default row created on first registration: enabled, no overrides.
    pub fn registered(name: impl Into<String>, internal: bool) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            internal,
            threshold: 0,
            white_list_users: IdList::new(),
            black_list_users: IdList::new(),
        }
    }

    pub fn with_id(self, id: i64) -> Plugin {
        Plugin {
            id,
            name: self.name,
            enabled: self.enabled,
            internal: self.internal,
            threshold: self.threshold,
            white_list_users: self.white_list_users,
            black_list_users: self.black_list_users,
        }
    }
}

/// Partial plugin update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginPatch {
    pub id: i64,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub internal: Option<bool>,
    #[serde(default)]
    pub threshold: Option<i64>,
    #[serde(default)]
    pub white_list_users: Option<IdList>,
    #[serde(default)]
    pub black_list_users: Option<IdList>,
}

impl PluginPatch {
    pub fn is_empty(&self) -> bool {
        self.enabled.is_none()
            && self.internal.is_none()
            && self.threshold.is_none()
            && self.white_list_users.is_none()
            && self.black_list_users.is_none()
    }

    /// Apply the present fields to `plugin`.
    #[cfg(test)]
    pub fn apply_to(&self, plugin: &mut Plugin) {
        if let Some(enabled) = self.enabled {
            plugin.enabled = enabled;
        }
        if let Some(internal) = self.internal {
            plugin.internal = internal;
        }
        if let Some(threshold) = self.threshold {
            plugin.threshold = threshold;
        }
        if let Some(list) = &self.white_list_users {
            plugin.white_list_users = list.clone();
        }
        if let Some(list) = &self.black_list_users {
            plugin.black_list_users = list.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_from_json_accepts_strings() {
        let patch: PluginPatch =
            serde_json::from_str(r#"{"id": 3, "whiteListUsers": "42,43", "enabled": false}"#)
                .unwrap();

        assert_eq!(patch.id, 3);
        assert_eq!(patch.enabled, Some(false));
        assert_eq!(patch.white_list_users, Some(IdList::from(vec![42, 43])));
        assert!(patch.black_list_users.is_none());
    }

    #[test]
    fn test_patch_with_only_id_is_empty() {
        let patch: PluginPatch = serde_json::from_str(r#"{"id": 3}"#).unwrap();
        assert!(patch.is_empty());

        let patch = PluginPatch {
            id: 3,
            threshold: Some(0),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_patch_apply_only_present_fields() {
        let mut plugin = NewPlugin::registered("ping", false).with_id(1);
        let patch = PluginPatch {
            id: 1,
            black_list_users: Some(IdList::from(vec![9])),
            ..Default::default()
        };

        patch.apply_to(&mut plugin);

        assert!(plugin.enabled);
        assert!(plugin.is_blacklisted(9));
        assert!(!plugin.is_whitelisted(9));
    }
}
