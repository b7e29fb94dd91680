//! Group model.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::IdList;

/// A tenant (chat) with its admins, expiry and granted plugins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: i64,

    pub name: String,

    /// Telegram chat ID
    pub external_id: i64,

    #[serde(default)]
    pub admins: IdList,

    /// Calendar timestamp after which the group is no longer served
    pub expired_at: String,

    /// Granted plugin ids
    #[serde(default)]
    pub plugins: IdList,
}

impl Group {
    pub fn is_admin(&self, user_id: i64) -> bool {
        self.admins.contains(user_id)
    }

    /// Parsed expiry instant, if `expired_at` is a recognizable timestamp.
    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.expired_at)
    }

    /// Whether the group is still valid at `now`.
    ///
    /// An unparseable expiry counts as expired.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry().is_some_and(|expiry| now <= expiry)
    }
}

/// Parse an expiry timestamp.
///
/// Accepts RFC 3339 (`2026-01-31T00:00:00Z`) and naive forms
/// (`2026-01-31 00:00:00`, `2026-01-31T00:00:00`, `2026-01-31`), the
/// latter interpreted in local time.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    let naive = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// A group row that has not been persisted yet.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGroup {
    pub name: String,
    pub external_id: i64,
    #[serde(default)]
    pub admins: IdList,
    pub expired_at: String,
    #[serde(default)]
    pub plugins: IdList,
}

impl NewGroup {
    pub fn with_id(self, id: i64) -> Group {
        Group {
            id,
            name: self.name,
            external_id: self.external_id,
            admins: self.admins,
            expired_at: self.expired_at,
            plugins: self.plugins,
        }
    }
}

/// Partial group update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupPatch {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub external_id: Option<i64>,
    #[serde(default)]
    pub admins: Option<IdList>,
    #[serde(default)]
    pub expired_at: Option<String>,
    #[serde(default)]
    pub plugins: Option<IdList>,
}

impl GroupPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.external_id.is_none()
            && self.admins.is_none()
            && self.expired_at.is_none()
            && self.plugins.is_none()
    }

    /// Apply the present fields to `group`.
    #[cfg(test)]
    pub fn apply_to(&self, group: &mut Group) {
        if let Some(name) = &self.name {
            group.name = name.clone();
        }
        if let Some(external_id) = self.external_id {
            group.external_id = external_id;
        }
        if let Some(admins) = &self.admins {
            group.admins = admins.clone();
        }
        if let Some(expired_at) = &self.expired_at {
            group.expired_at = expired_at.clone();
        }
        if let Some(plugins) = &self.plugins {
            group.plugins = plugins.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn group_expiring(expired_at: &str) -> Group {
        NewGroup {
            name: "test".into(),
            external_id: -100,
            admins: IdList::from(vec![1]),
            expired_at: expired_at.into(),
            plugins: IdList::new(),
        }
        .with_id(1)
    }

    #[test]
    fn test_valid_until_expiry_inclusive() {
        let group = group_expiring("2030-06-01T12:00:00Z");
        let expiry = group.expiry().unwrap();

        assert!(group.is_valid_at(expiry - Duration::seconds(1)));
        assert!(group.is_valid_at(expiry));
        assert!(!group.is_valid_at(expiry + Duration::seconds(1)));
    }

    #[test]
    fn test_unparseable_expiry_is_invalid() {
        let group = group_expiring("someday");
        assert!(group.expiry().is_none());
        assert!(!group.is_valid_at(Utc::now()));
    }

    #[test]
    fn test_parse_naive_forms() {
        assert!(parse_timestamp("2030-01-31 08:30:00").is_some());
        assert!(parse_timestamp("2030-01-31T08:30:00").is_some());
        assert!(parse_timestamp("2030-01-31").is_some());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_patch_emptiness() {
        let patch: GroupPatch = serde_json::from_str(r#"{"id": 7}"#).unwrap();
        assert!(patch.is_empty());

        let patch: GroupPatch = serde_json::from_str(r#"{"id": 7, "plugins": "1,2"}"#).unwrap();
        assert!(!patch.is_empty());
        assert_eq!(patch.plugins, Some(IdList::from(vec![1, 2])));
    }

    #[test]
    fn test_is_admin() {
        let group = group_expiring("2030-01-01");
        assert!(group.is_admin(1));
        assert!(!group.is_admin(2));
    }
}
