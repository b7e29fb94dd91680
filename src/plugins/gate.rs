//! Access gate in front of every plugin command.

use tracing::debug;

use crate::database::StoreResult;
use crate::permissions::PermissionResolver;

use super::BuiltinPlugin;

/// Outcome of an access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allowed,
    /// Non-internal plugins only run inside groups.
    GroupOnly,
    /// Group unknown or past its expiry.
    GroupInvalid,
    /// Not granted to this group/user.
    NotAvailable,
}

impl Access {
    /// Notice sent back when access is refused.
    pub fn notice(self) -> Option<&'static str> {
        match self {
            Self::Allowed => None,
            Self::GroupOnly => Some("This command only works in groups."),
            Self::GroupInvalid => Some("This group is not registered or its subscription has expired."),
            Self::NotAvailable => Some("This plugin is not enabled for you in this group."),
        }
    }
}

/// Decide whether `plugin` may run for `user_id` in `chat_id`.
///
/// Internal plugins always run.
pub async fn check_access(
    permissions: &PermissionResolver,
    plugin: &BuiltinPlugin,
    is_group: bool,
    chat_id: i64,
    user_id: Option<i64>,
) -> StoreResult<Access> {
    if plugin.internal {
        return Ok(Access::Allowed);
    }

    if !is_group {
        return Ok(Access::GroupOnly);
    }

    if !permissions.is_group_valid(chat_id).await? {
        debug!("Chat {} is not a valid group", chat_id);
        return Ok(Access::GroupInvalid);
    }

    if !permissions
        .is_plugin_available(chat_id, user_id, plugin.name)
        .await?
    {
        debug!(
            "Plugin {} not available for user {:?} in chat {}",
            plugin.name, user_id, chat_id
        );
        return Ok(Access::NotAvailable);
    }

    Ok(Access::Allowed)
}
