//! Permission system for plugin access.
//!
//! This module answers, per (group, user), which plugins may run:
//!
//! - Group validity (known and not expired)
//! - Group admin lookup
//! - Available plugins: group grants merged with per-user
//!   whitelist/blacklist overrides, limited to the active catalog
//!
//! ## Usage
//!
//! ```rust
//! let perms = PermissionResolver::new(cache.clone());
//!
//! if perms.is_group_valid(chat_id).await? {
//!     let plugins = perms.get_available_plugins(chat_id, Some(user_id)).await?;
//! }
//! ```

mod resolver;

pub use resolver::PermissionResolver;
