//! Database models.

pub mod group;
pub mod id_list;
pub mod plugin;

pub use group::{Group, GroupPatch, NewGroup};
pub use id_list::IdList;
pub use plugin::{NewPlugin, Plugin, PluginPatch};
