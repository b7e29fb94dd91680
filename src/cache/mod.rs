//! Cache module - Snapshot caches over configuration records using Moka.
//!
//! ## Architecture
//!
//! - `CacheRegistry` - Central registry holding all named caches
//! - `TypedCache` - Typed handle over a Moka cache
//! - `ConfigCache` - TTL views over the plugin catalog and groups
//!
//! Writes never invalidate a view; changes become visible once the view's
//! TTL elapses and the next read refreshes it.

mod config;
mod registry;
mod typed;
mod views;

pub use config::{CacheConfig, DEFAULT_TTL};
pub use registry::CacheRegistry;
pub use typed::TypedCache;
pub use views::ConfigCache;

#[cfg(test)]
pub(crate) use views::tests as test_support;
