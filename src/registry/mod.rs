//! Runtime plugin registration.
//!
//! Plugins become active by registering at startup (built-in commands)
//! or through the admin API (out-of-process providers). Registration
//! state lives only as long as the process.

mod tracker;

pub use tracker::RegistrationTracker;
