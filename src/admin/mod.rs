//! Administrative surface.
//!
//! - `AdminService` - plugin/group writes with internal-plugin forcing
//! - `routes` - axum router exposing the service over HTTP
//!
//! Every operation answers with the `ApiResponse` envelope; errors are
//! reported, never propagated past the handler.

mod response;
mod routes;
mod service;

pub use routes::serve;
pub use service::AdminService;
