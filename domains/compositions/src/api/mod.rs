//! API layer for the Compositions domain
//!
//! Contains HTTP handlers, routes, and domain state definition.

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::CompositionsState;
pub use routes::routes;
