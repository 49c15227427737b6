//! Application bootstrap
//!
//! Registers global middleware before the server is built.

use depot::register_global_middleware;

use crate::middleware;

/// Register global middleware
///
/// Called by `Application::run` before the routes are loaded.
pub async fn register() {
    // Runs on every request in registration order
    register_global_middleware(middleware::LoggingMiddleware);
}
