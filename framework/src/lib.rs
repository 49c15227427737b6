pub mod app;
pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod resource;
pub mod routing;
pub mod server;
pub mod store;
pub mod testing;
pub mod view;

pub use app::{Application, BoxError};
pub use config::{env, AppConfig, Config, Environment, ServerConfig};
pub use error::FrameworkError;
pub use http::{html, json, text, HttpResponse, Redirect, Request, Response, ResponseExt};
pub use middleware::{register_global_middleware, Middleware, Next};
pub use resource::Resource;
pub use routing::Router;
pub use server::Server;

// Re-export async_trait for middleware implementations
pub use async_trait::async_trait;
