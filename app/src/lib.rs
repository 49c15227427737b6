pub mod bootstrap;
pub mod check;
pub mod config;
pub mod controllers;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod views;

pub use state::AppState;
