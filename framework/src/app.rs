//! Application builder
//!
//! Provides a fluent builder API to configure and run an application.
//!
//! # Example
//!
//! ```rust,ignore
//! use depot::Application;
//!
//! #[tokio::main]
//! async fn main() {
//!     Application::new()
//!         .config(config::register_all)
//!         .bootstrap(bootstrap::register)
//!         .routes(routes::register)
//!         .check(check::run)
//!         .run()
//!         .await;
//! }
//! ```

use crate::config::{AppConfig, Config};
use crate::{Router, Server};
use clap::{Parser, Subcommand};
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use tracing_subscriber::EnvFilter;

/// Error type for startup steps
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

type BootstrapFn = Box<dyn FnOnce() -> Pin<Box<dyn Future<Output = ()> + Send>> + Send>;
type RoutesFn =
    Box<dyn FnOnce() -> Pin<Box<dyn Future<Output = Result<Router, BoxError>> + Send>> + Send>;
type CheckFn =
    Box<dyn FnOnce() -> Pin<Box<dyn Future<Output = Result<(), BoxError>> + Send>> + Send>;

/// CLI structure for applications
#[derive(Parser)]
#[command(name = "storefront")]
#[command(about = "JSON-file backed storefront server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web server (default command)
    Serve {
        /// Also serve the HTML product pages
        #[arg(long)]
        views: bool,
    },
    /// Load the data files and report what they contain
    Check,
}

/// Application builder
#[derive(Default)]
pub struct Application {
    config_fn: Option<Box<dyn FnOnce()>>,
    bootstrap_fn: Option<BootstrapFn>,
    routes_fn: Option<RoutesFn>,
    check_fn: Option<CheckFn>,
}

impl Application {
    /// Create a new application builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a configuration function
    ///
    /// Called after `.env` files are loaded, before anything else runs.
    pub fn config<F>(mut self, f: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        self.config_fn = Some(Box::new(f));
        self
    }

    /// Register a bootstrap function
    ///
    /// This async function registers global middleware and other
    /// application components.
    pub fn bootstrap<F, Fut>(mut self, f: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.bootstrap_fn = Some(Box::new(move || Box::pin(f())));
        self
    }

    /// Register a routes function
    ///
    /// Building the router may fail (for example when a data file cannot be
    /// loaded); the error is logged and the process exits non-zero.
    pub fn routes<F, Fut>(mut self, f: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<Router, BoxError>> + Send + 'static,
    {
        self.routes_fn = Some(Box::new(move || Box::pin(f())));
        self
    }

    /// Register the function behind the `check` command
    pub fn check<F, Fut>(mut self, f: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        self.check_fn = Some(Box::new(move || Box::pin(f())));
        self
    }

    /// Run the application
    ///
    /// This parses CLI arguments and executes the appropriate command:
    /// - `serve [--views]` (default): Run the web server
    /// - `check`: Validate the data files
    pub async fn run(self) {
        let cli = Cli::parse();

        Config::init(Path::new("."));

        if let Some(Commands::Serve { views: true }) = cli.command {
            let app = Config::get::<AppConfig>().unwrap_or_default();
            Config::register(app.with_views());
        }

        init_tracing();

        let app = Config::get::<AppConfig>().unwrap_or_default();
        tracing::info!(
            app = %app.name,
            environment = %app.environment,
            views = app.views,
            "Configuration loaded"
        );

        let Application {
            config_fn,
            bootstrap_fn,
            routes_fn,
            check_fn,
        } = self;

        if let Some(config_fn) = config_fn {
            config_fn();
        }

        let result = match cli.command {
            None | Some(Commands::Serve { .. }) => {
                Self::run_server_internal(bootstrap_fn, routes_fn).await
            }
            Some(Commands::Check) => match check_fn {
                Some(check_fn) => check_fn().await,
                None => Err("no check registered".into()),
            },
        };

        if let Err(e) = result {
            tracing::error!(error = %e, "Startup failed");
            std::process::exit(1);
        }
    }

    async fn run_server_internal(
        bootstrap_fn: Option<BootstrapFn>,
        routes_fn: Option<RoutesFn>,
    ) -> Result<(), BoxError> {
        if let Some(bootstrap_fn) = bootstrap_fn {
            bootstrap_fn().await;
        }

        let router = match routes_fn {
            Some(routes_fn) => routes_fn().await?,
            None => Router::new(),
        };

        Server::from_config(router).run().await
    }
}

/// Install the fmt subscriber
///
/// `RUST_LOG` wins; otherwise `debug` in development environments and
/// `info` elsewhere.
fn init_tracing() {
    let default_level = if Config::environment().is_development() {
        "debug"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A subscriber may already be installed (tests, embedding)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
