use depot::Application;
use storefront::{bootstrap, check, config, routes};

#[tokio::main]
async fn main() {
    Application::new()
        .config(config::register_all)
        .bootstrap(bootstrap::register)
        .routes(routes::register)
        .check(check::run)
        .run()
        .await;
}
