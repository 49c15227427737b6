//! The `check` command: load both collections and report their size

use depot::{BoxError, Config};

use crate::config::StorageConfig;
use crate::state::AppState;

pub async fn run() -> Result<(), BoxError> {
    let storage = Config::get::<StorageConfig>().unwrap_or_default();
    let state = AppState::from_files(&storage, false).await?;

    let users = state.users.store().read(|t| t.len()).await;
    println!("{}: {} users", storage.users_path.display(), users);

    let categories = state
        .products
        .store()
        .read(|c| {
            c.iter()
                .map(|(name, table)| (name.to_string(), table.len()))
                .collect::<Vec<_>>()
        })
        .await;
    println!(
        "{}: {} categories",
        storage.products_path.display(),
        categories.len()
    );
    for (name, count) in categories {
        println!("  {}: {} products", name, count);
    }

    Ok(())
}
