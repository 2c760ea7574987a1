//! Example consumer: a separate Rust project that uses rest-binding as a dependency.
//!
//! Run from repo root: `cargo run -p example-consumer`
//! Or from this directory: `cargo run`
//!
//! Reads `REST_*` settings from the environment (or `.env`), schemas from
//! `SCHEMAS_PATH` (default `schemas.json`), then lists users and walks a relation.

use rest_binding::{load_from_path, HttpTransport, Lookup, RestConfig, RestState};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("rest_binding=info,example_consumer=info")),
        )
        .init();

    let mut config = RestConfig::from_env()?;
    if config.base_url.is_empty() {
        config.base_url = "https://jsonplaceholder.typicode.com".into();
    }
    let state = RestState::new(config, Arc::new(HttpTransport::new()));

    let schemas_path = std::env::var("SCHEMAS_PATH").unwrap_or_else(|_| "schemas.json".into());
    let schemas = load_from_path(&schemas_path).await?;
    tracing::info!(count = schemas.len(), path = %schemas_path, "schemas loaded");
    state.schemas().add_all(schemas);

    let mut users = state.repository("user", None)?;
    let mut listed = users.find(Lookup::All).send().await?.into_many();
    tracing::info!(count = listed.len(), "users fetched");

    if let Some(user) = listed.first_mut() {
        let posts = user.get_relation("posts", Lookup::All)?.send().await?.into_many();
        tracing::info!(user = ?user.id(), posts = posts.len(), route = %user.self_route(true), "posts fetched");

        if let Some(mut post) = posts.into_iter().next() {
            let author = post.get_relation("author", Lookup::All)?.send().await?.into_one();
            tracing::info!(post = ?post.id(), author = ?author.as_ref().and_then(|a| a.get("name")), "author fetched");
        }
    }
    Ok(())
}
