//! Cinema Backend - GraphQL catalogue of movies and their directors
//!
//! This is the main entry point for the Cinema backend API.
//! All operations are exposed via GraphQL at /graphql.

mod api;
mod app;
mod config;
mod db;
mod graphql;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::{AppState, build_app};
use crate::config::Config;
use crate::db::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(Config::from_env()?);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cinema=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    tracing::info!("Starting Cinema Backend");
    tracing::info!("Configuration loaded");

    // A failed connect is not fatal: the GraphQL surface stays mounted and
    // requests report store errors until the database is reachable.
    let db = match Database::connect(&config.database_url, config.database_max_connections).await
    {
        Ok(db) => {
            tracing::info!("Database connected");
            db
        }
        Err(e) => {
            tracing::error!(error = %e, "Database connection failed");
            Database::connect_lazy(&config.database_url, config.database_max_connections)?
        }
    };

    db.sync_schema().await.log();

    let schema = graphql::build_schema(db.clone());
    tracing::info!("GraphQL schema built");

    let state = AppState {
        config: config.clone(),
        db,
        schema,
    };
    let app = build_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);
    if config.graphiql {
        tracing::info!("GraphQL playground: {}", config.graphql_url());
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
