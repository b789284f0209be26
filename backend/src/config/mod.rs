//! Application configuration management

use std::env;

use anyhow::{Context, Result};

use crate::db::DEFAULT_MAX_CONNECTIONS;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host (for generating URLs)
    pub host: Option<String>,

    /// Server port
    pub port: u16,

    /// SQLite database URL (e.g. `sqlite:cinema.db?mode=rwc` or `sqlite::memory:`)
    pub database_url: String,

    /// Maximum pooled database connections
    pub database_max_connections: u32,

    /// Serve the GraphiQL playground on GET /graphql
    pub graphiql: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Prefer DATABASE_URL, fall back to a plain DATABASE_PATH
        let database_url = env::var("DATABASE_URL")
            .ok()
            .or_else(|| {
                env::var("DATABASE_PATH")
                    .ok()
                    .map(|path| format!("sqlite:{}?mode=rwc", path))
            })
            .unwrap_or_else(|| "sqlite:cinema.db?mode=rwc".to_string());

        Ok(Self {
            host: env::var("HOST").ok(),

            port: env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .context("Invalid PORT")?,

            database_url,

            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_CONNECTIONS),

            graphiql: env::var("GRAPHIQL")
                .map(|v| parse_flag(&v))
                .unwrap_or(true),
        })
    }

    /// Public URL of the GraphQL endpoint, for logging
    pub fn graphql_url(&self) -> String {
        format!(
            "http://{}:{}/graphql",
            self.host.as_deref().unwrap_or("localhost"),
            self.port
        )
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
