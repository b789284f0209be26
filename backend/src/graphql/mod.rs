//! GraphQL API for movies and directors
//!
//! This module provides the GraphQL schema using async-graphql. Queries and
//! mutations are split by entity into `queries/` and `mutations/`; each file
//! defines a `#[derive(Default)]` struct with an `#[Object]` impl, and
//! `schema.rs` merges them with `#[derive(MergedObject)]`.

pub mod helpers;
pub mod loaders;
pub mod mutations;
pub mod queries;
mod schema;
pub mod types;

pub use schema::{CinemaSchema, build_schema};
