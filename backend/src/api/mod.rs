//! API route definitions
//!
//! The primary API is GraphQL at /graphql. REST endpoints cover only
//! operational probes.

pub mod health;
