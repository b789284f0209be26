//! GraphQL type definitions
//!
//! `Movie` and `Director` reference each other. Both are registered by name
//! when the schema is built, so the cycle needs no declaration ordering; the
//! relation fields are resolved lazily through the loaders in
//! [loaders](crate::graphql::loaders).

use async_graphql::dataloader::DataLoader;
use async_graphql::{ComplexObject, Context, ID, Result, SimpleObject};
use cinema_macros::delete_result;

use crate::db::{DirectorRecord, MovieRecord};
use crate::graphql::helpers::{
    director_record_to_graphql, movie_record_to_graphql, null_on_store_error,
};
use crate::graphql::loaders::RelationLoader;

/// A movie
#[derive(Debug, Clone, PartialEq, Eq, SimpleObject)]
#[graphql(complex)]
pub struct Movie {
    pub id: ID,
    pub name: String,
    pub genre: String,
    /// Raw director reference; may point at a director that no longer exists
    pub director_id: ID,
}

#[ComplexObject]
impl Movie {
    /// The movie's director, or null when the reference dangles
    async fn director(&self, ctx: &Context<'_>) -> Result<Option<Director>> {
        let loader = ctx.data_unchecked::<DataLoader<RelationLoader<DirectorRecord>>>();
        let records = loader.load_one(self.director_id.to_string()).await;

        Ok(null_on_store_error(ctx, records)
            .flatten()
            .and_then(|records| records.into_iter().next())
            .map(director_record_to_graphql))
    }
}

/// A director
#[derive(Debug, Clone, PartialEq, Eq, SimpleObject)]
#[graphql(complex)]
pub struct Director {
    pub id: ID,
    pub name: String,
    pub age: i32,
}

#[ComplexObject]
impl Director {
    /// Movies referencing this director, in store order
    async fn movies(&self, ctx: &Context<'_>) -> Result<Option<Vec<Movie>>> {
        let loader = ctx.data_unchecked::<DataLoader<RelationLoader<MovieRecord>>>();
        let records = loader.load_one(self.id.to_string()).await;

        Ok(null_on_store_error(ctx, records).map(|records| {
            records
                .unwrap_or_default()
                .into_iter()
                .map(movie_record_to_graphql)
                .collect()
        }))
    }
}

delete_result!(DeleteMovieResult, Movie);
delete_result!(DeleteDirectorResult, Director);
