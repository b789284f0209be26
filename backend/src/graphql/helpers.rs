// Helper functions shared across GraphQL query/mutation modules.

use std::fmt::Display;

use async_graphql::{Context, ErrorExtensions};

use crate::db::{DirectorRecord, MovieRecord};
use crate::graphql::types::{Director, Movie};

/// Convert a MovieRecord from the database to a GraphQL Movie type
pub(crate) fn movie_record_to_graphql(r: MovieRecord) -> Movie {
    Movie {
        id: r.id.into(),
        name: r.name,
        genre: r.genre,
        director_id: r.director_id.into(),
    }
}

/// Convert a DirectorRecord from the database to a GraphQL Director type
pub(crate) fn director_record_to_graphql(r: DirectorRecord) -> Director {
    Director {
        id: r.id.into(),
        name: r.name,
        age: r.age,
    }
}

/// Wrap a store failure as a field-level GraphQL error with code `STORE_ERROR`
pub(crate) fn store_error(e: impl Display) -> async_graphql::Error {
    tracing::error!(error = %e, "Store call failed");
    async_graphql::Error::new(e.to_string()).extend_with(|_, ext| ext.set("code", "STORE_ERROR"))
}

/// Settle a store result for a nullable field.
///
/// A failure is recorded on the response against this field, which then
/// resolves to null so sibling fields keep their data.
pub(crate) fn null_on_store_error<T, E: Display>(
    ctx: &Context<'_>,
    result: Result<T, E>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            let err = store_error(e).into_server_error(ctx.item.pos);
            ctx.add_error(ctx.set_error_path(err));
            None
        }
    }
}
