use super::prelude::*;

#[derive(Default)]
pub struct MovieQueries;

#[Object]
impl MovieQueries {
    /// Get a specific movie by ID. Null when the ID is omitted or unknown.
    async fn movie(&self, ctx: &Context<'_>, id: Option<ID>) -> Result<Option<Movie>> {
        let Some(id) = id else {
            return Ok(None);
        };
        let db = ctx.data_unchecked::<Database>();

        let record = null_on_store_error(ctx, db.movies().get_by_id(&id).await).flatten();

        Ok(record.map(movie_record_to_graphql))
    }

    /// Get all movies
    async fn movie_collection(&self, ctx: &Context<'_>) -> Result<Option<Vec<Movie>>> {
        let db = ctx.data_unchecked::<Database>();

        let records = null_on_store_error(ctx, db.movies().list_all().await);

        Ok(records.map(|records| records.into_iter().map(movie_record_to_graphql).collect()))
    }
}
