use super::prelude::*;

#[derive(Default)]
pub struct MovieMutations;

#[Object]
impl MovieMutations {
    /// Add a movie. The director reference is stored without checking that
    /// the director exists.
    async fn add_movie(
        &self,
        ctx: &Context<'_>,
        name: String,
        genre: String,
        director_id: ID,
    ) -> Result<Option<Movie>> {
        let db = ctx.data_unchecked::<Database>();

        let created = db
            .movies()
            .create(CreateMovie {
                name,
                genre,
                director_id: director_id.0,
            })
            .await;
        let Some(record) = null_on_store_error(ctx, created) else {
            return Ok(None);
        };

        tracing::info!(
            movie_id = %record.id,
            movie_name = %record.name,
            director_id = %record.director_id,
            "Movie added"
        );

        Ok(Some(movie_record_to_graphql(record)))
    }

    /// Replace a movie's name, genre and director. Returns the updated movie,
    /// or null if no movie has this ID.
    async fn edit_movie(
        &self,
        ctx: &Context<'_>,
        id: ID,
        name: String,
        genre: String,
        director_id: ID,
    ) -> Result<Option<Movie>> {
        let db = ctx.data_unchecked::<Database>();

        let updated = db
            .movies()
            .update(
                &id,
                UpdateMovie {
                    name,
                    genre,
                    director_id: director_id.0,
                },
            )
            .await;
        let Some(record) = null_on_store_error(ctx, updated) else {
            return Ok(None);
        };

        match &record {
            Some(r) => tracing::info!(movie_id = %r.id, "Movie updated"),
            None => tracing::debug!(movie_id = %id.as_str(), "No movie to update"),
        }

        Ok(record.map(movie_record_to_graphql))
    }

    /// Delete a movie
    async fn delete_movie(&self, ctx: &Context<'_>, id: ID) -> Result<Option<DeleteMovieResult>> {
        let db = ctx.data_unchecked::<Database>();

        let Some(deleted) = null_on_store_error(ctx, db.movies().delete(&id).await) else {
            return Ok(None);
        };
        let result = DeleteMovieResult::from_rows_affected(id, deleted);

        if result.is_noop() {
            tracing::debug!(movie_id = %result.id.as_str(), "No movie to delete");
        } else {
            tracing::info!(movie_id = %result.id.as_str(), "Movie deleted");
        }

        Ok(Some(result))
    }
}
