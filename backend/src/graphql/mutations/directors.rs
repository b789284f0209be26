use super::prelude::*;

#[derive(Default)]
pub struct DirectorMutations;

#[Object]
impl DirectorMutations {
    /// Add a director
    async fn add_director(
        &self,
        ctx: &Context<'_>,
        name: String,
        age: i32,
    ) -> Result<Option<Director>> {
        let db = ctx.data_unchecked::<Database>();

        let created = db.directors().create(CreateDirector { name, age }).await;
        let Some(record) = null_on_store_error(ctx, created) else {
            return Ok(None);
        };

        tracing::info!(
            director_id = %record.id,
            director_name = %record.name,
            "Director added"
        );

        Ok(Some(director_record_to_graphql(record)))
    }

    /// Replace a director's name and age. Returns the updated director, or
    /// null if no director has this ID.
    async fn edit_director(
        &self,
        ctx: &Context<'_>,
        id: ID,
        name: String,
        age: i32,
    ) -> Result<Option<Director>> {
        let db = ctx.data_unchecked::<Database>();

        let updated = db.directors().update(&id, UpdateDirector { name, age }).await;
        let Some(record) = null_on_store_error(ctx, updated) else {
            return Ok(None);
        };

        match &record {
            Some(r) => tracing::info!(director_id = %r.id, "Director updated"),
            None => tracing::debug!(director_id = %id.as_str(), "No director to update"),
        }

        Ok(record.map(director_record_to_graphql))
    }

    /// Delete a director. Movies referencing it are kept as they are.
    async fn delete_director(
        &self,
        ctx: &Context<'_>,
        id: ID,
    ) -> Result<Option<DeleteDirectorResult>> {
        let db = ctx.data_unchecked::<Database>();

        let Some(deleted) = null_on_store_error(ctx, db.directors().delete(&id).await) else {
            return Ok(None);
        };
        let result = DeleteDirectorResult::from_rows_affected(id, deleted);

        if result.is_noop() {
            tracing::debug!(director_id = %result.id.as_str(), "No director to delete");
        } else {
            tracing::info!(director_id = %result.id.as_str(), "Director deleted");
        }

        Ok(Some(result))
    }
}
