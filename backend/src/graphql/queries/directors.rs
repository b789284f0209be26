use super::prelude::*;

#[derive(Default)]
pub struct DirectorQueries;

#[Object]
impl DirectorQueries {
    /// Get a specific director by ID. Null when the ID is omitted or unknown.
    async fn director(&self, ctx: &Context<'_>, id: Option<ID>) -> Result<Option<Director>> {
        let Some(id) = id else {
            return Ok(None);
        };
        let db = ctx.data_unchecked::<Database>();

        let record = null_on_store_error(ctx, db.directors().get_by_id(&id).await).flatten();

        Ok(record.map(director_record_to_graphql))
    }

    /// Get all directors
    async fn director_collection(&self, ctx: &Context<'_>) -> Result<Option<Vec<Director>>> {
        let db = ctx.data_unchecked::<Database>();

        let records = null_on_store_error(ctx, db.directors().list_all().await);

        Ok(records.map(|records| records.into_iter().map(director_record_to_graphql).collect()))
    }
}
