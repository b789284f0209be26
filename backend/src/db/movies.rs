//! Movie database repository

use anyhow::Result;
use sqlx::SqlitePool;

use super::new_document_id;
use super::schema_sync::{ColumnDef, DocumentSchema, IndexDef};

/// Movie record from database
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct MovieRecord {
    pub id: String,
    pub name: String,
    pub genre: String,
    /// Director reference. Not enforced; may dangle.
    pub director_id: String,
}

impl DocumentSchema for MovieRecord {
    const TABLE_NAME: &'static str = "movies";

    fn columns() -> &'static [ColumnDef] {
        const COLUMNS: &[ColumnDef] = &[
            ColumnDef::primary_key("id"),
            ColumnDef::required("name", "TEXT"),
            ColumnDef::required("genre", "TEXT"),
            ColumnDef::required("director_id", "TEXT"),
        ];
        COLUMNS
    }

    fn indexes() -> &'static [IndexDef] {
        const INDEXES: &[IndexDef] = &[IndexDef {
            name: "idx_movies_director_id",
            columns: &["director_id"],
        }];
        INDEXES
    }
}

/// Input for creating a movie
#[derive(Debug)]
pub struct CreateMovie {
    pub name: String,
    pub genre: String,
    pub director_id: String,
}

/// Full replacement of a movie's fields
#[derive(Debug)]
pub struct UpdateMovie {
    pub name: String,
    pub genre: String,
    pub director_id: String,
}

pub struct MovieRepository {
    pool: SqlitePool,
}

impl MovieRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a movie by ID
    pub async fn get_by_id(&self, id: &str) -> Result<Option<MovieRecord>> {
        let record = sqlx::query_as::<_, MovieRecord>(
            "SELECT id, name, genre, director_id FROM movies WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// List all movies in insertion order
    pub async fn list_all(&self) -> Result<Vec<MovieRecord>> {
        let records = sqlx::query_as::<_, MovieRecord>(
            "SELECT id, name, genre, director_id FROM movies ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Create a new movie. The director reference is stored as given.
    pub async fn create(&self, input: CreateMovie) -> Result<MovieRecord> {
        let record = sqlx::query_as::<_, MovieRecord>(
            r#"
            INSERT INTO movies (id, name, genre, director_id)
            VALUES (?, ?, ?, ?)
            RETURNING id, name, genre, director_id
            "#,
        )
        .bind(new_document_id())
        .bind(&input.name)
        .bind(&input.genre)
        .bind(&input.director_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    /// Replace a movie's fields, returning the updated record
    pub async fn update(&self, id: &str, input: UpdateMovie) -> Result<Option<MovieRecord>> {
        let record = sqlx::query_as::<_, MovieRecord>(
            r#"
            UPDATE movies SET name = ?, genre = ?, director_id = ?
            WHERE id = ?
            RETURNING id, name, genre, director_id
            "#,
        )
        .bind(&input.name)
        .bind(&input.genre)
        .bind(&input.director_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Delete a movie by ID
    pub async fn delete(&self, id: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM movies WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
