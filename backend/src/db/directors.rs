//! Director database repository

use anyhow::Result;
use sqlx::SqlitePool;

use super::new_document_id;
use super::schema_sync::{ColumnDef, DocumentSchema};

/// Director record from database
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct DirectorRecord {
    pub id: String,
    pub name: String,
    pub age: i32,
}

impl DocumentSchema for DirectorRecord {
    const TABLE_NAME: &'static str = "directors";

    fn columns() -> &'static [ColumnDef] {
        const COLUMNS: &[ColumnDef] = &[
            ColumnDef::primary_key("id"),
            ColumnDef::required("name", "TEXT"),
            ColumnDef::required("age", "INTEGER"),
        ];
        COLUMNS
    }
}

/// Input for creating a director
#[derive(Debug)]
pub struct CreateDirector {
    pub name: String,
    pub age: i32,
}

/// Full replacement of a director's fields
#[derive(Debug)]
pub struct UpdateDirector {
    pub name: String,
    pub age: i32,
}

pub struct DirectorRepository {
    pool: SqlitePool,
}

impl DirectorRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a director by ID
    pub async fn get_by_id(&self, id: &str) -> Result<Option<DirectorRecord>> {
        let record = sqlx::query_as::<_, DirectorRecord>(
            "SELECT id, name, age FROM directors WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// List all directors in insertion order
    pub async fn list_all(&self) -> Result<Vec<DirectorRecord>> {
        let records = sqlx::query_as::<_, DirectorRecord>(
            "SELECT id, name, age FROM directors ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Create a new director
    pub async fn create(&self, input: CreateDirector) -> Result<DirectorRecord> {
        let record = sqlx::query_as::<_, DirectorRecord>(
            r#"
            INSERT INTO directors (id, name, age)
            VALUES (?, ?, ?)
            RETURNING id, name, age
            "#,
        )
        .bind(new_document_id())
        .bind(&input.name)
        .bind(input.age)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    /// Replace a director's fields, returning the updated record
    pub async fn update(&self, id: &str, input: UpdateDirector) -> Result<Option<DirectorRecord>> {
        let record = sqlx::query_as::<_, DirectorRecord>(
            r#"
            UPDATE directors SET name = ?, age = ?
            WHERE id = ?
            RETURNING id, name, age
            "#,
        )
        .bind(&input.name)
        .bind(input.age)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Delete a director by ID. Referencing movies are left untouched.
    pub async fn delete(&self, id: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM directors WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
