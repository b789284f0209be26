//! Automatic schema synchronization from document definitions
//!
//! Each document kind describes its table with [DocumentSchema];
//! [sync_all_document_schemas] brings a connection's database in line:
//! - Creates missing tables
//! - Adds missing columns
//! - Creates missing indexes
//! - Does NOT handle column renames, type changes, or drops

use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use super::directors::DirectorRecord;
use super::movies::MovieRecord;

/// Column definition for schema generation.
#[derive(Debug, Clone)]
pub struct ColumnDef {
    /// Column name in the database
    pub name: &'static str,
    /// SQLite column type (TEXT, INTEGER, REAL, BLOB)
    pub sql_type: &'static str,
    /// Whether the column can be NULL
    pub nullable: bool,
    /// Whether this is the primary key
    pub is_primary_key: bool,
}

impl ColumnDef {
    pub const fn primary_key(name: &'static str) -> Self {
        Self {
            name,
            sql_type: "TEXT",
            nullable: false,
            is_primary_key: true,
        }
    }

    pub const fn required(name: &'static str, sql_type: &'static str) -> Self {
        Self {
            name,
            sql_type,
            nullable: false,
            is_primary_key: false,
        }
    }

    /// Generate the column definition SQL
    pub fn to_sql(&self) -> String {
        let mut sql = format!("{} {}", self.name, self.sql_type);

        if self.is_primary_key {
            sql.push_str(" PRIMARY KEY");
        }

        if !self.nullable && !self.is_primary_key {
            sql.push_str(" NOT NULL");
        }

        sql
    }
}

/// Secondary index on a document table.
#[derive(Debug, Clone)]
pub struct IndexDef {
    pub name: &'static str,
    pub columns: &'static [&'static str],
}

/// Table layout of a stored document kind.
pub trait DocumentSchema {
    /// The SQL table name (e.g., "movies")
    const TABLE_NAME: &'static str;

    /// All column definitions for this document's table
    fn columns() -> &'static [ColumnDef];

    /// Secondary indexes
    fn indexes() -> &'static [IndexDef] {
        &[]
    }

    /// Comma-separated column list for SELECT / RETURNING clauses
    fn column_list() -> String {
        Self::columns()
            .iter()
            .map(|c| c.name)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Generate CREATE TABLE IF NOT EXISTS SQL
    fn create_table_sql() -> String {
        let column_defs: Vec<String> = Self::columns().iter().map(|c| c.to_sql()).collect();

        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n  {}\n)",
            Self::TABLE_NAME,
            column_defs.join(",\n  ")
        )
    }
}

/// Result of a schema sync operation
#[derive(Debug, Default)]
pub struct SchemaSyncResult {
    pub tables_created: Vec<String>,
    pub columns_added: Vec<(String, String)>, // (table, column)
    pub indexes_created: Vec<String>,
    pub errors: Vec<String>,
}

impl SchemaSyncResult {
    fn failed(message: String) -> Self {
        Self {
            errors: vec![message],
            ..Default::default()
        }
    }

    /// Log what the sync changed and any errors it hit
    pub fn log(&self) {
        if !self.tables_created.is_empty() {
            info!(tables = ?self.tables_created, "Created tables");
        }
        if !self.columns_added.is_empty() {
            info!(columns = ?self.columns_added, "Added columns");
        }
        if !self.indexes_created.is_empty() {
            info!(indexes = ?self.indexes_created, "Created indexes");
        }
        for err in &self.errors {
            tracing::error!(error = %err, "Schema sync error");
        }
    }

    fn merge(&mut self, other: SchemaSyncResult) {
        self.tables_created.extend(other.tables_created);
        self.columns_added.extend(other.columns_added);
        self.indexes_created.extend(other.indexes_created);
        self.errors.extend(other.errors);
    }
}

/// Check if a table exists in the database
async fn table_exists(
    conn: &mut SqliteConnection,
    table_name: &str,
) -> Result<bool, sqlx::Error> {
    let result: Option<(String,)> =
        sqlx::query_as("SELECT name FROM sqlite_master WHERE type='table' AND name = ?")
            .bind(table_name)
            .fetch_optional(&mut *conn)
            .await?;

    Ok(result.is_some())
}

/// Check if an index exists in the database
async fn index_exists(
    conn: &mut SqliteConnection,
    index_name: &str,
) -> Result<bool, sqlx::Error> {
    let result: Option<(String,)> =
        sqlx::query_as("SELECT name FROM sqlite_master WHERE type='index' AND name = ?")
            .bind(index_name)
            .fetch_optional(&mut *conn)
            .await?;

    Ok(result.is_some())
}

/// Get existing columns for a table
async fn get_table_columns(
    conn: &mut SqliteConnection,
    table_name: &str,
) -> Result<Vec<String>, sqlx::Error> {
    let rows: Vec<(i32, String, String, i32, Option<String>, i32)> =
        sqlx::query_as(&format!("PRAGMA table_info({})", table_name))
            .fetch_all(&mut *conn)
            .await?;

    Ok(rows.into_iter().map(|(_, name, _, _, _, _)| name).collect())
}

/// Sync a single document kind's table to the database
pub async fn sync_document<D: DocumentSchema>(
    conn: &mut SqliteConnection,
) -> Result<SchemaSyncResult, sqlx::Error> {
    let mut result = SchemaSyncResult::default();
    let table_name = D::TABLE_NAME;

    if !table_exists(&mut *conn, table_name).await? {
        let create_sql = D::create_table_sql();
        debug!("Creating table {}: {}", table_name, create_sql);

        match sqlx::query(&create_sql).execute(&mut *conn).await {
            Ok(_) => {
                info!("Created table: {}", table_name);
                result.tables_created.push(table_name.to_string());
            }
            Err(e) => {
                let msg = format!("Failed to create table {}: {}", table_name, e);
                warn!("{}", msg);
                result.errors.push(msg);
                return Ok(result);
            }
        }
    } else {
        let existing_columns = get_table_columns(&mut *conn, table_name).await?;

        for col_def in D::columns() {
            if !existing_columns.iter().any(|c| c == col_def.name) {
                let alter_sql = generate_add_column_sql(table_name, col_def);
                debug!("Adding column to {}: {}", table_name, alter_sql);

                match sqlx::query(&alter_sql).execute(&mut *conn).await {
                    Ok(_) => {
                        info!("Added column {}.{}", table_name, col_def.name);
                        result
                            .columns_added
                            .push((table_name.to_string(), col_def.name.to_string()));
                    }
                    Err(e) => {
                        let msg = format!(
                            "Failed to add column {}.{}: {}",
                            table_name, col_def.name, e
                        );
                        warn!("{}", msg);
                        result.errors.push(msg);
                    }
                }
            }
        }
    }

    for index in D::indexes() {
        if index_exists(&mut *conn, index.name).await? {
            continue;
        }
        let sql = format!(
            "CREATE INDEX IF NOT EXISTS {} ON {} ({})",
            index.name,
            table_name,
            index.columns.join(", ")
        );
        match sqlx::query(&sql).execute(&mut *conn).await {
            Ok(_) => {
                info!("Created index {} on {}", index.name, table_name);
                result.indexes_created.push(index.name.to_string());
            }
            Err(e) => {
                let msg = format!("Failed to create index {}: {}", index.name, e);
                warn!("{}", msg);
                result.errors.push(msg);
            }
        }
    }

    Ok(result)
}

/// Generate ALTER TABLE ADD COLUMN SQL
fn generate_add_column_sql(table_name: &str, col: &ColumnDef) -> String {
    let mut sql = format!(
        "ALTER TABLE {} ADD COLUMN {} {}",
        table_name, col.name, col.sql_type
    );

    // SQLite cannot add a NOT NULL column without a default
    if !col.nullable {
        let default_val = match col.sql_type {
            "INTEGER" => "0",
            "REAL" => "0.0",
            _ => "''",
        };
        sql.push_str(&format!(" NOT NULL DEFAULT {}", default_val));
    }

    sql
}

/// Sync all document tables to the database.
///
/// Safe to run repeatedly.
pub async fn sync_all_document_schemas(conn: &mut SqliteConnection) -> SchemaSyncResult {
    let mut total_result = SchemaSyncResult::default();

    macro_rules! sync_one {
        ($document:ty) => {
            match sync_document::<$document>(&mut *conn).await {
                Ok(result) => total_result.merge(result),
                Err(e) => {
                    total_result.errors.push(format!(
                        "Error syncing {}: {}",
                        stringify!($document),
                        e
                    ));
                }
            }
        };
    }

    sync_one!(DirectorRecord);
    sync_one!(MovieRecord);

    total_result
}

/// Sync all document tables using a connection from the pool
pub async fn sync_pool(pool: &SqlitePool) -> SchemaSyncResult {
    match pool.acquire().await {
        Ok(mut conn) => sync_all_document_schemas(&mut conn).await,
        Err(e) => SchemaSyncResult::failed(format!("Failed to acquire connection: {}", e)),
    }
}
