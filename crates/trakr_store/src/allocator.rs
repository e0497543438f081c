//! Store-local sequence numbers backed by SQLite `AUTOINCREMENT`.
//!
//! `jobtrakr_ids` holds no business data. Each allocation appends one row and
//! the value SQLite assigned to it becomes the next sequence number. Because
//! the column is `AUTOINCREMENT`, values are never reused, even after the rows
//! are deleted.

use sea_orm::sea_query::{Alias, ColumnDef, Expr, Iden, Query, Table, TableCreateStatement};
use sea_orm::{ConnectionTrait, DatabaseBackend};

use crate::db::JobtrakrIds;
use crate::store::{build_stmt, query_one};
use jobtrakr_core::{AllocationError, TrakrResult};

const SQLITE_SEQUENCE: &str = "sqlite_sequence";

pub(crate) fn id_table_statement() -> TableCreateStatement {
    Table::create()
        .table(JobtrakrIds::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(JobtrakrIds::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .to_owned()
}

/// Creates the id generator table if it is missing. Never resets the counter.
pub async fn ensure_id_table<C: ConnectionTrait>(conn: &C) -> TrakrResult<()> {
    conn.execute(DatabaseBackend::Sqlite.build(&id_table_statement()))
        .await?;
    Ok(())
}

/// Appends one row to the id generator table and returns the sequence value
/// SQLite assigned to it. The first call against a fresh table returns 1.
pub async fn next_sequence<C: ConnectionTrait>(conn: &C) -> Result<i64, AllocationError> {
    let insert = Query::insert()
        .into_table(JobtrakrIds::Table)
        .or_default_values()
        .to_owned();
    let result = conn.execute(build_stmt(&insert)).await?;
    let sequence = i64::try_from(result.last_insert_id())
        .map_err(|_| AllocationError::insert("last insert id does not fit i64"))?;
    Ok(sequence)
}

/// Last sequence value handed out by this store, or `None` before the first allocation.
pub async fn current_sequence<C: ConnectionTrait>(conn: &C) -> TrakrResult<Option<i64>> {
    let select = Query::select()
        .column(Alias::new("seq"))
        .from(Alias::new(SQLITE_SEQUENCE))
        .and_where(Expr::col(Alias::new("name")).eq(JobtrakrIds::Table.to_string()))
        .limit(1)
        .to_owned();
    let row = query_one(conn, &select).await?;
    let Some(row) = row else {
        return Ok(None);
    };
    let seq: i64 = row.try_get("", "seq")?;
    Ok(Some(seq))
}
