use sqlx::{postgres::PgRow, FromRow};
use tracing::debug;

use crate::database::manager::{Database, DatabaseError};
use crate::database::query_builder::{stamp_fields, Fields, SqlQuery};
use crate::database::stamp::Stamp;

// Every operation below takes one connection from the pool, runs a single
// autocommitted statement on it, and hands it back when `conn` drops. `?`
// returns through that drop too, so failures release the connection as well.
impl Database {
    pub async fn select<T>(&self, query: &SqlQuery) -> Result<Vec<T>, DatabaseError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        self.trace(query);
        let mut conn = self.pool().acquire().await?;
        let rows = sqlx::query_as_with::<_, T, _>(&query.sql, query.arguments())
            .fetch_all(&mut *conn)
            .await?;
        Ok(rows)
    }

    pub async fn select_optional<T>(&self, query: &SqlQuery) -> Result<Option<T>, DatabaseError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        self.trace(query);
        let mut conn = self.pool().acquire().await?;
        let row = sqlx::query_as_with::<_, T, _>(&query.sql, query.arguments())
            .fetch_optional(&mut *conn)
            .await?;
        Ok(row)
    }

    pub async fn count(&self, query: &SqlQuery) -> Result<i64, DatabaseError> {
        self.trace(query);
        let mut conn = self.pool().acquire().await?;
        let count: i64 = sqlx::query_scalar_with(&query.sql, query.arguments())
            .fetch_one(&mut *conn)
            .await?;
        Ok(count)
    }

    /// Insert a row, stamping the created and updated pairs. Returns the new id.
    pub async fn create(&self, table: &str, data: Fields) -> Result<i64, DatabaseError> {
        let stamp = Stamp::now(self.offset());
        let data = stamp_fields(
            data,
            stamp,
            &[("created_at", "created_at_order"), ("updated_at", "updated_at_order")],
        );
        let query = SqlQuery::insert(table, &data)?;

        self.trace(&query);
        let mut conn = self.pool().acquire().await?;
        let id: i64 = sqlx::query_scalar_with(&query.sql, query.arguments())
            .fetch_one(&mut *conn)
            .await?;
        Ok(id)
    }

    /// Update a live row, re-stamping the updated pair. Returns rows affected.
    pub async fn update(&self, table: &str, id: i64, data: Fields) -> Result<u64, DatabaseError> {
        let stamp = Stamp::now(self.offset());
        let data = stamp_fields(data, stamp, &[("updated_at", "updated_at_order")]);
        let query = SqlQuery::update_live(table, id, &data)?;
        self.execute(&query).await
    }

    /// Soft delete. A row that is already deleted keeps its original deletion
    /// stamps and reports zero rows affected.
    pub async fn delete(&self, table: &str, id: i64) -> Result<u64, DatabaseError> {
        let query = SqlQuery::soft_delete(table, id, Stamp::now(self.offset()))?;
        self.execute(&query).await
    }

    pub async fn execute(&self, query: &SqlQuery) -> Result<u64, DatabaseError> {
        self.trace(query);
        let mut conn = self.pool().acquire().await?;
        let result = sqlx::query_with(&query.sql, query.arguments())
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected())
    }

    fn trace(&self, query: &SqlQuery) {
        if self.log_queries() {
            debug!(sql = %query.sql, params = query.params.len(), "executing query");
        }
    }
}
