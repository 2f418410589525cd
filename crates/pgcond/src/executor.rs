//! Transport contract.
//!
//! The crate only produces statement text. Running it is delegated to a
//! [`QueryExecutor`]; with the `postgres` feature, `tokio_postgres::Client`
//! and `tokio_postgres::Transaction` implement it directly.

use crate::error::QueryResult;
use crate::expr::default_field_to_str;
use crate::schema::{InsertPayload, SchemaProvider, statement};

/// Something that can run a plain SQL statement.
pub trait QueryExecutor: Send + Sync {
    /// Execute `sql` and return the number of affected rows.
    fn execute(&self, sql: &str) -> impl std::future::Future<Output = QueryResult<u64>> + Send;
}

/// Insert `payload` into its table through `executor`.
///
/// Values are inlined with the default formatter.
pub async fn insert_payload<E, P>(executor: &E, schema: &P, payload: &InsertPayload) -> QueryResult<u64>
where
    E: QueryExecutor,
    P: SchemaProvider + Sync,
{
    let sql = statement::insert_statement(schema, payload, default_field_to_str)?;
    tracing::debug!(target: "pgcond", table = %payload.table(), rows = payload.len(), "executing insert");
    executor.execute(&sql).await
}

#[cfg(feature = "postgres")]
impl QueryExecutor for tokio_postgres::Client {
    async fn execute(&self, sql: &str) -> QueryResult<u64> {
        Ok(tokio_postgres::Client::execute(self, sql, &[]).await?)
    }
}

#[cfg(feature = "postgres")]
impl QueryExecutor for tokio_postgres::Transaction<'_> {
    async fn execute(&self, sql: &str) -> QueryResult<u64> {
        Ok(tokio_postgres::Transaction::execute(self, sql, &[]).await?)
    }
}
