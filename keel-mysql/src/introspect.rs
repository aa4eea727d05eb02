use crate::MySQLDriver;
use keel_core::{ErrorContext, Executor, Query, Result, TableRef};

impl MySQLDriver {
    /// Whether `table` (optionally `schema.table`) exists, in the current schema when unqualified.
    pub async fn table_exists<E: Executor>(
        &self,
        executor: &mut E,
        table: impl Into<TableRef>,
    ) -> Result<bool> {
        let table = table.into();
        let query = Query::new(
            "SELECT 1 FROM information_schema.tables \
             WHERE table_schema = COALESCE(?, DATABASE()) AND table_name = ?",
        )
        .bind(table.schema.clone())
        .bind(table.name.clone());
        exists(executor, query, || format!("table {}", table)).await
    }

    /// Whether the index `name` exists on `table`.
    pub async fn index_exists<E: Executor>(
        &self,
        executor: &mut E,
        table: impl Into<TableRef>,
        name: &str,
    ) -> Result<bool> {
        let table = table.into();
        let query = Query::new(
            "SELECT 1 FROM information_schema.statistics \
             WHERE table_schema = COALESCE(?, DATABASE()) AND table_name = ? AND index_name = ? \
             LIMIT 1",
        )
        .bind(table.schema.clone())
        .bind(table.name.clone())
        .bind(name.to_string());
        exists(executor, query, || format!("index `{}` on {}", name, table)).await
    }

    /// Whether the foreign key constraint `name` exists on `table`.
    pub async fn foreign_key_exists<E: Executor>(
        &self,
        executor: &mut E,
        table: impl Into<TableRef>,
        name: &str,
    ) -> Result<bool> {
        let table = table.into();
        let query = Query::new(
            "SELECT 1 FROM information_schema.table_constraints \
             WHERE table_schema = COALESCE(?, DATABASE()) AND table_name = ? \
             AND constraint_type = 'FOREIGN KEY' AND constraint_name = ?",
        )
        .bind(table.schema.clone())
        .bind(table.name.clone())
        .bind(name.to_string());
        exists(executor, query, || {
            format!("foreign key `{}` on {}", name, table)
        })
        .await
    }
}

async fn exists<E: Executor, F: FnOnce() -> String>(
    executor: &mut E,
    query: Query,
    what: F,
) -> Result<bool> {
    let row = executor
        .fetch_optional(query)
        .await
        .with_context(|| format!("While looking up the {}", what()))?;
    Ok(row.is_some())
}
