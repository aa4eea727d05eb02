use crate::{DecodeTable, MySQLConfig, ValueWrap, decode_row};
use async_stream::try_stream;
use keel_core::{
    Connection, Error, ErrorContext, Executor, Query, QueryResult, Result, RowsAffected,
    stream::{Stream, StreamExt, TryStreamExt},
};
use mysql_async::{Conn, Params, prelude::Queryable};
use std::sync::Arc;

/// One physical connection to a MySQL server.
///
/// Statements without parameters go through the text protocol, the others
/// are prepared and run through the binary protocol.
pub struct MySQLConnection {
    pub(crate) connection: Conn,
    pub(crate) decode_table: Arc<DecodeTable>,
}

impl MySQLConnection {
    pub async fn connect(config: &MySQLConfig) -> Result<MySQLConnection> {
        let context = || format!("While trying to connect to {}", config.pool_key());
        let config = config.merged();
        let result = async {
            let connection = Conn::new(config.opts()?).await?;
            Ok::<_, Error>(MySQLConnection {
                connection,
                decode_table: config.decode_table.clone().unwrap_or_default(),
            })
        }
        .await
        .with_context(context);
        if let Err(e) = &result {
            log::error!("{:#}", e);
        }
        result
    }

    pub fn decode_table(&self) -> &DecodeTable {
        &self.decode_table
    }
}

impl Executor for MySQLConnection {
    fn run(&mut self, query: Query) -> impl Stream<Item = Result<QueryResult>> + Send {
        let context = Arc::new(format!("While running the query:\n{}", query));
        let table = self.decode_table.clone();
        try_stream! {
            let Query { sql, params } = query;
            if params.is_empty() {
                let mut result = self.connection.query_iter(sql).await?;
                let mut rows = 0;
                while let Some(mut stream) = result.stream::<mysql_async::Row>().await? {
                    while let Some(row) = stream.next().await.transpose()? {
                        rows += 1;
                        yield QueryResult::Row(decode_row(row, &table)?);
                    }
                }
                if rows == 0 {
                    yield QueryResult::Affected(RowsAffected {
                        rows_affected: result.affected_rows(),
                        last_affected_id: result.last_insert_id(),
                    });
                }
            } else {
                let params = params
                    .into_iter()
                    .map(|v| mysql_async::Value::try_from(ValueWrap(v)))
                    .collect::<Result<Vec<_>>>()?;
                let mut result = self
                    .connection
                    .exec_iter(sql, Params::Positional(params))
                    .await?;
                let mut rows = 0;
                while let Some(mut stream) = result.stream::<mysql_async::Row>().await? {
                    while let Some(row) = stream.next().await.transpose()? {
                        rows += 1;
                        yield QueryResult::Row(decode_row(row, &table)?);
                    }
                }
                if rows == 0 {
                    yield QueryResult::Affected(RowsAffected {
                        rows_affected: result.affected_rows(),
                        last_affected_id: result.last_insert_id(),
                    });
                }
            }
        }
        .map_err(move |e: Error| {
            let e = e.context(context.clone());
            log::error!("{:#}", e);
            e
        })
    }
}

impl Connection for MySQLConnection {
    async fn disconnect(self) -> Result<()> {
        self.connection
            .disconnect()
            .await
            .context("While disconnecting from the MySQL server")
    }
}
