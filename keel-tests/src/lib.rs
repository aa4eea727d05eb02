use keel_core::{
    Executor, Query, QueryResult, Result, RowLabeled, RowNames, RowsAffected, Value,
    stream::{self, Stream},
};
use log::LevelFilter;
use std::env;

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

#[macro_export]
macro_rules! silent_logs {
    ($($code:tt)+) => {{
        let level = log::max_level();
        log::set_max_level(log::LevelFilter::Off);
        $($code)+
        log::set_max_level(level);
    }};
}

/// A single result row.
pub fn row(labels: &[&str], values: impl IntoIterator<Item = Value>) -> QueryResult {
    let labels: RowNames = labels.iter().map(|v| v.to_string()).collect();
    QueryResult::Row(RowLabeled::new(labels, values.into_iter().collect()))
}

/// Result of a statement returning no rows.
pub fn affected(rows_affected: u64) -> QueryResult {
    QueryResult::Affected(RowsAffected {
        rows_affected,
        last_affected_id: None,
    })
}

type Handler = Box<dyn FnMut(&Query) -> Result<Vec<QueryResult>> + Send>;

/// In-memory [`Executor`] answering every statement through a handler.
///
/// Every query is recorded, failed ones included.
pub struct ScriptedExecutor {
    handler: Handler,
    statements: Vec<Query>,
}

impl ScriptedExecutor {
    pub fn new(handler: impl FnMut(&Query) -> Result<Vec<QueryResult>> + Send + 'static) -> Self {
        Self {
            handler: Box::new(handler),
            statements: Vec::new(),
        }
    }

    /// Answers every statement with no rows.
    pub fn empty() -> Self {
        Self::new(|_| Ok(vec![affected(0)]))
    }

    pub fn statements(&self) -> &[Query] {
        &self.statements
    }

    /// SQL text of the recorded statements, in order.
    pub fn sql(&self) -> Vec<&str> {
        self.statements.iter().map(|v| v.sql.as_str()).collect()
    }
}

impl Executor for ScriptedExecutor {
    fn run(&mut self, query: Query) -> impl Stream<Item = Result<QueryResult>> + Send {
        let result = (self.handler)(&query);
        self.statements.push(query);
        let items: Vec<Result<QueryResult>> = match result {
            Ok(v) => v.into_iter().map(Ok).collect(),
            Err(e) => vec![Err(e)],
        };
        stream::iter(items)
    }
}
