use crate::{MySQLConfig, MySQLConnection, MySQLConverters, MySQLSqlWriter};
use keel_core::{
    Dialect, Driver, Error, ErrorClass, ErrorContext, Executor, ParamStyle, Query, Result,
    ServerState, Value, leading_number,
};
use mysql_async::{DriverError, IoError};
use std::io::ErrorKind;

pub const MYSQL_DIALECT: Dialect = Dialect {
    name: "MySQL",
    quote_char: '`',
    param_style: ParamStyle::Qmark,
    max_name_len: 64,
    table_if_not_exists: true,
    index_if_not_exists: false,
    select_for_update_nowait: false,
    inline_fk_syntax: false,
    default_time_precision: 0,
    max_time_precision: 0,
};

/// "MySQL server has gone away"
pub const CR_SERVER_GONE_ERROR: u16 = 2006;

/// Client error codes meaning the connection is dead and may be reopened.
pub const RECONNECT_CODES: &[(u16, &str)] = &[(CR_SERVER_GONE_ERROR, "MySQL server has gone away")];

/// First server version storing fractional seconds.
pub const FRACTIONAL_SECONDS_VERSION: (u16, u16, u16) = (5, 6, 4);

#[derive(Debug, Clone, Copy, Default)]
pub struct MySQLDriver;
impl MySQLDriver {
    pub const fn new() -> Self {
        Self
    }

    /// Converter registry matching what the server behind `state` supports.
    pub fn converters(&self, state: &ServerState) -> MySQLConverters {
        MySQLConverters::new(state.max_time_precision)
    }

    /// Renderer matching what the server behind `state` supports.
    pub fn sql_writer_for(&self, state: &ServerState) -> MySQLSqlWriter {
        MySQLSqlWriter::new(state.max_time_precision)
    }
}

impl Driver for MySQLDriver {
    type Connection = MySQLConnection;
    type Config = MySQLConfig;
    type SqlWriter = MySQLSqlWriter;

    const NAME: &'static str = "mysql";

    fn dialect(&self) -> &'static Dialect {
        &MYSQL_DIALECT
    }

    fn sql_writer(&self) -> Self::SqlWriter {
        MySQLSqlWriter::default()
    }

    fn merge_defaults(&self, config: &MySQLConfig) -> MySQLConfig {
        config.merged()
    }

    async fn connect(&self, config: &MySQLConfig) -> Result<MySQLConnection> {
        MySQLConnection::connect(config).await
    }

    async fn setup(&self, connection: &mut MySQLConnection) -> Result<ServerState> {
        inspect_server(connection).await
    }

    fn classify(&self, error: &Error) -> ErrorClass {
        classify(error)
    }
}

/// Client error code carried by `error`, closed connections count as [`CR_SERVER_GONE_ERROR`].
pub fn client_error_code(error: &mysql_async::Error) -> Option<u16> {
    match error {
        mysql_async::Error::Server(e) => Some(e.code),
        mysql_async::Error::Driver(DriverError::ConnectionClosed) => Some(CR_SERVER_GONE_ERROR),
        mysql_async::Error::Io(IoError::Io(e)) => match e.kind() {
            ErrorKind::BrokenPipe
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::NotConnected
            | ErrorKind::UnexpectedEof => Some(CR_SERVER_GONE_ERROR),
            _ => None,
        },
        _ => None,
    }
}

/// [`ErrorClass::Reconnect`] when the first transport error in the chain has
/// a code listed in [`RECONNECT_CODES`].
pub fn classify(error: &Error) -> ErrorClass {
    let code = error
        .chain()
        .find_map(|e| e.downcast_ref::<mysql_async::Error>())
        .and_then(client_error_code);
    match code {
        Some(code) if RECONNECT_CODES.iter().any(|(v, _)| *v == code) => ErrorClass::Reconnect,
        _ => ErrorClass::Fatal,
    }
}

/// Leading numeric groups of a server version string, `8.0.36-log` gives `(8, 0, 36)`.
pub fn parse_version(version: &str) -> Result<(u16, u16, u16)> {
    let mut parts = version.trim().split('.');
    let mut next = || parts.next().and_then(leading_number);
    match (next(), next(), next()) {
        (Some(major), Some(minor), patch) => Ok((major, minor, patch.unwrap_or(0))),
        _ => Err(Error::msg(format!(
            "Cannot read the server version from `{}`",
            version
        ))),
    }
}

async fn fetch_text<E: Executor>(executor: &mut E, sql: &'static str) -> Result<Option<String>> {
    let row = executor
        .fetch_optional(Query::new(sql))
        .await
        .with_context(|| format!("While inspecting the server with `{}`", sql))?;
    Ok(row.and_then(|v| v.get(0).and_then(Value::as_str).map(str::to_owned)))
}

/// Reads the version and the selected schema of the server behind `executor`.
pub async fn inspect_server<E: Executor>(executor: &mut E) -> Result<ServerState> {
    let version = fetch_text(executor, "SELECT version()")
        .await?
        .ok_or_else(|| Error::msg("The server did not report its version"))?;
    let version = parse_version(&version)?;
    let schema = fetch_text(executor, "SELECT database()").await?;
    let max_time_precision = if version >= FRACTIONAL_SECONDS_VERSION {
        6
    } else {
        MYSQL_DIALECT.max_time_precision
    };
    Ok(ServerState {
        version,
        schema,
        max_time_precision,
    })
}
