use crate::{Dialect, Error, Executor, Result, SqlWriter};
use std::{
    fmt::{self, Display},
    future::Future,
};

/// How a failure coming from the transport should be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The physical connection is dead, the operation may succeed on a fresh one.
    Reconnect,
    /// Propagate unchanged.
    Fatal,
}

/// Facts discovered once per physical connection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerState {
    pub version: (u16, u16, u16),
    /// Schema selected by the connection, if any.
    pub schema: Option<String>,
    /// Fractional seconds digits the server can store in time columns.
    pub max_time_precision: u8,
}

impl Display for ServerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (major, minor, patch) = self.version;
        write!(f, "version {major}.{minor}.{patch}")?;
        if let Some(schema) = &self.schema {
            write!(f, ", schema `{schema}`")?;
        }
        write!(f, ", time precision {}", self.max_time_precision)
    }
}

/// Prior state of foreign key enforcement, handed back when restoring it.
#[must_use = "the snapshot must be passed back to restore the constraint checks"]
#[derive(Debug, PartialEq, Eq)]
pub struct ConstraintSnapshot {
    was_active: bool,
}

impl ConstraintSnapshot {
    pub const fn new(was_active: bool) -> Self {
        Self { was_active }
    }
    pub const fn was_active(&self) -> bool {
        self.was_active
    }
}

/// A physical connection owned by the pool.
pub trait Connection: Executor + Sized + 'static {
    fn disconnect(self) -> impl Future<Output = Result<()>> + Send;
}

/// Entry point of a backend provider.
pub trait Driver: Send + Sync + 'static {
    type Connection: Connection;
    type Config: Clone + Send + Sync + 'static;
    type SqlWriter: SqlWriter;

    const NAME: &'static str;

    fn dialect(&self) -> &'static Dialect;

    fn sql_writer(&self) -> Self::SqlWriter;

    /// Fills in the provider defaults the caller left unspecified.
    fn merge_defaults(&self, config: &Self::Config) -> Self::Config {
        config.clone()
    }

    fn connect(
        &self,
        config: &Self::Config,
    ) -> impl Future<Output = Result<Self::Connection>> + Send;

    /// Probes a freshly opened connection.
    fn setup(
        &self,
        connection: &mut Self::Connection,
    ) -> impl Future<Output = Result<ServerState>> + Send;

    fn classify(&self, error: &Error) -> ErrorClass;
}
