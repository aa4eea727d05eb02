use crate::{Connection, Driver, Error, ErrorClass, ErrorContext, Result, ServerState};
use futures::future::BoxFuture;
use std::{
    collections::HashMap,
    fmt::{self, Display},
    ops::{Deref, DerefMut},
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Identity under which at most one physical connection is held.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PoolKey {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub database: Option<String>,
}

impl Display for PoolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}:{}", self.user, self.host, self.port)?;
        if let Some(database) = &self.database {
            write!(f, "/{}", database)?;
        }
        Ok(())
    }
}

struct Held<C> {
    connection: C,
    state: ServerState,
}

struct PoolEntry<D: Driver> {
    held: Option<Held<D::Connection>>,
    /// Configuration of the first successful open, already merged with the driver defaults.
    config: Option<D::Config>,
}

impl<D: Driver> Default for PoolEntry<D> {
    fn default() -> Self {
        Self {
            held: None,
            config: None,
        }
    }
}

/// Exclusive access to the connection held for one key.
///
/// Other callers of the same key wait until this guard is dropped.
pub struct PooledConnection<D: Driver> {
    key: PoolKey,
    guard: OwnedMutexGuard<PoolEntry<D>>,
}

impl<D: Driver> PooledConnection<D> {
    pub fn key(&self) -> &PoolKey {
        &self.key
    }

    pub fn server_state(&self) -> &ServerState {
        &self.held().state
    }

    fn held(&self) -> &Held<D::Connection> {
        self.guard
            .held
            .as_ref()
            .expect("A pooled connection always holds an open connection")
    }
}

impl<D: Driver> Deref for PooledConnection<D> {
    type Target = D::Connection;

    fn deref(&self) -> &Self::Target {
        &self.held().connection
    }
}

impl<D: Driver> DerefMut for PooledConnection<D> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self
            .guard
            .held
            .as_mut()
            .expect("A pooled connection always holds an open connection")
            .connection
    }
}

/// Lazily opened connections, one per [`PoolKey`].
///
/// Statements on one key are serialized, callers needing parallelism use
/// distinct keys.
pub struct Pool<D: Driver> {
    driver: D,
    entries: Mutex<HashMap<PoolKey, Arc<AsyncMutex<PoolEntry<D>>>>>,
    open: AtomicUsize,
}

impl<D: Driver> Pool<D> {
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            entries: Default::default(),
            open: AtomicUsize::new(0),
        }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    fn entry(&self, key: &PoolKey) -> Result<Arc<AsyncMutex<PoolEntry<D>>>> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| Error::msg("The connection pool index is poisoned"))?;
        Ok(entries.entry(key.clone()).or_default().clone())
    }

    /// Returns the connection held for `key`, opening it first when there is none.
    ///
    /// `config` is kept once a connection opens with it, reconnections reuse
    /// it. A key that never connected tries the `config` of each acquire.
    pub async fn acquire(
        &self,
        key: &PoolKey,
        config: &D::Config,
    ) -> Result<PooledConnection<D>> {
        let entry = self.entry(key)?;
        let mut connection = PooledConnection {
            key: key.clone(),
            guard: entry.lock_owned().await,
        };
        if connection.guard.held.is_none() {
            let config = match &connection.guard.config {
                Some(v) => v.clone(),
                None => self.driver.merge_defaults(config),
            };
            self.open(&mut connection, config).await?;
        }
        Ok(connection)
    }

    async fn open(&self, connection: &mut PooledConnection<D>, config: D::Config) -> Result<()> {
        let context = || format!("While connecting to {}", connection.key);
        let result = async {
            let mut physical = self.driver.connect(&config).await?;
            let state = self.driver.setup(&mut physical).await?;
            Ok::<_, Error>(Held {
                connection: physical,
                state,
            })
        }
        .await
        .with_context(context);
        match result {
            Ok(held) => {
                log::info!(
                    "Connected to {} through {} ({})",
                    connection.key,
                    D::NAME,
                    held.state
                );
                connection.guard.held = Some(held);
                connection.guard.config = Some(config);
                self.open.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(e) => {
                log::error!("{:#}", e);
                Err(e)
            }
        }
    }

    /// Runs `operation` on the connection of `key`.
    ///
    /// When the failure classifies as [`ErrorClass::Reconnect`] the connection
    /// is discarded, a fresh one is opened and the operation is retried once.
    /// Any other failure, or a failure of the retry, propagates unchanged.
    pub async fn run<T, F>(
        &self,
        key: &PoolKey,
        config: &D::Config,
        mut operation: F,
    ) -> Result<T>
    where
        F: for<'c> FnMut(&'c mut D::Connection) -> BoxFuture<'c, Result<T>>,
    {
        let mut connection = self.acquire(key, config).await?;
        let error = match operation(&mut *connection).await {
            Ok(v) => return Ok(v),
            Err(e) => e,
        };
        if self.driver.classify(&error) != ErrorClass::Reconnect {
            return Err(error);
        }
        log::warn!(
            "Lost the connection to {}, reconnecting once: {:#}",
            connection.key,
            error
        );
        self.discard(&mut connection);
        let config = connection
            .guard
            .config
            .clone()
            .ok_or_else(|| Error::msg("The pool entry has no configuration"))?;
        self.open(&mut connection, config).await?;
        let result = operation(&mut *connection).await;
        result.map_err(|e| {
            if self.driver.classify(&e) == ErrorClass::Reconnect {
                self.discard(&mut connection);
            }
            log::error!("{:#}", e);
            e
        })
    }

    /// Drops the physical connection without closing it, the next acquire opens a new one.
    fn discard(&self, connection: &mut PooledConnection<D>) {
        if connection.guard.held.take().is_some() {
            self.open.fetch_sub(1, Ordering::Relaxed);
            log::debug!("Discarded the connection to {}", connection.key);
        }
    }

    /// Closes the connection of `key`, if any. The next acquire reconnects.
    pub async fn release(&self, key: &PoolKey) -> Result<()> {
        let entry = {
            let mut entries = self
                .entries
                .lock()
                .map_err(|_| Error::msg("The connection pool index is poisoned"))?;
            entries.remove(key)
        };
        match entry {
            Some(entry) => self.close(key, entry).await,
            None => Ok(()),
        }
    }

    /// Closes every held connection, reporting the first failure after trying all of them.
    pub async fn shutdown(&self) -> Result<()> {
        let entries: Vec<_> = {
            let mut entries = self
                .entries
                .lock()
                .map_err(|_| Error::msg("The connection pool index is poisoned"))?;
            entries.drain().collect()
        };
        let mut result = Ok(());
        for (key, entry) in entries {
            if let Err(e) = self.close(&key, entry).await {
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }
        result
    }

    async fn close(&self, key: &PoolKey, entry: Arc<AsyncMutex<PoolEntry<D>>>) -> Result<()> {
        let held = entry.lock().await.held.take();
        let Some(held) = held else {
            return Ok(());
        };
        self.open.fetch_sub(1, Ordering::Relaxed);
        held.connection
            .disconnect()
            .await
            .with_context(|| format!("While disconnecting from {}", key))
            .map_err(|e| {
                log::error!("{:#}", e);
                e
            })
    }

    /// Number of keys currently holding an open connection.
    ///
    /// Connections still being opened are not counted.
    pub fn open_connections(&self) -> usize {
        self.open.load(Ordering::Relaxed)
    }
}
