//! Connection resolution across deployment topologies
//!
//! The connector walks an ordered list of [`ConnectionMode`]s and returns a
//! handle for the first one that both opens and answers a listing call.
//! Constructing a client proves nothing about reachability, so every mode
//! is validated before it is accepted.

use crate::embedded::EmbeddedStore;
use crate::error::{Error, ModeFailure, Result, StoreResult};
use crate::models::ConnectionMode;
use crate::remote::RemoteStore;
use crate::store::{StoreHandle, VectorStore};

/// StoreOpener constructs a backend for a connection mode
#[async_trait::async_trait]
pub trait StoreOpener: Send + Sync {
    async fn open(&self, mode: &ConnectionMode) -> StoreResult<Box<dyn VectorStore>>;
}

/// Opens the real backends: `RemoteStore` for networked, `EmbeddedStore` for embedded
#[derive(Debug, Default, Clone, Copy)]
pub struct BackendOpener;

#[async_trait::async_trait]
impl StoreOpener for BackendOpener {
    async fn open(&self, mode: &ConnectionMode) -> StoreResult<Box<dyn VectorStore>> {
        match mode {
            ConnectionMode::Networked { host, port } => {
                Ok(Box::new(RemoteStore::from_host(host, *port)?))
            }
            ConnectionMode::Embedded { path } => Ok(Box::new(EmbeddedStore::open(path).await?)),
        }
    }
}

pub struct Connector<O = BackendOpener> {
    opener: O,
}

impl Connector<BackendOpener> {
    pub fn new() -> Self {
        Self {
            opener: BackendOpener,
        }
    }
}

impl Default for Connector<BackendOpener> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: StoreOpener> Connector<O> {
    pub fn with_opener(opener: O) -> Self {
        Self { opener }
    }

    /// Resolve one live handle, trying `modes` in order
    pub async fn acquire(&self, modes: &[ConnectionMode]) -> Result<StoreHandle> {
        if modes.is_empty() {
            return Err(Error::NoConnectionModes);
        }

        let mut failures = Vec::new();

        for mode in modes {
            tracing::info!("Connecting to vector store: {}", mode);

            match self.try_mode(mode).await {
                Ok((store, count)) => {
                    tracing::info!("✓ Connected via {} ({} collections)", mode, count);
                    return Ok(StoreHandle::new(store, mode.clone(), failures));
                }
                Err(e) => {
                    tracing::warn!("✗ {} unavailable: {}", mode, e);
                    failures.push(ModeFailure {
                        mode: mode.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::error!("All {} connection modes failed", failures.len());
        Err(Error::StoreUnavailable(failures))
    }

    async fn try_mode(&self, mode: &ConnectionMode) -> StoreResult<(Box<dyn VectorStore>, usize)> {
        let store = self.opener.open(mode).await?;
        let collections = store.list_collections().await?;
        Ok((store, collections.len()))
    }
}

/// Resolve a handle with the real backends
pub async fn acquire_store(modes: &[ConnectionMode]) -> Result<StoreHandle> {
    Connector::new().acquire(modes).await
}
