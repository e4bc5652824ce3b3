//! In-memory test doubles for the store and opener seams

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::connector::StoreOpener;
use crate::error::{StoreError, StoreResult};
use crate::models::{CollectionInfo, ConnectionMode, PointId, Record, ScrollPage, VectorParams};
use crate::store::VectorStore;

/// Vector store kept in memory, with call counters and injectable failures
#[derive(Default)]
pub(crate) struct MemoryStore {
    collections: Mutex<Vec<(String, VectorParams, Vec<Record>)>>,
    list_calls: Arc<AtomicUsize>,
    create_calls: Arc<AtomicUsize>,
    fail_list: bool,
    fail_create: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_list(mut self) -> Self {
        self.fail_list = true;
        self
    }

    pub fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    pub fn with_records(self, name: &str, vectors: VectorParams, records: Vec<Record>) -> Self {
        self.collections
            .lock()
            .unwrap()
            .push((name.to_string(), vectors, records));
        self
    }

    pub fn list_calls(&self) -> Arc<AtomicUsize> {
        self.list_calls.clone()
    }

    pub fn create_calls(&self) -> Arc<AtomicUsize> {
        self.create_calls.clone()
    }
}

fn transport_error() -> StoreError {
    StoreError::Io(io::Error::new(
        io::ErrorKind::ConnectionRefused,
        "connection refused",
    ))
}

#[async_trait::async_trait]
impl VectorStore for MemoryStore {
    async fn list_collections(&self) -> StoreResult<Vec<String>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list {
            return Err(transport_error());
        }
        let collections = self.collections.lock().unwrap();
        Ok(collections.iter().map(|(name, _, _)| name.clone()).collect())
    }

    async fn create_collection(&self, name: &str, vectors: VectorParams) -> StoreResult<()> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_create {
            return Err(StoreError::Server {
                status: 500,
                message: "disk full".to_string(),
            });
        }
        let mut collections = self.collections.lock().unwrap();
        if collections.iter().any(|(n, _, _)| n == name) {
            return Err(StoreError::CollectionExists(name.to_string()));
        }
        collections.push((name.to_string(), vectors, Vec::new()));
        Ok(())
    }

    async fn collection_info(&self, name: &str) -> StoreResult<CollectionInfo> {
        let collections = self.collections.lock().unwrap();
        collections
            .iter()
            .find(|(n, _, _)| n == name)
            .map(|(n, vectors, records)| CollectionInfo {
                name: n.clone(),
                vectors: *vectors,
                points_count: records.len() as u64,
            })
            .ok_or_else(|| StoreError::CollectionNotFound(name.to_string()))
    }

    async fn scroll(
        &self,
        name: &str,
        limit: usize,
        offset: Option<PointId>,
    ) -> StoreResult<ScrollPage> {
        let collections = self.collections.lock().unwrap();
        let (_, _, records) = collections
            .iter()
            .find(|(n, _, _)| n == name)
            .ok_or_else(|| StoreError::CollectionNotFound(name.to_string()))?;

        let start = match offset {
            Some(id) => records.iter().position(|r| r.id == id).unwrap_or(records.len()),
            None => 0,
        };
        let rest = &records[start..];
        Ok(ScrollPage {
            records: rest.iter().take(limit).cloned().collect(),
            next_offset: rest.get(limit).map(|r| r.id.clone()),
        })
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

/// Opener that succeeds only for scripted modes
pub(crate) struct ScriptedOpener {
    reachable: Vec<ConnectionMode>,
    stores: Mutex<Vec<(ConnectionMode, MemoryStore)>>,
    attempts: AtomicUsize,
}

impl ScriptedOpener {
    pub fn reachable(modes: impl IntoIterator<Item = ConnectionMode>) -> Self {
        Self {
            reachable: modes.into_iter().collect(),
            stores: Mutex::new(Vec::new()),
            attempts: AtomicUsize::new(0),
        }
    }

    pub fn unreachable() -> Self {
        Self::reachable(Vec::<ConnectionMode>::new())
    }

    /// Serve `store` when `mode` is opened
    pub fn with_store(self, mode: ConnectionMode, store: MemoryStore) -> Self {
        self.stores.lock().unwrap().push((mode, store));
        self
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl StoreOpener for ScriptedOpener {
    async fn open(&self, mode: &ConnectionMode) -> StoreResult<Box<dyn VectorStore>> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        let mut stores = self.stores.lock().unwrap();
        if let Some(pos) = stores.iter().position(|(m, _)| m == mode) {
            let (_, store) = stores.remove(pos);
            return Ok(Box::new(store));
        }

        if self.reachable.contains(mode) {
            Ok(Box::new(MemoryStore::new()))
        } else {
            Err(transport_error())
        }
    }
}
