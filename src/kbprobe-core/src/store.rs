use crate::error::{ModeFailure, StoreResult};
use crate::models::{CollectionInfo, ConnectionMode, PointId, ScrollPage, VectorParams};

/// VectorStore is the capability every backend exposes
#[async_trait::async_trait]
pub trait VectorStore: Send + Sync {
    /// Names of all collections known to the store
    async fn list_collections(&self) -> StoreResult<Vec<String>>;

    /// Create a collection; fails with `CollectionExists` if the name is taken
    async fn create_collection(&self, name: &str, vectors: VectorParams) -> StoreResult<()>;

    /// Schema and size of an existing collection
    async fn collection_info(&self, name: &str) -> StoreResult<CollectionInfo>;

    /// One page of records with payloads; `offset` is the first id to return
    async fn scroll(
        &self,
        name: &str,
        limit: usize,
        offset: Option<PointId>,
    ) -> StoreResult<ScrollPage>;

    /// Short backend label for logs
    fn backend(&self) -> &'static str;
}

/// StoreHandle is the one live session to the vector store for a run.
///
/// Created by the connector and passed explicitly to every consumer.
/// Dropping it releases the underlying client or connection pool.
pub struct StoreHandle {
    store: Box<dyn VectorStore>,
    mode: ConnectionMode,
    skipped: Vec<ModeFailure>,
}

impl StoreHandle {
    pub(crate) fn new(
        store: Box<dyn VectorStore>,
        mode: ConnectionMode,
        skipped: Vec<ModeFailure>,
    ) -> Self {
        Self {
            store,
            mode,
            skipped,
        }
    }

    /// The mode this handle is bound to
    pub fn mode(&self) -> &ConnectionMode {
        &self.mode
    }

    /// Modes tried and rejected before this one
    pub fn skipped(&self) -> &[ModeFailure] {
        &self.skipped
    }
}

impl std::fmt::Debug for StoreHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreHandle")
            .field("backend", &self.store.backend())
            .field("mode", &self.mode)
            .field("skipped", &self.skipped)
            .finish()
    }
}

#[async_trait::async_trait]
impl VectorStore for StoreHandle {
    async fn list_collections(&self) -> StoreResult<Vec<String>> {
        self.store.list_collections().await
    }

    async fn create_collection(&self, name: &str, vectors: VectorParams) -> StoreResult<()> {
        self.store.create_collection(name, vectors).await
    }

    async fn collection_info(&self, name: &str) -> StoreResult<CollectionInfo> {
        self.store.collection_info(name).await
    }

    async fn scroll(
        &self,
        name: &str,
        limit: usize,
        offset: Option<PointId>,
    ) -> StoreResult<ScrollPage> {
        self.store.scroll(name, limit, offset).await
    }

    fn backend(&self) -> &'static str {
        self.store.backend()
    }
}
