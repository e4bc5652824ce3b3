use crate::error::{Error, Result};
use crate::models::CollectionSpec;
use crate::store::VectorStore;

/// EnsureOutcome is the result of one `ensure_collection` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnsureOutcome {
    AlreadyExists,
    Created,
    /// Creation was attempted and rejected; safe to re-run
    Failed(String),
}

impl EnsureOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Make sure `spec.name` exists, creating it with the spec's vector schema if absent.
///
/// An existing collection is left untouched, whatever its schema. A listing
/// failure is returned as `Error::List` and no creation is attempted.
pub async fn ensure_collection<S>(store: &S, spec: &CollectionSpec) -> Result<EnsureOutcome>
where
    S: VectorStore + ?Sized,
{
    let existing = store.list_collections().await.map_err(Error::List)?;

    if existing.iter().any(|name| name == &spec.name) {
        tracing::info!("Collection '{}' already exists", spec.name);
        return Ok(EnsureOutcome::AlreadyExists);
    }

    tracing::info!(
        "Creating collection '{}' (size={}, distance={})",
        spec.name,
        spec.vector_size,
        spec.distance
    );

    match store.create_collection(&spec.name, spec.vector_params()).await {
        Ok(()) => {
            tracing::info!("✓ Collection '{}' created", spec.name);
            Ok(EnsureOutcome::Created)
        }
        Err(e) => {
            tracing::error!("Failed to create collection '{}': {}", spec.name, e);
            Ok(EnsureOutcome::Failed(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedded::EmbeddedStore;
    use crate::models::{Distance, VectorParams};
    use crate::testing::MemoryStore;
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn test_created_then_already_exists() {
        let store = MemoryStore::new();
        let creates = store.create_calls();
        let spec = CollectionSpec::new("kb");

        assert_eq!(
            ensure_collection(&store, &spec).await.unwrap(),
            EnsureOutcome::Created
        );
        assert_eq!(
            ensure_collection(&store, &spec).await.unwrap(),
            EnsureOutcome::AlreadyExists
        );
        assert_eq!(creates.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_existing_collection_is_never_recreated() {
        let other = VectorParams {
            size: 768,
            distance: Distance::Dot,
        };
        let store = MemoryStore::new().with_records("kb", other, Vec::new());
        let creates = store.create_calls();

        let outcome = ensure_collection(&store, &CollectionSpec::new("kb")).await.unwrap();

        assert_eq!(outcome, EnsureOutcome::AlreadyExists);
        assert_eq!(creates.load(Ordering::SeqCst), 0);
        // Mismatched schema is left alone
        assert_eq!(store.collection_info("kb").await.unwrap().vectors, other);
    }

    #[tokio::test]
    async fn test_list_failure_is_fatal_and_skips_create() {
        let store = MemoryStore::new().failing_list();
        let creates = store.create_calls();

        let err = ensure_collection(&store, &CollectionSpec::new("kb"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::List(_)));
        assert_eq!(creates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_create_failure_is_reported_not_raised() {
        let store = MemoryStore::new().failing_create();

        let outcome = ensure_collection(&store, &CollectionSpec::new("kb")).await.unwrap();

        assert!(outcome.is_failed());
        match outcome {
            EnsureOutcome::Failed(reason) => assert!(reason.contains("disk full")),
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_embedded_store_gets_384_cosine() {
        let dir = tempfile::tempdir().unwrap();
        let store = EmbeddedStore::open(dir.path()).await.unwrap();
        let spec = CollectionSpec::new("kb");

        assert_eq!(
            ensure_collection(&store, &spec).await.unwrap(),
            EnsureOutcome::Created
        );

        assert_eq!(store.list_collections().await.unwrap(), vec!["kb"]);
        let info = store.collection_info("kb").await.unwrap();
        assert_eq!(info.vectors.size, 384);
        assert_eq!(info.vectors.distance, Distance::Cosine);

        assert_eq!(
            ensure_collection(&store, &spec).await.unwrap(),
            EnsureOutcome::AlreadyExists
        );
    }
}
