use reqwest::{Client as HttpClient, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};
use crate::models::{CollectionInfo, PointId, Record, ScrollPage, VectorParams};
use crate::store::VectorStore;

/// Vector store reached over the Qdrant-compatible REST API
pub struct RemoteStore {
    base_url: Url,
    client: HttpClient,
}

/// Every response wraps its payload in `result`
#[derive(Deserialize)]
struct Envelope<T> {
    result: T,
}

#[derive(Deserialize)]
struct CollectionsResult {
    collections: Vec<CollectionDescription>,
}

#[derive(Deserialize)]
struct CollectionDescription {
    name: String,
}

#[derive(Serialize)]
struct CreateCollectionRequest {
    vectors: VectorParams,
}

#[derive(Deserialize)]
struct CollectionInfoResult {
    #[serde(default)]
    points_count: Option<u64>,
    config: CollectionConfig,
}

#[derive(Deserialize)]
struct CollectionConfig {
    params: CollectionParams,
}

#[derive(Deserialize)]
struct CollectionParams {
    vectors: VectorParams,
}

#[derive(Serialize)]
struct ScrollRequest {
    limit: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<PointId>,
    with_payload: bool,
    with_vector: bool,
}

#[derive(Deserialize)]
struct ScrollResult {
    points: Vec<Record>,
    #[serde(default)]
    next_page_offset: Option<PointId>,
}

impl RemoteStore {
    /// Create a client for the given base URL; no request is made
    pub fn new(base_url: impl Into<String>) -> StoreResult<Self> {
        let raw = base_url.into();
        let base_url =
            Url::parse(&raw).map_err(|e| StoreError::InvalidUrl(format!("{}: {}", raw, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(StoreError::InvalidUrl(raw));
        }
        let client = HttpClient::builder().build()?;
        Ok(Self { base_url, client })
    }

    pub fn from_host(host: &str, port: u16) -> StoreResult<Self> {
        Self::new(format!("http://{}:{}", host, port))
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Base URL extended by `segments`, each percent-encoded as a single path segment
    fn endpoint(&self, segments: &[&str]) -> StoreResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

async fn server_error(response: Response) -> StoreError {
    StoreError::Server {
        status: response.status().as_u16(),
        message: response.text().await.unwrap_or_default(),
    }
}

async fn parse<T: DeserializeOwned>(response: Response) -> StoreResult<T> {
    if !response.status().is_success() {
        return Err(server_error(response).await);
    }

    let body = response.bytes().await?;
    let envelope: Envelope<T> = serde_json::from_slice(&body)?;
    Ok(envelope.result)
}

#[async_trait::async_trait]
impl VectorStore for RemoteStore {
    async fn list_collections(&self) -> StoreResult<Vec<String>> {
        let url = self.endpoint(&["collections"])?;
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let result: CollectionsResult = parse(response).await?;

        Ok(result.collections.into_iter().map(|c| c.name).collect())
    }

    async fn create_collection(&self, name: &str, vectors: VectorParams) -> StoreResult<()> {
        let url = self.endpoint(&["collections", name])?;
        tracing::debug!("PUT {} (size={}, distance={})", url, vectors.size, vectors.distance);

        let req = CreateCollectionRequest { vectors };
        let response = self.client.put(url).json(&req).send().await?;

        if response.status() == StatusCode::CONFLICT {
            return Err(StoreError::CollectionExists(name.to_string()));
        }

        let created: bool = parse(response).await?;
        if !created {
            return Err(StoreError::InvalidResponse);
        }

        Ok(())
    }

    async fn collection_info(&self, name: &str) -> StoreResult<CollectionInfo> {
        let url = self.endpoint(&["collections", name])?;
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::CollectionNotFound(name.to_string()));
        }

        let result: CollectionInfoResult = parse(response).await?;

        Ok(CollectionInfo {
            name: name.to_string(),
            vectors: result.config.params.vectors,
            points_count: result.points_count.unwrap_or(0),
        })
    }

    async fn scroll(
        &self,
        name: &str,
        limit: usize,
        offset: Option<PointId>,
    ) -> StoreResult<ScrollPage> {
        let url = self.endpoint(&["collections", name, "points", "scroll"])?;
        tracing::debug!("POST {} (limit={})", url, limit);

        let req = ScrollRequest {
            limit,
            offset,
            with_payload: true,
            with_vector: false,
        };
        let response = self.client.post(url).json(&req).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::CollectionNotFound(name.to_string()));
        }

        let result: ScrollResult = parse(response).await?;

        Ok(ScrollPage {
            records: result.points,
            next_offset: result.next_page_offset,
        })
    }

    fn backend(&self) -> &'static str {
        "networked"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let store = RemoteStore::new("http://localhost:6333/").unwrap();
        assert_eq!(store.base_url(), "http://localhost:6333");
        assert_eq!(
            store.endpoint(&["collections", "kb"]).unwrap().as_str(),
            "http://localhost:6333/collections/kb"
        );

        let store = RemoteStore::from_host("qdrant", 6334).unwrap();
        assert_eq!(store.base_url(), "http://qdrant:6334");
    }

    #[test]
    fn test_collection_names_are_single_encoded_segments() {
        let store = RemoteStore::new("http://localhost:6333").unwrap();

        let url = store.endpoint(&["collections", "kb#v2"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:6333/collections/kb%23v2");

        let url = store
            .endpoint(&["collections", "a/b?c", "points", "scroll"])
            .unwrap();
        assert_eq!(url.path(), "/collections/a%2Fb%3Fc/points/scroll");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_base_path_prefix_is_kept() {
        let store = RemoteStore::new("http://gateway:8080/qdrant/").unwrap();
        let url = store.endpoint(&["collections"]).unwrap();
        assert_eq!(url.as_str(), "http://gateway:8080/qdrant/collections");
    }

    #[test]
    fn test_invalid_base_url() {
        let err = RemoteStore::new("not a url").err().unwrap();
        assert!(matches!(err, StoreError::InvalidUrl(_)));
    }

    #[test]
    fn test_scroll_request_omits_missing_offset() {
        let req = ScrollRequest {
            limit: 5,
            offset: None,
            with_payload: true,
            with_vector: false,
        };
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"limit": 5, "with_payload": true, "with_vector": false})
        );
    }
}
