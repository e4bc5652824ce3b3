use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use sqlx::Row;
use std::path::{Path, PathBuf};

use crate::error::{StoreError, StoreResult};
use crate::models::{CollectionInfo, Distance, PointId, Record, ScrollPage, VectorParams};
use crate::store::VectorStore;

const DB_FILE: &str = "storage.db";

/// Embedded vector store backed by SQLite files under a local directory
pub struct EmbeddedStore {
    path: PathBuf,
    pool: SqlitePool,
}

impl EmbeddedStore {
    /// Open (or create) the store rooted at `path`
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&path).await?;

        let options = SqliteConnectOptions::new()
            .filename(path.join(DB_FILE))
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePool::connect_with(options).await?;

        let store = Self { path, pool };
        store.ensure_schema().await?;

        tracing::debug!("Embedded store opened at {}", store.path.display());
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn ensure_schema(&self) -> StoreResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS collections (
                name TEXT PRIMARY KEY,
                vector_size INTEGER NOT NULL,
                distance TEXT NOT NULL,
                created_at DATETIME NOT NULL
            )
        "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS points (
                collection TEXT NOT NULL,
                id TEXT NOT NULL,
                payload TEXT NOT NULL DEFAULT '{}',
                created_at DATETIME NOT NULL,
                PRIMARY KEY (collection, id),
                FOREIGN KEY (collection) REFERENCES collections(name) ON DELETE CASCADE
            )
        "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn require_collection(&self, name: &str) -> StoreResult<(i64, String)> {
        let row = sqlx::query("SELECT vector_size, distance FROM collections WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::CollectionNotFound(name.to_string()))?;

        Ok((row.get("vector_size"), row.get("distance")))
    }
}

#[async_trait::async_trait]
impl VectorStore for EmbeddedStore {
    async fn list_collections(&self) -> StoreResult<Vec<String>> {
        let rows = sqlx::query("SELECT name FROM collections ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(|row| row.get("name")).collect())
    }

    async fn create_collection(&self, name: &str, vectors: VectorParams) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO collections (name, vector_size, distance, created_at)
            VALUES (?, ?, ?, ?)
        "#,
        )
        .bind(name)
        .bind(vectors.size as i64)
        .bind(vectors.distance.as_str())
        .bind(Utc::now())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(StoreError::CollectionExists(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn collection_info(&self, name: &str) -> StoreResult<CollectionInfo> {
        let (size, distance) = self.require_collection(name).await?;

        let points_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM points WHERE collection = ?")
                .bind(name)
                .fetch_one(&self.pool)
                .await?;

        let distance: Distance = distance
            .parse()
            .map_err(|_| StoreError::InvalidResponse)?;

        Ok(CollectionInfo {
            name: name.to_string(),
            vectors: VectorParams {
                size: size as u64,
                distance,
            },
            points_count: points_count as u64,
        })
    }

    async fn scroll(
        &self,
        name: &str,
        limit: usize,
        offset: Option<PointId>,
    ) -> StoreResult<ScrollPage> {
        self.require_collection(name).await?;

        let start = match offset {
            Some(id) => {
                let key = serde_json::to_string(&id)?;
                let rowid: Option<i64> = sqlx::query_scalar(
                    "SELECT rowid FROM points WHERE collection = ? AND id = ?",
                )
                .bind(name)
                .bind(&key)
                .fetch_optional(&self.pool)
                .await?;

                match rowid {
                    Some(rowid) => rowid,
                    None => return Ok(ScrollPage::default()),
                }
            }
            None => 0,
        };

        // One extra row tells us where the next page starts
        let rows = sqlx::query(
            r#"
            SELECT id, payload FROM points
            WHERE collection = ? AND rowid >= ?
            ORDER BY rowid ASC
            LIMIT ?
        "#,
        )
        .bind(name)
        .bind(start)
        .bind(limit as i64 + 1)
        .fetch_all(&self.pool)
        .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let id: String = row.get("id");
            let payload: String = row.get("payload");
            records.push(Record {
                id: serde_json::from_str(&id)?,
                payload: serde_json::from_str(&payload)?,
            });
        }

        let next_offset = if records.len() > limit {
            records.pop().map(|r| r.id)
        } else {
            None
        };

        Ok(ScrollPage {
            records,
            next_offset,
        })
    }

    fn backend(&self) -> &'static str {
        "embedded"
    }
}
