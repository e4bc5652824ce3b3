use serde::{Deserialize, Serialize};

use crate::models::{default_vector_size, CollectionSpec, ConnectionMode, Distance, ModeKind};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub connection: ConnectionConfig,

    #[serde(default)]
    pub collection: CollectionConfig,

    #[serde(default)]
    pub inspect: InspectConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConnectionConfig {
    /// Order in which deployment modes are tried
    #[serde(default = "default_order")]
    pub order: Vec<ModeKind>,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Local directory for the embedded store
    #[serde(default = "default_path")]
    pub path: String,
}

fn default_order() -> Vec<ModeKind> {
    vec![ModeKind::Networked, ModeKind::Embedded]
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    6333
}

fn default_path() -> String {
    "./qdrant_data".to_string()
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            order: default_order(),
            host: default_host(),
            port: default_port(),
            path: default_path(),
        }
    }
}

impl ConnectionConfig {
    /// Move `kind` to the front of the order, keeping the rest as configured
    pub fn prefer(&mut self, kind: ModeKind) {
        self.order.retain(|k| *k != kind);
        self.order.insert(0, kind);
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CollectionConfig {
    #[serde(default = "default_collection_name")]
    pub name: String,
    #[serde(default = "default_vector_size")]
    pub vector_size: u64,
    #[serde(default)]
    pub distance: Distance,
}

fn default_collection_name() -> String {
    "knowledge_base".to_string()
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            name: default_collection_name(),
            vector_size: default_vector_size(),
            distance: Distance::Cosine,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InspectConfig {
    /// Records fetched by `sample` when no limit is given
    #[serde(default = "default_sample_limit")]
    pub sample_limit: usize,
}

fn default_sample_limit() -> usize {
    5
}

impl Default for InspectConfig {
    fn default() -> Self {
        Self {
            sample_limit: default_sample_limit(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Candidate connection modes in configured order; a repeated kind keeps
    /// its first position
    pub fn connection_modes(&self) -> Vec<ConnectionMode> {
        let conn = &self.connection;
        let mut seen = Vec::with_capacity(conn.order.len());
        conn.order
            .iter()
            .filter(|kind| {
                if seen.contains(*kind) {
                    return false;
                }
                seen.push(**kind);
                true
            })
            .map(|kind| match kind {
                ModeKind::Networked => ConnectionMode::networked(conn.host.clone(), conn.port),
                ModeKind::Embedded => ConnectionMode::embedded(&conn.path),
            })
            .collect()
    }

    pub fn collection_spec(&self) -> CollectionSpec {
        CollectionSpec::new(self.collection.name.clone())
            .with_vectors(self.collection.vector_size, self.collection.distance)
    }
}
