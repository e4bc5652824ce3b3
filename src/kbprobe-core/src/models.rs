use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// ConnectionMode describes one way of reaching the vector store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionMode {
    /// Separate service reachable over host/port
    Networked { host: String, port: u16 },
    /// In-process store backed by a local directory
    Embedded { path: PathBuf },
}

impl ConnectionMode {
    pub fn networked(host: impl Into<String>, port: u16) -> Self {
        Self::Networked {
            host: host.into(),
            port,
        }
    }

    pub fn embedded(path: impl Into<PathBuf>) -> Self {
        Self::Embedded { path: path.into() }
    }

    pub fn kind(&self) -> ModeKind {
        match self {
            Self::Networked { .. } => ModeKind::Networked,
            Self::Embedded { .. } => ModeKind::Embedded,
        }
    }
}

impl fmt::Display for ConnectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Networked { host, port } => write!(f, "networked ({}:{})", host, port),
            Self::Embedded { path } => write!(f, "embedded ({})", path.display()),
        }
    }
}

/// ModeKind names a connection mode without its coordinates (used for ordering)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ModeKind {
    Networked,
    Embedded,
}

/// Distance is the similarity metric of a collection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Distance {
    #[default]
    #[serde(alias = "cosine")]
    Cosine,
    #[serde(alias = "euclid", alias = "euclidean")]
    Euclid,
    #[serde(alias = "dot")]
    Dot,
    #[serde(alias = "manhattan")]
    Manhattan,
}

impl Distance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cosine => "Cosine",
            Self::Euclid => "Euclid",
            Self::Dot => "Dot",
            Self::Manhattan => "Manhattan",
        }
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Distance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cosine" => Ok(Self::Cosine),
            "euclid" | "euclidean" => Ok(Self::Euclid),
            "dot" => Ok(Self::Dot),
            "manhattan" => Ok(Self::Manhattan),
            other => Err(format!("unknown distance: {}", other)),
        }
    }
}

/// VectorParams is the vector schema of a collection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct VectorParams {
    pub size: u64,
    pub distance: Distance,
}

/// CollectionSpec is the collection the initializer ensures
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CollectionSpec {
    pub name: String,
    #[serde(default = "default_vector_size")]
    pub vector_size: u64,
    #[serde(default)]
    pub distance: Distance,
}

pub(crate) fn default_vector_size() -> u64 {
    384
}

impl CollectionSpec {
    /// Spec with the default schema (384 dimensions, cosine)
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vector_size: default_vector_size(),
            distance: Distance::Cosine,
        }
    }

    pub fn with_vectors(mut self, size: u64, distance: Distance) -> Self {
        self.vector_size = size;
        self.distance = distance;
        self
    }

    pub fn vector_params(&self) -> VectorParams {
        VectorParams {
            size: self.vector_size,
            distance: self.distance,
        }
    }
}

/// CollectionInfo describes an existing collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CollectionInfo {
    pub name: String,
    pub vectors: VectorParams,
    pub points_count: u64,
}

/// PointId identifies a stored record (numeric or UUID string)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum PointId {
    Num(u64),
    Uuid(String),
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(n) => write!(f, "{}", n),
            Self::Uuid(s) => f.write_str(s),
        }
    }
}

impl From<u64> for PointId {
    fn from(n: u64) -> Self {
        Self::Num(n)
    }
}

impl From<&str> for PointId {
    fn from(s: &str) -> Self {
        Self::Uuid(s.to_string())
    }
}

/// Record is a stored item with its key-value payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    pub id: PointId,
    #[serde(default)]
    pub payload: serde_json::Map<String, serde_json::Value>,
}

/// ScrollPage is one bounded page of records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrollPage {
    pub records: Vec<Record>,
    /// First id of the following page, None when exhausted
    pub next_offset: Option<PointId>,
}
