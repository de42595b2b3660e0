use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Storage backend types
///
/// Selects where primary video uploads are written. It's defined in core because
/// it's used in configuration and by the storage factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    S3,
    Local,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "s3" => Ok(StorageBackend::S3),
            "local" => Ok(StorageBackend::Local),
            _ => Err(anyhow::anyhow!("Invalid storage backend: {}", s)),
        }
    }
}

impl Display for StorageBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StorageBackend::S3 => write!(f, "s3"),
            StorageBackend::Local => write!(f, "local"),
        }
    }
}

/// How uploaded bytes become a public reference.
///
/// `Inline` embeds the bytes as a data URI, `Filesystem` writes them under the asset
/// root with a deterministic name, `ObjectStore` writes them to the configured
/// storage backend under an orientation-prefixed key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementMode {
    Inline,
    Filesystem,
    ObjectStore,
}

impl FromStr for PlacementMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "inline" => Ok(PlacementMode::Inline),
            "filesystem" | "fs" => Ok(PlacementMode::Filesystem),
            "object_store" | "objectstore" | "s3" => Ok(PlacementMode::ObjectStore),
            _ => Err(anyhow::anyhow!("Invalid placement mode: {}", s)),
        }
    }
}

impl Display for PlacementMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            PlacementMode::Inline => write!(f, "inline"),
            PlacementMode::Filesystem => write!(f, "filesystem"),
            PlacementMode::ObjectStore => write!(f, "object_store"),
        }
    }
}
