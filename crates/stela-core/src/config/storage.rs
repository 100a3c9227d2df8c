//! Object storage and upload policy configuration.

use serde::{Deserialize, Serialize};

/// Top-level storage configuration.
///
/// The upload policy constants (accepted formats, maximum size) live here
/// rather than in code so that deployments can tune them without a rebuild.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage provider to use: `"local"` or `"s3"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Base URL under which stored objects are publicly retrievable.
    /// Object URLs are formed by joining this base with the object key.
    #[serde(default = "default_public_url_base")]
    pub public_url_base: String,
    /// Maximum upload size in bytes (default 100 MB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
    /// Accepted 3D asset file extensions (lowercase, without dot).
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
    /// Local filesystem storage configuration.
    #[serde(default)]
    pub local: LocalStorageConfig,
    /// S3-compatible storage configuration.
    #[serde(default)]
    pub s3: S3StorageConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            public_url_base: default_public_url_base(),
            max_upload_size_bytes: default_max_upload(),
            allowed_extensions: default_allowed_extensions(),
            local: LocalStorageConfig::default(),
            s3: S3StorageConfig::default(),
        }
    }
}

/// Local filesystem storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalStorageConfig {
    /// Root path for local object storage.
    #[serde(default = "default_local_root")]
    pub root_path: String,
}

impl Default for LocalStorageConfig {
    fn default() -> Self {
        Self {
            root_path: default_local_root(),
        }
    }
}

/// S3-compatible object storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct S3StorageConfig {
    /// S3 endpoint URL (for non-AWS services like MinIO). Empty uses AWS.
    #[serde(default)]
    pub endpoint: String,
    /// AWS region.
    #[serde(default = "default_region")]
    pub region: String,
    /// S3 bucket name.
    #[serde(default)]
    pub bucket: String,
}

impl StorageConfig {
    /// Whether the given file extension (lowercase, without dot) is accepted.
    pub fn accepts_extension(&self, ext: &str) -> bool {
        self.allowed_extensions.iter().any(|e| e == ext)
    }
}

fn default_provider() -> String {
    "local".to_string()
}

fn default_public_url_base() -> String {
    "http://localhost:8080/objects".to_string()
}

fn default_max_upload() -> u64 {
    104_857_600 // 100 MB
}

fn default_allowed_extensions() -> Vec<String> {
    ["glb", "gltf", "obj", "fbx", "usdz", "stl"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_local_root() -> String {
    "./data/objects".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}
