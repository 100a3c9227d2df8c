//! # stela-storage
//!
//! Object store implementations behind the [`ObjectStore`] trait from
//! `stela-core`, plus object key derivation and the provider factory.

pub mod key;
pub mod providers;

use std::sync::Arc;

use stela_core::config::storage::StorageConfig;
use stela_core::error::AppError;
use stela_core::result::AppResult;
use stela_core::traits::storage::ObjectStore;

use crate::providers::local::LocalObjectStore;

/// Build the configured object store provider.
pub async fn build_object_store(config: &StorageConfig) -> AppResult<Arc<dyn ObjectStore>> {
    match config.provider.as_str() {
        "local" => {
            let store =
                LocalObjectStore::new(&config.local.root_path, &config.public_url_base).await?;
            Ok(Arc::new(store))
        }
        #[cfg(feature = "s3")]
        "s3" => {
            let store =
                providers::s3::S3ObjectStore::new(&config.s3, &config.public_url_base).await?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "s3"))]
        "s3" => Err(AppError::configuration(
            "Storage provider 's3' requires the `s3` feature",
        )),
        other => Err(AppError::configuration(format!(
            "Unknown storage provider: {other}"
        ))),
    }
}
