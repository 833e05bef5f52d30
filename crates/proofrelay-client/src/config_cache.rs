//! Client-side cache of the aggregator configuration, keyed by endpoint
//! through the caller's choice of cache path.

use std::fs;
use std::path::Path;

use proofrelay_primitives::AggregatorConfiguration;

use crate::api::AggregatorApi;
use crate::client::AggregatorClient;
use crate::error::{ClientError, Result};

/// Load the configuration from `cache_path`, or fetch it from the server
/// and persist it. A cache file that fails to parse is deleted and
/// refetched; it is never left in place. RPC failures propagate without
/// touching the cache.
pub async fn get_or_fetch_configuration<A: AggregatorApi>(
    client: &AggregatorClient<A>,
    cache_path: &Path,
) -> Result<AggregatorConfiguration> {
    if cache_path.exists() {
        match read_cached(cache_path) {
            Ok(config) => return Ok(config),
            Err(e) => {
                tracing::warn!(
                    "discarding corrupt configuration cache {}: {e}",
                    cache_path.display()
                );
                fs::remove_file(cache_path).map_err(|e| {
                    ClientError::ConfigError(format!(
                        "failed to remove corrupt cache {}: {e}",
                        cache_path.display()
                    ))
                })?;
            }
        }
    }

    let config = client.get_configuration().await?;
    let serialized = serde_json::to_string_pretty(&config)
        .map_err(|e| ClientError::ConfigError(e.to_string()))?;
    fs::write(cache_path, serialized).map_err(|e| {
        ClientError::ConfigError(format!(
            "failed to write configuration cache {}: {e}",
            cache_path.display()
        ))
    })?;
    tracing::info!("cached aggregator configuration at {}", cache_path.display());
    Ok(config)
}

fn read_cached(cache_path: &Path) -> Result<AggregatorConfiguration> {
    let contents = fs::read_to_string(cache_path)
        .map_err(|e| ClientError::ConfigError(e.to_string()))?;
    serde_json::from_str(&contents).map_err(|e| ClientError::ConfigError(e.to_string()))
}
