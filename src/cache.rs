use worker::{Cache, Response};

use crate::error::ApiError;
use crate::models::{CSV_CONTENT_TYPE, TABLE_CACHE_KEY_PREFIX};

pub fn table_cache_key(filename: &str) -> String {
    format!("{TABLE_CACHE_KEY_PREFIX}{filename}")
}

fn cache_url(key: &str) -> String {
    format!("https://cache.local/{}", urlencoding::encode(key))
}

/// CSV bytes previously stored for `filename`, if still cached.
pub async fn load_table(filename: &str) -> Result<Option<Vec<u8>>, ApiError> {
    let cache = Cache::default();
    let mut cached = cache.get(cache_url(&table_cache_key(filename)), true).await?;

    let Some(mut response) = cached.take() else {
        return Ok(None);
    };

    Ok(Some(response.bytes().await?))
}

/// Stores a table under its file name; a later run for the same name wins.
pub async fn store_table(filename: &str, csv: &[u8], ttl_seconds: u32) -> Result<(), ApiError> {
    let mut response = Response::from_bytes(csv.to_vec())?;
    let headers = response.headers_mut();
    headers.set("Cache-Control", &format!("public, max-age={ttl_seconds}"))?;
    headers.set("Content-Type", CSV_CONTENT_TYPE)?;

    Cache::default()
        .put(cache_url(&table_cache_key(filename)), response)
        .await?;
    Ok(())
}
