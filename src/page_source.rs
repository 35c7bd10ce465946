use html_tables_to_csv::{Document, parse_url};
use worker::Fetch;

use crate::error::ApiError;

/// Downloads `raw_url` and decodes it using the response charset.
pub async fn fetch_document(raw_url: &str) -> Result<Document, ApiError> {
    let url = parse_url(raw_url)?;
    let mut response = Fetch::Url(url.clone())
        .send()
        .await
        .map_err(|error| ApiError::Upstream(format!("failed to fetch {url}: {error}")))?;

    let status = response.status_code();
    if status >= 400 {
        return Err(ApiError::Upstream(format!(
            "failed to fetch {url}: status {status}"
        )));
    }

    let content_type = response.headers().get("Content-Type")?;
    let body = response.bytes().await?;
    worker::console_log!("fetched {url}: status={status}, bytes={}", body.len());

    Ok(Document::from_bytes(url, &body, content_type.as_deref()))
}
