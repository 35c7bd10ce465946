use url::Url;

use crate::error::ExtractError;
use crate::model::FetchedPage;

/// Retrieves the raw bytes of a page.
pub trait Fetcher {
    fn fetch(&self, url: &Url) -> Result<FetchedPage, ExtractError>;
}

#[cfg(feature = "fetch")]
pub use blocking::{DEFAULT_TIMEOUT, HttpFetcher};

#[cfg(feature = "fetch")]
mod blocking {
    use std::time::Duration;

    use reqwest::blocking::Client;
    use reqwest::header::CONTENT_TYPE;
    use tracing::info;
    use url::Url;

    use super::Fetcher;
    use crate::error::ExtractError;
    use crate::model::FetchedPage;

    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
    const USER_AGENT: &str = concat!("html-tables-to-csv/", env!("CARGO_PKG_VERSION"));

    /// Blocking HTTP GET fetcher.
    #[derive(Debug, Clone)]
    pub struct HttpFetcher {
        client: Client,
    }

    impl HttpFetcher {
        pub fn new(timeout: Duration) -> Result<Self, ExtractError> {
            let client = Client::builder()
                .user_agent(USER_AGENT)
                .timeout(timeout)
                .build()
                .map_err(|error| ExtractError::HttpClient(error.to_string()))?;
            Ok(Self { client })
        }
    }

    impl Fetcher for HttpFetcher {
        fn fetch(&self, url: &Url) -> Result<FetchedPage, ExtractError> {
            let fetch_error = |reason: String| ExtractError::Fetch {
                url: url.to_string(),
                reason,
            };

            info!(%url, "fetching page");
            let response = self
                .client
                .get(url.as_str())
                .send()
                .map_err(|error| fetch_error(error.to_string()))?;

            let status = response.status();
            if status.is_client_error() || status.is_server_error() {
                return Err(fetch_error(format!("status {}", status.as_u16())));
            }

            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string);
            let body = response
                .bytes()
                .map_err(|error| fetch_error(error.to_string()))?
                .to_vec();

            Ok(FetchedPage { body, content_type })
        }
    }
}
