use super::FetchError;
use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use url::Url;

/// Source of remote bytes
pub trait Fetcher: Send + Sync + 'static {
    fn fetch(&self, url: Url) -> impl Future<Output = Result<Vec<u8>, FetchError>> + Send;
}

/// Resolve `url` against `base`, or parse it as absolute when there is none
pub fn absolute_url(url: &str, base: Option<&Url>) -> Result<Url, FetchError> {
    let parsed = match base {
        Some(base) => base.join(url),
        None => Url::parse(url),
    };
    parsed.map_err(|source| FetchError::InvalidUrl {
        url: url.to_string(),
        source,
    })
}

/// `http`/`https` through reqwest, `file` from the host filesystem
pub struct HttpFetcher {
    http: Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            http: Client::new(),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }

    async fn fetch_http(&self, url: Url) -> Result<Vec<u8>, FetchError> {
        let response = self.http.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }

    async fn fetch_file(&self, url: Url) -> Result<Vec<u8>, FetchError> {
        let path = url
            .to_file_path()
            .map_err(|_| FetchError::UnsupportedScheme(url.to_string()))?;

        tokio::fs::read(&path).await.map_err(|source| FetchError::Io {
            url: url.to_string(),
            source,
        })
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: Url) -> Result<Vec<u8>, FetchError> {
        match url.scheme() {
            "http" | "https" => self.fetch_http(url).await,
            "file" => self.fetch_file(url).await,
            other => Err(FetchError::UnsupportedScheme(other.to_string())),
        }
    }
}
