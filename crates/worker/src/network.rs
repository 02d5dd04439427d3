//! Network access for cache misses and pre-caching

use reqwest::blocking::Client;
use std::time::Duration;
use url::Url;

use crate::cache::Response;
use crate::error::WorkerError;

pub trait Network {
    /// Fetch a same-origin path such as `/src/index.css`
    fn fetch(&self, path: &str) -> Result<Response, WorkerError>;
}

/// Blocking HTTP client bound to the site origin
pub struct HttpNetwork {
    origin: Url,
    client: Client,
}

impl HttpNetwork {
    pub fn new(origin: &str) -> Result<Self, WorkerError> {
        let origin = Url::parse(origin).map_err(|e| WorkerError::Url(format!("{}: {}", origin, e)))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| WorkerError::Network(e.to_string()))?;
        Ok(Self { origin, client })
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// Absolute URL for a request path
    pub fn resolve(&self, path: &str) -> Result<Url, WorkerError> {
        self.origin.join(path).map_err(|e| WorkerError::Url(format!("{}: {}", path, e)))
    }
}

impl Network for HttpNetwork {
    fn fetch(&self, path: &str) -> Result<Response, WorkerError> {
        let url = self.resolve(path)?;
        log::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| WorkerError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .map_err(|e| WorkerError::Network(e.to_string()))?
            .to_vec();

        Ok(Response { status, content_type, body })
    }
}
