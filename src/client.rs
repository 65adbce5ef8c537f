//! endoflife.date API client
//!
//! Every request goes through the cache first. A hit may be the exact
//! response or one extracted from a broader cached response; on a miss the
//! response is fetched, decoded and stored under its own key.

use crate::cache::{create_cache, Cache, CacheResult};
use crate::config::Config;
use crate::error::EolError;
use crate::models::{
    FullProductListResponse, IdentifierListResponse, ProductListResponse,
    ProductReleaseResponse, ProductResponse, UriListResponse,
};
use crate::version::{is_semantic_version, normalize_version};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Request timeout for API calls
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// User-Agent sent with every request
pub const USER_AGENT: &str = concat!("eol/", env!("CARGO_PKG_VERSION"));

/// Fetches JSON documents over the network
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `url` and decode the body as JSON
    async fn get_json(&self, url: &str) -> Result<Value>;
}

/// `reqwest`-backed transport
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_json(&self, url: &str) -> Result<Value> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(EolError::from)
            .with_context(|| format!("Request to {} failed", url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EolError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            }
            .into());
        }

        let body = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read response from {}", url))?;

        serde_json::from_slice(&body)
            .with_context(|| format!("Failed to decode response from {}", url))
    }
}

/// API client with a response cache in front of the transport
pub struct EolClient<T: Transport = HttpTransport> {
    base_url: Url,
    transport: T,
    cache: Arc<dyn Cache>,
}

impl EolClient<HttpTransport> {
    /// Build a client over HTTP from resolved configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut cache_config = config.cache.clone();
        cache_config.base_url = config.base_url.clone();

        Self::new(&config.base_url, HttpTransport::new()?, create_cache(cache_config))
    }
}

impl<T: Transport> EolClient<T> {
    pub fn new(base_url: &str, transport: T, cache: Arc<dyn Cache>) -> Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("Invalid base URL: {}", base_url))?;

        Ok(Self {
            base_url,
            transport,
            cache,
        })
    }

    pub fn cache(&self) -> &Arc<dyn Cache> {
        &self.cache
    }

    /// Absolute URL for an endpoint path
    pub fn build_url(&self, endpoint: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        if endpoint == "/" {
            return format!("{}/", base);
        }

        format!("{}/{}", base, endpoint.trim_start_matches('/'))
    }

    /// Cache-then-network request for one endpoint
    ///
    /// A cached payload that does not decode as `R` is ignored. A failure to
    /// store the fetched response is logged and does not fail the request.
    pub async fn request<R: DeserializeOwned>(&self, endpoint: &str, params: &[&str]) -> Result<R> {
        if let Some(response) = self.cached(endpoint, params) {
            return Ok(response);
        }

        let url = self.build_url(endpoint);
        let payload = self.transport.get_json(&url).await?;

        let response: R = serde_json::from_value(payload.clone())
            .with_context(|| format!("Unexpected response shape from {}", url))?;

        if let Err(e) = self.cache.put(endpoint, params, &payload) {
            warn!("Failed to cache {}: {:#}", endpoint, e);
        }

        Ok(response)
    }

    /// Cache lookup only, decoded as `R`
    fn cached<R: DeserializeOwned>(&self, endpoint: &str, params: &[&str]) -> Option<R> {
        let CacheResult::Hit(cached) = self.cache.get(endpoint, params) else {
            return None;
        };

        match serde_json::from_value(cached) {
            Ok(response) => Some(response),
            Err(e) => {
                debug!("Ignoring cached {} that does not decode: {}", endpoint, e);
                None
            }
        }
    }

    /// Main API endpoints
    pub async fn index(&self) -> Result<UriListResponse> {
        self.request("/", &[])
            .await
            .context("failed to get API index")
    }

    pub async fn products(&self) -> Result<ProductListResponse> {
        self.request("/products", &[])
            .await
            .context("failed to get products")
    }

    /// Every product with full details
    pub async fn products_full(&self) -> Result<FullProductListResponse> {
        self.request(crate::cache::FULL_CATALOG_ENDPOINT, &[])
            .await
            .context("failed to get full products")
    }

    pub async fn product(&self, product: &str) -> Result<ProductResponse> {
        require("product name", product)?;

        self.request(&format!("/products/{}", product), &[product])
            .await
            .with_context(|| format!("failed to get product {}", product))
    }

    /// A release cycle of a product
    ///
    /// The cache is consulted with the release exactly as given. Before going
    /// to the network, full versions are folded to their cycle
    /// (`1.24.6` → `1.24`); if that request fails the release is retried
    /// exactly as given.
    pub async fn release(&self, product: &str, release: &str) -> Result<ProductReleaseResponse> {
        require("product name", product)?;
        require("release name", release)?;

        let original = format!("/products/{}/releases/{}", product, release);
        let normalized = normalize_version(release);
        if normalized != release {
            if let Some(response) = self.cached(&original, &[product, release]) {
                return Ok(response);
            }
        }

        if is_semantic_version(release) {
            debug!("Normalized version {} to {}", release, normalized);
        }
        let endpoint = format!("/products/{}/releases/{}", product, normalized);

        let err = match self.request(&endpoint, &[product, normalized.as_str()]).await {
            Ok(response) => return Ok(response),
            Err(err) => err,
        };

        if normalized == release {
            return Err(err.context(format!(
                "failed to get release {} for product {}",
                release, product
            )));
        }

        debug!(
            "Release {} of {} not found, retrying as {}",
            normalized, product, release
        );

        match self.request(&original, &[product, release]).await {
            Ok(response) => Ok(response),
            Err(_) => Err(err.context(format!(
                "failed to get release {} for product {} (also tried {})",
                release, product, normalized
            ))),
        }
    }

    pub async fn latest_release(&self, product: &str) -> Result<ProductReleaseResponse> {
        require("product name", product)?;

        self.request(
            &format!("/products/{}/releases/latest", product),
            &[product, "latest"],
        )
        .await
        .with_context(|| format!("failed to get latest release for product {}", product))
    }

    pub async fn categories(&self) -> Result<UriListResponse> {
        self.request("/categories", &[])
            .await
            .context("failed to get categories")
    }

    pub async fn products_by_category(&self, category: &str) -> Result<ProductListResponse> {
        require("category name", category)?;

        self.request(&format!("/categories/{}", category), &["category", category])
            .await
            .with_context(|| format!("failed to get products for category {}", category))
    }

    pub async fn tags(&self) -> Result<UriListResponse> {
        self.request("/tags", &[])
            .await
            .context("failed to get tags")
    }

    pub async fn products_by_tag(&self, tag: &str) -> Result<ProductListResponse> {
        require("tag name", tag)?;

        self.request(&format!("/tags/{}", tag), &["tag", tag])
            .await
            .with_context(|| format!("failed to get products for tag {}", tag))
    }

    pub async fn identifier_types(&self) -> Result<UriListResponse> {
        self.request("/identifiers", &[])
            .await
            .context("failed to get identifier types")
    }

    pub async fn identifiers_by_type(&self, identifier_type: &str) -> Result<IdentifierListResponse> {
        require("identifier type", identifier_type)?;

        self.request(
            &format!("/identifiers/{}", identifier_type),
            &["identifier", identifier_type],
        )
        .await
        .with_context(|| format!("failed to get identifiers for type {}", identifier_type))
    }
}

fn require(what: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(EolError::InvalidArguments(format!("{} cannot be empty", what)).into());
    }
    Ok(())
}
