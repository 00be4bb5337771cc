//! Listing client trait and HTTP implementation

use super::types::Page;
use crate::auth::Authenticator;
use crate::config::AppConfig;
use crate::decode::PageDecoder;
use crate::error::Result;
use crate::http::{HttpClient, RequestConfig};
use crate::types::Filter;
use async_trait::async_trait;
use tracing::debug;

/// Fetches a single page from the remote listing
///
/// Implementations do not need to guard against overlapping calls; the
/// aggregator never issues a second call before the first one resolves.
#[async_trait]
pub trait ListingClient: Send + Sync {
    async fn fetch_page(&self, filter: &Filter, page_size: u32, offset: u32) -> Result<Page>;
}

/// Listing client that issues one GET per page
#[derive(Debug)]
pub struct HttpListingClient {
    http: HttpClient,
    endpoint: String,
    limit_param: String,
    offset_param: String,
    decoder: PageDecoder,
}

impl HttpListingClient {
    /// Create a client with `limit`/`offset` query parameter names
    pub fn new(http: HttpClient, endpoint: impl Into<String>, decoder: PageDecoder) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            limit_param: "limit".to_string(),
            offset_param: "offset".to_string(),
            decoder,
        }
    }

    /// Override the pagination query parameter names
    #[must_use]
    pub fn with_params(
        mut self,
        limit_param: impl Into<String>,
        offset_param: impl Into<String>,
    ) -> Self {
        self.limit_param = limit_param.into();
        self.offset_param = offset_param.into();
        self
    }

    /// Build the client described by a validated config
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let listing = &config.listing;
        let authenticator = Authenticator::from_config(&config.auth);
        let http = HttpClient::with_auth(config.http.client_config(), authenticator)?;
        let decoder = PageDecoder::new(listing.records_path.clone(), listing.fields.clone());

        Ok(Self::new(http, listing.endpoint.clone(), decoder)
            .with_params(listing.limit_param.clone(), listing.offset_param.clone()))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ListingClient for HttpListingClient {
    async fn fetch_page(&self, filter: &Filter, page_size: u32, offset: u32) -> Result<Page> {
        let mut request = RequestConfig::new();
        for (key, value) in filter {
            request = request.query(key, value);
        }
        request = request
            .query(&self.limit_param, page_size.to_string())
            .query(&self.offset_param, offset.to_string());

        debug!(
            endpoint = %self.endpoint,
            page_size,
            offset,
            "Fetching listing page"
        );

        let body = self.http.get_text(&self.endpoint, request).await?;
        self.decoder.decode(&body)
    }
}
