use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::listing::{ListingQuery, ListingService};
use crate::resolver::CatalogLookup;
use crate::types::{CatalogEntity, ListingPage};

/// Remote catalog/listing backend spoken over JSON.
///
/// Loose upstream entity shapes are normalized at this boundary by the serde
/// adapters on [`crate::types::Product`]; nothing past this client ever sees
/// a bare id or an array-wrapped entity.
pub struct HttpCatalog {
    client: reqwest::Client,
    base_url: String,
    page_size: u32,
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    #[serde(flatten)]
    query: &'a ListingQuery,
    page: u32,
    per_page: u32,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    items: Vec<crate::types::Product>,
    total_pages: u32,
    total_count: u64,
}

impl HttpCatalog {
    pub fn new(base_url: impl Into<String>, page_size: u32) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: reqwest::Client::new(),
            base_url,
            page_size: page_size.max(1),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_entities(
        &self,
        path: &str,
        slug: &str,
    ) -> Result<Vec<CatalogEntity>, reqwest::Error> {
        self.client
            .get(self.endpoint(path))
            .query(&[("slug", slug)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}

fn lookup_error(error: reqwest::Error) -> CoreError {
    CoreError::Lookup(error.to_string())
}

fn listing_error(error: reqwest::Error) -> CoreError {
    CoreError::Listing(error.to_string())
}

#[async_trait]
impl CatalogLookup for HttpCatalog {
    async fn category_by_slug(&self, slug: &str) -> CoreResult<Vec<CatalogEntity>> {
        self.get_entities("/categories", slug).await.map_err(lookup_error)
    }

    async fn sub_category_by_slug(
        &self,
        category_id: &str,
        slug: &str,
    ) -> CoreResult<Vec<CatalogEntity>> {
        let path = format!("/categories/{category_id}/subcategories");
        self.get_entities(&path, slug).await.map_err(lookup_error)
    }

    async fn brand_by_slug(&self, slug: &str) -> CoreResult<Vec<CatalogEntity>> {
        self.get_entities("/brands", slug).await.map_err(lookup_error)
    }
}

#[async_trait]
impl ListingService for HttpCatalog {
    async fn search(&self, query: &ListingQuery, page: u32) -> CoreResult<ListingPage> {
        let request = SearchRequest {
            query,
            page,
            per_page: self.page_size,
        };
        let response: SearchResponse = self
            .client
            .post(self.endpoint("/products/search"))
            .json(&request)
            .send()
            .await
            .map_err(listing_error)?
            .error_for_status()
            .map_err(listing_error)?
            .json()
            .await
            .map_err(listing_error)?;

        Ok(ListingPage {
            items: response.items,
            total_pages: response.total_pages,
            total_count: response.total_count,
        })
    }
}
