use async_trait::async_trait;
use std::sync::Arc;

use crate::error::CoreResult;
use crate::filters::Breadcrumb;
use crate::types::CatalogEntity;

/// Catalog lookup collaborator. An empty vec means the slug is unknown;
/// slugs are unique within their scope, so only the first match is used.
#[async_trait]
pub trait CatalogLookup: Send + Sync {
    async fn category_by_slug(&self, slug: &str) -> CoreResult<Vec<CatalogEntity>>;

    /// Subcategory lookup is scoped by the resolved category id, not the raw
    /// category slug.
    async fn sub_category_by_slug(
        &self,
        category_id: &str,
        slug: &str,
    ) -> CoreResult<Vec<CatalogEntity>>;

    async fn brand_by_slug(&self, slug: &str) -> CoreResult<Vec<CatalogEntity>>;
}

pub type SharedCatalogLookup = Arc<dyn CatalogLookup>;

/// Raw path segments extracted from an address, before resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteSlugs {
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub brand: Option<String>,
}

impl RouteSlugs {
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.sub_category.is_none() && self.brand.is_none()
    }
}

/// Output of a resolution: canonical entities plus derived display metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRoute {
    pub category: Option<CatalogEntity>,
    pub sub_category: Option<CatalogEntity>,
    pub brand: Option<CatalogEntity>,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub page_title: String,
}
