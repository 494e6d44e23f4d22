use crate::error::CoreResult;
use crate::resolver::breadcrumbs;
use crate::resolver::cache::SlugCache;
use crate::resolver::lookup::{ResolvedRoute, RouteSlugs, SharedCatalogLookup};
use crate::types::CatalogEntity;

/// Translates address slugs into canonical catalog entities and derives the
/// breadcrumb trail and page title.
///
/// The category lookup completes before the subcategory lookup is attempted,
/// because the subcategory is scoped by the resolved category id. The brand
/// lookup is independent and runs concurrently with that chain. An unknown
/// slug resolves to an empty field without failing the rest of the request.
pub struct SlugResolver {
    lookup: SharedCatalogLookup,
    cache: SlugCache,
}

impl SlugResolver {
    pub fn new(lookup: SharedCatalogLookup, cache: SlugCache) -> Self {
        Self { lookup, cache }
    }

    pub async fn resolve(&self, slugs: &RouteSlugs) -> CoreResult<ResolvedRoute> {
        let (chain, brand) = tokio::join!(
            self.resolve_category_chain(slugs),
            self.resolve_brand(slugs.brand.as_deref()),
        );
        let (category, sub_category) = chain?;
        let brand = brand?;

        let (breadcrumbs, page_title) =
            breadcrumbs::derive(category.as_ref(), sub_category.as_ref(), brand.as_ref());

        Ok(ResolvedRoute {
            category,
            sub_category,
            brand,
            breadcrumbs,
            page_title,
        })
    }

    async fn resolve_category_chain(
        &self,
        slugs: &RouteSlugs,
    ) -> CoreResult<(Option<CatalogEntity>, Option<CatalogEntity>)> {
        let category = match slugs.category.as_deref() {
            Some(slug) => self.resolve_category(slug).await?,
            None => None,
        };

        let sub_category = match (&category, slugs.sub_category.as_deref()) {
            (Some(category), Some(slug)) => self.resolve_sub_category(&category.id, slug).await?,
            _ => None,
        };

        Ok((category, sub_category))
    }

    async fn resolve_category(&self, slug: &str) -> CoreResult<Option<CatalogEntity>> {
        let key = SlugCache::category_key(slug);
        if let Some(hit) = self.cache.get(&key) {
            return Ok(Some(hit));
        }
        let resolved = self.lookup.category_by_slug(slug).await?.into_iter().next();
        match &resolved {
            Some(entity) => self.cache.insert(key, entity.clone()),
            None => tracing::debug!("category slug not found: {slug}"),
        }
        Ok(resolved)
    }

    async fn resolve_sub_category(
        &self,
        category_id: &str,
        slug: &str,
    ) -> CoreResult<Option<CatalogEntity>> {
        let key = SlugCache::sub_category_key(category_id, slug);
        if let Some(hit) = self.cache.get(&key) {
            return Ok(Some(hit));
        }
        let resolved = self
            .lookup
            .sub_category_by_slug(category_id, slug)
            .await?
            .into_iter()
            .next();
        match &resolved {
            Some(entity) => self.cache.insert(key, entity.clone()),
            None => tracing::debug!("subcategory slug not found in {category_id}: {slug}"),
        }
        Ok(resolved)
    }

    async fn resolve_brand(&self, slug: Option<&str>) -> CoreResult<Option<CatalogEntity>> {
        let Some(slug) = slug else {
            return Ok(None);
        };
        let key = SlugCache::brand_key(slug);
        if let Some(hit) = self.cache.get(&key) {
            return Ok(Some(hit));
        }
        let resolved = self.lookup.brand_by_slug(slug).await?.into_iter().next();
        match &resolved {
            Some(entity) => self.cache.insert(key, entity.clone()),
            None => tracing::debug!("brand slug not found: {slug}"),
        }
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::resolver::lookup::CatalogLookup;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct FakeLookup {
        category_calls: AtomicUsize,
        sub_category_scope: std::sync::Mutex<Option<String>>,
        fail_brands: bool,
    }

    #[async_trait]
    impl CatalogLookup for FakeLookup {
        async fn category_by_slug(&self, slug: &str) -> CoreResult<Vec<CatalogEntity>> {
            self.category_calls.fetch_add(1, Ordering::SeqCst);
            match slug {
                "coffee" => Ok(vec![CatalogEntity::new("c1", "Coffee", "coffee")]),
                _ => Ok(Vec::new()),
            }
        }

        async fn sub_category_by_slug(
            &self,
            category_id: &str,
            slug: &str,
        ) -> CoreResult<Vec<CatalogEntity>> {
            *self.sub_category_scope.lock().expect("scope") = Some(category_id.to_string());
            match (category_id, slug) {
                ("c1", "espresso") => Ok(vec![CatalogEntity::new("s1", "Espresso", "espresso")]),
                _ => Ok(Vec::new()),
            }
        }

        async fn brand_by_slug(&self, slug: &str) -> CoreResult<Vec<CatalogEntity>> {
            if self.fail_brands {
                return Err(CoreError::Lookup("brand service unavailable".to_string()));
            }
            match slug {
                "acme" => Ok(vec![CatalogEntity::new("b1", "Acme", "acme")]),
                _ => Ok(Vec::new()),
            }
        }
    }

    fn resolver(lookup: Arc<FakeLookup>) -> SlugResolver {
        SlugResolver::new(lookup, SlugCache::new(64, 60))
    }

    fn slugs(category: Option<&str>, sub: Option<&str>, brand: Option<&str>) -> RouteSlugs {
        RouteSlugs {
            category: category.map(String::from),
            sub_category: sub.map(String::from),
            brand: brand.map(String::from),
        }
    }

    #[tokio::test]
    async fn resolves_full_chain_with_scoped_sub_category() {
        let lookup = Arc::new(FakeLookup::default());
        let resolver = resolver(lookup.clone());

        let route = resolver
            .resolve(&slugs(Some("coffee"), Some("espresso"), Some("acme")))
            .await
            .expect("resolve");

        assert_eq!(route.category.as_ref().expect("category").id, "c1");
        assert_eq!(route.sub_category.as_ref().expect("sub").id, "s1");
        assert_eq!(route.brand.as_ref().expect("brand").id, "b1");
        assert_eq!(route.page_title, "Acme Espresso - Coffee");
        // The subcategory lookup saw the resolved id, not the raw slug.
        assert_eq!(
            lookup.sub_category_scope.lock().expect("scope").as_deref(),
            Some("c1")
        );
    }

    #[tokio::test]
    async fn unknown_category_does_not_block_brand() {
        let lookup = Arc::new(FakeLookup::default());
        let resolver = resolver(lookup);

        let route = resolver
            .resolve(&slugs(Some("nonsense"), Some("espresso"), Some("acme")))
            .await
            .expect("resolve");

        assert!(route.category.is_none());
        // No category scope, so the subcategory cannot resolve either.
        assert!(route.sub_category.is_none());
        assert_eq!(route.brand.as_ref().expect("brand").id, "b1");
        assert_eq!(route.page_title, "Acme");
    }

    #[tokio::test]
    async fn repeated_resolution_hits_the_cache() {
        let lookup = Arc::new(FakeLookup::default());
        let resolver = resolver(lookup.clone());

        for _ in 0..3 {
            resolver
                .resolve(&slugs(Some("coffee"), None, None))
                .await
                .expect("resolve");
        }

        assert_eq!(lookup.category_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn not_found_is_never_cached() {
        let lookup = Arc::new(FakeLookup::default());
        let resolver = resolver(lookup.clone());

        for _ in 0..2 {
            resolver
                .resolve(&slugs(Some("nonsense"), None, None))
                .await
                .expect("resolve");
        }

        assert_eq!(lookup.category_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn service_failure_surfaces_as_lookup_error() {
        let lookup = Arc::new(FakeLookup {
            fail_brands: true,
            ..FakeLookup::default()
        });
        let resolver = resolver(lookup);

        let error = resolver
            .resolve(&slugs(Some("coffee"), None, Some("acme")))
            .await
            .expect_err("lookup failure");
        assert!(matches!(error, CoreError::Lookup(_)));
    }
}
