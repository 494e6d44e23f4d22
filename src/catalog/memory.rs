use async_trait::async_trait;

use crate::error::CoreResult;
use crate::filters::{FilterCatalog, SortOrder, SubCategory};
use crate::listing::{ListingQuery, ListingService};
use crate::resolver::CatalogLookup;
use crate::types::{CatalogEntity, ListingPage, Product};

/// A product with the filter tags the listing search matches against.
#[derive(Debug, Clone)]
pub struct CatalogProduct {
    pub product: Product,
    pub sub_category_id: Option<String>,
    pub product_type: Vec<String>,
    pub roast_level: Option<String>,
    pub intensity: Option<String>,
    pub blend: Option<String>,
}

/// In-memory catalog and listing backend. Serves demos and tests; the
/// production deployment points the core at [`HttpCatalog`] instead.
///
/// [`HttpCatalog`]: crate::catalog::http::HttpCatalog
pub struct InMemoryCatalog {
    categories: Vec<CatalogEntity>,
    sub_categories: Vec<SubCategory>,
    brands: Vec<CatalogEntity>,
    products: Vec<CatalogProduct>,
    page_size: u32,
}

impl InMemoryCatalog {
    pub fn new(
        categories: Vec<CatalogEntity>,
        sub_categories: Vec<SubCategory>,
        brands: Vec<CatalogEntity>,
        products: Vec<CatalogProduct>,
        page_size: u32,
    ) -> Self {
        Self {
            categories,
            sub_categories,
            brands,
            products,
            page_size: page_size.max(1),
        }
    }

    /// A small coffee-shop fixture.
    pub fn demo(page_size: u32) -> Self {
        let categories = vec![
            CatalogEntity::new("c1", "Coffee", "coffee"),
            CatalogEntity::new("c2", "Capsule Machines", "capsule-machine"),
        ];
        let sub_categories = vec![
            SubCategory {
                id: "s1".into(),
                name: "Espresso".into(),
                slug: "espresso".into(),
                category_id: "c1".into(),
            },
            SubCategory {
                id: "s2".into(),
                name: "Filter".into(),
                slug: "filter".into(),
                category_id: "c1".into(),
            },
        ];
        let brands = vec![
            CatalogEntity::new("b1", "Acme", "acme"),
            CatalogEntity::new("b2", "Bold Bean", "bold-bean"),
        ];
        let products = vec![
            Self::demo_product("p1", "Acme Ristretto", 7.5, "c1", Some("s1"), "b1", Some("DARK")),
            Self::demo_product("p2", "Acme Lungo", 6.9, "c1", Some("s1"), "b1", Some("MEDIUM")),
            Self::demo_product("p3", "Bold Morning", 5.5, "c1", Some("s2"), "b2", Some("LIGHT")),
            Self::demo_product("p4", "Barista One", 149.0, "c2", None, "b1", None),
        ];
        Self::new(categories, sub_categories, brands, products, page_size)
    }

    fn demo_product(
        id: &str,
        name: &str,
        price: f64,
        category_id: &str,
        sub_category_id: Option<&str>,
        brand_id: &str,
        roast_level: Option<&str>,
    ) -> CatalogProduct {
        let slug = name.to_lowercase().replace(' ', "-");
        CatalogProduct {
            product: Product {
                id: id.to_string(),
                name: name.to_string(),
                slug,
                price,
                image_url: None,
                category: Some(CatalogEntity::id_only(category_id)),
                brand: Some(CatalogEntity::id_only(brand_id)),
            },
            sub_category_id: sub_category_id.map(String::from),
            product_type: Vec::new(),
            roast_level: roast_level.map(String::from),
            intensity: None,
            blend: None,
        }
    }

    /// The filter-option catalog rendered by the controls panel.
    pub fn filter_catalog(&self) -> FilterCatalog {
        FilterCatalog {
            categories: self.categories.clone(),
            sub_categories: self.sub_categories.clone(),
            brands: self.brands.clone(),
        }
    }

    fn matches(&self, entry: &CatalogProduct, query: &ListingQuery) -> bool {
        if let Some(search) = &query.search {
            if !entry
                .product
                .name
                .to_lowercase()
                .contains(&search.to_lowercase())
            {
                return false;
            }
        }
        if let Some(category) = &query.category {
            let product_category = entry.product.category.as_ref().map(|c| c.id.as_str());
            if product_category != Some(category.as_str()) {
                return false;
            }
        }
        if let Some(sub_category) = &query.sub_category {
            if entry.sub_category_id.as_deref() != Some(sub_category.as_str()) {
                return false;
            }
        }
        if !query.brands.is_empty() {
            let product_brand = entry.product.brand.as_ref().map(|b| b.id.as_str());
            if !product_brand.is_some_and(|brand| query.brands.iter().any(|q| q == brand)) {
                return false;
            }
        }
        if !query.product_type.is_empty()
            && !entry.product_type.iter().any(|t| query.product_type.contains(t))
        {
            return false;
        }
        if !tag_matches(&query.roast_level, entry.roast_level.as_deref()) {
            return false;
        }
        if !tag_matches(&query.intensity, entry.intensity.as_deref()) {
            return false;
        }
        if !tag_matches(&query.blend, entry.blend.as_deref()) {
            return false;
        }
        if let Some(min) = query.min_price {
            if entry.product.price < min {
                return false;
            }
        }
        if let Some(max) = query.max_price {
            if entry.product.price > max {
                return false;
            }
        }
        true
    }
}

fn tag_matches(wanted: &[String], actual: Option<&str>) -> bool {
    wanted.is_empty() || actual.is_some_and(|tag| wanted.iter().any(|w| w == tag))
}

fn sort_items(items: &mut [Product], sort: SortOrder) {
    match sort {
        SortOrder::Featured => {}
        SortOrder::PriceAsc => {
            items.sort_by(|a, b| a.price.partial_cmp(&b.price).unwrap_or(std::cmp::Ordering::Equal))
        }
        SortOrder::PriceDesc => {
            items.sort_by(|a, b| b.price.partial_cmp(&a.price).unwrap_or(std::cmp::Ordering::Equal))
        }
        SortOrder::NameAsc => items.sort_by(|a, b| a.name.cmp(&b.name)),
        SortOrder::NameDesc => items.sort_by(|a, b| b.name.cmp(&a.name)),
        SortOrder::Newest => items.reverse(),
    }
}

#[async_trait]
impl CatalogLookup for InMemoryCatalog {
    async fn category_by_slug(&self, slug: &str) -> CoreResult<Vec<CatalogEntity>> {
        Ok(self
            .categories
            .iter()
            .filter(|category| category.slug == slug)
            .cloned()
            .collect())
    }

    async fn sub_category_by_slug(
        &self,
        category_id: &str,
        slug: &str,
    ) -> CoreResult<Vec<CatalogEntity>> {
        Ok(self
            .sub_categories
            .iter()
            .filter(|sub| sub.category_id == category_id && sub.slug == slug)
            .map(SubCategory::entity)
            .collect())
    }

    async fn brand_by_slug(&self, slug: &str) -> CoreResult<Vec<CatalogEntity>> {
        Ok(self
            .brands
            .iter()
            .filter(|brand| brand.slug == slug)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ListingService for InMemoryCatalog {
    async fn search(&self, query: &ListingQuery, page: u32) -> CoreResult<ListingPage> {
        let mut matched: Vec<Product> = self
            .products
            .iter()
            .filter(|entry| self.matches(entry, query))
            .map(|entry| entry.product.clone())
            .collect();
        sort_items(&mut matched, query.sort);

        let total_count = matched.len() as u64;
        let page_size = self.page_size as usize;
        let total_pages = matched.len().div_ceil(page_size) as u32;
        let page = page.max(1);
        let start = (page as usize - 1) * page_size;
        let items = if start < matched.len() {
            matched[start..(start + page_size).min(matched.len())].to_vec()
        } else {
            Vec::new()
        };

        Ok(ListingPage {
            items,
            total_pages,
            total_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lookup_by_slug_scopes_sub_categories() {
        let catalog = InMemoryCatalog::demo(24);
        let categories = catalog.category_by_slug("coffee").await.expect("lookup");
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].id, "c1");

        let subs = catalog
            .sub_category_by_slug("c1", "espresso")
            .await
            .expect("lookup");
        assert_eq!(subs.len(), 1);

        let subs = catalog
            .sub_category_by_slug("c2", "espresso")
            .await
            .expect("lookup");
        assert!(subs.is_empty());
    }

    #[tokio::test]
    async fn search_filters_by_category_and_brand() {
        let catalog = InMemoryCatalog::demo(24);
        let query = ListingQuery {
            category: Some("c1".to_string()),
            brands: vec!["b1".to_string()],
            ..ListingQuery::default()
        };
        let page = catalog.search(&query, 1).await.expect("search");
        assert_eq!(page.total_count, 2);
        assert!(page.items.iter().all(|p| p.name.starts_with("Acme")));
    }

    #[tokio::test]
    async fn search_paginates_and_sorts() {
        let catalog = InMemoryCatalog::demo(2);
        let query = ListingQuery {
            sort: SortOrder::PriceAsc,
            ..ListingQuery::default()
        };
        let first = catalog.search(&query, 1).await.expect("page 1");
        assert_eq!(first.total_count, 4);
        assert_eq!(first.total_pages, 2);
        assert_eq!(first.items.len(), 2);
        assert!(first.items[0].price <= first.items[1].price);

        let second = catalog.search(&query, 2).await.expect("page 2");
        assert_eq!(second.items.len(), 2);
        assert!(first.items[1].price <= second.items[0].price);

        let beyond = catalog.search(&query, 3).await.expect("page 3");
        assert!(beyond.items.is_empty());
    }

    #[tokio::test]
    async fn search_matches_roast_level_and_price() {
        let catalog = InMemoryCatalog::demo(24);
        let query = ListingQuery {
            roast_level: vec!["DARK".to_string(), "LIGHT".to_string()],
            max_price: Some(6.0),
            ..ListingQuery::default()
        };
        let page = catalog.search(&query, 1).await.expect("search");
        assert_eq!(page.total_count, 1);
        assert_eq!(page.items[0].name, "Bold Morning");
    }
}
