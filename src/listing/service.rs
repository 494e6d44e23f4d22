use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::CoreResult;
use crate::filters::{FilterCriteria, SortOrder};
use crate::types::ListingPage;

/// The wire-level query accepted by the listing service: criteria reduced to
/// canonical ids and tags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ListingQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub brands: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub product_type: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roast_level: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub intensity: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blend: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(default)]
    pub sort: SortOrder,
}

impl From<&FilterCriteria> for ListingQuery {
    fn from(criteria: &FilterCriteria) -> Self {
        Self {
            search: (!criteria.search.is_empty()).then(|| criteria.search.clone()),
            category: criteria.category.as_ref().map(|c| c.id.clone()),
            sub_category: criteria.sub_category.as_ref().map(|s| s.id.clone()),
            brands: criteria.brands.iter().map(|b| b.id.clone()).collect(),
            product_type: criteria.product_type.iter().cloned().collect(),
            roast_level: criteria.roast_level.iter().cloned().collect(),
            intensity: criteria.intensity.iter().cloned().collect(),
            blend: criteria.blend.iter().cloned().collect(),
            min_price: criteria.price.map(|p| p.min),
            max_price: criteria.price.map(|p| p.max),
            sort: criteria.sort,
        }
    }
}

/// Paginated product search collaborator.
#[async_trait]
pub trait ListingService: Send + Sync {
    async fn search(&self, query: &ListingQuery, page: u32) -> CoreResult<ListingPage>;
}

pub type SharedListingService = Arc<dyn ListingService>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{FilterKind, PriceRange};
    use crate::types::CatalogEntity;

    #[test]
    fn query_carries_canonical_ids() {
        let mut criteria = FilterCriteria::default();
        criteria.set_category(Some(CatalogEntity::new("c1", "Coffee", "coffee")));
        criteria.set_sub_category(Some(CatalogEntity::new("s1", "Espresso", "espresso")));
        criteria.set_brand(CatalogEntity::new("b1", "Acme", "acme"), false);
        criteria.set_brand(CatalogEntity::new("b2", "Bold", "bold"), false);
        criteria.toggle_tag(FilterKind::RoastLevel, "DARK");
        criteria.price = Some(PriceRange { min: 5.0, max: 20.0 });
        criteria.search = "ristretto".to_string();

        let query = ListingQuery::from(&criteria);
        assert_eq!(query.category.as_deref(), Some("c1"));
        assert_eq!(query.sub_category.as_deref(), Some("s1"));
        assert_eq!(query.brands, vec!["b1", "b2"]);
        assert_eq!(query.roast_level, vec!["DARK"]);
        assert_eq!(query.min_price, Some(5.0));
        assert_eq!(query.search.as_deref(), Some("ristretto"));
    }

    #[test]
    fn empty_fields_are_omitted_on_the_wire() {
        let query = ListingQuery::from(&FilterCriteria::default());
        let wire = serde_json::to_value(&query).expect("serialize");
        let object = wire.as_object().expect("object");
        assert!(!object.contains_key("search"));
        assert!(!object.contains_key("brands"));
        assert_eq!(object.get("sort").and_then(|v| v.as_str()), Some("featured"));
    }
}
