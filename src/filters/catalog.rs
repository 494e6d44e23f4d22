use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::types::CatalogEntity;

/// A subcategory together with the category it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SubCategory {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub category_id: String,
}

impl SubCategory {
    pub fn entity(&self) -> CatalogEntity {
        CatalogEntity::new(&self.id, &self.name, &self.slug)
    }
}

/// The filter-option catalog rendered by the filter controls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FilterCatalog {
    pub categories: Vec<CatalogEntity>,
    pub sub_categories: Vec<SubCategory>,
    pub brands: Vec<CatalogEntity>,
}

impl FilterCatalog {
    /// Subcategories belonging to the selected category.
    pub fn sub_categories_for(&self, category_id: &str) -> Vec<&SubCategory> {
        self.sub_categories
            .iter()
            .filter(|sub| sub.category_id == category_id)
            .collect()
    }

    pub fn category_name(&self, id: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|category| category.id == id)
            .map(|category| category.name.as_str())
    }

    pub fn brand_name(&self, id: &str) -> Option<&str> {
        self.brands
            .iter()
            .find(|brand| brand.id == id)
            .map(|brand| brand.name.as_str())
    }
}
