use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use utoipa::ToSchema;

use crate::types::CatalogEntity;

/// Filter dimensions addressable through `SetFilter`.
///
/// The set-valued kinds toggle membership; `Sort` replaces the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum FilterKind {
    ProductType,
    RoastLevel,
    Intensity,
    Blend,
    Sort,
}

/// Listing sort order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    #[default]
    Featured,
    PriceAsc,
    PriceDesc,
    NameAsc,
    NameDesc,
    Newest,
}

impl SortOrder {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "featured" => Some(Self::Featured),
            "price-asc" => Some(Self::PriceAsc),
            "price-desc" => Some(Self::PriceDesc),
            "name-asc" => Some(Self::NameAsc),
            "name-desc" => Some(Self::NameDesc),
            "newest" => Some(Self::Newest),
            _ => None,
        }
    }
}

/// Inclusive price bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

/// The active filter criteria. Sole source of truth for what the listing
/// should show and what the canonical address encodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FilterCriteria {
    pub product_type: BTreeSet<String>,
    pub category: Option<CatalogEntity>,
    pub sub_category: Option<CatalogEntity>,
    /// Ordered brand selection.
    pub brands: Vec<CatalogEntity>,
    pub roast_level: BTreeSet<String>,
    pub intensity: BTreeSet<String>,
    pub blend: BTreeSet<String>,
    pub price: Option<PriceRange>,
    pub sort: SortOrder,
    pub search: String,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            product_type: BTreeSet::new(),
            category: None,
            sub_category: None,
            brands: Vec::new(),
            roast_level: BTreeSet::new(),
            intensity: BTreeSet::new(),
            blend: BTreeSet::new(),
            price: None,
            sort: SortOrder::Featured,
            search: String::new(),
        }
    }
}

impl FilterCriteria {
    /// Toggle membership of `value` in the set for `kind`.
    ///
    /// `FilterKind::Sort` is not set-valued and is handled by the store.
    pub(crate) fn toggle_tag(&mut self, kind: FilterKind, value: &str) {
        let set = match kind {
            FilterKind::ProductType => &mut self.product_type,
            FilterKind::RoastLevel => &mut self.roast_level,
            FilterKind::Intensity => &mut self.intensity,
            FilterKind::Blend => &mut self.blend,
            FilterKind::Sort => return,
        };
        if !set.remove(value) {
            set.insert(value.to_string());
        }
    }

    /// Replace the category. Changing to a different non-empty id clears the
    /// subcategory; clearing the category always clears the subcategory.
    pub(crate) fn set_category(&mut self, category: Option<CatalogEntity>) {
        let changed = match (&self.category, &category) {
            (Some(previous), Some(next)) => previous.id != next.id,
            (None, Some(_)) => true,
            (_, None) => true,
        };
        if changed {
            self.sub_category = None;
        }
        self.category = category;
    }

    /// Replace the subcategory. The caller must ensure it belongs to the
    /// current category; with no category selected the subcategory stays
    /// empty.
    pub(crate) fn set_sub_category(&mut self, sub_category: Option<CatalogEntity>) {
        if self.category.is_none() && sub_category.is_some() {
            tracing::warn!("ignoring subcategory selection without an active category");
            return;
        }
        self.sub_category = sub_category;
    }

    /// Add or replace a brand selection. `replace` resets the list to the
    /// single entry; append mode skips ids already present.
    pub(crate) fn set_brand(&mut self, brand: CatalogEntity, replace: bool) {
        if replace {
            self.brands = vec![brand];
        } else if !self.brands.iter().any(|existing| existing.id == brand.id) {
            self.brands.push(brand);
        }
    }

    pub(crate) fn remove_brand(&mut self, id: &str) {
        self.brands.retain(|brand| brand.id != id);
    }

    /// Restore every field to its default, preserving the search term.
    pub(crate) fn reset_all(&mut self) {
        let search = std::mem::take(&mut self.search);
        *self = Self {
            search,
            ..Self::default()
        };
    }

    /// True when the address carries a category, subcategory, or brand
    /// segment for this criteria.
    pub fn is_url_filter_active(&self) -> bool {
        self.category.is_some() || self.sub_category.is_some() || !self.brands.is_empty()
    }
}
