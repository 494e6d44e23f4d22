use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Mutex;
use utoipa::ToSchema;

use crate::error::{CoreError, CoreResult};
use crate::filters::catalog::FilterCatalog;
use crate::filters::criteria::{FilterCriteria, FilterKind, PriceRange, SortOrder};
use crate::types::CatalogEntity;

/// One breadcrumb entry: display label plus the canonical path prefix
/// through that level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Breadcrumb {
    pub label: String,
    pub path: String,
}

impl Breadcrumb {
    pub fn new(label: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
        }
    }
}

/// URL-derived display metadata and the transition-in-flight signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UrlState {
    /// True iff category, subcategory, or any brand is set.
    pub is_url_filter_active: bool,
    /// True while an address transition is being resolved; readers treat the
    /// current criteria as provisional until it clears.
    pub is_loading: bool,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub page_title: String,
}

impl Default for UrlState {
    fn default() -> Self {
        Self {
            is_url_filter_active: false,
            is_loading: false,
            breadcrumbs: Vec::new(),
            page_title: "All Products".to_string(),
        }
    }
}

/// Presentational toggles read by the filter panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UiState {
    pub expanded_sections: BTreeSet<String>,
    pub drawer_open: bool,
}

/// Immutable snapshot of the full filter state.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FilterSnapshot {
    pub criteria: FilterCriteria,
    pub catalog: FilterCatalog,
    pub url: UrlState,
    pub ui: UiState,
}

/// Mutating commands accepted by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum FilterCommand {
    SetFilter { kind: FilterKind, value: String },
    SetCategory { category: Option<CatalogEntity> },
    SetSubCategory { sub_category: Option<CatalogEntity> },
    SetBrand { brand: CatalogEntity, replace: bool },
    RemoveBrand { id: String },
    SetPriceRange { min: f64, max: f64 },
    SetSearchTerm { term: String },
    ResetAll,
}

/// Filters and resolved display metadata applied together at the end of a
/// read-path transition.
#[derive(Debug, Clone)]
pub struct ResolvedFilters {
    pub category: Option<CatalogEntity>,
    pub sub_category: Option<CatalogEntity>,
    pub brand: Option<CatalogEntity>,
    /// The `q` parameter of the address; absent means no search term.
    pub search: String,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub page_title: String,
}

#[derive(Debug, Default)]
struct FilterState {
    criteria: FilterCriteria,
    catalog: FilterCatalog,
    url: UrlState,
    ui: UiState,
}

/// Canonical in-memory snapshot of the active filter criteria, the
/// filter-option catalog, URL display metadata, and UI toggles.
///
/// All writes funnel through commands on this store; side effects are
/// limited to recomputing `is_url_filter_active`. Navigation and network
/// effects live in the synchronizer and the fetch scheduler.
pub struct FilterStateStore {
    state: Mutex<FilterState>,
}

impl FilterStateStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FilterState::default()),
        }
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut FilterState) -> T) -> CoreResult<T> {
        let mut guard = self
            .state
            .lock()
            .map_err(|_| CoreError::Internal("filter state lock poisoned".to_string()))?;
        Ok(f(&mut guard))
    }

    fn snapshot_of(state: &FilterState) -> FilterSnapshot {
        FilterSnapshot {
            criteria: state.criteria.clone(),
            catalog: state.catalog.clone(),
            url: state.url.clone(),
            ui: state.ui.clone(),
        }
    }

    pub fn snapshot(&self) -> CoreResult<FilterSnapshot> {
        self.with_state(|state| Self::snapshot_of(state))
    }

    /// Apply a filter command and return the new snapshot.
    pub fn apply(&self, command: FilterCommand) -> CoreResult<FilterSnapshot> {
        self.with_state(|state| {
            match command {
                FilterCommand::SetFilter { kind, value } => match kind {
                    FilterKind::Sort => {
                        let sort = SortOrder::parse(&value).ok_or_else(|| {
                            CoreError::InvalidInput(format!("unknown sort order: {value}"))
                        })?;
                        state.criteria.sort = sort;
                    }
                    _ => state.criteria.toggle_tag(kind, &value),
                },
                FilterCommand::SetCategory { category } => {
                    state.criteria.set_category(category);
                }
                FilterCommand::SetSubCategory { sub_category } => {
                    state.criteria.set_sub_category(sub_category);
                }
                FilterCommand::SetBrand { brand, replace } => {
                    state.criteria.set_brand(brand, replace);
                }
                FilterCommand::RemoveBrand { id } => {
                    state.criteria.remove_brand(&id);
                }
                FilterCommand::SetPriceRange { min, max } => {
                    if min > max {
                        return Err(CoreError::InvalidInput(format!(
                            "price range min {min} exceeds max {max}"
                        )));
                    }
                    state.criteria.price = Some(PriceRange { min, max });
                }
                FilterCommand::SetSearchTerm { term } => {
                    state.criteria.search = term;
                }
                FilterCommand::ResetAll => {
                    state.criteria.reset_all();
                }
            }
            state.url.is_url_filter_active = state.criteria.is_url_filter_active();
            Ok(Self::snapshot_of(state))
        })?
    }

    /// Replace criteria and display metadata with the output of an address
    /// resolution. Used by the synchronizer's read path only.
    pub fn apply_resolution(&self, resolved: ResolvedFilters) -> CoreResult<FilterSnapshot> {
        self.with_state(|state| {
            state.criteria.set_category(resolved.category);
            state.criteria.set_sub_category(resolved.sub_category);
            state.criteria.brands = resolved.brand.into_iter().collect();
            state.criteria.search = resolved.search;
            state.url.breadcrumbs = resolved.breadcrumbs;
            state.url.page_title = resolved.page_title;
            state.url.is_url_filter_active = state.criteria.is_url_filter_active();
            Self::snapshot_of(state)
        })
    }

    /// Replace breadcrumbs and page title. Used by the synchronizer's write
    /// path, where display names are already in hand.
    pub fn set_display_metadata(
        &self,
        breadcrumbs: Vec<Breadcrumb>,
        page_title: String,
    ) -> CoreResult<()> {
        self.with_state(|state| {
            state.url.breadcrumbs = breadcrumbs;
            state.url.page_title = page_title;
        })
    }

    pub fn set_url_loading(&self, loading: bool) -> CoreResult<()> {
        self.with_state(|state| {
            state.url.is_loading = loading;
        })
    }

    pub fn is_url_loading(&self) -> CoreResult<bool> {
        self.with_state(|state| state.url.is_loading)
    }

    pub fn set_catalog(&self, catalog: FilterCatalog) -> CoreResult<FilterSnapshot> {
        self.with_state(|state| {
            state.catalog = catalog;
            Self::snapshot_of(state)
        })
    }

    pub fn toggle_section(&self, section: &str) -> CoreResult<FilterSnapshot> {
        self.with_state(|state| {
            if !state.ui.expanded_sections.remove(section) {
                state.ui.expanded_sections.insert(section.to_string());
            }
            Self::snapshot_of(state)
        })
    }

    pub fn set_drawer_open(&self, open: bool) -> CoreResult<FilterSnapshot> {
        self.with_state(|state| {
            state.ui.drawer_open = open;
            Self::snapshot_of(state)
        })
    }
}

impl Default for FilterStateStore {
    fn default() -> Self {
        Self::new()
    }
}
