//! Filter state: criteria, option catalog, URL metadata, UI toggles.

pub mod catalog;
pub mod criteria;
pub mod store;

pub use catalog::{FilterCatalog, SubCategory};
pub use criteria::{FilterCriteria, FilterKind, PriceRange, SortOrder};
pub use store::{
    Breadcrumb, FilterCommand, FilterSnapshot, FilterStateStore, ResolvedFilters, UiState,
    UrlState,
};
