//! Slug resolution: address segments to canonical catalog entities.

pub mod breadcrumbs;
pub mod cache;
pub mod lookup;
pub mod slugs;

pub use cache::SlugCache;
pub use lookup::{CatalogLookup, ResolvedRoute, RouteSlugs, SharedCatalogLookup};
pub use slugs::SlugResolver;
