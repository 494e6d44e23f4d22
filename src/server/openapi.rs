use utoipa::OpenApi;

use crate::event::{
    AddressPushedPayload, AddressResolvedPayload, CoreEvent, FiltersChangedPayload,
    ListingFetchFailedPayload, ListingUpdatedPayload,
};
use crate::filters::{
    Breadcrumb, FilterCatalog, FilterCommand, FilterCriteria, FilterKind, FilterSnapshot,
    PriceRange, SortOrder, SubCategory, UiState, UrlState,
};
use crate::listing::{ListingQuery, ListingSnapshot};
use crate::server::error::{ApiErrorBody, ApiErrorResponse};
use crate::server::filters::{SetDrawerRequest, ToggleSectionRequest};
use crate::server::navigation::NavigateRequest;
use crate::types::{CatalogEntity, ListingPage, Product};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Storefront API",
        version = "0.1.0",
        description = "Filter/navigation core for the storefront"
    ),
    paths(
        crate::server::filters::filter_state,
        crate::server::filters::apply_command,
        crate::server::filters::toggle_section,
        crate::server::filters::set_drawer,
        crate::server::navigation::navigate,
        crate::server::listing::listing_state,
        crate::server::listing::load_more,
        crate::server::events::stream_events,
    ),
    components(schemas(
        // Error
        ApiErrorResponse,
        ApiErrorBody,
        // Domain
        CatalogEntity,
        Product,
        ListingPage,
        ListingQuery,
        ListingSnapshot,
        // Filters
        FilterCriteria,
        FilterCatalog,
        FilterCommand,
        FilterKind,
        FilterSnapshot,
        SortOrder,
        PriceRange,
        SubCategory,
        Breadcrumb,
        UrlState,
        UiState,
        // Requests
        NavigateRequest,
        ToggleSectionRequest,
        SetDrawerRequest,
        // Events
        CoreEvent,
        FiltersChangedPayload,
        AddressPushedPayload,
        AddressResolvedPayload,
        ListingUpdatedPayload,
        ListingFetchFailedPayload,
    ))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_serializes_and_lists_paths() {
        let spec = ApiDoc::openapi().to_json().expect("serialize");
        assert!(spec.contains("/filters/command"));
        assert!(spec.contains("/navigate"));
        assert!(spec.contains("/listing/more"));
    }
}
