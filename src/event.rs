use serde::Serialize;
use utoipa::ToSchema;

use crate::filters::FilterCriteria;

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    FiltersChanged(FiltersChangedPayload),
    AddressPushed(AddressPushedPayload),
    AddressResolved(AddressResolvedPayload),
    ListingUpdated(ListingUpdatedPayload),
    ListingFetchFailed(ListingFetchFailedPayload),
}

/// Criteria changed through the write path (a user-initiated filter edit).
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FiltersChangedPayload {
    pub transition_id: String,
    pub criteria: FilterCriteria,
    pub is_url_filter_active: bool,
    pub occurred_at: String,
}

/// The synchronizer pushed a new history entry for the current criteria.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AddressPushedPayload {
    pub transition_id: String,
    pub path: String,
    pub occurred_at: String,
}

/// An externally-changed address finished resolving into filter state.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AddressResolvedPayload {
    pub transition_id: String,
    pub path: String,
    pub page_title: String,
    pub occurred_at: String,
}

/// The visible listing was replaced (page 1) or extended (`appended`).
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListingUpdatedPayload {
    pub request_token: u64,
    pub page: u32,
    pub total_pages: u32,
    pub total_count: u64,
    pub appended: bool,
    pub occurred_at: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListingFetchFailedPayload {
    pub request_token: u64,
    pub message: String,
    pub occurred_at: String,
}
