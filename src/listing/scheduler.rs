use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use serde::Serialize;
use utoipa::ToSchema;

use crate::bus::Bus;
use crate::error::{CoreError, CoreResult};
use crate::event::{CoreEvent, ListingFetchFailedPayload, ListingUpdatedPayload};
use crate::filters::{FilterCriteria, FilterStateStore};
use crate::listing::service::{ListingQuery, SharedListingService};
use crate::types::Product;
use crate::utils::time::now_rfc3339;

/// Visible listing state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct ListingSnapshot {
    pub items: Vec<Product>,
    pub page: u32,
    pub total_pages: u32,
    pub total_count: u64,
    pub is_loading: bool,
}

/// Debounces filter-state changes into paginated listing requests, discards
/// superseded responses, and merges paginated results.
///
/// Every fetch takes a fresh token from a monotonic counter; a response is
/// applied to visible state only while its token is still the latest issued.
/// Stale responses are discarded silently, so exactly one outcome (the most
/// recent) ever lands.
pub struct ListingFetchScheduler {
    service: SharedListingService,
    store: Arc<FilterStateStore>,
    bus: Bus,
    debounce: Duration,
    state: Mutex<ListingSnapshot>,
    token: AtomicU64,
    pending: Mutex<Option<CancellationToken>>,
}

impl ListingFetchScheduler {
    pub fn new(
        service: SharedListingService,
        store: Arc<FilterStateStore>,
        bus: Bus,
        debounce: Duration,
    ) -> Self {
        Self {
            service,
            store,
            bus,
            debounce,
            state: Mutex::new(ListingSnapshot {
                page: 1,
                ..ListingSnapshot::default()
            }),
            token: AtomicU64::new(0),
            pending: Mutex::new(None),
        }
    }

    pub fn snapshot(&self) -> ListingSnapshot {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Coalesce filter changes arriving within the quiet window into one
    /// page-1 fetch. Ignored entirely while an address transition is in
    /// flight, because the criteria are provisional until it completes.
    pub fn schedule_fetch(self: &Arc<Self>, criteria: &FilterCriteria) {
        match self.store.is_url_loading() {
            Ok(true) => {
                tracing::debug!("suppressing listing fetch during address transition");
                return;
            }
            Ok(false) => {}
            Err(error) => tracing::warn!("could not read url loading flag: {error}"),
        }

        let cancel = CancellationToken::new();
        let previous = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(cancel.clone());
        if let Some(previous) = previous {
            previous.cancel();
        }

        let scheduler = Arc::clone(self);
        let query = ListingQuery::from(criteria);
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep(scheduler.debounce) => {
                    if let Err(error) = scheduler.fetch_first_page(query).await {
                        tracing::warn!("listing fetch failed: {error}");
                    }
                }
            }
        });
    }

    /// Request the next page and append it. Never resets to page 1; a no-op
    /// once the last page is loaded.
    pub async fn load_more(&self) -> CoreResult<ListingSnapshot> {
        let (page, total_pages) = {
            let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            (state.page, state.total_pages)
        };
        if page >= total_pages {
            return Ok(self.snapshot());
        }

        let criteria = self.store.snapshot()?.criteria;
        let query = ListingQuery::from(&criteria);
        let token = self.next_token();
        self.set_loading(true);

        match self.service.search(&query, page + 1).await {
            Ok(result) => {
                let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
                if token != self.token.load(Ordering::SeqCst) {
                    tracing::trace!("discarding stale load-more response (token {token})");
                    return Ok(state.clone());
                }
                state.items.extend(result.items);
                state.page = page + 1;
                state.total_pages = result.total_pages;
                state.total_count = result.total_count;
                state.is_loading = false;
                let snapshot = state.clone();
                drop(state);
                self.publish_updated(token, &snapshot, true);
                Ok(snapshot)
            }
            Err(error) => Err(self.fail_fetch(token, error)),
        }
    }

    async fn fetch_first_page(&self, query: ListingQuery) -> CoreResult<()> {
        let token = self.next_token();
        self.set_loading(true);

        match self.service.search(&query, 1).await {
            Ok(result) => {
                let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
                if token != self.token.load(Ordering::SeqCst) {
                    tracing::trace!("discarding stale listing response (token {token})");
                    return Ok(());
                }
                state.items = result.items;
                state.page = 1;
                state.total_pages = result.total_pages;
                state.total_count = result.total_count;
                state.is_loading = false;
                let snapshot = state.clone();
                drop(state);
                self.publish_updated(token, &snapshot, false);
                Ok(())
            }
            Err(error) => Err(self.fail_fetch(token, error)),
        }
    }

    fn next_token(&self) -> u64 {
        self.token.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn set_loading(&self, loading: bool) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_loading = loading;
    }

    /// Failure leaves items and page untouched; the loading flag clears
    /// unless a newer fetch owns it.
    fn fail_fetch(&self, token: u64, error: CoreError) -> CoreError {
        if token == self.token.load(Ordering::SeqCst) {
            self.set_loading(false);
            self.bus
                .publish(CoreEvent::ListingFetchFailed(ListingFetchFailedPayload {
                    request_token: token,
                    message: error.to_string(),
                    occurred_at: now_rfc3339(),
                }));
        } else {
            tracing::trace!("discarding stale listing failure (token {token})");
        }
        error
    }

    fn publish_updated(&self, token: u64, snapshot: &ListingSnapshot, appended: bool) {
        self.bus
            .publish(CoreEvent::ListingUpdated(ListingUpdatedPayload {
                request_token: token,
                page: snapshot.page,
                total_pages: snapshot.total_pages,
                total_count: snapshot.total_count,
                appended,
                occurred_at: now_rfc3339(),
            }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::service::ListingService;
    use crate::types::ListingPage;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    fn product(id: &str) -> Product {
        Product {
            id: id.to_string(),
            name: id.to_uppercase(),
            slug: id.to_string(),
            price: 9.9,
            image_url: None,
            category: None,
            brand: None,
        }
    }

    /// Listing stub: result items echo the search term, and a per-term delay
    /// simulates slow responses.
    struct StubListing {
        calls: AtomicUsize,
        delays_ms: std::collections::HashMap<String, u64>,
        total_pages: u32,
        fail: bool,
    }

    impl StubListing {
        fn new(total_pages: u32) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                delays_ms: std::collections::HashMap::new(),
                total_pages,
                fail: false,
            }
        }
    }

    #[async_trait]
    impl ListingService for StubListing {
        async fn search(&self, query: &ListingQuery, page: u32) -> CoreResult<ListingPage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let term = query.search.clone().unwrap_or_default();
            if let Some(delay) = self.delays_ms.get(&term) {
                tokio::time::sleep(Duration::from_millis(*delay)).await;
            }
            if self.fail {
                return Err(CoreError::Listing("listing service down".to_string()));
            }
            Ok(ListingPage {
                items: vec![product(&format!("{term}-p{page}"))],
                total_pages: self.total_pages,
                total_count: self.total_pages as u64,
            })
        }
    }

    struct Fixture {
        scheduler: Arc<ListingFetchScheduler>,
        store: Arc<FilterStateStore>,
        service: Arc<StubListing>,
        bus: Bus,
    }

    fn fixture(service: StubListing) -> Fixture {
        let store = Arc::new(FilterStateStore::new());
        let service = Arc::new(service);
        let bus = Bus::new(16);
        let scheduler = Arc::new(ListingFetchScheduler::new(
            service.clone(),
            store.clone(),
            bus.clone(),
            Duration::from_millis(300),
        ));
        Fixture {
            scheduler,
            store,
            service,
            bus,
        }
    }

    fn criteria_with_search(term: &str) -> FilterCriteria {
        let mut criteria = FilterCriteria::default();
        criteria.search = term.to_string();
        criteria
    }

    async fn settle() {
        // Paused-clock tests: yield until spawned fetches have run.
        for _ in 0..20 {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_changes_coalesce_into_one_fetch() {
        let f = fixture(StubListing::new(1));
        for term in ["a", "ab", "abc"] {
            f.scheduler.schedule_fetch(&criteria_with_search(term));
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        settle().await;

        assert_eq!(f.service.calls.load(Ordering::SeqCst), 1);
        let snapshot = f.scheduler.snapshot();
        assert_eq!(snapshot.items[0].id, "abc-p1");
        assert_eq!(snapshot.page, 1);
        assert!(!snapshot.is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_response_is_discarded_regardless_of_arrival_order() {
        let mut service = StubListing::new(1);
        // A responds long after B.
        service.delays_ms.insert("A".to_string(), 5_000);
        service.delays_ms.insert("B".to_string(), 10);
        let f = fixture(service);

        f.scheduler.schedule_fetch(&criteria_with_search("A"));
        // Let A's debounce fire so its fetch is in flight, then supersede it.
        tokio::time::sleep(Duration::from_millis(400)).await;
        f.scheduler.schedule_fetch(&criteria_with_search("B"));
        tokio::time::sleep(Duration::from_millis(10_000)).await;
        settle().await;

        assert_eq!(f.service.calls.load(Ordering::SeqCst), 2);
        let snapshot = f.scheduler.snapshot();
        assert_eq!(snapshot.items.len(), 1);
        assert_eq!(snapshot.items[0].id, "B-p1");
        assert!(!snapshot.is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_is_suppressed_during_address_transition() {
        let f = fixture(StubListing::new(1));
        f.store.set_url_loading(true).expect("loading");
        f.scheduler.schedule_fetch(&criteria_with_search("a"));
        settle().await;

        assert_eq!(f.service.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn load_more_appends_and_stops_at_last_page() {
        let f = fixture(StubListing::new(2));
        f.scheduler.schedule_fetch(&FilterCriteria::default());
        settle().await;
        assert_eq!(f.scheduler.snapshot().page, 1);

        let snapshot = f.scheduler.load_more().await.expect("load more");
        assert_eq!(snapshot.page, 2);
        assert_eq!(snapshot.items.len(), 2);

        // At the last page the call is a no-op.
        let calls = f.service.calls.load(Ordering::SeqCst);
        let snapshot = f.scheduler.load_more().await.expect("load more");
        assert_eq!(snapshot.page, 2);
        assert_eq!(f.service.calls.load(Ordering::SeqCst), calls);
    }

    #[tokio::test(start_paused = true)]
    async fn failure_keeps_previous_items_and_clears_loading() {
        let mut failing = StubListing::new(2);
        failing.fail = true;
        let f = fixture(failing);
        // Prime visible state with one loaded page so the failing load_more
        // has something to leave untouched.
        {
            let mut state = f.scheduler.state.lock().expect("state");
            state.items = vec![product("seed-p1")];
            state.page = 1;
            state.total_pages = 2;
            state.total_count = 2;
        }
        let mut rx = f.bus.subscribe();

        let error = f.scheduler.load_more().await.expect_err("failure");
        assert!(matches!(error, CoreError::Listing(_)));
        let snapshot = f.scheduler.snapshot();
        assert_eq!(snapshot.items.len(), 1);
        assert_eq!(snapshot.items[0].id, "seed-p1");
        assert_eq!(snapshot.page, 1);
        assert!(!snapshot.is_loading);

        let event = rx.try_recv().expect("event");
        assert!(matches!(event, CoreEvent::ListingFetchFailed(_)));
    }
}
