use std::sync::Arc;

use tokio::sync::broadcast;

use crate::bus::Bus;
use crate::config::CoreConfig;
use crate::error::CoreResult;
use crate::event::CoreEvent;
use crate::filters::{FilterCatalog, FilterCommand, FilterSnapshot, FilterStateStore};
use crate::listing::{ListingFetchScheduler, ListingSnapshot, SharedListingService};
use crate::navigation::{InMemoryHistory, NavigationSynchronizer, SharedHistory};
use crate::resolver::{SharedCatalogLookup, SlugCache, SlugResolver};

/// Primary facade for the storefront filter/navigation core.
///
/// Owns the filter store, the slug resolver, the navigation synchronizer,
/// and the listing fetch scheduler; every consumer command flows through
/// here. Collaborators (catalog lookup, listing service, history) are
/// injected at construction.
pub struct Core {
    store: Arc<FilterStateStore>,
    sync: NavigationSynchronizer,
    scheduler: Arc<ListingFetchScheduler>,
    bus: Bus,
}

impl Core {
    pub fn new(
        config: &CoreConfig,
        lookup: SharedCatalogLookup,
        listing: SharedListingService,
        history: SharedHistory,
    ) -> Self {
        let bus = Bus::new(64);
        let store = Arc::new(FilterStateStore::new());
        let resolver = Arc::new(SlugResolver::new(
            lookup,
            SlugCache::new(config.slug_cache_capacity, config.slug_cache_ttl_secs),
        ));
        let sync = NavigationSynchronizer::new(
            store.clone(),
            resolver,
            history,
            bus.clone(),
        );
        let scheduler = Arc::new(ListingFetchScheduler::new(
            listing,
            store.clone(),
            bus.clone(),
            config.debounce(),
        ));
        Core {
            store,
            sync,
            scheduler,
            bus,
        }
    }

    /// Demo wiring: the in-memory coffee catalog backs both collaborator
    /// seams and the option catalog is preloaded into the store.
    pub fn in_memory(config: &CoreConfig) -> CoreResult<Self> {
        let catalog = Arc::new(crate::catalog::InMemoryCatalog::demo(config.page_size));
        let core = Self::new(
            config,
            catalog.clone(),
            catalog.clone(),
            Arc::new(InMemoryHistory::new()),
        );
        core.store.set_catalog(catalog.filter_catalog())?;
        Ok(core)
    }

    /// Apply a user-initiated filter edit: state first, then the address,
    /// then a debounced listing fetch against the settled criteria.
    pub async fn apply_filter(&self, command: FilterCommand) -> CoreResult<FilterSnapshot> {
        let snapshot = self.sync.apply_edit(command).await?;
        self.scheduler.schedule_fetch(&snapshot.criteria);
        Ok(snapshot)
    }

    /// React to an externally-changed address (user navigation, history
    /// back/forward, initial load).
    pub async fn navigate(&self, path: &str) -> CoreResult<FilterSnapshot> {
        let snapshot = self.sync.handle_address_change(path).await?;
        self.scheduler.schedule_fetch(&snapshot.criteria);
        Ok(snapshot)
    }

    pub async fn load_more(&self) -> CoreResult<ListingSnapshot> {
        self.scheduler.load_more().await
    }

    pub fn filters(&self) -> CoreResult<FilterSnapshot> {
        self.store.snapshot()
    }

    pub fn listing(&self) -> ListingSnapshot {
        self.scheduler.snapshot()
    }

    pub fn set_catalog(&self, catalog: FilterCatalog) -> CoreResult<FilterSnapshot> {
        self.store.set_catalog(catalog)
    }

    pub fn toggle_section(&self, section: &str) -> CoreResult<FilterSnapshot> {
        self.store.toggle_section(section)
    }

    pub fn set_drawer_open(&self, open: bool) -> CoreResult<FilterSnapshot> {
        self.store.set_drawer_open(open)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CoreEvent> {
        self.bus.subscribe()
    }

    pub fn bus(&self) -> &Bus {
        &self.bus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreResult;
    use crate::listing::{ListingQuery, ListingService};
    use crate::navigation::History;
    use crate::resolver::CatalogLookup;
    use crate::types::{CatalogEntity, ListingPage};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    struct StubLookup;

    #[async_trait]
    impl CatalogLookup for StubLookup {
        async fn category_by_slug(&self, slug: &str) -> CoreResult<Vec<CatalogEntity>> {
            match slug {
                "capsule-machine" => Ok(vec![CatalogEntity::new(
                    "c1",
                    "Capsule Machines",
                    "capsule-machine",
                )]),
                _ => Ok(Vec::new()),
            }
        }

        async fn sub_category_by_slug(&self, _: &str, _: &str) -> CoreResult<Vec<CatalogEntity>> {
            Ok(Vec::new())
        }

        async fn brand_by_slug(&self, _: &str) -> CoreResult<Vec<CatalogEntity>> {
            Ok(Vec::new())
        }
    }

    #[derive(Default)]
    struct RecordingListing {
        queries: Mutex<Vec<(ListingQuery, u32)>>,
    }

    #[async_trait]
    impl ListingService for RecordingListing {
        async fn search(&self, query: &ListingQuery, page: u32) -> CoreResult<ListingPage> {
            self.queries
                .lock()
                .expect("queries")
                .push((query.clone(), page));
            Ok(ListingPage {
                items: Vec::new(),
                total_pages: 1,
                total_count: 0,
            })
        }
    }

    struct RecordingHistory {
        paths: Mutex<Vec<String>>,
    }

    impl History for RecordingHistory {
        fn push(&self, path: &str) {
            self.paths.lock().expect("paths").push(path.to_string());
        }

        fn current(&self) -> Option<String> {
            self.paths.lock().expect("paths").last().cloned()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn category_select_updates_address_and_issues_page_one_fetch() {
        let listing = Arc::new(RecordingListing::default());
        let history = Arc::new(RecordingHistory {
            paths: Mutex::new(Vec::new()),
        });
        let core = Core::new(
            &CoreConfig::default(),
            Arc::new(StubLookup),
            listing.clone(),
            history.clone(),
        );

        // Starting point: /shop with default criteria.
        core.navigate("/shop").await.expect("initial load");
        tokio::time::sleep(Duration::from_secs(2)).await;

        let snapshot = core
            .apply_filter(FilterCommand::SetCategory {
                category: Some(CatalogEntity::new(
                    "c1",
                    "Capsule Machines",
                    "capsule-machine",
                )),
            })
            .await
            .expect("apply");

        assert!(snapshot.url.is_url_filter_active);
        assert_eq!(
            history.current().as_deref(),
            Some("/category/capsule-machine")
        );

        tokio::time::sleep(Duration::from_secs(2)).await;
        let queries = listing.queries.lock().expect("queries");
        let (query, page) = queries.last().expect("fetch issued");
        assert_eq!(page, &1);
        assert_eq!(query.category.as_deref(), Some("c1"));
    }

    #[tokio::test(start_paused = true)]
    async fn in_memory_wiring_serves_a_full_session() {
        let core = Core::in_memory(&CoreConfig::default()).expect("core");

        let snapshot = core
            .navigate("/category/coffee/subcategory/espresso?q=acme")
            .await
            .expect("navigate");
        assert_eq!(snapshot.url.page_title, "Espresso - Coffee");
        assert_eq!(snapshot.criteria.search, "acme");

        tokio::time::sleep(Duration::from_secs(2)).await;
        let listing = core.listing();
        assert!(!listing.is_loading);
        assert_eq!(listing.total_count, 2);
        assert!(listing.items.iter().all(|p| p.name.contains("Acme")));

        let snapshot = core.filters().expect("filters");
        assert_eq!(snapshot.catalog.categories.len(), 2);
    }
}
