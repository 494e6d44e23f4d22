use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::bus::Bus;
use crate::error::CoreResult;
use crate::event::{
    AddressPushedPayload, AddressResolvedPayload, CoreEvent, FiltersChangedPayload,
};
use crate::filters::{FilterCommand, FilterSnapshot, FilterStateStore, ResolvedFilters};
use crate::navigation::address::{self, ParsedAddress};
use crate::navigation::history::SharedHistory;
use crate::resolver::{breadcrumbs, SlugResolver};
use crate::utils::time::now_rfc3339;

/// Synchronizer phase, readable for observability. `Transitioning` while
/// either direction of change is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Transitioning,
}

/// Keeps filter state and the address consistent in both directions.
///
/// Write path: a filter edit updates the store, then pushes the canonical
/// address. Read path: an externally-changed address resolves through the
/// [`SlugResolver`] before filters reflect it. Only one transition is active
/// at a time; triggers arriving mid-transition queue FIFO behind it on the
/// transition mutex. The address the synchronizer last pushed itself is
/// remembered so its own navigation does not re-enter the read path.
pub struct NavigationSynchronizer {
    store: Arc<FilterStateStore>,
    resolver: Arc<SlugResolver>,
    history: SharedHistory,
    bus: Bus,
    transition: tokio::sync::Mutex<()>,
    transitioning: AtomicBool,
    last_pushed: Mutex<Option<String>>,
}

impl NavigationSynchronizer {
    pub fn new(
        store: Arc<FilterStateStore>,
        resolver: Arc<SlugResolver>,
        history: SharedHistory,
        bus: Bus,
    ) -> Self {
        Self {
            store,
            resolver,
            history,
            bus,
            transition: tokio::sync::Mutex::new(()),
            transitioning: AtomicBool::new(false),
            last_pushed: Mutex::new(None),
        }
    }

    pub fn state(&self) -> SyncState {
        if self.transitioning.load(Ordering::SeqCst) {
            SyncState::Transitioning
        } else {
            SyncState::Idle
        }
    }

    /// Write path: apply a user-initiated filter edit, then update the
    /// address. The loading flag is raised before the destination address is
    /// computed so the fetch scheduler suppresses fetches against
    /// provisional criteria.
    pub async fn apply_edit(&self, command: FilterCommand) -> CoreResult<FilterSnapshot> {
        let _active = self.transition.lock().await;
        self.begin_transition()?;
        let result = self.write_path(command).await;
        self.finish_transition();
        result?;
        self.store.snapshot()
    }

    /// Read path: react to an externally-changed address (user navigation,
    /// back/forward, initial load). A notification for the address this
    /// synchronizer pushed itself is already processed and is consumed
    /// without re-resolving.
    pub async fn handle_address_change(&self, path: &str) -> CoreResult<FilterSnapshot> {
        if self.consume_self_pushed(path) {
            tracing::debug!("skipping self-inflicted address change: {path}");
            return self.store.snapshot();
        }
        let parsed = address::parse_address(path)?;

        let _active = self.transition.lock().await;
        self.begin_transition()?;
        let result = self.read_path(parsed, path).await;
        self.finish_transition();
        result?;
        self.store.snapshot()
    }

    async fn write_path(&self, command: FilterCommand) -> CoreResult<()> {
        let transition_id = uuid::Uuid::now_v7().to_string();
        let snapshot = self.store.apply(command)?;

        // Display metadata derives from the names already in hand; no
        // lookups on the write path.
        let (crumbs, title) = breadcrumbs::derive(
            snapshot.criteria.category.as_ref(),
            snapshot.criteria.sub_category.as_ref(),
            snapshot.criteria.brands.first(),
        );
        self.store.set_display_metadata(crumbs, title)?;

        let path = address::format_address(&snapshot.criteria);
        self.remember_self_pushed(&path);
        self.history.push(&path);
        tracing::info!("filter edit {transition_id} pushed {path}");

        self.bus.publish(CoreEvent::FiltersChanged(FiltersChangedPayload {
            transition_id: transition_id.clone(),
            criteria: snapshot.criteria,
            is_url_filter_active: snapshot.url.is_url_filter_active,
            occurred_at: now_rfc3339(),
        }));
        self.bus.publish(CoreEvent::AddressPushed(AddressPushedPayload {
            transition_id,
            path,
            occurred_at: now_rfc3339(),
        }));
        Ok(())
    }

    async fn read_path(&self, parsed: ParsedAddress, path: &str) -> CoreResult<()> {
        let transition_id = uuid::Uuid::now_v7().to_string();
        let resolved = self.resolver.resolve(&parsed.slugs).await?;

        let snapshot = self.store.apply_resolution(ResolvedFilters {
            category: resolved.category,
            sub_category: resolved.sub_category,
            brand: resolved.brand,
            search: parsed.search.unwrap_or_default(),
            breadcrumbs: resolved.breadcrumbs,
            page_title: resolved.page_title,
        })?;
        tracing::info!("address change {transition_id} resolved {path}");

        self.bus.publish(CoreEvent::AddressResolved(AddressResolvedPayload {
            transition_id,
            path: path.to_string(),
            page_title: snapshot.url.page_title,
            occurred_at: now_rfc3339(),
        }));
        Ok(())
    }

    fn begin_transition(&self) -> CoreResult<()> {
        self.transitioning.store(true, Ordering::SeqCst);
        if let Err(error) = self.store.set_url_loading(true) {
            self.transitioning.store(false, Ordering::SeqCst);
            return Err(error);
        }
        Ok(())
    }

    /// Runs on every exit path; the machine never stays stuck in
    /// `Transitioning`.
    fn finish_transition(&self) {
        if let Err(error) = self.store.set_url_loading(false) {
            tracing::warn!("failed to clear url loading flag: {error}");
        }
        self.transitioning.store(false, Ordering::SeqCst);
    }

    fn remember_self_pushed(&self, path: &str) {
        *self
            .last_pushed
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(path.to_string());
    }

    /// One-shot: the first matching notification consumes the memory, so a
    /// later history navigation back to the same path re-resolves.
    fn consume_self_pushed(&self, path: &str) -> bool {
        let mut guard = self
            .last_pushed
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if guard.as_deref() == Some(path) {
            *guard = None;
            true
        } else {
            false
        }
    }
}
