//! Remote collection view-models.
//!
//! A view-model holds the normalized contents of one table (or the
//! latest stats row) together with a load state. Loads always replace
//! the held data wholesale; nothing is patched locally.

use std::sync::Arc;

use hotelhub_core::error::{HotelError, HotelResult};
use hotelhub_core::models::{EntityKind, HotelStats};
use hotelhub_core::record::ListQuery;
use hotelhub_core::store::RecordStore;
use hotelhub_core::{Entity, Gateway, normalize_entity};
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, error, info};

use crate::busy::BusyFlag;
use crate::notify::{Notification, Notifier};

/// `Idle → Loading → (Loaded | Failed)`; a refresh re-enters `Loading`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// A consistent copy of a view-model for presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot<T> {
    pub state: LoadState,
    pub data: T,
    pub error: Option<String>,
}

struct Held<T> {
    state: LoadState,
    data: T,
    error: Option<String>,
}

impl<T: Clone> Held<T> {
    fn snapshot(&self) -> Snapshot<T> {
        Snapshot {
            state: self.state,
            data: self.data.clone(),
            error: self.error.clone(),
        }
    }
}

/// Plural label used in user-facing load failures.
fn collection_label(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::RoomType => "room types",
        EntityKind::Reservation => "reservations",
        EntityKind::ServiceRequest => "service requests",
        EntityKind::HotelStats => "hotel stats",
    }
}

fn busy(kind: EntityKind) -> HotelError {
    HotelError::Busy {
        entity: kind.name().to_string(),
    }
}

/// The held list of one entity kind.
pub struct CollectionViewModel<E, S> {
    gateway: Gateway<E, S>,
    notifier: Arc<dyn Notifier>,
    query: Option<ListQuery>,
    held: RwLock<Held<Vec<E>>>,
    loading: BusyFlag,
}

impl<E: Entity, S: RecordStore> CollectionViewModel<E, S> {
    pub fn new(gateway: Gateway<E, S>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            gateway,
            notifier,
            query: None,
            held: RwLock::new(Held {
                state: LoadState::Idle,
                data: Vec::new(),
                error: None,
            }),
            loading: BusyFlag::default(),
        }
    }

    /// Filter, order and page every load with `query`.
    pub fn with_query(mut self, query: ListQuery) -> Self {
        self.query = Some(query);
        self
    }

    pub fn gateway(&self) -> &Gateway<E, S> {
        &self.gateway
    }

    /// Fetch and normalize the whole table, replacing the held list.
    ///
    /// On failure the held list is cleared, the state becomes `Failed`
    /// and an error notification is raised. Returns the number of rows
    /// now held.
    pub async fn load(&self) -> HotelResult<usize> {
        let Some(_loading) = self.loading.try_acquire() else {
            return Err(busy(E::KIND));
        };
        let entity = E::KIND.name();

        self.held.write().state = LoadState::Loading;
        debug!(entity, "Loading collection");

        match self.fetch().await {
            Ok(items) => {
                let count = items.len();
                let mut held = self.held.write();
                held.data = items;
                held.state = LoadState::Loaded;
                held.error = None;
                info!(entity, count, "Collection loaded");
                Ok(count)
            }
            Err(err) => {
                {
                    let mut held = self.held.write();
                    held.data.clear();
                    held.state = LoadState::Failed;
                    held.error = Some(err.to_string());
                }
                error!(entity, error = %err, "Collection load failed");
                self.notifier.notify(Notification::error(format!(
                    "Failed to load {}",
                    collection_label(E::KIND)
                )));
                Err(err)
            }
        }
    }

    /// Load, waiting out any load already in flight first.
    ///
    /// Unlike [`load`](Self::load) this never returns `Busy`: a load
    /// that started before the caller's write may hold a stale list, so
    /// a fresh one always runs after it.
    pub async fn refresh(&self) -> HotelResult<usize> {
        loop {
            match self.load().await {
                Err(HotelError::Busy { .. }) => self.loading.wait_idle().await,
                result => return result,
            }
        }
    }

    async fn fetch(&self) -> HotelResult<Vec<E>> {
        let rows = self.gateway.list(self.query.clone()).await?;
        rows.iter().map(normalize_entity::<E>).collect()
    }

    pub fn state(&self) -> LoadState {
        self.held.read().state
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_busy()
    }

    pub fn error(&self) -> Option<String> {
        self.held.read().error.clone()
    }

    pub fn items(&self) -> Vec<E> {
        self.held.read().data.clone()
    }

    pub fn len(&self) -> usize {
        self.held.read().data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.held.read().data.is_empty()
    }

    pub fn snapshot(&self) -> Snapshot<Vec<E>> {
        self.held.read().snapshot()
    }

    /// Held entities matching `predicate`, in held order.
    pub fn filter(&self, predicate: impl Fn(&E) -> bool) -> Vec<E> {
        self.held
            .read()
            .data
            .iter()
            .filter(|item| predicate(item))
            .cloned()
            .collect()
    }

    /// Case-insensitive substring match over each entity's search keys.
    /// A blank term matches everything.
    pub fn search(&self, term: &str) -> Vec<E> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return self.items();
        }
        self.filter(|item| {
            item.search_keys()
                .iter()
                .any(|key| key.to_lowercase().contains(&needle))
        })
    }

    /// Held entity with the given business id.
    pub fn find(&self, id: &str) -> Option<E> {
        self.held
            .read()
            .data
            .iter()
            .find(|item| item.id() == id)
            .cloned()
    }
}

/// The most recent hotel stats snapshot.
pub struct StatsViewModel<S> {
    gateway: Gateway<HotelStats, S>,
    notifier: Arc<dyn Notifier>,
    held: RwLock<Held<HotelStats>>,
    loading: BusyFlag,
}

impl<S: RecordStore> StatsViewModel<S> {
    pub fn new(gateway: Gateway<HotelStats, S>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            gateway,
            notifier,
            held: RwLock::new(Held {
                state: LoadState::Idle,
                data: HotelStats::default(),
                error: None,
            }),
            loading: BusyFlag::default(),
        }
    }

    /// Load the latest stats row. An empty table loads as all zeros.
    pub async fn load(&self) -> HotelResult<HotelStats> {
        let Some(_loading) = self.loading.try_acquire() else {
            return Err(busy(EntityKind::HotelStats));
        };

        self.held.write().state = LoadState::Loading;
        debug!("Loading hotel stats");

        match self.fetch().await {
            Ok(stats) => {
                let mut held = self.held.write();
                held.data = stats.clone();
                held.state = LoadState::Loaded;
                held.error = None;
                info!(occupancy = stats.occupancy, "Hotel stats loaded");
                Ok(stats)
            }
            Err(err) => {
                {
                    let mut held = self.held.write();
                    held.data = HotelStats::default();
                    held.state = LoadState::Failed;
                    held.error = Some(err.to_string());
                }
                error!(error = %err, "Hotel stats load failed");
                self.notifier.notify(Notification::error(format!(
                    "Failed to load {}",
                    collection_label(EntityKind::HotelStats)
                )));
                Err(err)
            }
        }
    }

    /// Load, waiting out any load already in flight first.
    pub async fn refresh(&self) -> HotelResult<HotelStats> {
        loop {
            match self.load().await {
                Err(HotelError::Busy { .. }) => self.loading.wait_idle().await,
                result => return result,
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_busy()
    }

    async fn fetch(&self) -> HotelResult<HotelStats> {
        match self.gateway.latest().await? {
            Some(row) => normalize_entity(&row),
            None => Ok(HotelStats::default()),
        }
    }

    pub fn state(&self) -> LoadState {
        self.held.read().state
    }

    pub fn stats(&self) -> HotelStats {
        self.held.read().data.clone()
    }

    pub fn snapshot(&self) -> Snapshot<HotelStats> {
        self.held.read().snapshot()
    }
}
