//! Composition root for the dashboard's view-models and workflows.

use std::sync::Arc;

use hotelhub_core::Gateway;
use hotelhub_core::error::HotelResult;
use hotelhub_core::models::{Reservation, RoomType, ServiceRequest};
use hotelhub_core::record::{FilterOperator, ListQuery, SortType};
use hotelhub_core::store::RecordStore;
use serde_json::json;
use tracing::{info, warn};

use crate::notify::Notifier;
use crate::view_model::{CollectionViewModel, StatsViewModel};
use crate::workflow::{ReservationWorkflow, RoomTypeWorkflow, ServiceRequestWorkflow};

/// Reservations, newest first.
pub fn reservations_query() -> ListQuery {
    ListQuery::new().order_by("CreatedOn", SortType::Desc)
}

/// Pending service requests, newest first.
pub fn pending_requests_query() -> ListQuery {
    ListQuery::new()
        .filter("status", FilterOperator::EqualTo, [json!("pending")])
        .order_by("CreatedOn", SortType::Desc)
}

/// Every view-model and workflow, wired to one shared record store.
pub struct Dashboard<S> {
    pub room_types: Arc<CollectionViewModel<RoomType, S>>,
    pub reservations: Arc<CollectionViewModel<Reservation, S>>,
    pub service_requests: Arc<CollectionViewModel<ServiceRequest, S>>,
    pub stats: Arc<StatsViewModel<S>>,
    pub reservation_workflow: ReservationWorkflow<S>,
    pub service_request_workflow: ServiceRequestWorkflow<S>,
    pub room_type_workflow: RoomTypeWorkflow<S>,
}

impl<S: RecordStore> Dashboard<S> {
    pub fn new(store: Arc<S>, notifier: Arc<dyn Notifier>) -> Self {
        let room_types = Arc::new(CollectionViewModel::new(
            Gateway::new(Arc::clone(&store)),
            Arc::clone(&notifier),
        ));
        let reservations = Arc::new(
            CollectionViewModel::new(Gateway::new(Arc::clone(&store)), Arc::clone(&notifier))
                .with_query(reservations_query()),
        );
        let service_requests = Arc::new(
            CollectionViewModel::new(Gateway::new(Arc::clone(&store)), Arc::clone(&notifier))
                .with_query(pending_requests_query()),
        );
        let stats = Arc::new(StatsViewModel::new(
            Gateway::new(store),
            Arc::clone(&notifier),
        ));

        Self {
            reservation_workflow: ReservationWorkflow::new(
                Arc::clone(&reservations),
                Arc::clone(&room_types),
                Arc::clone(&notifier),
            ),
            service_request_workflow: ServiceRequestWorkflow::new(
                Arc::clone(&service_requests),
                Arc::clone(&stats),
                Arc::clone(&notifier),
            ),
            room_type_workflow: RoomTypeWorkflow::new(Arc::clone(&room_types), notifier),
            room_types,
            reservations,
            service_requests,
            stats,
        }
    }

    /// Load every view. All loads are attempted; the first failure is
    /// returned after the rest have run.
    pub async fn load_all(&self) -> HotelResult<()> {
        let results = [
            self.room_types.load().await.map(|_| ()),
            self.reservations.load().await.map(|_| ()),
            self.service_requests.load().await.map(|_| ()),
            self.stats.load().await.map(|_| ()),
        ];

        let failed = results.iter().filter(|r| r.is_err()).count();
        if failed > 0 {
            warn!(failed, "Dashboard loaded with failures");
        } else {
            info!(
                room_types = self.room_types.len(),
                reservations = self.reservations.len(),
                service_requests = self.service_requests.len(),
                "Dashboard loaded"
            );
        }

        results.into_iter().collect()
    }
}
