//! Shared fixtures: a seeded in-memory store and a dashboard over it.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use hotelhub_core::error::HotelResult;
use hotelhub_core::record::{
    DeleteRequest, FetchOneResponse, FetchResponse, FieldSelection, ListQuery, RawRecord,
    RecordId, WriteRequest, WriteResponse,
};
use hotelhub_core::store::RecordStore;
use hotelhub_dashboard::{Dashboard, NotificationQueue};
use hotelhub_store::MemoryRecordStore;
use serde_json::{Value, json};

pub fn record(value: Value) -> RawRecord {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

pub fn seeded_store() -> Arc<MemoryRecordStore> {
    let store = Arc::new(MemoryRecordStore::new());
    store.seed(
        "room_type",
        [
            record(json!({
                "id": "standard", "Name": "Standard Room", "capacity": 2, "price": 129,
                "availability": 12, "amenities": "Wi-Fi,TV,Air Conditioning"
            })),
            record(json!({
                "id": "deluxe", "Name": "Deluxe Room", "capacity": 2, "price": 179,
                "availability": 8, "amenities": "Wi-Fi,TV,Mini Bar"
            })),
        ],
    );
    store.seed(
        "reservation",
        [
            record(json!({
                "CreatedOn": "2023-12-01T10:00:00Z",
                "reservation_number": "RSV000123", "guest_name": "Michael Johnson",
                "room_type": "Deluxe Room", "check_in_date": "2023-12-15",
                "check_out_date": "2023-12-18", "guests_count": 2,
                "status": "confirmed", "total_amount": 537
            })),
            record(json!({
                "CreatedOn": "2023-12-02T10:00:00Z",
                "reservation_number": "RSV000124", "guest_name": "Sarah Williams",
                "room_type": "Executive Suite", "check_in_date": "2023-12-16",
                "check_out_date": "2023-12-20", "guests_count": 3,
                "status": "pending", "total_amount": 1196
            })),
        ],
    );
    store.seed(
        "service_request",
        [
            record(json!({
                "CreatedOn": "2023-12-14T09:00:00Z",
                "request_number": "SR-1022", "room_number": "118",
                "service_type": "Room Service", "guest_name": "Emily Davis",
                "priority": "medium", "requested_time": "09:45 AM", "status": "pending"
            })),
            record(json!({
                "CreatedOn": "2023-12-14T10:00:00Z",
                "request_number": "SR-1023", "room_number": "304",
                "service_type": "Housekeeping", "guest_name": "Robert Brown",
                "priority": "high", "requested_time": "10:15 AM", "status": "pending"
            })),
            record(json!({
                "CreatedOn": "2023-12-14T08:00:00Z",
                "request_number": "SR-1021", "room_number": "512",
                "service_type": "Maintenance", "guest_name": "James Wilson",
                "priority": "low", "requested_time": "08:30 AM", "status": "completed"
            })),
        ],
    );
    store.seed(
        "hotel_stats",
        [record(json!({
            "Name": "Today", "occupancy_rate": 68, "available_rooms": 42,
            "pending_services": 2, "upcoming_check_ins": 7, "revenue": 24680
        }))],
    );
    store
}

pub fn dashboard<S: RecordStore>(store: &Arc<S>) -> (Dashboard<S>, Arc<NotificationQueue>) {
    let notifications = Arc::new(NotificationQueue::new());
    let dashboard = Dashboard::new(Arc::clone(store), notifications.clone());
    (dashboard, notifications)
}

/// A memory store whose table fetches linger after the rows are read,
/// so a load can be caught in flight. Writes are not delayed.
pub struct SlowStore {
    pub inner: Arc<MemoryRecordStore>,
    fetch_delay_ms: AtomicU64,
}

impl SlowStore {
    pub fn new(inner: Arc<MemoryRecordStore>) -> Self {
        Self {
            inner,
            fetch_delay_ms: AtomicU64::new(0),
        }
    }

    pub fn set_fetch_delay(&self, delay: Duration) {
        self.fetch_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }
}

pub fn slow_store() -> Arc<SlowStore> {
    Arc::new(SlowStore::new(seeded_store()))
}

impl RecordStore for SlowStore {
    async fn fetch_records(
        &self,
        table: &str,
        query: &ListQuery,
    ) -> HotelResult<Option<FetchResponse>> {
        let response = self.inner.fetch_records(table, query).await;
        let delay = self.fetch_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        response
    }

    async fn get_record_by_id(
        &self,
        table: &str,
        id: &RecordId,
        selection: &FieldSelection,
    ) -> HotelResult<Option<FetchOneResponse>> {
        self.inner.get_record_by_id(table, id, selection).await
    }

    async fn create_records(
        &self,
        table: &str,
        request: &WriteRequest,
    ) -> HotelResult<Option<WriteResponse>> {
        self.inner.create_records(table, request).await
    }

    async fn update_records(
        &self,
        table: &str,
        request: &WriteRequest,
    ) -> HotelResult<Option<WriteResponse>> {
        self.inner.update_records(table, request).await
    }

    async fn delete_records(
        &self,
        table: &str,
        request: &DeleteRequest,
    ) -> HotelResult<Option<WriteResponse>> {
        self.inner.delete_records(table, request).await
    }
}
