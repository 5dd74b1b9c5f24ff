//! Canonical domain models for HotelHub.
//!
//! These are the normalized, UI-ready shapes produced by
//! [`crate::normalize`]. They serialize with camelCase keys, which are
//! also the canonical keys the normalizer emits.

pub mod hotel_stats;
pub mod reservation;
pub mod room_type;
pub mod service_request;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::normalize::{self, FieldMapping};
use crate::record::{RawRecord, RecordId};
use crate::table::{self, TableSpec};

pub use hotel_stats::HotelStats;
pub use reservation::{Reservation, ReservationStatus};
pub use room_type::RoomType;
pub use service_request::{Priority, ServiceRequest, ServiceStatus};

/// The entity kinds backed by a record-store table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    RoomType,
    Reservation,
    ServiceRequest,
    HotelStats,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::RoomType,
        EntityKind::Reservation,
        EntityKind::ServiceRequest,
        EntityKind::HotelStats,
    ];

    pub fn table(self) -> &'static TableSpec {
        match self {
            EntityKind::RoomType => &table::ROOM_TYPE,
            EntityKind::Reservation => &table::RESERVATION,
            EntityKind::ServiceRequest => &table::SERVICE_REQUEST,
            EntityKind::HotelStats => &table::HOTEL_STATS,
        }
    }

    pub fn mappings(self) -> &'static [FieldMapping] {
        match self {
            EntityKind::RoomType => normalize::ROOM_TYPE_FIELDS,
            EntityKind::Reservation => normalize::RESERVATION_FIELDS,
            EntityKind::ServiceRequest => normalize::SERVICE_REQUEST_FIELDS,
            EntityKind::HotelStats => normalize::HOTEL_STATS_FIELDS,
        }
    }

    /// Entity name for log lines and error messages.
    pub fn name(self) -> &'static str {
        self.table().entity
    }
}

/// A canonical entity held by a collection view-model.
pub trait Entity: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    const KIND: EntityKind;

    /// Business identifier shown in the UI.
    fn id(&self) -> &str;

    /// Store row id, absent for records never persisted.
    fn record_id(&self) -> Option<&RecordId>;

    /// Fields matched by the default text search: id, primary name and
    /// category.
    fn search_keys(&self) -> [&str; 3];

    /// Canonical record form (camelCase keys).
    fn to_canonical(&self) -> RawRecord {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => RawRecord::new(),
        }
    }

    /// Write payload using the store's field names.
    fn to_write_record(&self) -> RawRecord;
}
