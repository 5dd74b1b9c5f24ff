//! Room type domain model.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::models::{Entity, EntityKind};
use crate::record::{RawRecord, RecordId};

/// A bookable category of room (e.g. `standard`, `deluxe`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomType {
    pub record_id: Option<RecordId>,
    /// Key referenced by reservations (e.g. `suite`).
    pub id: String,
    pub name: String,
    /// Maximum guests per room.
    pub capacity: u32,
    /// Price per night.
    pub price: f64,
    /// Rooms of this type currently free.
    pub availability: u32,
    pub description: String,
    pub amenities: Vec<String>,
}

impl RoomType {
    /// Fewer than five rooms left; shown with a warning badge.
    pub fn is_scarce(&self) -> bool {
        self.availability < 5
    }
}

impl Entity for RoomType {
    const KIND: EntityKind = EntityKind::RoomType;

    fn id(&self) -> &str {
        &self.id
    }

    fn record_id(&self) -> Option<&RecordId> {
        self.record_id.as_ref()
    }

    fn search_keys(&self) -> [&str; 3] {
        [self.id.as_str(), self.name.as_str(), self.description.as_str()]
    }

    fn to_write_record(&self) -> RawRecord {
        let mut record = RawRecord::new();
        if let Some(id) = &self.record_id {
            record.insert("Id".into(), id.to_value());
        }
        record.insert("Name".into(), json!(self.name));
        record.insert("id".into(), json!(self.id));
        record.insert("capacity".into(), json!(self.capacity));
        record.insert("price".into(), json!(self.price));
        record.insert("availability".into(), json!(self.availability));
        record.insert("description".into(), json!(self.description));
        record.insert("amenities".into(), json!(self.amenities));
        record
    }
}
