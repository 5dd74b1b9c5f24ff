//! Hotel statistics snapshot.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::models::{Entity, EntityKind};
use crate::record::{RawRecord, RecordId};

/// The latest occupancy and workload figures shown on the dashboard
/// header. Only the most recent record is ever loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelStats {
    pub record_id: Option<RecordId>,
    pub name: String,
    /// Occupancy percentage, 0 to 100.
    pub occupancy: f64,
    pub available_rooms: u32,
    pub pending_services: u32,
    pub upcoming_check_ins: u32,
    pub revenue: f64,
}

impl Entity for HotelStats {
    const KIND: EntityKind = EntityKind::HotelStats;

    fn id(&self) -> &str {
        &self.name
    }

    fn record_id(&self) -> Option<&RecordId> {
        self.record_id.as_ref()
    }

    fn search_keys(&self) -> [&str; 3] {
        [self.name.as_str(), "", ""]
    }

    fn to_write_record(&self) -> RawRecord {
        let mut record = RawRecord::new();
        if let Some(id) = &self.record_id {
            record.insert("Id".into(), id.to_value());
        }
        record.insert("Name".into(), json!(self.name));
        record.insert("occupancy_rate".into(), json!(self.occupancy));
        record.insert("available_rooms".into(), json!(self.available_rooms));
        record.insert("pending_services".into(), json!(self.pending_services));
        record.insert("upcoming_check_ins".into(), json!(self.upcoming_check_ins));
        record.insert("revenue".into(), json!(self.revenue));
        record
    }
}
