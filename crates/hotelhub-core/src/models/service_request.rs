//! Service request domain model.
//!
//! Service requests are guest-facing tasks (housekeeping, room service,
//! technical support) tracked until staff mark them completed.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::models::{Entity, EntityKind};
use crate::record::{RawRecord, RecordId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Pending,
    Completed,
}

impl ServiceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceStatus::Pending => "pending",
            ServiceStatus::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequest {
    pub record_id: Option<RecordId>,
    /// Request number (e.g. `SR-1023`).
    pub id: String,
    /// Room number the request is for.
    pub room: String,
    /// Service category (e.g. `Housekeeping`).
    #[serde(rename = "type")]
    pub service_type: String,
    pub guest: String,
    pub priority: Priority,
    /// Display string, e.g. `10:15 AM`.
    pub requested_time: String,
    pub status: ServiceStatus,
}

impl Entity for ServiceRequest {
    const KIND: EntityKind = EntityKind::ServiceRequest;

    fn id(&self) -> &str {
        &self.id
    }

    fn record_id(&self) -> Option<&RecordId> {
        self.record_id.as_ref()
    }

    fn search_keys(&self) -> [&str; 3] {
        [
            self.id.as_str(),
            self.guest.as_str(),
            self.service_type.as_str(),
        ]
    }

    fn to_write_record(&self) -> RawRecord {
        let mut record = RawRecord::new();
        if let Some(id) = &self.record_id {
            record.insert("Id".into(), id.to_value());
        }
        record.insert("Name".into(), json!(self.id));
        record.insert("request_number".into(), json!(self.id));
        record.insert("room_number".into(), json!(self.room));
        record.insert("service_type".into(), json!(self.service_type));
        record.insert("guest_name".into(), json!(self.guest));
        record.insert("priority".into(), json!(self.priority.as_str()));
        record.insert("requested_time".into(), json!(self.requested_time));
        record.insert("status".into(), json!(self.status.as_str()));
        record
    }
}
