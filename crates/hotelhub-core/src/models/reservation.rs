//! Reservation domain model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::models::{Entity, EntityKind};
use crate::record::{RawRecord, RecordId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
}

impl ReservationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub record_id: Option<RecordId>,
    /// Reservation number, `RSV` followed by six digits.
    pub id: String,
    pub guest_name: String,
    /// Display name of the booked room type.
    pub room_type: String,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub guests: u8,
    pub status: ReservationStatus,
    pub total_amount: f64,
    pub special_requests: String,
}

impl Reservation {
    /// Number of nights between check-in and check-out, if both are set.
    pub fn nights(&self) -> Option<i64> {
        match (self.check_in, self.check_out) {
            (Some(check_in), Some(check_out)) => Some(nights_between(check_in, check_out)),
            _ => None,
        }
    }
}

/// Whole nights between two dates. Calendar dates have no time part, so
/// the day difference is already the ceiling of the elapsed days.
pub fn nights_between(check_in: NaiveDate, check_out: NaiveDate) -> i64 {
    (check_out - check_in).num_days()
}

impl Entity for Reservation {
    const KIND: EntityKind = EntityKind::Reservation;

    fn id(&self) -> &str {
        &self.id
    }

    fn record_id(&self) -> Option<&RecordId> {
        self.record_id.as_ref()
    }

    fn search_keys(&self) -> [&str; 3] {
        [
            self.id.as_str(),
            self.guest_name.as_str(),
            self.room_type.as_str(),
        ]
    }

    fn to_write_record(&self) -> RawRecord {
        let mut record = RawRecord::new();
        if let Some(id) = &self.record_id {
            record.insert("Id".into(), id.to_value());
        }
        record.insert("Name".into(), json!(self.id));
        record.insert("reservation_number".into(), json!(self.id));
        record.insert("guest_name".into(), json!(self.guest_name));
        record.insert("room_type".into(), json!(self.room_type));
        record.insert(
            "check_in_date".into(),
            json!(self.check_in.map(|d| d.to_string())),
        );
        record.insert(
            "check_out_date".into(),
            json!(self.check_out.map(|d| d.to_string())),
        );
        record.insert("guests_count".into(), json!(self.guests));
        record.insert("status".into(), json!(self.status.as_str()));
        record.insert("total_amount".into(), json!(self.total_amount));
        record.insert("special_requests".into(), json!(self.special_requests));
        record
    }
}
