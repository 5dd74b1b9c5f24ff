//! Table definitions: field lists and write allow-lists per entity.

use serde_json::Value;

use crate::record::RawRecord;

/// Audit fields the store maintains itself; readable, never written.
pub const READ_ONLY_AUDIT_FIELDS: &[&str] = &["CreatedOn", "CreatedBy", "ModifiedOn", "ModifiedBy"];

/// Audit fields every table accepts on write.
pub const WRITABLE_AUDIT_FIELDS: &[&str] = &["Name", "Tags", "Owner"];

/// Key carrying the store's internal row id.
pub const ROW_ID_FIELD: &str = "Id";

/// Delimiter used to flatten list-typed fields for transmission.
pub const LIST_DELIMITER: char = ',';

/// Static description of one record-store table.
#[derive(Debug, PartialEq, Eq)]
pub struct TableSpec {
    /// Table name on the record store.
    pub name: &'static str,
    /// Human-readable entity name for logs and error messages.
    pub entity: &'static str,
    /// Entity-specific fields accepted on create/update, in addition to
    /// [`WRITABLE_AUDIT_FIELDS`].
    pub fields: &'static [&'static str],
    /// Fields that are sequences in memory but delimited strings on the
    /// wire.
    pub list_fields: &'static [&'static str],
}

impl TableSpec {
    /// Every field requested on list and get-by-id calls.
    pub fn read_fields(&self) -> Vec<String> {
        WRITABLE_AUDIT_FIELDS
            .iter()
            .chain(READ_ONLY_AUDIT_FIELDS)
            .chain(self.fields)
            .map(|f| (*f).to_string())
            .collect()
    }

    pub fn is_writable(&self, field: &str) -> bool {
        WRITABLE_AUDIT_FIELDS.contains(&field) || self.fields.contains(&field)
    }

    fn is_list_field(&self, field: &str) -> bool {
        field == "Tags" || self.list_fields.contains(&field)
    }

    /// Reduce a payload to the allow-list, dropping null values and
    /// joining list-typed fields.
    ///
    /// With `with_row_id`, the row id is carried over from `Id`, falling
    /// back to `id`.
    pub fn write_payload(&self, payload: &RawRecord, with_row_id: bool) -> RawRecord {
        let mut out = RawRecord::new();

        if with_row_id {
            let row_id = [ROW_ID_FIELD, "id"]
                .iter()
                .filter_map(|key| payload.get(*key))
                .find(|v| !v.is_null());
            if let Some(id) = row_id {
                out.insert(ROW_ID_FIELD.to_string(), id.clone());
            }
        }

        for (key, value) in payload {
            if value.is_null() || !self.is_writable(key) {
                continue;
            }
            let value = match value {
                Value::Array(items) if self.is_list_field(key) => Value::String(join_list(items)),
                other => other.clone(),
            };
            out.insert(key.clone(), value);
        }

        out
    }
}

fn join_list(items: &[Value]) -> String {
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        })
        .collect::<Vec<_>>()
        .join(&LIST_DELIMITER.to_string())
}

pub static ROOM_TYPE: TableSpec = TableSpec {
    name: "room_type",
    entity: "room type",
    fields: &[
        "id",
        "capacity",
        "price",
        "availability",
        "description",
        "amenities",
    ],
    list_fields: &["amenities"],
};

pub static RESERVATION: TableSpec = TableSpec {
    name: "reservation",
    entity: "reservation",
    fields: &[
        "reservation_number",
        "guest_name",
        "check_in_date",
        "check_out_date",
        "guests_count",
        "status",
        "total_amount",
        "special_requests",
        "room_type",
    ],
    list_fields: &[],
};

pub static SERVICE_REQUEST: TableSpec = TableSpec {
    name: "service_request",
    entity: "service request",
    fields: &[
        "request_number",
        "room_number",
        "service_type",
        "guest_name",
        "priority",
        "requested_time",
        "status",
    ],
    list_fields: &[],
};

pub static HOTEL_STATS: TableSpec = TableSpec {
    name: "hotel_stats",
    entity: "hotel stats",
    fields: &[
        "occupancy_rate",
        "available_rooms",
        "pending_services",
        "upcoming_check_ins",
        "revenue",
    ],
    list_fields: &[],
};
