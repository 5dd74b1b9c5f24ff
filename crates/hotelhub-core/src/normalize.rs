//! Raw record normalization.
//!
//! Every entity kind has a mapping table of `(canonical field, source
//! keys, default, transform)` entries evaluated uniformly by
//! [`normalize`]. Adding a field is a table change, not a code change.
//!
//! Source keys are tried in order and the first one that yields a usable
//! value wins. The canonical key is always listed first, which makes
//! normalization idempotent.

use chrono::{DateTime, NaiveDate};
use serde_json::Value;

use crate::error::{HotelError, HotelResult};
use crate::models::{Entity, EntityKind};
use crate::record::{RawRecord, RecordId};
use crate::table::LIST_DELIMITER;

/// Sentinel for required text fields missing from the raw record.
pub const UNKNOWN: &str = "Unknown";

/// How a raw value is coerced into its canonical form. `None` means the
/// value is unusable and the next source key (or the default) applies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    /// Store row id: integer or non-blank string.
    RowId,
    /// Any scalar rendered as a string. Lookup objects yield their `Name`.
    Text,
    /// Integer clamped to `[min, max]`. Numeric strings are parsed,
    /// fractions truncated.
    Integer { min: i64, max: i64 },
    /// Finite number clamped to `[min, max]`, always emitted as a float.
    Number { min: f64, max: f64 },
    /// Sequence of strings; a delimited string is split and trimmed.
    List,
    /// Calendar date emitted as `YYYY-MM-DD`.
    Date,
    /// One of a fixed set of lowercase values, matched case-insensitively.
    OneOf(&'static [&'static str]),
}

/// Value used when no source key yields a usable value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fallback {
    Null,
    Text(&'static str),
    Integer(i64),
    Number(f64),
    EmptyList,
}

impl Fallback {
    fn to_value(self) -> Value {
        match self {
            Fallback::Null => Value::Null,
            Fallback::Text(s) => Value::from(s),
            Fallback::Integer(n) => Value::from(n),
            Fallback::Number(n) => Value::from(n),
            Fallback::EmptyList => Value::Array(Vec::new()),
        }
    }
}

/// One row of an entity's mapping table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldMapping {
    pub field: &'static str,
    pub sources: &'static [&'static str],
    pub default: Fallback,
    pub transform: Transform,
}

const fn map(
    field: &'static str,
    sources: &'static [&'static str],
    default: Fallback,
    transform: Transform,
) -> FieldMapping {
    FieldMapping {
        field,
        sources,
        default,
        transform,
    }
}

const COUNT: Transform = Transform::Integer {
    min: 0,
    max: u32::MAX as i64,
};
const AMOUNT: Transform = Transform::Number {
    min: 0.0,
    max: f64::MAX,
};

const RESERVATION_STATUSES: &[&str] = &["pending", "confirmed"];
const SERVICE_STATUSES: &[&str] = &["pending", "completed"];
const PRIORITIES: &[&str] = &["low", "medium", "high"];

pub static ROOM_TYPE_FIELDS: &[FieldMapping] = &[
    map("recordId", &["recordId", "Id"], Fallback::Null, Transform::RowId),
    map("id", &["id", "Id"], Fallback::Text(UNKNOWN), Transform::Text),
    map("name", &["name", "Name"], Fallback::Text(UNKNOWN), Transform::Text),
    map(
        "capacity",
        &["capacity"],
        Fallback::Integer(1),
        Transform::Integer {
            min: 1,
            max: u32::MAX as i64,
        },
    ),
    map("price", &["price"], Fallback::Number(0.0), AMOUNT),
    map("availability", &["availability"], Fallback::Integer(0), COUNT),
    map("description", &["description"], Fallback::Text(""), Transform::Text),
    map("amenities", &["amenities"], Fallback::EmptyList, Transform::List),
];

pub static RESERVATION_FIELDS: &[FieldMapping] = &[
    map("recordId", &["recordId", "Id"], Fallback::Null, Transform::RowId),
    map(
        "id",
        &["id", "reservation_number", "Id"],
        Fallback::Text(UNKNOWN),
        Transform::Text,
    ),
    map(
        "guestName",
        &["guestName", "guest_name", "Name"],
        Fallback::Text(UNKNOWN),
        Transform::Text,
    ),
    map(
        "roomType",
        &["roomType", "room_type"],
        Fallback::Text(UNKNOWN),
        Transform::Text,
    ),
    map("checkIn", &["checkIn", "check_in_date"], Fallback::Null, Transform::Date),
    map("checkOut", &["checkOut", "check_out_date"], Fallback::Null, Transform::Date),
    map(
        "guests",
        &["guests", "guests_count"],
        Fallback::Integer(1),
        Transform::Integer { min: 1, max: 10 },
    ),
    map(
        "status",
        &["status"],
        Fallback::Text("pending"),
        Transform::OneOf(RESERVATION_STATUSES),
    ),
    map(
        "totalAmount",
        &["totalAmount", "total_amount"],
        Fallback::Number(0.0),
        AMOUNT,
    ),
    map(
        "specialRequests",
        &["specialRequests", "special_requests"],
        Fallback::Text(""),
        Transform::Text,
    ),
];

pub static SERVICE_REQUEST_FIELDS: &[FieldMapping] = &[
    map("recordId", &["recordId", "Id"], Fallback::Null, Transform::RowId),
    map(
        "id",
        &["id", "request_number", "Id"],
        Fallback::Text(UNKNOWN),
        Transform::Text,
    ),
    map("room", &["room", "room_number"], Fallback::Text(UNKNOWN), Transform::Text),
    map("type", &["type", "service_type"], Fallback::Text(UNKNOWN), Transform::Text),
    map(
        "guest",
        &["guest", "guest_name", "Name"],
        Fallback::Text(UNKNOWN),
        Transform::Text,
    ),
    map(
        "priority",
        &["priority"],
        Fallback::Text("low"),
        Transform::OneOf(PRIORITIES),
    ),
    map(
        "requestedTime",
        &["requestedTime", "requested_time"],
        Fallback::Text(""),
        Transform::Text,
    ),
    map(
        "status",
        &["status"],
        Fallback::Text("pending"),
        Transform::OneOf(SERVICE_STATUSES),
    ),
];

pub static HOTEL_STATS_FIELDS: &[FieldMapping] = &[
    map("recordId", &["recordId", "Id"], Fallback::Null, Transform::RowId),
    map("name", &["name", "Name"], Fallback::Text(""), Transform::Text),
    map(
        "occupancy",
        &["occupancy", "occupancy_rate"],
        Fallback::Number(0.0),
        Transform::Number {
            min: 0.0,
            max: 100.0,
        },
    ),
    map(
        "availableRooms",
        &["availableRooms", "available_rooms"],
        Fallback::Integer(0),
        COUNT,
    ),
    map(
        "pendingServices",
        &["pendingServices", "pending_services"],
        Fallback::Integer(0),
        COUNT,
    ),
    map(
        "upcomingCheckIns",
        &["upcomingCheckIns", "upcoming_check_ins"],
        Fallback::Integer(0),
        COUNT,
    ),
    map("revenue", &["revenue"], Fallback::Number(0.0), AMOUNT),
];

/// Map a raw store record into the canonical record shape of `kind`.
///
/// Pure and idempotent. Keys not named in the mapping table are dropped.
pub fn normalize(kind: EntityKind, raw: &RawRecord) -> RawRecord {
    kind.mappings()
        .iter()
        .map(|mapping| (mapping.field.to_string(), resolve(mapping, raw)))
        .collect()
}

/// Normalize a raw record straight into its typed entity.
pub fn normalize_entity<E: Entity>(raw: &RawRecord) -> HotelResult<E> {
    let canonical = normalize(E::KIND, raw);
    serde_json::from_value(Value::Object(canonical))
        .map_err(|e| HotelError::Normalize(format!("{}: {e}", E::KIND.name())))
}

fn resolve(mapping: &FieldMapping, raw: &RawRecord) -> Value {
    mapping
        .sources
        .iter()
        .filter_map(|key| raw.get(*key))
        .filter(|value| !value.is_null())
        .find_map(|value| apply(mapping.transform, value))
        .unwrap_or_else(|| mapping.default.to_value())
}

fn apply(transform: Transform, value: &Value) -> Option<Value> {
    match transform {
        Transform::RowId => RecordId::from_value(value).map(|id| id.to_value()),
        Transform::Text => text(value).map(Value::String),
        Transform::Integer { min, max } => integer(value).map(|n| Value::from(n.clamp(min, max))),
        Transform::Number { min, max } => number(value).map(|n| Value::from(n.clamp(min, max))),
        Transform::List => list(value).map(|items| {
            Value::Array(items.into_iter().map(Value::String).collect())
        }),
        Transform::Date => date(value).map(|d| Value::String(d.format("%Y-%m-%d").to_string())),
        Transform::OneOf(allowed) => {
            let candidate = text(value)?.trim().to_lowercase();
            allowed
                .iter()
                .find(|option| **option == candidate)
                .map(|option| Value::from(*option))
        }
    }
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        // Lookup fields arrive as `{Id, Name}` objects.
        Value::Object(obj) => obj.get("Name").and_then(Value::as_str).map(str::to_string),
        Value::Array(_) | Value::Null => None,
    }
}

fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|u| i64::try_from(u).unwrap_or(i64::MAX)))
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f.trunc() as i64)
            })
        }
        _ => None,
    }
}

fn number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

fn list(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::String(s) => Some(
            s.split(LIST_DELIMITER)
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        Value::Array(items) => Some(items.iter().filter_map(text).collect()),
        _ => None,
    }
}

fn date(value: &Value) -> Option<NaiveDate> {
    let s = value.as_str()?.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            s.get(..10)
                .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        })
}
