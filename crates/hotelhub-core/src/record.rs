//! Wire-level types exchanged with the record store.
//!
//! Raw records are untyped JSON objects; request and response envelopes
//! mirror the store's JSON shapes exactly, including its mixed key
//! casing (`orderBy`, `SortType`, `RecordIds`).

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A record as returned by (or sent to) the record store, before
/// normalization.
pub type RawRecord = serde_json::Map<String, Value>;

/// The store's internal row identifier.
///
/// The hosted store uses integer ids; string ids are accepted so that
/// business identifiers can stand in when no row id is known.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl RecordId {
    /// Read an id out of a JSON value. Blank strings and non-integral
    /// numbers are not ids.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(RecordId::Int),
            Value::String(s) if !s.trim().is_empty() => Some(RecordId::Text(s.trim().to_string())),
            _ => None,
        }
    }

    /// Compare against a raw `Id` value, treating `7` and `"7"` as equal.
    pub fn matches(&self, value: &Value) -> bool {
        RecordId::from_value(value).is_some_and(|other| other.to_string() == self.to_string())
    }

    pub fn to_value(&self) -> Value {
        match self {
            RecordId::Int(n) => Value::from(*n),
            RecordId::Text(s) => Value::from(s.clone()),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(n) => write!(f, "{n}"),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        RecordId::Int(id)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        RecordId::Text(id.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        RecordId::Text(id)
    }
}

/// One or more record ids, so that delete accepts either uniformly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordIds(pub Vec<RecordId>);

impl From<RecordId> for RecordIds {
    fn from(id: RecordId) -> Self {
        RecordIds(vec![id])
    }
}

impl From<&RecordId> for RecordIds {
    fn from(id: &RecordId) -> Self {
        RecordIds(vec![id.clone()])
    }
}

impl From<Vec<RecordId>> for RecordIds {
    fn from(ids: Vec<RecordId>) -> Self {
        RecordIds(ids)
    }
}

impl From<&[RecordId]> for RecordIds {
    fn from(ids: &[RecordId]) -> Self {
        RecordIds(ids.to_vec())
    }
}

// ---------------------------------------------------------------------------
// List queries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOperator {
    EqualTo,
    NotEqualTo,
    Contains,
    GreaterThan,
    LessThan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhereClause {
    pub field_name: String,
    pub operator: FilterOperator,
    pub values: Vec<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortType {
    #[serde(rename = "ASC")]
    Asc,
    #[serde(rename = "DESC")]
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    #[serde(rename = "fieldName")]
    pub field_name: String,
    #[serde(rename = "SortType")]
    pub sort_type: SortType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingInfo {
    pub limit: u64,
    pub offset: u64,
}

/// Filter, sort and paging specification for a list call.
///
/// `fields` is always overwritten by the gateway with the table's full
/// field list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(rename = "where", default, skip_serializing_if = "Vec::is_empty")]
    pub where_clauses: Vec<WhereClause>,
    #[serde(rename = "orderBy", default, skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<OrderBy>,
    #[serde(rename = "pagingInfo", default, skip_serializing_if = "Option::is_none")]
    pub paging: Option<PagingInfo>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(
        mut self,
        field_name: impl Into<String>,
        operator: FilterOperator,
        values: impl IntoIterator<Item = Value>,
    ) -> Self {
        self.where_clauses.push(WhereClause {
            field_name: field_name.into(),
            operator,
            values: values.into_iter().collect(),
        });
        self
    }

    pub fn order_by(mut self, field_name: impl Into<String>, sort_type: SortType) -> Self {
        self.order_by.push(OrderBy {
            field_name: field_name.into(),
            sort_type,
        });
        self
    }

    pub fn page(mut self, limit: u64, offset: u64) -> Self {
        self.paging = Some(PagingInfo { limit, offset });
        self
    }
}

// ---------------------------------------------------------------------------
// Request / response envelopes
// ---------------------------------------------------------------------------

/// `{data: [...]}` returned by a list call. `data` may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchResponse {
    #[serde(default)]
    pub data: Option<Vec<RawRecord>>,
}

/// `{data: {...}}` returned by a get-by-id call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchOneResponse {
    #[serde(default)]
    pub data: Option<RawRecord>,
}

/// `{fields: [...]}` sent with a get-by-id call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSelection {
    pub fields: Vec<String>,
}

/// `{records: [...]}` sent with create and update calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WriteRequest {
    pub records: Vec<RawRecord>,
}

/// `{RecordIds: [...]}` sent with a delete call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteRequest {
    #[serde(rename = "RecordIds")]
    pub record_ids: Vec<RecordId>,
}

/// Outcome of a single row within a write batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<RawRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RowResult {
    pub fn accepted(data: RawRecord) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

/// `{success, results: [...]}` returned by create, update and delete.
///
/// A missing `success` flag deserializes as `false`, which the gateway
/// treats as a structural failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WriteResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub results: Option<Vec<RowResult>>,
}
