//! In-process record store.
//!
//! Implements the same wire contract as the hosted store, including
//! where-clauses, ordering and paging, so that gateways and view models
//! can be exercised without a network. Failure modes (offline, rejected
//! rows, malformed responses) can be switched on per test.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{SecondsFormat, Utc};
use hotelhub_core::error::HotelResult;
use hotelhub_core::record::{
    DeleteRequest, FetchOneResponse, FetchResponse, FieldSelection, FilterOperator, ListQuery,
    OrderBy, RawRecord, RecordId, RowResult, SortType, WhereClause, WriteRequest, WriteResponse,
};
use hotelhub_core::store::RecordStore;
use hotelhub_core::table::ROW_ID_FIELD;
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::StoreError;

/// Which store operation a call was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    Fetch,
    GetById,
    Create,
    Update,
    Delete,
}

/// One recorded call, with the request body as it would go on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreCall {
    pub op: StoreOp,
    pub table: String,
    pub body: Value,
}

#[derive(Default)]
struct State {
    tables: BTreeMap<String, Vec<RawRecord>>,
    next_id: i64,
    offline: bool,
    malformed_writes: bool,
    reject_next_rows: usize,
    calls: Vec<StoreCall>,
}

impl State {
    fn record(&mut self, op: StoreOp, table: &str, body: &impl Serialize) -> Result<(), StoreError> {
        self.calls.push(StoreCall {
            op,
            table: table.to_string(),
            body: serde_json::to_value(body)?,
        });
        if self.offline {
            return Err(StoreError::Unavailable("record store is offline".into()));
        }
        Ok(())
    }

    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    /// Insert a row, assigning `Id` and `CreatedOn` when missing.
    fn insert(&mut self, table: &str, mut row: RawRecord) -> RawRecord {
        match row.get(ROW_ID_FIELD).and_then(Value::as_i64) {
            Some(id) => self.next_id = self.next_id.max(id),
            None => {
                let id = self.allocate_id();
                row.insert(ROW_ID_FIELD.to_string(), Value::from(id));
            }
        }
        row.entry("CreatedOn").or_insert_with(timestamp);
        self.tables.entry(table.to_string()).or_default().push(row.clone());
        row
    }

    fn take_rejection(&mut self) -> bool {
        if self.reject_next_rows > 0 {
            self.reject_next_rows -= 1;
            true
        } else {
            false
        }
    }
}

/// Thread-safe in-memory [`RecordStore`].
#[derive(Default)]
pub struct MemoryRecordStore {
    state: Mutex<State>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load rows into a table without recording a call. Rows without an
    /// integer `Id` are assigned one.
    pub fn seed(&self, table: &str, rows: impl IntoIterator<Item = RawRecord>) {
        let mut state = self.state.lock();
        for row in rows {
            state.insert(table, row);
        }
    }

    /// Make every subsequent call fail with a transport error.
    pub fn set_offline(&self, offline: bool) {
        self.state.lock().offline = offline;
    }

    /// Reject the next `n` rows submitted to create or update.
    pub fn reject_next_rows(&self, n: usize) {
        self.state.lock().reject_next_rows = n;
    }

    /// Answer writes with a response that has no `results`.
    pub fn set_malformed_writes(&self, malformed: bool) {
        self.state.lock().malformed_writes = malformed;
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.state.lock().calls.clone()
    }

    pub fn calls_for(&self, op: StoreOp) -> Vec<StoreCall> {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|c| c.op == op)
            .cloned()
            .collect()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    /// Current contents of a table, in insertion order.
    pub fn rows(&self, table: &str) -> Vec<RawRecord> {
        self.state
            .lock()
            .tables
            .get(table)
            .cloned()
            .unwrap_or_default()
    }
}

impl RecordStore for MemoryRecordStore {
    async fn fetch_records(
        &self,
        table: &str,
        query: &ListQuery,
    ) -> HotelResult<Option<FetchResponse>> {
        let mut state = self.state.lock();
        state.record(StoreOp::Fetch, table, query)?;

        let mut rows: Vec<RawRecord> = state
            .tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| query.where_clauses.iter().all(|c| matches_clause(row, c)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        rows.sort_by(|a, b| compare_rows(a, b, &query.order_by));

        let rows: Vec<RawRecord> = match query.paging {
            Some(paging) => rows
                .into_iter()
                .skip(paging.offset as usize)
                .take(paging.limit as usize)
                .collect(),
            None => rows,
        };

        debug!(table, rows = rows.len(), "Memory store fetch");

        Ok(Some(FetchResponse {
            data: Some(rows.iter().map(|r| project(r, &query.fields)).collect()),
        }))
    }

    async fn get_record_by_id(
        &self,
        table: &str,
        id: &RecordId,
        selection: &FieldSelection,
    ) -> HotelResult<Option<FetchOneResponse>> {
        let mut state = self.state.lock();
        state.record(StoreOp::GetById, table, selection)?;

        let row = state
            .tables
            .get(table)
            .and_then(|rows| rows.iter().find(|r| row_has_id(r, id)));

        Ok(row.map(|r| FetchOneResponse {
            data: Some(project(r, &selection.fields)),
        }))
    }

    async fn create_records(
        &self,
        table: &str,
        request: &WriteRequest,
    ) -> HotelResult<Option<WriteResponse>> {
        let mut state = self.state.lock();
        state.record(StoreOp::Create, table, request)?;
        if state.malformed_writes {
            return Ok(Some(malformed()));
        }

        let mut results = Vec::with_capacity(request.records.len());
        for record in &request.records {
            if state.take_rejection() {
                results.push(RowResult::rejected("Row rejected by record store"));
                continue;
            }
            let mut row = record.clone();
            row.remove(ROW_ID_FIELD);
            results.push(RowResult::accepted(state.insert(table, row)));
        }

        Ok(Some(WriteResponse {
            success: true,
            results: Some(results),
        }))
    }

    async fn update_records(
        &self,
        table: &str,
        request: &WriteRequest,
    ) -> HotelResult<Option<WriteResponse>> {
        let mut state = self.state.lock();
        state.record(StoreOp::Update, table, request)?;
        if state.malformed_writes {
            return Ok(Some(malformed()));
        }

        let mut results = Vec::with_capacity(request.records.len());
        for record in &request.records {
            if state.take_rejection() {
                results.push(RowResult::rejected("Row rejected by record store"));
                continue;
            }
            let Some(id) = record.get(ROW_ID_FIELD).and_then(RecordId::from_value) else {
                results.push(RowResult::rejected("Id is required"));
                continue;
            };
            let existing = state
                .tables
                .get_mut(table)
                .and_then(|rows| rows.iter_mut().find(|r| row_has_id(r, &id)));
            match existing {
                Some(row) => {
                    for (key, value) in record {
                        if key != ROW_ID_FIELD {
                            row.insert(key.clone(), value.clone());
                        }
                    }
                    row.insert("ModifiedOn".to_string(), timestamp());
                    results.push(RowResult::accepted(row.clone()));
                }
                None => results.push(RowResult::rejected(format!("Record {id} not found"))),
            }
        }

        Ok(Some(WriteResponse {
            success: true,
            results: Some(results),
        }))
    }

    async fn delete_records(
        &self,
        table: &str,
        request: &DeleteRequest,
    ) -> HotelResult<Option<WriteResponse>> {
        let mut state = self.state.lock();
        state.record(StoreOp::Delete, table, request)?;
        if state.malformed_writes {
            return Ok(Some(malformed()));
        }

        let rows = state.tables.entry(table.to_string()).or_default();
        let results = request
            .record_ids
            .iter()
            .map(|id| match rows.iter().position(|r| row_has_id(r, id)) {
                Some(index) => {
                    rows.remove(index);
                    RowResult {
                        success: true,
                        ..RowResult::default()
                    }
                }
                None => RowResult::rejected(format!("Record {id} not found")),
            })
            .collect();

        Ok(Some(WriteResponse {
            success: true,
            results: Some(results),
        }))
    }
}

fn timestamp() -> Value {
    Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true))
}

fn malformed() -> WriteResponse {
    WriteResponse {
        success: true,
        results: None,
    }
}

fn row_has_id(row: &RawRecord, id: &RecordId) -> bool {
    row.get(ROW_ID_FIELD).is_some_and(|v| id.matches(v))
}

/// Keep the requested fields plus the row id. An empty list keeps all.
fn project(row: &RawRecord, fields: &[String]) -> RawRecord {
    if fields.is_empty() {
        return row.clone();
    }
    row.iter()
        .filter(|(key, _)| key.as_str() == ROW_ID_FIELD || fields.iter().any(|f| f == *key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn matches_clause(row: &RawRecord, clause: &WhereClause) -> bool {
    let field = row.get(&clause.field_name).unwrap_or(&Value::Null);
    let mut values = clause.values.iter();

    match clause.operator {
        FilterOperator::EqualTo => values.any(|v| as_text(field) == as_text(v)),
        FilterOperator::NotEqualTo => !values.any(|v| as_text(field) == as_text(v)),
        FilterOperator::Contains => {
            let haystack = as_text(field).to_lowercase();
            values.any(|v| haystack.contains(&as_text(v).to_lowercase()))
        }
        FilterOperator::GreaterThan => values.any(|v| compare_values(field, v) == Ordering::Greater),
        FilterOperator::LessThan => values.any(|v| compare_values(field, v) == Ordering::Less),
    }
}

/// Nulls sort first; numbers compare numerically; anything else as text.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .zip(y.as_f64())
            .and_then(|(x, y)| x.partial_cmp(&y))
            .unwrap_or(Ordering::Equal),
        _ => as_text(a).cmp(&as_text(b)),
    }
}

/// Apply the sort keys in order, then break ties by row id in the
/// direction of the first key so that later inserts stay "newer".
fn compare_rows(a: &RawRecord, b: &RawRecord, order: &[OrderBy]) -> Ordering {
    let null = Value::Null;
    let get = |row: &RawRecord, field: &str| -> Value { row.get(field).unwrap_or(&null).clone() };

    for key in order {
        let ordering = compare_values(&get(a, &key.field_name), &get(b, &key.field_name));
        let ordering = match key.sort_type {
            SortType::Asc => ordering,
            SortType::Desc => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    let by_id = compare_values(&get(a, ROW_ID_FIELD), &get(b, ROW_ID_FIELD));
    match order.first().map(|k| k.sort_type) {
        Some(SortType::Desc) => by_id.reverse(),
        _ => by_id,
    }
}
