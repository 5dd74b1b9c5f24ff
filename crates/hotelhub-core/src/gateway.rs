//! Record gateway: per-entity CRUD over an injected [`RecordStore`].
//!
//! The gateway owns the write policy (allow-list filtering, list-field
//! joining, partial-failure handling) and wraps every transport failure
//! in [`HotelError::Remote`]. It never talks to the user; callers decide
//! what to surface.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{GatewayOp, HotelError, HotelResult, PartialWriteError};
use crate::models::{Entity, HotelStats};
use crate::record::{
    DeleteRequest, FieldSelection, ListQuery, RawRecord, RecordId, RecordIds, RowResult,
    SortType, WriteRequest, WriteResponse,
};
use crate::store::RecordStore;
use crate::table::TableSpec;

/// Gateway for the table backing entity `E`.
pub struct Gateway<E, S> {
    store: Arc<S>,
    _entity: PhantomData<fn() -> E>,
}

impl<E, S> Clone for Gateway<E, S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity, S: RecordStore> Gateway<E, S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    pub fn table(&self) -> &'static TableSpec {
        E::KIND.table()
    }

    /// Fetch rows, optionally filtered, sorted and paged. The field list
    /// is always the table's full read list.
    pub async fn list(&self, filter: Option<ListQuery>) -> HotelResult<Vec<RawRecord>> {
        let table = self.table();
        let mut query = filter.unwrap_or_default();
        query.fields = table.read_fields();

        debug!(table = table.name, clauses = query.where_clauses.len(), "Listing records");

        let response = self
            .store
            .fetch_records(table.name, &query)
            .await
            .map_err(|e| remote(GatewayOp::List, table, e))?;

        let rows = response.and_then(|r| r.data).unwrap_or_default();
        debug!(table = table.name, rows = rows.len(), "Listed records");
        Ok(rows)
    }

    /// Fetch one row by store id. A missing row is `Ok(None)`.
    pub async fn get_by_id(&self, id: &RecordId) -> HotelResult<Option<RawRecord>> {
        let table = self.table();
        let selection = FieldSelection {
            fields: table.read_fields(),
        };

        debug!(table = table.name, %id, "Fetching record");

        let response = self
            .store
            .get_record_by_id(table.name, id, &selection)
            .await
            .map_err(|e| remote(GatewayOp::GetById, table, e))?;

        Ok(response.and_then(|r| r.data))
    }

    /// Create one record. Returns the rows the store accepted.
    pub async fn create(&self, payload: RawRecord) -> HotelResult<Vec<RawRecord>> {
        let table = self.table();
        let request = WriteRequest {
            records: vec![table.write_payload(&payload, false)],
        };

        debug!(table = table.name, "Creating record");

        let response = self
            .store
            .create_records(table.name, &request)
            .await
            .map_err(|e| remote(GatewayOp::Create, table, e))?;

        let accepted = accepted_rows(GatewayOp::Create, table, response)?;
        Ok(accepted
            .into_iter()
            .map(|row| row.data.unwrap_or_default())
            .collect())
    }

    /// Update one record identified by its `Id` (or `id`) field. Returns
    /// the rows the store accepted.
    pub async fn update(&self, payload: RawRecord) -> HotelResult<Vec<RawRecord>> {
        let table = self.table();
        let request = WriteRequest {
            records: vec![table.write_payload(&payload, true)],
        };

        debug!(table = table.name, "Updating record");

        let response = self
            .store
            .update_records(table.name, &request)
            .await
            .map_err(|e| remote(GatewayOp::Update, table, e))?;

        let accepted = accepted_rows(GatewayOp::Update, table, response)?;
        Ok(accepted
            .into_iter()
            .map(|row| row.data.unwrap_or_default())
            .collect())
    }

    /// Delete one or more rows. Returns how many the store deleted.
    pub async fn delete(&self, ids: impl Into<RecordIds>) -> HotelResult<usize> {
        let table = self.table();
        let request = DeleteRequest {
            record_ids: ids.into().0,
        };

        debug!(table = table.name, count = request.record_ids.len(), "Deleting records");

        let response = self
            .store
            .delete_records(table.name, &request)
            .await
            .map_err(|e| remote(GatewayOp::Delete, table, e))?;

        Ok(accepted_rows(GatewayOp::Delete, table, response)?.len())
    }
}

impl<S: RecordStore> Gateway<HotelStats, S> {
    /// The most recently created stats record, if any.
    pub async fn latest(&self) -> HotelResult<Option<RawRecord>> {
        let query = ListQuery::new()
            .order_by("CreatedOn", SortType::Desc)
            .page(1, 0);
        Ok(self.list(Some(query)).await?.into_iter().next())
    }
}

fn remote(operation: GatewayOp, table: &TableSpec, cause: impl fmt::Display) -> HotelError {
    HotelError::Remote {
        operation,
        entity: table.entity.to_string(),
        cause: cause.to_string(),
    }
}

/// Split a write response into accepted rows, logging rejected ones.
///
/// A missing response, a false `success` flag or missing `results` is a
/// structural failure of the whole call.
fn accepted_rows(
    operation: GatewayOp,
    table: &TableSpec,
    response: Option<WriteResponse>,
) -> HotelResult<Vec<RowResult>> {
    let response =
        response.ok_or_else(|| remote(operation, table, "record store returned no response"))?;
    if !response.success {
        return Err(remote(operation, table, "record store reported failure"));
    }
    let results = response
        .results
        .ok_or_else(|| remote(operation, table, "record store returned no results"))?;

    let (accepted, rejected): (Vec<_>, Vec<_>) = results.into_iter().partition(|r| r.success);

    if !rejected.is_empty() {
        let partial = PartialWriteError {
            operation,
            entity: table.entity,
            accepted: accepted.len(),
            rejected: rejected.len(),
            messages: rejected
                .iter()
                .map(|r| r.message.clone().unwrap_or_else(|| "no reason given".into()))
                .collect(),
        };
        warn!(table = table.name, error = %partial, "Record store rejected rows");
    }

    Ok(accepted)
}
