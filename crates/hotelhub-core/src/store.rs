//! Transport abstraction over the external record store.
//!
//! Implementations speak the store's wire protocol and nothing more:
//! they do not filter fields, normalize records or interpret row-level
//! results. That policy lives in [`crate::gateway::Gateway`].

use crate::error::HotelResult;
use crate::record::{
    DeleteRequest, FetchOneResponse, FetchResponse, FieldSelection, ListQuery, RecordId,
    WriteRequest, WriteResponse,
};

/// A CRUD client for the hosted record store, addressed by table name.
///
/// `Ok(None)` means the store answered with an empty body. Transport
/// and authentication failures are returned as errors.
pub trait RecordStore: Send + Sync {
    fn fetch_records(
        &self,
        table: &str,
        query: &ListQuery,
    ) -> impl Future<Output = HotelResult<Option<FetchResponse>>> + Send;

    fn get_record_by_id(
        &self,
        table: &str,
        id: &RecordId,
        selection: &FieldSelection,
    ) -> impl Future<Output = HotelResult<Option<FetchOneResponse>>> + Send;

    fn create_records(
        &self,
        table: &str,
        request: &WriteRequest,
    ) -> impl Future<Output = HotelResult<Option<WriteResponse>>> + Send;

    fn update_records(
        &self,
        table: &str,
        request: &WriteRequest,
    ) -> impl Future<Output = HotelResult<Option<WriteResponse>>> + Send;

    fn delete_records(
        &self,
        table: &str,
        request: &DeleteRequest,
    ) -> impl Future<Output = HotelResult<Option<WriteResponse>>> + Send;
}
