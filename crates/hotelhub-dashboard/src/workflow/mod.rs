//! Mutation workflows: validate, derive, write through the gateway and
//! reload the owning view-model.
//!
//! No workflow patches held data locally; every success is followed by
//! a full reload.

mod reservation;
mod room_type;
mod service_request;

pub use reservation::ReservationWorkflow;
pub use room_type::RoomTypeWorkflow;
pub use service_request::ServiceRequestWorkflow;

use hotelhub_core::Entity;
use hotelhub_core::error::{FieldErrors, HotelError};
use hotelhub_core::record::{RawRecord, RecordId};
use hotelhub_core::store::RecordStore;
use hotelhub_core::table::ROW_ID_FIELD;
use tracing::warn;

use crate::error::WorkflowError;
use crate::notify::{Notification, Notifier};
use crate::view_model::{CollectionViewModel, StatsViewModel};

pub(crate) const FORM_ERRORS_MESSAGE: &str = "Please correct the errors in the form";

/// Raise an error notification for `err` and return it.
pub(crate) fn report(notifier: &dyn Notifier, err: impl Into<HotelError>) -> HotelError {
    let err = err.into();
    notifier.notify(Notification::error(err.to_string()));
    err
}

/// Raise the generic form notification and turn `errors` into an error.
pub(crate) fn invalid(notifier: &dyn Notifier, errors: FieldErrors) -> HotelError {
    notifier.notify(Notification::error(FORM_ERRORS_MESSAGE));
    WorkflowError::Invalid(errors).into()
}

/// Store row id echoed back by a write. Only the id is taken from the
/// echo; the rest of the returned entity is derived locally.
pub(crate) fn echoed_row_id(row: &RawRecord) -> Option<RecordId> {
    row.get(ROW_ID_FIELD).and_then(RecordId::from_value)
}

/// Reload after a successful write, after any load already in flight.
/// A failed reload has already been surfaced by the view-model, so it
/// only gets logged here.
pub(crate) async fn reload<E: Entity, S: RecordStore>(view: &CollectionViewModel<E, S>) {
    if let Err(err) = view.refresh().await {
        warn!(entity = E::KIND.name(), error = %err, "Reload after write failed");
    }
}

pub(crate) async fn reload_stats<S: RecordStore>(stats: &StatsViewModel<S>) {
    if let Err(err) = stats.refresh().await {
        warn!(error = %err, "Stats reload after write failed");
    }
}
