//! Reservation create and cancel.

use std::sync::Arc;

use hotelhub_core::Entity;
use hotelhub_core::error::{FieldErrors, GatewayOp, HotelResult};
use hotelhub_core::models::{Reservation, ReservationStatus, RoomType};
use hotelhub_core::store::RecordStore;
use rand::Rng;
use tracing::info;

use super::{echoed_row_id, invalid, reload, report};
use crate::busy::{BusyFlag, BusySet};
use crate::error::WorkflowError;
use crate::forms::{FormState, ReservationForm};
use crate::notify::{Notification, Notifier};
use crate::view_model::CollectionViewModel;

const ENTITY: &str = "reservation";

/// `RSV` followed by six random digits.
pub fn reservation_number() -> String {
    format!("RSV{}", rand::rng().random_range(100_000..1_000_000))
}

/// Owns the reservation form and the create/cancel triggers.
pub struct ReservationWorkflow<S> {
    reservations: Arc<CollectionViewModel<Reservation, S>>,
    room_types: Arc<CollectionViewModel<RoomType, S>>,
    notifier: Arc<dyn Notifier>,
    form: FormState<ReservationForm>,
    submitting: BusyFlag,
    cancelling: BusySet,
}

impl<S: RecordStore> ReservationWorkflow<S> {
    pub fn new(
        reservations: Arc<CollectionViewModel<Reservation, S>>,
        room_types: Arc<CollectionViewModel<RoomType, S>>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            reservations,
            room_types,
            notifier,
            form: FormState::default(),
            submitting: BusyFlag::default(),
            cancelling: BusySet::default(),
        }
    }

    pub fn form(&self) -> ReservationForm {
        self.form.form()
    }

    /// Apply an edit to the form. Editing a field clears its error.
    pub fn edit(&self, apply: impl FnOnce(&mut ReservationForm)) {
        self.form.edit(apply);
    }

    pub fn field_errors(&self) -> FieldErrors {
        self.form.errors()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.is_busy()
    }

    /// Whether a cancel is in flight for the reservation `id`.
    pub fn is_cancelling(&self, id: &str) -> bool {
        self.cancelling.contains(id)
    }

    /// Validate the form, create the reservation and reload the list.
    ///
    /// The form is reset only when the store accepted the new row.
    pub async fn submit(&self) -> HotelResult<Reservation> {
        let Some(_submitting) = self.submitting.try_acquire() else {
            return Err(WorkflowError::InFlight { entity: ENTITY }.into());
        };

        // 1. Validate every field against the loaded room types.
        let form = self.form();
        let valid = match form.validate(&self.room_types.items()) {
            Ok(valid) => valid,
            Err(errors) => {
                self.form.set_errors(errors.clone());
                return Err(invalid(self.notifier.as_ref(), errors));
            }
        };
        self.form.clear_errors();

        // 2. Derive the stored fields.
        let mut reservation = Reservation {
            record_id: None,
            id: reservation_number(),
            guest_name: valid.guest_name.clone(),
            room_type: valid.room.name.clone(),
            check_in: Some(valid.check_in),
            check_out: Some(valid.check_out),
            guests: valid.guests,
            status: ReservationStatus::Confirmed,
            total_amount: valid.total_amount(),
            special_requests: valid.special_requests.clone(),
        };

        // 3. Write.
        let created = self
            .reservations
            .gateway()
            .create(reservation.to_write_record())
            .await
            .map_err(|e| report(self.notifier.as_ref(), e))?;

        let Some(row) = created.first() else {
            return Err(report(
                self.notifier.as_ref(),
                WorkflowError::NothingAccepted {
                    operation: GatewayOp::Create,
                    entity: ENTITY,
                },
            ));
        };

        // 4. Reload, reset, confirm.
        reservation.record_id = echoed_row_id(row);

        reload(&self.reservations).await;
        self.form.reset();
        info!(id = %reservation.id, total = reservation.total_amount, "Reservation created");
        self.notifier
            .notify(Notification::success("Reservation created successfully!"));

        Ok(reservation)
    }

    /// Delete the held reservation with business id `id`, then reload.
    ///
    /// The row keeps a busy marker until the reload finishes.
    pub async fn cancel(&self, id: &str) -> HotelResult<()> {
        // 1. Resolve the display id to the store row id.
        let Some(record_id) = self
            .reservations
            .find(id)
            .and_then(|r| r.record_id.clone())
        else {
            self.notifier
                .notify(Notification::error("Reservation not found"));
            return Err(WorkflowError::UnknownRow {
                entity: ENTITY,
                id: id.to_string(),
            }
            .into());
        };

        let Some(_cancelling) = self.cancelling.try_acquire(id) else {
            return Err(WorkflowError::InFlight { entity: ENTITY }.into());
        };

        // 2. Delete.
        let deleted = self
            .reservations
            .gateway()
            .delete(&record_id)
            .await
            .map_err(|e| report(self.notifier.as_ref(), e))?;

        if deleted == 0 {
            return Err(report(
                self.notifier.as_ref(),
                WorkflowError::NothingAccepted {
                    operation: GatewayOp::Delete,
                    entity: ENTITY,
                },
            ));
        }

        // 3. Reload before the busy marker clears.
        reload(&self.reservations).await;
        info!(id, "Reservation cancelled");
        self.notifier
            .notify(Notification::success("Reservation cancelled successfully"));
        Ok(())
    }
}
