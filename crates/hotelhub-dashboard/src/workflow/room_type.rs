//! Room type create and update.

use std::sync::Arc;

use hotelhub_core::Entity;
use hotelhub_core::error::{FieldErrors, GatewayOp, HotelResult};
use hotelhub_core::models::RoomType;
use hotelhub_core::store::RecordStore;
use tracing::info;

use super::{echoed_row_id, invalid, reload, report};
use crate::busy::BusyFlag;
use crate::error::WorkflowError;
use crate::forms::{FormState, RoomTypeForm};
use crate::notify::{Notification, Notifier};
use crate::view_model::CollectionViewModel;

const ENTITY: &str = "room type";

/// Owns the room type editor. A form opened from a held room type saves
/// as an update; a blank form saves as a create.
pub struct RoomTypeWorkflow<S> {
    room_types: Arc<CollectionViewModel<RoomType, S>>,
    notifier: Arc<dyn Notifier>,
    form: FormState<RoomTypeForm>,
    saving: BusyFlag,
}

impl<S: RecordStore> RoomTypeWorkflow<S> {
    pub fn new(
        room_types: Arc<CollectionViewModel<RoomType, S>>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            room_types,
            notifier,
            form: FormState::default(),
            saving: BusyFlag::default(),
        }
    }

    /// Load an existing room type into the editor.
    pub fn open(&self, room: &RoomType) {
        self.form.replace(RoomTypeForm::from(room));
    }

    pub fn form(&self) -> RoomTypeForm {
        self.form.form()
    }

    /// Apply an edit to the form. Editing a field clears its error.
    pub fn edit(&self, apply: impl FnOnce(&mut RoomTypeForm)) {
        self.form.edit(apply);
    }

    pub fn field_errors(&self) -> FieldErrors {
        self.form.errors()
    }

    pub fn is_saving(&self) -> bool {
        self.saving.is_busy()
    }

    /// Create the room type, or update it when the form carries a row id.
    /// The editor is cleared once the store accepts the row.
    pub async fn save(&self) -> HotelResult<RoomType> {
        let Some(_saving) = self.saving.try_acquire() else {
            return Err(WorkflowError::InFlight { entity: ENTITY }.into());
        };

        let mut room = match self.form().validate() {
            Ok(room) => room,
            Err(errors) => {
                self.form.set_errors(errors.clone());
                return Err(invalid(self.notifier.as_ref(), errors));
            }
        };
        self.form.clear_errors();

        let gateway = self.room_types.gateway();
        let (operation, written) = match room.record_id {
            Some(_) => (GatewayOp::Update, gateway.update(room.to_write_record()).await),
            None => (GatewayOp::Create, gateway.create(room.to_write_record()).await),
        };
        let written = written.map_err(|e| report(self.notifier.as_ref(), e))?;

        let Some(row) = written.first() else {
            return Err(report(
                self.notifier.as_ref(),
                WorkflowError::NothingAccepted {
                    operation,
                    entity: ENTITY,
                },
            ));
        };
        if let Some(record_id) = echoed_row_id(row) {
            room.record_id = Some(record_id);
        }

        reload(&self.room_types).await;
        self.form.reset();
        info!(id = %room.id, %operation, "Room type saved");
        self.notifier
            .notify(Notification::success("Room type saved successfully"));
        Ok(room)
    }
}
