//! Service request create and completion.

use std::sync::Arc;

use chrono::Local;
use hotelhub_core::Entity;
use hotelhub_core::error::{FieldErrors, GatewayOp, HotelResult};
use hotelhub_core::models::{ServiceRequest, ServiceStatus};
use hotelhub_core::store::RecordStore;
use rand::Rng;
use tracing::info;

use super::{echoed_row_id, invalid, reload, reload_stats, report};
use crate::busy::{BusyFlag, BusySet};
use crate::error::WorkflowError;
use crate::forms::{FormState, ServiceRequestForm};
use crate::notify::{Notification, Notifier};
use crate::view_model::{CollectionViewModel, StatsViewModel};

const ENTITY: &str = "service request";

/// `SR-` followed by four random digits.
pub fn request_number() -> String {
    format!("SR-{:04}", rand::rng().random_range(0..10_000))
}

/// Local wall-clock time as shown on the request list, e.g. `09:05 AM`.
pub fn requested_time_now() -> String {
    Local::now().format("%I:%M %p").to_string()
}

/// Owns the service request form and the create/complete triggers.
///
/// Both triggers also refresh the stats snapshot, whose pending-service
/// count depends on the request list.
pub struct ServiceRequestWorkflow<S> {
    requests: Arc<CollectionViewModel<ServiceRequest, S>>,
    stats: Arc<StatsViewModel<S>>,
    notifier: Arc<dyn Notifier>,
    form: FormState<ServiceRequestForm>,
    submitting: BusyFlag,
    completing: BusySet,
}

impl<S: RecordStore> ServiceRequestWorkflow<S> {
    pub fn new(
        requests: Arc<CollectionViewModel<ServiceRequest, S>>,
        stats: Arc<StatsViewModel<S>>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            requests,
            stats,
            notifier,
            form: FormState::default(),
            submitting: BusyFlag::default(),
            completing: BusySet::default(),
        }
    }

    pub fn form(&self) -> ServiceRequestForm {
        self.form.form()
    }

    /// Apply an edit to the form. Editing a field clears its error.
    pub fn edit(&self, apply: impl FnOnce(&mut ServiceRequestForm)) {
        self.form.edit(apply);
    }

    pub fn field_errors(&self) -> FieldErrors {
        self.form.errors()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.is_busy()
    }

    pub fn is_completing(&self, id: &str) -> bool {
        self.completing.contains(id)
    }

    /// Validate the form and create a pending request stamped with the
    /// current local time.
    pub async fn submit(&self) -> HotelResult<ServiceRequest> {
        let Some(_submitting) = self.submitting.try_acquire() else {
            return Err(WorkflowError::InFlight { entity: ENTITY }.into());
        };

        let valid = match self.form().validate() {
            Ok(valid) => valid,
            Err(errors) => {
                self.form.set_errors(errors.clone());
                return Err(invalid(self.notifier.as_ref(), errors));
            }
        };
        self.form.clear_errors();

        let mut request = ServiceRequest {
            record_id: None,
            id: request_number(),
            room: valid.room,
            service_type: valid.service_type,
            guest: valid.guest,
            priority: valid.priority,
            requested_time: requested_time_now(),
            status: ServiceStatus::Pending,
        };

        let created = self
            .requests
            .gateway()
            .create(request.to_write_record())
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
        request.record_id = echoed_row_id(row);

        reload(&self.requests).await;
        reload_stats(&self.stats).await;
        self.form.reset();
        info!(id = %request.id, room = %request.room, "Service request created");
        self.notifier
            .notify(Notification::success("Service request created successfully"));

        Ok(request)
    }

    /// Mark the held request `id` completed, then reload the request list
    /// and the stats snapshot.
    pub async fn complete(&self, id: &str) -> HotelResult<()> {
        let Some(request) = self.requests.find(id).filter(|r| r.record_id.is_some()) else {
            self.notifier
                .notify(Notification::error("Service request not found"));
            return Err(WorkflowError::UnknownRow {
                entity: ENTITY,
                id: id.to_string(),
            }
            .into());
        };

        let Some(_completing) = self.completing.try_acquire(id) else {
            return Err(WorkflowError::InFlight { entity: ENTITY }.into());
        };

        let completed = ServiceRequest {
            status: ServiceStatus::Completed,
            ..request
        };
        let updated = self
            .requests
            .gateway()
            .update(completed.to_write_record())
            .await
            .map_err(|e| report(self.notifier.as_ref(), e))?;

        if updated.is_empty() {
            return Err(report(
                self.notifier.as_ref(),
                WorkflowError::NothingAccepted {
                    operation: GatewayOp::Update,
                    entity: ENTITY,
                },
            ));
        }

        reload(&self.requests).await;
        reload_stats(&self.stats).await;
        info!(id, "Service request completed");
        self.notifier.notify(Notification::success(format!(
            "Service request #{id} completed successfully"
        )));
        Ok(())
    }
}
