//! Workflow error types.

use hotelhub_core::error::{FieldErrors, GatewayOp, HotelError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("form has {} invalid field(s)", .0.len())]
    Invalid(FieldErrors),

    #[error("{entity} not found: {id}")]
    UnknownRow { entity: &'static str, id: String },

    #[error("a {entity} request is already in progress")]
    InFlight { entity: &'static str },

    #[error("record store accepted no {entity} rows")]
    NothingAccepted {
        operation: GatewayOp,
        entity: &'static str,
    },
}

impl From<WorkflowError> for HotelError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::Invalid(errors) => HotelError::Validation(errors),
            WorkflowError::UnknownRow { entity, id } => HotelError::NotFound {
                entity: entity.to_string(),
                id,
            },
            WorkflowError::InFlight { entity } => HotelError::Busy {
                entity: entity.to_string(),
            },
            WorkflowError::NothingAccepted { operation, entity } => HotelError::Remote {
                operation,
                entity: entity.to_string(),
                cause: "no rows were accepted".into(),
            },
        }
    }
}
