//! HotelHub Core — canonical models, the record gateway and the
//! normalizer shared by every HotelHub crate.
//!
//! The record store itself is abstracted behind [`store::RecordStore`];
//! backends live in `hotelhub-store`.

pub mod error;
pub mod gateway;
pub mod models;
pub mod normalize;
pub mod record;
pub mod store;
pub mod table;

pub use error::{FieldErrors, GatewayOp, HotelError, HotelResult, PartialWriteError};
pub use gateway::Gateway;
pub use models::{Entity, EntityKind};
pub use normalize::{normalize, normalize_entity};
pub use record::{ListQuery, RawRecord, RecordId, RecordIds};
pub use store::RecordStore;
