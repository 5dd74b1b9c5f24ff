//! HotelHub Dashboard — collection view-models, form validation and the
//! mutation workflows behind the hotel operations dashboard.
//!
//! Everything here is generic over [`hotelhub_core::RecordStore`] so the
//! dashboard has no dependency on a particular backend.

pub mod busy;
pub mod dashboard;
pub mod error;
pub mod forms;
pub mod notify;
pub mod view_model;
pub mod workflow;

pub use dashboard::Dashboard;
pub use error::WorkflowError;
pub use forms::{FormFields, FormState, ReservationForm, RoomTypeForm, ServiceRequestForm};
pub use notify::{LogNotifier, Notification, NotificationLevel, NotificationQueue, Notifier};
pub use view_model::{CollectionViewModel, LoadState, Snapshot, StatsViewModel};
pub use workflow::{ReservationWorkflow, RoomTypeWorkflow, ServiceRequestWorkflow};
