//! Integration tests for the reservation, service request and room type
//! workflows.

mod common;

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use common::{dashboard, seeded_store, slow_store};
use hotelhub_core::error::{HotelError, HotelResult};
use hotelhub_core::models::{Priority, ReservationStatus, ServiceStatus};
use hotelhub_core::record::{
    DeleteRequest, FetchOneResponse, FetchResponse, FieldSelection, ListQuery, RecordId,
    WriteRequest, WriteResponse,
};
use hotelhub_core::store::RecordStore;
use hotelhub_dashboard::{NotificationLevel, ReservationForm, RoomTypeForm, ServiceRequestForm};
use hotelhub_store::{MemoryRecordStore, StoreOp};
use tokio::time::sleep;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn fill_jane_doe(form: &mut ReservationForm) {
    form.guest_name = "Jane Doe".into();
    form.room_type = "standard".into();
    form.check_in = Some(date("2024-01-10"));
    form.check_out = Some(date("2024-01-12"));
}

/// Accepts writes through a memory store but echoes back only each new
/// row's `Id`.
struct SparseEchoStore(Arc<MemoryRecordStore>);

fn keep_only_row_ids(mut response: WriteResponse) -> WriteResponse {
    for result in response.results.iter_mut().flatten() {
        if let Some(data) = result.data.as_mut() {
            data.retain(|field, _| field == "Id");
        }
    }
    response
}

impl RecordStore for SparseEchoStore {
    async fn fetch_records(
        &self,
        table: &str,
        query: &ListQuery,
    ) -> HotelResult<Option<FetchResponse>> {
        self.0.fetch_records(table, query).await
    }

    async fn get_record_by_id(
        &self,
        table: &str,
        id: &RecordId,
        selection: &FieldSelection,
    ) -> HotelResult<Option<FetchOneResponse>> {
        self.0.get_record_by_id(table, id, selection).await
    }

    async fn create_records(
        &self,
        table: &str,
        request: &WriteRequest,
    ) -> HotelResult<Option<WriteResponse>> {
        Ok(self
            .0
            .create_records(table, request)
            .await?
            .map(keep_only_row_ids))
    }

    async fn update_records(
        &self,
        table: &str,
        request: &WriteRequest,
    ) -> HotelResult<Option<WriteResponse>> {
        Ok(self
            .0
            .update_records(table, request)
            .await?
            .map(keep_only_row_ids))
    }

    async fn delete_records(
        &self,
        table: &str,
        request: &DeleteRequest,
    ) -> HotelResult<Option<WriteResponse>> {
        self.0.delete_records(table, request).await
    }
}

// -----------------------------------------------------------------------
// Reservation create
// -----------------------------------------------------------------------

#[tokio::test]
async fn create_reservation_derives_fields_and_reloads() {
    let store = seeded_store();
    let (dash, notifications) = dashboard(&store);
    dash.load_all().await.unwrap();
    let workflow = &dash.reservation_workflow;

    workflow.edit(fill_jane_doe);
    let created = workflow.submit().await.unwrap();

    assert_eq!(created.total_amount, 258.0);
    assert_eq!(created.status, ReservationStatus::Confirmed);
    assert_eq!(created.room_type, "Standard Room");
    assert_eq!(created.nights(), Some(2));
    assert_eq!(created.id.len(), 9);
    assert!(created.id.starts_with("RSV"));
    assert!(created.id[3..].chars().all(|c| c.is_ascii_digit()));
    assert!(created.record_id.is_some());

    let held = dash.reservations.items();
    assert_eq!(held.len(), 3);
    assert_eq!(held[0].id, created.id);

    assert_eq!(workflow.form(), ReservationForm::default());
    assert!(!workflow.is_submitting());

    let pending = notifications.drain();
    assert_eq!(pending.last().unwrap().level, NotificationLevel::Success);
    assert_eq!(pending.last().unwrap().message, "Reservation created successfully!");
}

#[tokio::test]
async fn created_reservation_is_written_with_store_field_names() {
    let store = seeded_store();
    let (dash, _) = dashboard(&store);
    dash.room_types.load().await.unwrap();

    dash.reservation_workflow.edit(|form| {
        fill_jane_doe(form);
        form.increment_guests();
        form.special_requests = " Late check-in ".into();
    });
    dash.reservation_workflow.submit().await.unwrap();

    let create = &store.calls_for(StoreOp::Create)[0];
    assert_eq!(create.table, "reservation");
    let sent = &create.body["records"][0];
    assert_eq!(sent["guest_name"], "Jane Doe");
    assert_eq!(sent["room_type"], "Standard Room");
    assert_eq!(sent["check_in_date"], "2024-01-10");
    assert_eq!(sent["check_out_date"], "2024-01-12");
    assert_eq!(sent["guests_count"], 2);
    assert_eq!(sent["status"], "confirmed");
    assert_eq!(sent["special_requests"], "Late check-in");
    assert!(sent.get("Id").is_none());
}

#[tokio::test]
async fn same_day_checkout_blocks_the_write() {
    let store = seeded_store();
    let (dash, notifications) = dashboard(&store);
    dash.room_types.load().await.unwrap();

    dash.reservation_workflow.edit(|form| {
        fill_jane_doe(form);
        form.check_out = form.check_in;
    });
    let err = dash.reservation_workflow.submit().await.unwrap_err();

    let errors = match err {
        HotelError::Validation(errors) => errors,
        other => panic!("expected validation error, got {other:?}"),
    };
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors.get("checkOut"),
        Some("Check-out date must be after check-in date")
    );
    assert_eq!(dash.reservation_workflow.field_errors(), errors);
    assert!(store.calls_for(StoreOp::Create).is_empty());
    assert_eq!(
        notifications.messages(),
        vec!["Please correct the errors in the form".to_string()]
    );

    // Fixing the field clears its error.
    dash.reservation_workflow
        .edit(|form| form.check_out = Some(date("2024-01-11")));
    assert!(dash.reservation_workflow.field_errors().is_empty());
}

#[tokio::test]
async fn unknown_room_type_is_a_field_error() {
    let store = seeded_store();
    let (dash, _) = dashboard(&store);

    // Room types never loaded: nothing to book against.
    dash.reservation_workflow.edit(fill_jane_doe);
    let err = dash.reservation_workflow.submit().await.unwrap_err();

    let errors = match err {
        HotelError::Validation(errors) => errors,
        other => panic!("expected validation error, got {other:?}"),
    };
    assert_eq!(errors.get("roomType"), Some("Unknown room type"));
    assert!(store.calls_for(StoreOp::Create).is_empty());
}

#[tokio::test]
async fn rejected_row_keeps_form_and_skips_reload() {
    let store = seeded_store();
    let (dash, notifications) = dashboard(&store);
    dash.load_all().await.unwrap();
    notifications.drain();
    store.clear_calls();

    store.reject_next_rows(1);
    dash.reservation_workflow.edit(fill_jane_doe);
    let err = dash.reservation_workflow.submit().await.unwrap_err();

    assert!(err.is_remote());
    assert_eq!(dash.reservation_workflow.form().guest_name, "Jane Doe");
    assert_eq!(store.calls_for(StoreOp::Create).len(), 1);
    assert!(store.calls_for(StoreOp::Fetch).is_empty());
    assert_eq!(dash.reservations.len(), 2);

    let pending = notifications.drain();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].level, NotificationLevel::Error);
}

#[tokio::test]
async fn offline_create_surfaces_error_and_keeps_form() {
    let store = seeded_store();
    let (dash, notifications) = dashboard(&store);
    dash.room_types.load().await.unwrap();

    store.set_offline(true);
    dash.reservation_workflow.edit(fill_jane_doe);
    let err = dash.reservation_workflow.submit().await.unwrap_err();

    assert!(matches!(err, HotelError::Remote { .. }));
    assert_eq!(dash.reservation_workflow.form().guest_name, "Jane Doe");
    assert!(notifications.messages()[0].starts_with("Failed to create reservation"));
}

#[tokio::test]
async fn submit_during_load_still_ends_with_new_reservation_held() {
    let store = slow_store();
    let (dash, _) = dashboard(&store);
    dash.load_all().await.unwrap();
    store.set_fetch_delay(Duration::from_millis(200));
    dash.reservation_workflow.edit(fill_jane_doe);

    // The load reads the table before the create lands.
    let (loaded, created) = tokio::join!(dash.reservations.load(), async {
        sleep(Duration::from_millis(20)).await;
        dash.reservation_workflow.submit().await
    });

    assert_eq!(loaded.unwrap(), 2);
    let created = created.unwrap();
    assert_eq!(store.inner.rows("reservation").len(), 3);

    let held: Vec<String> = dash
        .reservations
        .items()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(held.len(), 3);
    assert!(held.contains(&created.id));
}

#[tokio::test]
async fn second_submit_while_first_in_flight_is_rejected() {
    let store = slow_store();
    let (dash, notifications) = dashboard(&store);
    dash.load_all().await.unwrap();
    notifications.drain();
    store.set_fetch_delay(Duration::from_millis(200));
    dash.reservation_workflow.edit(fill_jane_doe);

    // The first submit is still reloading when the second arrives.
    let (first, (was_submitting, second)) = tokio::join!(dash.reservation_workflow.submit(), async {
        sleep(Duration::from_millis(20)).await;
        let was_submitting = dash.reservation_workflow.is_submitting();
        (was_submitting, dash.reservation_workflow.submit().await)
    });

    assert!(first.is_ok());
    assert!(was_submitting);
    assert!(matches!(second, Err(HotelError::Busy { .. })));
    assert!(!dash.reservation_workflow.is_submitting());
    assert_eq!(store.inner.calls_for(StoreOp::Create).len(), 1);
    assert_eq!(store.inner.rows("reservation").len(), 3);
    assert_eq!(
        notifications.messages(),
        vec!["Reservation created successfully!".to_string()]
    );
}

#[tokio::test]
async fn sparse_write_echo_keeps_derived_reservation() {
    let memory = seeded_store();
    let store = Arc::new(SparseEchoStore(Arc::clone(&memory)));
    let (dash, _) = dashboard(&store);
    dash.load_all().await.unwrap();

    dash.reservation_workflow.edit(fill_jane_doe);
    let created = dash.reservation_workflow.submit().await.unwrap();

    assert_eq!(created.guest_name, "Jane Doe");
    assert_eq!(created.room_type, "Standard Room");
    assert_eq!(created.total_amount, 258.0);
    assert!(created.id.starts_with("RSV"));

    let row_id = created.record_id.clone().unwrap();
    let stored = memory
        .rows("reservation")
        .into_iter()
        .find(|row| row.get("Id").is_some_and(|id| row_id.matches(id)))
        .unwrap();
    assert_eq!(stored["reservation_number"], created.id.as_str());
}

// -----------------------------------------------------------------------
// Reservation cancel
// -----------------------------------------------------------------------

#[tokio::test]
async fn cancelled_row_stays_visible_until_reload_finishes() {
    let store = slow_store();
    let (dash, _) = dashboard(&store);
    dash.reservations.load().await.unwrap();
    store.set_fetch_delay(Duration::from_millis(200));

    // The delete is immediate; the reload after it is slow.
    let (cancelled, during) = tokio::join!(dash.reservation_workflow.cancel("RSV000123"), async {
        sleep(Duration::from_millis(20)).await;
        (
            dash.reservation_workflow.is_cancelling("RSV000123"),
            dash.reservation_workflow.is_cancelling("RSV000124"),
            dash.reservations.find("RSV000123").is_some(),
        )
    });

    cancelled.unwrap();
    assert_eq!(during, (true, false, true));
    assert!(!dash.reservation_workflow.is_cancelling("RSV000123"));
    assert!(dash.reservations.find("RSV000123").is_none());
}

#[tokio::test]
async fn cancel_unknown_reservation_makes_no_call() {
    let store = seeded_store();
    let (dash, notifications) = dashboard(&store);

    // Nothing held yet, so RSV000123 cannot be resolved.
    let err = dash
        .reservation_workflow
        .cancel("RSV000123")
        .await
        .unwrap_err();

    assert!(matches!(err, HotelError::NotFound { ref id, .. } if id == "RSV000123"));
    assert_eq!(notifications.messages(), vec!["Reservation not found".to_string()]);
    assert!(store.calls_for(StoreOp::Delete).is_empty());
}

#[tokio::test]
async fn cancel_deletes_by_row_id_and_reloads() {
    let store = seeded_store();
    let (dash, notifications) = dashboard(&store);
    dash.reservations.load().await.unwrap();
    let michael = dash.reservations.find("RSV000123").unwrap();

    dash.reservation_workflow.cancel("RSV000123").await.unwrap();

    let delete = &store.calls_for(StoreOp::Delete)[0];
    assert_eq!(
        delete.body["RecordIds"][0],
        michael.record_id.unwrap().to_value()
    );
    assert!(dash.reservations.find("RSV000123").is_none());
    assert_eq!(dash.reservations.len(), 1);
    assert!(!dash.reservation_workflow.is_cancelling("RSV000123"));
    assert_eq!(
        notifications.messages().last().unwrap(),
        "Reservation cancelled successfully"
    );
}

#[tokio::test]
async fn cancel_of_already_deleted_row_reports_failure() {
    let store = seeded_store();
    let (dash, _) = dashboard(&store);
    dash.reservations.load().await.unwrap();

    // Row removed behind the view-model's back.
    let sarah = dash.reservations.find("RSV000124").unwrap();
    dash.reservations
        .gateway()
        .delete(sarah.record_id.clone().unwrap())
        .await
        .unwrap();
    store.clear_calls();

    let err = dash.reservation_workflow.cancel("RSV000124").await.unwrap_err();
    assert!(err.is_remote());
    assert!(store.calls_for(StoreOp::Fetch).is_empty());
    assert!(dash.reservations.find("RSV000124").is_some());
}

// -----------------------------------------------------------------------
// Service requests
// -----------------------------------------------------------------------

#[tokio::test]
async fn complete_service_request_updates_and_reloads_stats() {
    let store = seeded_store();
    let (dash, notifications) = dashboard(&store);
    dash.load_all().await.unwrap();
    store.clear_calls();

    dash.service_request_workflow.complete("SR-1023").await.unwrap();

    let update = &store.calls_for(StoreOp::Update)[0];
    assert_eq!(update.body["records"][0]["status"], "completed");
    assert!(update.body["records"][0].get("Id").is_some());

    let fetched: Vec<String> = store
        .calls_for(StoreOp::Fetch)
        .into_iter()
        .map(|c| c.table)
        .collect();
    assert_eq!(fetched, vec!["service_request", "hotel_stats"]);

    let remaining: Vec<String> = dash
        .service_requests
        .items()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(remaining, vec!["SR-1022"]);
    assert_eq!(
        notifications.messages().last().unwrap(),
        "Service request #SR-1023 completed successfully"
    );
}

#[tokio::test]
async fn complete_unknown_request_makes_no_call() {
    let store = seeded_store();
    let (dash, notifications) = dashboard(&store);
    dash.service_requests.load().await.unwrap();

    // SR-1021 is completed, so the pending view never held it.
    let err = dash
        .service_request_workflow
        .complete("SR-1021")
        .await
        .unwrap_err();
    assert!(matches!(err, HotelError::NotFound { .. }));
    assert!(store.calls_for(StoreOp::Update).is_empty());
    assert_eq!(
        notifications.messages(),
        vec!["Service request not found".to_string()]
    );
}

#[tokio::test]
async fn create_service_request_stamps_pending_request() {
    let store = seeded_store();
    let (dash, _) = dashboard(&store);

    dash.service_request_workflow.edit(|form| {
        *form = ServiceRequestForm {
            room: " 204 ".into(),
            service_type: "Housekeeping".into(),
            guest: "Ana Lima".into(),
            priority: Priority::High,
        };
    });
    let created = dash.service_request_workflow.submit().await.unwrap();

    assert!(created.id.starts_with("SR-"));
    assert_eq!(created.id.len(), 7);
    assert_eq!(created.room, "204");
    assert_eq!(created.status, ServiceStatus::Pending);
    assert_eq!(created.priority, Priority::High);
    assert!(created.requested_time.ends_with('M'));

    assert!(dash.service_requests.find(&created.id).is_some());
    assert_eq!(dash.service_request_workflow.form(), ServiceRequestForm::default());
}

#[tokio::test]
async fn blank_service_request_reports_every_field() {
    let store = seeded_store();
    let (dash, _) = dashboard(&store);

    let err = dash.service_request_workflow.submit().await.unwrap_err();
    let errors = match err {
        HotelError::Validation(errors) => errors,
        other => panic!("expected validation error, got {other:?}"),
    };
    assert_eq!(errors.len(), 3);
    assert_eq!(dash.service_request_workflow.field_errors(), errors);
    assert!(store.calls_for(StoreOp::Create).is_empty());

    dash.service_request_workflow
        .edit(|form| form.service_type = "Housekeeping".into());
    let remaining = dash.service_request_workflow.field_errors();
    assert!(!remaining.contains("type"));
    assert!(remaining.contains("room"));
    assert!(remaining.contains("guest"));
}

// -----------------------------------------------------------------------
// Room types
// -----------------------------------------------------------------------

#[tokio::test]
async fn save_existing_room_type_updates_in_place() {
    let store = seeded_store();
    let (dash, notifications) = dashboard(&store);
    dash.room_types.load().await.unwrap();

    let workflow = &dash.room_type_workflow;
    workflow.open(&dash.room_types.find("deluxe").unwrap());
    workflow.edit(|form| {
        form.price = 189.0;
        form.amenities.push("Balcony".into());
    });
    let saved = workflow.save().await.unwrap();

    assert_eq!(saved.price, 189.0);
    assert!(store.calls_for(StoreOp::Create).is_empty());
    let sent = &store.calls_for(StoreOp::Update)[0].body["records"][0];
    assert_eq!(sent["amenities"], "Wi-Fi,TV,Mini Bar,Balcony");

    let reloaded = dash.room_types.find("deluxe").unwrap();
    assert_eq!(reloaded.price, 189.0);
    assert_eq!(reloaded.amenities.len(), 4);
    assert_eq!(
        notifications.messages().last().unwrap(),
        "Room type saved successfully"
    );
}

#[tokio::test]
async fn save_new_room_type_creates_it() {
    let store = seeded_store();
    let (dash, _) = dashboard(&store);

    let form = RoomTypeForm {
        id: "family".into(),
        name: "Family Room".into(),
        capacity: 5,
        price: 249.0,
        availability: 5,
        amenities: vec!["Wi-Fi".into(), "Kitchenette".into()],
        ..RoomTypeForm::default()
    };
    dash.room_type_workflow.edit(|f| *f = form);
    let saved = dash.room_type_workflow.save().await.unwrap();

    assert_eq!(store.calls_for(StoreOp::Create).len(), 1);
    assert_eq!(dash.room_types.len(), 3);
    assert_eq!(saved.id, "family");
    assert!(saved.record_id.is_some());
    assert_eq!(dash.room_type_workflow.form(), RoomTypeForm::default());
}

#[tokio::test]
async fn invalid_room_type_is_not_written() {
    let store = seeded_store();
    let (dash, _) = dashboard(&store);

    let form = RoomTypeForm {
        id: "broken".into(),
        name: "Broken".into(),
        capacity: 0,
        price: -5.0,
        ..RoomTypeForm::default()
    };
    let workflow = &dash.room_type_workflow;
    workflow.edit(|f| *f = form);
    let err = workflow.save().await.unwrap_err();
    assert!(matches!(err, HotelError::Validation(_)));
    assert!(store.calls().is_empty());

    let errors = workflow.field_errors();
    assert!(errors.contains("capacity"));
    assert!(errors.contains("price"));

    workflow.edit(|f| f.capacity = 2);
    assert!(!workflow.field_errors().contains("capacity"));
    assert!(workflow.field_errors().contains("price"));
    assert_eq!(workflow.form().name, "Broken");
}
