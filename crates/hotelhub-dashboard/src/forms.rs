//! Form state and validation for the mutation workflows.
//!
//! Validation collects every violation at once, keyed by the field the
//! message belongs to.

use chrono::NaiveDate;
use hotelhub_core::error::FieldErrors;
use hotelhub_core::models::reservation::nights_between;
use hotelhub_core::models::{Priority, RoomType};
use hotelhub_core::record::RecordId;
use parking_lot::Mutex;

pub const MIN_GUESTS: u8 = 1;
pub const MAX_GUESTS: u8 = 10;

/// A form whose fields map onto validation error keys.
pub trait FormFields: Clone + Default {
    /// Error keys of the fields that differ from `before`.
    fn changed_fields(&self, before: &Self) -> Vec<&'static str>;
}

/// A workflow's form together with its outstanding field errors.
///
/// Editing a field clears that field's error; the others stay until the
/// next submit.
pub struct FormState<F> {
    form: Mutex<F>,
    errors: Mutex<FieldErrors>,
}

impl<F: FormFields> Default for FormState<F> {
    fn default() -> Self {
        Self {
            form: Mutex::new(F::default()),
            errors: Mutex::new(FieldErrors::new()),
        }
    }
}

impl<F: FormFields> FormState<F> {
    pub fn form(&self) -> F {
        self.form.lock().clone()
    }

    pub fn errors(&self) -> FieldErrors {
        self.errors.lock().clone()
    }

    pub fn edit(&self, apply: impl FnOnce(&mut F)) {
        let mut form = self.form.lock();
        let before = form.clone();
        apply(&mut form);

        let mut errors = self.errors.lock();
        for field in form.changed_fields(&before) {
            errors.remove(field);
        }
    }

    /// Replace the whole form and drop every error.
    pub fn replace(&self, form: F) {
        *self.form.lock() = form;
        self.errors.lock().clear();
    }

    pub fn reset(&self) {
        self.replace(F::default());
    }

    pub fn set_errors(&self, errors: FieldErrors) {
        *self.errors.lock() = errors;
    }

    pub fn clear_errors(&self) {
        self.errors.lock().clear();
    }
}

fn changed(fields: &[(&'static str, bool)]) -> Vec<&'static str> {
    fields
        .iter()
        .filter(|(_, differs)| *differs)
        .map(|(field, _)| *field)
        .collect()
}

/// The "new reservation" form.
#[derive(Debug, Clone, PartialEq)]
pub struct ReservationForm {
    pub guest_name: String,
    /// Key of the selected room type.
    pub room_type: String,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    guests: u8,
    pub special_requests: String,
}

impl Default for ReservationForm {
    fn default() -> Self {
        Self {
            guest_name: String::new(),
            room_type: "standard".into(),
            check_in: None,
            check_out: None,
            guests: MIN_GUESTS,
            special_requests: String::new(),
        }
    }
}

impl FormFields for ReservationForm {
    fn changed_fields(&self, before: &Self) -> Vec<&'static str> {
        changed(&[
            ("guestName", self.guest_name != before.guest_name),
            ("roomType", self.room_type != before.room_type),
            ("checkIn", self.check_in != before.check_in),
            ("checkOut", self.check_out != before.check_out),
        ])
    }
}

/// A reservation form that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidReservation {
    pub guest_name: String,
    pub room: RoomType,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: i64,
    pub guests: u8,
    pub special_requests: String,
}

impl ValidReservation {
    /// Nightly price times nights.
    pub fn total_amount(&self) -> f64 {
        self.room.price * self.nights as f64
    }
}

impl ReservationForm {
    pub fn guests(&self) -> u8 {
        self.guests
    }

    pub fn set_guests(&mut self, guests: i64) {
        self.guests = guests.clamp(MIN_GUESTS as i64, MAX_GUESTS as i64) as u8;
    }

    pub fn increment_guests(&mut self) {
        self.set_guests(self.guests as i64 + 1);
    }

    pub fn decrement_guests(&mut self) {
        self.set_guests(self.guests as i64 - 1);
    }

    pub fn validate(&self, room_types: &[RoomType]) -> Result<ValidReservation, FieldErrors> {
        let mut errors = FieldErrors::new();

        let guest_name = self.guest_name.trim();
        if guest_name.is_empty() {
            errors.add("guestName", "Guest name is required");
        }

        let room = room_types.iter().find(|r| r.id == self.room_type);
        if room.is_none() {
            errors.add("roomType", "Unknown room type");
        }

        if self.check_in.is_none() {
            errors.add("checkIn", "Check-in date is required");
        }
        match (self.check_in, self.check_out) {
            (_, None) => errors.add("checkOut", "Check-out date is required"),
            (Some(check_in), Some(check_out)) if check_out <= check_in => {
                errors.add("checkOut", "Check-out date must be after check-in date")
            }
            _ => {}
        }

        match (room, self.check_in, self.check_out) {
            (Some(room), Some(check_in), Some(check_out)) if errors.is_empty() => {
                Ok(ValidReservation {
                    guest_name: guest_name.to_string(),
                    room: room.clone(),
                    check_in,
                    check_out,
                    nights: nights_between(check_in, check_out),
                    guests: self.guests,
                    special_requests: self.special_requests.trim().to_string(),
                })
            }
            _ => Err(errors),
        }
    }
}

/// The "new service request" form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceRequestForm {
    pub room: String,
    pub service_type: String,
    pub guest: String,
    pub priority: Priority,
}

impl FormFields for ServiceRequestForm {
    fn changed_fields(&self, before: &Self) -> Vec<&'static str> {
        changed(&[
            ("room", self.room != before.room),
            ("type", self.service_type != before.service_type),
            ("guest", self.guest != before.guest),
        ])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidServiceRequest {
    pub room: String,
    pub service_type: String,
    pub guest: String,
    pub priority: Priority,
}

impl ServiceRequestForm {
    pub fn validate(&self) -> Result<ValidServiceRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        let room = self.room.trim();
        let service_type = self.service_type.trim();
        let guest = self.guest.trim();

        if room.is_empty() {
            errors.add("room", "Room number is required");
        }
        if service_type.is_empty() {
            errors.add("type", "Service type is required");
        }
        if guest.is_empty() {
            errors.add("guest", "Guest name is required");
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(ValidServiceRequest {
            room: room.to_string(),
            service_type: service_type.to_string(),
            guest: guest.to_string(),
            priority: self.priority,
        })
    }
}

/// Editable copy of a room type. Numeric fields are signed so that
/// out-of-range input can be reported rather than wrapped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoomTypeForm {
    pub record_id: Option<RecordId>,
    pub id: String,
    pub name: String,
    pub capacity: i64,
    pub price: f64,
    pub availability: i64,
    pub description: String,
    pub amenities: Vec<String>,
}

impl From<&RoomType> for RoomTypeForm {
    fn from(room: &RoomType) -> Self {
        Self {
            record_id: room.record_id.clone(),
            id: room.id.clone(),
            name: room.name.clone(),
            capacity: room.capacity.into(),
            price: room.price,
            availability: room.availability.into(),
            description: room.description.clone(),
            amenities: room.amenities.clone(),
        }
    }
}

impl FormFields for RoomTypeForm {
    fn changed_fields(&self, before: &Self) -> Vec<&'static str> {
        changed(&[
            ("id", self.id != before.id),
            ("name", self.name != before.name),
            ("price", self.price != before.price),
            ("capacity", self.capacity != before.capacity),
            ("availability", self.availability != before.availability),
        ])
    }
}

impl RoomTypeForm {
    pub fn validate(&self) -> Result<RoomType, FieldErrors> {
        let mut errors = FieldErrors::new();

        if self.id.trim().is_empty() {
            errors.add("id", "Room type key is required");
        }
        if self.name.trim().is_empty() {
            errors.add("name", "Name is required");
        }
        if !self.price.is_finite() || self.price < 0.0 {
            errors.add("price", "Price cannot be negative");
        }
        let capacity = u32::try_from(self.capacity).ok().filter(|c| *c >= 1);
        if capacity.is_none() {
            errors.add("capacity", "Capacity must be at least 1");
        }
        let availability = u32::try_from(self.availability).ok();
        if availability.is_none() {
            errors.add("availability", "Availability cannot be negative");
        }

        match (capacity, availability) {
            (Some(capacity), Some(availability)) if errors.is_empty() => Ok(RoomType {
                record_id: self.record_id.clone(),
                id: self.id.trim().to_string(),
                name: self.name.trim().to_string(),
                capacity,
                price: self.price,
                availability,
                description: self.description.trim().to_string(),
                amenities: self
                    .amenities
                    .iter()
                    .map(|a| a.trim())
                    .filter(|a| !a.is_empty())
                    .map(str::to_string)
                    .collect(),
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn standard() -> RoomType {
        RoomType {
            record_id: Some(RecordId::Int(1)),
            id: "standard".into(),
            name: "Standard Room".into(),
            capacity: 2,
            price: 129.0,
            availability: 12,
            description: String::new(),
            amenities: vec![],
        }
    }

    fn filled() -> ReservationForm {
        ReservationForm {
            guest_name: "  Jane Doe ".into(),
            check_in: Some(date("2024-01-10")),
            check_out: Some(date("2024-01-12")),
            ..ReservationForm::default()
        }
    }

    #[test]
    fn guests_stay_within_bounds() {
        let mut form = ReservationForm::default();
        form.decrement_guests();
        assert_eq!(form.guests(), 1);

        for _ in 0..20 {
            form.increment_guests();
        }
        assert_eq!(form.guests(), 10);

        form.set_guests(-3);
        assert_eq!(form.guests(), 1);
    }

    #[test]
    fn valid_form_computes_total() {
        let valid = filled().validate(&[standard()]).unwrap();
        assert_eq!(valid.guest_name, "Jane Doe");
        assert_eq!(valid.nights, 2);
        assert_eq!(valid.total_amount(), 258.0);
    }

    #[test]
    fn empty_form_reports_every_field() {
        let form = ReservationForm {
            guest_name: "   ".into(),
            room_type: "penthouse".into(),
            ..ReservationForm::default()
        };
        let errors = form.validate(&[standard()]).unwrap_err();

        assert_eq!(errors.get("guestName"), Some("Guest name is required"));
        assert_eq!(errors.get("roomType"), Some("Unknown room type"));
        assert_eq!(errors.get("checkIn"), Some("Check-in date is required"));
        assert_eq!(errors.get("checkOut"), Some("Check-out date is required"));
    }

    #[test]
    fn same_day_checkout_is_rejected() {
        let form = ReservationForm {
            check_out: Some(date("2024-01-10")),
            ..filled()
        };
        let errors = form.validate(&[standard()]).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get("checkOut"),
            Some("Check-out date must be after check-in date")
        );
    }

    #[test]
    fn service_request_requires_room_type_and_guest() {
        let errors = ServiceRequestForm::default().validate().unwrap_err();
        assert!(errors.contains("room"));
        assert!(errors.contains("type"));
        assert!(errors.contains("guest"));
    }

    #[test]
    fn editing_a_field_clears_only_its_error() {
        let state = FormState::<ServiceRequestForm>::default();
        state.set_errors(ServiceRequestForm::default().validate().unwrap_err());

        state.edit(|form| form.room = "204".into());
        let errors = state.errors();
        assert!(!errors.contains("room"));
        assert!(errors.contains("type"));
        assert!(errors.contains("guest"));

        // Priority has no error key; touching it leaves the rest alone.
        state.edit(|form| form.priority = Priority::High);
        assert_eq!(state.errors().len(), 2);

        state.reset();
        assert!(state.errors().is_empty());
        assert_eq!(state.form(), ServiceRequestForm::default());
    }

    #[test]
    fn room_type_edit_clears_numeric_field_errors() {
        let state = FormState::<RoomTypeForm>::default();
        let mut form = RoomTypeForm::from(&standard());
        form.price = -1.0;
        form.capacity = 0;
        state.replace(form);
        state.set_errors(state.form().validate().unwrap_err());

        state.edit(|form| form.price = 99.0);
        assert_eq!(state.errors().len(), 1);
        assert!(state.errors().contains("capacity"));
    }

    #[test]
    fn room_type_form_rejects_out_of_range_numbers() {
        let mut form = RoomTypeForm::from(&standard());
        form.price = -1.0;
        form.capacity = 0;
        form.availability = -2;

        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 3);

        form.price = 150.0;
        form.capacity = 3;
        form.availability = 0;
        let room = form.validate().unwrap();
        assert_eq!(room.capacity, 3);
        assert_eq!(room.record_id, Some(RecordId::Int(1)));
    }
}
