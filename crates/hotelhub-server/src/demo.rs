//! Seed data for running without a hosted record store.

use chrono::{Days, Local, NaiveDate};
use hotelhub_core::record::RawRecord;
use hotelhub_store::MemoryRecordStore;
use serde_json::{Value, json};

fn record(value: Value) -> RawRecord {
    match value {
        Value::Object(map) => map,
        _ => RawRecord::new(),
    }
}

fn day(offset: u64) -> String {
    let today = Local::now().date_naive();
    today
        .checked_add_days(Days::new(offset))
        .unwrap_or(NaiveDate::MAX)
        .to_string()
}

/// Populate every table with a small, consistent hotel.
pub fn seed(store: &MemoryRecordStore) {
    store.seed(
        "room_type",
        [
            record(json!({
                "id": "standard", "Name": "Standard", "capacity": 2, "price": 129,
                "availability": 15, "amenities": "Wi-Fi,TV,Work Desk",
                "description": "Comfortable standard room with a queen-size bed, work desk and private bathroom."
            })),
            record(json!({
                "id": "deluxe", "Name": "Deluxe", "capacity": 2, "price": 179,
                "availability": 12, "amenities": "Wi-Fi,TV,Mini Bar,Sitting Area",
                "description": "Spacious room with premium furnishings, a king-size bed and a sitting area."
            })),
            record(json!({
                "id": "suite", "Name": "Executive Suite", "capacity": 4, "price": 299,
                "availability": 7, "amenities": "Wi-Fi,TV,Living Area,Breakfast",
                "description": "Suite with a separate living area, city views and complimentary breakfast."
            })),
            record(json!({
                "id": "family", "Name": "Family Room", "capacity": 5, "price": 249,
                "availability": 8, "amenities": "Wi-Fi,TV,Two Queen Beds",
                "description": "Two queen beds and extra space for children, close to hotel facilities."
            })),
            record(json!({
                "id": "presidential", "Name": "Presidential Suite", "capacity": 6, "price": 499,
                "availability": 2, "amenities": "Wi-Fi,TV,Dining Area,Lounge Access",
                "description": "Separate bedroom, living and dining areas with executive lounge access."
            })),
        ],
    );

    store.seed(
        "reservation",
        [
            record(json!({
                "reservation_number": "RSV000123", "guest_name": "Michael Johnson",
                "room_type": "Deluxe", "check_in_date": day(1), "check_out_date": day(6),
                "guests_count": 2, "status": "confirmed", "total_amount": 895
            })),
            record(json!({
                "reservation_number": "RSV000124", "guest_name": "Sarah Williams",
                "room_type": "Standard", "check_in_date": day(3), "check_out_date": day(5),
                "guests_count": 1, "status": "confirmed", "total_amount": 258
            })),
            record(json!({
                "reservation_number": "RSV000125", "guest_name": "David Chen",
                "room_type": "Executive Suite", "check_in_date": day(6), "check_out_date": day(11),
                "guests_count": 3, "status": "pending", "total_amount": 1495
            })),
        ],
    );

    store.seed(
        "service_request",
        [
            record(json!({
                "request_number": "SR-1021", "room_number": "112", "service_type": "Room Service",
                "guest_name": "Sophia Martinez", "priority": "low",
                "requested_time": "08:30 AM", "status": "pending"
            })),
            record(json!({
                "request_number": "SR-1022", "room_number": "215",
                "service_type": "Technical Support", "guest_name": "James Wilson",
                "priority": "medium", "requested_time": "09:45 AM", "status": "pending"
            })),
            record(json!({
                "request_number": "SR-1023", "room_number": "304", "service_type": "Housekeeping",
                "guest_name": "Emma Thompson", "priority": "high",
                "requested_time": "10:15 AM", "status": "pending"
            })),
        ],
    );

    store.seed(
        "hotel_stats",
        [record(json!({
            "Name": "Daily snapshot", "occupancy_rate": 68, "available_rooms": 42,
            "pending_services": 14, "upcoming_check_ins": 7, "revenue": 24680
        }))],
    );
}
