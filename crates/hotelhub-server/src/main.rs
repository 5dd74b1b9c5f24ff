//! HotelHub — loads every dashboard view from the record store and
//! prints a summary.
//!
//! Runs against the hosted record store when `HOTELHUB_PROJECT_ID` is
//! set, otherwise (or with `HOTELHUB_DEMO=1`) against seeded demo data.

mod demo;

use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use hotelhub_core::error::HotelResult;
use hotelhub_core::store::RecordStore;
use hotelhub_dashboard::{Dashboard, LogNotifier};
use hotelhub_store::{HttpRecordStore, MemoryRecordStore, StoreConfig};
use serde_json::json;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEMO_VAR: &str = "HOTELHUB_DEMO";

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hotelhub=info")),
        )
        .json()
        .init();

    info!("Starting HotelHub...");

    let demo = env::var(DEMO_VAR).is_ok_and(|v| v == "1")
        || env::var(StoreConfig::PROJECT_VAR).map_or(true, |v| v.trim().is_empty());

    let result = if demo {
        info!("Using seeded in-memory record store");
        let store = MemoryRecordStore::new();
        demo::seed(&store);
        run(Arc::new(store)).await
    } else {
        match StoreConfig::from_env().and_then(|config| HttpRecordStore::connect(&config)) {
            Ok(store) => run(Arc::new(store)).await,
            Err(err) => Err(err.into()),
        }
    };

    match result {
        Ok(()) => {
            info!("HotelHub stopped.");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "HotelHub failed");
            ExitCode::FAILURE
        }
    }
}

async fn run<S: RecordStore>(store: Arc<S>) -> HotelResult<()> {
    let dashboard = Dashboard::new(store, Arc::new(LogNotifier));
    dashboard.load_all().await?;

    let stats = dashboard.stats.stats();
    info!(
        occupancy = stats.occupancy,
        available_rooms = stats.available_rooms,
        pending_services = stats.pending_services,
        upcoming_check_ins = stats.upcoming_check_ins,
        revenue = stats.revenue,
        "Hotel stats"
    );

    let summary = json!({
        "stats": dashboard.stats.snapshot(),
        "roomTypes": dashboard.room_types.snapshot(),
        "reservations": dashboard.reservations.snapshot(),
        "serviceRequests": dashboard.service_requests.snapshot(),
    });
    match serde_json::to_string_pretty(&summary) {
        Ok(text) => println!("{text}"),
        Err(err) => error!(error = %err, "Could not render summary"),
    }

    Ok(())
}
