//! HotelHub Store — record store backends.
//!
//! This crate provides:
//! - Configuration ([`StoreConfig`])
//! - The hosted HTTP record store client ([`HttpRecordStore`])
//! - An in-process store for tests and demos ([`MemoryRecordStore`])
//! - Error types ([`StoreError`])
//!
//! Both backends implement [`hotelhub_core::RecordStore`] and are meant
//! to be constructed once at the entry point and shared via `Arc`.

mod config;
mod error;
mod http;
mod memory;

pub use config::StoreConfig;
pub use error::StoreError;
pub use http::HttpRecordStore;
pub use memory::{MemoryRecordStore, StoreCall, StoreOp};
