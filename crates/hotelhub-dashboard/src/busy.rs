//! In-flight markers for loads and mutation triggers.
//!
//! Acquiring returns a guard; the marker clears when the guard drops,
//! including when the owning future is dropped mid-request.

use std::collections::BTreeSet;
use std::pin::pin;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tokio::sync::Notify;

/// A single busy flag, e.g. "the reservation form is submitting".
#[derive(Debug, Default)]
pub struct BusyFlag {
    busy: AtomicBool,
    released: Notify,
}

impl BusyFlag {
    pub fn try_acquire(&self) -> Option<BusyGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard(self))
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Resolve once the flag is clear. Returns immediately when it
    /// already is.
    pub async fn wait_idle(&self) {
        let mut released = pin!(self.released.notified());
        // Register before checking so a release in between is not missed.
        released.as_mut().enable();
        if !self.is_busy() {
            return;
        }
        released.await;
    }
}

#[must_use = "the flag clears as soon as the guard is dropped"]
pub struct BusyGuard<'a>(&'a BusyFlag);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.busy.store(false, Ordering::Release);
        self.0.released.notify_waiters();
    }
}

/// Per-row busy markers keyed by business id.
#[derive(Debug, Default)]
pub struct BusySet(Mutex<BTreeSet<String>>);

impl BusySet {
    pub fn try_acquire(&self, key: &str) -> Option<BusySetGuard<'_>> {
        if self.0.lock().insert(key.to_string()) {
            Some(BusySetGuard {
                set: &self.0,
                key: key.to_string(),
            })
        } else {
            None
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.lock().contains(key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.0.lock().iter().cloned().collect()
    }
}

#[must_use = "the marker clears as soon as the guard is dropped"]
pub struct BusySetGuard<'a> {
    set: &'a Mutex<BTreeSet<String>>,
    key: String,
}

impl Drop for BusySetGuard<'_> {
    fn drop(&mut self) {
        self.set.lock().remove(&self.key);
    }
}
