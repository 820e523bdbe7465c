//! Debounce for the jobs search box.
//!
//! Each rendered jobs page carries a view id. Every keystroke request for that view
//! bumps the view's generation, waits out the quiet period, and only proceeds if no
//! newer request arrived meanwhile. Superseded requests never reach the backend.

use moka::sync::Cache;
use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};
use uuid::Uuid;

const MAX_VIEWS: u64 = 10_000;
const VIEW_IDLE: Duration = Duration::from_secs(600);

pub struct SearchDebouncer {
    delay: Duration,
    views: Cache<Uuid, Arc<AtomicU64>>,
}

impl SearchDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            views: Cache::builder()
                .max_capacity(MAX_VIEWS)
                .time_to_idle(VIEW_IDLE)
                .build(),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Waits out the quiet period. Returns `true` when this is still the latest
    /// request for `view`.
    pub async fn settle(&self, view: Uuid) -> bool {
        let counter = self
            .views
            .get_with(view, || Arc::new(AtomicU64::new(0)));
        let generation = counter.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.delay).await;
        counter.load(Ordering::SeqCst) == generation
    }
}
