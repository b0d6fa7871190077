//! Per-source sliding-window rate limiting.
//!
//! Each source gets its own window behind its own mutex, so admission checks
//! for different sources never contend. The source map is fixed when the
//! limiter is built. A blocked source simply contributes no evidence.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

use crate::sources::SourceKind;
use crate::types::config::SourcesConfig;

/// Default length of a rate window.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// Admission state for one source.
#[derive(Debug, Clone, Copy)]
pub struct RateWindow {
    pub count: u32,
    pub window_start: Instant,
    pub limit: u32,
}

impl RateWindow {
    fn new(limit: u32) -> Self {
        Self {
            count: 0,
            window_start: Instant::now(),
            limit,
        }
    }

    fn roll(&mut self, now: Instant, window: Duration) {
        if now.duration_since(self.window_start) > window {
            self.count = 0;
            self.window_start = now;
        }
    }
}

/// Sliding-window admission control keyed by source.
#[derive(Debug)]
pub struct RateLimiter {
    windows: HashMap<SourceKind, Mutex<RateWindow>>,
    window: Duration,
}

impl RateLimiter {
    /// Build a limiter with one window per source, using each source's
    /// `max_per_minute`.
    pub fn from_config(config: &SourcesConfig) -> Self {
        Self::with_limits(
            SourceKind::ALL.map(|kind| (kind, config.get(kind).max_per_minute)),
            DEFAULT_WINDOW,
        )
    }

    /// Build a limiter from explicit limits. Sources not listed are never admitted.
    pub fn with_limits(
        limits: impl IntoIterator<Item = (SourceKind, u32)>,
        window: Duration,
    ) -> Self {
        Self {
            windows: limits
                .into_iter()
                .map(|(kind, limit)| (kind, Mutex::new(RateWindow::new(limit))))
                .collect(),
            window,
        }
    }

    /// Whether a call to `source` would be admitted now. Does not consume.
    pub fn allow(&self, source: SourceKind) -> bool {
        self.with_window(source, false, |window| window.count < window.limit)
    }

    /// Count a dispatched call against `source`.
    pub fn record(&self, source: SourceKind) {
        self.with_window(source, (), |window| {
            window.count = window.count.saturating_add(1);
        });
    }

    /// Check and record under one lock. Concurrent callers never over-admit.
    pub fn try_acquire(&self, source: SourceKind) -> bool {
        self.with_window(source, false, |window| {
            if window.count < window.limit {
                window.count += 1;
                true
            } else {
                false
            }
        })
    }

    /// Admissions left in the current window.
    pub fn remaining(&self, source: SourceKind) -> u32 {
        self.with_window(source, 0, |window| window.limit.saturating_sub(window.count))
    }

    fn with_window<T>(
        &self,
        source: SourceKind,
        unknown: T,
        f: impl FnOnce(&mut RateWindow) -> T,
    ) -> T {
        let Some(slot) = self.windows.get(&source) else {
            return unknown;
        };
        let mut window = lock(slot);
        window.roll(Instant::now(), self.window);
        f(&mut window)
    }
}

/// Window state is plain counters, so a poisoned lock is still usable.
fn lock(slot: &Mutex<RateWindow>) -> MutexGuard<'_, RateWindow> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}
