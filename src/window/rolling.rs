use std::collections::VecDeque;

use crate::detect::flash::FlashEvent;

/// Time-bounded, capacity-capped log of [`FlashEvent`]s ordered by timestamp.
///
/// Call [`RollingWindow::evict`] with the query time before reading totals; after
/// `evict(now)` every retained event satisfies `timestamp_ms > now - window_ms`.
#[derive(Clone, Debug)]
pub struct RollingWindow {
    window_ms: i64,
    capacity: usize,
    events: VecDeque<FlashEvent>,
    dropped_over_capacity: u64,
}

impl RollingWindow {
    /// Create an empty window. `capacity` is clamped to at least one event.
    pub fn new(window_ms: i64, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            window_ms,
            capacity,
            events: VecDeque::with_capacity(capacity),
            dropped_over_capacity: 0,
        }
    }

    /// Window length in milliseconds.
    pub fn window_ms(&self) -> i64 {
        self.window_ms
    }

    /// Hard cap on retained events.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Insert keeping timestamp order, then enforce the capacity cap (oldest dropped first).
    ///
    /// Events with equal timestamps keep insertion order.
    pub fn insert(&mut self, event: FlashEvent) {
        let in_order = self
            .events
            .back()
            .is_none_or(|last| last.timestamp_ms <= event.timestamp_ms);
        if in_order {
            self.events.push_back(event);
        } else {
            let at = self
                .events
                .partition_point(|e| e.timestamp_ms <= event.timestamp_ms);
            self.events.insert(at, event);
        }

        while self.events.len() > self.capacity {
            self.events.pop_front();
            self.dropped_over_capacity = self.dropped_over_capacity.saturating_add(1);
            tracing::debug!(
                capacity = self.capacity,
                "rolling window over capacity, dropped oldest event"
            );
        }
    }

    /// Drop every event with `timestamp_ms <= now - window_ms`.
    pub fn evict(&mut self, now: i64) {
        // Underflow means the cutoff lies before every representable timestamp.
        let Some(cutoff) = now.checked_sub(self.window_ms) else {
            return;
        };
        while self
            .events
            .front()
            .is_some_and(|e| e.timestamp_ms <= cutoff)
        {
            self.events.pop_front();
        }
    }

    /// Number of retained events.
    pub fn count(&self) -> usize {
        self.events.len()
    }

    /// Return `true` when no events are retained.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Sum of retained flash areas.
    pub fn sum_area(&self) -> u64 {
        self.events
            .iter()
            .fold(0u64, |acc, e| acc.saturating_add(e.flash_area_px))
    }

    /// Largest retained luminance delta, or `0.0` when empty.
    pub fn max_delta(&self) -> f64 {
        self.events
            .iter()
            .map(|e| e.luminance_delta)
            .fold(0.0, f64::max)
    }

    /// Retained events, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &FlashEvent> {
        self.events.iter()
    }

    /// Events dropped by the capacity cap since creation or the last [`RollingWindow::clear`].
    pub fn dropped_over_capacity(&self) -> u64 {
        self.dropped_over_capacity
    }

    /// Remove all events and reset counters.
    pub fn clear(&mut self) {
        self.events.clear();
        self.dropped_over_capacity = 0;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/window/rolling.rs"]
mod tests;
