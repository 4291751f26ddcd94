use std::time::{Duration, Instant};

/// Per-interval loop rates, reported through the `loop_metrics` log event.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoopMetricsSnapshot {
    pub fps: f32,
    pub tps: f32,
    pub frame_time_ms: f32,
}

/// Accumulates frame and tick counts, emitting one snapshot per interval.
#[derive(Debug)]
pub(crate) struct MetricsAccumulator {
    interval_start: Instant,
    interval: Duration,
    frame_count: u32,
    tick_count: u32,
    frame_time_total: Duration,
}

impl MetricsAccumulator {
    pub(crate) fn new(interval: Duration) -> Self {
        Self {
            interval_start: Instant::now(),
            interval,
            frame_count: 0,
            tick_count: 0,
            frame_time_total: Duration::ZERO,
        }
    }

    pub(crate) fn record_frame(&mut self, frame_dt: Duration) {
        self.frame_count = self.frame_count.saturating_add(1);
        self.frame_time_total = self.frame_time_total.saturating_add(frame_dt);
    }

    pub(crate) fn record_tick(&mut self) {
        self.tick_count = self.tick_count.saturating_add(1);
    }

    /// Returns a snapshot and resets the window once the interval elapses.
    pub(crate) fn maybe_snapshot(&mut self, now: Instant) -> Option<LoopMetricsSnapshot> {
        let elapsed = now.saturating_duration_since(self.interval_start);
        if elapsed < self.interval {
            return None;
        }

        let elapsed_seconds = elapsed.as_secs_f32().max(f32::EPSILON);
        let frame_time_ms = if self.frame_count == 0 {
            0.0
        } else {
            (self.frame_time_total.as_secs_f32() / self.frame_count as f32) * 1000.0
        };
        let snapshot = LoopMetricsSnapshot {
            fps: self.frame_count as f32 / elapsed_seconds,
            tps: self.tick_count as f32 / elapsed_seconds,
            frame_time_ms,
        };

        self.interval_start = now;
        self.frame_count = 0;
        self.tick_count = 0;
        self.frame_time_total = Duration::ZERO;

        Some(snapshot)
    }
}
