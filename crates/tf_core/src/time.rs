//! Frame pacing for the editor loop.
//!
//! The loop is throttled by rejection rather than accumulation: a redraw
//! poll arriving earlier than the minimum frame interval does no work at
//! all, so the effective tick rate is capped independently of the display
//! refresh rate. Each accepted tick carries the measured wall-clock delta
//! in whole milliseconds, which is what entity movement integrates over.

use std::time::{Duration, Instant};

const FRAME_SAMPLE_COUNT: usize = 60;
const STALL_WARNING: Duration = Duration::from_secs(1);

/// One accepted tick of the frame clock.
#[derive(Debug, Clone, Copy)]
pub struct FrameTick {
    /// Milliseconds since the previously accepted tick.
    pub delta_ms: u64,
    /// Global frame counter after this tick. Drives animator parity.
    pub frame_count: u64,
}

pub struct FrameClock {
    min_frame_interval: Duration,
    last_accepted: Instant,
    frame_count: u64,

    frame_samples: [f64; FRAME_SAMPLE_COUNT],
    frame_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl FrameClock {
    /// A clock capping the loop at `target_tps` ticks per second.
    pub fn new(target_tps: u32) -> Self {
        let target_tps = target_tps.max(1);
        let interval = Duration::from_millis(1000 / u64::from(target_tps));
        let seconds = interval.as_secs_f64();
        Self {
            min_frame_interval: interval,
            last_accepted: Instant::now(),
            frame_count: 0,
            frame_samples: [seconds; FRAME_SAMPLE_COUNT],
            frame_sample_index: 0,
            smoothed_fps: 1.0 / seconds,
            smoothed_frame_time_ms: seconds * 1000.0,
        }
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Accept or reject a poll happening now.
    pub fn try_tick(&mut self) -> Option<FrameTick> {
        self.accept(Instant::now())
    }

    /// Accept or reject a poll at an explicit instant. Split out from
    /// `try_tick` so pacing is testable without real sleeps.
    pub fn accept(&mut self, now: Instant) -> Option<FrameTick> {
        let elapsed = now.duration_since(self.last_accepted);
        if elapsed < self.min_frame_interval {
            return None;
        }
        if elapsed > STALL_WARNING {
            log::warn!("Frame stalled for {:.0}ms", elapsed.as_secs_f64() * 1000.0);
        }
        self.last_accepted = now;
        self.frame_count += 1;

        self.frame_samples[self.frame_sample_index] = elapsed.as_secs_f64();
        self.frame_sample_index = (self.frame_sample_index + 1) % FRAME_SAMPLE_COUNT;
        let avg: f64 = self.frame_samples.iter().sum::<f64>() / FRAME_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg * 1000.0;
        self.smoothed_fps = if avg > 0.0 { 1.0 / avg } else { 0.0 };

        Some(FrameTick {
            delta_ms: elapsed.as_millis() as u64,
            frame_count: self.frame_count,
        })
    }
}
