//! Fixed-rate frame pacing.
//!
//! Each tick gets a budget of `1s / fps`. [`FramePacer::wait`] sleeps until
//! the end of the current budget; if the loop has fallen behind it does not
//! try to catch up, it re-syncs the schedule to now. The achieved rate is
//! measured over one-second windows.

use std::time::{Duration, Instant};

const FPS_WINDOW: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct FramePacer {
    budget: Duration,
    next_deadline: Option<Instant>,
    frames: u64,
    window_start: Option<Instant>,
    window_frames: u32,
    measured_fps: f64,
}

impl FramePacer {
    /// Pacer for `fps` frames per second. Zero means unpaced.
    pub fn new(fps: u32) -> Self {
        let budget = if fps == 0 {
            Duration::ZERO
        } else {
            Duration::from_secs(1) / fps
        };
        Self {
            budget,
            next_deadline: None,
            frames: 0,
            window_start: None,
            window_frames: 0,
            measured_fps: 0.0,
        }
    }

    /// Pacer that never sleeps; still counts frames and measures FPS.
    pub fn unpaced() -> Self {
        Self::new(0)
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Frames completed so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Rate achieved over the last full measurement window.
    pub fn measured_fps(&self) -> f64 {
        self.measured_fps
    }

    /// End the current frame, sleeping out the rest of its budget.
    pub fn wait(&mut self) {
        let sleep = self.advance(Instant::now());
        if !sleep.is_zero() {
            std::thread::sleep(sleep);
        }
    }

    /// Book-keeping for a frame ending at `now`; returns how long to sleep.
    pub(crate) fn advance(&mut self, now: Instant) -> Duration {
        self.frames += 1;
        self.measure(now);

        let deadline = self.next_deadline.unwrap_or(now + self.budget);
        if now < deadline {
            self.next_deadline = Some(deadline + self.budget);
            deadline - now
        } else {
            if self.next_deadline.is_some() && !self.budget.is_zero() {
                log::trace!("frame over budget by {:?}, resyncing", now - deadline);
            }
            self.next_deadline = Some(now + self.budget);
            Duration::ZERO
        }
    }

    fn measure(&mut self, now: Instant) {
        let start = *self.window_start.get_or_insert(now);
        self.window_frames += 1;
        let elapsed = now.saturating_duration_since(start);
        if elapsed >= FPS_WINDOW {
            self.measured_fps = self.window_frames as f64 / elapsed.as_secs_f64();
            log::debug!("fps: {:.1}", self.measured_fps);
            self.window_start = Some(now);
            self.window_frames = 0;
        }
    }
}
