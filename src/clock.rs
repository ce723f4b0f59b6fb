/// Session timing.
///
/// `SessionTimer` counts simulation time in whole frames so the expiry check
/// is exact; `FrameClock` converts monotonic wall time into the number of
/// fixed steps the driver owes the simulation.

use std::time::{Duration, Instant};

#[derive(Clone, Debug, PartialEq)]
pub struct SessionTimer {
    pub fps: u32,
    pub duration_secs: u32,
    /// Frames simulated since the session was activated.
    pub elapsed_frames: u64,
}

impl SessionTimer {
    pub fn new(fps: u32, duration_secs: u32) -> Self {
        SessionTimer {
            fps,
            duration_secs,
            elapsed_frames: 0,
        }
    }

    /// Seconds per frame.
    pub fn frame_delta(&self) -> f64 {
        1.0 / self.fps as f64
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_frames as f64 / self.fps as f64
    }

    fn duration_frames(&self) -> u64 {
        self.duration_secs as u64 * self.fps as u64
    }

    /// Whole seconds left: floor(duration − elapsed), never below zero.
    pub fn remaining_secs(&self) -> u32 {
        let left = self.duration_frames().saturating_sub(self.elapsed_frames);
        (left / self.fps as u64) as u32
    }

    pub fn expired(&self) -> bool {
        self.elapsed_frames >= self.duration_frames()
    }

    /// One frame later.
    pub fn tick(&self) -> SessionTimer {
        SessionTimer {
            elapsed_frames: self.elapsed_frames + 1,
            ..self.clone()
        }
    }

    /// Back to zero, keeping rate and duration.
    pub fn restart(&self) -> SessionTimer {
        SessionTimer::new(self.fps, self.duration_secs)
    }
}

/// Steps at most this many frames per call so a long stall (terminal
/// suspended, debugger) does not fast-forward the whole session.
pub const MAX_CATCH_UP_STEPS: u32 = 5;

/// Fixed-step pacing over a monotonic clock.
#[derive(Debug)]
pub struct FrameClock {
    step: Duration,
    last: Instant,
    backlog: Duration,
}

impl FrameClock {
    pub fn new(fps: u32, now: Instant) -> Self {
        FrameClock {
            step: Duration::from_secs_f64(1.0 / fps as f64),
            last: now,
            backlog: Duration::ZERO,
        }
    }

    /// Number of fixed steps that became due between the previous call and
    /// `now`.  Time that does not fill a whole step carries over.
    pub fn steps_due(&mut self, now: Instant) -> u32 {
        self.backlog += now.saturating_duration_since(self.last);
        self.last = now;

        let mut steps = 0;
        while self.backlog >= self.step && steps < MAX_CATCH_UP_STEPS {
            self.backlog -= self.step;
            steps += 1;
        }
        if steps == MAX_CATCH_UP_STEPS {
            self.backlog = Duration::ZERO;
        }
        steps
    }

    /// How long the driver may sleep before the next step is due.
    pub fn until_next(&self, now: Instant) -> Duration {
        let since = now.saturating_duration_since(self.last) + self.backlog;
        self.step.saturating_sub(since)
    }
}
