use std::time::{Duration, Instant};

/// 100ns ticks per second.
pub const TICKS_PER_SECOND: u64 = 10_000_000;
/// Overshoot below this is treated as landing on the deadline (1ms).
pub const OVERSHOOT_TOLERANCE: i64 = 10_000;
/// Early wake-up margin on platforms with coarse waits (1.5ms).
pub const EARLY_WAKE_MARGIN: i64 = 15_000;

const DEFAULT_TARGET_FPS: u32 = 60;

/// Monotonic time source in 100ns ticks.
pub trait Clock {
    fn now(&self) -> u64;
    fn sleep(&mut self, ticks: u64);
    /// Called on every busy-wait iteration.
    fn relax(&mut self);
}

/// `Instant` based clock used outside of tests.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> u64 {
        (self.origin.elapsed().as_nanos() / 100) as u64
    }

    fn sleep(&mut self, ticks: u64) {
        std::thread::sleep(Duration::from_nanos(ticks.saturating_mul(100)));
    }

    fn relax(&mut self) {
        std::thread::yield_now();
    }
}

/// How a platform's blocking wait behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingStrategy {
    /// Ticks subtracted from the wait so the thread wakes before the deadline.
    pub early_wake: i64,
    /// Spin (yielding) after waking until the deadline is reached.
    pub busy_wait: bool,
}

impl PacingStrategy {
    /// Plain sleep, trusted to be precise enough.
    pub const PRECISE: Self = Self { early_wake: 0, busy_wait: false };
    /// Wake early and spin the rest.
    pub const HYBRID: Self = Self { early_wake: EARLY_WAKE_MARGIN, busy_wait: true };

    pub fn for_current_platform() -> Self {
        if cfg!(any(windows, target_os = "macos")) {
            Self::HYBRID
        } else {
            Self::PRECISE
        }
    }
}

/// Lands successive buffer swaps on a fixed interval derived from a target fps.
pub struct FramePacer<C: Clock = MonotonicClock> {
    clock: C,
    strategy: PacingStrategy,
    target_fps: u32,
    interval: u64,
    previous: u64,
}

impl FramePacer<MonotonicClock> {
    pub fn new() -> Self {
        Self::with_clock(MonotonicClock::new(), PacingStrategy::for_current_platform())
    }
}

impl Default for FramePacer<MonotonicClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> FramePacer<C> {
    pub fn with_clock(clock: C, strategy: PacingStrategy) -> Self {
        let previous = clock.now();
        Self {
            clock,
            strategy,
            target_fps: DEFAULT_TARGET_FPS,
            interval: frame_interval(DEFAULT_TARGET_FPS),
            previous,
        }
    }

    pub fn set_target_fps(&mut self, fps: u32) {
        let fps = fps.max(1);
        if fps != self.target_fps {
            tracing::debug!("Frame pacer target: {} fps", fps);
        }
        self.target_fps = fps;
        self.interval = frame_interval(fps);
    }

    pub fn target_fps(&self) -> u32 {
        self.target_fps
    }

    /// Frame budget in 100ns ticks.
    pub fn interval(&self) -> u64 {
        self.interval
    }

    /// Timestamp of the last registered swap.
    pub fn previous_swap(&self) -> u64 {
        self.previous
    }

    /// Deadline for the upcoming swap.
    pub fn next_deadline(&self) -> u64 {
        self.previous + self.interval
    }

    /// Restart the schedule from `now`.
    pub fn reset(&mut self, now: u64) {
        self.previous = now;
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Block until the next deadline and register the swap time.
    pub fn wait_for_next_frame(&mut self) {
        let next = self.next_deadline();
        let mut now = self.clock.now();

        let mut left = next as i64 - now as i64;
        let remaining = left;
        left -= self.strategy.early_wake;
        if left > 0 {
            self.clock.sleep(left as u64);
        }

        if self.strategy.busy_wait {
            now = self.clock.now();
            while now < next {
                self.clock.relax();
                now = self.clock.now();
            }
        }

        now = self.clock.now();
        let overshoot = now as i64 - next as i64;
        if remaining > 0 && overshoot < OVERSHOOT_TOLERANCE {
            // Scheduler wake-up noise must not push later frames back.
            now = next;
        }
        self.previous = now;
    }
}

/// Ticks per frame, rounded to the nearest tick (60 fps -> 166_667).
pub fn frame_interval(fps: u32) -> u64 {
    let fps = fps.max(1) as u64;
    (TICKS_PER_SECOND + fps / 2) / fps
}
