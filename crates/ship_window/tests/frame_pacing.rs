use ship_window::pacer::{frame_interval, Clock, FramePacer, PacingStrategy, EARLY_WAKE_MARGIN};

/// Clock that only moves when told to, or when slept on.
#[derive(Default)]
struct ManualClock {
    now: u64,
    oversleep: u64,
    sleeps: Vec<u64>,
    relaxes: u32,
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.now
    }

    fn sleep(&mut self, ticks: u64) {
        self.sleeps.push(ticks);
        self.now += ticks + self.oversleep;
    }

    fn relax(&mut self) {
        self.relaxes += 1;
        self.now += 1_000;
    }
}

const T0: u64 = 1_000_000;

fn pacer(strategy: PacingStrategy) -> FramePacer<ManualClock> {
    let clock = ManualClock { now: T0, ..Default::default() };
    let mut pacer = FramePacer::with_clock(clock, strategy);
    pacer.set_target_fps(60);
    pacer
}

#[test]
fn interval_is_rounded_to_nearest_tick() {
    assert_eq!(frame_interval(60), 166_667);
    assert_eq!(frame_interval(30), 333_333);
    assert_eq!(frame_interval(144), 69_444);
    assert_eq!(frame_interval(20), 500_000);
}

#[test]
fn swap_lands_on_the_deadline() {
    let mut p = pacer(PacingStrategy::PRECISE);
    p.clock_mut().now += 50_000; // frame work

    p.wait_for_next_frame();

    assert_eq!(p.previous_swap(), T0 + 166_667);
    assert_eq!(p.clock().sleeps, vec![116_667]);
}

#[test]
fn small_overshoot_is_snapped_to_the_deadline() {
    let mut p = pacer(PacingStrategy::PRECISE);
    p.clock_mut().oversleep = 5_000;

    p.wait_for_next_frame();

    assert_eq!(p.clock().now, T0 + 166_667 + 5_000);
    assert_eq!(p.previous_swap(), T0 + 166_667);
}

#[test]
fn large_overshoot_is_recorded() {
    let mut p = pacer(PacingStrategy::PRECISE);
    p.clock_mut().oversleep = 20_000;

    p.wait_for_next_frame();

    assert_eq!(p.previous_swap(), T0 + 166_667 + 20_000);
}

#[test]
fn overrun_frame_restarts_from_now() {
    let mut p = pacer(PacingStrategy::PRECISE);
    p.clock_mut().now += 300_000;

    p.wait_for_next_frame();

    assert!(p.clock().sleeps.is_empty());
    assert_eq!(p.previous_swap(), T0 + 300_000);
}

#[test]
fn hybrid_wakes_early_then_spins() {
    let mut p = pacer(PacingStrategy::HYBRID);

    p.wait_for_next_frame();

    assert_eq!(p.clock().sleeps, vec![166_667 - EARLY_WAKE_MARGIN as u64]);
    assert_eq!(p.clock().relaxes, 15);
    assert_eq!(p.previous_swap(), T0 + 166_667);
}

#[test]
fn schedule_does_not_drift() {
    let mut p = pacer(PacingStrategy::PRECISE);
    p.clock_mut().oversleep = 3_000;

    for _ in 0..10 {
        p.clock_mut().now += 10_000;
        p.wait_for_next_frame();
    }

    assert_eq!(p.previous_swap(), T0 + 10 * 166_667);
}

#[test]
fn zero_fps_is_clamped() {
    let mut p = pacer(PacingStrategy::PRECISE);
    p.set_target_fps(0);
    assert_eq!(p.target_fps(), 1);
    assert_eq!(p.interval(), 10_000_000);
}
