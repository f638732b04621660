use std::time::{Duration, Instant};

use crate::chip8::Chip8;
use crate::constants::TIMER_HZ;
use crate::error::RuntimeError;

/// Longest stretch of wall time a single `run` will catch up on
pub const MAX_CATCH_UP: Duration = Duration::from_millis(250);

/// A monotonic time source
pub trait Clock {
    /// Time elapsed since some fixed point in the past
    fn now(&mut self) -> Duration;
}

/// Wall clock time
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        SystemClock {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&mut self) -> Duration {
        self.start.elapsed()
    }
}

/// A clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Duration,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }
}

impl Clock for ManualClock {
    fn now(&mut self) -> Duration {
        self.now
    }
}

/// What happened during one call to `Runner::run`
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub steps: u32,
    pub ticks: u32,
    pub display_dirty: bool,
    /// The latest sound on/off change, if any
    pub sound_changed: Option<bool>,
    /// Set when a step halted the machine
    pub halted: Option<RuntimeError>,
}

/// # Runner
/// Drives a `Chip8` at a fixed instruction rate with its timers at 60Hz.
///
/// Elapsed time is collected into two accumulators, one per cadence. Each
/// call to `run` drains them: one step per instruction period and one timer
/// tick per 1/60s. Hosts call `run` once per pass of their own loop and are
/// free to render and poll input at whatever rate suits them.
pub struct Runner<C: Clock> {
    clock: C,
    last: Duration,
    instruction_period: Duration,
    timer_period: Duration,
    instruction_time: Duration,
    timer_time: Duration,
}

impl<C: Clock> Runner<C> {
    pub fn new(mut clock: C, instructions_per_second: u32) -> Self {
        let last = clock.now();
        Runner {
            clock,
            last,
            instruction_period: Duration::from_secs(1) / instructions_per_second.max(1),
            timer_period: Duration::from_secs(1) / TIMER_HZ,
            instruction_time: Duration::ZERO,
            timer_time: Duration::ZERO,
        }
    }

    /// A runner at the instruction rate configured on `chip8`
    pub fn for_machine(clock: C, chip8: &Chip8) -> Self {
        Self::new(clock, chip8.config().instructions_per_second)
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Runs every instruction and timer tick that has come due since the last call.
    ///
    /// A fatal error stops stepping for the rest of the batch. It is returned
    /// in `Report::halted` alongside the effects of the steps before it.
    pub fn run(&mut self, chip8: &mut Chip8) -> Report {
        let now = self.clock.now();
        let elapsed = now.saturating_sub(self.last).min(MAX_CATCH_UP);
        self.last = now;
        self.instruction_time += elapsed;
        self.timer_time += elapsed;

        let mut report = Report::default();
        while self.instruction_time >= self.instruction_period {
            self.instruction_time -= self.instruction_period;
            if chip8.is_quit() || report.halted.is_some() {
                continue;
            }
            let effects = match chip8.step() {
                Ok(effects) => effects,
                Err(err) => {
                    report.halted = Some(err);
                    continue;
                }
            };
            report.steps += 1;
            report.display_dirty |= effects.display_dirty;
            if effects.sound_changed.is_some() {
                report.sound_changed = effects.sound_changed;
            }
        }
        while self.timer_time >= self.timer_period {
            self.timer_time -= self.timer_period;
            report.ticks += 1;
            if let Some(sound) = chip8.tick_timers() {
                report.sound_changed = Some(sound);
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chip8::Status;

    fn runner(ips: u32) -> Runner<ManualClock> {
        Runner::new(ManualClock::new(), ips)
    }

    fn self_jump() -> Chip8 {
        let mut chip8 = Chip8::new();
        chip8.load(&[0x12, 0x00]).unwrap();
        chip8
    }

    #[test]
    fn test_runs_nothing_without_elapsed_time() {
        let mut runner = runner(600);
        let mut chip8 = self_jump();
        assert_eq!(runner.run(&mut chip8), Report::default());
    }

    #[test]
    fn test_steps_at_instruction_rate() {
        let mut runner = runner(600);
        let mut chip8 = self_jump();
        runner.clock_mut().advance(Duration::from_millis(100));
        let report = runner.run(&mut chip8);
        assert_eq!(report.steps, 60);
        assert_eq!(report.ticks, 6);
    }

    #[test]
    fn test_ticks_at_60hz_regardless_of_instruction_rate() {
        for ips in [1, 500, 1000] {
            let mut runner = runner(ips);
            let mut chip8 = self_jump();
            for _ in 0..4 {
                runner.clock_mut().advance(Duration::from_millis(250));
                runner.run(&mut chip8);
            }
            let mut ticks = 0;
            let mut steps = 0;
            for _ in 0..100 {
                runner.clock_mut().advance(Duration::from_millis(10));
                let report = runner.run(&mut chip8);
                ticks += report.ticks;
                steps += report.steps;
            }
            assert!((59..=61).contains(&ticks), "{} ticks at {}ips", ticks, ips);
            assert!(steps + 1 >= ips && steps <= ips + 1, "{} steps at {}ips", steps, ips);
        }
    }

    #[test]
    fn test_remainders_carry_over() {
        let mut runner = runner(100);
        let mut chip8 = self_jump();
        runner.clock_mut().advance(Duration::from_millis(15));
        assert_eq!(runner.run(&mut chip8).steps, 1);
        runner.clock_mut().advance(Duration::from_millis(5));
        assert_eq!(runner.run(&mut chip8).steps, 1);
    }

    #[test]
    fn test_catch_up_is_capped() {
        let mut runner = runner(1000);
        let mut chip8 = self_jump();
        runner.clock_mut().advance(Duration::from_secs(10));
        let report = runner.run(&mut chip8);
        assert_eq!(report.steps, 250);
        assert_eq!(report.ticks, 15);
    }

    #[test]
    fn test_reports_sound_changes_from_timers() {
        let mut runner = runner(1000);
        let mut chip8 = Chip8::new();
        // LD V0, 1; LD ST, V0; JP 0x204
        chip8.load(&[0x60, 0x01, 0xF0, 0x18, 0x12, 0x04]).unwrap();
        runner.clock_mut().advance(Duration::from_millis(2));
        assert_eq!(runner.run(&mut chip8).sound_changed, Some(true));
        runner.clock_mut().advance(Duration::from_millis(20));
        let report = runner.run(&mut chip8);
        assert_eq!(report.ticks, 1);
        assert_eq!(report.sound_changed, Some(false));
    }

    #[test]
    fn test_stops_stepping_after_quit() {
        let mut runner = runner(1000);
        let mut chip8 = self_jump();
        chip8.request_quit();
        runner.clock_mut().advance(Duration::from_millis(10));
        assert_eq!(runner.run(&mut chip8).steps, 0);
        assert_eq!(chip8.status(), Status::Quit);
    }

    #[test]
    fn test_surfaces_fatal_errors() {
        let mut runner = runner(1000);
        let mut chip8 = Chip8::new();
        chip8.load(&[0x00, 0xEE]).unwrap();
        runner.clock_mut().advance(Duration::from_millis(10));
        let report = runner.run(&mut chip8);
        assert_eq!(report.halted, Some(RuntimeError::StackUnderflow));
        assert_eq!(report.steps, 0);
        assert_eq!(chip8.status(), Status::Halted(RuntimeError::StackUnderflow));
    }

    #[test]
    fn test_halt_keeps_effects_of_earlier_steps() {
        let mut runner = runner(1000);
        let mut chip8 = Chip8::new();
        // LD V0, 1; LD ST, V0; CLS; RET
        chip8
            .load(&[0x60, 0x01, 0xF0, 0x18, 0x00, 0xE0, 0x00, 0xEE])
            .unwrap();
        runner.clock_mut().advance(Duration::from_millis(20));
        let report = runner.run(&mut chip8);
        assert_eq!(report.steps, 3);
        assert!(report.display_dirty);
        assert_eq!(report.sound_changed, Some(true));
        assert_eq!(report.ticks, 1);
        assert_eq!(report.halted, Some(RuntimeError::StackUnderflow));
    }
}
