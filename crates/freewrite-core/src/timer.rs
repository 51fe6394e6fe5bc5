//! Countdown timer
//!
//! A plain state machine: `Idle` (0:00) → `Running` → `Idle` on expiry or
//! `clear()`. Nothing here knows about wall-clock time; the caller invokes
//! [`CountdownTimer::tick`] once per second.

use thiserror::Error;
use tracing::{debug, info};

/// Durations, in minutes, offered when setting the timer
pub const TIMER_PRESETS: [u32; 5] = [5, 10, 15, 20, 30];

/// Errors that can occur when starting the timer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    #[error("Timer duration must be at least one minute")]
    ZeroMinutes,
}

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// The timer was not running; nothing changed
    Idle,
    /// One second was taken off the remaining time
    Running,
    /// This tick brought the countdown to 0:00 and stopped it
    Expired,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountdownTimer {
    minutes_remaining: u32,
    /// Always in `0..=59`
    seconds_remaining: u32,
    is_running: bool,
}

impl CountdownTimer {
    /// A stopped timer at 0:00
    pub fn new() -> Self {
        Self::default()
    }

    pub fn minutes_remaining(&self) -> u32 {
        self.minutes_remaining
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    /// Total time left, in seconds
    pub fn remaining_secs(&self) -> u64 {
        u64::from(self.minutes_remaining) * 60 + u64::from(self.seconds_remaining)
    }

    /// Start counting down from `minutes`:00, replacing any running countdown
    pub fn start(&mut self, minutes: u32) -> Result<(), TimerError> {
        if minutes == 0 {
            return Err(TimerError::ZeroMinutes);
        }

        self.minutes_remaining = minutes;
        self.seconds_remaining = 0;
        self.is_running = true;
        info!(minutes, "Timer started");
        Ok(())
    }

    /// Stop and reset to 0:00
    pub fn clear(&mut self) {
        if self.is_running {
            debug!("Timer cleared while running");
        }
        *self = Self::default();
    }

    /// Advance the countdown by one second
    pub fn tick(&mut self) -> Tick {
        if !self.is_running {
            return Tick::Idle;
        }

        if self.seconds_remaining > 0 {
            self.seconds_remaining -= 1;
        } else if self.minutes_remaining > 0 {
            self.minutes_remaining -= 1;
            self.seconds_remaining = 59;
        }

        // The tick that reaches 0:00 is the last one
        if self.remaining_secs() == 0 {
            self.is_running = false;
            info!("Timer expired");
            return Tick::Expired;
        }

        Tick::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(timer: &CountdownTimer) -> (u32, u32, bool) {
        (
            timer.minutes_remaining(),
            timer.seconds_remaining(),
            timer.is_running(),
        )
    }

    #[test]
    fn test_new_timer_is_idle() {
        let mut timer = CountdownTimer::new();
        assert_eq!(state(&timer), (0, 0, false));
        assert_eq!(timer.tick(), Tick::Idle);
        assert_eq!(state(&timer), (0, 0, false));
    }

    #[test]
    fn test_first_tick_borrows_a_minute() {
        let mut timer = CountdownTimer::new();
        timer.start(5).unwrap();
        assert_eq!(state(&timer), (5, 0, true));

        assert_eq!(timer.tick(), Tick::Running);
        assert_eq!(state(&timer), (4, 59, true));

        timer.tick();
        assert_eq!(state(&timer), (4, 58, true));
    }

    #[test]
    fn test_full_countdown() {
        let mut timer = CountdownTimer::new();
        timer.start(5).unwrap();

        for _ in 0..299 {
            assert_eq!(timer.tick(), Tick::Running);
        }
        assert_eq!(state(&timer), (0, 1, true));

        assert_eq!(timer.tick(), Tick::Expired);
        assert_eq!(state(&timer), (0, 0, false));

        assert_eq!(timer.tick(), Tick::Idle);
        assert_eq!(state(&timer), (0, 0, false));
    }

    #[test]
    fn test_five_minutes_is_over_after_300_ticks() {
        let mut timer = CountdownTimer::new();
        timer.start(5).unwrap();

        for _ in 0..300 {
            timer.tick();
        }
        assert_eq!(state(&timer), (0, 0, false));
        assert_eq!(timer.remaining_secs(), 0);
    }

    #[test]
    fn test_one_minute_expires_on_sixtieth_tick() {
        let mut timer = CountdownTimer::new();
        timer.start(1).unwrap();

        for _ in 0..59 {
            timer.tick();
        }
        assert_eq!(state(&timer), (0, 1, true));
        assert_eq!(timer.tick(), Tick::Expired);
        assert_eq!(state(&timer), (0, 0, false));
    }

    #[test]
    fn test_restart_overwrites() {
        let mut timer = CountdownTimer::new();
        timer.start(10).unwrap();
        for _ in 0..30 {
            timer.tick();
        }

        timer.start(5).unwrap();
        assert_eq!(state(&timer), (5, 0, true));
        assert_eq!(timer.remaining_secs(), 300);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut timer = CountdownTimer::new();
        timer.start(20).unwrap();
        timer.tick();

        timer.clear();
        assert_eq!(state(&timer), (0, 0, false));
        timer.clear();
        assert_eq!(state(&timer), (0, 0, false));

        assert_eq!(timer.tick(), Tick::Idle);
    }

    #[test]
    fn test_zero_minutes_rejected() {
        let mut timer = CountdownTimer::new();
        timer.start(15).unwrap();
        timer.tick();

        assert_eq!(timer.start(0), Err(TimerError::ZeroMinutes));
        assert_eq!(state(&timer), (14, 59, true));
    }

    #[test]
    fn test_presets_are_startable() {
        for minutes in TIMER_PRESETS {
            let mut timer = CountdownTimer::new();
            timer.start(minutes).unwrap();
            assert_eq!(timer.remaining_secs(), u64::from(minutes) * 60);
        }
    }
}
