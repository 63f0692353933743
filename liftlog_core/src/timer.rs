//! Rest countdown timer for live sessions.
//!
//! A plain whole-second countdown driven by the caller's 1-second tick.
//! The single owned instance is the "at most one active countdown"
//! guarantee: reseeding always stops the previous run before arming a
//! new one. The timer is deliberately never persisted; a reload starts
//! over from the exercise's configured rest duration.

use crate::parse::fmt_mmss;

/// Outcome of one timer tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerTick {
    /// Not running; nothing happened
    Idle,
    /// Still counting down, with seconds remaining
    Running(u32),
    /// Just reached zero; the timer has stopped itself
    Finished,
}

/// Whole-second rest countdown
#[derive(Clone, Debug, Default)]
pub struct RestTimer {
    remaining: u32,
    running: bool,
}

impl RestTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Load a duration without starting the countdown
    pub fn set(&mut self, seconds: u32) {
        self.remaining = seconds;
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Abandon the current rest entirely
    pub fn skip(&mut self) {
        self.stop();
        self.remaining = 0;
    }

    /// Stop any previous countdown, load `seconds` and start fresh
    pub fn reseed(&mut self, seconds: u32) {
        self.stop();
        self.set(seconds);
        self.start();
    }

    /// Advance by one second. Reaching zero is terminal and idempotent:
    /// `Finished` is reported exactly once, further ticks are `Idle`.
    pub fn tick(&mut self) -> TimerTick {
        if !self.running {
            return TimerTick::Idle;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.stop();
            TimerTick::Finished
        } else {
            TimerTick::Running(self.remaining)
        }
    }

    /// Remaining time as `MM:SS`
    pub fn display(&self) -> String {
        fmt_mmss(self.remaining as i64)
    }
}
