//
// ─── SESSION CLOCK ────────────────────────────────────────────────────────────
//

/// Lifecycle of the countdown.
///
/// `Expired` is terminal; no transition leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    Idle,
    Running,
    Paused,
    Expired,
}

/// Result of driving the clock one second forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// The clock was not `Running`; nothing changed.
    Ignored,
    /// One second consumed; time remains.
    Running { remaining_seconds: u32 },
    /// This tick consumed the last second. Fires exactly once.
    Expired,
}

/// Countdown timer for one test session.
///
/// The clock itself is passive: some driver calls [`SessionClock::tick`] once
/// a second while the session is live. The expiry transition happens on the
/// tick that consumes the final second, so `remaining_seconds` is exactly 0
/// the moment `Expired` is observed and never goes negative. Ticks landing
/// after expiry, or while paused, are ignored rather than clamped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClock {
    duration_seconds: u32,
    remaining_seconds: u32,
    state: ClockState,
}

impl SessionClock {
    /// Creates an idle clock holding the full duration.
    #[must_use]
    pub fn new(duration_seconds: u32) -> Self {
        Self {
            duration_seconds,
            remaining_seconds: duration_seconds,
            state: ClockState::Idle,
        }
    }

    #[must_use]
    pub fn state(&self) -> ClockState {
        self.state
    }

    #[must_use]
    pub fn duration_seconds(&self) -> u32 {
        self.duration_seconds
    }

    #[must_use]
    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    /// Seconds consumed so far.
    #[must_use]
    pub fn elapsed_seconds(&self) -> u32 {
        self.duration_seconds - self.remaining_seconds
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == ClockState::Running
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.state == ClockState::Expired
    }

    /// Starts (or restarts after a pause) the countdown. No-op once expired
    /// or already running.
    pub fn start(&mut self) {
        match self.state {
            ClockState::Idle | ClockState::Paused => self.state = ClockState::Running,
            ClockState::Running | ClockState::Expired => {}
        }
    }

    /// Suspends the countdown. No-op unless running.
    pub fn pause(&mut self) {
        if self.state == ClockState::Running {
            self.state = ClockState::Paused;
        }
    }

    /// Resumes a paused countdown. Refuses when no time remains, so a clock
    /// paused at zero cannot sidestep expiry.
    pub fn resume(&mut self) {
        if self.state == ClockState::Paused && self.remaining_seconds > 0 {
            self.state = ClockState::Running;
        }
    }

    /// Consumes one second of remaining time.
    pub fn tick(&mut self) -> Tick {
        if self.state != ClockState::Running {
            return Tick::Ignored;
        }
        if self.remaining_seconds <= 1 {
            self.remaining_seconds = 0;
            self.state = ClockState::Expired;
            return Tick::Expired;
        }
        self.remaining_seconds -= 1;
        Tick::Running {
            remaining_seconds: self.remaining_seconds,
        }
    }
}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//
