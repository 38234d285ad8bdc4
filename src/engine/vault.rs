//! Timer-driven vault unlock gate.
//!
//! This is a cosmetic simulation of a biometric prompt, not authentication:
//! no credential is checked. Time is always passed in, so tests can step it.

use std::time::{Duration, Instant};

use serde::Serialize;

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock used by the server.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// How long each phase of the gate lasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VaultDelays {
    /// Time spent in `Scanning` before reporting success.
    pub scan: Duration,
    /// Time spent in `Success` before the unlock event fires.
    pub settle: Duration,
}

impl Default for VaultDelays {
    fn default() -> Self {
        Self {
            scan: Duration::from_millis(2000),
            settle: Duration::from_millis(800),
        }
    }
}

/// Externally visible phase of the gate.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VaultStatus {
    Idle,
    Scanning,
    Success,
}

/// Events the gate emits to its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultEvent {
    /// The vault is now unlocked.
    Unlocked,
    /// The prompt was dismissed; the private tag selection must be cleared.
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Scanning { since: Instant },
    Success { since: Instant },
}

/// idle -> scanning -> success -> idle state machine.
#[derive(Debug, Clone)]
pub struct VaultGate {
    delays: VaultDelays,
    phase: Phase,
}

impl VaultGate {
    pub fn new(delays: VaultDelays) -> Self {
        Self {
            delays,
            phase: Phase::Idle,
        }
    }

    pub fn status(&self) -> VaultStatus {
        match self.phase {
            Phase::Idle => VaultStatus::Idle,
            Phase::Scanning { .. } => VaultStatus::Scanning,
            Phase::Success { .. } => VaultStatus::Success,
        }
    }

    /// Start scanning. Returns false if the gate was already running.
    pub fn open(&mut self, now: Instant) -> bool {
        if self.phase != Phase::Idle {
            return false;
        }
        self.phase = Phase::Scanning { since: now };
        true
    }

    /// Move the gate forward to `now`, returning `Unlocked` when the settle
    /// delay elapses. Several phases may pass in one call.
    pub fn advance(&mut self, now: Instant) -> Option<VaultEvent> {
        if let Phase::Scanning { since } = self.phase {
            let done = since + self.delays.scan;
            if now >= done {
                self.phase = Phase::Success { since: done };
            }
        }

        if let Phase::Success { since } = self.phase {
            if now >= since + self.delays.settle {
                self.phase = Phase::Idle;
                return Some(VaultEvent::Unlocked);
            }
        }

        None
    }

    /// Abort the prompt from any phase.
    pub fn cancel(&mut self) -> VaultEvent {
        self.phase = Phase::Idle;
        VaultEvent::Cancelled
    }
}

/// Whether the gate should be opened for a view with this tag.
pub fn needs_unlock(tag: Option<&str>, unlocked: bool) -> bool {
    tag == Some(crate::models::PRIVATE_TAG) && !unlocked
}

/// Clock that only moves when told to.
#[cfg(test)]
pub struct ManualClock {
    now: std::sync::Mutex<Instant>,
}

#[cfg(test)]
impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: std::sync::Mutex::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap()
    }
}
