//! Liveness collaborator.
//!
//! Probing is owned by whoever holds the other end of a [`LivenessFlag`];
//! this crate only reads the boolean on every dispatch, so reads must be cheap
//! and never block.

use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};

pub trait Liveness: Send + Sync + Debug {
    fn is_alive(&self) -> bool;
}

/// Baseline liveness: every target is always reported alive.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysAlive;

impl Liveness for AlwaysAlive {
    fn is_alive(&self) -> bool {
        true
    }
}

/// A shared flag an external health checker flips.
#[derive(Debug)]
pub struct LivenessFlag {
    alive: AtomicBool,
}

impl LivenessFlag {
    pub fn new(alive: bool) -> Self {
        LivenessFlag {
            alive: AtomicBool::new(alive),
        }
    }

    pub fn mark_alive(&self) {
        self.alive.store(true, Ordering::Release);
    }

    pub fn mark_dead(&self) {
        self.alive.store(false, Ordering::Release);
    }
}

impl Default for LivenessFlag {
    fn default() -> Self {
        LivenessFlag::new(true)
    }
}

impl Liveness for LivenessFlag {
    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_flips() {
        let flag = LivenessFlag::default();
        assert!(flag.is_alive());
        flag.mark_dead();
        assert!(!flag.is_alive());
        flag.mark_alive();
        assert!(flag.is_alive());
    }

    #[test]
    fn always_alive() {
        assert!(AlwaysAlive.is_alive());
    }
}
