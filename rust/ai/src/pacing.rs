//! Cosmetic pacing of computer decisions.
//!
//! A [`Pacer`] only delays; the decision itself is the provider's synchronous
//! call, so correctness never depends on the delay.

use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pacer {
    delay: Duration,
}

impl Pacer {
    /// No delay, used for simulations and tests.
    pub fn immediate() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::with_delay(Duration::from_millis(ms))
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Waits out the delay, then runs `decide`.
    pub fn decide<T>(&self, decide: impl FnOnce() -> T) -> T {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        decide()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_immediate_runs_without_waiting() {
        let pacer = Pacer::immediate();
        assert_eq!(pacer.decide(|| 7), 7);
        assert!(pacer.delay().is_zero());
    }

    #[test]
    fn test_delay_is_applied_before_deciding() {
        let pacer = Pacer::from_millis(20);
        let start = Instant::now();
        let took = pacer.decide(|| start.elapsed());
        assert!(took >= Duration::from_millis(20));
    }
}
