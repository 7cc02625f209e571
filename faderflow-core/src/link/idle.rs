use crate::config::IdleReset;

use super::elapsed_at_least;

/// Tracks how long a partial message has gone without a byte
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IdleTimer {
    policy: IdleReset,
    /// Time of the last byte while a message is open
    last_activity_ms: Option<u32>,
}

impl IdleTimer {
    pub fn new(policy: IdleReset) -> Self {
        Self {
            policy,
            last_activity_ms: None,
        }
    }

    /// A byte arrived inside an open message
    pub fn touch(&mut self, now_ms: u32) {
        self.last_activity_ms = Some(now_ms);
    }

    /// No message is open
    pub fn clear(&mut self) {
        self.last_activity_ms = None;
    }

    /// True once an open message has been idle past the policy window
    pub fn expired(&self, now_ms: u32) -> bool {
        match (self.policy, self.last_activity_ms) {
            (IdleReset::After { ms }, Some(last)) => elapsed_at_least(now_ms, last, ms),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_never_expires() {
        let mut timer = IdleTimer::new(IdleReset::Disabled);
        timer.touch(0);
        assert!(!timer.expired(u32::MAX / 2));
    }

    #[test]
    fn test_expires_after_window() {
        let mut timer = IdleTimer::new(IdleReset::After { ms: 500 });
        timer.touch(1000);
        assert!(!timer.expired(1499));
        assert!(timer.expired(1500));
    }

    #[test]
    fn test_touch_extends_window() {
        let mut timer = IdleTimer::new(IdleReset::After { ms: 500 });
        timer.touch(0);
        timer.touch(400);
        assert!(!timer.expired(800));
        assert!(timer.expired(900));
    }

    #[test]
    fn test_touch_after_poll_time_not_expired() {
        let mut timer = IdleTimer::new(IdleReset::After { ms: 500 });
        timer.touch(1001);
        assert!(!timer.expired(1000));
        assert!(timer.expired(1501));
    }

    #[test]
    fn test_cleared_never_expires() {
        let mut timer = IdleTimer::new(IdleReset::After { ms: 500 });
        timer.touch(0);
        timer.clear();
        assert!(!timer.expired(10_000));
    }
}
