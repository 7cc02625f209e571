use super::elapsed_at_least;

/// Repeats the identity announcement until the host acknowledges it
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HandshakeBeacon {
    interval_ms: u32,
    last_sent_ms: Option<u32>,
    acknowledged: bool,
}

impl HandshakeBeacon {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            last_sent_ms: None,
            acknowledged: false,
        }
    }

    /// Returns true when an announcement is due, and records it as sent
    ///
    /// The first call after boot is always due.
    pub fn poll(&mut self, now_ms: u32) -> bool {
        if self.acknowledged {
            return false;
        }

        let due = match self.last_sent_ms {
            None => true,
            Some(last) => elapsed_at_least(now_ms, last, self.interval_ms),
        };
        if due {
            self.last_sent_ms = Some(now_ms);
        }
        due
    }

    /// An announcement went out for another reason; restart the interval
    pub fn note_sent(&mut self, now_ms: u32) {
        self.last_sent_ms = Some(now_ms);
    }

    /// Stop announcing
    pub fn acknowledge(&mut self) {
        self.acknowledged = true;
    }

    pub fn is_acknowledged(&self) -> bool {
        self.acknowledged
    }
}
