use jiff::{SignedDuration, Timestamp};

/// How long a short URL stays resolvable after it was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Retention(SignedDuration);

impl Retention {
    pub const DEFAULT_DAYS: u32 = 30;

    pub fn from_days(days: u32) -> Self {
        Self(SignedDuration::from_hours(i64::from(days) * 24))
    }

    pub fn from_duration(duration: SignedDuration) -> Self {
        Self(duration)
    }

    pub fn as_duration(&self) -> SignedDuration {
        self.0
    }

    /// Whole seconds of the window, clamped at zero. Used for native store TTLs.
    pub fn as_secs(&self) -> u64 {
        self.0.as_secs().max(0) as u64
    }

    /// The instant a record created at `created_at` stops resolving.
    pub fn expires_at(&self, created_at: Timestamp) -> Timestamp {
        created_at.checked_add(self.0).unwrap_or(Timestamp::MAX)
    }

    /// Records created at or before the returned instant are expired at `now`.
    pub fn cutoff(&self, now: Timestamp) -> Timestamp {
        now.checked_sub(self.0).unwrap_or(Timestamp::MIN)
    }

    pub fn is_expired(&self, created_at: Timestamp, now: Timestamp) -> bool {
        now >= self.expires_at(created_at)
    }
}

impl Default for Retention {
    fn default() -> Self {
        Self::from_days(Self::DEFAULT_DAYS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(second: i64) -> Timestamp {
        Timestamp::from_second(second).unwrap()
    }

    #[test]
    fn default_is_thirty_days() {
        assert_eq!(Retention::default().as_secs(), 30 * 24 * 60 * 60);
    }

    #[test]
    fn expiry_boundary_is_inclusive() {
        let retention = Retention::from_duration(SignedDuration::from_secs(60));
        let created = ts(1_000);

        assert!(!retention.is_expired(created, ts(1_000)));
        assert!(!retention.is_expired(created, ts(1_059)));
        assert!(retention.is_expired(created, ts(1_060)));
        assert!(retention.is_expired(created, ts(5_000)));
    }

    #[test]
    fn cutoff_matches_is_expired() {
        let retention = Retention::from_days(30);
        let now = ts(1_700_000_000);
        let cutoff = retention.cutoff(now);

        assert!(retention.is_expired(cutoff, now));
        assert!(!retention.is_expired(ts(cutoff.as_second() + 1), now));
    }

    #[test]
    fn saturates_instead_of_overflowing() {
        let retention = Retention::from_duration(SignedDuration::MAX);
        assert_eq!(retention.expires_at(ts(0)), Timestamp::MAX);
        assert_eq!(retention.cutoff(ts(0)), Timestamp::MIN);
    }
}
