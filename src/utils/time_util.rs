use std::fmt;
use std::time::{self, SystemTime};

/// represent current time with seconds and fraction of a second in nanoseconds
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeDurationStruct {
    /// seconds
    pub sec: u64,
    /// fraction of a second in nanoseconds
    pub nsec: u32,
}

/// calculate what time is it since `1970-1-1 00:00:00`,named as [time::UNIX_EPOCH]
pub fn now() -> TimeDurationStruct {
    // a clock set before 1970 is reported as the epoch itself
    let now = SystemTime::now()
        .duration_since(time::UNIX_EPOCH)
        .unwrap_or_default();
    TimeDurationStruct {
        sec: now.as_secs(),
        nsec: now.subsec_nanos(),
    }
}

impl fmt::Display for TimeDurationStruct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.sec, self.nsec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_is_after_epoch() {
        let before = now();
        assert!(before.sec > 0);
        assert!(before.nsec < 1_000_000_000);
    }

    #[test]
    fn test_display() {
        let t = TimeDurationStruct { sec: 12, nsec: 5 };
        assert_eq!(t.to_string(), "12.000000005");
    }
}
