use std::fmt;

const MILLIS_PER_SECOND: u64 = 1000;
const SECONDS_PER_MINUTE: u64 = 60;
const MINUTES_PER_HOUR: u64 = 60;

/// A point in playback time, as written in a subtitle file.
///
/// Minutes and seconds are kept exactly as they were read, so a value like
/// `00:99:00,000` survives parsing with `minutes == 99`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    pub(crate) hours: u64,
    pub(crate) minutes: u32,
    pub(crate) seconds: u32,
    pub(crate) millis: u32,
}

impl Timestamp {
    pub fn new(hours: u64, minutes: u32, seconds: u32, millis: u32) -> Self {
        Self {
            hours,
            minutes,
            seconds,
            millis,
        }
    }

    /// Flattens the fields into one millisecond count, or `None` if that
    /// count does not fit in a `u64`.
    pub fn total_millis(&self) -> Option<u64> {
        self.hours
            .checked_mul(MINUTES_PER_HOUR)?
            .checked_add(u64::from(self.minutes))?
            .checked_mul(SECONDS_PER_MINUTE)?
            .checked_add(u64::from(self.seconds))?
            .checked_mul(MILLIS_PER_SECOND)?
            .checked_add(u64::from(self.millis))
    }

    pub fn from_millis(total: u64) -> Self {
        let millis = total % MILLIS_PER_SECOND;
        let total_secs = total / MILLIS_PER_SECOND;
        let seconds = total_secs % SECONDS_PER_MINUTE;
        let total_mins = total_secs / SECONDS_PER_MINUTE;
        let minutes = total_mins % MINUTES_PER_HOUR;
        let hours = total_mins / MINUTES_PER_HOUR;

        // The remainders are bounded by 1000 and 60, so they always fit.
        Self {
            hours,
            minutes: minutes as u32,
            seconds: seconds as u32,
            millis: millis as u32,
        }
    }

    /// Whether minutes or seconds lie outside `0..=59`.
    pub fn has_out_of_range_fields(&self) -> bool {
        self.minutes > 59 || self.seconds > 59
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02},{:03}",
            self.hours, self.minutes, self.seconds, self.millis
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_write_ts {
        ($($name:ident: $value:expr,)*) => {
        $(
            #[test]
            fn $name() {
                let (input, expected) = $value;

                let ts = Timestamp::from_millis(input);

                assert_eq!(ts.to_string(), expected);
                assert_eq!(ts.total_millis(), Some(input));
            }
        )*
        }
    }

    test_write_ts! {
        test_write_ts_0: (0, "00:00:00,000"),
        test_write_ts_1: (1, "00:00:00,001"),
        test_write_ts_2: (999, "00:00:00,999"),
        test_write_ts_3: (1000, "00:00:01,000"),
        test_write_ts_4: (1001, "00:00:01,001"),
        test_write_ts_5: (59_999, "00:00:59,999"),
        test_write_ts_6: (60_000, "00:01:00,000"),
        test_write_ts_7: (3_600_000, "01:00:00,000"),
        test_write_ts_8: (7_326_159, "02:02:06,159"),
        test_write_ts_9: (34_380_001, "09:33:00,001"),
        test_write_ts_10: (360_000_001, "100:00:00,001"),
    }

    #[test]
    fn flattens_out_of_range_fields_literally() {
        let ts = Timestamp::new(0, 99, 0, 0);
        assert_eq!(ts.total_millis(), Some(99 * 60 * 1000));
        assert!(ts.has_out_of_range_fields());
        assert_eq!(ts.to_string(), "00:99:00,000");
    }

    #[test]
    fn normalises_fields_when_rebuilt_from_millis() {
        let ts = Timestamp::new(0, 99, 61, 0);
        let rebuilt = Timestamp::from_millis(ts.total_millis().unwrap());
        assert_eq!(rebuilt, Timestamp::new(1, 40, 1, 0));
        assert!(!rebuilt.has_out_of_range_fields());
    }

    #[test]
    fn total_millis_overflow_is_none() {
        assert_eq!(Timestamp::new(u64::MAX, 0, 0, 0).total_millis(), None);
        assert_eq!(
            Timestamp::new(u64::MAX / 3_600_000 + 1, 0, 0, 0).total_millis(),
            None
        );
    }

    #[test]
    fn largest_representable_value_round_trips() {
        let ts = Timestamp::from_millis(u64::MAX);
        assert_eq!(ts.total_millis(), Some(u64::MAX));
    }
}
