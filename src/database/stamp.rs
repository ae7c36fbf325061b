use chrono::{DateTime, Datelike, FixedOffset, NaiveDateTime, SubsecRound, Timelike, Utc};

/// A wall-clock timestamp paired with its numeric `*_order` mirror.
///
/// The order value is the timestamp flattened to `YYYYMMDDHHmmss`, so
/// `2024-03-05 10:15:00` becomes `20240305101500`. Ordering and keyset
/// pagination compare on this column, never on the timestamp text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stamp {
    pub at: NaiveDateTime,
    pub order: i64,
}

impl Stamp {
    /// Stamp "now" as seen in the given offset
    pub fn now(offset: FixedOffset) -> Self {
        Self::from_utc(Utc::now(), offset)
    }

    pub fn from_utc(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self::from_naive(now.with_timezone(&offset).naive_local())
    }

    /// Sub-second precision is dropped so `at` and `order` always agree
    pub fn from_naive(at: NaiveDateTime) -> Self {
        let at = at.trunc_subsecs(0);
        Self { at, order: order_of(&at) }
    }
}

pub fn order_of(at: &NaiveDateTime) -> i64 {
    i64::from(at.year()) * 10_000_000_000
        + i64::from(at.month()) * 100_000_000
        + i64::from(at.day()) * 1_000_000
        + i64::from(at.hour()) * 10_000
        + i64::from(at.minute()) * 100
        + i64::from(at.second())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn naive(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .and_then(|date| date.and_hms_opt(h, mi, s))
            .unwrap()
    }

    #[test]
    fn flattens_timestamp_to_order() {
        assert_eq!(order_of(&naive(2024, 3, 5, 10, 15, 0)), 20240305101500);
        assert_eq!(order_of(&naive(1999, 12, 31, 23, 59, 59)), 19991231235959);
    }

    #[test]
    fn order_follows_time() {
        let earlier = Stamp::from_naive(naive(2024, 3, 5, 23, 59, 59));
        let later = Stamp::from_naive(naive(2024, 3, 6, 0, 0, 0));
        assert!(earlier.order < later.order);
    }

    #[test]
    fn applies_offset_before_flattening() {
        let utc = Utc.with_ymd_and_hms(2024, 3, 5, 2, 15, 0).unwrap();
        let sgt = FixedOffset::east_opt(8 * 3600).unwrap();
        let stamp = Stamp::from_utc(utc, sgt);
        assert_eq!(stamp.at, naive(2024, 3, 5, 10, 15, 0));
        assert_eq!(stamp.order, 20240305101500);
    }

    #[test]
    fn drops_subseconds() {
        let at = naive(2024, 3, 5, 10, 15, 0) + chrono::Duration::milliseconds(750);
        let stamp = Stamp::from_naive(at);
        assert_eq!(stamp.at, naive(2024, 3, 5, 10, 15, 0));
        assert_eq!(stamp.order, 20240305101500);
    }
}
