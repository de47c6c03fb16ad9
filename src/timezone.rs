//! Calendar day handling in the ledger's local timezone.

use std::{fmt, ops::RangeInclusive};

use time::{
    Date, Duration, OffsetDateTime, PrimitiveDateTime, UtcOffset,
    format_description::BorrowedFormatItem,
    macros::{format_description, time},
};
use time_tz::{Offset, OffsetResult, PrimitiveDateTimeExt, TimeZone, Tz};

use crate::Error;

/// The format of calendar dates in URLs and request bodies, e.g. "2024-01-05".
pub const ISO_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// The timezone that calendar days are computed in.
#[derive(Clone, Copy)]
pub struct LocalTimezone {
    zone: Zone,
}

#[derive(Clone, Copy)]
enum Zone {
    Utc,
    Named(&'static Tz),
}

impl LocalTimezone {
    /// Look up a timezone by its canonical name, e.g. "Pacific/Auckland".
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezoneError] if `canonical_timezone` is not a
    /// known timezone.
    pub fn from_name(canonical_timezone: &str) -> Result<Self, Error> {
        if canonical_timezone == "UTC" {
            return Ok(Self::utc());
        }

        time_tz::timezones::get_by_name(canonical_timezone)
            .map(|tz| Self {
                zone: Zone::Named(tz),
            })
            .ok_or_else(|| Error::InvalidTimezoneError(canonical_timezone.to_owned()))
    }

    /// UTC, the default ledger timezone.
    pub fn utc() -> Self {
        Self { zone: Zone::Utc }
    }

    /// The canonical name of the timezone.
    pub fn name(&self) -> &'static str {
        match self.zone {
            Zone::Utc => "UTC",
            Zone::Named(tz) => tz.name(),
        }
    }

    /// The UTC offset in effect at `instant`.
    pub fn offset_at(&self, instant: OffsetDateTime) -> UtcOffset {
        match self.zone {
            Zone::Utc => UtcOffset::UTC,
            Zone::Named(tz) => tz.get_offset_utc(&instant).to_utc(),
        }
    }

    /// The first millisecond of `date`.
    pub fn start_of_day(&self, date: Date) -> OffsetDateTime {
        self.assume_local(date.midnight())
    }

    /// The instants bounding `date`, from 00:00:00.000 to 23:59:59.999 local
    /// time, inclusive on both ends.
    pub fn day_bounds(&self, date: Date) -> RangeInclusive<OffsetDateTime> {
        let start = self.start_of_day(date);
        let end = match date.next_day() {
            Some(next_day) => self.start_of_day(next_day) - Duration::MILLISECOND,
            // The last representable day has no next day to count back from.
            None => self.assume_local(PrimitiveDateTime::new(date, time!(23:59:59.999))),
        };

        start..=end
    }

    /// Interpret a wall clock time as local time.
    ///
    /// A time repeated when clocks go back is taken as the earlier of the two
    /// instants. A time skipped when clocks go forward is taken as the instant
    /// the clocks jumped.
    pub fn assume_local(&self, date_time: PrimitiveDateTime) -> OffsetDateTime {
        let tz = match self.zone {
            Zone::Utc => return date_time.assume_utc(),
            Zone::Named(tz) => tz,
        };

        match date_time.assume_timezone(tz) {
            OffsetResult::Some(local) => local,
            OffsetResult::Ambiguous(first, second) => first.min(second),
            OffsetResult::None => self.end_of_gap(date_time),
        }
    }

    /// The instant the clocks jumped forward over the skipped wall clock time `date_time`.
    ///
    /// Searches the two days around `date_time` to the millisecond for the
    /// first instant with the offset in effect after the jump.
    fn end_of_gap(&self, date_time: PrimitiveDateTime) -> OffsetDateTime {
        let search_start = date_time.assume_utc().saturating_sub(Duration::DAY);
        let at = |millis: i64| search_start.saturating_add(Duration::milliseconds(millis));

        let mut before = 0_i64;
        let mut after = 2 * Duration::DAY.whole_milliseconds() as i64;
        let offset_after_jump = self.offset_at(at(after));

        while after - before > 1 {
            let middle = before + (after - before) / 2;

            if self.offset_at(at(middle)) == offset_after_jump {
                after = middle;
            } else {
                before = middle;
            }
        }

        at(after)
    }
}

impl Default for LocalTimezone {
    fn default() -> Self {
        Self::utc()
    }
}

impl fmt::Debug for LocalTimezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LocalTimezone").field(&self.name()).finish()
    }
}

impl PartialEq for LocalTimezone {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

/// Parse an ISO calendar date such as "2024-01-05".
///
/// # Errors
/// Returns [Error::Validation] if `text` is not a valid `YYYY-MM-DD` date.
pub fn parse_iso_date(text: &str) -> Result<Date, Error> {
    Date::parse(text, ISO_DATE_FORMAT).map_err(|error| {
        Error::Validation(format!(
            "\"{text}\" is not a valid date, expected YYYY-MM-DD: {error}"
        ))
    })
}

#[cfg(test)]
mod tests {
    use time::{
        Date, Duration,
        macros::{date, datetime},
    };

    use crate::{Error, timezone::parse_iso_date};

    use super::LocalTimezone;

    #[test]
    fn utc_day_bounds_cover_the_whole_day() {
        let bounds = LocalTimezone::utc().day_bounds(date!(2024 - 01 - 05));

        assert_eq!(*bounds.start(), datetime!(2024-01-05 00:00:00 UTC));
        assert_eq!(*bounds.end(), datetime!(2024-01-05 23:59:59.999 UTC));
    }

    #[test]
    fn day_bounds_use_local_offset() {
        let timezone = LocalTimezone::from_name("Pacific/Auckland").unwrap();

        let bounds = timezone.day_bounds(date!(2024 - 01 - 05));

        // New Zealand daylight time is UTC+13 in January.
        assert_eq!(*bounds.start(), datetime!(2024-01-04 11:00:00 UTC));
        assert_eq!(*bounds.end(), datetime!(2024-01-05 10:59:59.999 UTC));
    }

    #[test]
    fn day_bounds_follow_daylight_saving_changes() {
        let timezone = LocalTimezone::from_name("Pacific/Auckland").unwrap();

        // Daylight saving ended at 3am on 2024-04-07, making the day 25 hours long.
        let bounds = timezone.day_bounds(date!(2024 - 04 - 07));

        assert_eq!(
            *bounds.end() - *bounds.start(),
            Duration::hours(25) - Duration::MILLISECOND
        );
    }

    #[test]
    fn day_starting_inside_daylight_saving_gap() {
        let timezone = LocalTimezone::from_name("America/Santiago").unwrap();

        // Clocks in Chile jumped from 00:00 to 01:00 on 2024-09-08.
        let saturday = timezone.day_bounds(date!(2024 - 09 - 07));
        let sunday = timezone.day_bounds(date!(2024 - 09 - 08));

        assert_eq!(*saturday.start(), datetime!(2024-09-07 04:00:00 UTC));
        assert_eq!(*saturday.end(), datetime!(2024-09-08 03:59:59.999 UTC));
        assert_eq!(*sunday.start(), datetime!(2024-09-08 04:00:00 UTC));
        // 23:30 on Saturday, local time.
        assert!(saturday.contains(&datetime!(2024-09-08 03:30:00 UTC)));
        assert!(!sunday.contains(&datetime!(2024-09-08 03:30:00 UTC)));
    }

    #[test]
    fn repeated_wall_clock_time_uses_earlier_instant() {
        let timezone = LocalTimezone::from_name("Pacific/Auckland").unwrap();

        // 02:30 happened twice on 2024-04-07, first at +13 then at +12.
        let instant = timezone.assume_local(datetime!(2024-04-07 02:30:00));

        assert_eq!(instant, datetime!(2024-04-06 13:30:00 UTC));
    }

    #[test]
    fn last_representable_day_has_bounds() {
        for timezone in [
            LocalTimezone::utc(),
            LocalTimezone::from_name("Pacific/Auckland").unwrap(),
        ] {
            let bounds = timezone.day_bounds(Date::MAX);

            assert_eq!(
                *bounds.end() - *bounds.start(),
                Duration::DAY - Duration::MILLISECOND
            );
        }
    }

    #[test]
    fn unknown_timezone_is_an_error() {
        assert_eq!(
            LocalTimezone::from_name("Middle/Earth"),
            Err(Error::InvalidTimezoneError("Middle/Earth".to_owned()))
        );
    }

    #[test]
    fn parses_iso_date() {
        assert_eq!(parse_iso_date("2024-01-05"), Ok(date!(2024 - 01 - 05)));
    }

    #[test]
    fn rejects_malformed_dates() {
        for text in ["", "yesterday", "2024-13-01", "2024-02-30", "05/01/2024"] {
            assert!(
                matches!(parse_iso_date(text), Err(Error::Validation(_))),
                "expected {text:?} to be rejected"
            );
        }
    }
}
