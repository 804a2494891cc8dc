//! vCard date and time types (RFC 6350 §4.3).
//!
//! vCard dates support partial/truncated forms that iCalendar doesn't allow.
//! vCard 3.0 writes the ISO 8601 extended format (`1996-04-15T10:22:00Z`);
//! 2.1 and 4.0 write the basic format (`19960415T102200Z`). Both are accepted
//! when parsing.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone, Utc};

use super::version::VCardVersion;

/// ISO 8601 rendering used by a version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    Basic,
    Extended,
}

impl DateFormat {
    #[must_use]
    pub const fn for_version(version: VCardVersion) -> Self {
        match version {
            VCardVersion::V3_0 => Self::Extended,
            VCardVersion::V2_1 | VCardVersion::V4_0 => Self::Basic,
        }
    }

    const fn is_extended(self) -> bool {
        matches!(self, Self::Extended)
    }
}

/// A vCard date value with optional truncation (RFC 6350 §4.3.1).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VCardDate {
    /// Full date (YYYY-MM-DD).
    Full(NaiveDate),
    /// Year and month only (YYYY-MM).
    YearMonth { year: i32, month: u32 },
    /// Year only (YYYY).
    Year(i32),
    /// Month only (--MM).
    Month(u32),
    /// Month and day, no year (--MM-DD).
    MonthDay { month: u32, day: u32 },
    /// Day only (---DD).
    Day(u32),
}

impl VCardDate {
    #[must_use]
    pub fn year_value(&self) -> Option<i32> {
        match self {
            Self::Full(d) => Some(d.year()),
            Self::YearMonth { year, .. } | Self::Year(year) => Some(*year),
            Self::Month(_) | Self::MonthDay { .. } | Self::Day(_) => None,
        }
    }

    #[must_use]
    pub fn month_value(&self) -> Option<u32> {
        match self {
            Self::Full(d) => Some(d.month()),
            Self::YearMonth { month, .. } | Self::Month(month) | Self::MonthDay { month, .. } => {
                Some(*month)
            }
            Self::Year(_) | Self::Day(_) => None,
        }
    }

    #[must_use]
    pub fn day_value(&self) -> Option<u32> {
        match self {
            Self::Full(d) => Some(d.day()),
            Self::MonthDay { day, .. } | Self::Day(day) => Some(*day),
            Self::Year(_) | Self::YearMonth { .. } | Self::Month(_) => None,
        }
    }

    fn format(&self, format: DateFormat) -> String {
        match (self, format.is_extended()) {
            (Self::Full(d), true) => d.format("%Y-%m-%d").to_string(),
            (Self::Full(d), false) => d.format("%Y%m%d").to_string(),
            (Self::YearMonth { year, month }, _) => format!("{year:04}-{month:02}"),
            (Self::Year(year), _) => format!("{year:04}"),
            (Self::Month(month), _) => format!("--{month:02}"),
            (Self::MonthDay { month, day }, true) => format!("--{month:02}-{day:02}"),
            (Self::MonthDay { month, day }, false) => format!("--{month:02}{day:02}"),
            (Self::Day(day), _) => format!("---{day:02}"),
        }
    }

    fn parse(s: &str) -> Option<Self> {
        if let Some(day) = s.strip_prefix("---") {
            return two_digits(day).filter(valid_day).map(Self::Day);
        }

        if let Some(rest) = s.strip_prefix("--") {
            let rest = rest.replace('-', "");
            if !all_digits(&rest) {
                return None;
            }
            return match rest.len() {
                2 => two_digits(&rest).filter(valid_month).map(Self::Month),
                4 => {
                    let month = two_digits(&rest[..2]).filter(valid_month)?;
                    let day = two_digits(&rest[2..]).filter(valid_day)?;
                    Some(Self::MonthDay { month, day })
                }
                _ => None,
            };
        }

        let bytes = s.as_bytes();
        match s.len() {
            10 if bytes[4] == b'-' && bytes[7] == b'-' => {
                NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().map(Self::Full)
            }
            8 if all_digits(s) => NaiveDate::parse_from_str(s, "%Y%m%d").ok().map(Self::Full),
            7 if bytes[4] == b'-' && all_digits(&s[..4]) => {
                let month = two_digits(&s[5..]).filter(valid_month)?;
                Some(Self::YearMonth {
                    year: s[..4].parse().ok()?,
                    month,
                })
            }
            4 if all_digits(s) => s.parse().ok().map(Self::Year),
            _ => None,
        }
    }
}

/// A vCard time value with optional truncation (RFC 6350 §4.3.2).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VCardTime {
    /// Full time (HH:MM:SS).
    Full(NaiveTime),
    /// Hour and minute only (HH:MM).
    HourMinute { hour: u32, minute: u32 },
    /// Hour only (HH).
    Hour(u32),
    /// Minute and second, no hour (-MM:SS).
    MinuteSecond { minute: u32, second: u32 },
    /// Second only (--SS).
    Second(u32),
}

impl VCardTime {
    fn format(&self, format: DateFormat) -> String {
        match (self, format.is_extended()) {
            (Self::Full(t), true) => t.format("%H:%M:%S").to_string(),
            (Self::Full(t), false) => t.format("%H%M%S").to_string(),
            (Self::HourMinute { hour, minute }, true) => format!("{hour:02}:{minute:02}"),
            (Self::HourMinute { hour, minute }, false) => format!("{hour:02}{minute:02}"),
            (Self::Hour(hour), _) => format!("{hour:02}"),
            (Self::MinuteSecond { minute, second }, true) => format!("-{minute:02}:{second:02}"),
            (Self::MinuteSecond { minute, second }, false) => format!("-{minute:02}{second:02}"),
            (Self::Second(second), _) => format!("--{second:02}"),
        }
    }

    fn parse(s: &str) -> Option<Self> {
        if let Some(second) = s.strip_prefix("--") {
            return two_digits(second).filter(|s| *s < 60).map(Self::Second);
        }

        if let Some(rest) = s.strip_prefix('-') {
            let rest = rest.replace(':', "");
            if rest.len() != 4 || !all_digits(&rest) {
                return None;
            }
            let minute = two_digits(&rest[..2]).filter(|m| *m < 60)?;
            let second = two_digits(&rest[2..]).filter(|s| *s < 60)?;
            return Some(Self::MinuteSecond { minute, second });
        }

        // Fractional seconds are dropped.
        let whole = s.split(['.', ',']).next().unwrap_or_default();
        let digits = whole.replace(':', "");
        if !all_digits(&digits) {
            return None;
        }
        match digits.len() {
            6 => {
                let (hour, minute, second) = (
                    two_digits(&digits[..2])?,
                    two_digits(&digits[2..4])?,
                    two_digits(&digits[4..])?,
                );
                NaiveTime::from_hms_opt(hour, minute, second).map(Self::Full)
            }
            4 => {
                let hour = two_digits(&digits[..2]).filter(|h| *h < 24)?;
                let minute = two_digits(&digits[2..]).filter(|m| *m < 60)?;
                Some(Self::HourMinute { hour, minute })
            }
            2 => two_digits(&digits).filter(|h| *h < 24).map(Self::Hour),
            _ => None,
        }
    }
}

/// Combined date and time, possibly partial (RFC 6350 §4.3.4).
///
/// This is the payload of BDAY, ANNIVERSARY and DEATHDATE.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DateAndOrTime {
    Date(VCardDate),
    DateTime {
        date: VCardDate,
        time: VCardTime,
        offset: Option<FixedOffset>,
    },
    Time {
        time: VCardTime,
        offset: Option<FixedOffset>,
    },
    /// Free-form text (vCard 4.0 only, e.g. "circa 1800").
    Text(String),
}

impl DateAndOrTime {
    /// Creates a full date from year/month/day.
    #[must_use]
    pub fn full_date(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(|d| Self::Date(VCardDate::Full(d)))
    }

    #[must_use]
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    #[must_use]
    pub fn as_date(&self) -> Option<&VCardDate> {
        match self {
            Self::Date(d) | Self::DateTime { date: d, .. } => Some(d),
            Self::Time { .. } | Self::Text(_) => None,
        }
    }

    #[must_use]
    pub fn as_time(&self) -> Option<&VCardTime> {
        match self {
            Self::DateTime { time: t, .. } | Self::Time { time: t, .. } => Some(t),
            Self::Date(_) | Self::Text(_) => None,
        }
    }

    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// Returns whether this is a truncated date or time, which only vCard 4.0
    /// can express.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        match self {
            Self::Date(date) => !matches!(date, VCardDate::Full(_)),
            Self::DateTime { date, time, .. } => {
                !matches!(date, VCardDate::Full(_)) || !matches!(time, VCardTime::Full(_))
            }
            Self::Time { .. } => true,
            Self::Text(_) => false,
        }
    }

    /// Formats the value. Text values are returned verbatim.
    #[must_use]
    pub fn format(&self, format: DateFormat) -> String {
        match self {
            Self::Date(date) => date.format(format),
            Self::DateTime { date, time, offset } => format!(
                "{}T{}{}",
                date.format(format),
                time.format(format),
                offset.map(|o| format_zone(o, format)).unwrap_or_default()
            ),
            Self::Time { time, offset } => format!(
                "T{}{}",
                time.format(format),
                offset.map(|o| format_zone(o, format)).unwrap_or_default()
            ),
            Self::Text(text) => text.clone(),
        }
    }

    /// Parses a date, date-time or time in either ISO 8601 format.
    ///
    /// Returns `None` for anything else; callers decide whether to keep the
    /// input as text.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(time) = s.strip_prefix('T') {
            let (time, offset) = split_offset(time)?;
            return Some(Self::Time {
                time: VCardTime::parse(time)?,
                offset,
            });
        }

        match s.split_once('T') {
            Some((date, time)) => {
                let (time, offset) = split_offset(time)?;
                Some(Self::DateTime {
                    date: VCardDate::parse(date)?,
                    time: VCardTime::parse(time)?,
                    offset,
                })
            }
            None => VCardDate::parse(s).map(Self::Date),
        }
    }
}

/// Timestamp value for REV property (RFC 6350 §6.7.4).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Timestamp {
    pub datetime: DateTime<Utc>,
}

impl Timestamp {
    #[must_use]
    pub fn new(datetime: DateTime<Utc>) -> Self {
        Self { datetime }
    }

    #[must_use]
    pub fn now() -> Self {
        Self {
            datetime: Utc::now(),
        }
    }

    #[must_use]
    pub fn format(&self, format: DateFormat) -> String {
        let pattern = if format.is_extended() {
            "%Y-%m-%dT%H:%M:%SZ"
        } else {
            "%Y%m%dT%H%M%SZ"
        };
        self.datetime.format(pattern).to_string()
    }

    /// Parses a full date-time (floating times are taken as UTC) or a full
    /// date (midnight UTC).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match DateAndOrTime::parse(s)? {
            DateAndOrTime::Date(VCardDate::Full(date)) => Some(Self::new(
                Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)),
            )),
            DateAndOrTime::DateTime {
                date: VCardDate::Full(date),
                time: VCardTime::Full(time),
                offset,
            } => {
                let offset = offset.unwrap_or(utc());
                let local = offset.from_local_datetime(&date.and_time(time)).single()?;
                Some(Self::new(local.with_timezone(&Utc)))
            }
            _ => None,
        }
    }
}

fn utc() -> FixedOffset {
    Utc.fix()
}

/// Formats a UTC offset as `+HH:MM` (extended) or `+HHMM` (basic).
#[must_use]
pub fn format_utc_offset(offset: FixedOffset, format: DateFormat) -> String {
    let seconds = offset.local_minus_utc();
    let sign = if seconds < 0 { '-' } else { '+' };
    let minutes = seconds.unsigned_abs() / 60;
    let (hours, minutes) = (minutes / 60, minutes % 60);
    if format.is_extended() {
        format!("{sign}{hours:02}:{minutes:02}")
    } else {
        format!("{sign}{hours:02}{minutes:02}")
    }
}

/// Parses `Z`, `+HH`, `+HHMM` or `+HH:MM`.
#[must_use]
pub fn parse_utc_offset(s: &str) -> Option<FixedOffset> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("z") {
        return Some(utc());
    }

    let (sign, rest) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };

    let digits = rest.replace(':', "");
    if !all_digits(&digits) {
        return None;
    }
    let (hours, minutes) = match digits.len() {
        2 => (two_digits(&digits)?, 0),
        4 => (two_digits(&digits[..2])?, two_digits(&digits[2..])?),
        _ => return None,
    };
    if hours > 23 || minutes > 59 {
        return None;
    }

    let seconds = i32::try_from((hours * 60 + minutes) * 60).ok()?;
    FixedOffset::east_opt(sign * seconds)
}

fn format_zone(offset: FixedOffset, format: DateFormat) -> String {
    if offset.local_minus_utc() == 0 {
        "Z".to_string()
    } else {
        format_utc_offset(offset, format)
    }
}

/// Splits a trailing zone designator off a time string.
fn split_offset(time: &str) -> Option<(&str, Option<FixedOffset>)> {
    if let Some(rest) = time.strip_suffix(['Z', 'z']) {
        return Some((rest, Some(utc())));
    }

    let bytes = time.as_bytes();
    let sign = (1..bytes.len())
        .rev()
        .find(|&i| matches!(bytes[i], b'+' | b'-') && bytes[i - 1].is_ascii_digit());

    match sign {
        Some(i) => Some((&time[..i], Some(parse_utc_offset(&time[i..])?))),
        None => Some((time, None)),
    }
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn two_digits(s: &str) -> Option<u32> {
    if s.len() == 2 && all_digits(s) {
        s.parse().ok()
    } else {
        None
    }
}

#[expect(clippy::trivially_copy_pass_by_ref, reason = "used with Option::filter")]
fn valid_month(month: &u32) -> bool {
    (1..=12).contains(month)
}

#[expect(clippy::trivially_copy_pass_by_ref, reason = "used with Option::filter")]
fn valid_day(day: &u32) -> bool {
    (1..=31).contains(day)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offset(hours: i32, minutes: i32) -> FixedOffset {
        FixedOffset::east_opt(hours * 3600 + hours.signum() * minutes * 60).unwrap()
    }

    #[test]
    fn parse_full_date_both_formats() {
        let expected = DateAndOrTime::full_date(1996, 4, 15).unwrap();
        assert_eq!(DateAndOrTime::parse("19960415"), Some(expected.clone()));
        assert_eq!(DateAndOrTime::parse("1996-04-15"), Some(expected));
    }

    #[test]
    fn parse_truncated_dates() {
        assert_eq!(
            DateAndOrTime::parse("--0415"),
            Some(DateAndOrTime::Date(VCardDate::MonthDay { month: 4, day: 15 }))
        );
        assert_eq!(
            DateAndOrTime::parse("---15"),
            Some(DateAndOrTime::Date(VCardDate::Day(15)))
        );
        assert_eq!(
            DateAndOrTime::parse("1996-04"),
            Some(DateAndOrTime::Date(VCardDate::YearMonth {
                year: 1996,
                month: 4
            }))
        );
        assert_eq!(
            DateAndOrTime::parse("1996"),
            Some(DateAndOrTime::Date(VCardDate::Year(1996)))
        );
    }

    #[test]
    fn parse_date_time_with_offset() {
        let value = DateAndOrTime::parse("1996-04-15T10:22:00-05:00").unwrap();
        let DateAndOrTime::DateTime { time, offset: o, .. } = &value else {
            panic!("expected date-time, got {value:?}");
        };
        assert_eq!(*time, VCardTime::Full(NaiveTime::from_hms_opt(10, 22, 0).unwrap()));
        assert_eq!(*o, Some(offset(-5, 0)));
        assert_eq!(value.format(DateFormat::Basic), "19960415T102200-0500");
    }

    #[test]
    fn parse_time_only() {
        let value = DateAndOrTime::parse("T1022Z").unwrap();
        assert!(value.is_partial());
        assert_eq!(value.format(DateFormat::Extended), "T10:22Z");
        assert_eq!(
            DateAndOrTime::parse("T-2200"),
            Some(DateAndOrTime::Time {
                time: VCardTime::MinuteSecond {
                    minute: 22,
                    second: 0
                },
                offset: None
            })
        );
    }

    #[test]
    fn reject_non_dates() {
        assert_eq!(DateAndOrTime::parse("circa 1800"), None);
        assert_eq!(DateAndOrTime::parse("1996-13-01"), None);
        assert_eq!(DateAndOrTime::parse("--1301"), None);
    }

    #[test]
    fn format_per_version() {
        let value = DateAndOrTime::full_date(1980, 3, 22).unwrap();
        assert_eq!(
            value.format(DateFormat::for_version(VCardVersion::V3_0)),
            "1980-03-22"
        );
        assert_eq!(
            value.format(DateFormat::for_version(VCardVersion::V4_0)),
            "19800322"
        );
        assert!(!value.is_partial());
    }

    #[test]
    fn timestamp_round_trip() {
        let ts = Timestamp::parse("1995-10-31T22:27:10Z").unwrap();
        assert_eq!(ts.format(DateFormat::Basic), "19951031T222710Z");
        assert_eq!(Timestamp::parse(&ts.format(DateFormat::Basic)), Some(ts));
    }

    #[test]
    fn timestamp_converts_offset_to_utc() {
        let ts = Timestamp::parse("19951031T222710+0100").unwrap();
        assert_eq!(ts.format(DateFormat::Extended), "1995-10-31T21:27:10Z");
    }

    #[test]
    fn utc_offsets() {
        assert_eq!(parse_utc_offset("-05:00"), Some(offset(-5, 0)));
        assert_eq!(parse_utc_offset("+0530"), Some(offset(5, 30)));
        assert_eq!(parse_utc_offset("Z"), Some(offset(0, 0)));
        assert_eq!(parse_utc_offset("0500"), None);
        assert_eq!(format_utc_offset(offset(-5, 0), DateFormat::Basic), "-0500");
        assert_eq!(format_utc_offset(offset(5, 30), DateFormat::Extended), "+05:30");
    }
}
