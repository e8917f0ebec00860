use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, FixedOffset, LocalResult, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;
use tracing::debug;

/// Errors raised while parsing or resolving a deadline rule
#[derive(Debug, Error)]
pub enum DeadlineError {
    #[error("unknown deadline rule `{0}` (expected `fixed:<rfc3339>` or `month-end:<zone>`)")]
    UnknownRule(String),

    #[error("invalid fixed deadline `{value}`: {source}")]
    InvalidFixed {
        value: String,
        source: chrono::ParseError,
    },

    #[error("unknown timezone `{0}`")]
    UnknownZone(String),

    #[error("{date} 23:59:59 does not exist in {zone}")]
    NonexistentLocalTime { date: NaiveDate, zone: Tz },

    #[error("calendar date out of range")]
    DateOutOfRange,
}

/// Absolute instant at which a scoring period ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Deadline(DateTime<Utc>);

impl Deadline {
    pub fn from_epoch_millis(ms: i64) -> Option<Self> {
        DateTime::from_timestamp_millis(ms).map(Self)
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.0
    }

    /// Milliseconds since the Unix epoch, as sent in the `endTime` query parameter
    pub fn epoch_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Milliseconds left until the deadline; zero or negative once it has passed
    pub fn remaining_millis(&self, now: DateTime<Utc>) -> i64 {
        self.epoch_millis() - now.timestamp_millis()
    }
}

impl fmt::Display for Deadline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

/// How a deadline is derived from the calendar
///
/// Rules are written as `fixed:2025-11-30T18:59:59-07:00` or
/// `month-end:America/New_York`.
#[derive(Debug, Clone, PartialEq)]
pub enum DeadlineRule {
    /// A single hardcoded event end, carrying its own UTC offset
    Fixed(DateTime<FixedOffset>),

    /// Last calendar day of the current month at 23:59:59 in a named zone
    MonthEnd(Tz),
}

impl DeadlineRule {
    /// Resolve the rule against the current wall-clock time
    pub fn resolve(&self, now: DateTime<Utc>) -> Result<Deadline, DeadlineError> {
        let deadline = match self {
            DeadlineRule::Fixed(at) => Deadline(at.with_timezone(&Utc)),
            DeadlineRule::MonthEnd(zone) => month_end(*zone, now)?,
        };

        debug!("Resolved {} to {}", self, deadline);
        Ok(deadline)
    }

    /// `deadline` expressed in the rule's own zone or offset
    pub fn local_time(&self, deadline: Deadline) -> DateTime<FixedOffset> {
        match self {
            DeadlineRule::Fixed(at) => deadline.0.with_timezone(at.offset()),
            DeadlineRule::MonthEnd(zone) => deadline.0.with_timezone(zone).fixed_offset(),
        }
    }
}

impl fmt::Display for DeadlineRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeadlineRule::Fixed(at) => write!(f, "fixed:{}", at.to_rfc3339()),
            DeadlineRule::MonthEnd(zone) => write!(f, "month-end:{}", zone.name()),
        }
    }
}

impl FromStr for DeadlineRule {
    type Err = DeadlineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if let Some(value) = s.strip_prefix("fixed:") {
            let at = DateTime::parse_from_rfc3339(value).map_err(|source| {
                DeadlineError::InvalidFixed {
                    value: value.to_string(),
                    source,
                }
            })?;
            return Ok(DeadlineRule::Fixed(at));
        }

        if let Some(name) = s.strip_prefix("month-end:") {
            let zone: Tz = name
                .parse()
                .map_err(|_| DeadlineError::UnknownZone(name.to_string()))?;
            return Ok(DeadlineRule::MonthEnd(zone));
        }

        Err(DeadlineError::UnknownRule(s.to_string()))
    }
}

/// 23:59:59 on the last day of the month that `now` falls in, as observed in `zone`
fn month_end(zone: Tz, now: DateTime<Utc>) -> Result<Deadline, DeadlineError> {
    // The month is read in the target zone, not the host's.
    let today = now.with_timezone(&zone).date_naive();
    let last_day = last_day_of_month(today.year(), today.month())?;

    // Offset is taken at the target date, not today.
    let local = zone.with_ymd_and_hms(
        last_day.year(),
        last_day.month(),
        last_day.day(),
        23,
        59,
        59,
    );

    match local {
        LocalResult::Single(at) => Ok(Deadline(at.with_timezone(&Utc))),
        LocalResult::Ambiguous(earliest, _) => Ok(Deadline(earliest.with_timezone(&Utc))),
        LocalResult::None => Err(DeadlineError::NonexistentLocalTime {
            date: last_day,
            zone,
        }),
    }
}

fn last_day_of_month(year: i32, month: u32) -> Result<NaiveDate, DeadlineError> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .ok_or(DeadlineError::DateOutOfRange)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_fixed_rule_applies_its_offset() {
        let rule: DeadlineRule = "fixed:2025-11-30T18:59:59-07:00".parse().unwrap();
        let deadline = rule.resolve(Utc::now()).unwrap();

        assert_eq!(deadline.instant(), utc("2025-12-01T01:59:59Z"));
    }

    #[test]
    fn test_month_end_standard_time() {
        let rule: DeadlineRule = "month-end:America/New_York".parse().unwrap();
        let deadline = rule.resolve(utc("2025-01-15T12:00:00Z")).unwrap();

        // EST, UTC-5
        assert_eq!(deadline.instant(), utc("2025-02-01T04:59:59Z"));
    }

    #[test]
    fn test_month_end_daylight_time() {
        let rule: DeadlineRule = "month-end:America/New_York".parse().unwrap();
        let deadline = rule.resolve(utc("2025-07-04T12:00:00Z")).unwrap();

        // EDT, UTC-4
        assert_eq!(deadline.instant(), utc("2025-08-01T03:59:59Z"));
    }

    #[test]
    fn test_month_end_uses_offset_at_target_date() {
        // Resolved on March 1st (EST) for March 31st (EDT)
        let rule = DeadlineRule::MonthEnd(chrono_tz::America::New_York);
        let deadline = rule.resolve(utc("2025-03-01T15:00:00Z")).unwrap();
        assert_eq!(deadline.instant(), utc("2025-04-01T03:59:59Z"));

        // November ends in EST even though it starts in EDT
        let deadline = rule.resolve(utc("2025-11-01T15:00:00Z")).unwrap();
        assert_eq!(deadline.instant(), utc("2025-12-01T04:59:59Z"));
    }

    #[test]
    fn test_month_is_read_in_target_zone() {
        // 02:00 UTC on Feb 1st is still January 31st in New York
        let rule = DeadlineRule::MonthEnd(chrono_tz::America::New_York);
        let deadline = rule.resolve(utc("2025-02-01T02:00:00Z")).unwrap();

        assert_eq!(deadline.instant(), utc("2025-02-01T04:59:59Z"));
    }

    #[test]
    fn test_leap_february() {
        let rule = DeadlineRule::MonthEnd(chrono_tz::UTC);
        let deadline = rule.resolve(utc("2024-02-10T00:00:00Z")).unwrap();

        assert_eq!(deadline.instant(), utc("2024-02-29T23:59:59Z"));
    }

    #[test]
    fn test_december_rolls_year() {
        let rule = DeadlineRule::MonthEnd(chrono_tz::Asia::Tokyo);
        let deadline = rule.resolve(utc("2025-12-20T00:00:00Z")).unwrap();

        assert_eq!(deadline.instant(), utc("2025-12-31T14:59:59Z"));
    }

    #[test]
    fn test_local_time_in_rule_zone() {
        let fixed: DeadlineRule = "fixed:2025-11-30T18:59:59-07:00".parse().unwrap();
        let deadline = fixed.resolve(Utc::now()).unwrap();
        assert_eq!(
            fixed.local_time(deadline).to_rfc3339(),
            "2025-11-30T18:59:59-07:00"
        );

        let month_end = DeadlineRule::MonthEnd(chrono_tz::America::New_York);
        let deadline = month_end.resolve(utc("2025-07-04T12:00:00Z")).unwrap();
        assert_eq!(
            month_end.local_time(deadline).to_rfc3339(),
            "2025-07-31T23:59:59-04:00"
        );
    }

    #[test]
    fn test_rule_parse_errors() {
        assert!(matches!(
            "weekly:UTC".parse::<DeadlineRule>(),
            Err(DeadlineError::UnknownRule(_))
        ));
        assert!(matches!(
            "month-end:Mars/Olympus".parse::<DeadlineRule>(),
            Err(DeadlineError::UnknownZone(_))
        ));
        assert!(matches!(
            "fixed:tomorrow".parse::<DeadlineRule>(),
            Err(DeadlineError::InvalidFixed { .. })
        ));
    }

    #[test]
    fn test_rule_display_round_trips() {
        let rule: DeadlineRule = "month-end:Europe/London".parse().unwrap();
        assert_eq!(rule.to_string(), "month-end:Europe/London");
        assert_eq!(rule.to_string().parse::<DeadlineRule>().unwrap(), rule);
    }

    #[test]
    fn test_remaining_millis() {
        let deadline = Deadline::from_epoch_millis(1_000).unwrap();
        let now = DateTime::from_timestamp_millis(400).unwrap();

        assert_eq!(deadline.remaining_millis(now), 600);
        assert_eq!(deadline.epoch_millis(), 1_000);
    }
}
