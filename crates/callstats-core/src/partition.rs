//! Temporal partitioning: window keys per record and the current period per run.
//!
//! Weeks follow ISO-8601 numbering, so the first days of January can belong
//! to the last week of the previous ISO year (and late December to week 1 of
//! the next). Weekly windows therefore compare `(iso_year, week)`, never the
//! calendar year.

use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

/// Calendar keys derived from one timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemporalKeys {
    pub hour: u32,
    pub date: NaiveDate,
    pub iso_week: u32,
    pub iso_year: i32,
    pub month: u32,
    pub year: i32,
}

impl TemporalKeys {
    pub fn from_timestamp(ts: NaiveDateTime) -> Self {
        let date = ts.date();
        let iso = date.iso_week();
        Self {
            hour: ts.hour(),
            date,
            iso_week: iso.week(),
            iso_year: iso.year(),
            month: date.month(),
            year: date.year(),
        }
    }
}

/// The period a run summarises: the day, ISO week and month of its
/// generation instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub generated_at: NaiveDateTime,
    pub keys: TemporalKeys,
}

impl Period {
    pub fn at(generated_at: NaiveDateTime) -> Self {
        Self {
            generated_at,
            keys: TemporalKeys::from_timestamp(generated_at),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.keys.date
    }

    pub fn current_hour(&self) -> u32 {
        self.keys.hour
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Granularity {
    Hourly,
    Daily,
    Weekly,
    Monthly,
}

impl Granularity {
    pub const ALL: [Granularity; 4] = [
        Granularity::Hourly,
        Granularity::Daily,
        Granularity::Weekly,
        Granularity::Monthly,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Granularity::Hourly => "hourly",
            Granularity::Daily => "daily",
            Granularity::Weekly => "weekly",
            Granularity::Monthly => "monthly",
        }
    }

    /// The window a record falls in, if it belongs to the current period.
    ///
    /// Hourly windows only cover today.
    pub fn window_of(self, keys: &TemporalKeys, period: &Period) -> Option<WindowKey> {
        let now = &period.keys;
        match self {
            Granularity::Hourly => (keys.date == now.date).then_some(WindowKey::Hour(keys.hour)),
            Granularity::Daily => (keys.date == now.date).then_some(WindowKey::Day(keys.date)),
            Granularity::Weekly => (keys.iso_year == now.iso_year && keys.iso_week == now.iso_week)
                .then_some(WindowKey::Week {
                    iso_year: keys.iso_year,
                    week: keys.iso_week,
                }),
            Granularity::Monthly => (keys.year == now.year && keys.month == now.month)
                .then_some(WindowKey::Month {
                    year: keys.year,
                    month: keys.month,
                }),
        }
    }

    /// Every window key of the current period, in ascending order.
    pub fn domain(self, period: &Period) -> Vec<WindowKey> {
        let now = &period.keys;
        match self {
            Granularity::Hourly => (0..24).map(WindowKey::Hour).collect(),
            Granularity::Daily => vec![WindowKey::Day(now.date)],
            Granularity::Weekly => vec![WindowKey::Week {
                iso_year: now.iso_year,
                week: now.iso_week,
            }],
            Granularity::Monthly => vec![WindowKey::Month {
                year: now.year,
                month: now.month,
            }],
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A time bucket. Ordering is chronological within one variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WindowKey {
    Hour(u32),
    Day(NaiveDate),
    Week { iso_year: i32, week: u32 },
    Month { year: i32, month: u32 },
}

impl WindowKey {
    pub fn hour(&self) -> Option<u32> {
        match self {
            WindowKey::Hour(h) => Some(*h),
            _ => None,
        }
    }
}

impl fmt::Display for WindowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowKey::Hour(h) => write!(f, "{h:02}:00"),
            WindowKey::Day(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            WindowKey::Week { iso_year, week } => write!(f, "{iso_year}-W{week:02}"),
            WindowKey::Month { year, month } => write!(f, "{year}-{month:02}"),
        }
    }
}
