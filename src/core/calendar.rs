use chrono::{Datelike, Days, Months, NaiveDate};
use thiserror::Error;

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("Invalid month: {0}")]
    Month(u8),
    #[error("Invalid day {day} for {month}/{year} (max {max})")]
    Day { year: i32, month: u8, day: u8, max: u8 },
}

/// A calendar day. Months are 1-based; there is no time-of-day component, so
/// equality and ordering are by calendar day only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

/// Day of week, 0 = Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Weekday(pub u8);

impl Weekday {
    pub const SUN: Self = Self(0);
    pub const MON: Self = Self(1);
    pub const TUE: Self = Self(2);
    pub const WED: Self = Self(3);
    pub const THU: Self = Self(4);
    pub const FRI: Self = Self(5);
    pub const SAT: Self = Self(6);

    pub fn short_name(self) -> &'static str {
        WEEKDAY_NAMES[self.0 as usize % 7]
    }

    pub fn is_weekend(self) -> bool {
        self == Self::SAT || self == Self::SUN
    }
}

fn naive(year: i32, month: u8, day: u8) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month.into(), day.into())
}

pub fn is_leap_year(year: i32) -> bool {
    naive(year, 2, 29).is_some()
}

/// Falls back to 30 for a month outside 1..=12.
pub fn days_in_month(year: i32, month: u8) -> u8 {
    naive(year, month, 1)
        .and_then(|first| first.checked_add_months(Months::new(1)))
        .and_then(|next| next.pred_opt())
        .map_or(30, |last| last.day() as u8)
}

/// Dates that do not exist (only reachable through the public fields) count
/// as Sunday, which keeps them unbookable.
pub fn weekday_of(date: Date) -> Weekday {
    naive(date.year, date.month, date.day).map_or(Weekday::SUN, |d| {
        Weekday(d.weekday().num_days_from_sunday() as u8)
    })
}

pub fn first_weekday_of_month(year: i32, month: u8) -> Weekday {
    weekday_of(Date {
        year,
        month,
        day: 1,
    })
}

impl Date {
    pub fn from_parts(year: i32, month: u8, day: u8) -> Result<Self, DateError> {
        if !(1..=12).contains(&month) {
            return Err(DateError::Month(month));
        }
        let max = days_in_month(year, month);
        if day < 1 || day > max {
            return Err(DateError::Day {
                year,
                month,
                day,
                max,
            });
        }
        Ok(Date { year, month, day })
    }

    pub fn weekday(self) -> Weekday {
        weekday_of(self)
    }

    /// Moves by whole days. Stays put if the result leaves chrono's range.
    pub fn add_days(self, delta: i32) -> Self {
        let days = Days::new(u64::from(delta.unsigned_abs()));
        naive(self.year, self.month, self.day)
            .and_then(|d| {
                if delta >= 0 {
                    d.checked_add_days(days)
                } else {
                    d.checked_sub_days(days)
                }
            })
            .map_or(self, Date::from)
    }

    pub fn to_iso(self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }

    /// `"Fri Oct 16 2026"`.
    pub fn to_display_string(self) -> String {
        let month = MONTH_NAMES[(self.month as usize).saturating_sub(1) % 12];
        format!(
            "{} {} {:02} {:04}",
            self.weekday().short_name(),
            &month[..3],
            self.day,
            self.year
        )
    }
}

impl From<chrono::NaiveDate> for Date {
    fn from(value: chrono::NaiveDate) -> Self {
        Date {
            year: value.year(),
            month: value.month() as u8,
            day: value.day() as u8,
        }
    }
}

/// The month currently shown in the grid. `month` is 0-based (0 = January).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarCursor {
    pub year: i32,
    pub month: u8,
}

impl CalendarCursor {
    pub fn new(year: i32, month: u8) -> Self {
        Self {
            year,
            month: month % 12,
        }
    }

    pub fn from_date(date: Date) -> Self {
        Self::new(date.year, date.month.saturating_sub(1))
    }

    pub fn advanced(self, delta: i32) -> Self {
        let total = self.month as i32 + delta;
        Self {
            year: self.year + total.div_euclid(12),
            month: total.rem_euclid(12) as u8,
        }
    }

    pub fn advance(&mut self, delta: i32) {
        *self = self.advanced(delta);
    }

    pub fn days(self) -> u8 {
        days_in_month(self.year, self.month + 1)
    }

    pub fn first_weekday(self) -> Weekday {
        first_weekday_of_month(self.year, self.month + 1)
    }

    pub fn date(self, day: u8) -> Option<Date> {
        Date::from_parts(self.year, self.month + 1, day).ok()
    }

    pub fn first_day(self) -> Date {
        Date {
            year: self.year,
            month: self.month + 1,
            day: 1,
        }
    }

    pub fn last_day(self) -> Date {
        Date {
            year: self.year,
            month: self.month + 1,
            day: self.days(),
        }
    }

    pub fn contains(self, date: Date) -> bool {
        date.year == self.year && date.month == self.month + 1
    }

    pub fn month_name(self) -> &'static str {
        MONTH_NAMES[self.month as usize % 12]
    }

    /// `"October 2026"`.
    pub fn label(self) -> String {
        format!("{} {}", self.month_name(), self.year)
    }
}

/// Past days and weekends cannot be booked.
pub fn is_bookable(date: Date, today: Date) -> bool {
    date >= today && !date.weekday().is_weekend()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub date: Date,
    pub available: bool,
    pub today: bool,
    pub selected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarCell {
    Blank,
    Day(DayCell),
}

impl CalendarCell {
    pub fn day(&self) -> Option<&DayCell> {
        match self {
            CalendarCell::Day(cell) => Some(cell),
            CalendarCell::Blank => None,
        }
    }
}

/// Leading blanks up to the first weekday, then one cell per day of the month.
pub fn month_cells(cursor: CalendarCursor, today: Date, selected: Option<Date>) -> Vec<CalendarCell> {
    let leading = cursor.first_weekday().0 as usize;
    let days = cursor.days();
    let mut cells = Vec::with_capacity(leading + days as usize);
    cells.extend(std::iter::repeat_n(CalendarCell::Blank, leading));
    for day in 1..=days {
        let date = Date {
            year: cursor.year,
            month: cursor.month + 1,
            day,
        };
        cells.push(CalendarCell::Day(DayCell {
            date,
            available: is_bookable(date, today),
            today: date == today,
            selected: selected == Some(date),
        }));
    }
    cells
}

pub trait Clock {
    fn today(&self) -> Date;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> Date {
        chrono::Local::now().date_naive().into()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Date);

impl Clock for FixedClock {
    fn today(&self) -> Date {
        self.0
    }
}
