//! Month grid generation and month navigation.
//!
//! A grid is always six weeks of seven days, starting on Sunday. Cells before
//! the first of the month and after its last day are filled from the adjacent
//! months so every row is complete.

use chrono::{Datelike, NaiveDate};

/// Six rows of seven days.
pub const GRID_CELLS: usize = 42;

pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

const MONTH_NAMES: [&str; 12] = [
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

/// The month currently on screen. `month` is zero-based (0 = January).
///
/// Views are limited to the months `NaiveDate` can represent; construction and
/// navigation stop at the first and last of those months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewMonth {
    year: i32,
    month: u32,
}

impl ViewMonth {
    /// Build a view month, carrying any month overflow into the year.
    pub fn new(year: i32, month: u32) -> Self {
        Self::clamped(i64::from(year) * 12 + i64::from(month))
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month0())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Header text, e.g. "March 2025".
    pub fn title(&self) -> String {
        format!("{} {}", month_name(self.month), self.year)
    }

    pub fn days(&self) -> u32 {
        days_in_month(self.year, self.month)
    }

    fn index(&self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month)
    }

    fn clamped(index: i64) -> Self {
        let first = i64::from(NaiveDate::MIN.year()) * 12;
        let last = i64::from(NaiveDate::MAX.year()) * 12 + 11;
        Self::from_index(index.clamp(first, last))
    }

    /// Caller keeps `index` within one month of the representable range.
    fn from_index(index: i64) -> Self {
        Self {
            year: index.div_euclid(12) as i32,
            month: index.rem_euclid(12) as u32,
        }
    }

    fn offset(self, delta: i64) -> Self {
        Self::clamped(self.index() + delta)
    }

    /// The neighbouring month, even past the navigable range. Grid cells need
    /// it to label the days around the first and last month.
    fn adjacent(self, delta: i64) -> Self {
        Self::from_index(self.index() + delta)
    }
}

pub fn next_month(view: ViewMonth) -> ViewMonth {
    view.offset(1)
}

pub fn prev_month(view: ViewMonth) -> ViewMonth {
    view.offset(-1)
}

/// Proleptic Gregorian leap year rule.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in a zero-based month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 if is_leap_year(year) => 29,
        1 => 28,
        3 | 5 | 8 | 10 => 30,
        _ => 31,
    }
}

/// Weekday of a date, 0 = Sunday. Works for any year, including ones
/// outside the range `NaiveDate` can represent.
pub fn weekday_index(year: i32, month: u32, day: u32) -> u32 {
    const MONTH_OFFSETS: [i64; 12] = [0, 3, 2, 5, 0, 3, 5, 1, 4, 6, 2, 4];

    let y = if month < 2 {
        i64::from(year) - 1
    } else {
        i64::from(year)
    };
    let offset = MONTH_OFFSETS.get(month as usize).copied().unwrap_or(0);
    let leap_days = y.div_euclid(4) - y.div_euclid(100) + y.div_euclid(400);
    let sum = y + leap_days + offset + i64::from(day);
    sum.rem_euclid(7) as u32
}

/// Zero-padded "YYYY-MM-DD" for a zero-based month.
pub fn date_key(year: i32, month: u32, day: u32) -> String {
    format!("{:04}-{:02}-{:02}", year, month + 1, day)
}

/// Inverse of [`date_key`].
pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key.trim(), "%Y-%m-%d").ok()
}

pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES.get(month as usize).copied().unwrap_or("Unknown")
}

/// One position in the month grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell {
    pub day_number: u32,
    pub is_other_month: bool,
    pub is_today: bool,
    pub has_events: bool,
    pub date_key: String,
    /// The month the cell actually belongs to, which differs from the
    /// displayed month for leading and trailing cells.
    pub month: ViewMonth,
}

impl DayCell {
    fn new(month: ViewMonth, day: u32, is_other_month: bool) -> Self {
        Self {
            day_number: day,
            is_other_month,
            is_today: false,
            has_events: false,
            date_key: date_key(month.year(), month.month(), day),
            month,
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.month.year(), self.month.month() + 1, self.day_number)
    }

    fn is_on(&self, date: NaiveDate) -> bool {
        self.month.year() == date.year()
            && self.month.month() == date.month0()
            && self.day_number == date.day()
    }
}

/// Build the 42 cells for `view`.
///
/// `today` marks the current day (only within the displayed month) and
/// `has_events` is asked once per cell that maps onto a representable date.
pub fn generate_grid<F>(view: ViewMonth, today: NaiveDate, has_events: F) -> Vec<DayCell>
where
    F: Fn(NaiveDate) -> bool,
{
    let first_weekday = weekday_index(view.year, view.month, 1);
    let previous = view.adjacent(-1);
    let following = view.adjacent(1);
    let days_in_prev_month = previous.days();

    let mut cells = Vec::with_capacity(GRID_CELLS);

    let leading_start = days_in_prev_month - first_weekday + 1;
    for day in leading_start..=days_in_prev_month {
        cells.push(DayCell::new(previous, day, true));
    }

    for day in 1..=view.days() {
        let mut cell = DayCell::new(view, day, false);
        cell.is_today = cell.is_on(today);
        cells.push(cell);
    }

    let mut day = 1;
    while cells.len() < GRID_CELLS {
        cells.push(DayCell::new(following, day, true));
        day += 1;
    }

    for cell in &mut cells {
        cell.has_events = cell.date().is_some_and(&has_events);
    }

    cells
}
