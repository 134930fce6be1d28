//! Calendar-day range selection for order search and promotions.
//!
//! [`DateRange`] is the value; [`DateRangePicker`] is the interactive state
//! behind it (visible month, hover preview, open/closed).

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, Weekday};
use vetrina_core::types::local_time;

use crate::error::RangeError;

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

// =============================================================================
// DateRange
// =============================================================================

/// An inclusive range of calendar days. Either end may be unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    #[must_use]
    pub const fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Both ends are set.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// Whether `day` lies inside the range, ends included. Needs both ends.
    #[must_use]
    pub fn contains(&self, day: NaiveDate) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start <= day && day <= end,
            _ => false,
        }
    }

    /// Human label: `"Select period"`, `"From dd/mm/yyyy …"` or
    /// `"From dd/mm/yyyy to dd/mm/yyyy"`.
    #[must_use]
    pub fn label(&self) -> String {
        match (self.start, self.end) {
            (Some(start), Some(end)) => {
                format!("From {} to {}", format_day(start), format_day(end))
            }
            (Some(start), None) => format!("From {} …", format_day(start)),
            (None, Some(end)) => format!("To {}", format_day(end)),
            (None, None) => "Select period".to_string(),
        }
    }

    /// Timestamps covering the range: the first day at `00:00` and the last
    /// at `23:59`. A lone start or a lone end covers that single day.
    ///
    /// Returns `Ok(None)` for an empty range.
    ///
    /// # Errors
    ///
    /// Returns `RangeError::EndBeforeStart` when the end precedes the start.
    pub fn bounds(&self) -> Result<Option<(NaiveDateTime, NaiveDateTime)>, RangeError> {
        let (first, last) = match (self.start, self.end) {
            (None, None) => return Ok(None),
            (Some(start), Some(end)) if end < start => return Err(RangeError::EndBeforeStart),
            (Some(start), Some(end)) => (start, end),
            (Some(day), None) | (None, Some(day)) => (day, day),
        };
        Ok(Some((
            local_time::start_of_day(first),
            local_time::end_of_day(last),
        )))
    }
}

/// `dd/mm/yyyy`.
#[must_use]
pub fn format_day(day: NaiveDate) -> String {
    day.format("%d/%m/%Y").to_string()
}

// =============================================================================
// Month grid
// =============================================================================

/// One cell of a month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDay {
    pub date: NaiveDate,
    /// False for the padding days taken from the adjacent months.
    pub in_month: bool,
}

/// Weeks (Monday first) covering the month that contains `month`, padded
/// with days of the previous and next months to whole weeks.
#[must_use]
pub fn month_grid(month: NaiveDate) -> Vec<[GridDay; 7]> {
    let first = first_of_month(month);
    let offset = i64::from(first.weekday().num_days_from_monday());
    let mut cursor = first - Duration::days(offset);

    let mut weeks = Vec::with_capacity(6);
    loop {
        let week: [GridDay; 7] = std::array::from_fn(|i| {
            let date = cursor + Duration::days(i64::try_from(i).unwrap_or_default());
            GridDay {
                date,
                in_month: date.month() == first.month() && date.year() == first.year(),
            }
        });
        weeks.push(week);
        cursor += Duration::days(7);

        let past_month = cursor.month() != first.month() || cursor.year() != first.year();
        if past_month && cursor > first {
            break;
        }
    }
    weeks
}

fn first_of_month(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}

// =============================================================================
// DateRangePicker
// =============================================================================

/// Interactive two-click range selection.
///
/// The first click sets the start. A second click on or after the start
/// sets the end and closes the picker; a click before the start moves the
/// start instead. Clicking again once the range is complete starts over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRangePicker {
    range: DateRange,
    hover: Option<NaiveDate>,
    view: NaiveDate,
    open: bool,
}

impl DateRangePicker {
    /// A closed picker showing the month of `range.start`, or of `today`.
    #[must_use]
    pub fn new(range: DateRange, today: NaiveDate) -> Self {
        Self {
            range,
            hover: None,
            view: first_of_month(range.start.unwrap_or(today)),
            open: false,
        }
    }

    #[must_use]
    pub const fn range(&self) -> DateRange {
        self.range
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// First day of the visible month.
    #[must_use]
    pub const fn view(&self) -> NaiveDate {
        self.view
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.hover = None;
    }

    /// Replace the range, e.g. when a quick period clears it.
    pub fn set_range(&mut self, range: DateRange) {
        self.range = range;
        self.hover = None;
    }

    pub fn clear(&mut self) {
        self.set_range(DateRange::default());
    }

    pub fn click(&mut self, day: NaiveDate) {
        match (self.range.start, self.range.end) {
            (None, _) | (Some(_), Some(_)) => {
                self.range = DateRange::new(Some(day), None);
                self.hover = None;
            }
            (Some(start), None) if day < start => {
                self.range.start = Some(day);
                self.hover = None;
            }
            (Some(_), None) => {
                self.range.end = Some(day);
                self.close();
            }
        }
    }

    /// Track the day under the pointer; `None` when it leaves the grid.
    pub fn hover(&mut self, day: Option<NaiveDate>) {
        self.hover = day;
    }

    /// End shown while choosing: the hovered day, if the start is set, the
    /// end is not, and the hovered day is not before the start.
    #[must_use]
    pub fn preview_end(&self) -> Option<NaiveDate> {
        match (self.range.start, self.range.end, self.hover) {
            (Some(start), None, Some(hover)) if hover >= start => Some(hover),
            _ => None,
        }
    }

    /// Whether `day` should be drawn as part of the (possibly previewed)
    /// range.
    #[must_use]
    pub fn is_highlighted(&self, day: NaiveDate) -> bool {
        let end = self.range.end.or_else(|| self.preview_end());
        match (self.range.start, end) {
            (Some(start), Some(end)) => start <= day && day <= end,
            (Some(start), None) => day == start,
            _ => false,
        }
    }

    pub fn prev_month(&mut self) {
        self.view = self
            .view
            .checked_sub_months(Months::new(1))
            .unwrap_or(self.view);
    }

    pub fn next_month(&mut self) {
        self.view = self
            .view
            .checked_add_months(Months::new(1))
            .unwrap_or(self.view);
    }

    /// `"March 2025"`.
    #[must_use]
    pub fn month_label(&self) -> String {
        let name = MONTH_NAMES
            .get(self.view.month0() as usize)
            .copied()
            .unwrap_or_default();
        format!("{name} {}", self.view.year())
    }

    /// Grid of the visible month.
    #[must_use]
    pub fn grid(&self) -> Vec<[GridDay; 7]> {
        month_grid(self.view)
    }

    /// Column headers matching [`month_grid`].
    #[must_use]
    pub const fn weekdays() -> [Weekday; 7] {
        [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_click_sequence() {
        let mut picker = DateRangePicker::new(DateRange::default(), day(2025, 3, 14));
        picker.open();

        picker.click(day(2025, 3, 10));
        assert_eq!(picker.range(), DateRange::new(Some(day(2025, 3, 10)), None));
        assert!(picker.is_open());

        // Before the start: moves the start.
        picker.click(day(2025, 3, 5));
        assert_eq!(picker.range().start, Some(day(2025, 3, 5)));
        assert!(picker.range().end.is_none());

        picker.click(day(2025, 3, 12));
        assert_eq!(
            picker.range(),
            DateRange::new(Some(day(2025, 3, 5)), Some(day(2025, 3, 12)))
        );
        assert!(!picker.is_open());

        // Complete range: next click starts over.
        picker.open();
        picker.click(day(2025, 3, 20));
        assert_eq!(picker.range(), DateRange::new(Some(day(2025, 3, 20)), None));
    }

    #[test]
    fn test_same_day_range() {
        let mut picker = DateRangePicker::new(DateRange::default(), day(2025, 3, 14));
        picker.click(day(2025, 3, 14));
        picker.click(day(2025, 3, 14));
        assert!(picker.range().is_complete());
        assert!(picker.range().contains(day(2025, 3, 14)));
    }

    #[test]
    fn test_hover_preview() {
        let mut picker = DateRangePicker::new(DateRange::default(), day(2025, 3, 14));
        picker.click(day(2025, 3, 10));

        picker.hover(Some(day(2025, 3, 8)));
        assert_eq!(picker.preview_end(), None);
        assert!(!picker.is_highlighted(day(2025, 3, 9)));

        picker.hover(Some(day(2025, 3, 13)));
        assert_eq!(picker.preview_end(), Some(day(2025, 3, 13)));
        assert!(picker.is_highlighted(day(2025, 3, 10)));
        assert!(picker.is_highlighted(day(2025, 3, 13)));
        assert!(!picker.is_highlighted(day(2025, 3, 14)));
    }

    #[test]
    fn test_click_drops_stale_hover() {
        let mut picker = DateRangePicker::new(DateRange::default(), day(2025, 3, 14));
        picker.open();
        picker.click(day(2025, 3, 10));
        picker.hover(Some(day(2025, 3, 12)));
        assert_eq!(picker.preview_end(), Some(day(2025, 3, 12)));

        // Moving the start back does not keep previewing the old hover.
        picker.click(day(2025, 3, 5));
        assert_eq!(picker.preview_end(), None);
        assert!(!picker.is_highlighted(day(2025, 3, 12)));
        assert!(picker.is_highlighted(day(2025, 3, 5)));

        // Same after starting over from a complete range.
        picker.click(day(2025, 3, 6));
        picker.open();
        picker.hover(Some(day(2025, 3, 25)));
        picker.click(day(2025, 3, 20));
        assert_eq!(picker.range(), DateRange::new(Some(day(2025, 3, 20)), None));
        assert_eq!(picker.preview_end(), None);
        assert!(!picker.is_highlighted(day(2025, 3, 25)));
    }

    #[test]
    fn test_labels() {
        assert_eq!(DateRange::default().label(), "Select period");
        assert_eq!(
            DateRange::new(Some(day(2025, 3, 5)), None).label(),
            "From 05/03/2025 …"
        );
        assert_eq!(
            DateRange::new(Some(day(2025, 3, 5)), Some(day(2025, 4, 1))).label(),
            "From 05/03/2025 to 01/04/2025"
        );
    }

    #[test]
    fn test_bounds() {
        let single = DateRange::new(Some(day(2025, 3, 5)), None).bounds().unwrap();
        let (from, to) = single.unwrap();
        assert_eq!(local_time::format(&from), "2025-03-05T00:00");
        assert_eq!(local_time::format(&to), "2025-03-05T23:59");

        let end_only = DateRange::new(None, Some(day(2025, 3, 7))).bounds().unwrap();
        assert_eq!(local_time::format(&end_only.unwrap().0), "2025-03-07T00:00");

        assert_eq!(DateRange::default().bounds().unwrap(), None);
        assert_eq!(
            DateRange::new(Some(day(2025, 3, 7)), Some(day(2025, 3, 5))).bounds(),
            Err(RangeError::EndBeforeStart)
        );
    }

    #[test]
    fn test_month_grid_starts_on_monday() {
        // March 2025 starts on a Saturday and ends on a Monday.
        let weeks = month_grid(day(2025, 3, 14));
        assert_eq!(weeks.len(), 6);
        assert_eq!(weeks[0][0].date, day(2025, 2, 24));
        assert!(!weeks[0][0].in_month);
        assert_eq!(weeks[0][5].date, day(2025, 3, 1));
        assert!(weeks[0][5].in_month);
        assert_eq!(weeks[5][0].date, day(2025, 3, 31));
        assert_eq!(weeks[5][6].date, day(2025, 4, 6));
    }

    #[test]
    fn test_month_grid_exact_weeks() {
        // February 2021 spans exactly four Monday-first weeks.
        let weeks = month_grid(day(2021, 2, 1));
        assert_eq!(weeks.len(), 4);
        assert!(weeks.iter().flatten().all(|cell| cell.in_month));
    }

    #[test]
    fn test_month_navigation() {
        let mut picker = DateRangePicker::new(DateRange::default(), day(2025, 1, 20));
        assert_eq!(picker.month_label(), "January 2025");
        picker.prev_month();
        assert_eq!(picker.month_label(), "December 2024");
        picker.next_month();
        picker.next_month();
        assert_eq!(picker.view(), day(2025, 2, 1));
    }
}
