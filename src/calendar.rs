use chrono::{Datelike, Duration, NaiveDate};

use crate::domain::{DailyEntry, EntryMap, WeekStart};
use crate::stats::progress;

pub const MONTH_GRID_CELLS: usize = 42;
pub const MAX_ACTIVITY_LEVEL: u8 = 3;

const SUNDAY_FIRST_LABELS: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];
const MONDAY_FIRST_LABELS: [&str; 7] = ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDay {
    pub date: NaiveDate,
    pub in_current_month: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthCell {
    pub date: NaiveDate,
    pub in_current_month: bool,
    pub level: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthDescriptor {
    pub name: String,
    /// Zero-based, January is 0.
    pub index: u32,
    pub first: NaiveDate,
}

/// The seven days holding `reference`, beginning on the closest
/// `week_start` day at or before it.
pub fn week_dates(reference: NaiveDate, week_start: WeekStart) -> [NaiveDate; 7] {
    let offset = match week_start {
        WeekStart::Monday => reference.weekday().num_days_from_monday(),
        WeekStart::Sunday => reference.weekday().num_days_from_sunday(),
    };
    let start = reference - Duration::days(i64::from(offset));
    std::array::from_fn(|index| start + Duration::days(index as i64))
}

/// Sunday-first 6x7 block for `month` (1-12), padded with neighbouring
/// months' days. `None` for an invalid month or out-of-range year.
pub fn month_grid(year: i32, month: u32) -> Option<Vec<GridDay>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let lead = first.weekday().num_days_from_sunday();
    let start = first - Duration::days(i64::from(lead));

    let cells = (0..MONTH_GRID_CELLS)
        .map(|index| {
            let date = start + Duration::days(index as i64);
            GridDay {
                date,
                in_current_month: date.year() == year && date.month() == month,
            }
        })
        .collect();
    Some(cells)
}

pub fn annotated_month(year: i32, month: u32, entries: &EntryMap) -> Option<Vec<MonthCell>> {
    let cells = month_grid(year, month)?
        .into_iter()
        .map(|cell| MonthCell {
            date: cell.date,
            in_current_month: cell.in_current_month,
            level: activity_level(entries.get(&cell.date)),
        })
        .collect();
    Some(cells)
}

pub fn year_months(year: i32) -> Vec<MonthDescriptor> {
    (1..=12)
        .filter_map(|month| NaiveDate::from_ymd_opt(year, month, 1))
        .map(|first| MonthDescriptor {
            name: first.format("%B").to_string(),
            index: first.month0(),
            first,
        })
        .collect()
}

/// 0 no tasks, 1 under half done, 2 at least half, 3 everything done.
pub fn activity_level(entry: Option<&DailyEntry>) -> u8 {
    let Some(entry) = entry.filter(|entry| entry.is_active()) else {
        return 0;
    };

    match progress(&entry.tasks) {
        100 => MAX_ACTIVITY_LEVEL,
        50..=99 => 2,
        _ => 1,
    }
}

pub fn weekday_labels(week_start: WeekStart) -> [&'static str; 7] {
    match week_start {
        WeekStart::Sunday => SUNDAY_FIRST_LABELS,
        WeekStart::Monday => MONDAY_FIRST_LABELS,
    }
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if NaiveDate::from_ymd_opt(year, 2, 29).is_some() => 29,
        2 => 28,
        _ => 0,
    }
}

pub fn first_day_of_month(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}

/// Moves by whole months, clamping the day to the target month's length.
pub fn shift_month(day: NaiveDate, delta: i32) -> NaiveDate {
    let months = day.year() * 12 + day.month0() as i32 + delta;
    let year = months.div_euclid(12);
    let month = months.rem_euclid(12) as u32 + 1;
    let target_day = day.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, target_day).unwrap_or(day)
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, NaiveDate, TimeZone, Utc, Weekday};

    use crate::domain::{DailyEntry, EntryMap, Priority, WeekStart};

    use super::{
        MONTH_GRID_CELLS, activity_level, annotated_month, days_in_month, month_grid, shift_month,
        week_dates, year_months,
    };

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn entry(total: usize, done: usize) -> DailyEntry {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let mut entry = DailyEntry::default();
        for index in 0..total {
            let id = entry
                .add_task(&format!("task {index}"), Priority::Medium, now)
                .expect("task should be created");
            if index < done {
                entry.toggle_task(&id).expect("toggle");
            }
        }
        entry
    }

    #[test]
    fn monday_weeks_start_on_the_previous_monday() {
        for offset in 0..14 {
            let reference = day(2024, 2, 20) + chrono::Duration::days(offset);
            let week = week_dates(reference, WeekStart::Monday);
            assert_eq!(week[0].weekday(), Weekday::Mon);
            assert_eq!(week[6].weekday(), Weekday::Sun);
            assert!(week[0] <= reference && reference <= week[6]);
            assert_eq!(week[6] - week[0], chrono::Duration::days(6));
        }
    }

    #[test]
    fn sunday_weeks_anchor_on_sunday() {
        let sunday = day(2024, 1, 7);
        assert_eq!(week_dates(sunday, WeekStart::Sunday)[0], sunday);
        assert_eq!(week_dates(sunday, WeekStart::Monday)[0], day(2024, 1, 1));

        let week = week_dates(day(2024, 1, 10), WeekStart::Sunday);
        assert_eq!(week[0], sunday);
        assert_eq!(week[6], day(2024, 1, 13));
    }

    #[test]
    fn month_grids_always_have_42_sunday_aligned_cells() {
        for year in [2023, 2024, 2026] {
            for month in 1..=12 {
                let grid = month_grid(year, month).expect("valid month");
                assert_eq!(grid.len(), MONTH_GRID_CELLS);
                assert_eq!(grid[0].date.weekday(), Weekday::Sun);

                let current = grid
                    .iter()
                    .filter(|cell| cell.in_current_month)
                    .map(|cell| cell.date.day())
                    .collect::<Vec<_>>();
                let expected = (1..=days_in_month(year, month)).collect::<Vec<_>>();
                assert_eq!(current, expected, "{year}-{month}");
            }
        }
    }

    #[test]
    fn month_grid_pads_from_neighbouring_months() {
        // February 2015 starts on a Sunday and spans exactly four weeks.
        let grid = month_grid(2015, 2).expect("valid month");
        assert_eq!(grid[0].date, day(2015, 2, 1));
        assert_eq!(grid[28].date, day(2015, 3, 1));
        assert!(!grid[41].in_current_month);

        let grid = month_grid(2024, 3).expect("valid month");
        assert_eq!(grid[0].date, day(2024, 2, 25));
        assert!(!grid[0].in_current_month);
        assert!(month_grid(2024, 13).is_none());
    }

    #[test]
    fn year_months_lists_twelve_panels() {
        let months = year_months(2024);
        assert_eq!(months.len(), 12);
        assert_eq!(months[0].name, "January");
        assert_eq!(months[11].index, 11);
        assert_eq!(months[1].first, day(2024, 2, 1));
    }

    #[test]
    fn activity_levels_band_progress() {
        assert_eq!(activity_level(None), 0);
        assert_eq!(activity_level(Some(&DailyEntry::default())), 0);
        assert_eq!(activity_level(Some(&entry(4, 0))), 1);
        assert_eq!(activity_level(Some(&entry(4, 2))), 2);
        assert_eq!(activity_level(Some(&entry(3, 3))), 3);

        let mut entries = EntryMap::new();
        entries.insert(day(2024, 1, 8), entry(3, 3));
        let cells = annotated_month(2024, 1, &entries).expect("valid month");
        let marked = cells.iter().find(|cell| cell.date == day(2024, 1, 8)).expect("cell");
        assert_eq!(marked.level, 3);
    }

    #[test]
    fn shift_month_clamps_and_wraps() {
        assert_eq!(shift_month(day(2024, 1, 31), 1), day(2024, 2, 29));
        assert_eq!(shift_month(day(2024, 1, 15), -1), day(2023, 12, 15));
        assert_eq!(shift_month(day(2023, 11, 30), 14), day(2025, 1, 30));
    }
}
