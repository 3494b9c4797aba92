use crate::models::{ActivityLog, Combination, TagSet};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

pub const DAYS_PER_WEEK: usize = 7;

pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

const MONTH_INITIALS: [&str; 12] = ["J", "F", "M", "A", "M", "J", "J", "A", "S", "O", "N", "D"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DaySlot {
    /// Padding before Jan 1 or after Dec 31.
    Empty,
    Day {
        date: NaiveDate,
        tags: TagSet,
        combination: Option<Combination>,
    },
}

impl DaySlot {
    fn day(date: NaiveDate, log: &ActivityLog) -> Self {
        let tags = log.get(&date_key(date)).cloned().unwrap_or_default();
        let combination = Combination::classify(&tags);
        DaySlot::Day {
            date,
            tags,
            combination,
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            DaySlot::Empty => None,
            DaySlot::Day { date, .. } => Some(*date),
        }
    }

    pub fn tags(&self) -> Option<&TagSet> {
        match self {
            DaySlot::Empty => None,
            DaySlot::Day { tags, .. } => Some(tags),
        }
    }
}

/// One vertical column of the grid, Monday at index 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekColumn {
    pub days: Vec<DaySlot>,
    /// Month (1-12) of the first non-empty slot.
    pub month: Option<u32>,
    pub month_label: Option<&'static str>,
    pub spacer_before: bool,
}

impl WeekColumn {
    fn seal(mut days: Vec<DaySlot>) -> Self {
        days.resize(DAYS_PER_WEEK, DaySlot::Empty);
        let month = days.iter().find_map(DaySlot::date).map(|date| date.month());
        Self {
            days,
            month,
            month_label: None,
            spacer_before: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthBoundary {
    pub week_index: usize,
    pub month: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearGrid {
    pub year: i32,
    pub first_day_offset: u32,
    pub weeks: Vec<WeekColumn>,
    pub boundaries: Vec<MonthBoundary>,
}

impl YearGrid {
    pub fn day_count(&self) -> usize {
        self.weeks
            .iter()
            .flat_map(|week| week.days.iter())
            .filter(|slot| slot.date().is_some())
            .count()
    }
}

/// Weekday of Jan 1 as Monday=0 .. Sunday=6.
pub fn first_day_offset(year: i32) -> u32 {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .map(|date| date.weekday().num_days_from_monday())
        .unwrap_or(0)
}

pub fn days_in_year(year: i32) -> u32 {
    match NaiveDate::from_ymd_opt(year, 12, 31) {
        Some(last) => last.ordinal(),
        None => 0,
    }
}

pub fn build_year(year: i32, log: &ActivityLog) -> YearGrid {
    let offset = first_day_offset(year);
    let mut weeks = Vec::new();
    let mut buffer = vec![DaySlot::Empty; offset as usize];

    if let Some(start) = NaiveDate::from_ymd_opt(year, 1, 1) {
        for date in start.iter_days().take_while(|date| date.year() == year) {
            buffer.push(DaySlot::day(date, log));
            if buffer.len() == DAYS_PER_WEEK {
                weeks.push(WeekColumn::seal(std::mem::take(&mut buffer)));
            }
        }
    }

    if buffer.iter().any(|slot| slot.date().is_some()) {
        weeks.push(WeekColumn::seal(buffer));
    }

    let boundaries = annotate_months(&mut weeks);

    YearGrid {
        year,
        first_day_offset: offset,
        weeks,
        boundaries,
    }
}

// A column straddling two months belongs to the month of its first day.
fn annotate_months(weeks: &mut [WeekColumn]) -> Vec<MonthBoundary> {
    let mut boundaries = Vec::new();
    let mut previous: Option<u32> = None;

    for (week_index, week) in weeks.iter_mut().enumerate() {
        let Some(month) = week.month else {
            continue;
        };
        if previous != Some(month) {
            week.month_label = Some(MONTH_INITIALS[(month - 1) as usize]);
            week.spacer_before = previous.is_some();
            boundaries.push(MonthBoundary { week_index, month });
        }
        previous = Some(month);
    }

    boundaries
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
