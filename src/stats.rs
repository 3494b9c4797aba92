use crate::models::{
    ActivityLog, Balance, CoOccurrence, Combination, CombinationPoint, MonthlySeries,
    ShareBreakdown, StatsResponse, Tag,
};
use chrono::{Datelike, NaiveDate};

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub fn build_stats(log: &ActivityLog) -> StatsResponse {
    let buckets = co_occurrence(log);
    let combinations = Combination::CHART_ORDER
        .iter()
        .map(|kind| CombinationPoint {
            kind: *kind,
            label: kind.label(),
            days: buckets.get(*kind),
        })
        .collect();

    StatsResponse {
        monthly: monthly_counts(log),
        share: share(log),
        balance: balance(log),
        combinations,
    }
}

/// Days per month carrying each tag. Keys that are not ISO dates are skipped.
pub fn monthly_counts(log: &ActivityLog) -> MonthlySeries {
    let mut series = MonthlySeries {
        labels: MONTH_LABELS,
        sport: [0; 12],
        work: [0; 12],
        goals: [0; 12],
    };

    for (key, tags) in log {
        let Ok(date) = NaiveDate::parse_from_str(key, "%Y-%m-%d") else {
            continue;
        };
        let month = date.month0() as usize;
        for tag in tags.iter() {
            let bucket = match tag {
                Tag::Sport => &mut series.sport,
                Tag::Work => &mut series.work,
                Tag::Goals => &mut series.goals,
            };
            bucket[month] = bucket[month].saturating_add(1);
        }
    }

    series
}

pub fn share(log: &ActivityLog) -> ShareBreakdown {
    let sport = tag_total(log, Tag::Sport);
    let work = tag_total(log, Tag::Work);
    let total = sport + work;

    ShareBreakdown {
        sport,
        work,
        sport_percent: percent_of(sport, total),
        work_percent: percent_of(work, total),
    }
}

/// Each tag as a percentage of the most frequent one.
pub fn balance(log: &ActivityLog) -> Balance {
    let sport = tag_total(log, Tag::Sport);
    let work = tag_total(log, Tag::Work);
    let goals = tag_total(log, Tag::Goals);
    let max = sport.max(work).max(goals).max(1);

    let scale = |count: u64| (count as f64 / max as f64 * 100.0).round() as u32;

    Balance {
        sport: scale(sport),
        work: scale(work),
        goals: scale(goals),
    }
}

pub fn co_occurrence(log: &ActivityLog) -> CoOccurrence {
    let mut buckets = CoOccurrence::default();

    for tags in log.values() {
        let Some(kind) = Combination::classify(tags) else {
            continue;
        };
        let bucket = match kind {
            Combination::AllThree => &mut buckets.all_three,
            Combination::SportWork => &mut buckets.sport_work,
            Combination::SportGoals => &mut buckets.sport_goals,
            Combination::WorkGoals => &mut buckets.work_goals,
            Combination::SportOnly => &mut buckets.sport_only,
            Combination::WorkOnly => &mut buckets.work_only,
            Combination::GoalsOnly => &mut buckets.goals_only,
        };
        *bucket += 1;
    }

    buckets
}

fn tag_total(log: &ActivityLog, tag: Tag) -> u64 {
    log.values().filter(|tags| tags.contains(tag)).count() as u64
}

fn percent_of(value: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (value as f64 / total as f64 * 1000.0).round() / 10.0
}
