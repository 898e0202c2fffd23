use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::domain::{EntryMap, Task};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorpusStats {
    pub total_days: usize,
    pub active_days: usize,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub completion_rate: u8,
    pub current_streak: usize,
    pub longest_streak: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RangeStats {
    pub active_days: usize,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub completion_rate: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub progress: u8,
    pub goals: usize,
    pub has_notes: bool,
}

/// Share of completed tasks as a whole percentage, rounded half up.
pub fn progress(tasks: &[Task]) -> u8 {
    let done = tasks.iter().filter(|task| task.completed).count();
    percentage(done, tasks.len())
}

pub fn corpus_stats(entries: &EntryMap, today: NaiveDate) -> CorpusStats {
    let totals = range_stats(entries, NaiveDate::MIN, NaiveDate::MAX);

    let mut running = 0usize;
    let mut longest = 0usize;
    let mut last_active: Option<NaiveDate> = None;
    for (date, _) in entries.iter().filter(|(_, entry)| entry.is_active()) {
        running = match last_active {
            Some(previous) if *date - previous == Duration::days(1) => running + 1,
            _ => 1,
        };
        longest = longest.max(running);
        last_active = Some(*date);
    }

    let current_streak = match last_active {
        Some(last) if last == today || last == today - Duration::days(1) => running,
        _ => 0,
    };

    CorpusStats {
        total_days: entries.len(),
        active_days: totals.active_days,
        total_tasks: totals.total_tasks,
        completed_tasks: totals.completed_tasks,
        completion_rate: totals.completion_rate,
        current_streak,
        longest_streak: longest,
    }
}

/// Task totals over active days in `first..=last`.
pub fn range_stats(entries: &EntryMap, first: NaiveDate, last: NaiveDate) -> RangeStats {
    let mut stats = RangeStats::default();
    if first > last {
        return stats;
    }
    for entry in entries.range(first..=last).map(|(_, entry)| entry) {
        if !entry.is_active() {
            continue;
        }
        stats.active_days += 1;
        stats.total_tasks += entry.tasks.len();
        stats.completed_tasks += entry.completed_tasks();
    }
    stats.completion_rate = percentage(stats.completed_tasks, stats.total_tasks);
    stats
}

pub fn day_summaries(entries: &EntryMap, days: &[NaiveDate]) -> Vec<DaySummary> {
    days.iter()
        .map(|date| match entries.get(date) {
            Some(entry) => DaySummary {
                date: *date,
                total_tasks: entry.tasks.len(),
                completed_tasks: entry.completed_tasks(),
                progress: progress(&entry.tasks),
                goals: entry.goals.len(),
                has_notes: !entry.notes.trim().is_empty(),
            },
            None => DaySummary {
                date: *date,
                total_tasks: 0,
                completed_tasks: 0,
                progress: 0,
                goals: 0,
                has_notes: false,
            },
        })
        .collect()
}

fn percentage(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    ((part * 200 + whole) / (whole * 2)) as u8
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};

    use crate::domain::{DailyEntry, EntryMap, Priority};

    use super::{corpus_stats, day_summaries, progress, range_stats};

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

    fn streak_corpus() -> EntryMap {
        let mut entries = EntryMap::new();
        entries.insert(day(2024, 1, 1), entry(2, 1));
        entries.insert(day(2024, 1, 2), entry(1, 1));
        entries.insert(day(2024, 1, 3), entry(3, 0));
        entries.insert(day(2024, 1, 10), entry(2, 2));
        entries
    }

    #[test]
    fn progress_rounds_the_completed_share() {
        assert_eq!(progress(&[]), 0);
        assert_eq!(progress(&entry(2, 1).tasks), 50);
        assert_eq!(progress(&entry(3, 1).tasks), 33);
        assert_eq!(progress(&entry(3, 2).tasks), 67);
        assert_eq!(progress(&entry(8, 1).tasks), 13);
        assert_eq!(progress(&entry(4, 4).tasks), 100);
    }

    #[test]
    fn progress_matches_the_rounding_formula() {
        for total in 1..=12usize {
            for done in 0..=total {
                let expected = (100.0 * done as f64 / total as f64).round() as u8;
                assert_eq!(progress(&entry(total, done).tasks), expected, "{done}/{total}");
            }
        }
    }

    #[test]
    fn streaks_follow_consecutive_active_days() {
        let entries = streak_corpus();

        let on_last_day = corpus_stats(&entries, day(2024, 1, 10));
        assert_eq!(on_last_day.longest_streak, 3);
        assert_eq!(on_last_day.current_streak, 1);

        let day_after = corpus_stats(&entries, day(2024, 1, 11));
        assert_eq!(day_after.current_streak, 1);

        let later = corpus_stats(&entries, day(2024, 1, 15));
        assert_eq!(later.longest_streak, 3);
        assert_eq!(later.current_streak, 0);
    }

    #[test]
    fn inactive_days_do_not_extend_or_break_counts() {
        let mut entries = streak_corpus();
        entries.insert(day(2024, 1, 4), DailyEntry::default());
        entries.insert(day(2024, 1, 11), entry(1, 0));

        let stats = corpus_stats(&entries, day(2024, 1, 11));
        assert_eq!(stats.total_days, 6);
        assert_eq!(stats.active_days, 5);
        assert_eq!(stats.total_tasks, 9);
        assert_eq!(stats.completed_tasks, 4);
        assert_eq!(stats.completion_rate, 44);
        assert_eq!(stats.longest_streak, 3);
        assert_eq!(stats.current_streak, 2);
    }

    #[test]
    fn degenerate_corpora() {
        let empty = corpus_stats(&EntryMap::new(), day(2024, 1, 1));
        assert_eq!(empty, super::CorpusStats::default());

        let mut single = EntryMap::new();
        single.insert(day(2024, 1, 1), entry(1, 0));
        let stats = corpus_stats(&single, day(2024, 3, 1));
        assert_eq!(stats.longest_streak, 1);
        assert_eq!(stats.current_streak, 0);

        let mut idle = EntryMap::new();
        idle.insert(day(2024, 1, 1), DailyEntry::default());
        let stats = corpus_stats(&idle, day(2024, 1, 1));
        assert_eq!(stats.total_days, 1);
        assert_eq!(stats.active_days, 0);
        assert_eq!(stats.longest_streak, 0);
        assert_eq!(stats.completion_rate, 0);
    }

    #[test]
    fn range_and_day_summaries() {
        let entries = streak_corpus();
        let first_week = range_stats(&entries, day(2024, 1, 1), day(2024, 1, 7));
        assert_eq!(first_week.active_days, 3);
        assert_eq!(first_week.total_tasks, 6);
        assert_eq!(first_week.completion_rate, 33);

        let summaries = day_summaries(&entries, &[day(2024, 1, 2), day(2024, 1, 4)]);
        assert_eq!(summaries[0].progress, 100);
        assert_eq!(summaries[1].total_tasks, 0);
    }
}
