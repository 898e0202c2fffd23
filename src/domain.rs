use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use clap::ValueEnum;
use rand::{Rng, distributions::Alphanumeric, thread_rng};
use serde::{Deserialize, Serialize};

const ID_SUFFIX_LEN: usize = 9;

/// The journal: one entry per calendar day, always iterated in date order.
pub type EntryMap = BTreeMap<NaiveDate, DailyEntry>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn label(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Priority::High => Priority::Medium,
            Priority::Medium => Priority::Low,
            Priority::Low => Priority::High,
        }
    }

    fn rank(self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyEntry {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub notes: String,
}

impl DailyEntry {
    pub fn is_active(&self) -> bool {
        !self.tasks.is_empty()
    }

    pub fn completed_tasks(&self) -> usize {
        self.tasks.iter().filter(|task| task.completed).count()
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn goal(&self, id: &str) -> Option<&Goal> {
        self.goals.iter().find(|goal| goal.id == id)
    }

    pub fn add_task(&mut self, title: &str, priority: Priority, now: DateTime<Utc>) -> Result<String, String> {
        let title = required_title(title, "task title")?;
        let id = self.unused_id();
        self.tasks.push(Task {
            id: id.clone(),
            title,
            completed: false,
            priority,
            created_at: now,
        });
        Ok(id)
    }

    pub fn toggle_task(&mut self, id: &str) -> Result<bool, String> {
        let task = self.task_mut(id)?;
        task.completed = !task.completed;
        Ok(task.completed)
    }

    pub fn set_task_priority(&mut self, id: &str, priority: Priority) -> Result<(), String> {
        self.task_mut(id)?.priority = priority;
        Ok(())
    }

    pub fn rename_task(&mut self, id: &str, title: &str) -> Result<(), String> {
        let title = required_title(title, "task title")?;
        self.task_mut(id)?.title = title;
        Ok(())
    }

    pub fn remove_task(&mut self, id: &str) -> Result<Task, String> {
        let index = self
            .tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or_else(|| format!("task not found: {id}"))?;
        Ok(self.tasks.remove(index))
    }

    /// Drag-reorder: takes the task at `from` out and reinserts it at `to`.
    pub fn move_task(&mut self, from: usize, to: usize) -> Result<(), String> {
        let len = self.tasks.len();
        if from >= len || to >= len {
            return Err(format!("task position out of range: {from} -> {to} (have {len})"));
        }

        let task = self.tasks.remove(from);
        self.tasks.insert(to, task);
        Ok(())
    }

    pub fn add_goal(&mut self, title: &str, now: DateTime<Utc>) -> Result<String, String> {
        let title = required_title(title, "goal title")?;
        let id = self.unused_id();
        self.goals.push(Goal {
            id: id.clone(),
            title,
            completed: false,
            created_at: now,
        });
        Ok(id)
    }

    pub fn toggle_goal(&mut self, id: &str) -> Result<bool, String> {
        let goal = self
            .goals
            .iter_mut()
            .find(|goal| goal.id == id)
            .ok_or_else(|| format!("goal not found: {id}"))?;
        goal.completed = !goal.completed;
        Ok(goal.completed)
    }

    pub fn remove_goal(&mut self, id: &str) -> Result<Goal, String> {
        let index = self
            .goals
            .iter()
            .position(|goal| goal.id == id)
            .ok_or_else(|| format!("goal not found: {id}"))?;
        Ok(self.goals.remove(index))
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    fn task_mut(&mut self, id: &str) -> Result<&mut Task, String> {
        self.tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| format!("task not found: {id}"))
    }

    fn unused_id(&self) -> String {
        loop {
            let id = generate_id();
            if self.task(&id).is_none() && self.goal(&id).is_none() {
                return id;
            }
        }
    }
}

/// Presentation order for a day: open tasks first, then by priority.
/// The stored order is left untouched.
pub fn display_order(tasks: &[Task]) -> Vec<&Task> {
    let mut ordered = tasks.iter().collect::<Vec<_>>();
    ordered.sort_by_key(|task| (task.completed, task.priority.rank()));
    ordered
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    pub fn next(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::System,
            Theme::System => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    Sunday,
    #[default]
    Monday,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum TimeFormat {
    #[default]
    #[serde(rename = "12h")]
    #[value(name = "12h")]
    TwelveHour,
    #[serde(rename = "24h")]
    #[value(name = "24h")]
    TwentyFourHour,
}

impl TimeFormat {
    pub fn clock_pattern(self) -> &'static str {
        match self {
            TimeFormat::TwelveHour => "%I:%M %p",
            TimeFormat::TwentyFourHour => "%H:%M",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub theme: Theme,
    pub week_start_day: WeekStart,
    pub time_format: TimeFormat,
    pub notifications: bool,
    pub auto_backup: bool,
    pub font_size: FontSize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::System,
            week_start_day: WeekStart::Monday,
            time_format: TimeFormat::TwelveHour,
            notifications: true,
            auto_backup: true,
            font_size: FontSize::Medium,
        }
    }
}

/// Ids look like `1704067200000-k3j9x0a1b`: creation millis plus a random
/// suffix, so a deleted id is never handed out again.
pub fn generate_id() -> String {
    let suffix: String = thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ID_SUFFIX_LEN)
        .map(|byte| char::from(byte).to_ascii_lowercase())
        .collect();
    format!("{}-{suffix}", Utc::now().timestamp_millis())
}

pub fn parse_day(input: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|err| format!("invalid date '{input}', expected YYYY-MM-DD: {err}"))
}

fn required_title(input: &str, field_name: &str) -> Result<String, String> {
    let value = input.trim();
    if value.is_empty() {
        Err(format!("{field_name} is required"))
    } else {
        Ok(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{DailyEntry, Priority, Settings, TimeFormat, WeekStart, display_order, generate_id};

    fn now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn add_task_rejects_blank_titles_and_trims() {
        let mut entry = DailyEntry::default();
        assert!(entry.add_task("   ", Priority::High, now()).is_err());

        let id = entry
            .add_task("  Call mom ", Priority::High, now())
            .expect("task should be created");
        let task = entry.task(&id).expect("task should exist");
        assert_eq!(task.title, "Call mom");
        assert!(!task.completed);
    }

    #[test]
    fn ids_are_unique_within_an_entry() {
        let mut entry = DailyEntry::default();
        let first = entry.add_task("a", Priority::Low, now()).expect("task");
        let second = entry.add_task("b", Priority::Low, now()).expect("task");
        let goal = entry.add_goal("c", now()).expect("goal");
        assert_ne!(first, second);
        assert_ne!(second, goal);
        assert!(generate_id().contains('-'));
    }

    #[test]
    fn toggling_and_removing_unknown_ids_fails_cleanly() {
        let mut entry = DailyEntry::default();
        let id = entry.add_task("Write", Priority::Medium, now()).expect("task");
        assert_eq!(entry.toggle_task(&id), Ok(true));
        assert_eq!(entry.toggle_task(&id), Ok(false));
        assert!(entry.toggle_task("missing").is_err());
        assert!(entry.remove_goal("missing").is_err());
        entry.remove_task(&id).expect("remove should work");
        assert!(!entry.is_active());
    }

    #[test]
    fn move_task_reorders_like_a_drag() {
        let mut entry = DailyEntry::default();
        for title in ["a", "b", "c"] {
            entry.add_task(title, Priority::Medium, now()).expect("task");
        }
        entry.move_task(0, 2).expect("move should work");
        let titles = entry.tasks.iter().map(|task| task.title.as_str()).collect::<Vec<_>>();
        assert_eq!(titles, ["b", "c", "a"]);
        assert!(entry.move_task(0, 3).is_err());
    }

    #[test]
    fn display_order_puts_open_high_priority_first_without_touching_storage() {
        let mut entry = DailyEntry::default();
        let low = entry.add_task("low", Priority::Low, now()).expect("task");
        entry.add_task("done high", Priority::High, now()).expect("task");
        entry.add_task("high", Priority::High, now()).expect("task");
        let done = entry.tasks[1].id.clone();
        entry.toggle_task(&done).expect("toggle");

        let shown = display_order(&entry.tasks)
            .into_iter()
            .map(|task| task.title.as_str())
            .collect::<Vec<_>>();
        assert_eq!(shown, ["high", "low", "done high"]);
        assert_eq!(entry.tasks[0].id, low);
    }

    #[test]
    fn entry_json_uses_camel_case_and_tolerates_missing_fields() {
        let raw = r#"{"date":"2024-01-01","tasks":[{"id":"1","title":"Call mom","completed":true,"priority":"high","createdAt":"2024-01-01T09:00:00Z"}],"completed":false}"#;
        let entry: DailyEntry = serde_json::from_str(raw).expect("entry should parse");
        assert_eq!(entry.tasks.len(), 1);
        assert_eq!(entry.tasks[0].priority, Priority::High);
        assert!(entry.goals.is_empty());
        assert_eq!(entry.notes, "");

        let encoded = serde_json::to_value(&entry).expect("entry should encode");
        assert!(encoded["tasks"][0].get("createdAt").is_some());
    }

    #[test]
    fn settings_fill_missing_fields_from_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"weekStartDay":"sunday","timeFormat":"24h"}"#).expect("settings");
        assert_eq!(settings.week_start_day, WeekStart::Sunday);
        assert_eq!(settings.time_format, TimeFormat::TwentyFourHour);
        assert!(settings.auto_backup);
        assert_eq!(Settings::default().week_start_day, WeekStart::Monday);
    }
}
