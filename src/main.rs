mod archive;
mod calendar;
mod domain;
mod logging;
mod paths;
mod stats;
mod storage;
mod ui;

use std::error::Error;
use std::path::PathBuf;

use chrono::{Datelike, Duration, Local, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use log::{info, warn};

use crate::archive::{filter, ArchiveExport, ArchiveQuery, DateRange, StatusFilter};
use crate::calendar::{
	annotated_month, first_day_of_month, shift_month, week_dates, weekday_labels, year_months, MonthCell,
};
use crate::domain::{
	display_order, parse_day, DailyEntry, FontSize, Priority, Settings, Theme, TimeFormat, WeekStart,
};
use crate::logging::init_logging;
use crate::paths::resolve_data_dir;
use crate::stats::{corpus_stats, day_summaries, progress, range_stats, CorpusStats, RangeStats};
use crate::storage::{
	read_json_file, write_json_file, ExportBundle, JournalStore, LegacyTable, DEFAULT_BACKUP_PREFIX,
};
use crate::ui::{run_dashboard, Session};

const ACTIVITY_GLYPHS: [char; 4] = [' ', '.', '+', '#'];

#[derive(Debug, Parser)]
#[command(name = "daybook", about = "Terminal daily journal: tasks, goals and notes per day")]
struct Cli {
	#[arg(long, global = true)]
	data_dir: Option<PathBuf>,
	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
	Init,
	Dashboard,
	AddTask {
		#[arg(long)]
		title: String,
		#[arg(long, value_enum, default_value_t = Priority::Medium)]
		priority: Priority,
		#[arg(long)]
		date: Option<String>,
	},
	ToggleTask {
		#[arg(long)]
		id: String,
		#[arg(long)]
		date: Option<String>,
	},
	SetPriority {
		#[arg(long)]
		id: String,
		#[arg(long, value_enum)]
		priority: Priority,
		#[arg(long)]
		date: Option<String>,
	},
	RenameTask {
		#[arg(long)]
		id: String,
		#[arg(long)]
		title: String,
		#[arg(long)]
		date: Option<String>,
	},
	RemoveTask {
		#[arg(long)]
		id: String,
		#[arg(long)]
		date: Option<String>,
	},
	MoveTask {
		#[arg(long)]
		from: usize,
		#[arg(long)]
		to: usize,
		#[arg(long)]
		date: Option<String>,
	},
	AddGoal {
		#[arg(long)]
		title: String,
		#[arg(long)]
		date: Option<String>,
	},
	ToggleGoal {
		#[arg(long)]
		id: String,
		#[arg(long)]
		date: Option<String>,
	},
	RemoveGoal {
		#[arg(long)]
		id: String,
		#[arg(long)]
		date: Option<String>,
	},
	Note {
		#[arg(long)]
		text: String,
		#[arg(long)]
		date: Option<String>,
	},
	Show {
		#[arg(long)]
		date: Option<String>,
	},
	Week {
		#[arg(long)]
		date: Option<String>,
	},
	Month {
		#[arg(long)]
		year: Option<i32>,
		#[arg(long)]
		month: Option<u32>,
	},
	Year {
		#[arg(long)]
		year: Option<i32>,
	},
	Stats,
	Archive {
		#[arg(long, value_enum, default_value_t = DateRange::All)]
		range: DateRange,
		#[arg(long, value_enum, default_value_t = StatusFilter::All)]
		status: StatusFilter,
		#[arg(long, default_value = "")]
		search: String,
		#[arg(long)]
		export: Option<PathBuf>,
	},
	Backup {
		#[arg(long, default_value = DEFAULT_BACKUP_PREFIX)]
		prefix: String,
	},
	Export {
		#[arg(long)]
		out: PathBuf,
	},
	Import {
		#[arg(long)]
		from: PathBuf,
	},
	Legacy {
		#[arg(long, value_enum)]
		table: LegacyTable,
	},
	Settings {
		#[arg(long, value_enum)]
		theme: Option<Theme>,
		#[arg(long, value_enum)]
		week_start: Option<WeekStart>,
		#[arg(long, value_enum)]
		time_format: Option<TimeFormat>,
		#[arg(long)]
		notifications: Option<bool>,
		#[arg(long)]
		auto_backup: Option<bool>,
		#[arg(long, value_enum)]
		font_size: Option<FontSize>,
	},
}

fn main() {
	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> Result<(), Box<dyn Error>> {
	let cli = Cli::parse();

	let data_dir = resolve_data_dir(cli.data_dir);
	let _logger = match init_logging(&data_dir.join("logs")) {
		Ok(handle) => Some(handle),
		Err(err) => {
			eprintln!("warning: logging disabled: {err}");
			None
		}
	};

	let store = JournalStore::open(&data_dir);
	let mut settings = store.load_settings();
	match store.auto_backup(&settings, Utc::now()) {
		Ok(Some(report)) => info!("event=auto_backup module=main status=ok path={}", report.path.display()),
		Ok(None) => {}
		Err(err) => {
			warn!("event=auto_backup module=main status=error error={err}");
			eprintln!("warning: {err}");
		}
	}

	match cli.command.unwrap_or(Command::Dashboard) {
		Command::Init => {
			store.replace_all(&store.get_all())?;
			store.save_settings(&settings)?;
			println!("initialized journal at {}", data_dir.display());
			println!("tables:  {}", store.tables().data_dir().display());
			println!("backups: {}", store.tables().backup_dir().display());
		}
		Command::Dashboard => {
			let mut entries = store.get_all();
			let session = Session {
				store: &store,
				data_dir: &data_dir,
			};
			run_dashboard(&session, &mut entries, &mut settings)?;
		}
		Command::AddTask { title, priority, date } => {
			let task_id = update_day(&store, date.as_deref(), |entry| {
				entry.add_task(&title, priority, Utc::now())
			})?;
			println!("created task {task_id}");
		}
		Command::ToggleTask { id, date } => {
			let done = update_day(&store, date.as_deref(), |entry| entry.toggle_task(&id))?;
			println!("{} {id}", if done { "completed" } else { "reopened" });
		}
		Command::SetPriority { id, priority, date } => {
			update_day(&store, date.as_deref(), |entry| entry.set_task_priority(&id, priority))?;
			println!("{id} is now {} priority", priority.label());
		}
		Command::RenameTask { id, title, date } => {
			update_day(&store, date.as_deref(), |entry| entry.rename_task(&id, &title))?;
			println!("renamed {id}");
		}
		Command::RemoveTask { id, date } => {
			let task = update_day(&store, date.as_deref(), |entry| entry.remove_task(&id))?;
			println!("removed task {} ({})", task.id, task.title);
		}
		Command::MoveTask { from, to, date } => {
			update_day(&store, date.as_deref(), |entry| entry.move_task(from, to))?;
			println!("moved task {from} -> {to}");
		}
		Command::AddGoal { title, date } => {
			let goal_id = update_day(&store, date.as_deref(), |entry| entry.add_goal(&title, Utc::now()))?;
			println!("created goal {goal_id}");
		}
		Command::ToggleGoal { id, date } => {
			let done = update_day(&store, date.as_deref(), |entry| entry.toggle_goal(&id))?;
			println!("{} {id}", if done { "achieved" } else { "reopened" });
		}
		Command::RemoveGoal { id, date } => {
			let goal = update_day(&store, date.as_deref(), |entry| entry.remove_goal(&id))?;
			println!("removed goal {} ({})", goal.id, goal.title);
		}
		Command::Note { text, date } => {
			update_day(&store, date.as_deref(), |entry| {
				entry.set_notes(text);
				Ok(())
			})?;
			println!("notes saved");
		}
		Command::Show { date } => {
			let day = day_or_today(date.as_deref())?;
			print_day(day, &store.get(day), &settings);
		}
		Command::Week { date } => {
			let day = day_or_today(date.as_deref())?;
			print_week(&store, day, &settings);
		}
		Command::Month { year, month } => {
			let today = Local::now().date_naive();
			let year = year.unwrap_or(today.year());
			let month = month.unwrap_or(today.month());
			print_month(&store, year, month)?;
		}
		Command::Year { year } => {
			print_year(&store, year.unwrap_or(Local::now().date_naive().year()));
		}
		Command::Stats => {
			let stats = corpus_stats(&store.get_all(), Local::now().date_naive());
			print_stats(&stats);
		}
		Command::Archive {
			range,
			status,
			search,
			export,
		} => {
			let query = ArchiveQuery {
				date_range: range,
				status,
				search_text: search,
			};
			print_archive(&store, &query, export)?;
		}
		Command::Backup { prefix } => {
			let report = store.snapshot(&prefix)?;
			println!(
				"backup written to {} ({} tables)",
				report.path.display(),
				report.tables.len()
			);
		}
		Command::Export { out } => {
			let bundle = ExportBundle::new(store.get_all(), settings, Utc::now());
			write_json_file(&out, &bundle)?;
			println!("exported {} entries to {}", bundle.entries.len(), out.display());
		}
		Command::Import { from } => {
			let summary = store.import(read_json_file(&from)?)?;
			println!(
				"imported {} entries{}",
				summary.entries,
				if summary.settings { " and settings" } else { "" }
			);
		}
		Command::Legacy { table } => {
			println!("{}", serde_json::to_string_pretty(&store.legacy_table(table))?);
		}
		Command::Settings {
			theme,
			week_start,
			time_format,
			notifications,
			auto_backup,
			font_size,
		} => {
			let before = settings.clone();
			if let Some(theme) = theme {
				settings.theme = theme;
			}
			if let Some(week_start) = week_start {
				settings.week_start_day = week_start;
			}
			if let Some(time_format) = time_format {
				settings.time_format = time_format;
			}
			if let Some(notifications) = notifications {
				settings.notifications = notifications;
			}
			if let Some(auto_backup) = auto_backup {
				settings.auto_backup = auto_backup;
			}
			if let Some(font_size) = font_size {
				settings.font_size = font_size;
			}

			if settings != before {
				store.save_settings(&settings)?;
				println!("settings updated");
			}
			println!("{}", serde_json::to_string_pretty(&settings)?);
		}
	}

	Ok(())
}

/// Read-modify-write of one day through `put`.
fn update_day<T>(
	store: &JournalStore,
	date: Option<&str>,
	edit: impl FnOnce(&mut DailyEntry) -> Result<T, String>,
) -> Result<T, Box<dyn Error>> {
	let day = day_or_today(date)?;
	let mut entry = store.get(day);
	let value = edit(&mut entry)?;
	store.put(day, entry)?;
	Ok(value)
}

fn day_or_today(input: Option<&str>) -> Result<NaiveDate, Box<dyn Error>> {
	match input {
		Some(raw) => Ok(parse_day(raw)?),
		None => Ok(Local::now().date_naive()),
	}
}

fn print_day(day: NaiveDate, entry: &DailyEntry, settings: &Settings) {
	println!("{}", day.format("%A, %d %B %Y"));
	if !entry.is_active() && entry.goals.is_empty() && entry.notes.trim().is_empty() {
		println!("nothing recorded for this day");
		return;
	}

	println!(
		"\ntasks {}/{} ({}%):",
		entry.completed_tasks(),
		entry.tasks.len(),
		progress(&entry.tasks)
	);
	for task in display_order(&entry.tasks) {
		println!(
			"[{}] {:<6} | {} | {} | {}",
			if task.completed { "x" } else { " " },
			task.priority.label(),
			task.id,
			task.created_at
				.with_timezone(&Local)
				.format(settings.time_format.clock_pattern()),
			task.title
		);
	}

	if !entry.goals.is_empty() {
		println!("\ngoals:");
		for goal in &entry.goals {
			println!("[{}] {} | {}", if goal.completed { "x" } else { " " }, goal.id, goal.title);
		}
	}

	if !entry.notes.trim().is_empty() {
		println!("\nnotes:\n{}", entry.notes);
	}
}

fn print_week(store: &JournalStore, day: NaiveDate, settings: &Settings) {
	let entries = store.get_all();
	let days = week_dates(day, settings.week_start_day);
	let stats = range_stats(&entries, days[0], days[6]);

	println!(
		"week of {} - {}",
		days[0].format("%Y-%m-%d"),
		days[6].format("%Y-%m-%d")
	);
	for summary in day_summaries(&entries, &days) {
		println!(
			"{} | {:>3}% | {}/{} tasks | {} goals{}",
			summary.date.format("%a %Y-%m-%d"),
			summary.progress,
			summary.completed_tasks,
			summary.total_tasks,
			summary.goals,
			if summary.has_notes { " | notes" } else { "" }
		);
	}
	print_range_stats(&stats);
}

fn print_month(store: &JournalStore, year: i32, month: u32) -> Result<(), Box<dyn Error>> {
	let entries = store.get_all();
	let cells = annotated_month(year, month, &entries)
		.ok_or_else(|| format!("invalid month {year}-{month:02}"))?;
	let first = cells
		.iter()
		.find(|cell| cell.in_current_month)
		.map(|cell| first_day_of_month(cell.date))
		.ok_or_else(|| format!("invalid month {year}-{month:02}"))?;

	println!("{}", first.format("%B %Y"));
	println!("{}", grid_header());
	for line in grid_rows(&cells) {
		println!("{line}");
	}
	println!("activity: ' ' none  '.' started  '+' half done  '#' complete");
	print_range_stats(&range_stats(&entries, first, last_day_of_month(first)));
	Ok(())
}

fn print_year(store: &JournalStore, year: i32) {
	let entries = store.get_all();
	let months = year_months(year);

	for descriptor in &months {
		let cells = annotated_month(year, descriptor.first.month(), &entries).unwrap_or_default();
		let strip = cells
			.iter()
			.filter(|cell| cell.in_current_month)
			.map(|cell| activity_glyph(cell.level))
			.collect::<String>();
		let stats = range_stats(&entries, descriptor.first, last_day_of_month(descriptor.first));
		println!(
			"{:>2} {:<9} |{strip:<31}| {:>2} active | {:>3}%",
			descriptor.index + 1,
			descriptor.name,
			stats.active_days,
			stats.completion_rate
		);
	}

	if let (Some(first), Some(last)) = (months.first(), months.last()) {
		println!();
		print_range_stats(&range_stats(&entries, first.first, last_day_of_month(last.first)));
	}
}

fn print_stats(stats: &CorpusStats) {
	println!("total days:      {}", stats.total_days);
	println!("active days:     {}", stats.active_days);
	println!("tasks completed: {}/{}", stats.completed_tasks, stats.total_tasks);
	println!("completion rate: {}%", stats.completion_rate);
	println!("current streak:  {}", stats.current_streak);
	println!("longest streak:  {}", stats.longest_streak);
}

fn print_range_stats(stats: &RangeStats) {
	println!(
		"active days: {} | tasks: {}/{} | completion: {}%",
		stats.active_days, stats.completed_tasks, stats.total_tasks, stats.completion_rate
	);
}

fn print_archive(store: &JournalStore, query: &ArchiveQuery, export: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
	let entries = store.get_all();
	let today = Local::now().date_naive();
	let results = filter(&entries, query, today);

	if query.is_filtered() {
		println!(
			"{} | {} | search \"{}\"",
			query.date_range.label(),
			query.status.label(),
			query.search_text.trim()
		);
	}
	if results.is_empty() {
		println!("no entries match");
	}
	for (date, entry) in &results {
		println!(
			"{} | {:>3}% | {}/{} tasks | {} goals",
			date.format("%Y-%m-%d"),
			progress(&entry.tasks),
			entry.completed_tasks(),
			entry.tasks.len(),
			entry.goals.len()
		);
	}

	if let Some(path) = export {
		let bundle = ArchiveExport::new(&results, corpus_stats(&entries, today), query, Utc::now());
		write_json_file(&path, &bundle)?;
		println!("exported {} entries to {}", results.len(), path.display());
	}

	Ok(())
}

fn grid_header() -> String {
	weekday_labels(WeekStart::Sunday)
		.iter()
		.map(|label| format!("{label:>3} "))
		.collect()
}

fn grid_rows(cells: &[MonthCell]) -> Vec<String> {
	cells
		.chunks(7)
		.map(|week| {
			week.iter()
				.map(|cell| {
					if cell.in_current_month {
						format!("{:>3}{}", cell.date.day(), activity_glyph(cell.level))
					} else {
						"    ".to_string()
					}
				})
				.collect::<String>()
		})
		.collect()
}

fn activity_glyph(level: u8) -> char {
	ACTIVITY_GLYPHS[usize::from(level).min(ACTIVITY_GLYPHS.len() - 1)]
}

fn last_day_of_month(first: NaiveDate) -> NaiveDate {
	shift_month(first, 1) - Duration::days(1)
}

#[cfg(test)]
mod tests {
	use chrono::NaiveDate;
	use clap::Parser;

	use crate::calendar::annotated_month;
	use crate::domain::{DailyEntry, EntryMap, Priority};

	use super::{activity_glyph, grid_header, grid_rows, last_day_of_month, Cli, Command};

	fn day(y: i32, m: u32, d: u32) -> NaiveDate {
		NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
	}

	#[test]
	fn month_rows_mark_activity_and_hide_padding() {
		let now = chrono::Utc::now();
		let mut entry = DailyEntry::default();
		let id = entry.add_task("ship", Priority::High, now).expect("task");
		entry.toggle_task(&id).expect("toggle");
		let mut entries = EntryMap::new();
		entries.insert(day(2024, 1, 8), entry);

		let cells = annotated_month(2024, 1, &entries).expect("grid");
		let rows = grid_rows(&cells);
		assert_eq!(rows.len(), 6);
		// January 2024 starts on a Monday, so Sunday's column is padding.
		assert!(rows[0].starts_with("    "));
		assert!(rows[1].contains("  8#"));
		assert_eq!(grid_header().trim(), "Su  Mo  Tu  We  Th  Fr  Sa");
	}

	#[test]
	fn glyphs_and_month_ends() {
		assert_eq!(activity_glyph(0), ' ');
		assert_eq!(activity_glyph(3), '#');
		assert_eq!(activity_glyph(9), '#');
		assert_eq!(last_day_of_month(day(2024, 2, 1)), day(2024, 2, 29));
		assert_eq!(last_day_of_month(day(2023, 12, 1)), day(2023, 12, 31));
	}

	#[test]
	fn cli_parses_task_commands() {
		let cli = Cli::parse_from(["daybook", "--data-dir", "/tmp/j", "add-task", "--title", "Write", "--priority", "high"]);
		match cli.command {
			Some(Command::AddTask { title, priority, date }) => {
				assert_eq!(title, "Write");
				assert_eq!(priority, Priority::High);
				assert!(date.is_none());
			}
			other => panic!("unexpected command: {other:?}"),
		}

		let cli = Cli::parse_from(["daybook", "archive", "--range", "week", "--status", "incomplete"]);
		assert!(matches!(cli.command, Some(Command::Archive { .. })));
	}
}
