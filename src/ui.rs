use std::error::Error;
use std::io;
use std::path::Path;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, Utc};
use crossterm::event::{self, Event as CEvent, KeyCode, KeyEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, ExecutableCommand};
use log::{info, warn};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::{Frame, Terminal};

use crate::archive::{filter, ArchiveExport, ArchiveQuery};
use crate::calendar::{
	activity_level, annotated_month, first_day_of_month, shift_month, week_dates, weekday_labels, year_months, MonthCell,
	MonthDescriptor, MAX_ACTIVITY_LEVEL,
};
use crate::domain::{display_order, DailyEntry, EntryMap, Priority, Settings, Theme, WeekStart};
use crate::stats::{corpus_stats, day_summaries, progress, range_stats, CorpusStats, DaySummary, RangeStats};
use crate::storage::{write_json_file, JournalStore, DEFAULT_BACKUP_PREFIX};

const NOTE_PREVIEW_CHARS: usize = 48;
const YEAR_GRID_COLUMNS: usize = 4;
const EXPORTS_SUBDIR: &str = "exports";

/// Everything the dashboard needs to persist changes.
pub struct Session<'a> {
	pub store: &'a JournalStore,
	pub data_dir: &'a Path,
}

pub fn run_dashboard(
	session: &Session,
	entries: &mut EntryMap,
	settings: &mut Settings,
) -> Result<(), Box<dyn Error>> {
	enable_raw_mode()?;
	let mut stdout = io::stdout();
	stdout.execute(EnterAlternateScreen)?;
	let backend = CrosstermBackend::new(stdout);
	let mut terminal = Terminal::new(backend)?;

	let result = run_event_loop(&mut terminal, session, entries, settings);

	disable_raw_mode()?;
	execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
	terminal.show_cursor()?;

	result
}

fn run_event_loop(
	terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
	session: &Session,
	entries: &mut EntryMap,
	settings: &mut Settings,
) -> Result<(), Box<dyn Error>> {
	let mut app = App::default();

	loop {
		let today = Local::now().date_naive();
		let view = build_view(&app, entries, settings, today);
		app.clamp_selection(&view);
		terminal.draw(|frame| draw_dashboard(frame, &app, &view, settings))?;

		if event::poll(StdDuration::from_millis(250))? {
			if let CEvent::Key(key) = event::read()? {
				if key.kind != KeyEventKind::Press {
					continue;
				}

				let should_quit = match &app.mode {
					InputMode::Prompt(_) => handle_prompt_key(&mut app, key.code, session, entries),
					InputMode::Select(_) => handle_select_key(&mut app, key.code, session, entries),
					InputMode::Normal => handle_normal_key(&mut app, key.code, session, entries, settings, &view),
				};

				if should_quit {
					break;
				}
			}
		}
	}

	Ok(())
}

fn draw_dashboard(frame: &mut Frame, app: &App, view: &ViewModel, settings: &Settings) {
	let palette = Palette::for_theme(settings.theme);
	let layout = Layout::default()
		.direction(Direction::Vertical)
		.constraints([Constraint::Length(1), Constraint::Min(12), Constraint::Length(5)])
		.split(frame.area());

	let body = Layout::default()
		.direction(Direction::Horizontal)
		.constraints([Constraint::Percentage(72), Constraint::Percentage(28)])
		.split(layout[1]);

	render_tabs(frame, layout[0], app, &palette);
	match app.view {
		ViewTab::Day => render_day_panel(frame, body[0], app, view, settings, &palette),
		ViewTab::Week => render_week_panel(frame, body[0], app, view, settings, &palette),
		ViewTab::Month => render_month_panel(frame, body[0], app, view, &palette),
		ViewTab::Year => render_year_panel(frame, body[0], app, view, &palette),
		ViewTab::Archive => render_archive_panel(frame, body[0], app, view, &palette),
	}
	render_stats_panel(frame, body[1], view, settings);
	render_footer(frame, layout[2], app);

	if let InputMode::Select(select) = &app.mode {
		render_select_popup(frame, select, &palette);
	}
}

fn render_tabs(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
	let mut spans = Vec::new();
	for (index, tab) in ViewTab::ALL.iter().enumerate() {
		let style = if *tab == app.view {
			Style::default().fg(Color::Black).bg(palette.accent).add_modifier(Modifier::BOLD)
		} else {
			Style::default().fg(Color::Gray)
		};
		spans.push(Span::styled(format!(" {} {} ", index + 1, tab.title()), style));
		spans.push(Span::raw(" "));
	}
	spans.push(Span::styled(
		app.selected_day.format("%A, %d %B %Y").to_string(),
		Style::default().add_modifier(Modifier::BOLD),
	));
	frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_day_panel(
	frame: &mut Frame,
	area: Rect,
	app: &App,
	view: &ViewModel,
	settings: &Settings,
	palette: &Palette,
) {
	let goal_height = (view.goal_rows.len() as u16).clamp(1, 8) + 2;
	let sections = Layout::default()
		.direction(Direction::Vertical)
		.constraints([Constraint::Min(6), Constraint::Length(goal_height), Constraint::Length(8)])
		.split(area);

	let clock = settings.time_format.clock_pattern();
	let task_items = view
		.task_rows
		.iter()
		.map(|row| {
			let check = if row.completed { "[x]" } else { "[ ]" };
			let title_style = if row.completed {
				Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
			} else {
				Style::default()
			};
			ListItem::new(Line::from(vec![
				Span::raw(format!("{check} ")),
				Span::styled(format!("{:<6} ", row.priority.label()), priority_style(row.priority)),
				Span::styled(row.title.clone(), title_style),
				Span::styled(
					format!("  {}", row.created_at.with_timezone(&Local).format(clock)),
					Style::default().fg(Color::DarkGray),
				),
			]))
		})
		.collect::<Vec<_>>();

	let task_title = format!(
		"Tasks {}/{} ({}%){}",
		view.day.completed_tasks,
		view.day.total_tasks,
		view.day.progress,
		if app.sort_by_priority { " | by priority" } else { " | manual order" }
	);
	render_selectable_list(
		frame,
		sections[0],
		task_items,
		"(no tasks, press a to add one)",
		task_title,
		(app.day_focus == DayFocus::Tasks).then_some(app.task_index),
		palette,
	);

	let goal_items = view
		.goal_rows
		.iter()
		.map(|row| {
			let check = if row.completed { "[x]" } else { "[ ]" };
			ListItem::new(format!("{check} {}", row.title))
		})
		.collect::<Vec<_>>();
	render_selectable_list(
		frame,
		sections[1],
		goal_items,
		"(no goals, press g to add one)",
		"Goals".to_string(),
		(app.day_focus == DayFocus::Goals).then_some(app.goal_index),
		palette,
	);

	let notes = if view.notes.trim().is_empty() {
		vec![Line::styled("(no notes, press n to write)", Style::default().fg(Color::DarkGray))]
	} else {
		view.notes.lines().map(|line| Line::from(line.to_string())).collect()
	};
	let panel = Paragraph::new(notes)
		.wrap(Wrap { trim: false })
		.block(Block::default().borders(Borders::ALL).title("Notes"));
	frame.render_widget(panel, sections[2]);
}

fn render_selectable_list(
	frame: &mut Frame,
	area: Rect,
	items: Vec<ListItem<'static>>,
	empty_text: &str,
	title: String,
	selected: Option<usize>,
	palette: &Palette,
) {
	let mut state = ListState::default();
	if !items.is_empty() {
		state.select(selected.map(|index| index.min(items.len() - 1)));
	}

	let list = List::new(if items.is_empty() {
		vec![ListItem::new(empty_text.to_string())]
	} else {
		items
	})
	.block(
		Block::default()
			.borders(Borders::ALL)
			.title(title)
			.border_style(border_style(selected.is_some(), palette)),
	)
	.highlight_style(Style::default().bg(palette.highlight).add_modifier(Modifier::BOLD));

	frame.render_stateful_widget(list, area, &mut state);
}

fn render_week_panel(
	frame: &mut Frame,
	area: Rect,
	app: &App,
	view: &ViewModel,
	settings: &Settings,
	palette: &Palette,
) {
	let mut lines = Vec::new();
	let stats = &view.week_stats;
	lines.push(Line::from(format!(
		"Active days: {} | Tasks: {}/{} | Completion: {}%",
		stats.active_days, stats.completed_tasks, stats.total_tasks, stats.completion_rate
	)));
	lines.push(Line::from(""));

	for (summary, level) in view.week.iter().zip(&view.week_levels) {
		let is_selected = summary.date == app.selected_day;
		let is_today = summary.date == view.today;
		let label_style = if is_selected {
			Style::default().fg(Color::Black).bg(palette.accent).add_modifier(Modifier::BOLD)
		} else if is_today {
			Style::default().fg(palette.accent).add_modifier(Modifier::BOLD)
		} else {
			Style::default()
		};

		let width = (usize::from(summary.progress) * 20).div_ceil(100);
		let bar = format!("{:<20}", "=".repeat(width));
		let mut spans = vec![
			Span::styled(summary.date.format("%a %d %b").to_string(), label_style),
			Span::raw("  "),
			Span::styled(bar, level_style(*level)),
			Span::raw(format!(
				" {:>3}% {:>2}/{:<2} tasks",
				summary.progress, summary.completed_tasks, summary.total_tasks
			)),
		];
		if summary.goals > 0 {
			spans.push(Span::raw(format!(" | {} goals", summary.goals)));
		}
		if summary.has_notes {
			spans.push(Span::styled(" | notes", Style::default().fg(Color::DarkGray)));
		}
		lines.push(Line::from(spans));
	}

	let week_start = match settings.week_start_day {
		WeekStart::Sunday => "Sunday",
		WeekStart::Monday => "Monday",
	};
	let title = match (view.week.first(), view.week.last()) {
		(Some(first), Some(last)) => format!(
			"Week {} - {} (starts {week_start})",
			first.date.format("%d %b"),
			last.date.format("%d %b %Y")
		),
		_ => "Week".to_string(),
	};
	let panel = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
	frame.render_widget(panel, area);
}

fn render_month_panel(frame: &mut Frame, area: Rect, app: &App, view: &ViewModel, palette: &Palette) {
	let mut lines = Vec::new();
	let header = weekday_labels(WeekStart::Sunday)
		.iter()
		.map(|label| format!(" {label} "))
		.collect::<String>();
	lines.push(Line::from(header));
	lines.extend(month_lines(&view.month_cells, app.selected_day, view.today, palette, 4));
	lines.push(Line::from(""));
	lines.push(legend_line());

	let title = format!(
		"{} {} | {} active days | {}% done",
		app.selected_day.format("%B"),
		app.selected_day.year(),
		view.month_stats.active_days,
		view.month_stats.completion_rate
	);
	let panel = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
	frame.render_widget(panel, area);
}

fn render_year_panel(frame: &mut Frame, area: Rect, app: &App, view: &ViewModel, palette: &Palette) {
	let stats = &view.year_stats;
	let block = Block::default().borders(Borders::ALL).title(format!(
		"{} | {} active days | {}/{} tasks | {}%",
		app.selected_day.year(),
		stats.active_days,
		stats.completed_tasks,
		stats.total_tasks,
		stats.completion_rate
	));
	let inner = block.inner(area);
	frame.render_widget(block, area);

	let rows = view.year.len().div_ceil(YEAR_GRID_COLUMNS);
	let row_areas = Layout::default()
		.direction(Direction::Vertical)
		.constraints(vec![Constraint::Ratio(1, rows.max(1) as u32); rows])
		.split(inner);

	for (row_index, chunk) in view.year.chunks(YEAR_GRID_COLUMNS).enumerate() {
		let columns = Layout::default()
			.direction(Direction::Horizontal)
			.constraints(vec![Constraint::Ratio(1, YEAR_GRID_COLUMNS as u32); YEAR_GRID_COLUMNS])
			.split(row_areas[row_index]);

		for (column_index, (descriptor, cells)) in chunk.iter().enumerate() {
			let is_selected_month = descriptor.first.month() == app.selected_day.month();
			let mut lines = Vec::new();
			lines.push(Line::styled(
				descriptor.name.clone(),
				if is_selected_month {
					Style::default().fg(palette.accent).add_modifier(Modifier::BOLD)
				} else {
					Style::default().add_modifier(Modifier::BOLD)
				},
			));
			lines.extend(month_lines(cells, app.selected_day, view.today, palette, 3));
			frame.render_widget(Paragraph::new(lines), columns[column_index]);
		}
	}
}

fn month_lines(
	cells: &[MonthCell],
	selected_day: NaiveDate,
	today: NaiveDate,
	palette: &Palette,
	cell_width: usize,
) -> Vec<Line<'static>> {
	cells
		.chunks(7)
		.map(|week| {
			let spans = week
				.iter()
				.map(|cell| {
					let text = format!("{:>width$} ", cell.date.day(), width = cell_width - 1);
					let style = if !cell.in_current_month {
						Style::default().fg(Color::DarkGray)
					} else if cell.date == selected_day {
						Style::default().fg(Color::Black).bg(palette.accent).add_modifier(Modifier::BOLD)
					} else {
						let style = level_style(cell.level);
						if cell.date == today {
							style.add_modifier(Modifier::UNDERLINED | Modifier::BOLD)
						} else {
							style
						}
					};
					Span::styled(text, style)
				})
				.collect::<Vec<_>>();
			Line::from(spans)
		})
		.collect()
}

fn legend_line() -> Line<'static> {
	let mut spans = vec![Span::raw("Activity: ")];
	for level in 0..=MAX_ACTIVITY_LEVEL {
		let label = match level {
			0 => "none",
			1 => "started",
			2 => "half done",
			_ => "complete",
		};
		spans.push(Span::styled(format!(" {label} "), level_style(level)));
	}
	Line::from(spans)
}

fn render_archive_panel(frame: &mut Frame, area: Rect, app: &App, view: &ViewModel, palette: &Palette) {
	let items = view
		.archive_rows
		.iter()
		.map(|row| {
			let mut spans = vec![
				Span::styled(
					row.date.format("%a %d %b %Y").to_string(),
					Style::default().add_modifier(Modifier::BOLD),
				),
				Span::raw(format!(
					" | {:>3}% | {}/{} tasks | {} goals",
					row.progress, row.completed_tasks, row.total_tasks, row.goals
				)),
			];
			if !row.preview.is_empty() {
				spans.push(Span::styled(format!(" | {}", row.preview), Style::default().fg(Color::DarkGray)));
			}
			ListItem::new(Line::from(spans))
		})
		.collect::<Vec<_>>();

	let query = &app.archive_query;
	let search = if query.search_text.trim().is_empty() {
		String::new()
	} else {
		format!(" | search \"{}\"", query.search_text.trim())
	};
	let title = format!(
		"Archive: {} entries | {} | {}{search}",
		view.archive_rows.len(),
		query.date_range.label(),
		query.status.label()
	);
	render_selectable_list(
		frame,
		area,
		items,
		"(no entries match the current filters)",
		title,
		Some(app.archive_index),
		palette,
	);
}

fn render_stats_panel(frame: &mut Frame, area: Rect, view: &ViewModel, settings: &Settings) {
	let stats = &view.stats;
	let lines = vec![
		Line::from(format!("Total days:      {}", stats.total_days)),
		Line::from(format!("Active days:     {}", stats.active_days)),
		Line::from(format!("Tasks done:      {}/{}", stats.completed_tasks, stats.total_tasks)),
		Line::from(format!("Completion:      {}%", stats.completion_rate)),
		Line::from(format!("Current streak:  {}", stats.current_streak)),
		Line::from(format!("Longest streak:  {}", stats.longest_streak)),
		Line::from(""),
		Line::from("Settings"),
		Line::from(format!("Theme:           {}", format!("{:?}", settings.theme).to_lowercase())),
		Line::from(format!(
			"Week starts:     {}",
			format!("{:?}", settings.week_start_day).to_lowercase()
		)),
		Line::from(format!(
			"Auto backup:     {}",
			if settings.auto_backup { "on" } else { "off" }
		)),
		Line::from(format!(
			"Now:             {}",
			Local::now().format(settings.time_format.clock_pattern())
		)),
	];

	let panel = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Progress"));
	frame.render_widget(panel, area);
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
	let footer_lines = match &app.mode {
		InputMode::Normal => vec![
			Line::from("1-5 views | arrows/hjkl move | [ ] month | { } year | . today | Enter open day | q quit"),
			Line::from(app.view_hint()),
			Line::from("a task | g goal | n note | b backup | T theme | w week start"),
			Line::from(app.status.clone()),
		],
		InputMode::Prompt(prompt) => vec![
			Line::from(prompt.title.clone()),
			Line::from(format!("> {}", prompt.input)),
			Line::from("Enter submit | Esc cancel"),
			Line::from(app.status.clone()),
		],
		InputMode::Select(select) => vec![
			Line::from(select.title.clone()),
			Line::from(format!(
				"Selected: {}",
				select
					.selected_option()
					.map(|option| option.label.as_str())
					.unwrap_or("(none)")
			)),
			Line::from("j/k or arrows move | Enter choose | Esc cancel"),
			Line::from(app.status.clone()),
		],
	};

	let footer = Paragraph::new(footer_lines).block(Block::default().borders(Borders::TOP).title("Shortcuts"));
	frame.render_widget(footer, area);
}

fn render_select_popup(frame: &mut Frame, select: &SelectState, palette: &Palette) {
	let area = centered_rect(50, 40, frame.area());
	frame.render_widget(Clear, area);

	let items = select
		.options
		.iter()
		.map(|option| ListItem::new(option.label.clone()).style(option.style))
		.collect::<Vec<_>>();

	let list = List::new(items)
		.block(Block::default().borders(Borders::ALL).title(select.title.clone()))
		.highlight_symbol(">> ")
		.highlight_style(Style::default().bg(palette.highlight));

	let mut state = ListState::default();
	if !select.options.is_empty() {
		state.select(Some(select.selected.min(select.options.len() - 1)));
	}
	frame.render_stateful_widget(list, area, &mut state);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
	let popup_layout = Layout::default()
		.direction(Direction::Vertical)
		.constraints([
			Constraint::Percentage((100 - percent_y) / 2),
			Constraint::Percentage(percent_y),
			Constraint::Percentage((100 - percent_y) / 2),
		])
		.split(area);
	Layout::default()
		.direction(Direction::Horizontal)
		.constraints([
			Constraint::Percentage((100 - percent_x) / 2),
			Constraint::Percentage(percent_x),
			Constraint::Percentage((100 - percent_x) / 2),
		])
		.split(popup_layout[1])[1]
}

fn handle_normal_key(
	app: &mut App,
	code: KeyCode,
	session: &Session,
	entries: &mut EntryMap,
	settings: &mut Settings,
	view: &ViewModel,
) -> bool {
	match code {
		KeyCode::Char('q') | KeyCode::Esc => return true,
		KeyCode::Char(digit @ '1'..='5') => {
			let index = digit as usize - '1' as usize;
			app.view = ViewTab::ALL[index];
		}
		KeyCode::Tab if app.view == ViewTab::Day => {
			app.day_focus = app.day_focus.toggle();
		}
		KeyCode::Left | KeyCode::Char('h') => app.move_horizontal(-1),
		KeyCode::Right | KeyCode::Char('l') => app.move_horizontal(1),
		KeyCode::Up | KeyCode::Char('k') => app.move_vertical(-1, view),
		KeyCode::Down | KeyCode::Char('j') => app.move_vertical(1, view),
		KeyCode::Char('[') => app.shift_selected_month(-1),
		KeyCode::Char(']') => app.shift_selected_month(1),
		KeyCode::Char('{') => app.shift_selected_month(-12),
		KeyCode::Char('}') => app.shift_selected_month(12),
		KeyCode::Char('.') => {
			app.select_day(view.today);
			app.status = "Jumped to today".to_string();
		}
		KeyCode::Enter => match app.view {
			ViewTab::Day => {}
			ViewTab::Archive => {
				if let Some(row) = view.archive_rows.get(app.archive_index) {
					app.select_day(row.date);
					app.view = ViewTab::Day;
				}
			}
			ViewTab::Week | ViewTab::Month | ViewTab::Year => app.view = ViewTab::Day,
		},
		KeyCode::Char('a') => {
			app.mode = InputMode::Prompt(PromptState::new("Task title", PromptKind::AddTaskTitle));
		}
		KeyCode::Char('g') => {
			app.mode = InputMode::Prompt(PromptState::new("Goal", PromptKind::AddGoal));
		}
		KeyCode::Char('n') => {
			app.mode = InputMode::Prompt(PromptState::new(
				"Append a line to the day's notes (Markdown)",
				PromptKind::AppendNote,
			));
		}
		KeyCode::Char('N') if app.view == ViewTab::Day => {
			app.mode = InputMode::Select(build_confirm_select(
				"Clear the day's notes?",
				SelectKind::ClearNotes,
			));
		}
		KeyCode::Char(' ') if app.view == ViewTab::Day => {
			app.status = match toggle_selected(app, session, entries, view) {
				Ok(message) => message,
				Err(err) => format!("error: {err}"),
			};
		}
		KeyCode::Char('p') if app.view == ViewTab::Day => {
			app.status = match cycle_selected_priority(app, session, entries, view) {
				Ok(message) => message,
				Err(err) => format!("error: {err}"),
			};
		}
		KeyCode::Char('e') if app.view == ViewTab::Day => match app.selected_task(view) {
			Some(row) => {
				let mut prompt = PromptState::new("Rename task", PromptKind::RenameTask { task_id: row.id.clone() });
				prompt.input = row.title.clone();
				app.mode = InputMode::Prompt(prompt);
			}
			None => app.status = "Select a task first".to_string(),
		},
		KeyCode::Char('x') if app.view == ViewTab::Day => match app.day_focus {
			DayFocus::Tasks => match app.selected_task(view) {
				Some(row) => {
					app.mode = InputMode::Select(build_confirm_select(
						format!("Delete task \"{}\"?", row.title),
						SelectKind::DeleteTask { task_id: row.id.clone() },
					));
				}
				None => app.status = "Select a task first".to_string(),
			},
			DayFocus::Goals => match view.goal_rows.get(app.goal_index) {
				Some(row) => {
					app.mode = InputMode::Select(build_confirm_select(
						format!("Delete goal \"{}\"?", row.title),
						SelectKind::DeleteGoal { goal_id: row.id.clone() },
					));
				}
				None => app.status = "Select a goal first".to_string(),
			},
		},
		KeyCode::Char('s') if app.view == ViewTab::Day => {
			app.sort_by_priority = !app.sort_by_priority;
			app.status = if app.sort_by_priority {
				"Showing tasks by priority".to_string()
			} else {
				"Showing tasks in manual order".to_string()
			};
		}
		KeyCode::Char(direction @ ('K' | 'J')) if app.view == ViewTab::Day => {
			let delta = if direction == 'K' { -1 } else { 1 };
			app.status = match move_selected_task(app, session, entries, view, delta) {
				Ok(message) => message,
				Err(err) => format!("error: {err}"),
			};
		}
		KeyCode::Char('r') if app.view == ViewTab::Archive => {
			app.archive_query.date_range = app.archive_query.date_range.next();
			app.archive_index = 0;
		}
		KeyCode::Char('f') if app.view == ViewTab::Archive => {
			app.archive_query.status = app.archive_query.status.next();
			app.archive_index = 0;
		}
		KeyCode::Char('/') if app.view == ViewTab::Archive => {
			let mut prompt = PromptState::new("Search tasks, goals and notes", PromptKind::Search);
			prompt.input = app.archive_query.search_text.clone();
			app.mode = InputMode::Prompt(prompt);
		}
		KeyCode::Char('c') if app.view == ViewTab::Archive => {
			app.archive_query = ArchiveQuery::default();
			app.archive_index = 0;
			app.status = "Filters cleared".to_string();
		}
		KeyCode::Char('E') if app.view == ViewTab::Archive => {
			app.status = match export_archive(session, entries, &app.archive_query, view.today) {
				Ok(message) => message,
				Err(err) => format!("error: {err}"),
			};
		}
		KeyCode::Char('b') => {
			app.status = match session.store.snapshot(DEFAULT_BACKUP_PREFIX) {
				Ok(report) => format!("backup written: {}", report.path.display()),
				Err(err) => format!("error: {err}"),
			};
		}
		KeyCode::Char('T') => {
			let previous = settings.theme;
			settings.theme = settings.theme.next();
			app.status = save_settings(session, settings, format!("theme: {:?}", settings.theme).to_lowercase());
			if app.status.starts_with("error") {
				settings.theme = previous;
			}
		}
		KeyCode::Char('w') => {
			let previous = settings.week_start_day;
			settings.week_start_day = match settings.week_start_day {
				WeekStart::Sunday => WeekStart::Monday,
				WeekStart::Monday => WeekStart::Sunday,
			};
			app.status = save_settings(
				session,
				settings,
				format!("weeks start on {:?}", settings.week_start_day).to_lowercase(),
			);
			if app.status.starts_with("error") {
				settings.week_start_day = previous;
			}
		}
		_ => {}
	}

	false
}

fn handle_prompt_key(app: &mut App, code: KeyCode, session: &Session, entries: &mut EntryMap) -> bool {
	match code {
		KeyCode::Esc => {
			app.mode = InputMode::Normal;
			app.status = "Input cancelled".to_string();
		}
		KeyCode::Backspace => {
			if let InputMode::Prompt(prompt) = &mut app.mode {
				prompt.input.pop();
			}
		}
		KeyCode::Char(value) => {
			if let InputMode::Prompt(prompt) = &mut app.mode {
				prompt.input.push(value);
			}
		}
		KeyCode::Enter => {
			let prompt = match std::mem::replace(&mut app.mode, InputMode::Normal) {
				InputMode::Prompt(prompt) => prompt,
				InputMode::Normal | InputMode::Select(_) => return false,
			};

			match submit_prompt(app, prompt.clone(), session, entries) {
				Ok(PromptOutcome::Select(select)) => app.mode = InputMode::Select(select),
				Ok(PromptOutcome::Done(message)) => {
					app.mode = InputMode::Normal;
					app.status = message;
				}
				Err(err) => {
					app.mode = InputMode::Prompt(prompt);
					app.status = format!("error: {err}");
				}
			}
		}
		_ => {}
	}

	false
}

fn handle_select_key(app: &mut App, code: KeyCode, session: &Session, entries: &mut EntryMap) -> bool {
	match code {
		KeyCode::Esc => {
			app.mode = InputMode::Normal;
			app.status = "Selection cancelled".to_string();
		}
		KeyCode::Up | KeyCode::Char('k') => {
			if let InputMode::Select(select) = &mut app.mode {
				select.move_selection(-1);
			}
		}
		KeyCode::Down | KeyCode::Char('j') => {
			if let InputMode::Select(select) = &mut app.mode {
				select.move_selection(1);
			}
		}
		KeyCode::Enter => {
			let select = match std::mem::replace(&mut app.mode, InputMode::Normal) {
				InputMode::Select(select) => select,
				_ => return false,
			};

			match submit_select(app.selected_day, select.clone(), session, entries) {
				Ok(message) => app.status = message,
				Err(err) => {
					app.mode = InputMode::Select(select);
					app.status = format!("error: {err}");
				}
			}
		}
		_ => {}
	}

	false
}

fn submit_prompt(
	app: &mut App,
	prompt: PromptState,
	session: &Session,
	entries: &mut EntryMap,
) -> Result<PromptOutcome, String> {
	let day = app.selected_day;
	match prompt.kind {
		PromptKind::AddTaskTitle => {
			let title = prompt.input.trim();
			if title.is_empty() {
				return Err("task title is required".to_string());
			}
			Ok(PromptOutcome::Select(build_priority_select(title.to_string())))
		}
		PromptKind::AddGoal => {
			edit_day(session, entries, day, |entry| entry.add_goal(&prompt.input, Utc::now()))?;
			Ok(PromptOutcome::Done(format!("added goal for {}", day.format("%Y-%m-%d"))))
		}
		PromptKind::AppendNote => {
			let line = prompt.input.trim_end().to_string();
			if line.is_empty() {
				return Err("note text is required".to_string());
			}
			edit_day(session, entries, day, |entry| {
				let notes = if entry.notes.is_empty() {
					line
				} else {
					format!("{}\n{line}", entry.notes.trim_end())
				};
				entry.set_notes(notes);
				Ok(())
			})?;
			Ok(PromptOutcome::Done("notes saved".to_string()))
		}
		PromptKind::RenameTask { task_id } => {
			edit_day(session, entries, day, |entry| entry.rename_task(&task_id, &prompt.input))?;
			Ok(PromptOutcome::Done("task renamed".to_string()))
		}
		PromptKind::Search => {
			app.archive_query.search_text = prompt.input.trim().to_string();
			app.archive_index = 0;
			Ok(PromptOutcome::Done("search updated".to_string()))
		}
	}
}

fn submit_select(
	day: NaiveDate,
	select: SelectState,
	session: &Session,
	entries: &mut EntryMap,
) -> Result<String, String> {
	let selected_value = select
		.selected_option()
		.map(|option| option.value.clone())
		.ok_or_else(|| "no option selected".to_string())?;

	match select.kind {
		SelectKind::TaskPriority { title } => {
			let priority = match selected_value.as_str() {
				"high" => Priority::High,
				"low" => Priority::Low,
				_ => Priority::Medium,
			};
			edit_day(session, entries, day, |entry| entry.add_task(&title, priority, Utc::now()))?;
			Ok(format!("added task: {title}"))
		}
		_ if selected_value != "confirm" => Ok("Cancelled".to_string()),
		SelectKind::DeleteTask { task_id } => {
			let task = edit_day(session, entries, day, |entry| entry.remove_task(&task_id))?;
			Ok(format!("deleted task: {}", task.title))
		}
		SelectKind::DeleteGoal { goal_id } => {
			let goal = edit_day(session, entries, day, |entry| entry.remove_goal(&goal_id))?;
			Ok(format!("deleted goal: {}", goal.title))
		}
		SelectKind::ClearNotes => {
			edit_day(session, entries, day, |entry| {
				entry.set_notes(String::new());
				Ok(())
			})?;
			Ok("notes cleared".to_string())
		}
	}
}

fn build_priority_select(title: String) -> SelectState {
	let options = [Priority::High, Priority::Medium, Priority::Low]
		.into_iter()
		.map(|priority| SelectOption::new(priority.label(), priority.label().to_string(), priority_style(priority)))
		.collect::<Vec<_>>();
	let mut select = SelectState::new("Task priority", SelectKind::TaskPriority { title }, options);
	select.selected = 1;
	select
}

fn build_confirm_select(title: impl Into<String>, kind: SelectKind) -> SelectState {
	let options = vec![
		SelectOption::new(
			"Confirm",
			"confirm".to_string(),
			Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD),
		),
		SelectOption::new("Cancel", "cancel".to_string(), Style::default()),
	];

	let mut select = SelectState::new(title, kind, options);
	// Default to cancel to prevent accidental deletions.
	select.selected = 1;
	select
}

fn toggle_selected(app: &App, session: &Session, entries: &mut EntryMap, view: &ViewModel) -> Result<String, String> {
	match app.day_focus {
		DayFocus::Tasks => {
			let row = app.selected_task(view).ok_or_else(|| "no task selected".to_string())?;
			let done = edit_day(session, entries, app.selected_day, |entry| entry.toggle_task(&row.id))?;
			Ok(format!("{}: {}", if done { "done" } else { "reopened" }, row.title))
		}
		DayFocus::Goals => {
			let row = view
				.goal_rows
				.get(app.goal_index)
				.ok_or_else(|| "no goal selected".to_string())?;
			let done = edit_day(session, entries, app.selected_day, |entry| entry.toggle_goal(&row.id))?;
			Ok(format!("{}: {}", if done { "achieved" } else { "reopened" }, row.title))
		}
	}
}

fn cycle_selected_priority(
	app: &App,
	session: &Session,
	entries: &mut EntryMap,
	view: &ViewModel,
) -> Result<String, String> {
	let row = app.selected_task(view).ok_or_else(|| "no task selected".to_string())?;
	let priority = row.priority.next();
	edit_day(session, entries, app.selected_day, |entry| entry.set_task_priority(&row.id, priority))?;
	Ok(format!("{}: priority {}", row.title, priority.label()))
}

fn move_selected_task(
	app: &mut App,
	session: &Session,
	entries: &mut EntryMap,
	view: &ViewModel,
	delta: i64,
) -> Result<String, String> {
	if app.sort_by_priority {
		return Err("switch to manual order (s) to move tasks".to_string());
	}
	let row = app.selected_task(view).ok_or_else(|| "no task selected".to_string())?;
	let target = app.task_index as i64 + delta;
	if target < 0 || target as usize >= view.task_rows.len() {
		return Ok("already at the edge".to_string());
	}

	let (from, to) = (app.task_index, target as usize);
	edit_day(session, entries, app.selected_day, |entry| entry.move_task(from, to))?;
	app.task_index = to;
	Ok(format!("moved: {}", row.title))
}

fn export_archive(
	session: &Session,
	entries: &EntryMap,
	query: &ArchiveQuery,
	today: NaiveDate,
) -> Result<String, String> {
	let now = Utc::now();
	let results = filter(entries, query, today);
	let export = ArchiveExport::new(&results, corpus_stats(entries, today), query, now);
	let path = session
		.data_dir
		.join(EXPORTS_SUBDIR)
		.join(format!("archive-export-{}.json", now.timestamp_millis()));
	write_json_file(&path, &export).map_err(|err| err.to_string())?;
	info!(
		"event=archive_export module=ui status=ok entries={} path={}",
		results.len(),
		path.display()
	);
	Ok(format!("exported {} entries to {}", results.len(), path.display()))
}

/// Applies `edit` to a copy of the day, then commits the whole map. If the
/// edit or the write fails the map is left as it was.
fn edit_day<T>(
	session: &Session,
	entries: &mut EntryMap,
	day: NaiveDate,
	edit: impl FnOnce(&mut DailyEntry) -> Result<T, String>,
) -> Result<T, String> {
	let mut entry = entries.get(&day).cloned().unwrap_or_default();
	let value = edit(&mut entry)?;
	let previous = entries.insert(day, entry);
	if let Err(err) = persist(session, entries) {
		match previous {
			Some(previous) => entries.insert(day, previous),
			None => entries.remove(&day),
		};
		return Err(err);
	}
	Ok(value)
}

fn persist(session: &Session, entries: &EntryMap) -> Result<(), String> {
	session.store.replace_all(entries).map_err(|err| {
		warn!("event=entries_write module=ui status=error error={err}");
		err.to_string()
	})
}

fn save_settings(session: &Session, settings: &Settings, message: String) -> String {
	match session.store.save_settings(settings) {
		Ok(()) => message,
		Err(err) => format!("error: {err}"),
	}
}

fn build_view(app: &App, entries: &EntryMap, settings: &Settings, today: NaiveDate) -> ViewModel {
	let day = app.selected_day;
	let entry = entries.get(&day).cloned().unwrap_or_default();

	let tasks = if app.sort_by_priority {
		display_order(&entry.tasks)
	} else {
		entry.tasks.iter().collect()
	};
	let task_rows = tasks
		.into_iter()
		.map(|task| TaskRow {
			id: task.id.clone(),
			title: task.title.clone(),
			completed: task.completed,
			priority: task.priority,
			created_at: task.created_at,
		})
		.collect();
	let goal_rows = entry
		.goals
		.iter()
		.map(|goal| GoalRow {
			id: goal.id.clone(),
			title: goal.title.clone(),
			completed: goal.completed,
		})
		.collect();

	let week_days = week_dates(day, settings.week_start_day);
	let week = day_summaries(entries, &week_days);
	let week_levels = week_days.iter().map(|date| activity_level(entries.get(date))).collect();
	let week_stats = range_stats(entries, week_days[0], week_days[6]);

	let month_first = first_day_of_month(day);
	let month_cells = annotated_month(day.year(), day.month(), entries).unwrap_or_default();
	let month_last = shift_month(month_first, 1) - Duration::days(1);
	let month_stats = range_stats(entries, month_first, month_last);

	let year = year_months(day.year())
		.into_iter()
		.map(|descriptor| {
			let cells = annotated_month(day.year(), descriptor.first.month(), entries).unwrap_or_default();
			(descriptor, cells)
		})
		.collect::<Vec<_>>();
	let year_stats = match (year.first(), year.last()) {
		(Some((first, _)), Some((last, _))) => {
			range_stats(entries, first.first, shift_month(last.first, 1) - Duration::days(1))
		}
		_ => RangeStats::default(),
	};

	let archive_rows = filter(entries, &app.archive_query, today)
		.into_iter()
		.map(|(date, entry)| ArchiveRow {
			date,
			progress: progress(&entry.tasks),
			total_tasks: entry.tasks.len(),
			completed_tasks: entry.completed_tasks(),
			goals: entry.goals.len(),
			preview: note_preview(&entry.notes),
		})
		.collect();

	let day_summary = day_summaries(entries, &[day]).pop().unwrap_or(DaySummary {
		date: day,
		total_tasks: 0,
		completed_tasks: 0,
		progress: 0,
		goals: 0,
		has_notes: false,
	});

	ViewModel {
		today,
		stats: corpus_stats(entries, today),
		day: day_summary,
		task_rows,
		goal_rows,
		notes: entry.notes,
		week,
		week_levels,
		week_stats,
		month_cells,
		month_stats,
		year,
		year_stats,
		archive_rows,
	}
}

fn note_preview(notes: &str) -> String {
	let first_line = notes.lines().find(|line| !line.trim().is_empty()).unwrap_or("").trim();
	let mut preview = first_line.chars().take(NOTE_PREVIEW_CHARS).collect::<String>();
	if first_line.chars().count() > NOTE_PREVIEW_CHARS {
		preview.push_str("...");
	}
	preview
}

fn level_style(level: u8) -> Style {
	match level {
		0 => Style::default(),
		1 => Style::default().fg(Color::Black).bg(Color::Rgb(155, 233, 168)),
		2 => Style::default().fg(Color::Black).bg(Color::Rgb(64, 196, 99)),
		_ => Style::default().fg(Color::White).bg(Color::Rgb(33, 110, 57)).add_modifier(Modifier::BOLD),
	}
}

fn priority_style(priority: Priority) -> Style {
	match priority {
		Priority::High => Style::default().fg(Color::LightRed),
		Priority::Medium => Style::default().fg(Color::Yellow),
		Priority::Low => Style::default().fg(Color::Green),
	}
}

fn border_style(focused: bool, palette: &Palette) -> Style {
	if focused {
		Style::default().fg(palette.accent).add_modifier(Modifier::BOLD)
	} else {
		Style::default().fg(Color::DarkGray)
	}
}

struct Palette {
	accent: Color,
	highlight: Color,
}

impl Palette {
	fn for_theme(theme: Theme) -> Self {
		match theme {
			Theme::Light => Self {
				accent: Color::Blue,
				highlight: Color::Rgb(214, 222, 235),
			},
			Theme::Dark | Theme::System => Self {
				accent: Color::Yellow,
				highlight: Color::Rgb(42, 45, 52),
			},
		}
	}
}

#[derive(Debug, Clone)]
enum PromptOutcome {
	Select(SelectState),
	Done(String),
}

#[derive(Debug, Clone)]
struct PromptState {
	title: String,
	input: String,
	kind: PromptKind,
}

impl PromptState {
	fn new(title: impl Into<String>, kind: PromptKind) -> Self {
		Self {
			title: title.into(),
			input: String::new(),
			kind,
		}
	}
}

#[derive(Debug, Clone)]
struct SelectState {
	title: String,
	options: Vec<SelectOption>,
	selected: usize,
	kind: SelectKind,
}

impl SelectState {
	fn new(title: impl Into<String>, kind: SelectKind, options: Vec<SelectOption>) -> Self {
		Self {
			title: title.into(),
			options,
			selected: 0,
			kind,
		}
	}

	fn move_selection(&mut self, delta: i32) {
		if self.options.is_empty() {
			self.selected = 0;
			return;
		}

		if delta > 0 {
			self.selected = (self.selected + delta as usize).min(self.options.len() - 1);
		} else {
			self.selected = self.selected.saturating_sub(delta.unsigned_abs() as usize);
		}
	}

	fn selected_option(&self) -> Option<&SelectOption> {
		self.options.get(self.selected)
	}
}

#[derive(Debug, Clone)]
struct SelectOption {
	label: String,
	value: String,
	style: Style,
}

impl SelectOption {
	fn new(label: impl Into<String>, value: String, style: Style) -> Self {
		Self {
			label: label.into(),
			value,
			style,
		}
	}
}

#[derive(Debug, Clone)]
enum PromptKind {
	AddTaskTitle,
	AddGoal,
	AppendNote,
	RenameTask { task_id: String },
	Search,
}

#[derive(Debug, Clone)]
enum SelectKind {
	TaskPriority { title: String },
	DeleteTask { task_id: String },
	DeleteGoal { goal_id: String },
	ClearNotes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ViewTab {
	Day,
	Week,
	Month,
	Year,
	Archive,
}

impl ViewTab {
	const ALL: [ViewTab; 5] = [ViewTab::Day, ViewTab::Week, ViewTab::Month, ViewTab::Year, ViewTab::Archive];

	fn title(self) -> &'static str {
		match self {
			ViewTab::Day => "Day",
			ViewTab::Week => "Week",
			ViewTab::Month => "Month",
			ViewTab::Year => "Year",
			ViewTab::Archive => "Archive",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DayFocus {
	Tasks,
	Goals,
}

impl DayFocus {
	fn toggle(self) -> Self {
		match self {
			DayFocus::Tasks => DayFocus::Goals,
			DayFocus::Goals => DayFocus::Tasks,
		}
	}
}

#[derive(Debug, Clone)]
enum InputMode {
	Normal,
	Prompt(PromptState),
	Select(SelectState),
}

#[derive(Debug, Clone)]
struct App {
	view: ViewTab,
	selected_day: NaiveDate,
	day_focus: DayFocus,
	task_index: usize,
	goal_index: usize,
	sort_by_priority: bool,
	archive_query: ArchiveQuery,
	archive_index: usize,
	mode: InputMode,
	status: String,
}

impl Default for App {
	fn default() -> Self {
		Self {
			view: ViewTab::Day,
			selected_day: Local::now().date_naive(),
			day_focus: DayFocus::Tasks,
			task_index: 0,
			goal_index: 0,
			sort_by_priority: true,
			archive_query: ArchiveQuery::default(),
			archive_index: 0,
			mode: InputMode::Normal,
			status: "Ready".to_string(),
		}
	}
}

impl App {
	fn clamp_selection(&mut self, view: &ViewModel) {
		self.task_index = clamp_index(self.task_index, view.task_rows.len());
		self.goal_index = clamp_index(self.goal_index, view.goal_rows.len());
		self.archive_index = clamp_index(self.archive_index, view.archive_rows.len());
	}

	fn select_day(&mut self, day: NaiveDate) {
		self.selected_day = day;
		self.task_index = 0;
		self.goal_index = 0;
	}

	fn shift_selected_month(&mut self, delta_months: i32) {
		self.select_day(shift_month(self.selected_day, delta_months));
	}

	fn move_horizontal(&mut self, delta: i64) {
		match self.view {
			ViewTab::Day | ViewTab::Month => self.select_day(self.selected_day + Duration::days(delta)),
			ViewTab::Week => self.select_day(self.selected_day + Duration::days(7 * delta)),
			ViewTab::Year => self.shift_selected_month(delta as i32),
			ViewTab::Archive => {}
		}
	}

	fn move_vertical(&mut self, delta: i64, view: &ViewModel) {
		match self.view {
			ViewTab::Day => match self.day_focus {
				DayFocus::Tasks => self.task_index = step_index(self.task_index, delta, view.task_rows.len()),
				DayFocus::Goals => self.goal_index = step_index(self.goal_index, delta, view.goal_rows.len()),
			},
			ViewTab::Week => self.select_day(self.selected_day + Duration::days(delta)),
			ViewTab::Month => self.select_day(self.selected_day + Duration::days(7 * delta)),
			ViewTab::Year => self.shift_selected_month((delta * YEAR_GRID_COLUMNS as i64) as i32),
			ViewTab::Archive => {
				self.archive_index = step_index(self.archive_index, delta, view.archive_rows.len());
			}
		}
	}

	fn selected_task<'v>(&self, view: &'v ViewModel) -> Option<&'v TaskRow> {
		if self.day_focus != DayFocus::Tasks {
			return None;
		}
		view.task_rows.get(self.task_index)
	}

	fn view_hint(&self) -> String {
		match self.view {
			ViewTab::Day => {
				"Tab tasks/goals | space toggle | p priority | e rename | x delete | s sort | K/J move | N clear notes"
					.to_string()
			}
			ViewTab::Week => "j/k day | h/l week | Enter open day".to_string(),
			ViewTab::Month => "h/l day | j/k week | Enter open day".to_string(),
			ViewTab::Year => "h/l month | j/k row | Enter open day".to_string(),
			ViewTab::Archive => "r range | f status | / search | c clear | E export | Enter open day".to_string(),
		}
	}
}

fn clamp_index(index: usize, len: usize) -> usize {
	if len == 0 { 0 } else { index.min(len - 1) }
}

fn step_index(index: usize, delta: i64, len: usize) -> usize {
	if len == 0 {
		return 0;
	}
	if delta > 0 {
		(index + delta as usize).min(len - 1)
	} else {
		index.saturating_sub(delta.unsigned_abs() as usize)
	}
}

struct ViewModel {
	today: NaiveDate,
	stats: CorpusStats,
	day: DaySummary,
	task_rows: Vec<TaskRow>,
	goal_rows: Vec<GoalRow>,
	notes: String,
	week: Vec<DaySummary>,
	week_levels: Vec<u8>,
	week_stats: RangeStats,
	month_cells: Vec<MonthCell>,
	month_stats: RangeStats,
	year: Vec<(MonthDescriptor, Vec<MonthCell>)>,
	year_stats: RangeStats,
	archive_rows: Vec<ArchiveRow>,
}

#[derive(Clone)]
struct TaskRow {
	id: String,
	title: String,
	completed: bool,
	priority: Priority,
	created_at: DateTime<Utc>,
}

#[derive(Clone)]
struct GoalRow {
	id: String,
	title: String,
	completed: bool,
}

#[derive(Clone)]
struct ArchiveRow {
	date: NaiveDate,
	progress: u8,
	total_tasks: usize,
	completed_tasks: usize,
	goals: usize,
	preview: String,
}
