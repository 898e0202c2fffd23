use std::fmt::{Display, Formatter};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use clap::ValueEnum;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::domain::{DailyEntry, EntryMap, Settings};

pub const ENTRIES_TABLE: &str = "daily-entries";
pub const SETTINGS_TABLE: &str = "settings";
pub const DEFAULT_BACKUP_PREFIX: &str = "backup";

const TABLE_EXTENSION: &str = "json";
const DATA_SUBDIR: &str = "data";
const BACKUP_SUBDIR: &str = "backup";

#[derive(Debug)]
pub enum StorageError {
    Io(std::io::Error),
    JsonDecode(String, serde_json::Error),
    JsonEncode(serde_json::Error),
    InvalidImport(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Io(err) => write!(f, "io error: {err}"),
            StorageError::JsonDecode(name, err) => write!(f, "failed to parse table {name}: {err}"),
            StorageError::JsonEncode(err) => write!(f, "failed to encode JSON: {err}"),
            StorageError::InvalidImport(reason) => write!(f, "invalid import file: {reason}"),
        }
    }
}

impl std::error::Error for StorageError {}

/// A failed snapshot. `path` is set once the bundle location was chosen,
/// even if nothing (or only part of it) reached the disk.
#[derive(Debug)]
pub struct BackupError {
    pub path: Option<PathBuf>,
    pub source: StorageError,
}

impl Display for BackupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.path {
            Some(path) => write!(f, "backup to {} failed: {}", path.display(), self.source),
            None => write!(f, "backup failed: {}", self.source),
        }
    }
}

impl std::error::Error for BackupError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupReport {
    pub path: PathBuf,
    pub tables: Vec<String>,
}

/// Tables kept from the pre-journal layout. Nothing writes them any more,
/// but they are still listed and bundled by backups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LegacyTable {
    Tasks,
    Notes,
    Goals,
}

impl LegacyTable {
    pub fn name(self) -> &'static str {
        match self {
            LegacyTable::Tasks => "tasks",
            LegacyTable::Notes => "notes",
            LegacyTable::Goals => "goals",
        }
    }

    fn default_value(self) -> Value {
        match self {
            LegacyTable::Tasks | LegacyTable::Notes => json!([]),
            LegacyTable::Goals => json!({ "weekly": [], "monthly": [] }),
        }
    }
}

/// Byte-level persistence of named JSON tables.
pub trait TableStore {
    /// `Ok(None)` when the table does not exist yet.
    fn load_table(&self, name: &str) -> Result<Option<Value>, StorageError>;

    fn write_table(&self, name: &str, value: &Value) -> Result<(), StorageError>;

    fn list_data_files(&self) -> Result<Vec<String>, StorageError>;

    fn list_backups(&self) -> Result<Vec<String>, StorageError>;

    fn backup_path(&self, file_name: &str) -> PathBuf;

    fn write_backup(&self, path: &Path, value: &Value) -> Result<(), StorageError>;

    /// Missing and unreadable tables both come back as `None`.
    fn read_table(&self, name: &str) -> Option<Value> {
        match self.load_table(name) {
            Ok(value) => value,
            Err(err) => {
                warn!("event=table_read module=storage status=degraded table={name} error={err}");
                None
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileTableStore {
    data_dir: PathBuf,
    backup_dir: PathBuf,
}

impl FileTableStore {
    pub fn new(root: &Path) -> Self {
        Self {
            data_dir: root.join(DATA_SUBDIR),
            backup_dir: root.join(BACKUP_SUBDIR),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    fn table_path(&self, name: &str) -> PathBuf {
        self.data_dir.join(format!("{name}.{TABLE_EXTENSION}"))
    }
}

impl TableStore for FileTableStore {
    fn load_table(&self, name: &str) -> Result<Option<Value>, StorageError> {
        let raw = match fs::read_to_string(self.table_path(name)) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("event=table_read module=storage status=absent table={name}");
                return Ok(None);
            }
            Err(err) => return Err(StorageError::Io(err)),
        };

        if raw.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|err| StorageError::JsonDecode(name.to_string(), err))
    }

    fn write_table(&self, name: &str, value: &Value) -> Result<(), StorageError> {
        write_json_file(&self.table_path(name), value)
    }

    fn list_data_files(&self) -> Result<Vec<String>, StorageError> {
        list_json_stems(&self.data_dir)
    }

    fn list_backups(&self) -> Result<Vec<String>, StorageError> {
        list_json_stems(&self.backup_dir)
    }

    fn backup_path(&self, file_name: &str) -> PathBuf {
        self.backup_dir.join(file_name)
    }

    fn write_backup(&self, path: &Path, value: &Value) -> Result<(), StorageError> {
        write_json_file(path, value)
    }
}

/// The journal repository. Built once at startup and handed to whoever
/// needs to read or commit entries; it keeps no cache of its own.
#[derive(Debug, Clone)]
pub struct JournalStore<S = FileTableStore> {
    tables: S,
}

impl JournalStore<FileTableStore> {
    pub fn open(root: &Path) -> Self {
        Self::new(FileTableStore::new(root))
    }
}

impl<S: TableStore> JournalStore<S> {
    pub fn new(tables: S) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &S {
        &self.tables
    }

    pub fn get_all(&self) -> EntryMap {
        let Some(value) = self.tables.read_table(ENTRIES_TABLE) else {
            return EntryMap::new();
        };

        let Value::Object(rows) = value else {
            warn!("event=entries_decode module=storage status=degraded table={ENTRIES_TABLE} error=not an object");
            return EntryMap::new();
        };

        // Undecodable rows are skipped one by one; the rest still load.
        let mut entries = EntryMap::new();
        for (key, row) in rows {
            let date = match NaiveDate::parse_from_str(&key, "%Y-%m-%d") {
                Ok(date) => date,
                Err(err) => {
                    warn!("event=entry_decode module=storage status=skipped key={key} error={err}");
                    continue;
                }
            };
            match serde_json::from_value::<DailyEntry>(row) {
                Ok(entry) => {
                    entries.insert(date, entry);
                }
                Err(err) => {
                    warn!("event=entry_decode module=storage status=skipped key={key} error={err}");
                }
            }
        }
        entries
    }

    pub fn get(&self, date: NaiveDate) -> DailyEntry {
        self.get_all().remove(&date).unwrap_or_default()
    }

    /// Upserts one day and rewrites the whole table.
    pub fn put(&self, date: NaiveDate, entry: DailyEntry) -> Result<(), StorageError> {
        let mut entries = self.get_all();
        entries.insert(date, entry);
        self.replace_all(&entries)
    }

    pub fn replace_all(&self, entries: &EntryMap) -> Result<(), StorageError> {
        let value = serde_json::to_value(entries).map_err(StorageError::JsonEncode)?;
        self.tables.write_table(ENTRIES_TABLE, &value)?;
        debug!(
            "event=entries_write module=storage status=ok entries={}",
            entries.len()
        );
        Ok(())
    }

    pub fn load_settings(&self) -> Settings {
        let Some(value) = self.tables.read_table(SETTINGS_TABLE) else {
            return Settings::default();
        };

        serde_json::from_value(value).unwrap_or_else(|err| {
            warn!("event=settings_decode module=storage status=degraded error={err}");
            Settings::default()
        })
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<(), StorageError> {
        let value = serde_json::to_value(settings).map_err(StorageError::JsonEncode)?;
        self.tables.write_table(SETTINGS_TABLE, &value)
    }

    pub fn legacy_table(&self, table: LegacyTable) -> Value {
        self.tables
            .read_table(table.name())
            .unwrap_or_else(|| table.default_value())
    }

    pub fn snapshot(&self, name_prefix: &str) -> Result<BackupReport, BackupError> {
        self.snapshot_at(name_prefix, Utc::now())
    }

    /// Bundles every table currently in the data directory, keyed by table
    /// name, into `<prefix>-<timestamp>.json`. Tables are read one by one
    /// without locking, so a write racing the backup may land half in it.
    pub fn snapshot_at(&self, name_prefix: &str, now: DateTime<Utc>) -> Result<BackupReport, BackupError> {
        let names = self
            .tables
            .list_data_files()
            .map_err(|source| BackupError { path: None, source })?;

        let path = self.tables.backup_path(&backup_file_name(name_prefix, now));
        let mut bundle = serde_json::Map::new();
        for name in &names {
            match self.tables.load_table(name) {
                Ok(Some(value)) => {
                    bundle.insert(name.clone(), value);
                }
                Ok(None) => {
                    bundle.insert(name.clone(), Value::Null);
                }
                Err(source) => {
                    return Err(BackupError {
                        path: Some(path),
                        source,
                    });
                }
            }
        }

        if let Err(source) = self.tables.write_backup(&path, &Value::Object(bundle)) {
            return Err(BackupError {
                path: Some(path),
                source,
            });
        }

        info!(
            "event=backup_created module=storage status=ok path={} tables={}",
            path.display(),
            names.len()
        );
        Ok(BackupReport { path, tables: names })
    }

    pub fn has_backup_for(&self, day: NaiveDate) -> bool {
        let stamp = format!("{DEFAULT_BACKUP_PREFIX}-{}", day.format("%Y-%m-%d"));
        match self.tables.list_backups() {
            Ok(names) => names.iter().any(|name| name.starts_with(&stamp)),
            Err(err) => {
                warn!("event=backup_list module=storage status=error error={err}");
                false
            }
        }
    }

    /// One automatic snapshot per UTC day when the setting is on.
    pub fn auto_backup(&self, settings: &Settings, now: DateTime<Utc>) -> Result<Option<BackupReport>, BackupError> {
        if !settings.auto_backup || self.has_backup_for(now.date_naive()) {
            return Ok(None);
        }

        self.snapshot_at(DEFAULT_BACKUP_PREFIX, now).map(Some)
    }

    /// Replaces entries (and settings, when the file carries them) with the
    /// contents of an export bundle, a backup bundle or a bare entry map.
    pub fn import(&self, value: Value) -> Result<ImportSummary, StorageError> {
        let data = parse_import(value)?;
        // Settings first: if that write fails the entries are untouched.
        if let Some(settings) = &data.settings {
            self.save_settings(settings)?;
        }
        self.replace_all(&data.entries)?;

        info!(
            "event=import module=storage status=ok entries={} settings={}",
            data.entries.len(),
            data.settings.is_some()
        );
        Ok(ImportSummary {
            entries: data.entries.len(),
            settings: data.settings.is_some(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub entries: usize,
    pub settings: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub entries: EntryMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,
    pub export_date: DateTime<Utc>,
}

impl ExportBundle {
    pub fn new(entries: EntryMap, settings: Settings, now: DateTime<Utc>) -> Self {
        Self {
            entries,
            settings: Some(settings),
            export_date: now,
        }
    }
}

struct ImportData {
    entries: EntryMap,
    settings: Option<Settings>,
}

fn parse_import(value: Value) -> Result<ImportData, StorageError> {
    let Value::Object(mut object) = value else {
        return Err(StorageError::InvalidImport("expected a JSON object".to_string()));
    };

    let decode_entries = |value: Value| -> Result<EntryMap, StorageError> {
        serde_json::from_value(value).map_err(|err| StorageError::JsonDecode(ENTRIES_TABLE.to_string(), err))
    };
    let decode_settings = |value: Value| -> Result<Option<Settings>, StorageError> {
        if value.is_null() {
            return Ok(None);
        }
        serde_json::from_value(value)
            .map(Some)
            .map_err(|err| StorageError::JsonDecode(SETTINGS_TABLE.to_string(), err))
    };

    if let Some(entries) = object.remove("entries") {
        let settings = object.remove("settings").map(decode_settings).transpose()?.flatten();
        return Ok(ImportData {
            entries: decode_entries(entries)?,
            settings,
        });
    }

    if let Some(entries) = object.remove(ENTRIES_TABLE) {
        let settings = object
            .remove(SETTINGS_TABLE)
            .map(decode_settings)
            .transpose()?
            .flatten();
        return Ok(ImportData {
            entries: decode_entries(entries)?,
            settings,
        });
    }

    Ok(ImportData {
        entries: decode_entries(Value::Object(object))?,
        settings: None,
    })
}

pub fn backup_file_name(prefix: &str, now: DateTime<Utc>) -> String {
    format!("{prefix}-{}.{TABLE_EXTENSION}", now.format("%Y-%m-%dT%H-%M-%S"))
}

pub fn read_json_file(path: &Path) -> Result<Value, StorageError> {
    let raw = fs::read_to_string(path).map_err(StorageError::Io)?;
    serde_json::from_str(&raw).map_err(|err| StorageError::JsonDecode(path.display().to_string(), err))
}

pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(StorageError::Io)?;
        }
    }

    let encoded = serde_json::to_string_pretty(value).map_err(StorageError::JsonEncode)?;
    fs::write(path, encoded).map_err(StorageError::Io)
}

fn list_json_stems(dir: &Path) -> Result<Vec<String>, StorageError> {
    let read_dir = match fs::read_dir(dir) {
        Ok(read_dir) => read_dir,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(StorageError::Io(err)),
    };

    let mut names = Vec::new();
    for item in read_dir {
        let path = item.map_err(StorageError::Io)?.path();
        if !path.is_file() || path.extension().is_none_or(|ext| ext != TABLE_EXTENSION) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
            names.push(stem.to_string());
        }
    }

    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use chrono::{NaiveDate, TimeZone, Utc};
    use serde_json::json;
    use tempfile::TempDir;

    use crate::domain::{DailyEntry, EntryMap, Priority, Settings, WeekStart};

    use super::{
        ExportBundle, JournalStore, LegacyTable, TableStore, backup_file_name, read_json_file,
    };

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn entry_with_task(title: &str) -> DailyEntry {
        let mut entry = DailyEntry::default();
        entry
            .add_task(title, Priority::Medium, Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap())
            .expect("task should be created");
        entry
    }

    #[test]
    fn missing_tables_fall_back_to_defaults() {
        let dir = TempDir::new().expect("temp dir");
        let store = JournalStore::open(dir.path());
        assert!(store.get_all().is_empty());
        assert_eq!(store.load_settings(), Settings::default());
        assert_eq!(store.legacy_table(LegacyTable::Tasks), json!([]));
        assert_eq!(
            store.legacy_table(LegacyTable::Goals),
            json!({ "weekly": [], "monthly": [] })
        );
        assert!(store.get(day(2024, 1, 1)).tasks.is_empty());
    }

    #[test]
    fn corrupt_tables_are_treated_as_absent() {
        let dir = TempDir::new().expect("temp dir");
        let store = JournalStore::open(dir.path());
        fs::create_dir_all(store.tables().data_dir()).expect("data dir");
        fs::write(store.tables().data_dir().join("daily-entries.json"), "{not json").expect("write");
        fs::write(store.tables().data_dir().join("settings.json"), "[1, 2").expect("write");

        assert!(store.get_all().is_empty());
        assert_eq!(store.load_settings(), Settings::default());
    }

    #[test]
    fn one_bad_day_does_not_hide_the_others() {
        let dir = TempDir::new().expect("temp dir");
        let store = JournalStore::open(dir.path());
        fs::create_dir_all(store.tables().data_dir()).expect("data dir");
        let table = json!({
            "2024-01-01": { "tasks": [], "goals": [], "notes": "precious" },
            "2024-01-02": {
                "tasks": [{ "id": "t1", "title": "x", "priority": "urgent" }],
                "goals": [],
                "notes": ""
            },
            "not-a-date": { "tasks": [], "goals": [], "notes": "lost" }
        });
        fs::write(
            store.tables().data_dir().join("daily-entries.json"),
            table.to_string(),
        )
        .expect("write");

        let entries = store.get_all();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[&day(2024, 1, 1)].notes, "precious");

        store.put(day(2024, 1, 3), DailyEntry::default()).expect("put");
        let after = store.get_all();
        assert_eq!(after.len(), 2);
        assert_eq!(after[&day(2024, 1, 1)].notes, "precious");
    }

    #[test]
    fn put_rewrites_the_whole_table() {
        let dir = TempDir::new().expect("temp dir");
        let store = JournalStore::open(dir.path());
        store.put(day(2024, 1, 1), entry_with_task("first")).expect("put");
        store.put(day(2024, 1, 2), entry_with_task("second")).expect("put");

        let raw = read_json_file(&store.tables().data_dir().join("daily-entries.json")).expect("read");
        let keys = raw
            .as_object()
            .expect("object")
            .keys()
            .cloned()
            .collect::<Vec<_>>();
        assert_eq!(keys, ["2024-01-01", "2024-01-02"]);
        assert_eq!(store.get(day(2024, 1, 2)).tasks[0].title, "second");
    }

    #[test]
    fn replace_all_of_get_all_is_idempotent() {
        let dir = TempDir::new().expect("temp dir");
        let store = JournalStore::open(dir.path());
        let mut first = entry_with_task("Call mom");
        first.set_notes("Buy milk");
        store.put(day(2024, 1, 1), first).expect("put");
        store.put(day(2024, 1, 5), DailyEntry::default()).expect("put");

        let before = store.get_all();
        store.replace_all(&before).expect("replace");
        assert_eq!(store.get_all(), before);
    }

    #[test]
    fn settings_round_trip_wholesale() {
        let dir = TempDir::new().expect("temp dir");
        let store = JournalStore::open(dir.path());
        let mut settings = store.load_settings();
        settings.week_start_day = WeekStart::Sunday;
        settings.auto_backup = false;
        store.save_settings(&settings).expect("save");
        assert_eq!(store.load_settings(), settings);
    }

    #[test]
    fn backup_contains_exactly_the_listed_tables() {
        let dir = TempDir::new().expect("temp dir");
        let store = JournalStore::open(dir.path());
        store.put(day(2024, 1, 1), entry_with_task("first")).expect("put");
        store.save_settings(&Settings::default()).expect("save");

        let now = Utc.with_ymd_and_hms(2024, 1, 10, 12, 34, 56).unwrap();
        let report = store.snapshot_at("backup", now).expect("backup");
        assert_eq!(report.tables, ["daily-entries", "settings"]);
        assert!(report.path.ends_with("backup-2024-01-10T12-34-56.json"));

        let bundle = read_json_file(&report.path).expect("bundle");
        let keys = bundle
            .as_object()
            .expect("object")
            .keys()
            .cloned()
            .collect::<Vec<_>>();
        assert_eq!(keys, ["daily-entries", "settings"]);
        assert_eq!(bundle["settings"]["weekStartDay"], "monday");
        assert_eq!(store.tables().list_data_files().expect("list").len(), 2);
    }

    #[test]
    fn backup_of_corrupt_table_reports_the_bundle_path() {
        let dir = TempDir::new().expect("temp dir");
        let store = JournalStore::open(dir.path());
        fs::create_dir_all(store.tables().data_dir()).expect("data dir");
        fs::write(store.tables().data_dir().join("notes.json"), "{oops").expect("write");

        let err = store.snapshot("backup").expect_err("corrupt table should fail the backup");
        assert!(err.path.is_some());
        assert!(err.to_string().contains("notes"));
    }

    #[test]
    fn auto_backup_runs_once_per_day() {
        let dir = TempDir::new().expect("temp dir");
        let store = JournalStore::open(dir.path());
        store.put(day(2024, 1, 1), entry_with_task("first")).expect("put");
        let settings = Settings::default();
        let morning = Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap();
        let evening = Utc.with_ymd_and_hms(2024, 1, 10, 20, 0, 0).unwrap();

        assert!(store.auto_backup(&settings, morning).expect("backup").is_some());
        assert!(store.auto_backup(&settings, evening).expect("backup").is_none());

        let disabled = Settings {
            auto_backup: false,
            ..Settings::default()
        };
        let next_day = Utc.with_ymd_and_hms(2024, 1, 11, 8, 0, 0).unwrap();
        assert!(store.auto_backup(&disabled, next_day).expect("backup").is_none());
    }

    #[test]
    fn import_accepts_export_backup_and_bare_maps() {
        let dir = TempDir::new().expect("temp dir");
        let store = JournalStore::open(dir.path());
        let mut entries = EntryMap::new();
        entries.insert(day(2024, 1, 8), entry_with_task("exported"));
        let settings = Settings {
            week_start_day: WeekStart::Sunday,
            ..Settings::default()
        };
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();

        let bundle = serde_json::to_value(ExportBundle::new(entries.clone(), settings.clone(), now))
            .expect("encode");
        let summary = store.import(bundle).expect("import export bundle");
        assert_eq!(summary.entries, 1);
        assert!(summary.settings);
        assert_eq!(store.get_all(), entries);
        assert_eq!(store.load_settings().week_start_day, WeekStart::Sunday);

        let report = store.snapshot_at("backup", now).expect("backup");
        store.replace_all(&EntryMap::new()).expect("clear");
        store
            .import(read_json_file(&report.path).expect("bundle"))
            .expect("import backup bundle");
        assert_eq!(store.get_all(), entries);

        let bare = json!({ "2024-02-01": { "tasks": [], "goals": [], "notes": "plain" } });
        let summary = store.import(bare).expect("import bare map");
        assert!(!summary.settings);
        assert_eq!(store.get(day(2024, 2, 1)).notes, "plain");

        assert!(store.import(json!([1, 2, 3])).is_err());
    }

    #[test]
    fn failed_settings_write_leaves_entries_untouched() {
        let dir = TempDir::new().expect("temp dir");
        let store = JournalStore::open(dir.path());
        store.put(day(2024, 1, 1), entry_with_task("kept")).expect("put");
        // A directory where the settings file should be makes its write fail.
        fs::create_dir_all(store.tables().data_dir().join("settings.json")).expect("blocker");

        let mut incoming = EntryMap::new();
        incoming.insert(day(2024, 5, 5), entry_with_task("incoming"));
        let now = Utc.with_ymd_and_hms(2024, 5, 5, 0, 0, 0).unwrap();
        let bundle = serde_json::to_value(ExportBundle::new(incoming, Settings::default(), now))
            .expect("encode");

        assert!(store.import(bundle).is_err());
        let entries = store.get_all();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[&day(2024, 1, 1)].tasks[0].title, "kept");
    }

    #[test]
    fn backup_file_names_replace_colons() {
        let now = Utc.with_ymd_and_hms(2024, 3, 4, 5, 6, 7).unwrap();
        assert_eq!(backup_file_name("manual", now), "manual-2024-03-04T05-06-07.json");
    }
}
