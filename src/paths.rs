use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

const APP_DIR_NAME: &str = "daybook";
const DATA_DIR_ENV: &str = "DAYBOOK_DATA_DIR";

pub fn resolve_data_dir(cli_path: Option<PathBuf>) -> PathBuf {
	if let Some(path) = cli_path {
		return absolutize(path);
	}

	if let Some(path) = non_empty_env(DATA_DIR_ENV) {
		return absolutize(PathBuf::from(path));
	}

	default_data_dir()
}

fn default_data_dir() -> PathBuf {
	#[cfg(target_os = "windows")]
	{
		if let Some(path) = non_empty_env("APPDATA") {
			return PathBuf::from(path).join(APP_DIR_NAME);
		}
	}

	if let Some(path) = non_empty_env("XDG_DATA_HOME") {
		return PathBuf::from(path).join(APP_DIR_NAME);
	}

	if let Some(path) = non_empty_env("HOME") {
		return PathBuf::from(path)
			.join(".local")
			.join("share")
			.join(APP_DIR_NAME);
	}

	absolutize(PathBuf::from(format!(".{APP_DIR_NAME}")))
}

fn non_empty_env(key: &str) -> Option<OsString> {
	env::var_os(key).filter(|value| !value.is_empty())
}

fn absolutize(path: PathBuf) -> PathBuf {
	let path = if path.is_absolute() {
		path
	} else if let Ok(cwd) = env::current_dir() {
		cwd.join(path)
	} else {
		path
	};

	if path.exists() {
		fs::canonicalize(&path).unwrap_or(path)
	} else {
		path
	}
}

#[cfg(test)]
mod tests {
	use std::path::PathBuf;

	use tempfile::TempDir;

	use super::resolve_data_dir;

	#[test]
	fn cli_flag_wins_and_is_made_absolute() {
		let dir = TempDir::new().expect("temp dir");
		let resolved = resolve_data_dir(Some(dir.path().to_path_buf()));
		assert!(resolved.is_absolute());
		assert_eq!(
			resolved,
			dir.path().canonicalize().expect("canonical temp dir")
		);

		let relative = resolve_data_dir(Some(PathBuf::from("journal-data-that-does-not-exist")));
		assert!(relative.is_absolute());
		assert!(relative.ends_with("journal-data-that-does-not-exist"));
	}
}
