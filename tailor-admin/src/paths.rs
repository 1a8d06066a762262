//! Platform-specific directory paths.
//!
//! Uses XDG on Linux, standard locations on macOS/Windows.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

const QUALIFIER: &str = "com";
const ORGANIZATION: &str = "tailor";
const APPLICATION: &str = "tailor-admin";

/// Get project directories, or None if home directory cannot be determined.
fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Get the data directory for persistent application data.
///
/// - Linux: `$XDG_DATA_HOME/tailor-admin` or `~/.local/share/tailor-admin`
/// - macOS: `~/Library/Application Support/com.tailor.tailor-admin`
/// - Windows: `C:\Users\<User>\AppData\Roaming\tailor\tailor-admin\data`
pub fn data_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}

/// Get the cache directory for logs.
///
/// - Linux: `$XDG_CACHE_HOME/tailor-admin` or `~/.cache/tailor-admin`
/// - macOS: `~/Library/Caches/com.tailor.tailor-admin`
/// - Windows: `C:\Users\<User>\AppData\Local\tailor\tailor-admin\cache`
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Get the path to the settings database.
pub fn settings_db() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("settings.db"))
}

/// Get the path to the latest log file.
pub fn log_file() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join(LATEST_LOG))
}

const LATEST_LOG: &str = "latest.log";

/// Maximum number of old log files to keep.
const MAX_OLD_LOGS: usize = 25;

/// Rotate logs: rename latest.log to a timestamped name, clean up old logs.
///
/// Call this at startup before creating the new log file.
pub fn rotate_logs() {
    let Some(cache) = cache_dir() else { return };
    let latest = cache.join(LATEST_LOG);

    if latest.exists() {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let archived = cache.join(format!("{}.log", timestamp));
        let _ = fs::rename(&latest, &archived);
    }

    cleanup_old_logs(&cache, MAX_OLD_LOGS);
}

/// Remove old log files, keeping only the most recent `keep`.
fn cleanup_old_logs(dir: &Path, keep: usize) {
    let Ok(entries) = fs::read_dir(dir) else { return };

    let mut logs: Vec<_> = entries
        .filter_map(|e| e.ok())
        .filter(|e| {
            let name = e.file_name();
            let name = name.to_string_lossy();
            name.ends_with(".log") && name != LATEST_LOG
        })
        .collect();

    // Oldest first
    logs.sort_by_key(|e| e.metadata().and_then(|m| m.modified()).ok());

    if logs.len() > keep {
        for entry in logs.iter().take(logs.len() - keep) {
            let _ = fs::remove_file(entry.path());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("tailor-logs-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn count_logs(dir: &Path) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".log"))
            .count()
    }

    #[test]
    fn test_cleanup_keeps_limit_and_latest() {
        let dir = scratch_dir();
        for i in 0..8 {
            fs::write(dir.join(format!("2024010{}_000000.log", i)), "old").unwrap();
        }
        fs::write(dir.join(LATEST_LOG), "current").unwrap();
        fs::write(dir.join("notes.txt"), "keep").unwrap();

        cleanup_old_logs(&dir, 3);

        assert_eq!(count_logs(&dir), 4);
        assert!(dir.join(LATEST_LOG).exists());
        assert!(dir.join("notes.txt").exists());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_cleanup_missing_dir_is_noop() {
        let dir = std::env::temp_dir().join(format!("tailor-missing-{}", uuid::Uuid::new_v4()));
        cleanup_old_logs(&dir, 3);
        assert!(!dir.exists());
    }

    #[test]
    fn test_paths_share_app_dirs() {
        if let (Some(log), Some(cache)) = (log_file(), cache_dir()) {
            assert_eq!(log.parent(), Some(cache.as_path()));
        }
        if let Some(db) = settings_db() {
            assert!(db.ends_with("settings.db"));
        }
    }
}
