use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tempfile::Builder;
use tracing::{debug, warn};

use crate::models::{GroupId, WordGroupDocument};

const ENTRY_SUFFIX: &str = ".json";
const TEMP_PREFIX: &str = ".entry-";

/// Flat JSON store holding one `WordGroupDocument` per group.
///
/// Every operation is infallible from the caller's point of view: failures are
/// logged and degrade to "not cached". Entries never expire; they are
/// overwritten by the next successful fetch or removed by `clear_all`.
#[derive(Debug, Clone)]
pub struct CacheManager {
    cache_dir: PathBuf,
}

impl CacheManager {
    pub fn new(cache_dir: PathBuf) -> Self {
        if let Err(e) = fs::create_dir_all(&cache_dir) {
            warn!(dir = %cache_dir.display(), error = %e, "Failed to create cache directory");
        }
        Self { cache_dir }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn cache_path(&self, group: &GroupId) -> Option<PathBuf> {
        if !group.is_path_safe() {
            debug!(group = %group, "Group id not usable as a cache file name");
            return None;
        }
        Some(self.cache_dir.join(format!("{}{}", group, ENTRY_SUFFIX)))
    }

    /// Store `document` for `group`, replacing any previous entry.
    ///
    /// The file is written to a uniquely named temp file next to its final
    /// location and renamed into place, so a concurrent `get` sees either the
    /// old or the new document, even while other writers save the same group.
    pub fn put(&self, group: &GroupId, document: &WordGroupDocument) {
        let Some(path) = self.cache_path(group) else {
            return;
        };
        if let Err(e) = Self::write_entry(&path, document) {
            warn!(group = %group, error = %e, "Failed to cache group document");
        } else {
            debug!(group = %group, path = %path.display(), "Cached group document");
        }
    }

    fn write_entry(path: &Path, document: &WordGroupDocument) -> std::io::Result<()> {
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir)?;
        let contents = serde_json::to_vec_pretty(document)?;

        // Each writer gets its own temp file; the last rename wins.
        let mut temp = Builder::new().prefix(TEMP_PREFIX).tempfile_in(dir)?;
        temp.write_all(&contents)?;
        temp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    /// The cached document for `group`, or `None` if missing or unreadable.
    pub fn get(&self, group: &GroupId) -> Option<WordGroupDocument> {
        let path = self.cache_path(group)?;
        let contents = match fs::read(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(group = %group, error = %e, "Failed to read cache file");
                return None;
            }
        };
        match serde_json::from_slice(&contents) {
            Ok(document) => Some(document),
            Err(e) => {
                warn!(group = %group, error = %e, "Failed to parse cache file");
                None
            }
        }
    }

    pub fn exists(&self, group: &GroupId) -> bool {
        self.cache_path(group).is_some_and(|path| path.is_file())
    }

    /// Remove every entry in the cache directory. Best effort.
    pub fn clear_all(&self) {
        let entries = match fs::read_dir(&self.cache_dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(
                    dir = %self.cache_dir.display(),
                    error = %e,
                    "Failed to list cache directory"
                );
                return;
            }
        };

        let mut removed = 0usize;
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove cache file"),
            }
        }
        debug!(removed = removed, "Cleared cache");
    }

    /// Groups that currently have an entry, sorted.
    pub fn cached_groups(&self) -> Vec<GroupId> {
        let Ok(entries) = fs::read_dir(&self.cache_dir) else {
            return Vec::new();
        };
        let mut groups: Vec<GroupId> = entries
            .flatten()
            .filter_map(|entry| {
                let name = entry.file_name().into_string().ok()?;
                let id = GroupId::from(name.strip_suffix(ENTRY_SUFFIX)?);
                id.is_path_safe().then_some(id)
            })
            .collect();
        groups.sort();
        groups
    }

    /// When the entry for `group` was last written.
    pub fn cached_at(&self, group: &GroupId) -> Option<DateTime<Utc>> {
        let path = self.cache_path(group)?;
        let modified = fs::metadata(path).and_then(|m| m.modified()).ok()?;
        Some(DateTime::<Utc>::from(modified))
    }

    /// Human-readable age of the entry for `group`, e.g. "5m ago".
    pub fn age_display(&self, group: &GroupId) -> Option<String> {
        self.cached_at(group)
            .map(|at| format_age((Utc::now() - at).num_minutes()))
    }
}

/// Render an age in minutes as "just now", "Nm ago", "Nh ago" or "Nd ago".
pub fn format_age(minutes: i64) -> String {
    if minutes < 1 {
        // Also covers clock skew
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 1440 {
        let hours = minutes / 60;
        let remaining_mins = minutes % 60;
        if remaining_mins >= 30 {
            // Round up: 1h 30m+ becomes 2h
            format!("{}h ago", hours + 1)
        } else {
            format!("{}h ago", hours)
        }
    } else {
        let days = minutes / 1440;
        let remaining_hours = (minutes % 1440) / 60;
        if remaining_hours >= 12 {
            // Round up: 1d 12h+ becomes 2d
            format!("{}d ago", days + 1)
        } else {
            format!("{}d ago", days)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
