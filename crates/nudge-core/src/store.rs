use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use nudge_shared::error::PreferenceError;
use nudge_shared::prefs::PreferenceStore;
use nudge_shared::task::NotificationSnapshot;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

pub const PREFERENCES_FILE: &str = "preferences.json";
pub const SNAPSHOT_FILE: &str = "snapshot.json";
pub const THEME_CSS_FILE: &str = "theme.css";

/// Preferences kept as one JSON object in the data directory.
///
/// Every `set` rewrites the file atomically, so a crash never leaves a
/// half-written preference behind.
#[derive(Debug)]
pub struct FileStore {
    pub data_dir: PathBuf,
    pub preferences_path: PathBuf,
    pub snapshot_path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    #[tracing::instrument(skip(data_dir))]
    pub fn open(data_dir: &Path) -> anyhow::Result<Self> {
        let data_dir = data_dir.to_path_buf();
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("failed to create {}", data_dir.display()))?;

        let preferences_path = data_dir.join(PREFERENCES_FILE);
        let snapshot_path = data_dir.join(SNAPSHOT_FILE);

        let values = if preferences_path.exists() {
            let text = fs::read_to_string(&preferences_path)
                .with_context(|| format!("failed reading {}", preferences_path.display()))?;
            if text.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&text)
                    .with_context(|| format!("failed parsing {}", preferences_path.display()))?
            }
        } else {
            BTreeMap::new()
        };

        info!(
            data_dir = %data_dir.display(),
            preferences = %preferences_path.display(),
            keys = values.len(),
            "opened preference store"
        );

        Ok(Self {
            data_dir,
            preferences_path,
            snapshot_path,
            values,
        })
    }

    /// Last notification snapshot saved by `watch` or `notifications`.
    /// A missing or unreadable file yields an empty snapshot.
    #[tracing::instrument(skip(self))]
    pub fn load_snapshot(&self) -> NotificationSnapshot {
        let text = match fs::read_to_string(&self.snapshot_path) {
            Ok(text) => text,
            Err(err) => {
                debug!(error = %err, "no cached snapshot");
                return NotificationSnapshot::default();
            }
        };
        serde_json::from_str(&text).unwrap_or_else(|err| {
            warn!(
                file = %self.snapshot_path.display(),
                error = %err,
                "ignoring unreadable snapshot cache"
            );
            NotificationSnapshot::default()
        })
    }

    #[tracing::instrument(skip(self, snapshot), fields(count = snapshot.count))]
    pub fn save_snapshot(&self, snapshot: &NotificationSnapshot) -> anyhow::Result<()> {
        let payload = serde_json::to_vec_pretty(snapshot)?;
        write_atomic(&self.snapshot_path, &payload).context("failed to save snapshot cache")
    }

    pub fn theme_css_path(&self) -> PathBuf {
        self.data_dir.join(THEME_CSS_FILE)
    }

    fn persist(&self) -> anyhow::Result<()> {
        let payload = serde_json::to_vec_pretty(&self.values)?;
        write_atomic(&self.preferences_path, &payload)
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let previous = self.values.insert(key.to_string(), value.to_string());
        if previous.as_deref() == Some(value) {
            return Ok(());
        }
        self.persist().map_err(|err| {
            match previous {
                Some(old) => self.values.insert(key.to_string(), old),
                None => self.values.remove(key),
            };
            PreferenceError::Write {
                key: key.to_string(),
                message: format!("{err:#}"),
            }
        })?;
        debug!(key, value, "persisted preference");
        Ok(())
    }
}

#[tracing::instrument(skip(path, payload))]
pub(crate) fn write_atomic(path: &Path, payload: &[u8]) -> anyhow::Result<()> {
    debug!(file = %path.display(), bytes = payload.len(), "writing atomically");

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(payload)?;
    temp.flush()?;

    temp.persist(path)
        .map_err(|err| anyhow!("failed to persist {}: {}", path.display(), err))?;

    Ok(())
}
