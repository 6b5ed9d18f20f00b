//! JSON file snapshot store.
//!
//! Writes go to a sibling temp file first and are renamed into place, so a
//! crash mid-write leaves either the old snapshot or the new one.

use parley_application::{SnapshotError, SnapshotStore};
use parley_domain::DebateState;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct JsonFileSnapshotStore;

impl JsonFileSnapshotStore {
    fn temp_path(path: &Path) -> PathBuf {
        let mut name = path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "snapshot".into());
        name.push(".tmp");
        path.with_file_name(name)
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> SnapshotError + '_ {
    move |source| SnapshotError::Io {
        path: path.display().to_string(),
        source,
    }
}

impl SnapshotStore for JsonFileSnapshotStore {
    fn save(&self, state: &DebateState, path: &Path) -> Result<(), SnapshotError> {
        let json = state.to_json()?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io_error(parent))?;
        }

        let tmp = Self::temp_path(path);
        {
            let mut file = fs::File::create(&tmp).map_err(io_error(&tmp))?;
            file.write_all(json.as_bytes()).map_err(io_error(&tmp))?;
            file.sync_all().map_err(io_error(&tmp))?;
        }
        fs::rename(&tmp, path).map_err(io_error(path))?;

        debug!(path = %path.display(), messages = state.history.len(), "Snapshot written");
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<DebateState, SnapshotError> {
        let json = fs::read_to_string(path).map_err(io_error(path))?;
        Ok(DebateState::from_json(&json)?)
    }
}
