//! JSONL file writer for turn records.
//!
//! Each [`TurnRecord`] is serialized as a single JSON line and appended to
//! the file via a buffered writer. Existing content is never truncated, so
//! several runs can share one log.

use parley_application::ports::turn_log::{TurnLogger, TurnRecord};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Append-only turn log writing one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes after every record
/// and on `Drop`.
pub struct JsonlTurnLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlTurnLogger {
    /// Open (or create) the log at `path` for appending.
    ///
    /// Creates parent directories if needed. Returns `None` if the file
    /// cannot be opened.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create turn log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open turn log {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TurnLogger for JsonlTurnLogger {
    fn log(&self, record: &TurnRecord) {
        let line = match serde_json::to_string(record) {
            Ok(line) => line,
            Err(e) => {
                warn!("Could not serialize turn record: {}", e);
                return;
            }
        };

        if let Ok(mut writer) = self.writer.lock() {
            if let Err(e) = writeln!(writer, "{}", line).and_then(|_| writer.flush()) {
                warn!("Could not write turn log {}: {}", self.path.display(), e);
            }
        }
    }
}

impl Drop for JsonlTurnLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_domain::{AgentConfig, Message};

    fn record(content: &str) -> TurnRecord {
        let agent = AgentConfig::new("critic", "Critic", "Find flaws.").unwrap();
        TurnRecord::reply(1, &agent, &Message::from_agent(&agent, content))
    }

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn writes_one_object_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("turns.jsonl");
        let logger = JsonlTurnLogger::new(&path).unwrap();

        logger.log(&record("First."));
        logger.log(&record("Second,\nwith a newline."));

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["agent_id"], "critic");
        assert_eq!(lines[0]["round"], 1);
        assert_eq!(lines[1]["content"], "Second,\nwith a newline.");
        assert!(lines[0]["ts"].is_string());
        assert!(lines[0]["model"].is_string());
    }

    #[test]
    fn appends_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("turns.jsonl");

        JsonlTurnLogger::new(&path).unwrap().log(&record("one"));
        JsonlTurnLogger::new(&path).unwrap().log(&record("two"));

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1]["content"], "two");
    }

    #[test]
    fn creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("nested").join("turns.jsonl");
        let logger = JsonlTurnLogger::new(&path).unwrap();
        logger.log(&record("hi"));
        assert!(path.exists());
        assert_eq!(logger.path(), path.as_path());
    }

    #[test]
    fn records_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("turns.jsonl");
        let original = record("Exact.");
        JsonlTurnLogger::new(&path).unwrap().log(&original);

        let line = std::fs::read_to_string(&path).unwrap();
        let parsed: TurnRecord = serde_json::from_str(line.trim()).unwrap();
        assert_eq!(parsed, original);
    }
}
