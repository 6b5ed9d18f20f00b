//! Role library: persona templates stored as `<id>.txt` files.

use parley_domain::RoleTemplate;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum RoleError {
    #[error("Role '{id}' not found in {dir}")]
    NotFound { id: String, dir: String },

    #[error("Could not read role file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid roles directory pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

/// Directory of role templates.
#[derive(Debug, Clone)]
pub struct RoleLibrary {
    dir: PathBuf,
}

impl RoleLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the roles directory if it does not exist yet.
    pub fn ensure_dir(&self) -> Result<(), RoleError> {
        fs::create_dir_all(&self.dir).map_err(|source| RoleError::Io {
            path: self.dir.display().to_string(),
            source,
        })
    }

    /// Ids of all available roles, sorted. A missing directory has no roles.
    pub fn list(&self) -> Result<Vec<String>, RoleError> {
        let pattern = self.dir.join("*.txt");
        let mut ids: Vec<String> = glob::glob(&pattern.to_string_lossy())?
            .filter_map(|entry| match entry {
                Ok(path) => path.file_stem().map(|s| s.to_string_lossy().into_owned()),
                Err(e) => {
                    warn!("Skipping unreadable role entry: {}", e);
                    None
                }
            })
            .collect();
        ids.sort();
        debug!(dir = %self.dir.display(), count = ids.len(), "Listed roles");
        Ok(ids)
    }

    /// Load and parse the role `id`.
    pub fn load(&self, id: &str) -> Result<RoleTemplate, RoleError> {
        let path = self.dir.join(format!("{}.txt", id));
        if !path.is_file() {
            return Err(RoleError::NotFound {
                id: id.to_string(),
                dir: self.dir.display().to_string(),
            });
        }
        let text = fs::read_to_string(&path).map_err(|source| RoleError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(RoleTemplate::parse(id, &text))
    }

    /// Load every role, skipping files that fail to read.
    pub fn load_all(&self) -> Result<Vec<RoleTemplate>, RoleError> {
        Ok(self
            .list()?
            .into_iter()
            .filter_map(|id| match self.load(&id) {
                Ok(role) => Some(role),
                Err(e) => {
                    warn!("{}", e);
                    None
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library_with(files: &[(&str, &str)]) -> (tempfile::TempDir, RoleLibrary) {
        let dir = tempfile::tempdir().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        let library = RoleLibrary::new(dir.path());
        (dir, library)
    }

    #[test]
    fn ensure_dir_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let library = RoleLibrary::new(dir.path().join("roles"));
        library.ensure_dir().unwrap();
        assert!(library.dir().is_dir());
        assert!(library.list().unwrap().is_empty());
    }

    #[test]
    fn lists_txt_files_sorted() {
        let (_dir, library) = library_with(&[
            ("skeptic.txt", "Doubt."),
            ("optimist.txt", "Hope."),
            ("notes.md", "ignored"),
        ]);
        assert_eq!(library.list().unwrap(), vec!["optimist", "skeptic"]);
    }

    #[test]
    fn loads_name_header() {
        let (_dir, library) =
            library_with(&[("skeptic.txt", "Name: The Skeptic\nYou question everything.\n")]);
        let role = library.load("skeptic").unwrap();
        assert_eq!(role.name, "The Skeptic");
        assert_eq!(role.system_prompt, "You question everything.");
    }

    #[test]
    fn missing_role_is_not_found() {
        let (_dir, library) = library_with(&[]);
        assert!(matches!(
            library.load("ghost"),
            Err(RoleError::NotFound { .. })
        ));
    }

    #[test]
    fn missing_directory_has_no_roles() {
        let library = RoleLibrary::new("/definitely/not/a/roles/dir");
        assert!(library.list().unwrap().is_empty());
    }

    #[test]
    fn load_all_builds_templates() {
        let (_dir, library) = library_with(&[("economist.txt", "Think in incentives.")]);
        let roles = library.load_all().unwrap();
        assert_eq!(roles.len(), 1);
        assert_eq!(roles[0].name, "Economist");
    }
}
