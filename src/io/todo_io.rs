use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tempfile::NamedTempFile;

use crate::model::task_list::TaskList;
use crate::parse::serialize_tasks;

/// Error type for todo file I/O
#[derive(Debug, thiserror::Error)]
pub enum TodoError {
    #[error(
        "no todo file specified: pass --todo or set `file` under [settings] in {config}"
    )]
    NoTodoFile { config: PathBuf },
    #[error("specified {description} file is a directory: {path}")]
    IsDirectory { description: String, path: PathBuf },
    #[error(
        "the directory {dir} does not exist; create it or specify a different {description} file"
    )]
    MissingDirectory { description: String, dir: PathBuf },
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

static ENV_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(?:\{(\w+)\}|(\w+))").expect("valid env var regex"));

/// Expand a leading `~` and any `$VAR` / `${VAR}`. Unset variables are left
/// as written.
pub fn expand_path(raw: &str) -> PathBuf {
    let expanded = ENV_VAR_RE.replace_all(raw, |caps: &regex::Captures| {
        let name = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
        std::env::var(name).unwrap_or_else(|_| caps[0].to_string())
    });

    if expanded == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = expanded.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(expanded.as_ref())
}

/// Resolve a user-supplied todo/done path.
///
/// A missing file whose directory exists is created empty. `description`
/// names the file in error messages (`"todo.txt"`, `"done.txt"`).
pub fn resolve_path(filename: &str, description: &str) -> Result<PathBuf, TodoError> {
    let path = expand_path(filename);

    if path.is_dir() {
        return Err(TodoError::IsDirectory {
            description: description.to_string(),
            path,
        });
    }

    if !path.exists() {
        let dir = match path.parent() {
            Some(p) if p.as_os_str().is_empty() => PathBuf::from("."),
            Some(p) => p.to_path_buf(),
            None => PathBuf::from("."),
        };
        if !dir.is_dir() {
            return Err(TodoError::MissingDirectory {
                description: description.to_string(),
                dir,
            });
        }
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| TodoError::WriteError {
                path: path.clone(),
                source: e,
            })?;
        log::info!("created empty {} at {}", description, path.display());
    }

    Ok(fs::canonicalize(&path)?)
}

/// Write `content` to `path` via a temp file in the same directory and an
/// atomic rename. On failure the existing file is untouched.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Lines of a todo file, blank lines dropped
pub fn read_task_lines(path: &Path) -> Result<Vec<String>, TodoError> {
    let text = fs::read_to_string(path).map_err(|e| TodoError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect())
}

impl TaskList {
    /// Read the todo file into a new list
    pub fn load(path: &Path, archive_path: Option<PathBuf>) -> Result<TaskList, TodoError> {
        let lines = read_task_lines(path)?;
        log::debug!("loaded {} tasks from {}", lines.len(), path.display());
        Ok(TaskList::from_lines(
            &lines,
            path.to_path_buf(),
            archive_path,
        ))
    }

    /// Persist every task in current order
    pub fn save(&self) -> Result<(), TodoError> {
        let content = serialize_tasks(self.iter());
        atomic_write(&self.file_path, content.as_bytes()).map_err(|e| TodoError::WriteError {
            path: self.file_path.clone(),
            source: e,
        })?;
        log::debug!("saved {} tasks to {}", self.len(), self.file_path.display());
        Ok(())
    }

    /// Discard in-memory state and re-read the backing file. The archive is
    /// not touched.
    pub fn reload_from_file(&mut self) -> Result<(), TodoError> {
        let lines = read_task_lines(&self.file_path)?;
        self.replace_lines(&lines);
        log::info!("reloaded {} tasks from {}", self.len(), self.file_path.display());
        Ok(())
    }

    /// Move completed tasks to the archive file.
    ///
    /// Returns `Ok(false)` when there is no archive or nothing is complete.
    /// Either both files are rewritten and the tasks leave the list, or
    /// neither file changes and the list is left as it was.
    pub fn archive_done(&mut self) -> Result<bool, TodoError> {
        let Some(archive_path) = self.archive_path.clone() else {
            return Ok(false);
        };
        let (done, remaining): (Vec<_>, Vec<_>) = self.iter().partition(|t| t.is_complete());
        if done.is_empty() {
            return Ok(false);
        }

        let previous = match fs::read_to_string(&archive_path) {
            Ok(text) => Some(text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                return Err(TodoError::ReadError {
                    path: archive_path,
                    source: e,
                });
            }
        };

        let mut archive = previous.clone().unwrap_or_default();
        if !archive.is_empty() && !archive.ends_with('\n') {
            archive.push('\n');
        }
        archive.push_str(&serialize_tasks(done.iter().copied()));
        let todo_content = serialize_tasks(remaining.iter().copied());
        let moved: Vec<_> = done.iter().map(|t| t.id).collect();

        atomic_write(&archive_path, archive.as_bytes()).map_err(|e| TodoError::WriteError {
            path: archive_path.clone(),
            source: e,
        })?;
        if let Err(e) = atomic_write(&self.file_path, todo_content.as_bytes()) {
            // Put the archive back so the task isn't in both files
            let undone = match &previous {
                Some(text) => atomic_write(&archive_path, text.as_bytes()),
                None => fs::remove_file(&archive_path),
            };
            if let Err(undo) = undone {
                log::error!(
                    "could not restore {} after failed archive: {}",
                    archive_path.display(),
                    undo
                );
            }
            return Err(TodoError::WriteError {
                path: self.file_path.clone(),
                source: e,
            });
        }

        self.todo_items.retain(|t| !moved.contains(&t.id));
        self.forget_raw_order(&moved);
        self.renumber();
        log::info!(
            "archived {} completed tasks to {}",
            moved.len(),
            archive_path.display()
        );
        Ok(true)
    }
}
