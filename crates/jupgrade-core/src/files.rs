//! Candidate file discovery and persistence.
//!
//! Paths given on the command line are either files, which are always taken,
//! or directories, which are walked and filtered through the include globs.
//! Globs match the file name case-insensitively, so the default `*Test.java`
//! also selects `FooTEST.JAVA`.
//!
//! Writes go through a temporary file in the target's directory that is then
//! renamed over the original, so a failed write never leaves a truncated
//! source behind.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

/// Include pattern used when none is given.
pub const DEFAULT_INCLUDE: &str = "*Test.java";

/// Directories that are never descended into.
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &[".git", "target", "build", "node_modules", ".gradle"];

#[derive(Debug, Error)]
pub enum FileError {
    /// Invalid glob pattern syntax.
    #[error("invalid glob pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("path not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Walk(#[from] walkdir::Error),
}

impl FileError {
    fn io(path: &Path, source: io::Error) -> Self {
        FileError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Decides which files under a directory are conversion candidates.
#[derive(Debug)]
pub struct FileSelector {
    includes: GlobSet,
    patterns: Vec<String>,
}

impl FileSelector {
    /// Builds a selector from file-name globs. An empty list means
    /// [`DEFAULT_INCLUDE`].
    pub fn new(patterns: &[String]) -> Result<Self, FileError> {
        let patterns = if patterns.is_empty() {
            vec![DEFAULT_INCLUDE.to_string()]
        } else {
            patterns.to_vec()
        };
        let mut builder = GlobSetBuilder::new();
        for pattern in &patterns {
            let glob = GlobBuilder::new(pattern)
                .case_insensitive(true)
                .literal_separator(true)
                .build()
                .map_err(|e| FileError::InvalidPattern {
                    pattern: pattern.clone(),
                    message: e.to_string(),
                })?;
            builder.add(glob);
        }
        let includes = builder.build().map_err(|e| FileError::InvalidPattern {
            pattern: "<combined>".to_string(),
            message: e.to_string(),
        })?;
        Ok(FileSelector { includes, patterns })
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Whether the file name of `path` matches an include glob.
    pub fn matches(&self, path: &Path) -> bool {
        path.file_name()
            .is_some_and(|name| self.includes.is_match(Path::new(name)))
    }

    /// Expands `roots` into a sorted, deduplicated list of files.
    ///
    /// A root that is a file is returned as is, whether or not it matches.
    /// A missing root is an error; nothing is returned for the others.
    pub fn collect(&self, roots: &[PathBuf]) -> Result<Vec<PathBuf>, FileError> {
        let mut files = Vec::new();
        for root in roots {
            if !root.exists() {
                return Err(FileError::NotFound { path: root.clone() });
            }
            if root.is_file() {
                files.push(root.clone());
                continue;
            }
            for entry in WalkDir::new(root)
                .follow_links(false)
                .into_iter()
                .filter_entry(|e| e.depth() == 0 || !is_excluded_dir(e))
            {
                let entry = entry?;
                if !entry.file_type().is_file() {
                    continue;
                }
                if self.matches(entry.path()) {
                    files.push(entry.into_path());
                } else {
                    debug!(path = %entry.path().display(), "skipping non-matching file");
                }
            }
        }
        files.sort();
        files.dedup();
        Ok(files)
    }
}

fn is_excluded_dir(entry: &walkdir::DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| DEFAULT_EXCLUDED_DIRS.contains(&name))
}

/// Reads a source file as UTF-8.
pub fn read_source(path: &Path) -> Result<String, FileError> {
    fs::read_to_string(path).map_err(|e| FileError::io(path, e))
}

/// Replaces the contents of `path` with `contents`.
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), FileError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(|e| FileError::io(path, e))?;
    temp.write_all(contents.as_bytes())
        .map_err(|e| FileError::io(path, e))?;
    if let Ok(metadata) = fs::metadata(path) {
        // Keep the original permissions; a failure here only loses the mode.
        let _ = fs::set_permissions(temp.path(), metadata.permissions());
    }
    temp.persist(path).map_err(|e| FileError::io(path, e.error))?;
    Ok(())
}
