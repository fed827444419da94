use anyhow::{Context, Result};
use chrono::Local;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> io::Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Find files whose extension matches one of `extensions` (case-insensitive,
    /// with or without a leading dot), in stable file-name order
    pub fn find_files<P: AsRef<Path>>(dir: P, extensions: &[String]) -> Result<Vec<PathBuf>> {
        let normalized: Vec<String> = extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_lowercase())
            .collect();
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true).sort_by_file_name() {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(ext) = path.extension() {
                let ext = ext.to_string_lossy().to_lowercase();
                if normalized.iter().any(|wanted| *wanted == ext) {
                    result.push(path.to_path_buf());
                }
            }
        }

        Ok(result)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> io::Result<String> {
        fs::read_to_string(path)
    }

    /// Write `content` to `path` through a temporary file in the same
    /// directory, so readers only ever see the old or the complete new file.
    /// Permissions of an existing destination are kept.
    pub fn write_atomic<P: AsRef<Path>>(path: P, content: &[u8]) -> io::Result<()> {
        let path = path.as_ref();
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        Self::ensure_dir(parent)?;

        let previous_permissions = fs::metadata(path).ok().map(|m| m.permissions());

        let mut temp = NamedTempFile::new_in(parent)?;
        temp.write_all(content)?;
        temp.flush()?;
        if let Some(permissions) = previous_permissions {
            temp.as_file().set_permissions(permissions)?;
        }
        temp.persist(path).map_err(|e| e.error)?;

        Ok(())
    }

    /// Copy the tree at `from` to `to`, removing whatever was at `to` first
    pub fn copy_dir_all<P1: AsRef<Path>, P2: AsRef<Path>>(from: P1, to: P2) -> io::Result<()> {
        let from = from.as_ref();
        let to = to.as_ref();

        if to.is_dir() {
            fs::remove_dir_all(to)?;
        } else if to.exists() {
            fs::remove_file(to)?;
        }

        for entry in WalkDir::new(from).follow_links(true) {
            let entry = entry?;
            let relative = entry
                .path()
                .strip_prefix(from)
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
            let destination = to.join(relative);

            if entry.file_type().is_dir() {
                fs::create_dir_all(&destination)?;
            } else {
                if let Some(parent) = destination.parent() {
                    Self::ensure_dir(parent)?;
                }
                fs::copy(entry.path(), &destination)?;
            }
        }

        Ok(())
    }

    /// Absolute, and where possible canonical, form of `path`
    pub fn absolute_path<P: AsRef<Path>>(path: P) -> io::Result<PathBuf> {
        let path = path.as_ref();
        match fs::canonicalize(path) {
            Ok(canonical) => Ok(canonical),
            Err(_) => {
                // Not created yet: canonicalize the closest existing ancestor
                let absolute = std::path::absolute(path)?;
                let mut existing = absolute.as_path();
                let mut rest = Vec::new();
                while !existing.exists() {
                    match (existing.parent(), existing.file_name()) {
                        (Some(parent), Some(name)) => {
                            rest.push(name.to_os_string());
                            existing = parent;
                        }
                        _ => return Ok(absolute),
                    }
                }
                let mut resolved = fs::canonicalize(existing)?;
                for name in rest.iter().rev() {
                    resolved.push(name);
                }
                Ok(resolved)
            }
        }
    }

    /// Append content to a log file with timestamp
    pub fn append_to_log_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file: {:?}", path.as_ref()))?;

        writeln!(file, "[{}] {}", timestamp, content)
            .with_context(|| format!("Failed to write to log file: {:?}", path.as_ref()))?;

        Ok(())
    }
}
