//! Working directory
//!
//! File names are paths relative to the working root, always written with `/`
//! separators. Hidden files belong to the workspace; hidden directories, the store
//! included, do not.

use crate::artifacts::core::config::STORE_DIR;
use crate::artifacts::core::errors::RepositoryError;
use anyhow::Context;
use bytes::Bytes;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

const IGNORED_PATHS: [&str; 3] = [STORE_DIR, ".", ".."];

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    /// Turn a user-supplied path into a workspace file name
    pub fn normalize_name(&self, name: &str) -> anyhow::Result<String> {
        let mut components = Vec::new();
        for component in Path::new(name).components() {
            match component {
                Component::Normal(part) => components.push(part.to_string_lossy().to_string()),
                Component::CurDir => {}
                _ => return Err(RepositoryError::FileNotFound(name.to_string()).into()),
            }
        }

        let in_hidden_dir = components
            .split_last()
            .is_some_and(|(_, dirs)| dirs.iter().any(|dir| Self::is_hidden(dir)));
        let normalized = components.join("/");
        if normalized.is_empty() || in_hidden_dir || Self::is_ignored(Path::new(&normalized)) {
            return Err(RepositoryError::FileNotFound(name.to_string()).into());
        }

        Ok(normalized)
    }

    /// Every regular file under the working root outside hidden directories, sorted by name
    pub fn list_files(&self) -> anyhow::Result<Vec<String>> {
        let mut files = WalkDir::new(&self.path)
            .min_depth(1)
            .into_iter()
            .filter_entry(|entry| {
                !(entry.file_type().is_dir()
                    && Self::is_hidden(entry.file_name().to_string_lossy().as_ref()))
            })
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| self.file_name_of(entry.path()))
            .collect::<Vec<_>>();

        files.sort();
        Ok(files)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.file_path(name).is_file()
    }

    pub fn read_file(&self, name: &str) -> anyhow::Result<Bytes> {
        let file_path = self.file_path(name);
        let content = std::fs::read(&file_path)
            .with_context(|| format!("Unable to read file {}", file_path.display()))?;

        Ok(content.into())
    }

    /// Contents of `name`, or `None` when the file is absent
    pub fn try_read_file(&self, name: &str) -> anyhow::Result<Option<Bytes>> {
        if self.exists(name) {
            self.read_file(name).map(Some)
        } else {
            Ok(None)
        }
    }

    pub fn write_file(&self, name: &str, content: &[u8]) -> anyhow::Result<()> {
        let file_path = self.file_path(name);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Unable to create directory {}", parent.display()))?;
        }

        std::fs::write(&file_path, content)
            .with_context(|| format!("Unable to write file {}", file_path.display()))
    }

    /// Delete `name` if present, pruning directories left empty
    pub fn delete_file(&self, name: &str) -> anyhow::Result<()> {
        let file_path = self.file_path(name);
        if !file_path.is_file() {
            return Ok(());
        }

        std::fs::remove_file(&file_path)
            .with_context(|| format!("Unable to remove file {}", file_path.display()))?;
        self.prune_empty_parent_dirs(&file_path)
    }

    fn prune_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.path.as_ref()
            && parent.starts_with(&self.path)
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent).with_context(|| {
                format!("Unable to remove empty directory {}", parent.display())
            })?;
            self.prune_empty_parent_dirs(parent)?;
        }

        Ok(())
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    fn file_name_of(&self, path: &Path) -> Option<String> {
        let relative_path = path.strip_prefix(self.path.as_ref()).ok()?;
        let parts = relative_path
            .components()
            .map(|component| component.as_os_str().to_string_lossy().to_string())
            .collect::<Vec<_>>();

        Some(parts.join("/"))
    }

    fn is_hidden(name: &str) -> bool {
        name.starts_with('.')
    }

    fn is_ignored(path: &Path) -> bool {
        // Check if any component of the path is in IGNORED_PATHS
        path.components().any(|component| {
            if let Component::Normal(name) = component {
                IGNORED_PATHS.contains(&name.to_string_lossy().as_ref())
            } else {
                false
            }
        })
    }
}
