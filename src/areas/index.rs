//! Staging area
//!
//! Persists the `Stage` (staged blobs and removed names) to `.twig/index` and keeps a
//! durable side copy of every staged file under `.twig/stage/<name>`, so the bytes that
//! were staged stay available even if the working file changes or disappears.
//!
//! The index file ends with a SHA-1 checksum of its content; on load the checksum is
//! verified and every side copy is checked against the blob ID recorded for it.

use crate::artifacts::index::checksum;
use crate::artifacts::index::stage::Stage;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use bytes::Bytes;
use file_guard::Lock;
use std::io::{Read, Write};
use std::ops::DerefMut;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Index {
    /// Path to the index file (`.twig/index`)
    path: Box<Path>,
    /// Directory holding the side copies (`.twig/stage`)
    stage_dir: Box<Path>,
    stage: Stage,
    /// Set when the in-memory stage diverges from the file on disk
    changed: bool,
}

impl Index {
    pub fn new(path: Box<Path>, stage_dir: Box<Path>) -> Self {
        Index {
            path,
            stage_dir,
            stage: Stage::default(),
            changed: false,
        }
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Load the index from disk.
    ///
    /// A missing or empty index file is an empty stage.
    ///
    /// # Locking
    ///
    /// Acquires a shared lock on the index file during reading.
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        self.stage = Stage::default();
        self.changed = false;

        if !self.path.exists() {
            return Ok(());
        }

        let mut index_file = std::fs::OpenOptions::new()
            .read(true)
            .open(&self.path)
            .with_context(|| format!("Unable to open index file {}", self.path.display()))?;
        let mut lock = file_guard::lock(&mut index_file, Lock::Shared, 0, 1)?;

        let mut content = Vec::new();
        lock.deref_mut().read_to_end(&mut content)?;
        if content.is_empty() {
            return Ok(());
        }

        let body = checksum::unseal(&content)
            .with_context(|| format!("Corrupted index file {}", self.path.display()))?;
        let stage = Stage::deserialize(std::io::Cursor::new(body))?;

        for (name, blob_id) in stage.staged() {
            let staged = self.read_side_copy(name)?;
            if &Blob::new(name.clone(), staged).object_id()? != blob_id {
                anyhow::bail!("Staged copy of {name} does not match the index");
            }
        }

        self.stage = stage;
        Ok(())
    }

    /// Stage `blob` under `blob_id`, overwriting any previous entry for its name
    pub fn add(&mut self, blob: &Blob, blob_id: ObjectId) -> anyhow::Result<()> {
        let side_copy = self.side_copy_path(blob.name());
        if let Some(parent) = side_copy.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&side_copy, blob.content())
            .with_context(|| format!("Unable to write staged copy {}", side_copy.display()))?;

        self.stage.stage(blob.name().to_string(), blob_id);
        self.changed = true;
        tracing::debug!(name = blob.name(), "staged file");

        Ok(())
    }

    /// Drop the staged entry and its side copy; a no-op when `name` is not staged
    pub fn remove(&mut self, name: &str) -> anyhow::Result<()> {
        if self.stage.unstage(name).is_some() {
            self.discard_side_copy(name)?;
            self.changed = true;
            tracing::debug!(name, "unstaged file");
        }

        Ok(())
    }

    /// Record `name` as removed since the last commit
    pub fn mark_removed(&mut self, name: &str) -> anyhow::Result<()> {
        self.remove(name)?;
        self.stage.mark_removed(name.to_string());
        self.changed = true;

        Ok(())
    }

    pub fn unmark_removed(&mut self, name: &str) {
        if self.stage.unmark_removed(name) {
            self.changed = true;
        }
    }

    /// Forget every staged and removed entry and delete all side copies
    pub fn clear(&mut self) -> anyhow::Result<()> {
        if self.stage_dir.exists() {
            std::fs::remove_dir_all(&self.stage_dir).with_context(|| {
                format!("Unable to clear stage directory {}", self.stage_dir.display())
            })?;
        }
        std::fs::create_dir_all(&self.stage_dir)?;

        if !self.stage.is_empty() {
            self.stage.clear();
            self.changed = true;
        }

        Ok(())
    }

    /// Bytes captured when `name` was staged
    pub fn staged_content(&self, name: &str) -> anyhow::Result<Option<Bytes>> {
        if !self.stage.contains(name) {
            return Ok(None);
        }

        self.read_side_copy(name).map(Some)
    }

    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        if !self.changed {
            return Ok(());
        }

        let mut index_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .with_context(|| format!("Unable to open index file {}", self.path.display()))?;
        let mut lock = file_guard::lock(&mut index_file, Lock::Exclusive, 0, 1)?;

        let sealed = checksum::seal(&self.stage.serialize()?);
        lock.deref_mut()
            .write_all(&sealed)
            .with_context(|| format!("Unable to write index file {}", self.path.display()))?;

        self.changed = false;
        Ok(())
    }

    fn side_copy_path(&self, name: &str) -> PathBuf {
        self.stage_dir.join(name)
    }

    fn read_side_copy(&self, name: &str) -> anyhow::Result<Bytes> {
        let side_copy = self.side_copy_path(name);
        let content = std::fs::read(&side_copy)
            .with_context(|| format!("Unable to read staged copy {}", side_copy.display()))?;

        Ok(content.into())
    }

    fn discard_side_copy(&self, name: &str) -> anyhow::Result<()> {
        let side_copy = self.side_copy_path(name);
        if side_copy.exists() {
            std::fs::remove_file(&side_copy).with_context(|| {
                format!("Unable to remove staged copy {}", side_copy.display())
            })?;
        }

        Ok(())
    }
}
