//! Object database
//!
//! Content-addressed storage for blobs and commits. Each object lives in its own
//! zlib-compressed file under `objects/<2-char fan-out>/<38 chars>`. Writes go through
//! a temporary file and a rename, and storing an object that already exists is a no-op.
//! Nothing is cached in memory: every lookup goes back to disk.

use crate::artifacts::core::errors::RepositoryError;
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use std::io::{BufRead, Cursor, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    /// Persist an object under its ID and return the ID
    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        let object_id = object.object_id()?;
        let object_path = self.path.join(object_id.to_path());

        // write the object to disk unless it already exists
        if !object_path.exists() {
            self.write_object(object_path, object.serialize()?)?;
            tracing::debug!(oid = %object_id, kind = %object.object_type(), "stored object");
        }

        Ok(object_id)
    }

    pub fn contains(&self, object_id: &ObjectId) -> bool {
        self.path.join(object_id.to_path()).is_file()
    }

    pub fn load_commit(&self, object_id: &ObjectId) -> anyhow::Result<Commit> {
        match self.parse_object_as_bytes(object_id)? {
            Some((ObjectType::Commit, object_reader)) => Commit::deserialize(object_reader)
                .with_context(|| format!("Unable to parse commit {object_id}")),
            _ => Err(RepositoryError::CommitNotFound(object_id.to_string()).into()),
        }
    }

    pub fn load_blob(&self, object_id: &ObjectId) -> anyhow::Result<Blob> {
        match self.parse_object_as_bytes(object_id)? {
            Some((ObjectType::Blob, object_reader)) => Blob::deserialize(object_reader)
                .with_context(|| format!("Unable to parse blob {object_id}")),
            _ => anyhow::bail!("blob {object_id} is missing from the object database"),
        }
    }

    pub fn get_object_type(&self, object_id: &ObjectId) -> anyhow::Result<Option<ObjectType>> {
        Ok(self
            .parse_object_as_bytes(object_id)?
            .map(|(object_type, _)| object_type))
    }

    /// Resolve a full or abbreviated commit ID.
    ///
    /// Only commits take part in prefix expansion. No match yields `CommitNotFound`,
    /// several matches yield `AmbiguousCommitId`.
    pub fn resolve_commit_id(&self, prefix: &str) -> anyhow::Result<ObjectId> {
        if !ObjectId::is_valid_prefix(prefix) {
            return Err(RepositoryError::CommitNotFound(prefix.to_string()).into());
        }

        let mut candidates = Vec::new();
        for oid in self.find_objects_by_prefix(prefix)? {
            if self.get_object_type(&oid)? == Some(ObjectType::Commit) {
                candidates.push(oid);
            }
        }

        match candidates.len() {
            0 => Err(RepositoryError::CommitNotFound(prefix.to_string()).into()),
            1 => Ok(candidates.remove(0)),
            _ => Err(RepositoryError::AmbiguousCommitId(prefix.to_string()).into()),
        }
    }

    /// Every commit in the store, in ID order
    pub fn list_commits(&self) -> anyhow::Result<Vec<ObjectId>> {
        let mut commits = Vec::new();
        for oid in self.find_objects_by_prefix("")? {
            if self.get_object_type(&oid)? == Some(ObjectType::Commit) {
                commits.push(oid);
            }
        }

        Ok(commits)
    }

    /// Copy one object verbatim from another store; returns whether anything was written
    pub fn copy_from(&self, source: &Database, object_id: &ObjectId) -> anyhow::Result<bool> {
        if self.contains(object_id) {
            return Ok(false);
        }

        let source_path = source.path.join(object_id.to_path());
        let compressed = std::fs::read(&source_path).context(format!(
            "Unable to read object file {}",
            source_path.display()
        ))?;
        self.write_compressed(self.path.join(object_id.to_path()), &compressed)?;

        Ok(true)
    }

    /// Find all objects whose OID starts with the given prefix.
    ///
    /// # Performance
    ///
    /// - For prefixes of 2+ characters, only searches the specific directory
    /// - For prefixes of 0-1 characters, must search all directories (slower)
    pub fn find_objects_by_prefix(&self, prefix: &str) -> anyhow::Result<Vec<ObjectId>> {
        let prefix = prefix.to_ascii_lowercase();
        let mut matches = Vec::new();

        let dir_names = if prefix.len() >= 2 {
            vec![prefix[..2].to_string()]
        } else {
            (0..=255).map(|i| format!("{:02x}", i)).collect()
        };

        for dir_name in dir_names {
            let dir_path = self.path.join(&dir_name);
            if !dir_path.is_dir() {
                continue;
            }

            for entry in std::fs::read_dir(&dir_path)? {
                let entry = entry?;
                let full_oid = format!("{}{}", dir_name, entry.file_name().to_string_lossy());

                // temp files and strays never parse as an ID
                if full_oid.len() == OBJECT_ID_LENGTH
                    && full_oid.starts_with(&prefix)
                    && let Ok(oid) = ObjectId::try_parse(full_oid)
                {
                    matches.push(oid);
                }
            }
        }

        matches.sort();
        Ok(matches)
    }

    fn parse_object_as_bytes(
        &self,
        object_id: &ObjectId,
    ) -> anyhow::Result<Option<(ObjectType, impl BufRead + use<>)>> {
        let object_path = self.path.join(object_id.to_path());
        if !object_path.is_file() {
            return Ok(None);
        }

        let object_content = self.read_object(object_path)?;
        let mut object_reader = Cursor::new(object_content);
        let object_type = ObjectType::parse_object_type(&mut object_reader)?;

        Ok(Some((object_type, object_reader)))
    }

    fn read_object(&self, object_path: PathBuf) -> anyhow::Result<Bytes> {
        let object_content = std::fs::read(&object_path).context(format!(
            "Unable to read object file {}",
            object_path.display()
        ))?;

        Self::decompress(object_content.into())
    }

    fn write_object(&self, object_path: PathBuf, object_content: Bytes) -> anyhow::Result<()> {
        let object_content = Self::compress(object_content)?;
        self.write_compressed(object_path, &object_content)
    }

    fn write_compressed(&self, object_path: PathBuf, object_content: &[u8]) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .context(format!("Invalid object path {}", object_path.display()))?;
        std::fs::create_dir_all(object_dir).context(format!(
            "Unable to create object directory {}",
            object_dir.display()
        ))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_object_path)
            .context(format!(
                "Unable to open object file {}",
                temp_object_path.display()
            ))?;

        file.write_all(object_content).context(format!(
            "Unable to write object file {}",
            temp_object_path.display()
        ))?;

        // rename the temp file to the object file to make it atomic
        std::fs::rename(&temp_object_path, &object_path).context(format!(
            "Unable to rename object file to {}",
            object_path.display()
        ))?;

        Ok(())
    }

    fn compress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(&data)
            .context("Unable to compress object content")?;

        encoder
            .finish()
            .map(|compressed_content| compressed_content.into())
            .context("Unable to finish compressing object content")
    }

    fn decompress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .context("Unable to decompress object content")?;

        Ok(decompressed_content.into())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::core::config;
    use assert_fs::TempDir;
    use std::collections::BTreeMap;

    fn database(dir: &TempDir) -> Database {
        Database::new(dir.path().join("objects").into_boxed_path())
    }

    fn commit(message: &str) -> Commit {
        Commit::root(message.to_string(), "master".to_string(), config::epoch())
    }

    #[test]
    fn storing_twice_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let database = database(&dir);
        let blob = Blob::new("a.txt".into(), Bytes::from_static(b"one"));

        let first = database.store(&blob).unwrap();
        let second = database.store(&blob).unwrap();

        assert_eq!(first, second);
        assert_eq!(database.find_objects_by_prefix("").unwrap(), vec![first.clone()]);
        assert_eq!(database.load_blob(&first).unwrap(), blob);
    }

    #[test]
    fn resolves_unique_commit_prefixes_only() {
        let dir = TempDir::new().unwrap();
        let database = database(&dir);
        let oid = database.store(&commit("first")).unwrap();
        database
            .store(&Blob::new("a.txt".into(), Bytes::from_static(b"one")))
            .unwrap();

        assert_eq!(database.resolve_commit_id(&oid.as_ref()[..6]).unwrap(), oid);
        assert_eq!(database.resolve_commit_id(oid.as_ref()).unwrap(), oid);

        let error = database.resolve_commit_id("0000000").unwrap_err();
        assert!(matches!(
            RepositoryError::find(&error),
            Some(RepositoryError::CommitNotFound(_))
        ));
    }

    #[test]
    fn reports_ambiguous_prefixes() {
        let dir = TempDir::new().unwrap();
        let database = database(&dir);

        // enough commits that two of them share a first hex digit
        let ids = (0..17)
            .map(|i| database.store(&commit(&format!("commit {i}"))).unwrap())
            .collect::<Vec<_>>();
        let mut by_digit = BTreeMap::<char, usize>::new();
        for oid in &ids {
            *by_digit.entry(oid.as_ref().chars().next().unwrap()).or_default() += 1;
        }
        let (shared, _) = by_digit.iter().find(|(_, count)| **count > 1).unwrap();

        let error = database.resolve_commit_id(&shared.to_string()).unwrap_err();
        assert!(matches!(
            RepositoryError::find(&error),
            Some(RepositoryError::AmbiguousCommitId(_))
        ));
    }

    #[test]
    fn blob_ids_are_not_commits() {
        let dir = TempDir::new().unwrap();
        let database = database(&dir);
        let blob_id = database
            .store(&Blob::new("a.txt".into(), Bytes::from_static(b"one")))
            .unwrap();

        assert!(database.load_commit(&blob_id).is_err());
        assert!(database.list_commits().unwrap().is_empty());
    }
}
