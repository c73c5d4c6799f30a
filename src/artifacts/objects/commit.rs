//! Commit object
//!
//! A commit is a full snapshot of the tracked files (file name to blob ID) together
//! with its ancestry: a first parent (absent only on the root commit) and, on merge
//! commits, the head of the branch that was merged in.
//!
//! ## Identity
//!
//! The ID is derived from the message, both parents and the set of blob IDs. The
//! branch tag and timestamp are recorded but do not take part, so the same history
//! replayed or fetched under another branch name keeps its IDs.
//!
//! ## Format
//!
//! ```text
//! commit <size>\0
//! branch <branch tag>
//! parent <parent-sha>
//! merge <merged-in-sha>
//! date <rfc3339 timestamp>
//! blob <blob-sha> <file name>
//!
//! <commit message>
//! ```

use crate::artifacts::objects::object::{Object, Packable, Unpackable, frame};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet};
use std::io::{BufRead, Write};

/// Slim representation of a commit
///
/// Contains only the ancestry needed to walk the commit graph.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SlimCommit {
    pub oid: ObjectId,
    pub parents: Vec<ObjectId>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    message: String,
    branch: String,
    timestamp: chrono::DateTime<chrono::FixedOffset>,
    parent: Option<ObjectId>,
    merge_parent: Option<ObjectId>,
    /// Complete tree state, not a diff against the parent
    files: BTreeMap<String, ObjectId>,
}

impl Commit {
    pub fn new(
        message: String,
        branch: String,
        timestamp: chrono::DateTime<chrono::FixedOffset>,
        parent: Option<ObjectId>,
        merge_parent: Option<ObjectId>,
        files: BTreeMap<String, ObjectId>,
    ) -> Self {
        Commit {
            message,
            branch,
            timestamp,
            parent,
            merge_parent,
            files,
        }
    }

    /// The parentless commit every store starts from
    pub fn root(
        message: String,
        branch: String,
        timestamp: chrono::DateTime<chrono::FixedOffset>,
    ) -> Self {
        Self::new(message, branch, timestamp, None, None, BTreeMap::new())
    }

    /// Tree of a child commit: this commit's files minus `removed`, with `staged`
    /// inserted or overwriting
    pub fn tree_after<'s>(
        &self,
        staged: impl IntoIterator<Item = (&'s String, &'s ObjectId)>,
        removed: &BTreeSet<String>,
    ) -> BTreeMap<String, ObjectId> {
        let mut files = self
            .files
            .iter()
            .filter(|(name, _)| !removed.contains(*name))
            .map(|(name, oid)| (name.clone(), oid.clone()))
            .collect::<BTreeMap<_, _>>();

        for (name, oid) in staged {
            files.insert(name.clone(), oid.clone());
        }

        files
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Relabel the commit, used when copying commits in from a remote
    pub fn set_branch(&mut self, branch: String) {
        self.branch = branch;
    }

    /// Timestamp formatted like `Thu Jan 1 00:00:00 1970 +0000`
    pub fn readable_timestamp(&self) -> String {
        self.timestamp
            .format("%a %b %-d %H:%M:%S %Y %z")
            .to_string()
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parent.as_ref()
    }

    pub fn merge_parent(&self) -> Option<&ObjectId> {
        self.merge_parent.as_ref()
    }

    pub fn parents(&self) -> impl Iterator<Item = &ObjectId> {
        self.parent.iter().chain(self.merge_parent.iter())
    }

    pub fn files(&self) -> &BTreeMap<String, ObjectId> {
        &self.files
    }

    pub fn blob_id(&self, name: &str) -> Option<&ObjectId> {
        self.files.get(name)
    }

    pub fn tracks(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut lines = vec![format!("branch {}", self.branch)];

        if let Some(parent) = &self.parent {
            lines.push(format!("parent {parent}"));
        }
        if let Some(merge_parent) = &self.merge_parent {
            lines.push(format!("merge {merge_parent}"));
        }
        lines.push(format!("date {}", self.timestamp.to_rfc3339()));
        for (name, oid) in &self.files {
            lines.push(format!("blob {oid} {name}"));
        }
        lines.push(String::new());
        lines.push(self.message.to_string());

        frame(self.object_type(), lines.join("\n").as_bytes())
    }
}

impl Unpackable for Commit {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;
        let content = String::from_utf8(content)?;

        let (header, message) = content
            .split_once("\n\n")
            .context("Invalid commit object: missing message separator")?;

        let mut branch = None;
        let mut timestamp = None;
        let mut parent = None;
        let mut merge_parent = None;
        let mut files = BTreeMap::new();

        for line in header.lines() {
            let (key, value) = line
                .split_once(' ')
                .with_context(|| format!("Invalid commit object: malformed line {line:?}"))?;

            match key {
                "branch" => branch = Some(value.to_string()),
                "parent" => parent = Some(ObjectId::try_parse(value.to_string())?),
                "merge" => merge_parent = Some(ObjectId::try_parse(value.to_string())?),
                "date" => {
                    timestamp = Some(
                        chrono::DateTime::parse_from_rfc3339(value)
                            .context("Invalid commit object: invalid date line")?,
                    )
                }
                "blob" => {
                    let (oid, name) = value
                        .split_once(' ')
                        .context("Invalid commit object: invalid blob line")?;
                    files.insert(name.to_string(), ObjectId::try_parse(oid.to_string())?);
                }
                _ => anyhow::bail!("Invalid commit object: unknown header {key}"),
            }
        }

        Ok(Self::new(
            message.to_string(),
            branch.context("Invalid commit object: missing branch line")?,
            timestamp.context("Invalid commit object: missing date line")?,
            parent,
            merge_parent,
            files,
        ))
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn identity(&self) -> anyhow::Result<Bytes> {
        let mut identity = Vec::new();
        let absent = String::new();

        for field in [
            self.message.as_str(),
            self.parent.as_ref().map_or(absent.as_str(), |oid| oid.as_ref()),
            self.merge_parent
                .as_ref()
                .map_or(absent.as_str(), |oid| oid.as_ref()),
        ] {
            identity.write_all(field.as_bytes())?;
            identity.write_all(b"\0")?;
        }
        for oid in self.files.values() {
            identity.write_all(oid.as_ref().as_bytes())?;
            identity.write_all(b"\0")?;
        }

        frame(self.object_type(), &identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::core::config;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn oid(seed: char) -> ObjectId {
        ObjectId::try_parse(seed.to_string().repeat(40)).unwrap()
    }

    fn sample() -> Commit {
        Commit::new(
            "add greeting\n\nwith a body".to_string(),
            "master".to_string(),
            config::parse_timestamp("2023-01-01 12:00:00 +0200").unwrap(),
            Some(oid('a')),
            Some(oid('b')),
            BTreeMap::from([
                ("hello world.txt".to_string(), oid('c')),
                ("src/lib.rs".to_string(), oid('d')),
            ]),
        )
    }

    #[test]
    fn decodes_what_it_encodes() {
        let commit = sample();
        let mut reader = Cursor::new(commit.serialize().unwrap());
        ObjectType::parse_object_type(&mut reader).unwrap();

        assert_eq!(Commit::deserialize(reader).unwrap(), commit);
    }

    #[test]
    fn branch_tag_and_timestamp_do_not_change_identity() {
        let commit = sample();
        let mut relabelled = commit.clone();
        relabelled.set_branch("origin/master".to_string());
        relabelled.timestamp = config::epoch();

        assert_eq!(commit.object_id().unwrap(), relabelled.object_id().unwrap());
    }

    #[test]
    fn every_identity_field_changes_the_id() {
        let base = sample().object_id().unwrap();

        let mut other = sample();
        other.message = "another message".to_string();
        assert_ne!(other.object_id().unwrap(), base);

        let mut other = sample();
        other.parent = Some(oid('e'));
        assert_ne!(other.object_id().unwrap(), base);

        let mut other = sample();
        other.merge_parent = None;
        assert_ne!(other.object_id().unwrap(), base);

        let mut other = sample();
        other.files.remove("src/lib.rs");
        assert_ne!(other.object_id().unwrap(), base);
    }

    #[test]
    fn child_tree_applies_removals_then_staged_files() {
        let commit = sample();
        let staged = BTreeMap::from([
            ("src/lib.rs".to_string(), oid('e')),
            ("new.txt".to_string(), oid('f')),
        ]);
        let removed = BTreeSet::from(["hello world.txt".to_string()]);

        assert_eq!(
            commit.tree_after(&staged, &removed),
            BTreeMap::from([
                ("new.txt".to_string(), oid('f')),
                ("src/lib.rs".to_string(), oid('e')),
            ])
        );
    }
}
