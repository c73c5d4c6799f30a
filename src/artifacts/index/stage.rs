use crate::artifacts::index::{SIGNATURE, VERSION};
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::{Context, anyhow};
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet};
use std::io::BufRead;

/// Pending changes for the next commit
///
/// `staged` maps a file name to the blob captured when it was added; `removed` holds the
/// names deleted since the last commit. A name is never in both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stage {
    staged: BTreeMap<String, ObjectId>,
    removed: BTreeSet<String>,
}

impl Stage {
    pub fn stage(&mut self, name: String, blob_id: ObjectId) {
        self.removed.remove(&name);
        self.staged.insert(name, blob_id);
    }

    pub fn unstage(&mut self, name: &str) -> Option<ObjectId> {
        self.staged.remove(name)
    }

    pub fn mark_removed(&mut self, name: String) {
        self.staged.remove(&name);
        self.removed.insert(name);
    }

    pub fn unmark_removed(&mut self, name: &str) -> bool {
        self.removed.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.staged.contains_key(name)
    }

    pub fn is_removed(&self, name: &str) -> bool {
        self.removed.contains(name)
    }

    pub fn blob_id(&self, name: &str) -> Option<&ObjectId> {
        self.staged.get(name)
    }

    /// Nothing staged and nothing removed
    pub fn is_empty(&self) -> bool {
        self.staged.is_empty() && self.removed.is_empty()
    }

    pub fn clear(&mut self) {
        self.staged.clear();
        self.removed.clear();
    }

    pub fn staged(&self) -> &BTreeMap<String, ObjectId> {
        &self.staged
    }

    pub fn removed(&self) -> &BTreeSet<String> {
        &self.removed
    }

    fn entries_count(&self) -> usize {
        self.staged.len() + self.removed.len()
    }
}

impl Packable for Stage {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut lines = vec![format!("{SIGNATURE} {VERSION} {}", self.entries_count())];

        for (name, blob_id) in &self.staged {
            lines.push(format!("staged {blob_id} {name}"));
        }
        for name in &self.removed {
            lines.push(format!("removed {name}"));
        }

        let mut content = lines.join("\n");
        content.push('\n');

        Ok(Bytes::from(content))
    }
}

impl Unpackable for Stage {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let mut lines = reader.lines();

        let header = lines
            .next()
            .context("Invalid index file: missing header")??;
        let mut header = header.split(' ');
        if header.next() != Some(SIGNATURE) {
            return Err(anyhow!("Invalid index file signature"));
        }
        let version = header
            .next()
            .and_then(|version| version.parse::<u32>().ok())
            .context("Invalid index file: malformed version")?;
        if version != VERSION {
            return Err(anyhow!("Unsupported index file version: {version}"));
        }
        let entries_count = header
            .next()
            .and_then(|count| count.parse::<usize>().ok())
            .context("Invalid index file: malformed entry count")?;

        let mut stage = Stage::default();
        for line in lines {
            let line = line?;
            match line.split_once(' ') {
                Some(("staged", entry)) => {
                    let (blob_id, name) = entry
                        .split_once(' ')
                        .context("Invalid index file: malformed staged entry")?;
                    stage
                        .staged
                        .insert(name.to_string(), ObjectId::try_parse(blob_id.to_string())?);
                }
                Some(("removed", name)) => {
                    stage.removed.insert(name.to_string());
                }
                _ => return Err(anyhow!("Invalid index file: unknown entry {line:?}")),
            }
        }

        if stage.entries_count() != entries_count {
            return Err(anyhow!(
                "Invalid index file: expected {entries_count} entries, found {}",
                stage.entries_count()
            ));
        }

        Ok(stage)
    }
}
