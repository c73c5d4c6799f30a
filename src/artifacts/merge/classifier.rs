//! Per-file three-way classification
//!
//! Each file is judged from three versions: the split point (S), the head of the branch
//! being merged in (F) and the live working copy (W). The current head commit is not
//! consulted; whatever the user has in the working tree is what gets merged.
//!
//! | S    | F        | W              | Action      |
//! |------|----------|----------------|-------------|
//! | some | none     | W == S         | delete      |
//! | some | none     | absent         | nothing     |
//! | some | none     | W != S         | conflict    |
//! | some | F == S   | any            | nothing     |
//! | some | F != S   | W == S         | adopt F     |
//! | some | F != S   | W == F         | nothing     |
//! | some | F != S   | otherwise      | conflict    |
//! | none | some     | absent         | adopt F     |
//! | none | some     | W == F         | nothing     |
//! | none | some     | W != F         | conflict    |

use bytes::Bytes;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeAction {
    /// Remove the working file and stage the removal
    Delete,
    /// Write the merged-in content and stage it
    AdoptRemote,
    /// Write both versions between conflict markers and stage the result
    Conflict,
}

/// The three versions of one file; `None` means the file is absent there
#[derive(Debug, Clone, Copy, Default)]
pub struct FileVersions<'v> {
    pub split: Option<&'v Bytes>,
    pub from: Option<&'v Bytes>,
    pub working: Option<&'v Bytes>,
}

pub fn classify(versions: FileVersions<'_>) -> Option<MergeAction> {
    let FileVersions {
        split,
        from,
        working,
    } = versions;

    match (split, from) {
        (Some(split), None) => match working {
            None => None,
            Some(working) if working == split => Some(MergeAction::Delete),
            Some(_) => Some(MergeAction::Conflict),
        },
        (Some(split), Some(from)) if from == split => None,
        (Some(split), Some(from)) => match working {
            Some(working) if working == split => Some(MergeAction::AdoptRemote),
            Some(working) if working == from => None,
            _ => Some(MergeAction::Conflict),
        },
        (None, Some(from)) => match working {
            None => Some(MergeAction::AdoptRemote),
            Some(working) if working == from => None,
            Some(_) => Some(MergeAction::Conflict),
        },
        (None, None) => None,
    }
}

/// Classify every file, keeping only those that need an action
pub fn plan<'v>(
    files: impl IntoIterator<Item = (String, FileVersions<'v>)>,
) -> BTreeMap<String, MergeAction> {
    files
        .into_iter()
        .filter_map(|(name, versions)| classify(versions).map(|action| (name, action)))
        .collect()
}
