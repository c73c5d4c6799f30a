//! Split point search
//!
//! Finds the commit used as the base of a three-way merge between two branch heads.
//!
//! ## Algorithm
//!
//! 1. Breadth-first walk from each head over both parents (first parent and merge
//!    parent), recording the true graph distance of every reachable commit.
//! 2. Commits reached from both sides are common ancestors.
//! 3. **Best common ancestor invariant**: a common ancestor that is itself an ancestor of
//!    another common ancestor is redundant and dropped. One walk down from the parents of
//!    every common ancestor marks them all.
//! 4. Among the remaining candidates, pick the one with the smallest combined distance
//!    to the two heads; ties go to the lexically smallest ID so the choice is stable.
//!
//! Commits are loaded through a caller-supplied function, so the search runs the same
//! against the object database and against in-memory graphs in tests.

use crate::artifacts::objects::commit::SlimCommit;
use crate::artifacts::objects::object_id::ObjectId;
use bitflags::bitflags;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt;

bitflags! {
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    struct VisitState: u8 {
        const FROM_CURRENT = 0b001;
        const FROM_TARGET = 0b010;
        const COMMON = Self::FROM_CURRENT.bits() | Self::FROM_TARGET.bits();
        /// Common ancestor reachable from another common ancestor
        const REDUNDANT = 0b100;
    }
}

impl fmt::Debug for VisitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut flags = Vec::new();
        if self.contains(VisitState::FROM_CURRENT) {
            flags.push("CURRENT");
        }
        if self.contains(VisitState::FROM_TARGET) {
            flags.push("TARGET");
        }
        if self.contains(VisitState::REDUNDANT) {
            flags.push("REDUNDANT");
        }
        if flags.is_empty() {
            write!(f, "NONE")
        } else {
            write!(f, "{}", flags.join("|"))
        }
    }
}

pub struct SplitPointFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    commit_loader: CommitLoaderFn,
}

impl<CommitLoaderFn> SplitPointFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    pub fn new(commit_loader: CommitLoaderFn) -> Self {
        Self { commit_loader }
    }

    /// Best common ancestor of `current` and `target`, `None` when the histories are disjoint
    pub fn find(&self, current: &ObjectId, target: &ObjectId) -> anyhow::Result<Option<ObjectId>> {
        let mut parents = HashMap::new();
        let from_current = self.distances(current, &mut parents)?;
        let from_target = self.distances(target, &mut parents)?;

        let mut states = HashMap::<&ObjectId, VisitState>::new();
        for oid in from_current.keys() {
            *states.entry(oid).or_default() |= VisitState::FROM_CURRENT;
        }
        for oid in from_target.keys() {
            *states.entry(oid).or_default() |= VisitState::FROM_TARGET;
        }

        // every proper ancestor of a common ancestor is itself common and redundant
        let mut queue = states
            .iter()
            .filter(|(_, state)| state.contains(VisitState::COMMON))
            .flat_map(|(oid, _)| parents.get(*oid).into_iter().flatten().cloned())
            .collect::<VecDeque<_>>();
        while let Some(oid) = queue.pop_front() {
            let Some(state) = states.get_mut(&oid) else {
                continue;
            };
            if state.contains(VisitState::REDUNDANT) {
                continue;
            }
            *state |= VisitState::REDUNDANT;
            queue.extend(parents.get(&oid).into_iter().flatten().cloned());
        }

        tracing::trace!(
            states = ?states
                .iter()
                .filter(|(_, state)| state.contains(VisitState::COMMON))
                .collect::<Vec<_>>(),
            "common ancestors"
        );

        let split_point = states
            .into_iter()
            .filter(|(_, state)| {
                state.contains(VisitState::COMMON) && !state.contains(VisitState::REDUNDANT)
            })
            .map(|(oid, _)| (from_current[oid] + from_target[oid], oid))
            .min()
            .map(|(_, oid)| oid.clone());

        if let Some(split_point) = &split_point {
            tracing::debug!(%current, %target, %split_point, "found split point");
        }

        Ok(split_point)
    }

    /// Shortest distance from `head` to every commit reachable from it
    ///
    /// Parent lists are cached in `parents`, so a commit is loaded at most once per search.
    fn distances(
        &self,
        head: &ObjectId,
        parents: &mut HashMap<ObjectId, Vec<ObjectId>>,
    ) -> anyhow::Result<BTreeMap<ObjectId, usize>> {
        let mut distances = BTreeMap::from([(head.clone(), 0)]);
        let mut queue = VecDeque::from([head.clone()]);

        while let Some(oid) = queue.pop_front() {
            let distance = distances[&oid];
            let commit_parents = match parents.get(&oid) {
                Some(commit_parents) => commit_parents.clone(),
                None => {
                    let commit = (self.commit_loader)(&oid)?;
                    parents.insert(oid, commit.parents.clone());
                    commit.parents
                }
            };

            for parent in commit_parents {
                if !distances.contains_key(&parent) {
                    distances.insert(parent.clone(), distance + 1);
                    queue.push_back(parent);
                }
            }
        }

        Ok(distances)
    }
}
