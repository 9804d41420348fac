//! Skeleton graph of shared branches.
//!
//! Branches are stored in an arena and referenced by [`BranchId`]. Edges point
//! from child to parent: each branch has at most one parent, and the graph is
//! kept acyclic, so it is a forest. Children are kept ordered by id, which
//! makes every traversal deterministic.

use std::{
    collections::{BTreeMap, BTreeSet, VecDeque},
    fmt,
    sync::Arc,
};

use thiserror::Error;
use tracing::{debug, warn};

use super::{
    SharedBranch,
    model::{ConversionError, ModelMeta, ToObj},
};

/// Identifier of a branch within a [`GraphSkeleton`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BranchId(usize);

impl BranchId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for BranchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Errors raised when editing the linkage of a [`GraphSkeleton`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum GraphError {
    #[error("unknown branch {0}")]
    UnknownBranch(BranchId),

    #[error("attaching {child} under {parent} would create a cycle")]
    Cycle { child: BranchId, parent: BranchId },

    #[error("branch {child} is already attached under {parent}")]
    AlreadyAttached { child: BranchId, parent: BranchId },
}

/// Skeleton made of branches linked in parent/child relations.
///
/// Branches are shared: the skeleton holds a [`SharedBranch`] per id, and the
/// same branch may be held elsewhere (or by several skeletons). Removing a
/// branch from a skeleton never invalidates outside handles.
///
/// Every branch of a skeleton uses the storage dimension `S` of model `M`.
/// A skeleton also carries a model, used as the default one; branches built
/// with another model instance are accepted but logged.
pub struct GraphSkeleton<M, const S: usize> {
    model: Arc<M>,
    branches: BTreeMap<BranchId, SharedBranch<M, S>>,
    parents: BTreeMap<BranchId, BranchId>,
    children: BTreeMap<BranchId, BTreeSet<BranchId>>,
    next_id: usize,
}

impl<M: ModelMeta, const S: usize> GraphSkeleton<M, S> {
    /// Creates an empty skeleton.
    #[must_use]
    pub fn new(model: Arc<M>) -> Self {
        Self {
            model,
            branches: BTreeMap::new(),
            parents: BTreeMap::new(),
            children: BTreeMap::new(),
            next_id: 0,
        }
    }

    #[must_use]
    pub fn model(&self) -> &Arc<M> {
        &self.model
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.branches.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    /// Adds an unattached branch and returns its id.
    ///
    /// Accepts an owned [`GraphBranch`](super::GraphBranch) or a [`SharedBranch`].
    pub fn add_branch(&mut self, branch: impl Into<SharedBranch<M, S>>) -> BranchId {
        let branch = branch.into();
        let id = BranchId(self.next_id);
        self.next_id += 1;

        if !Arc::ptr_eq(branch.model(), &self.model) {
            warn!(%id, "branch does not share the skeleton model");
        }
        debug!(%id, "added branch");

        self.branches.insert(id, branch);
        id
    }

    #[must_use]
    pub fn branch(&self, id: BranchId) -> Option<&SharedBranch<M, S>> {
        self.branches.get(&id)
    }

    /// Iterates over all branches in id order.
    pub fn branches(&self) -> impl Iterator<Item = (BranchId, &SharedBranch<M, S>)> {
        self.branches.iter().map(|(id, branch)| (*id, branch))
    }

    /// Attaches `child` under `parent`.
    ///
    /// # Errors
    ///
    /// Returns a [`GraphError`] if either branch is unknown, if `child` already
    /// has a parent, or if `parent` is `child` or one of its descendants.
    pub fn attach(&mut self, child: BranchId, parent: BranchId) -> Result<(), GraphError> {
        self.ensure(child)?;
        self.ensure(parent)?;

        if let Some(&existing) = self.parents.get(&child) {
            return Err(GraphError::AlreadyAttached {
                child,
                parent: existing,
            });
        }
        if child == parent || self.ancestors(parent).contains(&child) {
            debug!(%child, %parent, "rejected cyclic attachment");
            return Err(GraphError::Cycle { child, parent });
        }

        self.parents.insert(child, parent);
        self.children.entry(parent).or_default().insert(child);
        debug!(%child, %parent, "attached branch");
        Ok(())
    }

    /// Detaches `child` from its parent and returns the former parent.
    pub fn detach(&mut self, child: BranchId) -> Option<BranchId> {
        let parent = self.parents.remove(&child)?;
        if let Some(siblings) = self.children.get_mut(&parent) {
            siblings.remove(&child);
            if siblings.is_empty() {
                self.children.remove(&parent);
            }
        }
        debug!(%child, %parent, "detached branch");
        Some(parent)
    }

    /// Removes a branch; its children become roots.
    ///
    /// Returns the removed branch, or `None` if `id` is unknown.
    pub fn remove_branch(&mut self, id: BranchId) -> Option<SharedBranch<M, S>> {
        let branch = self.branches.remove(&id)?;
        self.detach(id);
        for child in self.children.remove(&id).unwrap_or_default() {
            self.parents.remove(&child);
        }
        debug!(%id, "removed branch");
        Some(branch)
    }

    #[must_use]
    pub fn parent(&self, id: BranchId) -> Option<BranchId> {
        self.parents.get(&id).copied()
    }

    /// Direct children of `id`, in id order.
    #[must_use]
    pub fn children(&self, id: BranchId) -> Vec<BranchId> {
        self.children
            .get(&id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Branches without a parent, in id order.
    #[must_use]
    pub fn roots(&self) -> Vec<BranchId> {
        self.branches
            .keys()
            .filter(|id| !self.parents.contains_key(*id))
            .copied()
            .collect()
    }

    /// Ancestors of `id`, from its parent up to its root.
    #[must_use]
    pub fn ancestors(&self, id: BranchId) -> Vec<BranchId> {
        let mut res = Vec::new();
        let mut current = id;
        while let Some(&parent) = self.parents.get(&current) {
            res.push(parent);
            current = parent;
        }
        res
    }

    /// Descendants of `id` in breadth-first order, excluding `id`.
    #[must_use]
    pub fn descendants(&self, id: BranchId) -> Vec<BranchId> {
        let mut res = Vec::new();
        let mut queue = VecDeque::from([id]);
        while let Some(current) = queue.pop_front() {
            for child in self.children(current) {
                res.push(child);
                queue.push_back(child);
            }
        }
        res
    }

    /// All branches, depth first from each root, parents before children.
    #[must_use]
    pub fn traverse(&self) -> Vec<BranchId> {
        let mut res = Vec::with_capacity(self.len());
        let mut stack: Vec<BranchId> = self.roots().into_iter().rev().collect();
        while let Some(current) = stack.pop() {
            res.push(current);
            stack.extend(self.children(current).into_iter().rev());
        }
        res
    }

    /// Objects along every branch, in [`traverse`](Self::traverse) order.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConversionError`] raised by a sample.
    pub fn discretize<Obj>(
        &self,
        samples: usize,
    ) -> Result<Vec<(BranchId, Vec<Obj>)>, ConversionError>
    where
        M: ToObj<Obj, S>,
    {
        self.traverse()
            .into_iter()
            .filter_map(|id| self.branches.get(&id).map(|branch| (id, branch)))
            .map(|(id, branch)| branch.discretize(samples).map(|objects| (id, objects)))
            .collect()
    }

    fn ensure(&self, id: BranchId) -> Result<(), GraphError> {
        if self.branches.contains_key(&id) {
            Ok(())
        } else {
            Err(GraphError::UnknownBranch(id))
        }
    }
}

impl<M: fmt::Debug, const S: usize> fmt::Debug for GraphSkeleton<M, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphSkeleton")
            .field("model", &self.model)
            .field("branches", &self.branches.keys().collect::<Vec<_>>())
            .field("parents", &self.parents)
            .finish()
    }
}
