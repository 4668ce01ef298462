// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use thiserror::Error;

use keel_slots::SlotTable;

use crate::broad::arena::{NodeArena, NodeData, NULL};
use crate::math::Vec3;
use crate::types::handle::{Claim, TreeId, VolumeHandle};
use crate::types::volume::{BoundingVolume, GeometryError};

/// Padding ratio applied when no explicit ratio is configured.
///
/// Larger padding absorbs more movement before a leaf must be reinserted,
/// at the cost of looser internal volumes (more false-positive pruning
/// candidates). Tune per workload via [`BvhTree::with_padding`].
pub const DEFAULT_PADDING: f32 = 0.1;

/// Errors emitted by the tree.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum TreeError {
    /// The volume is already exclusively held by a different tree
    /// instance. Remove it there first.
    #[error("bounding volume is already partitioned by another tree")]
    OwnershipConflict,
    /// A query limit of zero can never produce output; reject it rather
    /// than silently returning nothing.
    #[error("query limit must be at least 1")]
    InvalidLimit,
    /// The padding ratio must lie in `(0, 1]`.
    #[error("padding ratio {0} is outside (0, 1]")]
    InvalidPadding(f32),
    /// Invalid geometry handed to a query, rejected at the boundary.
    #[error(transparent)]
    InvalidGeometry(#[from] GeometryError),
}

/// Acceptance policy applied at leaves during a query traversal.
#[derive(Clone, Copy)]
enum Acceptance {
    /// Accept leaves whose volume lies entirely inside the query region.
    Contained,
    /// Accept every leaf reached past the pruning test.
    Intersecting,
}

/// Self-balancing bounding-volume hierarchy with exclusive volume locking.
///
/// Leaves hold externally-owned volumes ([`VolumeHandle`]) paired with
/// caller elements; internal nodes hold padded volumes enclosing their
/// subtree. The tree is purely reactive: a collision driver calls
/// [`add`](Self::add)/[`remove`](Self::remove) as bodies come and go,
/// [`update_all`](Self::update_all) once per tick after movement, and the
/// query methods for broad-phase candidate retrieval.
///
/// Structural invariants (restored before every public mutation returns):
/// - AVL balance: `|height(left) − height(right)| ≤ 1` at every branch.
/// - Every branch's padded volume contains the live bounds of both
///   children.
///
/// Locking: at most one tree holds a given [`VolumeHandle`] at a time.
/// Dropping or clearing the tree releases every claim it holds.
///
/// Equality compares the multiset of `(bounds, element)` pairs — topology
/// is deliberately not part of identity, so two trees built in different
/// orders from the same content compare equal.
#[derive(Debug)]
pub struct BvhTree<V: BoundingVolume, T> {
    id: TreeId,
    arena: NodeArena<V, T>,
    slots: SlotTable<u32>,
    root: u32,
    padding: f32,
}

impl<V: BoundingVolume, T> BvhTree<V, T> {
    /// Creates an empty tree with [`DEFAULT_PADDING`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: TreeId::next(),
            arena: NodeArena::new(),
            slots: SlotTable::new(),
            root: NULL,
            padding: DEFAULT_PADDING,
        }
    }

    /// Creates an empty tree with an explicit padding ratio.
    ///
    /// # Errors
    /// Returns [`TreeError::InvalidPadding`] unless `0 < padding ≤ 1`.
    pub fn with_padding(padding: f32) -> Result<Self, TreeError> {
        if !padding.is_finite() || padding <= 0.0 || padding > 1.0 {
            return Err(TreeError::InvalidPadding(padding));
        }
        let mut tree = Self::new();
        tree.padding = padding;
        Ok(tree)
    }

    /// The configured padding ratio.
    #[must_use]
    pub fn padding(&self) -> f32 {
        self.padding
    }

    /// Number of elements (leaves) in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` when the tree holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Height of the root's subtree: 0 for an empty or single-leaf tree.
    ///
    /// With AVL balance maintained this stays within `O(log n)`.
    #[must_use]
    pub fn height(&self) -> i32 {
        if self.root == NULL {
            0
        } else {
            self.arena.node(self.root).height
        }
    }

    /// Registers `(volume, element)` in the tree.
    ///
    /// Returns `Ok(true)` when the volume was inserted, `Ok(false)` when
    /// this tree already holds it (idempotent no-op; the element argument
    /// is dropped).
    ///
    /// # Errors
    /// Returns [`TreeError::OwnershipConflict`] when a different tree
    /// instance currently holds the volume.
    pub fn add(&mut self, volume: &VolumeHandle<V>, element: T) -> Result<bool, TreeError> {
        match volume.claim_state() {
            Claim::Held { tree, .. } if tree == self.id => return Ok(false),
            Claim::Held { .. } => return Err(TreeError::OwnershipConflict),
            Claim::Free => {}
        }
        let leaf = self.arena.acquire_leaf(volume.clone(), element);
        let slot = self.slots.insert(leaf);
        volume.claim(self.id, slot);
        self.insert_leaf(leaf);
        Ok(true)
    }

    /// Unregisters `volume`, returning its element.
    ///
    /// Returns `None` (not an error) when this tree does not hold the
    /// volume. On success the volume's claim is released, so it may be
    /// added to any tree again.
    pub fn remove(&mut self, volume: &VolumeHandle<V>) -> Option<T> {
        let slot = volume.slot_in(self.id)?;
        let leaf = self.slots.remove(slot)?;
        self.detach_leaf(leaf);
        volume.release();
        match self.arena.release(leaf) {
            NodeData::Leaf { element, .. } => Some(element),
            // Slot entries only ever map to leaves.
            _ => None,
        }
    }

    /// Resynchronizes one volume after its owner moved it.
    ///
    /// Cheap check first: while the leaf's bounds remain inside its
    /// parent's padded volume nothing happens and `false` is returned.
    /// Otherwise the leaf is detached and re-descended (keeping its node,
    /// slot, and claim) and `true` is returned.
    pub fn update(&mut self, volume: &VolumeHandle<V>) -> bool {
        let Some(slot) = volume.slot_in(self.id) else {
            return false;
        };
        let Some(&leaf) = self.slots.get(slot) else {
            return false;
        };
        if self.still_contained(leaf) {
            return false;
        }
        self.reinsert(leaf);
        true
    }

    /// Resynchronizes every volume, once per simulation tick.
    ///
    /// Returns `true` when at least one leaf was reinserted. Worst case
    /// `O(n log n)`; with adequate padding, far cheaper in practice.
    pub fn update_all(&mut self) -> bool {
        let stale: Vec<u32> = self
            .slots
            .iter()
            .map(|(_, &leaf)| leaf)
            .filter(|&leaf| !self.still_contained(leaf))
            .collect();
        for &leaf in &stale {
            self.reinsert(leaf);
        }
        !stale.is_empty()
    }

    /// Collects up to `limit` elements whose volumes lie entirely inside
    /// `region`, appending them to `out` and returning the count appended.
    ///
    /// # Errors
    /// Returns [`TreeError::InvalidLimit`] when `limit` is zero.
    pub fn contained<'t>(
        &'t self,
        region: &V,
        limit: usize,
        out: &mut Vec<&'t T>,
    ) -> Result<usize, TreeError> {
        Self::check_limit(limit)?;
        Ok(self.search(region, Acceptance::Contained, NULL, limit, out))
    }

    /// Collects up to `limit` elements whose volumes intersect `region`,
    /// appending them to `out` and returning the count appended.
    ///
    /// # Errors
    /// Returns [`TreeError::InvalidLimit`] when `limit` is zero.
    pub fn intersections<'t>(
        &'t self,
        region: &V,
        limit: usize,
        out: &mut Vec<&'t T>,
    ) -> Result<usize, TreeError> {
        Self::check_limit(limit)?;
        Ok(self.search(region, Acceptance::Intersecting, NULL, limit, out))
    }

    /// Point query: collects up to `limit` elements whose volumes contain
    /// `point`, via a degenerate zero-size query volume.
    ///
    /// # Errors
    /// Returns [`TreeError::InvalidLimit`] when `limit` is zero and
    /// [`GeometryError::NonFiniteCoordinate`] for a NaN/infinite point.
    pub fn intersections_at<'t>(
        &'t self,
        point: Vec3,
        limit: usize,
        out: &mut Vec<&'t T>,
    ) -> Result<usize, TreeError> {
        Self::check_limit(limit)?;
        if !point.is_finite() {
            return Err(GeometryError::NonFiniteCoordinate.into());
        }
        let region = V::at_point(point);
        Ok(self.search(&region, Acceptance::Intersecting, NULL, limit, out))
    }

    /// Self-query: collects up to `limit` elements intersecting `volume`'s
    /// current bounds, excluding the element registered under `volume`
    /// itself. This is the broad-phase candidate retrieval a collision
    /// driver runs per body.
    ///
    /// # Errors
    /// Returns [`TreeError::InvalidLimit`] when `limit` is zero.
    pub fn intersections_with<'t>(
        &'t self,
        volume: &VolumeHandle<V>,
        limit: usize,
        out: &mut Vec<&'t T>,
    ) -> Result<usize, TreeError> {
        Self::check_limit(limit)?;
        let exclude = volume
            .slot_in(self.id)
            .and_then(|slot| self.slots.get(slot).copied())
            .unwrap_or(NULL);
        let region = volume.bounds();
        Ok(self.search(&region, Acceptance::Intersecting, exclude, limit, out))
    }

    /// Returns `true` when this tree holds `volume`.
    #[must_use]
    pub fn contains(&self, volume: &VolumeHandle<V>) -> bool {
        volume
            .slot_in(self.id)
            .is_some_and(|slot| self.slots.get(slot).is_some())
    }

    /// Returns `true` when some leaf's element equals `element`.
    ///
    /// Linear scan; intended for introspection and debugging tools, not
    /// per-tick paths.
    pub fn contains_element(&self, element: &T) -> bool
    where
        T: PartialEq,
    {
        self.slots
            .iter()
            .any(|(_, &leaf)| match &self.arena.node(leaf).data {
                NodeData::Leaf { element: held, .. } => held == element,
                _ => false,
            })
    }

    /// Empties the tree, releasing every claim and recycling every node.
    pub fn clear(&mut self) {
        self.release_claims();
        self.slots.clear();
        self.arena.clear();
        self.root = NULL;
    }

    // ── Internal: structure maintenance ────────────────────────────────

    /// Live bounds of any occupied node: leaves read through their handle,
    /// branches return the stored padded volume.
    fn bounds_of(&self, idx: u32) -> V {
        match &self.arena.node(idx).data {
            NodeData::Leaf { volume, .. } => volume.bounds(),
            NodeData::Branch { bounds } => bounds.clone(),
            NodeData::Vacant => {
                // Free nodes are never reachable from the root.
                debug_assert!(false, "vacant node reached from the root");
                V::at_point(Vec3::ZERO)
            }
        }
    }

    /// Places a detached leaf into the tree: greedy descent to the future
    /// sibling, branch splice, then climb-and-balance to the root.
    fn insert_leaf(&mut self, leaf: u32) {
        if self.root == NULL {
            self.root = leaf;
            self.arena.node_mut(leaf).parent = NULL;
            return;
        }

        let leaf_bounds = self.bounds_of(leaf);

        // Greedy descent: the child whose combined volume with the new
        // leaf measures smaller wins; ties descend left. This is a
        // nearest-neighbor heuristic, not a global optimum.
        let mut cursor = self.root;
        while !self.arena.node(cursor).is_leaf() {
            let (l, r) = {
                let node = self.arena.node(cursor);
                (node.left, node.right)
            };
            let left_measure = leaf_bounds.merged(&self.bounds_of(l)).measure();
            let right_measure = leaf_bounds.merged(&self.bounds_of(r)).measure();
            cursor = if left_measure <= right_measure { l } else { r };
        }
        let sibling = cursor;

        // Splice a new branch into the sibling's former position.
        let old_parent = self.arena.node(sibling).parent;
        let branch_bounds = leaf_bounds
            .merged(&self.bounds_of(sibling))
            .padded(self.padding);
        let branch = self.arena.acquire_branch(branch_bounds);
        {
            let node = self.arena.node_mut(branch);
            node.parent = old_parent;
            node.left = sibling;
            node.right = leaf;
        }
        self.arena.node_mut(sibling).parent = branch;
        self.arena.node_mut(leaf).parent = branch;
        if old_parent == NULL {
            self.root = branch;
        } else {
            let parent = self.arena.node_mut(old_parent);
            if parent.left == sibling {
                parent.left = branch;
            } else {
                parent.right = branch;
            }
        }

        self.climb(branch);
    }

    /// Detaches a leaf, promoting its sibling into the grandparent's slot
    /// and recycling the vacated branch. The leaf node itself survives;
    /// callers either release it (`remove`) or re-descend it (`update`).
    fn detach_leaf(&mut self, leaf: u32) {
        if self.root == leaf {
            self.root = NULL;
            return;
        }

        let parent = self.arena.node(leaf).parent;
        let grandparent = self.arena.node(parent).parent;
        let sibling = {
            let p = self.arena.node(parent);
            if p.left == leaf {
                p.right
            } else {
                p.left
            }
        };

        if grandparent == NULL {
            self.root = sibling;
            self.arena.node_mut(sibling).parent = NULL;
        } else {
            let g = self.arena.node_mut(grandparent);
            if g.left == parent {
                g.left = sibling;
            } else {
                g.right = sibling;
            }
            self.arena.node_mut(sibling).parent = grandparent;
        }

        self.arena.release(parent);
        self.arena.node_mut(leaf).parent = NULL;

        if grandparent != NULL {
            self.climb(grandparent);
        }
    }

    fn reinsert(&mut self, leaf: u32) {
        self.detach_leaf(leaf);
        self.insert_leaf(leaf);
    }

    /// Returns `true` while the leaf's live bounds remain inside its
    /// parent's padded volume. A root leaf has no parent volume to leave.
    fn still_contained(&self, leaf: u32) -> bool {
        let parent = self.arena.node(leaf).parent;
        if parent == NULL {
            return true;
        }
        let leaf_bounds = self.bounds_of(leaf);
        match &self.arena.node(parent).data {
            NodeData::Branch { bounds } => bounds.contains(&leaf_bounds),
            _ => true,
        }
    }

    /// Walks from `start` to the root, rebalancing and refreshing height
    /// and padded volume at every ancestor.
    fn climb(&mut self, start: u32) {
        let mut cursor = start;
        while cursor != NULL {
            cursor = self.rebalance(cursor);
            self.refresh(cursor);
            cursor = self.arena.node(cursor).parent;
        }
    }

    /// Recomputes a branch's height and padded volume from its children.
    fn refresh(&mut self, idx: u32) {
        let (l, r) = {
            let node = self.arena.node(idx);
            (node.left, node.right)
        };
        if l == NULL || r == NULL {
            return;
        }
        let height = 1 + self.arena.node(l).height.max(self.arena.node(r).height);
        let bounds = self
            .bounds_of(l)
            .merged(&self.bounds_of(r))
            .padded(self.padding);
        let node = self.arena.node_mut(idx);
        node.height = height;
        if let NodeData::Branch { bounds: held } = &mut node.data {
            *held = bounds;
        }
    }

    /// Restores the AVL balance at `idx` if violated, returning the node
    /// now occupying `idx`'s former position.
    ///
    /// Single or double rotation is selected by the inner subtree's own
    /// balance sign, mirroring textbook AVL rotation selection.
    fn rebalance(&mut self, idx: u32) -> u32 {
        let node = self.arena.node(idx);
        if node.is_leaf() || node.height < 2 {
            return idx;
        }
        let (l, r) = (node.left, node.right);
        let balance = self.arena.node(r).height - self.arena.node(l).height;

        if balance > 1 {
            // Right-heavy. A left-leaning right child rotates right first.
            let (rl, rr) = {
                let right = self.arena.node(r);
                (right.left, right.right)
            };
            if self.arena.node(rl).height > self.arena.node(rr).height {
                self.rotate_right(r);
            }
            self.rotate_left(idx)
        } else if balance < -1 {
            // Left-heavy. A right-leaning left child rotates left first.
            let (ll, lr) = {
                let left = self.arena.node(l);
                (left.left, left.right)
            };
            if self.arena.node(lr).height > self.arena.node(ll).height {
                self.rotate_left(l);
            }
            self.rotate_right(idx)
        } else {
            idx
        }
    }

    /// Left rotation: `idx`'s right child becomes the subtree root, `idx`
    /// adopts the pivot's left subtree. Heights and padded volumes of both
    /// touched nodes are recomputed.
    fn rotate_left(&mut self, idx: u32) -> u32 {
        let pivot = self.arena.node(idx).right;
        let inner = self.arena.node(pivot).left;
        let parent = self.arena.node(idx).parent;

        self.arena.node_mut(idx).right = inner;
        self.arena.node_mut(inner).parent = idx;

        self.arena.node_mut(pivot).left = idx;
        self.arena.node_mut(idx).parent = pivot;
        self.arena.node_mut(pivot).parent = parent;

        if parent == NULL {
            self.root = pivot;
        } else {
            let p = self.arena.node_mut(parent);
            if p.left == idx {
                p.left = pivot;
            } else {
                p.right = pivot;
            }
        }

        self.refresh(idx);
        self.refresh(pivot);
        pivot
    }

    /// Mirror of [`rotate_left`](Self::rotate_left).
    fn rotate_right(&mut self, idx: u32) -> u32 {
        let pivot = self.arena.node(idx).left;
        let inner = self.arena.node(pivot).right;
        let parent = self.arena.node(idx).parent;

        self.arena.node_mut(idx).left = inner;
        self.arena.node_mut(inner).parent = idx;

        self.arena.node_mut(pivot).right = idx;
        self.arena.node_mut(idx).parent = pivot;
        self.arena.node_mut(pivot).parent = parent;

        if parent == NULL {
            self.root = pivot;
        } else {
            let p = self.arena.node_mut(parent);
            if p.left == idx {
                p.left = pivot;
            } else {
                p.right = pivot;
            }
        }

        self.refresh(idx);
        self.refresh(pivot);
        pivot
    }

    // ── Internal: queries ──────────────────────────────────────────────

    fn check_limit(limit: usize) -> Result<(), TreeError> {
        if limit == 0 {
            return Err(TreeError::InvalidLimit);
        }
        Ok(())
    }

    /// Explicit-stack depth-first traversal with subtree pruning.
    ///
    /// Subtrees whose volumes miss `region` are skipped whole; leaves
    /// passing the acceptance policy append their element until `limit`
    /// is reached. `exclude` names a leaf to skip (self-queries) or
    /// `NULL`.
    fn search<'t>(
        &'t self,
        region: &V,
        acceptance: Acceptance,
        exclude: u32,
        limit: usize,
        out: &mut Vec<&'t T>,
    ) -> usize {
        if self.root == NULL {
            return 0;
        }
        let mut appended = 0;
        let mut stack: Vec<u32> = Vec::with_capacity(64);
        stack.push(self.root);

        while let Some(idx) = stack.pop() {
            if appended == limit {
                break;
            }
            let bounds = self.bounds_of(idx);
            if !region.intersects(&bounds) {
                continue;
            }
            let node = self.arena.node(idx);
            match &node.data {
                NodeData::Leaf { element, .. } => {
                    if idx == exclude {
                        continue;
                    }
                    let accept = match acceptance {
                        Acceptance::Contained => region.contains(&bounds),
                        Acceptance::Intersecting => true,
                    };
                    if accept {
                        out.push(element);
                        appended += 1;
                    }
                }
                NodeData::Branch { .. } => {
                    stack.push(node.left);
                    stack.push(node.right);
                }
                NodeData::Vacant => {}
            }
        }
        appended
    }

    /// Occupied `(bounds, element)` pairs, in slot order.
    fn leaf_pairs(&self) -> impl Iterator<Item = (V, &T)> + '_ {
        self.slots
            .iter()
            .filter_map(|(_, &leaf)| match &self.arena.node(leaf).data {
                NodeData::Leaf { volume, element } => Some((volume.bounds(), element)),
                _ => None,
            })
    }

    fn release_claims(&self) {
        for (_, &leaf) in self.slots.iter() {
            if let NodeData::Leaf { volume, .. } = &self.arena.node(leaf).data {
                volume.release();
            }
        }
    }
}

impl<V: BoundingVolume, T> Default for BvhTree<V, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: BoundingVolume, T> Drop for BvhTree<V, T> {
    /// A dropped tree releases every claim it holds, so its volumes can be
    /// added to other trees.
    fn drop(&mut self) {
        self.release_claims();
    }
}

impl<V: BoundingVolume, T: PartialEq> PartialEq for BvhTree<V, T> {
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        let theirs: Vec<(V, &T)> = other.leaf_pairs().collect();
        let mut matched = vec![false; theirs.len()];
        for (bounds, element) in self.leaf_pairs() {
            let mut found = None;
            for (i, (b, e)) in theirs.iter().enumerate() {
                if !matched[i] && *b == bounds && *e == element {
                    found = Some(i);
                    break;
                }
            }
            match found {
                Some(i) => matched[i] = true,
                None => return false,
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::expect_used)]
    #![allow(clippy::panic)]

    use super::*;
    use crate::types::aabb::Aabb;

    fn unit_box(x: f32, y: f32, z: f32) -> VolumeHandle<Aabb> {
        VolumeHandle::new(
            Aabb::from_center_half_extents(Vec3::new(x, y, z), 0.5, 0.5, 0.5).expect("valid box"),
        )
    }

    /// Walks the whole tree verifying parent links, the leaf/branch
    /// structure invariant, stored heights, AVL balance, and live child
    /// containment. Returns the subtree height.
    fn check_node<T>(tree: &BvhTree<Aabb, T>, idx: u32, parent: u32) -> i32 {
        let node = tree.arena.node(idx);
        assert_eq!(node.parent, parent, "parent link broken at {idx}");
        match &node.data {
            NodeData::Leaf { .. } => {
                assert_eq!(node.left, NULL);
                assert_eq!(node.right, NULL);
                assert_eq!(node.height, 0);
                0
            }
            NodeData::Branch { bounds } => {
                assert_ne!(node.left, NULL);
                assert_ne!(node.right, NULL);
                let lh = check_node(tree, node.left, idx);
                let rh = check_node(tree, node.right, idx);
                assert!((lh - rh).abs() <= 1, "unbalanced at {idx}");
                assert_eq!(node.height, 1 + lh.max(rh), "stale height at {idx}");
                assert!(
                    bounds.contains(&tree.bounds_of(node.left)),
                    "left child escapes padded bounds at {idx}"
                );
                assert!(
                    bounds.contains(&tree.bounds_of(node.right)),
                    "right child escapes padded bounds at {idx}"
                );
                node.height
            }
            NodeData::Vacant => panic!("vacant node reachable at {idx}"),
        }
    }

    fn assert_invariants<T>(tree: &BvhTree<Aabb, T>) {
        if tree.root != NULL {
            check_node(tree, tree.root, NULL);
        }
    }

    #[test]
    fn sequential_inserts_keep_structure_sound() {
        let mut tree = BvhTree::new();
        let handles: Vec<_> = (0..32)
            .map(|i| {
                let idx = f32::from(u8::try_from(i).expect("small index"));
                unit_box(idx * 3.0, 0.0, 0.0)
            })
            .collect();
        for (i, h) in handles.iter().enumerate() {
            assert_eq!(
                tree.add(h, i32::try_from(i).expect("small index")),
                Ok(true)
            );
            assert_invariants(&tree);
        }
        assert_eq!(tree.len(), 32);
    }

    #[test]
    fn interleaved_removals_keep_structure_sound() {
        let mut tree = BvhTree::new();
        let handles: Vec<_> = (0..24)
            .map(|i| {
                let idx = f32::from(u8::try_from(i).expect("small index"));
                unit_box(idx * 2.0, idx, 0.0)
            })
            .collect();
        for (i, h) in handles.iter().enumerate() {
            tree.add(h, i32::try_from(i).expect("small index"))
                .expect("fresh volume");
        }
        // Remove every other element, verifying structure after each.
        for (i, h) in handles.iter().enumerate().step_by(2) {
            assert_eq!(tree.remove(h), Some(i32::try_from(i).expect("small index")));
            assert_invariants(&tree);
        }
        assert_eq!(tree.len(), 12);
    }

    #[test]
    fn update_reinserts_only_escaped_leaves() {
        let mut tree = BvhTree::new();
        let a = unit_box(0.0, 0.0, 0.0);
        let b = unit_box(2.0, 0.0, 0.0);
        let c = unit_box(4.0, 0.0, 0.0);
        tree.add(&a, 1).expect("fresh volume");
        tree.add(&b, 2).expect("fresh volume");
        tree.add(&c, 3).expect("fresh volume");

        // Unmoved: the cheap check short-circuits.
        assert!(!tree.update(&a));

        // Far move: must reinsert and stay structurally sound.
        a.set_bounds(
            Aabb::from_center_half_extents(Vec3::new(50.0, 0.0, 0.0), 0.5, 0.5, 0.5)
                .expect("valid box"),
        );
        assert!(tree.update(&a));
        assert_invariants(&tree);
        assert!(!tree.update(&a));
    }

    #[test]
    fn with_padding_validates_range() {
        assert!(matches!(
            BvhTree::<Aabb, i32>::with_padding(0.0),
            Err(TreeError::InvalidPadding(_))
        ));
        assert!(matches!(
            BvhTree::<Aabb, i32>::with_padding(1.5),
            Err(TreeError::InvalidPadding(_))
        ));
        assert!(matches!(
            BvhTree::<Aabb, i32>::with_padding(f32::NAN),
            Err(TreeError::InvalidPadding(_))
        ));
        let tree = BvhTree::<Aabb, i32>::with_padding(1.0).expect("legal padding");
        assert_eq!(tree.padding(), 1.0);
    }

    #[test]
    fn dropping_a_tree_releases_claims() {
        let handle = unit_box(0.0, 0.0, 0.0);
        {
            let mut tree = BvhTree::new();
            tree.add(&handle, 1).expect("fresh volume");
            assert!(handle.is_partitioned());
        }
        assert!(!handle.is_partitioned());
    }
}
