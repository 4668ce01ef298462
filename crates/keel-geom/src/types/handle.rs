// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of one tree instance, used by the exclusive-claim protocol to
/// tell "re-added to the same tree" (a no-op) apart from "claimed by a
/// different tree" (a conflict).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeId(u64);

impl TreeId {
    /// Hands out the next process-unique identity.
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Claim state of a shared volume: free, or held by exactly one tree.
///
/// Transitions: `Free → Held` on add, `Held → Free` on remove/clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Claim {
    Free,
    Held { tree: TreeId, slot: usize },
}

#[derive(Debug)]
struct HandleInner<V> {
    bounds: RefCell<V>,
    claim: Cell<Claim>,
}

/// Shared bounding volume owned by an external element (a physics body)
/// and readable by the tree that claims it.
///
/// Sharing discipline — one writer per field:
/// - The **owner** mutates geometry via [`set_bounds`](Self::set_bounds)
///   and never touches the claim.
/// - The **tree** mutates only the claim and never touches geometry.
///
/// Cloning a handle clones the reference, not the volume: all clones see
/// the same geometry and the same claim. Identity for the claim protocol
/// is reference identity ([`same`](Self::same)); geometric equality is
/// value equality of [`bounds`](Self::bounds).
#[derive(Debug)]
pub struct VolumeHandle<V> {
    inner: Rc<HandleInner<V>>,
}

impl<V> Clone for VolumeHandle<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<V: Clone> VolumeHandle<V> {
    /// Wraps a validated volume in a fresh, unclaimed handle.
    #[must_use]
    pub fn new(bounds: V) -> Self {
        Self {
            inner: Rc::new(HandleInner {
                bounds: RefCell::new(bounds),
                claim: Cell::new(Claim::Free),
            }),
        }
    }

    /// Returns a copy of the current geometry.
    #[must_use]
    pub fn bounds(&self) -> V {
        self.inner.bounds.borrow().clone()
    }

    /// Replaces the geometry. Owner-side mutation: the claim is untouched,
    /// and the holding tree (if any) picks the move up on its next
    /// `update` sweep.
    pub fn set_bounds(&self, bounds: V) {
        *self.inner.bounds.borrow_mut() = bounds;
    }

    /// Returns `true` while some tree holds this volume.
    #[must_use]
    pub fn is_partitioned(&self) -> bool {
        matches!(self.inner.claim.get(), Claim::Held { .. })
    }

    /// Returns `true` when both handles refer to the same shared volume.
    #[must_use]
    pub fn same(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn claim_state(&self) -> Claim {
        self.inner.claim.get()
    }

    pub(crate) fn claim(&self, tree: TreeId, slot: usize) {
        self.inner.claim.set(Claim::Held { tree, slot });
    }

    pub(crate) fn release(&self) {
        self.inner.claim.set(Claim::Free);
    }

    /// The slot this volume occupies in `tree`, if that tree holds it.
    pub(crate) fn slot_in(&self, tree: TreeId) -> Option<usize> {
        match self.inner.claim.get() {
            Claim::Held { tree: holder, slot } if holder == tree => Some(slot),
            _ => None,
        }
    }
}
