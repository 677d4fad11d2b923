//! Formal invariants for the object tree
//!
//! Runtime-checkable invariants that must hold at every quiescent point.
//! These are used for:
//! 1. Assertion checking in debug ports after each mutation
//! 2. Property-based testing with proptest
//! 3. Formal verification with Kani
//!
//! # Invariants
//!
//! 1. **Live Magic**: Every object reachable from root carries the live magic
//! 2. **List Membership**: A live object is linked exactly once in its
//!    parent's child-list; a dead one is unlinked
//! 3. **Child Back-References**: Every live element of a child-list points
//!    back at the list owner
//! 4. **Tree Shape**: Parent edges have no cycles and every live object is
//!    reachable from root (no orphans)
//! 5. **Unique Names**: Live siblings have distinct names
//! 6. **Link Symmetry**: `x.next.prev == x` and `x.prev.next == x`
//!
//! Orphans are legal transient states under
//! [`UnregisterPolicy::Orphan`](crate::UnregisterPolicy::Orphan), so
//! [`check_structure`] checks everything except the no-orphan half of
//! invariant 4 and [`check_all_invariants`] adds it.

use alloc::string::String;
use alloc::vec::Vec;

use crate::list::{self, LinkId, LinkKind, Links};
use crate::tree::ObjectTree;
use crate::types::ObjectId;

/// An invariant violation with details
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Name of the violated invariant
    pub invariant: &'static str,
    /// Description of what went wrong
    pub description: String,
}

impl InvariantViolation {
    fn new(invariant: &'static str, description: String) -> Self {
        Self {
            invariant,
            description,
        }
    }
}

/// Check all tree invariants.
///
/// Returns a list of violations (empty if all invariants hold).
pub fn check_all_invariants<T, const N: usize>(tree: &ObjectTree<T, N>) -> Vec<InvariantViolation> {
    let mut violations = check_structure(tree);
    violations.extend(check_no_orphans(tree));
    violations
}

/// Check every invariant except "no orphaned live objects".
pub fn check_structure<T, const N: usize>(tree: &ObjectTree<T, N>) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    // Symmetry first: the other checks walk lists and assume sane links
    violations.extend(check_link_symmetry(tree));
    if !violations.is_empty() {
        return violations;
    }

    violations.extend(check_live_magic(tree));
    violations.extend(check_list_membership(tree));
    violations.extend(check_child_back_references(tree));
    violations.extend(check_acyclic(tree));
    violations.extend(check_unique_names(tree));

    violations
}

/// Live objects whose parent chain does not reach root.
pub fn orphans<T, const N: usize>(tree: &ObjectTree<T, N>) -> Vec<ObjectId> {
    tree.reserved()
        .filter(|&id| tree.is_registered(id))
        .filter(|&id| !reaches_root(tree, id))
        .collect()
}

fn all_objects<T, const N: usize>(tree: &ObjectTree<T, N>) -> impl Iterator<Item = ObjectId> + '_ {
    core::iter::once(ObjectId::ROOT).chain(tree.reserved())
}

/// Follow parent edges from `id`; true if root is reached through live
/// objects within `N + 1` hops.
fn reaches_root<T, const N: usize>(tree: &ObjectTree<T, N>, id: ObjectId) -> bool {
    let mut current = id;
    for _ in 0..=N {
        if current.is_root() {
            return true;
        }
        match tree.parent(current) {
            Some(parent) => current = parent,
            None => return false,
        }
    }
    false
}

/// Invariant 6: every initialised link is symmetric and points into the arena
fn check_link_symmetry<T, const N: usize>(tree: &ObjectTree<T, N>) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    for id in all_objects(tree) {
        let Some(object) = tree.object(id) else {
            continue;
        };
        let links = [
            (LinkKind::Sibling, object.sibling_link()),
            (LinkKind::Children, object.children_link()),
        ];
        for (kind, link) in links {
            let own = LinkId { object: id, kind };
            let (next, prev) = match (link.next(), link.prev()) {
                (Some(next), Some(prev)) => (next, prev),
                (None, None) => continue,
                _ => {
                    violations.push(InvariantViolation::new(
                        "link_symmetry",
                        alloc::format!("{} {:?} link is half initialised", id, kind),
                    ));
                    continue;
                }
            };

            if tree.object(next.object).is_none() || tree.object(prev.object).is_none() {
                violations.push(InvariantViolation::new(
                    "link_symmetry",
                    alloc::format!("{} {:?} link points at an unreserved slot", id, kind),
                ));
                continue;
            }
            if tree.link(next).prev() != Some(own) {
                violations.push(InvariantViolation::new(
                    "link_symmetry",
                    alloc::format!("{} {:?}: next.prev does not point back", id, kind),
                ));
            }
            if tree.link(prev).next() != Some(own) {
                violations.push(InvariantViolation::new(
                    "link_symmetry",
                    alloc::format!("{} {:?}: prev.next does not point back", id, kind),
                ));
            }
        }
    }

    violations
}

/// Invariant 1: every object reachable from root is live
fn check_live_magic<T, const N: usize>(tree: &ObjectTree<T, N>) -> Vec<InvariantViolation> {
    tree.walk(ObjectId::ROOT)
        .take(N + 1)
        .filter(|entry| !tree.is_registered(entry.id))
        .map(|entry| {
            InvariantViolation::new(
                "live_magic",
                alloc::format!(
                    "{} is reachable from root but has magic {:#x}",
                    entry.id,
                    tree.object(entry.id).map_or(0, |o| o.magic())
                ),
            )
        })
        .collect()
}

/// Invariant 2: live objects sit exactly once in their parent's list,
/// dead ones are unlinked
fn check_list_membership<T, const N: usize>(tree: &ObjectTree<T, N>) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    for id in tree.reserved() {
        let own = LinkId::sibling(id);
        if !tree.is_registered(id) {
            if !list::is_empty(tree, own) {
                violations.push(InvariantViolation::new(
                    "list_membership",
                    alloc::format!("{} is unregistered but still linked", id),
                ));
            }
            continue;
        }

        let Some(parent) = tree.parent(id) else {
            violations.push(InvariantViolation::new(
                "list_membership",
                alloc::format!("{} is live without a parent", id),
            ));
            continue;
        };
        if tree.object(parent).is_none() {
            violations.push(InvariantViolation::new(
                "list_membership",
                alloc::format!("{} has parent {} which is not reserved", id, parent),
            ));
            continue;
        }

        let occurrences = list::iter(tree, LinkId::children(parent))
            .take(N + 1)
            .filter(|&link| link == own)
            .count();
        if occurrences != 1 {
            violations.push(InvariantViolation::new(
                "list_membership",
                alloc::format!(
                    "{} appears {} times in the child-list of {}",
                    id,
                    occurrences,
                    parent
                ),
            ));
        }
    }

    violations
}

/// Invariant 3: child-list elements are sibling links whose owners point back
fn check_child_back_references<T, const N: usize>(
    tree: &ObjectTree<T, N>,
) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    for id in all_objects(tree) {
        for link in list::iter(tree, LinkId::children(id)).take(N + 1) {
            if link.kind != LinkKind::Sibling {
                violations.push(InvariantViolation::new(
                    "child_back_reference",
                    alloc::format!("child-list of {} contains a list head", id),
                ));
                continue;
            }
            let child = link.object;
            if tree.is_registered(child) && tree.parent(child) != Some(id) {
                violations.push(InvariantViolation::new(
                    "child_back_reference",
                    alloc::format!(
                        "{} is linked under {} but its parent is {:?}",
                        child,
                        id,
                        tree.parent(child)
                    ),
                ));
            }
        }
    }

    violations
}

/// Invariant 4 (first half): parent edges contain no cycle
fn check_acyclic<T, const N: usize>(tree: &ObjectTree<T, N>) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    for id in tree.reserved() {
        let mut current = id;
        let mut hops = 0;
        while let Some(parent) = tree.object(current).and_then(|o| o.parent()) {
            hops += 1;
            if parent == id || hops > N {
                violations.push(InvariantViolation::new(
                    "tree_shape",
                    alloc::format!("parent chain of {} contains a cycle", id),
                ));
                break;
            }
            current = parent;
        }
    }

    violations
}

/// Invariant 4 (second half): every live object is reachable from root
fn check_no_orphans<T, const N: usize>(tree: &ObjectTree<T, N>) -> Vec<InvariantViolation> {
    orphans(tree)
        .into_iter()
        .map(|id| {
            InvariantViolation::new(
                "tree_shape",
                alloc::format!("{} is live but not reachable from root", id),
            )
        })
        .collect()
}

/// Invariant 5: live siblings have distinct names
fn check_unique_names<T, const N: usize>(tree: &ObjectTree<T, N>) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    for id in all_objects(tree) {
        let live: Vec<ObjectId> = tree
            .children(id)
            .take(N + 1)
            .filter(|&child| tree.is_registered(child))
            .collect();
        for (i, &a) in live.iter().enumerate() {
            for &b in &live[i + 1..] {
                if tree.name(a) == tree.name(b) {
                    violations.push(InvariantViolation::new(
                        "unique_names",
                        alloc::format!(
                            "{} and {} under {} share the name {:?}",
                            a,
                            b,
                            id,
                            tree.name(a)
                        ),
                    ));
                }
            }
        }
    }

    violations
}

// ============================================================================
// Kani proofs for invariants
// ============================================================================

#[cfg(kani)]
mod proofs {
    use super::*;
    use crate::types::UnregisterPolicy;

    /// Proof: registering under root maintains invariants
    #[kani::proof]
    #[kani::unwind(6)]
    fn register_maintains_invariants() {
        let mut tree: ObjectTree<(), 2> = ObjectTree::new();
        let a = tree.reserve(()).unwrap();
        let b = tree.reserve(()).unwrap();

        let nested: bool = kani::any();
        let _ = tree.register(a, "a");
        let _ = tree.register(b, if nested { "a/b" } else { "b" });

        kani::assert(
            check_all_invariants(&tree).is_empty(),
            "Registering objects should maintain invariants",
        );
    }

    /// Proof: unregister under the strict policy never orphans
    #[kani::proof]
    #[kani::unwind(6)]
    fn strict_unregister_maintains_invariants() {
        let mut tree: ObjectTree<(), 2> = ObjectTree::with_policy(UnregisterPolicy::RejectNonEmpty);
        let a = tree.reserve(()).unwrap();
        let b = tree.reserve(()).unwrap();
        let _ = tree.register(a, "a");
        let _ = tree.register(b, "a/b");

        let first: bool = kani::any();
        let _ = tree.unregister(if first { a } else { b });

        kani::assert(
            check_all_invariants(&tree).is_empty(),
            "Strict unregister should maintain invariants",
        );
    }
}
