//! Interrupt-safe registry wrapper
//!
//! [`ObjectRegistry`] pairs an [`ObjectTree`] with a platform HAL. Every
//! lock acquisition, shared or exclusive, happens inside a
//! [`CriticalSection`], and the section is left only after the lock is
//! released. On a single core an interrupt handler therefore never finds
//! the lock held. Mutators still take the write lock with `try_write`, so a
//! held lock (another core, or a mutation issued from inside a
//! [`with_tree`](ObjectRegistry::with_tree) closure) fails with `Busy`
//! instead of deadlocking with interrupts masked.

use alloc::vec::Vec;
use core::fmt;

use kobj_core::{
    check_all_invariants, InvariantViolation, Object, ObjectId, ObjectTree, RegistryError,
    TreeEntry, UnregisterPolicy, DEFAULT_CAPACITY, DUMP_INDENT, NAME_MAX,
};
use kobj_hal::{CriticalSection, ObjectHal};
use log::{debug, trace, warn};
use spin::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Why [`ObjectRegistry::reserve`] could not hand out a slot.
///
/// Both variants give the value back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReserveError<T> {
    /// Every slot is taken
    Full(T),
    /// Registry lock held by another core or an enclosing read closure
    Busy(T),
}

impl<T> ReserveError<T> {
    /// Recover the value that could not be stored.
    pub fn into_inner(self) -> T {
        match self {
            ReserveError::Full(value) | ReserveError::Busy(value) => value,
        }
    }
}

impl<T> fmt::Display for ReserveError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReserveError::Full(_) => write!(f, "object arena is full"),
            ReserveError::Busy(_) => write!(f, "{}", RegistryError::Busy),
        }
    }
}

/// Message passed to the assertion hook for a rejected precondition.
fn precondition_message(err: RegistryError) -> &'static str {
    match err {
        RegistryError::AlreadyRegistered => "object registered twice",
        RegistryError::NotRegistered => "object magic mismatch",
        RegistryError::RootObject => "root object is immutable",
        RegistryError::InvalidHandle => "handle names no reserved object",
        _ => "registry precondition",
    }
}

/// Hierarchical named-object registry.
///
/// `H` supplies interrupt masking, the print sink and the assertion hook.
/// `T` is the per-object payload and `N` the number of user slots.
pub struct ObjectRegistry<H: ObjectHal, T = (), const N: usize = DEFAULT_CAPACITY> {
    hal: H,
    tree: RwLock<ObjectTree<T, N>>,
}

impl<H: ObjectHal, T, const N: usize> ObjectRegistry<H, T, N> {
    /// Empty registry with the default unregister policy.
    pub const fn new(hal: H) -> Self {
        Self::with_policy(hal, UnregisterPolicy::Orphan)
    }

    /// Empty registry with an explicit unregister policy.
    pub const fn with_policy(hal: H, policy: UnregisterPolicy) -> Self {
        Self {
            hal,
            tree: RwLock::new(ObjectTree::with_policy(policy)),
        }
    }

    /// The platform HAL.
    pub fn hal(&self) -> &H {
        &self.hal
    }

    /// Mask interrupts and take the read lock.
    ///
    /// Bind the pair with `let (_cs, tree)` so the guard drops first and
    /// interrupts are unmasked only once the lock is free.
    fn lock(&self) -> (CriticalSection<'_, H>, RwLockReadGuard<'_, ObjectTree<T, N>>) {
        let cs = CriticalSection::enter(&self.hal);
        (cs, self.tree.read())
    }

    /// Mask interrupts and take the write lock, or fail with `Busy`.
    fn lock_mut(
        &self,
    ) -> Result<(CriticalSection<'_, H>, RwLockWriteGuard<'_, ObjectTree<T, N>>), RegistryError>
    {
        let cs = CriticalSection::enter(&self.hal);
        match self.tree.try_write() {
            Some(tree) => Ok((cs, tree)),
            None => Err(RegistryError::Busy),
        }
    }

    /// Report a rejected mutation.
    fn reject(&self, op: &str, id: ObjectId, err: RegistryError) {
        warn!("{} {} rejected: {}", op, id, err);
        if err.is_precondition() {
            self.hal.check(false, precondition_message(err));
        }
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Attach `id` under the directory part of `path`.
    ///
    /// Every directory segment must already name a live object; nothing is
    /// created on the way. On error the tree and the object are unchanged.
    pub fn register(&self, id: ObjectId, path: &str) -> Result<(), RegistryError> {
        let (_cs, mut tree) = self
            .lock_mut()
            .inspect_err(|&err| self.reject("register", id, err))?;

        tree.register(id, path)
            .inspect(|_| debug!("registered {} at {:?}", id, path))
            .inspect_err(|&err| self.reject("register", id, err))
    }

    /// Detach a live object from its parent. Children are never touched.
    pub fn unregister(&self, id: ObjectId) -> Result<(), RegistryError> {
        let (_cs, mut tree) = self
            .lock_mut()
            .inspect_err(|&err| self.reject("unregister", id, err))?;

        tree.unregister(id)
            .inspect(|_| debug!("unregistered {}", id))
            .inspect_err(|&err| self.reject("unregister", id, err))
    }

    /// Claim a free slot for `value`.
    pub fn reserve(&self, value: T) -> Result<ObjectId, ReserveError<T>> {
        let cs = CriticalSection::enter(&self.hal);
        let Some(mut tree) = self.tree.try_write() else {
            warn!("reserve rejected: {}", RegistryError::Busy);
            return Err(ReserveError::Busy(value));
        };

        let result = tree.reserve(value);
        drop(tree);
        drop(cs);

        match result {
            Ok(id) => {
                debug!("reserved {}", id);
                Ok(id)
            }
            Err(full) => {
                warn!("reserve rejected: {}", full);
                Err(ReserveError::Full(full.into_inner()))
            }
        }
    }

    /// Give an unregistered, childless slot back and return its payload.
    pub fn release(&self, id: ObjectId) -> Result<T, RegistryError> {
        let (_cs, mut tree) = self
            .lock_mut()
            .inspect_err(|&err| self.reject("release", id, err))?;

        tree.release(id)
            .inspect(|_| debug!("released {}", id))
            .inspect_err(|&err| self.reject("release", id, err))
    }

    /// Run `f` on the payload of a reserved slot under the write lock.
    pub fn with_payload_mut<R>(
        &self,
        id: ObjectId,
        f: impl FnOnce(&mut T) -> R,
    ) -> Result<R, RegistryError> {
        let (_cs, mut tree) = self.lock_mut()?;
        match tree.get_mut(id) {
            Some(value) => Ok(f(value)),
            None if id.is_root() => Err(RegistryError::RootObject),
            None => Err(RegistryError::InvalidHandle),
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Object named by `path`, if every segment names a live object.
    pub fn find(&self, path: &str) -> Option<ObjectId> {
        let found = {
            let (_cs, tree) = self.lock();
            tree.find(path)
        };
        trace!("find {:?} -> {:?}", path, found);
        found
    }

    /// Parent of a live object. `None` for root.
    ///
    /// Asking for the parent of a dead object or of an unreserved handle is
    /// a precondition violation: it is reported to the assertion hook and
    /// answered with `None`.
    pub fn parent_get(&self, id: ObjectId) -> Option<ObjectId> {
        let parent = {
            let (_cs, tree) = self.lock();
            match tree.object(id) {
                Some(object) if object.is_live() => Ok(object.parent()),
                Some(_) => Err(RegistryError::NotRegistered),
                None => Err(RegistryError::InvalidHandle),
            }
        };
        parent
            .inspect_err(|&err| self.reject("parent_get", id, err))
            .ok()
            .flatten()
    }

    /// Whether `id` is live. Root always is.
    pub fn is_registered(&self, id: ObjectId) -> bool {
        let (_cs, tree) = self.lock();
        tree.is_registered(id)
    }

    /// Print the subtree under `from` (root when `None`) through the HAL.
    ///
    /// One line per node, pre-order, children in registration order:
    /// `DUMP_INDENT` spaces per level, `|--- `, then the name padded to
    /// `NAME_MAX` columns.
    ///
    /// The walk is copied out under the lock; lines are printed after the
    /// lock is released and interrupts are unmasked again.
    pub fn tree_print(&self, from: Option<ObjectId>) {
        let entries: Vec<TreeEntry> = {
            let (_cs, tree) = self.lock();
            tree.walk(from.unwrap_or(ObjectId::ROOT)).collect()
        };
        for entry in entries {
            self.hal.print(format_args!(
                "{:indent$}|--- {:<width$}",
                "",
                entry.name,
                indent = entry.depth * DUMP_INDENT,
                width = NAME_MAX,
            ));
        }
    }

    /// Run `f` with shared access to the whole tree.
    ///
    /// `f` runs with interrupts masked. Mutating the registry from inside
    /// `f` fails with `Busy`.
    pub fn with_tree<R>(&self, f: impl FnOnce(&ObjectTree<T, N>) -> R) -> R {
        let (_cs, tree) = self.lock();
        f(&tree)
    }

    /// Run `f` on the bookkeeping and payload of root or a reserved slot.
    pub fn with_object<R>(
        &self,
        id: ObjectId,
        f: impl FnOnce(&Object, Option<&T>) -> R,
    ) -> Option<R> {
        let (_cs, tree) = self.lock();
        let object = tree.object(id)?;
        Some(f(object, tree.get(id)))
    }

    /// Run every invariant check against the current tree.
    pub fn check_invariants(&self) -> Vec<InvariantViolation> {
        self.with_tree(check_all_invariants)
    }
}
