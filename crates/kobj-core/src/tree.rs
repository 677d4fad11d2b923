//! Object tree state
//!
//! [`ObjectTree`] owns a fixed arena of object slots plus the root. Each
//! slot embeds the registry bookkeeping ([`Object`]) next to an optional
//! caller payload. Containment is expressed only through the intrusive
//! lists in [`crate::list`]; the `parent` field is a non-owning index used
//! for `parent` queries.
//!
//! All operations here are pure state transformations. Interrupt masking,
//! locking and logging live in the runtime wrapper.

use crate::config::{OBJECT_MAGIC, ROOT_NAME};
use crate::error::{Full, RegistryError};
use crate::list::{self, Link, LinkId, LinkKind, Links};
use crate::path::PathCursor;
use crate::types::{ObjectId, ObjectName, TreeEntry, UnregisterPolicy};

/// Registry bookkeeping embedded in every node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Object {
    magic: u32,
    name: ObjectName,
    list: Link,
    clist: Link,
    parent: Option<ObjectId>,
}

impl Object {
    /// Zeroed bookkeeping, as found in freshly reserved storage.
    pub const UNLINKED: Object = Object {
        magic: 0,
        name: ObjectName::EMPTY,
        list: Link::UNLINKED,
        clist: Link::UNLINKED,
        parent: None,
    };

    const fn root() -> Self {
        Object {
            magic: OBJECT_MAGIC,
            name: ObjectName::new(ROOT_NAME.as_bytes()),
            list: Link::looped(LinkId::sibling(ObjectId::ROOT)),
            clist: Link::looped(LinkId::children(ObjectId::ROOT)),
            parent: None,
        }
    }

    /// Raw magic tag.
    pub fn magic(&self) -> u32 {
        self.magic
    }

    /// Whether the object is currently registered.
    pub fn is_live(&self) -> bool {
        self.magic == OBJECT_MAGIC
    }

    /// Stored name. Kept after unregistration until the next register.
    pub fn name(&self) -> &ObjectName {
        &self.name
    }

    /// Parent back-reference (`None` for root and unregistered objects).
    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    /// Link into the parent's child-list.
    pub fn sibling_link(&self) -> &Link {
        &self.list
    }

    /// Head of this object's own child-list.
    pub fn children_link(&self) -> &Link {
        &self.clist
    }
}

struct Slot<T> {
    object: Object,
    /// `Some` while the slot is reserved
    value: Option<T>,
}

impl<T> Slot<T> {
    const VACANT: Self = Slot {
        object: Object::UNLINKED,
        value: None,
    };
}

/// Outcome of walking the directory part of a path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Descent<'p> {
    /// Every directory segment matched; `leaf` is the final segment.
    Reached {
        /// Deepest object reached
        parent: ObjectId,
        /// Final segment, unclamped
        leaf: &'p [u8],
    },
    /// A directory segment named no live child.
    Missing,
}

/// Fixed-capacity tree of named objects rooted at a singleton root.
///
/// `N` is the number of user slots; handles run from 1 to `N`.
pub struct ObjectTree<T, const N: usize> {
    root: Object,
    slots: [Slot<T>; N],
    policy: UnregisterPolicy,
}

impl<T, const N: usize> ObjectTree<T, N> {
    const CAPACITY_FITS: () = assert!(N < u16::MAX as usize, "too many slots for u16 handles");

    /// Empty tree with the default unregister policy.
    pub const fn new() -> Self {
        Self::with_policy(UnregisterPolicy::Orphan)
    }

    /// Empty tree with an explicit unregister policy.
    pub const fn with_policy(policy: UnregisterPolicy) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::CAPACITY_FITS;
        Self {
            root: Object::root(),
            slots: [const { Slot::<T>::VACANT }; N],
            policy,
        }
    }

    /// Policy applied by [`unregister`](Self::unregister).
    pub fn policy(&self) -> UnregisterPolicy {
        self.policy
    }

    /// Number of user slots.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of live objects, root excluded.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.object.is_live()).count()
    }

    /// Whether no object besides root is live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ========================================================================
    // Storage
    // ========================================================================

    /// Claim a free slot for `value`.
    ///
    /// The slot starts unregistered with zeroed links.
    pub fn reserve(&mut self, value: T) -> Result<ObjectId, Full<T>> {
        match self.slots.iter().position(|s| s.value.is_none()) {
            Some(idx) => {
                let slot = &mut self.slots[idx];
                slot.object = Object::UNLINKED;
                slot.value = Some(value);
                Ok(ObjectId((idx + 1) as u16))
            }
            None => Err(Full(value)),
        }
    }

    /// Give a slot back and return its payload.
    ///
    /// The object must be unregistered and have no children linked under
    /// it (orphans included).
    pub fn release(&mut self, id: ObjectId) -> Result<T, RegistryError> {
        let idx = self.slot_index(id)?;
        if self.slots[idx].object.is_live() {
            return Err(RegistryError::StillRegistered);
        }
        if !list::is_empty(self, LinkId::children(id)) {
            return Err(RegistryError::HasChildren);
        }
        let slot = &mut self.slots[idx];
        slot.object = Object::UNLINKED;
        slot.value.take().ok_or(RegistryError::InvalidHandle)
    }

    /// Payload of a reserved slot.
    pub fn get(&self, id: ObjectId) -> Option<&T> {
        let idx = self.slot_index(id).ok()?;
        self.slots[idx].value.as_ref()
    }

    /// Mutable payload of a reserved slot.
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut T> {
        let idx = self.slot_index(id).ok()?;
        self.slots[idx].value.as_mut()
    }

    /// Bookkeeping of root or of a reserved slot.
    pub fn object(&self, id: ObjectId) -> Option<&Object> {
        if id.is_root() {
            return Some(&self.root);
        }
        let idx = self.slot_index(id).ok()?;
        Some(&self.slots[idx].object)
    }

    /// Handles of every reserved slot, in slot order.
    pub fn reserved(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.value.is_some())
            .map(|(idx, _)| ObjectId((idx + 1) as u16))
    }

    /// Whether `id` names a live object. Root is always live.
    pub fn is_registered(&self, id: ObjectId) -> bool {
        self.object(id).is_some_and(Object::is_live)
    }

    /// Name of a live object.
    pub fn name(&self, id: ObjectId) -> Option<&ObjectName> {
        self.object(id).filter(|o| o.is_live()).map(Object::name)
    }

    // ========================================================================
    // Path operations
    // ========================================================================

    /// Look up `segment` among the live children of `parent`.
    pub fn child_by_name(&self, parent: ObjectId, segment: &[u8]) -> Option<ObjectId> {
        self.object(parent)?;
        list::iter(self, LinkId::children(parent))
            .map(|link| link.object)
            .find(|&child| {
                let object = self.node(child);
                object.is_live() && object.name.matches(segment)
            })
    }

    /// Follow the directory segments of `path` from root.
    pub fn descend<'p>(&self, path: &'p str) -> Descent<'p> {
        let mut cursor = PathCursor::new(path);
        let mut parent = ObjectId::ROOT;
        while let Some(segment) = cursor.next_dir() {
            match self.child_by_name(parent, segment) {
                Some(child) => parent = child,
                None => return Descent::Missing,
            }
        }
        Descent::Reached {
            parent,
            leaf: cursor.remainder(),
        }
    }

    /// Object named by `path`, if every segment matches.
    pub fn find(&self, path: &str) -> Option<ObjectId> {
        match self.descend(path) {
            Descent::Reached { parent, leaf } if !leaf.is_empty() => {
                self.child_by_name(parent, leaf)
            }
            _ => None,
        }
    }

    /// Attach `id` under the directory part of `path`, named by its final
    /// segment.
    ///
    /// Intermediate objects are never created. On any error the tree and
    /// the object are left exactly as they were.
    pub fn register(&mut self, id: ObjectId, path: &str) -> Result<(), RegistryError> {
        let idx = self.slot_index(id)?;
        if self.slots[idx].object.is_live() {
            return Err(RegistryError::AlreadyRegistered);
        }

        let (parent, leaf) = match self.descend(path) {
            Descent::Reached { parent, leaf } => (parent, leaf),
            Descent::Missing => return Err(RegistryError::MissingParent),
        };
        if leaf.is_empty() {
            return Err(RegistryError::InvalidName);
        }
        if self.child_by_name(parent, leaf).is_some() {
            return Err(RegistryError::DuplicateName);
        }

        let sibling = LinkId::sibling(id);
        let children = LinkId::children(id);
        if !list::is_inited(self.link(sibling)) {
            list::init(self, sibling);
        }
        if !list::is_inited(self.link(children)) {
            list::init(self, children);
        }

        let object = &mut self.slots[idx].object;
        object.name = ObjectName::new(leaf);
        object.parent = Some(parent);
        list::insert_before(self, LinkId::children(parent), sibling);
        self.slots[idx].object.magic = OBJECT_MAGIC;
        Ok(())
    }

    /// Detach a live object from its parent.
    ///
    /// Never recurses. Under [`UnregisterPolicy::Orphan`] any children stay
    /// linked under the dead object; under
    /// [`UnregisterPolicy::RejectNonEmpty`] the call fails instead.
    pub fn unregister(&mut self, id: ObjectId) -> Result<(), RegistryError> {
        let idx = self.slot_index(id)?;
        if !self.slots[idx].object.is_live() {
            return Err(RegistryError::NotRegistered);
        }
        if self.policy == UnregisterPolicy::RejectNonEmpty
            && !list::is_empty(self, LinkId::children(id))
        {
            return Err(RegistryError::HasChildren);
        }

        list::remove(self, LinkId::sibling(id));
        let object = &mut self.slots[idx].object;
        object.magic = 0;
        object.parent = None;
        Ok(())
    }

    /// Parent of a live object; `None` for root and dead objects.
    pub fn parent(&self, id: ObjectId) -> Option<ObjectId> {
        self.object(id).filter(|o| o.is_live())?.parent
    }

    // ========================================================================
    // Enumeration
    // ========================================================================

    /// Direct children of `id`, in registration order.
    pub fn children(&self, id: ObjectId) -> Children<'_, T, N> {
        Children {
            inner: self
                .object(id)
                .map(|_| list::iter(self, LinkId::children(id))),
        }
    }

    /// Depth-first pre-order walk of the subtree under `from`, `from`
    /// included at depth 0.
    pub fn walk(&self, from: ObjectId) -> Walk<'_, T, N> {
        Walk {
            tree: self,
            start: from,
            next: self.object(from).map(|_| (from, 0)),
        }
    }

    /// Node that follows `id` in a pre-order walk rooted at `start`.
    fn successor(&self, start: ObjectId, id: ObjectId, depth: usize) -> Option<(ObjectId, usize)> {
        let own_head = LinkId::children(id);
        if let Some(child) = self.node(id).clist.next.filter(|&l| l != own_head) {
            return Some((child.object, depth + 1));
        }

        let mut current = id;
        let mut depth = depth;
        loop {
            if current == start {
                return None;
            }
            let next = self.node(current).list.next?;
            match next.kind {
                LinkKind::Sibling => return Some((next.object, depth)),
                // Reached the parent's child-list head: climb one level
                LinkKind::Children => {
                    current = next.object;
                    depth = depth.saturating_sub(1);
                }
            }
        }
    }

    // ========================================================================
    // Slot access
    // ========================================================================

    fn slot_index(&self, id: ObjectId) -> Result<usize, RegistryError> {
        if id.is_root() {
            return Err(RegistryError::RootObject);
        }
        let idx = id.index() - 1;
        match self.slots.get(idx) {
            Some(slot) if slot.value.is_some() => Ok(idx),
            _ => Err(RegistryError::InvalidHandle),
        }
    }

    fn node(&self, id: ObjectId) -> &Object {
        if id.is_root() {
            &self.root
        } else {
            &self.slots[id.index() - 1].object
        }
    }

    fn node_mut(&mut self, id: ObjectId) -> &mut Object {
        if id.is_root() {
            &mut self.root
        } else {
            &mut self.slots[id.index() - 1].object
        }
    }
}

impl<T, const N: usize> Default for ObjectTree<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> Links for ObjectTree<T, N> {
    fn link(&self, id: LinkId) -> &Link {
        let object = self.node(id.object);
        match id.kind {
            LinkKind::Sibling => &object.list,
            LinkKind::Children => &object.clist,
        }
    }

    fn link_mut(&mut self, id: LinkId) -> &mut Link {
        let object = self.node_mut(id.object);
        match id.kind {
            LinkKind::Sibling => &mut object.list,
            LinkKind::Children => &mut object.clist,
        }
    }
}

/// Iterator over direct children, see [`ObjectTree::children`].
pub struct Children<'a, T, const N: usize> {
    inner: Option<list::Iter<'a, ObjectTree<T, N>>>,
}

impl<T, const N: usize> Iterator for Children<'_, T, N> {
    type Item = ObjectId;

    fn next(&mut self) -> Option<ObjectId> {
        self.inner.as_mut()?.next().map(|link| link.object)
    }
}

/// Pre-order walk, see [`ObjectTree::walk`].
pub struct Walk<'a, T, const N: usize> {
    tree: &'a ObjectTree<T, N>,
    start: ObjectId,
    next: Option<(ObjectId, usize)>,
}

impl<T, const N: usize> Iterator for Walk<'_, T, N> {
    type Item = TreeEntry;

    fn next(&mut self) -> Option<TreeEntry> {
        let (id, depth) = self.next.take()?;
        self.next = self.tree.successor(self.start, id, depth);
        Some(TreeEntry {
            id,
            depth,
            name: self.tree.node(id).name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NAME_MAX;
    use alloc::vec::Vec;

    type Tree = ObjectTree<&'static str, 8>;

    fn reserve(tree: &mut Tree, label: &'static str) -> ObjectId {
        tree.reserve(label).unwrap()
    }

    fn names(tree: &Tree, from: ObjectId) -> Vec<(usize, &str)> {
        tree.walk(from)
            .map(|e| (e.depth, tree.node(e.id).name.as_str()))
            .collect()
    }

    /// x, x/y, x/y/z
    fn nested(tree: &mut Tree) -> (ObjectId, ObjectId, ObjectId) {
        let x = reserve(tree, "x");
        let y = reserve(tree, "y");
        let z = reserve(tree, "z");
        tree.register(x, "x").unwrap();
        tree.register(y, "x/y").unwrap();
        tree.register(z, "x/y/z").unwrap();
        (x, y, z)
    }

    #[test]
    fn test_new_tree_has_only_root() {
        let tree = Tree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.capacity(), 8);
        assert!(tree.is_registered(ObjectId::ROOT));
        assert_eq!(tree.name(ObjectId::ROOT).unwrap(), "root");
        assert_eq!(tree.parent(ObjectId::ROOT), None);
        assert_eq!(names(&tree, ObjectId::ROOT), [(0, "root")]);
    }

    #[test]
    fn test_register_under_root_and_find() {
        let mut tree = Tree::new();
        let a = reserve(&mut tree, "a");
        let b = reserve(&mut tree, "b");
        let c = reserve(&mut tree, "c");
        tree.register(a, "a").unwrap();
        tree.register(b, "/b").unwrap();
        tree.register(c, "c").unwrap();

        assert_eq!(tree.find("a"), Some(a));
        assert_eq!(tree.find("/b"), Some(b));
        assert_eq!(tree.find("c"), Some(c));
        assert_eq!(tree.find("d"), None);
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.children(ObjectId::ROOT).collect::<Vec<_>>(), [a, b, c]);
        assert_eq!(tree.get(b), Some(&"b"));
    }

    #[test]
    fn test_nested_register_and_parents() {
        let mut tree = Tree::new();
        let (x, y, z) = nested(&mut tree);

        assert_eq!(tree.find("x/y/z"), Some(z));
        assert_eq!(tree.find("/x/y"), Some(y));
        assert_eq!(tree.parent(z), Some(y));
        assert_eq!(tree.parent(y), Some(x));
        assert_eq!(tree.parent(x), Some(ObjectId::ROOT));
    }

    #[test]
    fn test_duplicate_name_rejected_without_side_effects() {
        let mut tree = Tree::new();
        let (_, y, _) = nested(&mut tree);
        let q = reserve(&mut tree, "q");
        let before = *tree.object(q).unwrap();

        assert_eq!(tree.register(q, "x/y"), Err(RegistryError::DuplicateName));
        assert_eq!(*tree.object(q).unwrap(), before);
        assert_eq!(tree.object(q).unwrap().magic(), 0);
        assert_eq!(tree.find("x/y"), Some(y));
    }

    #[test]
    fn test_missing_intermediate_rejected() {
        let mut tree = Tree::new();
        let x = reserve(&mut tree, "x");
        tree.register(x, "x").unwrap();
        let w = reserve(&mut tree, "w");

        assert_eq!(
            tree.register(w, "x/missing/w"),
            Err(RegistryError::MissingParent)
        );
        assert_eq!(tree.object(w).unwrap().magic(), 0);
        assert_eq!(tree.children(x).count(), 0);
        assert_eq!(tree.find("x/missing/w"), None);
    }

    #[test]
    fn test_find_requires_every_segment() {
        let mut tree = Tree::new();
        let x = reserve(&mut tree, "x");
        let w = reserve(&mut tree, "w");
        tree.register(x, "x").unwrap();
        tree.register(w, "x/w").unwrap();

        // "missing" fails even though x has a child called "w"
        assert_eq!(tree.find("x/missing/w"), None);
        assert_eq!(tree.find("x/w"), Some(w));
    }

    #[test]
    fn test_degenerate_paths() {
        let mut tree = Tree::new();
        let x = reserve(&mut tree, "x");
        tree.register(x, "x").unwrap();

        assert_eq!(tree.find("/"), None);
        assert_eq!(tree.find(""), None);
        assert_eq!(tree.find("x/"), None);

        let e = reserve(&mut tree, "e");
        assert_eq!(tree.register(e, "x/"), Err(RegistryError::InvalidName));
        assert_eq!(tree.register(e, "/"), Err(RegistryError::InvalidName));
        assert_eq!(tree.register(e, "x///e"), Err(RegistryError::MissingParent));
    }

    #[test]
    fn test_double_register_rejected() {
        let mut tree = Tree::new();
        let a = reserve(&mut tree, "a");
        tree.register(a, "a").unwrap();
        assert_eq!(tree.register(a, "b"), Err(RegistryError::AlreadyRegistered));
        assert_eq!(tree.find("b"), None);
    }

    #[test]
    fn test_unregister_orphans_children() {
        let mut tree = Tree::new();
        let (x, y, z) = nested(&mut tree);

        tree.unregister(y).unwrap();
        assert_eq!(tree.find("x/y"), None);
        assert_eq!(tree.find("x/y/z"), None);
        assert_eq!(tree.object(y).unwrap().magic(), 0);
        assert_eq!(tree.object(y).unwrap().parent(), None);
        assert_eq!(tree.object(z).unwrap().parent(), Some(y));
        assert_eq!(tree.parent(z), Some(y));
        assert_eq!(tree.children(x).count(), 0);

        // The orphan is still linked under the dead parent
        assert_eq!(tree.children(y).collect::<Vec<_>>(), [z]);
        assert_eq!(tree.release(y), Err(RegistryError::HasChildren));

        tree.unregister(z).unwrap();
        assert_eq!(tree.release(y), Ok("y"));
    }

    #[test]
    fn test_object_links_after_unregister() {
        let mut tree = Tree::new();
        let (x, y, z) = nested(&mut tree);
        tree.unregister(y).unwrap();

        let dead = tree.object(y).unwrap();
        assert_eq!(*dead.sibling_link(), Link::looped(LinkId::sibling(y)));
        assert_eq!(dead.children_link().next(), Some(LinkId::sibling(z)));
        assert_eq!(
            *tree.object(x).unwrap().children_link(),
            Link::looped(LinkId::children(x))
        );
    }

    #[test]
    fn test_reregister_parent_revives_orphans() {
        let mut tree = Tree::new();
        let (_, y, z) = nested(&mut tree);

        tree.unregister(y).unwrap();
        tree.register(y, "y").unwrap();
        assert_eq!(tree.find("y/z"), Some(z));
        assert_eq!(tree.parent(y), Some(ObjectId::ROOT));
    }

    #[test]
    fn test_reject_non_empty_policy() {
        let mut tree = Tree::with_policy(UnregisterPolicy::RejectNonEmpty);
        let (x, y, z) = nested(&mut tree);

        assert_eq!(tree.unregister(y), Err(RegistryError::HasChildren));
        assert_eq!(tree.find("x/y/z"), Some(z));

        tree.unregister(z).unwrap();
        tree.unregister(y).unwrap();
        tree.unregister(x).unwrap();
        assert!(tree.is_empty());
    }

    #[test]
    fn test_unregister_twice_rejected() {
        let mut tree = Tree::new();
        let a = reserve(&mut tree, "a");
        tree.register(a, "a").unwrap();
        tree.unregister(a).unwrap();
        assert_eq!(tree.unregister(a), Err(RegistryError::NotRegistered));
        assert_eq!(tree.parent(a), None);
    }

    #[test]
    fn test_root_cannot_be_mutated() {
        let mut tree = Tree::new();
        assert_eq!(tree.unregister(ObjectId::ROOT), Err(RegistryError::RootObject));
        assert_eq!(
            tree.register(ObjectId::ROOT, "again"),
            Err(RegistryError::RootObject)
        );
        assert_eq!(tree.release(ObjectId::ROOT), Err(RegistryError::RootObject));
    }

    #[test]
    fn test_invalid_handles() {
        let mut tree = Tree::new();
        assert_eq!(tree.register(ObjectId(3), "a"), Err(RegistryError::InvalidHandle));
        assert_eq!(tree.register(ObjectId(99), "a"), Err(RegistryError::InvalidHandle));
        assert_eq!(tree.unregister(ObjectId(99)), Err(RegistryError::InvalidHandle));
        assert!(tree.object(ObjectId(99)).is_none());
        assert_eq!(tree.children(ObjectId(99)).count(), 0);
        assert_eq!(tree.walk(ObjectId(99)).count(), 0);
    }

    #[test]
    fn test_name_truncation_prefix_match() {
        let mut tree = Tree::new();
        let long = reserve(&mut tree, "long");
        tree.register(long, "abcdefghijklmnopqrstuv").unwrap();

        let stored = tree.name(long).unwrap();
        assert_eq!(stored.len(), NAME_MAX.min(22));
        if NAME_MAX == 16 {
            assert_eq!(stored, "abcdefghijklmnop");
            assert_eq!(tree.find("abcdefghijklmnopWXYZ"), Some(long));
        }
        assert_eq!(tree.find("abcdefghijklmnopqrstuv"), Some(long));
    }

    #[test]
    fn test_reserve_until_full_and_release() {
        let mut tree: ObjectTree<u32, 2> = ObjectTree::new();
        let a = tree.reserve(1).unwrap();
        let _b = tree.reserve(2).unwrap();
        assert_eq!(tree.reserve(3), Err(Full(3)));

        tree.register(a, "a").unwrap();
        assert_eq!(tree.release(a), Err(RegistryError::StillRegistered));
        tree.unregister(a).unwrap();
        assert_eq!(tree.release(a), Ok(1));
        assert_eq!(tree.get(a), None);
        assert_eq!(tree.register(a, "a"), Err(RegistryError::InvalidHandle));

        let c = tree.reserve(3).unwrap();
        assert_eq!(c, a);
        assert_eq!(tree.object(c).unwrap().magic(), 0);
    }

    #[test]
    fn test_payload_mutation() {
        let mut tree: ObjectTree<u32, 2> = ObjectTree::new();
        let a = tree.reserve(1).unwrap();
        *tree.get_mut(a).unwrap() += 41;
        assert_eq!(tree.get(a), Some(&42));
        assert_eq!(tree.get(ObjectId::ROOT), None);
    }

    #[test]
    fn test_walk_is_preorder_in_registration_order() {
        let mut tree = Tree::new();
        let (x, _, _) = nested(&mut tree);
        let w = reserve(&mut tree, "w");
        let v = reserve(&mut tree, "v");
        tree.register(w, "x/w").unwrap();
        tree.register(v, "v").unwrap();

        assert_eq!(
            names(&tree, ObjectId::ROOT),
            [(0, "root"), (1, "x"), (2, "y"), (3, "z"), (2, "w"), (1, "v")]
        );
        assert_eq!(names(&tree, x), [(0, "x"), (1, "y"), (2, "z"), (1, "w")]);
    }

    #[test]
    fn test_walk_from_leaf_stops_at_leaf() {
        let mut tree = Tree::new();
        let (_, _, z) = nested(&mut tree);
        let v = reserve(&mut tree, "v");
        tree.register(v, "v").unwrap();
        assert_eq!(names(&tree, z), [(0, "z")]);
    }

    #[test]
    fn test_walk_from_dead_parent_lists_orphans() {
        let mut tree = Tree::new();
        let (_, y, _) = nested(&mut tree);
        tree.unregister(y).unwrap();
        assert_eq!(names(&tree, y), [(0, "y"), (1, "z")]);
        assert_eq!(names(&tree, ObjectId::ROOT), [(0, "root"), (1, "x")]);
    }

    #[test]
    fn test_sibling_order_survives_removal() {
        let mut tree = Tree::new();
        let ids: Vec<_> = ["a", "b", "c", "d"]
            .iter()
            .map(|&n| {
                let id = reserve(&mut tree, n);
                tree.register(id, n).unwrap();
                id
            })
            .collect();

        tree.unregister(ids[1]).unwrap();
        tree.register(ids[1], "b").unwrap();
        assert_eq!(
            tree.children(ObjectId::ROOT).collect::<Vec<_>>(),
            [ids[0], ids[2], ids[3], ids[1]]
        );
    }
}
