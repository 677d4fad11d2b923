//! Arena-backed intrusive circular list
//!
//! Every object carries two links: `Sibling` (its membership in the
//! parent's child-list) and `Children` (the sentinel head of its own
//! child-list). A link is addressed by [`LinkId`], so the object that owns
//! a link is simply `link_id.object`; no pointer arithmetic is needed to get
//! from a list element back to its node.
//!
//! The operations mirror the classic kernel list: `init`, `insert_before`
//! (append at the tail when given the head), `remove` (self-loops the
//! removed element) and an `is_inited` check that tolerates zeroed links.
//! None of them allocate.

use crate::types::ObjectId;

/// Which of an object's two links.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// Membership in the parent's child-list
    Sibling,
    /// Head of the object's own child-list
    Children,
}

/// Address of a link inside the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LinkId {
    /// Object embedding the link
    pub object: ObjectId,
    /// Which link of that object
    pub kind: LinkKind,
}

impl LinkId {
    /// The `Sibling` link of `object`.
    pub const fn sibling(object: ObjectId) -> Self {
        Self {
            object,
            kind: LinkKind::Sibling,
        }
    }

    /// The `Children` head of `object`.
    pub const fn children(object: ObjectId) -> Self {
        Self {
            object,
            kind: LinkKind::Children,
        }
    }
}

/// A pair of list pointers. `None` means "never initialised".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Link {
    pub(crate) next: Option<LinkId>,
    pub(crate) prev: Option<LinkId>,
}

impl Link {
    /// Zeroed link, as found in freshly reserved storage.
    pub const UNLINKED: Link = Link {
        next: None,
        prev: None,
    };

    /// A link already looped onto itself.
    pub const fn looped(own: LinkId) -> Self {
        Self {
            next: Some(own),
            prev: Some(own),
        }
    }

    /// Successor, if initialised.
    pub fn next(&self) -> Option<LinkId> {
        self.next
    }

    /// Predecessor, if initialised.
    pub fn prev(&self) -> Option<LinkId> {
        self.prev
    }
}

/// Storage that can resolve a [`LinkId`] to its [`Link`].
pub trait Links {
    /// Shared access to a link.
    fn link(&self, id: LinkId) -> &Link;

    /// Exclusive access to a link.
    fn link_mut(&mut self, id: LinkId) -> &mut Link;
}

/// Whether both pointers of `link` are set.
pub fn is_inited(link: &Link) -> bool {
    link.next.is_some() && link.prev.is_some()
}

/// Loop `head` onto itself, making it an empty list.
pub fn init<L: Links + ?Sized>(links: &mut L, head: LinkId) {
    *links.link_mut(head) = Link::looped(head);
}

#[inline]
fn next_of<L: Links + ?Sized>(links: &L, id: LinkId) -> LinkId {
    links.link(id).next.unwrap_or(id)
}

#[inline]
fn prev_of<L: Links + ?Sized>(links: &L, id: LinkId) -> LinkId {
    links.link(id).prev.unwrap_or(id)
}

/// Splice `node` immediately before `head`, i.e. at the tail of the list
/// headed by `head`.
///
/// `node` must not currently be on another list.
pub fn insert_before<L: Links + ?Sized>(links: &mut L, head: LinkId, node: LinkId) {
    let tail = prev_of(links, head);
    links.link_mut(tail).next = Some(node);
    links.link_mut(node).prev = Some(tail);
    links.link_mut(head).prev = Some(node);
    links.link_mut(node).next = Some(head);
}

/// Splice `node` out of whatever list holds it and loop it onto itself.
///
/// Removing an already looped (or never initialised) node only loops it.
pub fn remove<L: Links + ?Sized>(links: &mut L, node: LinkId) {
    let next = next_of(links, node);
    let prev = prev_of(links, node);
    links.link_mut(next).prev = Some(prev);
    links.link_mut(prev).next = Some(next);
    *links.link_mut(node) = Link::looped(node);
}

/// Whether the list headed by `head` has no elements.
pub fn is_empty<L: Links + ?Sized>(links: &L, head: LinkId) -> bool {
    next_of(links, head) == head
}

/// Iterate the elements after `head`, in insertion order.
pub fn iter<L: Links + ?Sized>(links: &L, head: LinkId) -> Iter<'_, L> {
    Iter {
        links,
        head,
        cursor: head,
    }
}

/// Forward iterator over a list, yielding element link ids.
pub struct Iter<'a, L: Links + ?Sized> {
    links: &'a L,
    head: LinkId,
    cursor: LinkId,
}

impl<L: Links + ?Sized> Iterator for Iter<'_, L> {
    type Item = LinkId;

    fn next(&mut self) -> Option<LinkId> {
        let next = next_of(self.links, self.cursor);
        if next == self.head {
            return None;
        }
        self.cursor = next;
        Some(next)
    }
}

// ============================================================================
// Kani proofs for list symmetry
// ============================================================================

#[cfg(kani)]
mod proofs {
    use super::*;

    struct Arena {
        links: [Link; 8],
    }

    fn slot(id: LinkId) -> usize {
        id.object.index() * 2
            + match id.kind {
                LinkKind::Sibling => 0,
                LinkKind::Children => 1,
            }
    }

    impl Links for Arena {
        fn link(&self, id: LinkId) -> &Link {
            &self.links[slot(id)]
        }

        fn link_mut(&mut self, id: LinkId) -> &mut Link {
            &mut self.links[slot(id)]
        }
    }

    fn symmetric(arena: &Arena, id: LinkId) -> bool {
        let next = next_of(arena, id);
        let prev = prev_of(arena, id);
        prev_of(arena, next) == id && next_of(arena, prev) == id
    }

    /// Proof: insert then remove of any element keeps every link symmetric
    #[kani::proof]
    #[kani::unwind(5)]
    fn insert_remove_keeps_symmetry() {
        let mut arena = Arena {
            links: [Link::UNLINKED; 8],
        };
        let head = LinkId::children(ObjectId(0));
        init(&mut arena, head);

        for i in 1..4u16 {
            insert_before(&mut arena, head, LinkId::sibling(ObjectId(i)));
        }

        let victim: u16 = kani::any();
        kani::assume(victim >= 1 && victim < 4);
        remove(&mut arena, LinkId::sibling(ObjectId(victim)));

        kani::assert(symmetric(&arena, head), "head must stay symmetric");
        for i in 1..4u16 {
            kani::assert(
                symmetric(&arena, LinkId::sibling(ObjectId(i))),
                "every element must stay symmetric",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    /// Two links per object, like the real tree.
    struct Arena {
        links: Vec<[Link; 2]>,
    }

    impl Arena {
        fn new(objects: usize) -> Self {
            Self {
                links: alloc::vec![[Link::UNLINKED; 2]; objects],
            }
        }
    }

    impl Links for Arena {
        fn link(&self, id: LinkId) -> &Link {
            &self.links[id.object.index()][id.kind as usize]
        }

        fn link_mut(&mut self, id: LinkId) -> &mut Link {
            &mut self.links[id.object.index()][id.kind as usize]
        }
    }

    fn elements(arena: &Arena, head: LinkId) -> Vec<u16> {
        iter(arena, head).map(|l| l.object.0).collect()
    }

    fn assert_symmetric(arena: &Arena, id: LinkId) {
        let link = arena.link(id);
        let next = link.next().unwrap();
        let prev = link.prev().unwrap();
        assert_eq!(arena.link(next).prev(), Some(id));
        assert_eq!(arena.link(prev).next(), Some(id));
    }

    #[test]
    fn test_zeroed_link_is_not_inited() {
        assert!(!is_inited(&Link::UNLINKED));
        assert!(is_inited(&Link::looped(LinkId::sibling(ObjectId(1)))));
    }

    #[test]
    fn test_init_makes_empty_list() {
        let mut arena = Arena::new(1);
        let head = LinkId::children(ObjectId(0));
        init(&mut arena, head);
        assert!(is_empty(&arena, head));
        assert_eq!(iter(&arena, head).count(), 0);
        assert_symmetric(&arena, head);
    }

    #[test]
    fn test_insert_before_head_appends_in_order() {
        let mut arena = Arena::new(4);
        let head = LinkId::children(ObjectId(0));
        init(&mut arena, head);
        for i in 1..4 {
            insert_before(&mut arena, head, LinkId::sibling(ObjectId(i)));
        }

        assert!(!is_empty(&arena, head));
        assert_eq!(elements(&arena, head), [1, 2, 3]);
        assert_symmetric(&arena, head);
        for i in 1..4 {
            assert_symmetric(&arena, LinkId::sibling(ObjectId(i)));
        }
    }

    #[test]
    fn test_remove_middle_and_self_loop() {
        let mut arena = Arena::new(4);
        let head = LinkId::children(ObjectId(0));
        init(&mut arena, head);
        for i in 1..4 {
            insert_before(&mut arena, head, LinkId::sibling(ObjectId(i)));
        }

        let middle = LinkId::sibling(ObjectId(2));
        remove(&mut arena, middle);
        assert_eq!(elements(&arena, head), [1, 3]);
        assert_eq!(*arena.link(middle), Link::looped(middle));
        assert_symmetric(&arena, LinkId::sibling(ObjectId(1)));
        assert_symmetric(&arena, LinkId::sibling(ObjectId(3)));
    }

    #[test]
    fn test_remove_twice_leaves_list_untouched() {
        let mut arena = Arena::new(3);
        let head = LinkId::children(ObjectId(0));
        init(&mut arena, head);
        insert_before(&mut arena, head, LinkId::sibling(ObjectId(1)));
        insert_before(&mut arena, head, LinkId::sibling(ObjectId(2)));

        remove(&mut arena, LinkId::sibling(ObjectId(1)));
        remove(&mut arena, LinkId::sibling(ObjectId(1)));
        assert_eq!(elements(&arena, head), [2]);
        assert_symmetric(&arena, head);
    }

    #[test]
    fn test_remove_uninited_link_loops_it() {
        let mut arena = Arena::new(2);
        let node = LinkId::sibling(ObjectId(1));
        remove(&mut arena, node);
        assert_eq!(*arena.link(node), Link::looped(node));
    }

    #[test]
    fn test_insert_into_uninited_head() {
        // A zeroed head behaves like an empty list
        let mut arena = Arena::new(2);
        let head = LinkId::children(ObjectId(0));
        let node = LinkId::sibling(ObjectId(1));
        init(&mut arena, node);
        insert_before(&mut arena, head, node);
        assert_eq!(elements(&arena, head), [1]);
        assert_symmetric(&arena, head);
        assert_symmetric(&arena, node);
    }
}
