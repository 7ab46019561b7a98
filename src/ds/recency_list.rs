//! Doubly linked recency list of pages, backed by a `SlotArena`.
//!
//! Nodes live in the arena and link to each other by `SlotId`, so callers get
//! stable handles and O(1) splice/move operations without pointer chasing.
//! The list owns every reachable page; the chain index only ever holds the
//! `SlotId`s returned from here.
//!
//! ```text
//!   arena (SlotArena<Node>)
//!   ┌────────┬────────────────────────────────────────────────┐
//!   │ SlotId │ Node { page, prev, next }                      │
//!   ├────────┼────────────────────────────────────────────────┤
//!   │ id_1   │ { page: A, prev: None,       next: Some(id_2) }│
//!   │ id_2   │ { page: B, prev: Some(id_1), next: Some(id_3) }│
//!   │ id_3   │ { page: C, prev: Some(id_2), next: None       }│
//!   └────────┴────────────────────────────────────────────────┘
//!
//!   head ─► [id_1] ◄──► [id_2] ◄──► [id_3] ◄── tail
//!           (MRU)                   (LRU)
//! ```
//!
//! All operations are O(1) except iteration; `len()` reads the arena counter,
//! never a traversal. `debug_validate_invariants()` is available in
//! debug/test builds.

use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::page::Page;

#[derive(Debug)]
struct Node {
    page: Page,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

/// Recency-ordered list of pages: head is most recently used, tail least.
#[derive(Debug)]
pub struct RecencyList {
    arena: SlotArena<Node>,
    head: Option<SlotId>,
    tail: Option<SlotId>,
}

impl RecencyList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self {
            arena: SlotArena::new(),
            head: None,
            tail: None,
        }
    }

    /// Creates an empty list with reserved node capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: SlotArena::with_capacity(capacity),
            head: None,
            tail: None,
        }
    }

    /// Returns the number of pages in the list.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Returns `true` if the list holds no pages.
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Returns `true` if `id` is currently a live node of this list.
    pub fn contains(&self, id: SlotId) -> bool {
        self.arena.contains(id)
    }

    /// Returns the most recently used page.
    pub fn front(&self) -> Option<&Page> {
        self.head
            .and_then(|id| self.arena.get(id).map(|node| &node.page))
    }

    /// Returns the least recently used page.
    pub fn back(&self) -> Option<&Page> {
        self.tail
            .and_then(|id| self.arena.get(id).map(|node| &node.page))
    }

    /// Returns the node id at the most recently used position.
    pub fn front_id(&self) -> Option<SlotId> {
        self.head
    }

    /// Returns the node id at the least recently used position.
    pub fn back_id(&self) -> Option<SlotId> {
        self.tail
    }

    /// Returns the page held by node `id`, if present.
    pub fn get(&self, id: SlotId) -> Option<&Page> {
        self.arena.get(id).map(|node| &node.page)
    }

    /// Inserts `page` as the new head and returns the node id.
    pub fn push_front(&mut self, page: Page) -> SlotId {
        let id = self.arena.insert(Node {
            page,
            prev: None,
            next: self.head,
        });
        if let Some(head) = self.head {
            if let Some(node) = self.arena.get_mut(head) {
                node.prev = Some(id);
            }
        } else {
            self.tail = Some(id);
        }
        self.head = Some(id);
        id
    }

    /// Inserts `page` as the new tail and returns the node id.
    pub fn push_back(&mut self, page: Page) -> SlotId {
        let id = self.arena.insert(Node {
            page,
            prev: self.tail,
            next: None,
        });
        if let Some(tail) = self.tail {
            if let Some(node) = self.arena.get_mut(tail) {
                node.next = Some(id);
            }
        } else {
            self.head = Some(id);
        }
        self.tail = Some(id);
        id
    }

    /// Removes and returns the head page; `None` on an empty list.
    pub fn pop_front(&mut self) -> Option<Page> {
        let id = self.head?;
        self.detach(id)?;
        self.arena.remove(id).map(|node| node.page)
    }

    /// Removes and returns the tail page; `None` on an empty list.
    pub fn pop_back(&mut self) -> Option<Page> {
        let id = self.tail?;
        self.detach(id)?;
        self.arena.remove(id).map(|node| node.page)
    }

    /// Removes node `id` from the list and returns its page.
    pub fn remove(&mut self, id: SlotId) -> Option<Page> {
        self.detach(id)?;
        self.arena.remove(id).map(|node| node.page)
    }

    /// Promotes node `id` to the head without destroying or reallocating it.
    ///
    /// No-op (returning `true`) if `id` is already the head; `false` if `id`
    /// is not a live node.
    pub fn move_to_front(&mut self, id: SlotId) -> bool {
        if !self.arena.contains(id) {
            return false;
        }
        if Some(id) == self.head {
            return true;
        }
        self.detach(id);
        self.attach_front(id);
        true
    }

    /// Iterates pages from most to least recently used.
    pub fn iter(&self) -> RecencyIter<'_> {
        RecencyIter {
            list: self,
            current: self.head,
        }
    }

    /// Drops every node and resets the list.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.head = None;
        self.tail = None;
    }

    fn detach(&mut self, id: SlotId) -> Option<()> {
        let (prev, next) = {
            let node = self.arena.get(id)?;
            (node.prev, node.next)
        };

        if let Some(prev_id) = prev {
            if let Some(prev_node) = self.arena.get_mut(prev_id) {
                prev_node.next = next;
            }
        } else {
            self.head = next;
        }

        if let Some(next_id) = next {
            if let Some(next_node) = self.arena.get_mut(next_id) {
                next_node.prev = prev;
            }
        } else {
            self.tail = prev;
        }

        if let Some(node) = self.arena.get_mut(id) {
            node.prev = None;
            node.next = None;
        }

        Some(())
    }

    fn attach_front(&mut self, id: SlotId) -> Option<()> {
        let old_head = self.head;
        if let Some(node) = self.arena.get_mut(id) {
            node.prev = None;
            node.next = old_head;
        } else {
            return None;
        }
        if let Some(old_head) = old_head {
            if let Some(head_node) = self.arena.get_mut(old_head) {
                head_node.prev = Some(id);
            }
        } else {
            self.tail = Some(id);
        }
        self.head = Some(id);
        Some(())
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if self.head.is_none() || self.tail.is_none() {
            assert!(self.head.is_none());
            assert!(self.tail.is_none());
            assert_eq!(self.len(), 0);
            return;
        }

        let mut seen = std::collections::HashSet::new();
        let mut count = 0usize;
        let mut current = self.head;
        let mut prev = None;

        while let Some(id) = current {
            assert!(seen.insert(id));
            let node = self.arena.get(id).expect("linked node missing from arena");
            assert_eq!(node.prev, prev);
            if node.next.is_none() {
                assert_eq!(self.tail, Some(id));
            }
            prev = Some(id);
            current = node.next;
            count += 1;
            assert!(count <= self.len());
        }

        assert_eq!(count, self.len());
        assert_eq!(self.arena.len(), self.len());
    }
}

impl Default for RecencyList {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over pages from MRU to LRU.
pub struct RecencyIter<'a> {
    list: &'a RecencyList,
    current: Option<SlotId>,
}

impl<'a> Iterator for RecencyIter<'a> {
    type Item = &'a Page;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let node = self.list.arena.get(id)?;
        self.current = node.next;
        Some(&node.page)
    }
}
