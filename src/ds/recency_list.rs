//! Recency-ordered doubly linked list backed by [`SlotArena`].
//!
//! Nodes live in a `SlotArena` and link to each other by `SlotId`, so list
//! surgery is plain index rewriting with no pointer aliasing. Handles are
//! stable: `move_to_back` splices the existing slot instead of reallocating,
//! which means an external index keyed by `SlotId` never needs updating when
//! an entry is promoted.
//!
//! Orientation: **front = least recently used, back = most recently used.**
//! New entries go in at the back; eviction pops the front.
//!
//! ```text
//!   arena (SlotArena<Node<T>>)
//!   ┌────────┬─────────────────────────────────────────────┐
//!   │ SlotId │ Node { value, prev, next }                  │
//!   ├────────┼─────────────────────────────────────────────┤
//!   │ id_1   │ { value: A, prev: None, next: Some(id_2) }  │
//!   │ id_2   │ { value: B, prev: Some(id_1), next: id_3 }  │
//!   │ id_3   │ { value: C, prev: Some(id_2), next: None }  │
//!   └────────┴─────────────────────────────────────────────┘
//!
//!   front ─► [id_1] ◄──► [id_2] ◄──► [id_3] ◄── back
//!   (LRU)                                       (MRU)
//! ```
//!
//! All positional operations (`push_back`, `pop_front`, `move_to_back`,
//! `remove`) are O(1); `iter` is O(n).

use crate::ds::slot_arena::{SlotArena, SlotId};

#[derive(Debug)]
struct Node<T> {
    value: T,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

/// Doubly linked list over a `SlotArena`, ordered front (LRU) to back (MRU).
#[derive(Debug)]
pub struct RecencyList<T> {
    arena: SlotArena<Node<T>>,
    front: Option<SlotId>,
    back: Option<SlotId>,
}

impl<T> RecencyList<T> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self {
            arena: SlotArena::new(),
            front: None,
            back: None,
        }
    }

    /// Creates an empty list with reserved node capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: SlotArena::with_capacity(capacity),
            front: None,
            back: None,
        }
    }

    /// Number of nodes in the list.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Returns `true` if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Returns `true` if `id` is currently a node in this list.
    pub fn contains(&self, id: SlotId) -> bool {
        self.arena.contains(id)
    }

    /// Returns the least-recent value, if any.
    pub fn front(&self) -> Option<&T> {
        self.front
            .and_then(|id| self.arena.get(id).map(|node| &node.value))
    }

    /// Returns the `SlotId` of the least-recent node, if any.
    pub fn front_id(&self) -> Option<SlotId> {
        self.front
    }

    /// Returns the most-recent value, if any.
    pub fn back(&self) -> Option<&T> {
        self.back
            .and_then(|id| self.arena.get(id).map(|node| &node.value))
    }

    /// Returns the `SlotId` of the most-recent node, if any.
    pub fn back_id(&self) -> Option<SlotId> {
        self.back
    }

    /// Returns the value for a node id, if present.
    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.arena.get(id).map(|node| &node.value)
    }

    /// Returns a mutable reference to a node value, if present.
    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.arena.get_mut(id).map(|node| &mut node.value)
    }

    /// Appends a new node at the back (most-recent position).
    pub fn push_back(&mut self, value: T) -> SlotId {
        let id = self.arena.insert(Node {
            value,
            prev: self.back,
            next: None,
        });
        if let Some(back) = self.back {
            if let Some(node) = self.arena.get_mut(back) {
                node.next = Some(id);
            }
        } else {
            self.front = Some(id);
        }
        self.back = Some(id);
        id
    }

    /// Removes and returns the front (least-recent) value.
    pub fn pop_front(&mut self) -> Option<T> {
        let id = self.front?;
        self.detach(id)?;
        self.arena.remove(id).map(|node| node.value)
    }

    /// Removes the node `id` from the list and returns its value.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        self.detach(id)?;
        self.arena.remove(id).map(|node| node.value)
    }

    /// Splices an existing node out and relinks it at the back, keeping its
    /// `SlotId`. Returns `false` if `id` is not present.
    pub fn move_to_back(&mut self, id: SlotId) -> bool {
        if !self.arena.contains(id) {
            return false;
        }
        if Some(id) == self.back {
            return true;
        }
        self.detach(id);
        self.attach_back(id);
        true
    }

    /// Removes every node and frees all slots.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.front = None;
        self.back = None;
    }

    /// Iterates values front to back (LRU to MRU).
    pub fn iter(&self) -> RecencyIter<'_, T> {
        RecencyIter {
            list: self,
            current: self.front,
        }
    }

    /// Iterates `SlotId`s front to back.
    pub fn iter_ids(&self) -> RecencyIdIter<'_, T> {
        RecencyIdIter {
            list: self,
            current: self.front,
        }
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
            self.front = next;
        }

        if let Some(next_id) = next {
            if let Some(next_node) = self.arena.get_mut(next_id) {
                next_node.prev = prev;
            }
        } else {
            self.back = prev;
        }

        if let Some(node) = self.arena.get_mut(id) {
            node.prev = None;
            node.next = None;
        }

        Some(())
    }

    fn attach_back(&mut self, id: SlotId) -> Option<()> {
        let old_back = self.back;
        if let Some(node) = self.arena.get_mut(id) {
            node.next = None;
            node.prev = old_back;
        } else {
            return None;
        }
        if let Some(old_back) = old_back {
            if let Some(back_node) = self.arena.get_mut(old_back) {
                back_node.next = Some(id);
            }
        } else {
            self.front = Some(id);
        }
        self.back = Some(id);
        Some(())
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if self.front.is_none() || self.back.is_none() {
            assert!(self.front.is_none());
            assert!(self.back.is_none());
            assert_eq!(self.len(), 0);
            return;
        }

        let mut seen = std::collections::HashSet::new();
        let mut count = 0usize;
        let mut current = self.front;
        let mut prev = None;

        while let Some(id) = current {
            assert!(seen.insert(id), "cycle through {:?}", id);
            let node = self.arena.get(id).expect("linked node missing from arena");
            assert_eq!(node.prev, prev);
            if node.next.is_none() {
                assert_eq!(self.back, Some(id));
            }
            prev = Some(id);
            current = node.next;
            count += 1;
            assert!(count <= self.len());
        }

        assert_eq!(count, self.len());
    }
}

impl<T> Default for RecencyList<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Front-to-back value iterator over a [`RecencyList`].
pub struct RecencyIter<'a, T> {
    list: &'a RecencyList<T>,
    current: Option<SlotId>,
}

impl<'a, T> Iterator for RecencyIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let node = self.list.arena.get(id)?;
        self.current = node.next;
        Some(&node.value)
    }
}

/// Front-to-back `SlotId` iterator over a [`RecencyList`].
pub struct RecencyIdIter<'a, T> {
    list: &'a RecencyList<T>,
    current: Option<SlotId>,
}

impl<T> Iterator for RecencyIdIter<'_, T> {
    type Item = SlotId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.list.arena.get(id)?.next;
        Some(id)
    }
}
