//! Re-seekable key cursor over a [`Tree`].

use crate::entry::NodeId;
use crate::tree::Tree;

/// Bidirectional cursor that sits between two entries.
///
/// `prev` and `next` are the entries on either side of the cursor; `curr` is
/// the entry most recently stepped over. The tree is borrowed for the cursor's
/// lifetime, so it cannot be mutated underneath it.
///
/// Stepping past either end is a caller bug and panics; check
/// [`has_next`](Self::has_next) / [`has_previous`](Self::has_previous) first.
#[derive(Clone)]
pub struct KeyIter<'a> {
    tree: &'a Tree,
    prev: Option<NodeId>,
    next: Option<NodeId>,
    curr: Option<NodeId>,
    index: isize,
}

impl<'a> KeyIter<'a> {
    pub(crate) fn new(tree: &'a Tree) -> Self {
        Self {
            tree,
            prev: None,
            next: tree.first_id(),
            curr: None,
            index: 0,
        }
    }

    #[inline]
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    #[inline]
    pub fn has_previous(&self) -> bool {
        self.prev.is_some()
    }

    /// Steps forward and returns the key stepped over.
    pub fn next_key(&mut self) -> i32 {
        let id = self
            .next
            .expect("next_key called with no next key; check has_next first");
        self.curr = Some(id);
        self.prev = Some(id);
        self.next = self.tree.successor(id);
        self.index += 1;
        self.tree.entry(id).key()
    }

    /// Steps backward and returns the key stepped over.
    pub fn previous_key(&mut self) -> i32 {
        let id = self
            .prev
            .expect("previous_key called with no previous key; check has_previous first");
        self.curr = Some(id);
        self.next = Some(id);
        self.prev = self.tree.predecessor(id);
        self.index -= 1;
        self.tree.entry(id).key()
    }

    /// Key `next_key` would return, without moving.
    #[inline]
    pub fn peek_next_key(&self) -> Option<i32> {
        self.next.map(|id| self.tree.entry(id).key())
    }

    #[inline]
    pub fn current_key(&self) -> Option<i32> {
        self.curr.map(|id| self.tree.entry(id).key())
    }

    /// Value of the entry last stepped over.
    #[inline]
    pub fn current_value(&self) -> Option<i32> {
        self.curr.map(|id| self.tree.entry(id).value())
    }

    /// Net steps taken since construction or the last reposition.
    #[inline]
    pub fn index(&self) -> isize {
        self.index
    }

    /// Repositions so the next key is the smallest key strictly greater than
    /// `key`. One descent, O(height).
    pub fn jump(&mut self, key: i32) {
        self.curr = None;
        self.index = 0;
        match self.tree.locate(key) {
            None => {
                self.prev = None;
                self.next = None;
            }
            Some(at) if self.tree.entry(at).key() <= key => {
                self.prev = Some(at);
                self.next = self.tree.successor(at);
            }
            Some(at) => {
                self.prev = self.tree.predecessor(at);
                self.next = Some(at);
            }
        }
    }

    /// Repositions so the next key is the smallest key `>= key`.
    pub fn seek(&mut self, key: i32) {
        match key.checked_sub(1) {
            Some(before) => self.jump(before),
            None => self.rewind(),
        }
    }

    /// Repositions before the first key.
    pub fn rewind(&mut self) {
        self.prev = None;
        self.next = self.tree.first_id();
        self.curr = None;
        self.index = 0;
    }
}
