//! Threaded red-black tree over `i32` keys.
//!
//! Entries live in an arena and refer to each other by [`NodeId`]. Every
//! empty child slot is a thread to the in-order neighbour on that side, so
//! stepping a cursor never needs a parent pointer or a stack.

use std::cmp::Ordering;
use std::fmt;

use crate::cursor::KeyIter;
use crate::entry::{Dir, Entry, Link, NodeId};

// =============================================================================
// Configuration
// =============================================================================

/// Deepest insertion path `put` can record. A red-black tree holding fewer
/// than 2^32 entries is at most 64 levels deep.
pub const MAX_HEIGHT: usize = 64;

/// What `put` and `get` return for an absent key.
///
/// A stored value of `0` is indistinguishable from this; use
/// [`Tree::contains_key`] when the difference matters.
pub const ABSENT: i32 = 0;

// =============================================================================
// Tree
// =============================================================================

/// Insert-and-search ordered map from `i32` to `i32`.
#[derive(Clone)]
pub struct Tree {
    entries: Vec<Entry>,
    root: Option<NodeId>,
    first: Option<NodeId>,
    last: Option<NodeId>,

    // Scratch for `put`: the entries visited and the side taken at each.
    node_path: [NodeId; MAX_HEIGHT],
    dir_path: [Dir; MAX_HEIGHT],
}

impl Tree {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            root: None,
            first: None,
            last: None,
            node_path: [NodeId::DANGLING; MAX_HEIGHT],
            dir_path: [Dir::Left; MAX_HEIGHT],
        }
    }

    /// Entries are never removed, so this is also the arena size.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn first_key(&self) -> Option<i32> {
        self.first.map(|id| self.node(id).key())
    }

    #[inline]
    pub fn last_key(&self) -> Option<i32> {
        self.last.map(|id| self.node(id).key())
    }

    #[inline]
    pub fn root_id(&self) -> Option<NodeId> {
        self.root
    }

    #[inline]
    pub fn first_id(&self) -> Option<NodeId> {
        self.first
    }

    #[inline]
    pub fn last_id(&self) -> Option<NodeId> {
        self.last
    }

    /// Panics if `id` did not come from this tree.
    #[inline]
    pub fn entry(&self, id: NodeId) -> &Entry {
        &self.entries[id.idx()]
    }

    /// Number of levels on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack: Vec<(NodeId, usize)> = self.root.map(|r| (r, 1)).into_iter().collect();
        while let Some((id, depth)) = stack.pop() {
            height = height.max(depth);
            let e = self.node(id);
            if let Some(l) = e.left() {
                stack.push((l, depth + 1));
            }
            if let Some(r) = e.right() {
                stack.push((r, depth + 1));
            }
        }
        height
    }

    #[inline]
    fn node(&self, id: NodeId) -> &Entry {
        &self.entries[id.idx()]
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> &mut Entry {
        &mut self.entries[id.idx()]
    }

    #[inline]
    fn is_black(&self, id: NodeId) -> bool {
        self.node(id).is_black()
    }
}

// =============================================================================
// Lookup and navigation
// =============================================================================

impl Tree {
    /// Value stored under `key`, or [`ABSENT`].
    pub fn get(&self, key: i32) -> i32 {
        self.find(key).map_or(ABSENT, |id| self.node(id).value())
    }

    pub fn contains_key(&self, key: i32) -> bool {
        self.find(key).is_some()
    }

    fn find(&self, key: i32) -> Option<NodeId> {
        let mut cur = self.root;
        while let Some(id) = cur {
            let e = self.node(id);
            cur = match key.cmp(&e.key()) {
                Ordering::Less => e.left(),
                Ordering::Greater => e.right(),
                Ordering::Equal => return Some(id),
            };
        }
        None
    }

    /// Exact match, or the last entry visited by a failed descent. The latter
    /// is always the in-order predecessor or successor of `key`.
    pub(crate) fn locate(&self, key: i32) -> Option<NodeId> {
        let mut cur = self.root?;
        loop {
            let e = self.node(cur);
            let child = match key.cmp(&e.key()) {
                Ordering::Less => e.left(),
                Ordering::Greater => e.right(),
                Ordering::Equal => return Some(cur),
            };
            match child {
                Some(c) => cur = c,
                None => return Some(cur),
            }
        }
    }

    #[inline]
    pub(crate) fn successor(&self, id: NodeId) -> Option<NodeId> {
        self.neighbour(id, Dir::Right)
    }

    #[inline]
    pub(crate) fn predecessor(&self, id: NodeId) -> Option<NodeId> {
        self.neighbour(id, Dir::Left)
    }

    /// In-order neighbour on `dir`: O(1) through a thread, otherwise the
    /// nearest entry of the subtree on that side.
    fn neighbour(&self, id: NodeId, dir: Dir) -> Option<NodeId> {
        match self.node(id).link(dir) {
            Link::Thread(t) => Some(t),
            Link::None => None,
            Link::Child(mut cur) => {
                let back = dir.opposite();
                while let Link::Child(c) = self.node(cur).link(back) {
                    cur = c;
                }
                Some(cur)
            }
        }
    }

    /// Cursor positioned before the first key.
    pub fn key_iter(&self) -> KeyIter<'_> {
        KeyIter::new(self)
    }

    /// Cursor whose next key is the smallest key strictly greater than `from`.
    pub fn key_iter_from(&self, from: i32) -> KeyIter<'_> {
        let mut it = KeyIter::new(self);
        it.jump(from);
        it
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            tree: self,
            next: self.first,
            remaining: self.len(),
        }
    }
}

// =============================================================================
// Insertion
// =============================================================================

impl Tree {
    /// Inserts `key` or overwrites its value.
    ///
    /// Returns the previous value, or [`ABSENT`] if the key was new. An
    /// overwrite never changes the tree's shape or colors.
    pub fn put(&mut self, key: i32, value: i32) -> i32 {
        let Some(mut cur) = self.root else {
            let id = self.push(Entry::new(key, value, Link::None, Link::None));
            self.node_mut(id).set_black(true);
            self.root = Some(id);
            self.first = Some(id);
            self.last = Some(id);
            return ABSENT;
        };

        let mut depth = 0;
        let dir = loop {
            let e = &self.entries[cur.idx()];
            let dir = match key.cmp(&e.key()) {
                Ordering::Less => Dir::Left,
                Ordering::Greater => Dir::Right,
                Ordering::Equal => return self.entries[cur.idx()].replace_value(value),
            };
            debug_assert!(depth < MAX_HEIGHT, "insertion path exceeds MAX_HEIGHT");
            self.node_path[depth] = cur;
            self.dir_path[depth] = dir;
            depth += 1;
            match e.link(dir) {
                Link::Child(c) => cur = c,
                Link::Thread(_) | Link::None => break dir,
            }
        };

        self.attach(cur, dir, key, value);
        self.rebalance(depth);
        ABSENT
    }

    fn push(&mut self, entry: Entry) -> NodeId {
        let id = NodeId::new(self.entries.len());
        self.entries.push(entry);
        id
    }

    /// Hangs a new red entry on `parent`'s threaded `dir` slot. The new entry
    /// sits between `parent` and whatever that slot threaded to.
    fn attach(&mut self, parent: NodeId, dir: Dir, key: i32, value: i32) -> NodeId {
        let outer = self.node(parent).link(dir).thread();
        let mut entry = Entry::new(key, value, Link::None, Link::None);
        match dir {
            Dir::Left => {
                entry.set_predecessor_thread(outer);
                entry.set_successor_thread(Some(parent));
            }
            Dir::Right => {
                entry.set_predecessor_thread(Some(parent));
                entry.set_successor_thread(outer);
            }
        }

        let id = self.push(entry);
        match dir {
            Dir::Left => {
                self.node_mut(parent).set_left_child(id);
                if outer.is_none() {
                    self.first = Some(id);
                }
            }
            Dir::Right => {
                self.node_mut(parent).set_right_child(id);
                if outer.is_none() {
                    self.last = Some(id);
                }
            }
        }
        id
    }

    /// Restores the red-black invariants after attaching a red entry.
    ///
    /// `depth` is the path length of the entry being fixed: its parent is
    /// `node_path[depth - 1]` and it hangs on side `dir_path[depth - 1]`.
    fn rebalance(&mut self, mut depth: usize) {
        while depth > 0 {
            let parent = self.node_path[depth - 1];
            if self.is_black(parent) {
                break;
            }

            // A red parent is never the root, so a grandparent exists.
            let grand = self.node_path[depth - 2];
            let side = self.dir_path[depth - 2];
            let uncle = self.node(grand).link(side.opposite()).child();

            if let Some(uncle) = uncle.filter(|&u| !self.is_black(u)) {
                self.node_mut(parent).set_black(true);
                self.node_mut(uncle).set_black(true);
                self.node_mut(grand).set_black(false);
                depth -= 2;
                continue;
            }

            let mut top = parent;
            if self.dir_path[depth - 1] != side {
                top = self.rotate(parent, side);
                self.node_mut(grand).set_link(side, Link::Child(top));
            }
            let lifted = self.rotate(grand, side.opposite());
            debug_assert_eq!(lifted, top);
            self.node_mut(top).set_black(true);
            self.node_mut(grand).set_black(false);
            self.replace_child(depth - 2, top);
            break;
        }

        if let Some(root) = self.root {
            self.node_mut(root).set_black(true);
        }
    }

    /// Rotates `x` down towards `dir`, lifting its child on the other side,
    /// and returns the lifted entry. The caller relinks it under x's parent.
    ///
    /// The lifted entry's inner subtree moves across to `x`. When it has none,
    /// its inner slot was a thread back to `x`; `x` then threads to it instead.
    fn rotate(&mut self, x: NodeId, dir: Dir) -> NodeId {
        let up = dir.opposite();
        let y = self
            .node(x)
            .link(up)
            .child()
            .expect("rotation requires a real child on the lifted side");

        let moved = match self.node(y).link(dir) {
            Link::Child(inner) => Link::Child(inner),
            thread => {
                debug_assert_eq!(thread, Link::Thread(x));
                Link::Thread(y)
            }
        };
        self.node_mut(x).set_link(up, moved);
        self.node_mut(y).set_link(dir, Link::Child(x));
        y
    }

    /// Points whatever held `node_path[level]` at `child` instead.
    fn replace_child(&mut self, level: usize, child: NodeId) {
        if level == 0 {
            self.root = Some(child);
        } else {
            let parent = self.node_path[level - 1];
            let dir = self.dir_path[level - 1];
            self.node_mut(parent).set_link(dir, Link::Child(child));
        }
    }
}

// =============================================================================
// Trait impls
// =============================================================================

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl FromIterator<(i32, i32)> for Tree {
    fn from_iter<I: IntoIterator<Item = (i32, i32)>>(iter: I) -> Self {
        let mut tree = Tree::new();
        tree.extend(iter);
        tree
    }
}

impl Extend<(i32, i32)> for Tree {
    fn extend<I: IntoIterator<Item = (i32, i32)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<'a> IntoIterator for &'a Tree {
    type Item = (i32, i32);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// In-order `(key, value)` iterator that follows successor threads.
pub struct Iter<'a> {
    tree: &'a Tree,
    next: Option<NodeId>,
    remaining: usize,
}

impl Iterator for Iter<'_> {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        self.next = self.tree.successor(id);
        self.remaining -= 1;
        let e = self.tree.node(id);
        Some((e.key(), e.value()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}


#[cfg(test)]
mod proptests;
