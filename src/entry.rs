//! Tree entries and their link slots.
//!
//! Each side of an [`Entry`] is a single [`Link`]: either a real child, a
//! thread to the in-order neighbour on that side, or nothing (the first
//! entry's left slot and the last entry's right slot).

/// Index of an entry inside its tree's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// Placeholder for unused scratch-path slots.
    pub(crate) const DANGLING: NodeId = NodeId(u32::MAX);

    #[inline]
    pub(crate) fn new(idx: usize) -> Self {
        Self(u32::try_from(idx).expect("tree holds more than u32::MAX entries"))
    }

    #[inline]
    pub(crate) fn idx(self) -> usize {
        self.0 as usize
    }
}

/// One side of an entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Link {
    /// Real child owned by this entry.
    Child(NodeId),
    /// In-order predecessor (left side) or successor (right side).
    Thread(NodeId),
    /// Threaded past the first or last key.
    None,
}

impl Link {
    #[inline]
    pub fn child(self) -> Option<NodeId> {
        match self {
            Link::Child(id) => Some(id),
            _ => None,
        }
    }

    #[inline]
    pub fn thread(self) -> Option<NodeId> {
        match self {
            Link::Thread(id) => Some(id),
            _ => None,
        }
    }

    #[inline]
    pub fn is_threaded(self) -> bool {
        !matches!(self, Link::Child(_))
    }
}

/// Side of an entry, recorded on the insertion path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Dir {
    Left,
    Right,
}

impl Dir {
    #[inline]
    pub(crate) fn opposite(self) -> Self {
        match self {
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

/// A key/value pair plus its two link slots and color.
#[derive(Clone, Debug)]
pub struct Entry {
    key: i32,
    value: i32,
    left: Link,
    right: Link,
    black: bool,
}

impl Entry {
    /// New entries are red.
    #[inline]
    pub(crate) fn new(key: i32, value: i32, left: Link, right: Link) -> Self {
        Self {
            key,
            value,
            left,
            right,
            black: false,
        }
    }

    #[inline]
    pub fn key(&self) -> i32 {
        self.key
    }

    #[inline]
    pub fn value(&self) -> i32 {
        self.value
    }

    #[inline]
    pub(crate) fn replace_value(&mut self, value: i32) -> i32 {
        std::mem::replace(&mut self.value, value)
    }

    /// Real left child; threads are never exposed as children.
    #[inline]
    pub fn left(&self) -> Option<NodeId> {
        self.left.child()
    }

    /// Real right child; threads are never exposed as children.
    #[inline]
    pub fn right(&self) -> Option<NodeId> {
        self.right.child()
    }

    /// Predecessor thread target, if the left slot is a thread.
    #[inline]
    pub fn predecessor(&self) -> Option<NodeId> {
        self.left.thread()
    }

    /// Successor thread target, if the right slot is a thread.
    #[inline]
    pub fn successor(&self) -> Option<NodeId> {
        self.right.thread()
    }

    #[inline]
    pub fn is_predecessor_threaded(&self) -> bool {
        self.left.is_threaded()
    }

    #[inline]
    pub fn is_successor_threaded(&self) -> bool {
        self.right.is_threaded()
    }

    #[inline]
    pub fn is_black(&self) -> bool {
        self.black
    }

    #[inline]
    pub(crate) fn set_black(&mut self, black: bool) {
        self.black = black;
    }

    #[inline]
    pub(crate) fn set_left_child(&mut self, child: NodeId) {
        self.left = Link::Child(child);
    }

    #[inline]
    pub(crate) fn set_right_child(&mut self, child: NodeId) {
        self.right = Link::Child(child);
    }

    #[inline]
    pub(crate) fn set_predecessor_thread(&mut self, pred: Option<NodeId>) {
        self.left = pred.map_or(Link::None, Link::Thread);
    }

    #[inline]
    pub(crate) fn set_successor_thread(&mut self, succ: Option<NodeId>) {
        self.right = succ.map_or(Link::None, Link::Thread);
    }

    #[inline]
    pub(crate) fn link(&self, dir: Dir) -> Link {
        match dir {
            Dir::Left => self.left,
            Dir::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn set_link(&mut self, dir: Dir, link: Link) {
        match dir {
            Dir::Left => self.left = link,
            Dir::Right => self.right = link,
        }
    }
}
