//! Forest of trees linked through stored values, and the co-walk search.
//!
//! A value stored in one tree is read as the slot index of a child tree.
//! [`Forest::search`] walks a pattern tree's keys against a root tree and
//! descends into the child of every exact match, using an explicit stack
//! rather than recursion.

use crate::error::{ForestError, Result};
use crate::tree::Tree;

// =============================================================================
// Configuration
// =============================================================================

/// Runtime knobs for [`Forest::search_with`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchConfig {
    /// Number of nested levels a search may enter, the root being level 0.
    /// `None` leaves depth unbounded; only a walk that would repeat forever
    /// is rejected.
    pub max_depth: Option<usize>,
}

impl SearchConfig {
    pub fn with_max_depth(mut self, levels: usize) -> Self {
        self.max_depth = Some(levels);
        self
    }
}

// =============================================================================
// Results
// =============================================================================

/// One exact match between a pattern key and a tree key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Match {
    /// Nesting level of the tree searched, the root being 0.
    pub depth: usize,
    /// Slot of the tree searched.
    pub tree: usize,
    pub key: i32,
    /// Child tree the matched value names, `None` for a leaf.
    pub child: Option<usize>,
}

/// Totals for one search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchReport {
    pub matches: usize,
    /// Matches whose value names no child tree.
    pub leaf_matches: usize,
    /// Trees co-walked, the root included.
    pub descents: usize,
    pub max_depth: usize,
}

impl SearchReport {
    /// A match reached a leaf somewhere below the root.
    #[inline]
    pub fn found_leaf(&self) -> bool {
        self.leaf_matches > 0
    }
}

#[derive(Clone, Copy)]
struct SearchFrame {
    /// Smallest key the tree's walk may start at.
    start: i32,
    tree: usize,
    depth: usize,
}

// =============================================================================
// Forest
// =============================================================================

/// Fixed number of slots, each empty or holding a [`Tree`].
#[derive(Clone, Debug, Default)]
pub struct Forest {
    trees: Vec<Option<Tree>>,
}

impl Forest {
    pub fn new(slots: usize) -> Self {
        Self {
            trees: (0..slots).map(|_| None).collect(),
        }
    }

    /// Builds one tree per table row by `put`ting its `(key, value)` pairs in
    /// order. Later rows for the same slot replace earlier ones.
    pub fn from_table<'t>(
        slots: usize,
        table: impl IntoIterator<Item = (usize, &'t [(i32, i32)])>,
    ) -> Result<Self> {
        let mut forest = Self::new(slots);
        for (index, pairs) in table {
            forest.insert(index, pairs.iter().copied().collect())?;
        }
        debug_log!(slots, trees = forest.tree_count(), "forest built");
        Ok(forest)
    }

    /// Installs `tree` at `index`, returning the tree it replaced.
    pub fn insert(&mut self, index: usize, tree: Tree) -> Result<Option<Tree>> {
        let len = self.trees.len();
        let slot = self
            .trees
            .get_mut(index)
            .ok_or(ForestError::SlotOutOfRange { index, len })?;
        Ok(slot.replace(tree))
    }

    #[inline]
    pub fn slots(&self) -> usize {
        self.trees.len()
    }

    pub fn tree_count(&self) -> usize {
        self.trees.iter().filter(|t| t.is_some()).count()
    }

    #[inline]
    pub fn tree(&self, index: usize) -> Option<&Tree> {
        self.trees.get(index).and_then(Option::as_ref)
    }

    /// Slot a stored value names, if it names a present tree. Negative,
    /// out-of-range and empty-slot values are all leaf markers.
    pub fn child(&self, value: i32) -> Option<usize> {
        let index = usize::try_from(value).ok()?;
        self.tree(index).map(|_| index)
    }
}

// =============================================================================
// Search
// =============================================================================

impl Forest {
    /// Searches from the tree at `root` with the default [`SearchConfig`].
    pub fn search(&self, pattern: &Tree, root: usize) -> Result<SearchReport> {
        self.search_with(pattern, root, &SearchConfig::default(), |_| {})
    }

    /// Like [`search`](Self::search), calling `on_match` for every match.
    pub fn for_each_match(
        &self,
        pattern: &Tree,
        root: usize,
        on_match: impl FnMut(&Match),
    ) -> Result<SearchReport> {
        self.search_with(pattern, root, &SearchConfig::default(), on_match)
    }

    /// Every match, in the order the search finds them.
    pub fn matches(&self, pattern: &Tree, root: usize) -> Result<Vec<Match>> {
        let mut out = Vec::new();
        self.for_each_match(pattern, root, |m| out.push(*m))?;
        Ok(out)
    }

    /// Co-walks `pattern` against the tree at `root` and, for every exact
    /// match whose value names a child tree, against that child starting at
    /// the matched key.
    ///
    /// Within one tree both cursors advance together. When the pattern key is
    /// behind, the tree cursor steps back one key and the pattern cursor is
    /// re-seeked to the tree key unless its next key already reaches it. When
    /// the tree key is behind, both simply advance.
    pub fn search_with(
        &self,
        pattern: &Tree,
        root: usize,
        config: &SearchConfig,
        mut on_match: impl FnMut(&Match),
    ) -> Result<SearchReport> {
        if self.tree(root).is_none() {
            return Err(ForestError::RootMissing { index: root });
        }
        debug_log!(
            root,
            limit = ?config.max_depth,
            pattern_len = pattern.len(),
            "search start"
        );

        let mut report = SearchReport::default();
        let Some(pattern_first) = pattern.first_key() else {
            return Ok(report);
        };

        let mut stack: Vec<SearchFrame> = Vec::with_capacity(self.trees.len());
        stack.push(SearchFrame {
            start: pattern_first,
            tree: root,
            depth: 0,
        });
        // `(tree, from)` of each frame on the current root-to-frame path,
        // indexed by depth. `from` never decreases along a path, so a walk
        // only repeats forever if a pair comes back.
        let mut path: Vec<(usize, i32)> = Vec::new();
        let mut slice = pattern.key_iter();

        while let Some(frame) = stack.pop() {
            let Some(node) = self.tree(frame.tree) else {
                continue;
            };
            report.descents += 1;
            report.max_depth = report.max_depth.max(frame.depth);
            path.truncate(frame.depth);

            let Some(first) = node.first_key() else {
                continue;
            };
            let from = frame.start.max(first);
            path.push((frame.tree, from));
            trace_log!(tree = frame.tree, depth = frame.depth, from, "co-walk");
            slice.seek(from);
            let mut walk = node.key_iter();
            walk.seek(from);

            while slice.has_next() && walk.has_next() {
                let slice_key = slice.next_key();
                let tree_key = walk.next_key();

                if slice_key < tree_key {
                    walk.previous_key();
                    if slice.peek_next_key().is_some_and(|k| k < tree_key) {
                        slice.seek(tree_key);
                    }
                } else if slice_key == tree_key {
                    let child = walk.current_value().and_then(|v| self.child(v));
                    let m = Match {
                        depth: frame.depth,
                        tree: frame.tree,
                        key: slice_key,
                        child,
                    };
                    report.matches += 1;
                    if child.is_none() {
                        report.leaf_matches += 1;
                    }
                    on_match(&m);

                    if let Some(child) = child {
                        let depth = frame.depth + 1;
                        if let Some(limit) = config.max_depth.filter(|&l| depth >= l) {
                            warn_log!(tree = child, depth, limit, "search depth limit exceeded");
                            return Err(ForestError::DepthExceeded { depth, limit });
                        }
                        let child_from = self
                            .tree(child)
                            .and_then(Tree::first_key)
                            .map(|first| first.max(slice_key));
                        if let Some(key) = child_from.filter(|&k| path.contains(&(child, k))) {
                            warn_log!(tree = child, key, depth, "search re-enters a tree on its path");
                            return Err(ForestError::CycleDetected { tree: child, key });
                        }
                        stack.push(SearchFrame {
                            start: slice_key,
                            tree: child,
                            depth,
                        });
                    }
                }
            }
        }

        debug_log!(
            matches = report.matches,
            descents = report.descents,
            max_depth = report.max_depth,
            "search done"
        );
        Ok(report)
    }
}
