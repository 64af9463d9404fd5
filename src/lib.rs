//! # threaded-forest
//!
//! An insert-and-search ordered map from `i32` to `i32`, built as a threaded
//! red-black tree, plus a forest search that co-walks a pattern against
//! trees linked through their stored values.
//!
//! Empty child slots hold threads to the in-order neighbour, so cursors step
//! in O(1) without a stack and can re-seek to any key in O(log n).
//!
//! ## Example
//!
//! ```rust
//! use threaded_forest::{Forest, Tree};
//!
//! let mut tree = Tree::new();
//! tree.put(10, 1);
//! tree.put(20, 2);
//! tree.put(30, 3);
//! assert_eq!(tree.get(20), 2);
//!
//! let mut it = tree.key_iter_from(15);
//! assert_eq!(it.next_key(), 20);
//! assert_eq!(it.next_key(), 30);
//! assert!(!it.has_next());
//!
//! let mut forest = Forest::new(2);
//! forest.insert(0, [(1, 1), (2, -1)].into_iter().collect()).unwrap();
//! forest.insert(1, [(1, -1), (3, -1)].into_iter().collect()).unwrap();
//! let pattern: Tree = (0..5).map(|k| (k, k)).collect();
//! let report = forest.search(&pattern, 0).unwrap();
//! assert_eq!(report.matches, 4);
//! ```
//!
//! ## Absent values
//!
//! `put` and `get` report a missing key as [`ABSENT`] (`0`), which a stored
//! `0` cannot be told apart from. [`Tree::contains_key`] answers presence.

#![deny(unsafe_code)]

#[macro_use]
mod tracing_helpers;

mod cursor;
mod entry;
mod error;
mod forest;
mod tree;

pub use cursor::KeyIter;
pub use entry::{Entry, Link, NodeId};
pub use error::{ForestError, Result};
pub use forest::{Forest, Match, SearchConfig, SearchReport};
pub use tree::{Iter, Tree, ABSENT, MAX_HEIGHT};
