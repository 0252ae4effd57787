//! Dynamic R-tree over axis aligned rectangles, balanced with Guttman's quadratic split.
//!
//! Nodes live in a single slotmap arena; parent links are plain keys. See [`Tree`].

#![allow(clippy::bool_comparison)]

pub mod error;
pub mod primitive;
pub mod rtree;

pub use error::{Error, Result};
pub use primitive::{Bound, Number, NumberCommon, Vector};
pub use rtree::{Capacity, NodeIndex, RTree, Tree, TreeEvent, TreeStats};

// Reexport necessary items.
pub use slotmap::Key;
