mod insert;
mod query;
mod remove;
mod split;

use enum_as_inner::EnumAsInner;
use slotmap::{Key, SlotMap};
use tap::Pipe;

use crate::error::{Error, Result};
use crate::primitive::{Bound, Vector};

/* ---------------------------------------------------------------------------------------------- */
/*                                             R-TREE                                             */
/* ---------------------------------------------------------------------------------------------- */

/// A dynamic R-tree. Every entry is a `(Bound<V>, T)` pair.
///
/// All nodes, directory and entry alike, are stored in one arena. Ownership always points
/// downward through `children`; the `parent` of a node is only a lookup key used to walk
/// back to the root while the tree is rebalanced.
pub struct Tree<V: Vector, T> {
    nodes: SlotMap<NodeIndex, TreeNode<V, T>>,
    root: NodeIndex,
    capacity: Capacity,
    len: usize,
}

/// Planar tree with `f64` coordinates.
pub type RTree<T> = Tree<[f64; 2], T>;

#[derive(EnumAsInner)]
enum TreeNode<V: Vector, T> {
    Directory(DirectoryNode<V>),
    Entry(EntryNode<V, T>),
}

struct DirectoryNode<V: Vector> {
    /// Always the exact union of `children` bounds.
    bound: Bound<V>,

    /// Leaf-level nodes are height 1; entries below them are conceptually height 0.
    height: usize,
    children: Vec<NodeIndex>,

    /// Null for root.
    parent: NodeIndex,
}

struct EntryNode<V: Vector, T> {
    bound: Bound<V>,
    value: T,

    // Leaf-level directory holding this entry. Lets removal by key skip the search.
    owner: NodeIndex,
}

impl<V: Vector> DirectoryNode<V> {
    fn new(height: usize, parent: NodeIndex, capacity: &Capacity) -> Self {
        Self {
            bound: Bound::empty(),
            height,
            // One extra slot for the overflowing child right before a split. Huge fan-outs grow
            // on demand instead.
            children: Vec::with_capacity(capacity.max.min(MAX_PREALLOC_CHILDREN) + 1),
            parent,
        }
    }

    fn is_leaf_level(&self) -> bool {
        self.height == 1
    }
}

const MAX_PREALLOC_CHILDREN: usize = 64;

/* ------------------------------------------ Capacity ------------------------------------------ */

/// Fill factor of tree nodes. Every non-root node keeps between `min` and `max` children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capacity {
    max: usize,
    min: usize,
}

impl Capacity {
    /// Fails with [`Error::InvalidConfiguration`] if `max` is less than 2. The minimum fill is
    /// derived as `ceil(max / 2)`.
    pub fn new(max: usize) -> Result<Self> {
        if max < 2 {
            return Err(Error::InvalidConfiguration { max });
        }

        Ok(Self {
            max,
            min: max.div_ceil(2),
        })
    }

    pub fn max(&self) -> usize {
        self.max
    }

    pub fn min(&self) -> usize {
        self.min
    }
}

impl Default for Capacity {
    fn default() -> Self {
        Self { max: 9, min: 5 }
    }
}

/* --------------------------------------- Public Tree API -------------------------------------- */

impl<V: Vector, T> Default for Tree<V, T> {
    fn default() -> Self {
        Capacity::default().pipe(Self::with_capacity)
    }
}

impl<V: Vector, T> Tree<V, T> {
    /// Creates an empty tree holding at most `max` children per node.
    pub fn new(max: usize) -> Result<Self> {
        Capacity::new(max).map(Self::with_capacity)
    }

    pub fn with_capacity(capacity: Capacity) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(TreeNode::Directory(DirectoryNode::new(
            1,
            NodeIndex::null(),
            &capacity,
        )));

        Self {
            nodes,
            root,
            capacity,
            len: 0,
        }
    }

    pub fn capacity(&self) -> Capacity {
        self.capacity
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Height of the root node. An empty tree has height 1.
    pub fn height(&self) -> usize {
        self.dir(self.root).height
    }

    /// Bound of every stored entry; empty rectangle for an empty tree.
    pub fn bound(&self) -> &Bound<V> {
        &self.dir(self.root).bound
    }

    pub fn root(&self) -> NodeIndex {
        self.root
    }

    pub fn get(&self, entry: NodeIndex) -> Option<&T> {
        self.nodes.get(entry)?.as_entry().map(|x| &x.value)
    }

    pub fn get_mut(&mut self, entry: NodeIndex) -> Option<&mut T> {
        self.nodes.get_mut(entry)?.as_entry_mut().map(|x| &mut x.value)
    }

    pub fn bound_of(&self, entry: NodeIndex) -> Option<&Bound<V>> {
        self.nodes.get(entry)?.as_entry().map(|x| &x.bound)
    }

    /// Drops every entry and starts over from an empty root. Keys handed out before are
    /// invalidated.
    pub fn clear(&mut self) {
        log::debug!("clearing r-tree of {} entries", self.len);

        self.nodes.clear();
        self.root = self.nodes.insert(TreeNode::Directory(DirectoryNode::new(
            1,
            NodeIndex::null(),
            &self.capacity,
        )));
        self.len = 0;
    }

    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats {
            height: self.height(),
            ..Default::default()
        };

        for node in self.nodes.values() {
            match node {
                TreeNode::Directory(dir) => {
                    stats.directory_nodes += 1;
                    stats.leaf_nodes += dir.is_leaf_level() as usize;
                }
                TreeNode::Entry(_) => stats.entries += 1,
            }
        }

        stats
    }
}

/// Snapshot of the tree shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub entries: usize,

    /// Including the root and the leaf-level nodes.
    pub directory_nodes: usize,
    pub leaf_nodes: usize,
    pub height: usize,
}

/// Structural change reported by [`Tree::insert_with`] and [`Tree::remove_entry_with`].
#[derive(EnumAsInner, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeEvent {
    /// `from` overflowed; part of its children moved into the new sibling `into`.
    Split { from: NodeIndex, into: NodeIndex },

    /// The root was split, and a new root of `height` was put on top.
    Grow { root: NodeIndex, height: usize },

    /// Underfull `node` was detached during removal; its `orphans` entries are reinserted.
    Condense { node: NodeIndex, orphans: usize },

    /// The root had a single child left, which became the new root.
    Shrink { root: NodeIndex, height: usize },
}

/* ---------------------------------------- Internal APIs --------------------------------------- */

impl<V: Vector, T> Tree<V, T> {
    fn dir(&self, id: NodeIndex) -> &DirectoryNode<V> {
        match &self.nodes[id] {
            TreeNode::Directory(dir) => dir,
            TreeNode::Entry(_) => unreachable!("entry {id:?} used as a directory node"),
        }
    }

    fn dir_mut(&mut self, id: NodeIndex) -> &mut DirectoryNode<V> {
        match &mut self.nodes[id] {
            TreeNode::Directory(dir) => dir,
            TreeNode::Entry(_) => unreachable!("entry {id:?} used as a directory node"),
        }
    }

    fn bound_at(&self, id: NodeIndex) -> &Bound<V> {
        match &self.nodes[id] {
            TreeNode::Directory(dir) => &dir.bound,
            TreeNode::Entry(entry) => &entry.bound,
        }
    }

    fn set_parent(&mut self, id: NodeIndex, parent: NodeIndex) {
        match &mut self.nodes[id] {
            TreeNode::Directory(dir) => dir.parent = parent,
            TreeNode::Entry(entry) => entry.owner = parent,
        }
    }

    /// Appends `child` to `node` and grows `node` bound to cover it.
    fn push_child(&mut self, node: NodeIndex, child: NodeIndex) {
        let bound = *self.bound_at(child);
        self.set_parent(child, node);

        let dir = self.dir_mut(node);
        dir.children.push(child);
        dir.bound.expand(&bound);
    }

    /// Recomputes the bound of `node` from scratch, so that it never stays wider than needed.
    fn refresh_bound(&mut self, node: NodeIndex) {
        let bound = self
            .dir(node)
            .children
            .iter()
            .fold(Bound::empty(), |acc, &x| acc.union(self.bound_at(x)));

        self.dir_mut(node).bound = bound;
    }
}

/* ----------------------------------------- Validation ----------------------------------------- */

impl<V: Vector, T> Tree<V, T> {
    /// Walks the whole tree and checks the fill factor, height balance, bound tightness, parent
    /// linkage and entry count.
    #[doc(hidden)]
    pub fn __debug_verify_tree_state(&self) -> std::result::Result<(), String> {
        let Capacity { min, max } = self.capacity;

        match self.nodes.get(self.root) {
            Some(TreeNode::Directory(root)) if root.parent.is_null() => {}
            Some(TreeNode::Directory(_)) => return Err("root has a parent".into()),
            _ => return Err(format!("root {:?} is not a directory node", self.root)),
        }

        let mut stack = vec![self.root];
        let mut num_reached = 1;
        let mut num_entries = 0;

        while let Some(id) = stack.pop() {
            let dir = self
                .nodes
                .get(id)
                .and_then(|x| x.as_directory())
                .ok_or_else(|| format!("{id:?} is not a directory node"))?;

            let num_children = dir.children.len();

            if num_children > max {
                return Err(format!("{id:?} holds {num_children} children, max {max}"));
            }

            if id != self.root && num_children < min {
                return Err(format!("{id:?} holds {num_children} children, min {min}"));
            }

            if dir.height == 0 {
                return Err(format!("directory node {id:?} has height 0"));
            }

            let mut union = Bound::empty();

            for &child in &dir.children {
                num_reached += 1;

                match self.nodes.get(child) {
                    None => return Err(format!("{id:?} holds dangling child {child:?}")),
                    Some(TreeNode::Directory(sub)) => {
                        if sub.height + 1 != dir.height {
                            return Err(format!(
                                "{child:?} of height {} is under {id:?} of height {}",
                                sub.height, dir.height
                            ));
                        }

                        if sub.parent != id {
                            return Err(format!("{child:?} does not point back to {id:?}"));
                        }

                        union.expand(&sub.bound);
                        stack.push(child);
                    }
                    Some(TreeNode::Entry(entry)) => {
                        if dir.is_leaf_level() == false {
                            return Err(format!("entry {child:?} is under non-leaf {id:?}"));
                        }

                        if entry.owner != id {
                            return Err(format!("entry {child:?} does not point back to {id:?}"));
                        }

                        union.expand(&entry.bound);
                        num_entries += 1;
                    }
                }
            }

            if union != dir.bound {
                return Err(format!(
                    "{id:?} bound {:?} differs from its children union {:?}",
                    dir.bound, union
                ));
            }
        }

        if num_entries != self.len {
            return Err(format!("found {num_entries} entries, expected {}", self.len));
        }

        if num_reached != self.nodes.len() {
            return Err(format!(
                "{} nodes are not reachable from root",
                self.nodes.len() - num_reached
            ));
        }

        Ok(())
    }
}

/* ------------------------------------------ Id Types ------------------------------------------ */

slotmap::new_key_type! {
    /// Index of tree node or entry
    pub struct NodeIndex;
}

/* ---------------------------------------------------------------------------------------------- */
/*                                              TESTS                                             */
/* ---------------------------------------------------------------------------------------------- */
