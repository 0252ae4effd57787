use slotmap::Key;

use super::{DirectoryNode, EntryNode, NodeIndex, Tree, TreeEvent, TreeNode};
use crate::primitive::{Bound, Vector};

impl<V: Vector, T> Tree<V, T> {
    /// Inserts `value` covering `bound`, and returns the key of the new entry.
    ///
    /// The key stays valid until the entry is removed or the tree is cleared, regardless of
    /// how many times the entry is moved by splits.
    pub fn insert(&mut self, bound: Bound<V>, value: T) -> NodeIndex {
        self.insert_with(bound, value, |_| {})
    }

    /// Same as [`Tree::insert`], and reports every node split and root growth to `on_event`.
    pub fn insert_with(
        &mut self,
        bound: Bound<V>,
        value: T,
        mut on_event: impl FnMut(TreeEvent),
    ) -> NodeIndex {
        let leaf = self.choose_leaf(&bound);
        let entry = self.nodes.insert(TreeNode::Entry(EntryNode {
            bound,
            value,
            owner: leaf,
        }));

        self.len += 1;
        self.place_entry(leaf, entry, &mut on_event);

        entry
    }

    /// Links an allocated entry under leaf-level `leaf`, then repairs every node on the way
    /// up to the root.
    pub(super) fn place_entry(
        &mut self,
        leaf: NodeIndex,
        entry: NodeIndex,
        on_event: &mut impl FnMut(TreeEvent),
    ) {
        debug_assert!(self.dir(leaf).is_leaf_level());

        self.push_child(leaf, entry);

        let sibling = self.split_overflow(leaf, on_event);
        self.adjust_tree(leaf, sibling, on_event);
    }

    /// Descends from the root to the leaf-level node that needs the least enlargement to
    /// include `bound`.
    ///
    /// Ties are broken by the smaller current area, then by fewer children. If still tied,
    /// the first child wins.
    pub(super) fn choose_leaf(&self, bound: &Bound<V>) -> NodeIndex {
        let mut node = self.root;

        loop {
            let dir = self.dir(node);

            if dir.is_leaf_level() {
                return node;
            }

            let mut best: Option<(NodeIndex, V::Num, V::Num, usize)> = None;

            for &child in &dir.children {
                let child_dir = self.dir(child);
                let growth = child_dir.bound.enlargement(bound);
                let area = child_dir.bound.area();
                let fanout = child_dir.children.len();

                let better = match best {
                    None => true,
                    Some((_, best_growth, best_area, best_fanout)) => {
                        if growth != best_growth {
                            growth < best_growth
                        } else if area != best_area {
                            area < best_area
                        } else {
                            fanout < best_fanout
                        }
                    }
                };

                if better {
                    best = Some((child, growth, area, fanout));
                }
            }

            let Some((child, ..)) = best else {
                unreachable!("directory node {node:?} above leaf level has no children")
            };

            node = child;
        }
    }

    /// Splits `node` if it holds more than `max` children, returning the new sibling.
    fn split_overflow(
        &mut self,
        node: NodeIndex,
        on_event: &mut impl FnMut(TreeEvent),
    ) -> Option<NodeIndex> {
        if self.dir(node).children.len() <= self.capacity.max {
            return None;
        }

        let sibling = self.split_node(node);
        log::trace!("split {node:?} into {sibling:?}");
        on_event(TreeEvent::Split {
            from: node,
            into: sibling,
        });

        Some(sibling)
    }

    /// Propagates a mutation of `node` toward the root. `sibling` is the node split off from
    /// `node`, if any, which still has to be linked to the parent.
    fn adjust_tree(
        &mut self,
        mut node: NodeIndex,
        mut sibling: Option<NodeIndex>,
        on_event: &mut impl FnMut(TreeEvent),
    ) {
        loop {
            let parent = self.dir(node).parent;

            if parent.is_null() {
                debug_assert!(node == self.root);

                if let Some(sibling) = sibling {
                    self.grow_root(node, sibling, on_event);
                }

                return;
            }

            if let Some(sibling) = sibling {
                self.push_child(parent, sibling);
            }

            // The split may have shrunk `node`; recompute rather than expand.
            self.refresh_bound(parent);

            sibling = self.split_overflow(parent, on_event);
            node = parent;
        }
    }

    /// Puts a new root on top of the split old root. This is the only place the tree grows.
    fn grow_root(
        &mut self,
        old_root: NodeIndex,
        sibling: NodeIndex,
        on_event: &mut impl FnMut(TreeEvent),
    ) {
        let height = self.dir(old_root).height + 1;
        let root = self.nodes.insert(TreeNode::Directory(DirectoryNode::new(
            height,
            NodeIndex::null(),
            &self.capacity,
        )));

        self.push_child(root, old_root);
        self.push_child(root, sibling);
        self.root = root;

        log::trace!("tree grown to height {height}");
        on_event(TreeEvent::Grow { root, height });
    }
}
