use slotmap::Key;

use super::{NodeIndex, Tree, TreeEvent, TreeNode};
use crate::primitive::{Bound, Vector};

impl<V: Vector, T> Tree<V, T> {
    /// Removes the first entry whose bound is exactly `bound`, and returns its value.
    pub fn remove(&mut self, bound: &Bound<V>) -> Option<T> {
        let mut found = None;

        self.query(bound, |id, entry_bound, _| {
            if found.is_none() && entry_bound == bound {
                found = Some(id);
            }
        });

        self.remove_entry(found?)
    }

    /// Removes the entry `entry`, and returns its value. `None` if the key is stale or isn't an
    /// entry.
    pub fn remove_entry(&mut self, entry: NodeIndex) -> Option<T> {
        self.remove_entry_with(entry, |_| {})
    }

    /// Same as [`Tree::remove_entry`], and reports every condensed node, root shrink and split
    /// caused by reinsertion to `on_event`.
    pub fn remove_entry_with(
        &mut self,
        entry: NodeIndex,
        mut on_event: impl FnMut(TreeEvent),
    ) -> Option<T> {
        if self.nodes.get(entry).is_some_and(TreeNode::is_entry) == false {
            return None;
        }

        let removed = self.nodes.remove(entry)?.into_entry().ok()?;
        let leaf = removed.owner;

        self.dir_mut(leaf).children.retain(|&x| x != entry);
        self.len -= 1;

        self.condense_tree(leaf, &mut on_event);

        Some(removed.value)
    }

    /// Walks from `leaf` to the root. Underfull nodes are detached along with their subtree,
    /// and the bounds of the rest are tightened. Entries of detached subtrees are reinserted
    /// once the root is settled.
    fn condense_tree(&mut self, leaf: NodeIndex, on_event: &mut impl FnMut(TreeEvent)) {
        let mut orphans = Vec::new();
        let mut node = leaf;

        while node != self.root {
            let parent = self.dir(node).parent;

            if self.dir(node).children.len() < self.capacity.min {
                self.dir_mut(parent).children.retain(|&x| x != node);

                let num_before = orphans.len();
                self.detach_subtree(node, &mut orphans);

                log::trace!("condensed {node:?}, {} orphans", orphans.len() - num_before);
                on_event(TreeEvent::Condense {
                    node,
                    orphans: orphans.len() - num_before,
                });
            } else {
                self.refresh_bound(node);
            }

            node = parent;
        }

        self.refresh_bound(self.root);
        self.shrink_root(on_event);

        for entry in orphans {
            let leaf = self.choose_leaf(self.bound_at(entry));
            self.place_entry(leaf, entry, on_event);
        }
    }

    /// Frees every directory node of the subtree under `node`. Entries are kept alive in the
    /// arena, and collected into `orphans`.
    fn detach_subtree(&mut self, node: NodeIndex, orphans: &mut Vec<NodeIndex>) {
        let Some(TreeNode::Directory(dir)) = self.nodes.remove(node) else {
            unreachable!("{node:?} is not a directory node")
        };

        for child in dir.children {
            if self.nodes[child].is_entry() {
                orphans.push(child);
            } else {
                self.detach_subtree(child, orphans);
            }
        }
    }

    /// Replaces a non-leaf root holding a single child by that child, as long as possible.
    fn shrink_root(&mut self, on_event: &mut impl FnMut(TreeEvent)) {
        loop {
            let root = self.dir(self.root);

            if root.is_leaf_level() || root.children.len() > 1 {
                return;
            }

            let Some(&child) = root.children.first() else {
                // Every child was detached; start over as an empty leaf-level root.
                self.dir_mut(self.root).height = 1;
                return;
            };

            self.nodes.remove(self.root);
            self.dir_mut(child).parent = NodeIndex::null();
            self.root = child;

            let height = self.dir(child).height;
            log::trace!("tree shrunk to height {height}");
            on_event(TreeEvent::Shrink {
                root: child,
                height,
            });
        }
    }
}
