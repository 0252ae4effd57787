use super::{NodeIndex, Tree, TreeNode};
use crate::primitive::{Bound, Vector};

impl<V: Vector, T> Tree<V, T> {
    /// Visits every entry whose bound overlaps `region`. Subtrees whose bound doesn't overlap
    /// `region` are never entered.
    ///
    /// Entries are visited in traversal order, which has no spatial meaning.
    pub fn query<'a>(
        &'a self,
        region: &Bound<V>,
        mut visit: impl FnMut(NodeIndex, &'a Bound<V>, &'a T),
    ) {
        let mut stack = vec![self.root];

        while let Some(node) = stack.pop() {
            for &child in &self.dir(node).children {
                match &self.nodes[child] {
                    TreeNode::Directory(dir) => {
                        if dir.bound.overlaps(region) {
                            stack.push(child);
                        }
                    }
                    TreeNode::Entry(entry) => {
                        if entry.bound.overlaps(region) {
                            visit(child, &entry.bound, &entry.value);
                        }
                    }
                }
            }
        }
    }

    /// Values of every entry overlapping `region`, borders included.
    pub fn search(&self, region: &Bound<V>) -> Vec<&T> {
        let mut found = Vec::new();
        self.query(region, |_, _, value| found.push(value));
        found
    }

    pub fn search_point(&self, point: &V) -> Vec<&T> {
        self.search(&Bound::point(*point))
    }

    /// Every stored value, regardless of its bound.
    pub fn all(&self) -> Vec<&T> {
        let mut found = Vec::with_capacity(self.len);
        let mut stack = vec![self.root];

        while let Some(node) = stack.pop() {
            for &child in &self.dir(node).children {
                match &self.nodes[child] {
                    TreeNode::Directory(_) => stack.push(child),
                    TreeNode::Entry(entry) => found.push(&entry.value),
                }
            }
        }

        found
    }

    /// Iterates every entry in arena order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, &Bound<V>, &T)> {
        self.nodes
            .iter()
            .filter_map(|(id, node)| node.as_entry().map(|x| (id, &x.bound, &x.value)))
    }
}
