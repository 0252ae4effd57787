use super::{DirectoryNode, NodeIndex, Tree, TreeNode};
use crate::primitive::{Bound, Vector};

impl<V: Vector, T> Tree<V, T> {
    /// Quadratic split of an overflowing `node`. Children are shared between `node` and a
    /// new sibling, which is returned; both end up holding at least `min` children.
    ///
    /// The sibling takes over the height and the parent of `node`, however, it is not yet
    /// linked to that parent.
    pub(super) fn split_node(&mut self, node: NodeIndex) -> NodeIndex {
        let (height, parent, mut children) = {
            let dir = self.dir_mut(node);
            dir.bound = Bound::empty();
            (dir.height, dir.parent, std::mem::take(&mut dir.children))
        };

        debug_assert!(children.len() > self.capacity.max);

        let bounds: Vec<_> = children.iter().map(|&x| *self.bound_at(x)).collect();
        let (keep, moved) = pick_seeds(&bounds);

        // `moved` is always the greater index; remove it first.
        let seed_moved = children.remove(moved);
        let seed_kept = children.remove(keep);

        let sibling = self.nodes.insert(TreeNode::Directory(DirectoryNode::new(
            height,
            parent,
            &self.capacity,
        )));

        self.push_child(node, seed_kept);
        self.push_child(sibling, seed_moved);
        self.distribute(node, sibling, children);

        sibling
    }

    /// Hands every remaining child to either group, picking from the back.
    fn distribute(&mut self, node: NodeIndex, sibling: NodeIndex, mut remaining: Vec<NodeIndex>) {
        let min = self.capacity.min;

        while let Some(child) = remaining.pop() {
            let num_left = remaining.len() + 1;
            let [node_len, sibling_len] = [node, sibling].map(|x| self.dir(x).children.len());

            // If a group can only reach `min` by taking everything left, it takes everything.
            let target = if min.saturating_sub(node_len) == num_left {
                node
            } else if min.saturating_sub(sibling_len) == num_left {
                sibling
            } else {
                self.preferred_group(node, sibling, child)
            };

            self.push_child(target, child);
        }
    }

    /// Group needing the least enlargement to take `child`. Ties are broken by smaller area,
    /// then by fewer children, and finally fall to `node`.
    fn preferred_group(&self, node: NodeIndex, sibling: NodeIndex, child: NodeIndex) -> NodeIndex {
        let bound = self.bound_at(child);
        let [a, b] = [node, sibling].map(|x| self.dir(x));

        let growth_a = a.bound.enlargement(bound);
        let growth_b = b.bound.enlargement(bound);

        if growth_a != growth_b {
            return if growth_a < growth_b { node } else { sibling };
        }

        let area_a = a.bound.area();
        let area_b = b.bound.area();

        if area_a != area_b {
            return if area_a < area_b { node } else { sibling };
        }

        if b.children.len() < a.children.len() {
            sibling
        } else {
            node
        }
    }
}

/// Picks the pair that would waste the most area if put into one rectangle. Returns indices
/// `(i, j)` where `i < j`; the first pair found wins ties.
pub(crate) fn pick_seeds<V: Vector>(bounds: &[Bound<V>]) -> (usize, usize) {
    debug_assert!(bounds.len() >= 2);

    let mut seeds = (0, 1);
    let mut worst = None;

    for i in 0..bounds.len() {
        for j in i + 1..bounds.len() {
            let (a, b) = (&bounds[i], &bounds[j]);
            let waste = a.union(b).area() - a.area() - b.area();

            if worst.map_or(true, |w| waste > w) {
                worst = Some(waste);
                seeds = (i, j);
            }
        }
    }

    seeds
}

/* ---------------------------------------------------------------------------------------------- */
/*                                              TESTS                                             */
/* ---------------------------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::pick_seeds;
    use crate::primitive::Bound;

    type B = Bound<[f64; 2]>;

    #[test]
    fn seeds_are_most_wasteful_pair() {
        let bounds = [
            B::from_xy(0., 1., 0., 1.),
            B::from_xy(1., 2., 1., 2.),
            B::from_xy(100., 101., 100., 101.),
            B::from_xy(2., 3., 2., 3.),
        ];

        assert_eq!(pick_seeds(&bounds), (0, 2));
    }

    #[test]
    fn seed_ties_resolve_to_first_pair() {
        let same = B::from_xy(0., 1., 0., 1.);
        assert_eq!(pick_seeds(&[same; 4]), (0, 1));

        // Unit squares on the corners; both diagonals waste 119.
        let bounds = [
            B::from_xy(0., 1., 0., 1.),
            B::from_xy(10., 11., 0., 1.),
            B::from_xy(0., 1., 10., 11.),
            B::from_xy(10., 11., 10., 11.),
        ];
        assert_eq!(pick_seeds(&bounds), (0, 3));
        assert_eq!(pick_seeds(&[bounds[1], bounds[2], bounds[0], bounds[3]]), (0, 1));
    }

    #[test]
    fn seeds_with_overlapping_pairs() {
        // Fully overlapping pairs waste negative area; disjoint ones still win.
        let bounds = [
            B::from_xy(0., 4., 0., 4.),
            B::from_xy(0., 4., 0., 4.),
            B::from_xy(5., 6., 0., 1.),
        ];

        assert_eq!(pick_seeds(&bounds), (0, 2));
    }
}
