use std::cmp::Ordering;
use std::fmt::Debug;
use std::mem;

use log::trace;

use super::{Color, Comparator, Link, Node, NodeId, Order, Side, Walk};
use crate::util::fmt::indent_lines;
use crate::util::option::OptionExtension;

/// The red-black tree engine behind [`OrderedSet`](super::OrderedSet).
///
/// Nodes are kept in an arena and linked by [`NodeId`]. The arena is always exactly as long as the
/// tree: removing a node swaps the last node of the arena into the vacated slot and relinks it.
/// Because of this, a `NodeId` is only meaningful until the next structural change.
#[derive(Clone)]
pub(crate) struct Tree<T> {
    pub nodes: Vec<Node<T>>,
    pub root: Link,
}

impl<T> Tree<T> {
    pub const fn new() -> Tree<T> {
        Tree {
            nodes: Vec::new(),
            root: None,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> &Node<T> {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        &mut self.nodes[id.0]
    }

    pub fn value(&self, id: NodeId) -> &T {
        &self.node(id).value
    }

    /// The stack space needed to walk the tree without reallocating. A red-black tree with `n`
    /// nodes is at most `2 * log2(n + 1)` nodes tall.
    pub fn stack_capacity(&self) -> usize {
        2 * (usize::BITS - self.nodes.len().leading_zeros()) as usize
    }

    pub fn lookup<C: Comparator<T>>(&self, key: &T, comparator: &C) -> Link {
        let mut curr = self.root;
        while let Some(id) = curr {
            let node = self.node(id);
            curr = match comparator.compare(key, &node.value) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(id),
            };
        }
        None
    }

    /// Returns the left-most or right-most node of the whole tree.
    pub fn extreme(&self, side: Side) -> Link {
        Some(self.extreme_from(self.root?, side))
    }

    fn extreme_from(&self, mut id: NodeId, side: Side) -> NodeId {
        while let Some(next) = self.node(id).child(side) {
            id = next;
        }
        id
    }

    /// Inserts `value`, returning false without changing anything if an equal value is present.
    pub fn insert<C: Comparator<T>>(&mut self, value: T, comparator: &C) -> bool {
        let mut parent = None;
        let mut side = Side::Left;
        let mut curr = self.root;

        while let Some(id) = curr {
            let node = self.node(id);
            side = match comparator.compare(&value, &node.value) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => return false,
            };
            parent = Some(id);
            curr = node.child(side);
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new_red(value, parent));
        match parent {
            Some(parent) => *self.node_mut(parent).child_mut(side) = Some(id),
            None => self.root = Some(id),
        }

        self.insert_fix_up(id);
        true
    }

    fn insert_fix_up(&mut self, mut id: NodeId) {
        loop {
            let Some(mut parent) = self.node(id).parent else {
                self.set_color(id, Color::Black);
                return;
            };

            if !self.node(parent).is_red() {
                return;
            }

            // SAFETY: The root is black, so a red parent always has a parent of its own.
            let grandparent = unsafe { self.node(parent).parent.unreachable() };
            let parent_side = self.side_of(grandparent, parent);
            let uncle = self.node(grandparent).child(parent_side.opposite());

            let red_uncle = uncle.filter(|&uncle| self.node(uncle).is_red());
            if let Some(uncle) = red_uncle {
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(grandparent, Color::Red);
                id = grandparent;
                continue;
            }

            if self.side_of(parent, id) != parent_side {
                // Straighten the zig-zag, after which the old parent is the lower of the two.
                self.rotate(parent, parent_side);
                mem::swap(&mut id, &mut parent);
            }

            self.set_color(parent, Color::Black);
            self.set_color(grandparent, Color::Red);
            self.rotate(grandparent, parent_side.opposite());
            return;
        }
    }

    /// Unlinks the node `id` from the tree and returns its value.
    ///
    /// A node with two children swaps values with its in-order predecessor, which is then removed
    /// in its place, so any other `NodeId` held by the caller is invalidated.
    pub fn remove_node(&mut self, id: NodeId) -> T {
        let mut target = id;
        if let (Some(left), Some(_)) = (self.node(id).left, self.node(id).right) {
            let predecessor = self.extreme_from(left, Side::Right);
            self.swap_values(id, predecessor);
            target = predecessor;
        }

        let node = self.node(target);
        let child = node.left.or(node.right);
        if !node.is_red() {
            match child {
                // A black node with only one child always has a red child, which can take its
                // place once painted black.
                Some(child) => self.set_color(child, Color::Black),
                None => self.delete_fix_up(target),
            }
        }

        // Rebalancing may have moved target, but never gave it children.
        let parent = self.node(target).parent;
        if let Some(child) = child {
            self.node_mut(child).parent = parent;
        }
        self.replace_child(parent, target, child);

        self.release(target)
    }

    /// Restores the black height around `id`, a black leaf that is about to be removed.
    fn delete_fix_up(&mut self, mut id: NodeId) {
        while let Some(parent) = self.node(id).parent {
            let side = self.side_of(parent, id);
            // SAFETY: id is black or short of one black node, so its sibling's subtree has a black
            // height of at least one and can't be empty.
            let mut sibling = unsafe { self.node(parent).child(side.opposite()).unreachable() };

            if self.node(sibling).is_red() {
                self.set_color(parent, Color::Red);
                self.set_color(sibling, Color::Black);
                self.rotate(parent, side);
                // SAFETY: The red sibling's children were black, non-empty subtrees.
                sibling = unsafe { self.node(parent).child(side.opposite()).unreachable() };
            }

            let near = self.node(sibling).child(side);
            let far = self.node(sibling).child(side.opposite());

            if !self.is_red(near) && !self.is_red(far) {
                self.set_color(sibling, Color::Red);
                if self.node(parent).is_red() {
                    self.set_color(parent, Color::Black);
                    return;
                }
                id = parent;
                continue;
            }

            let red_far = far.filter(|&far| self.node(far).is_red());
            let far = match red_far {
                Some(far) => far,
                None => {
                    // SAFETY: At least one nephew is red and it isn't the far one.
                    let near = unsafe { near.unreachable() };
                    self.rotate(sibling, side.opposite());
                    self.set_color(sibling, Color::Red);
                    self.set_color(near, Color::Black);
                    mem::replace(&mut sibling, near)
                },
            };

            let parent_color = self.node(parent).color;
            self.set_color(sibling, parent_color);
            self.set_color(parent, Color::Black);
            self.set_color(far, Color::Black);
            self.rotate(parent, side);
            return;
        }
    }

    /// Rotates the subtree rooted at `id` towards `dir`, promoting the child on the other side.
    fn rotate(&mut self, id: NodeId, dir: Side) {
        let pivot_side = dir.opposite();
        // SAFETY: Rotations are only ever requested towards a side whose opposite child exists.
        let pivot = unsafe { self.node(id).child(pivot_side).unreachable() };
        trace!("Rotating {dir:?} around node {} (pivot {})", id.0, pivot.0);

        let inner = self.node(pivot).child(dir);
        let parent = self.node(id).parent;

        *self.node_mut(id).child_mut(pivot_side) = inner;
        if let Some(inner) = inner {
            self.node_mut(inner).parent = Some(id);
        }

        self.node_mut(pivot).parent = parent;
        self.replace_child(parent, id, Some(pivot));

        *self.node_mut(pivot).child_mut(dir) = Some(id);
        self.node_mut(id).parent = Some(pivot);
    }

    /// Points whichever link of `parent` referred to `old` at `new` instead, or the root if there
    /// is no parent.
    fn replace_child(&mut self, parent: Link, old: NodeId, new: Link) {
        match parent {
            Some(parent) => {
                let node = self.node_mut(parent);
                if node.left == Some(old) {
                    node.left = new;
                } else {
                    node.right = new;
                }
            },
            None => self.root = new,
        }
    }

    /// Removes an already unlinked node from the arena, relinking the node which takes its slot.
    fn release(&mut self, id: NodeId) -> T {
        let removed = self.nodes.swap_remove(id.0);

        let moved_from = NodeId(self.nodes.len());
        if id != moved_from {
            let moved = self.node(id);
            let (parent, left, right) = (moved.parent, moved.left, moved.right);
            self.replace_child(parent, moved_from, Some(id));
            for child in [left, right].into_iter().flatten() {
                self.node_mut(child).parent = Some(id);
            }
        }

        removed.value
    }

    fn swap_values(&mut self, a: NodeId, b: NodeId) {
        let (low, high) = if a.0 < b.0 { (a.0, b.0) } else { (b.0, a.0) };
        let (head, tail) = self.nodes.split_at_mut(high);
        mem::swap(&mut head[low].value, &mut tail[0].value);
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    /// Removes every value from the tree, returning them in ascending order.
    pub fn take_sorted(&mut self) -> Vec<T> {
        let mut order = Vec::with_capacity(self.len());
        let mut walk = Walk::new(self, Order::Ascending);
        while let Some(id) = walk.step(self) {
            order.push(id);
        }

        let mut slots: Vec<Option<T>> = mem::take(&mut self.nodes)
            .into_iter()
            .map(|node| Some(node.value))
            .collect();
        self.root = None;

        order.into_iter().filter_map(|id| slots[id.0].take()).collect()
    }

    /// Creates a tree of the same shape, with every value passed through `f`.
    pub fn map_values(&self, mut f: impl FnMut(&T) -> T) -> Tree<T> {
        Tree {
            nodes: self.nodes.iter().map(|node| Node {
                value: f(&node.value),
                color: node.color,
                parent: node.parent,
                left: node.left,
                right: node.right,
            }).collect(),
            root: self.root,
        }
    }

    fn is_red(&self, link: Link) -> bool {
        link.is_some_and(|id| self.node(id).is_red())
    }

    fn set_color(&mut self, id: NodeId, color: Color) {
        self.node_mut(id).color = color;
    }

    fn side_of(&self, parent: NodeId, child: NodeId) -> Side {
        if self.node(parent).left == Some(child) {
            Side::Left
        } else {
            Side::Right
        }
    }
}

impl<T: Debug> Tree<T> {
    /// Draws the subtree at `link` sideways, with left children above and right children below
    /// their parent.
    pub fn draw(&self, link: Link) -> String {
        match link {
            Some(id) => {
                let node = self.node(id);
                format!(
                    "{}\n({:?}: {})\n{}",
                    indent_lines(&self.draw(node.left), "┌    "),
                    node.value,
                    if node.is_red() { "R" } else { "B" },
                    indent_lines(&self.draw(node.right), "└    "),
                )
            },
            None => String::from("-"),
        }
    }
}

#[cfg(test)]
impl<T: Debug> Tree<T> {
    /// Panics unless every red-black and search tree invariant holds, returning the black height.
    pub fn check_invariants<C: Comparator<T>>(&self, comparator: &C) -> usize {
        if let Some(root) = self.root {
            assert!(!self.node(root).is_red(), "The root should be black.");
        }

        let (black_height, reachable) = self.check_subtree(self.root, None, None, None, comparator);
        assert_eq!(
            reachable,
            self.len(),
            "Every node in the arena should be reachable from the root."
        );
        black_height
    }

    fn check_subtree<C: Comparator<T>>(
        &self,
        link: Link,
        parent: Link,
        lower: Option<&T>,
        upper: Option<&T>,
        comparator: &C,
    ) -> (usize, usize) {
        let Some(id) = link else {
            return (1, 0);
        };
        let node = self.node(id);

        assert_eq!(node.parent, parent, "Node {:?} has the wrong parent link.", node.value);
        if let Some(lower) = lower {
            assert_eq!(
                comparator.compare(lower, &node.value),
                Ordering::Less,
                "{:?} is out of order in a right subtree.",
                node.value
            );
        }
        if let Some(upper) = upper {
            assert_eq!(
                comparator.compare(&node.value, upper),
                Ordering::Less,
                "{:?} is out of order in a left subtree.",
                node.value
            );
        }
        if node.is_red() {
            assert!(
                !self.is_red(node.left) && !self.is_red(node.right),
                "Red node {:?} has a red child.",
                node.value
            );
        }

        let (left_height, left_count) =
            self.check_subtree(node.left, Some(id), lower, Some(&node.value), comparator);
        let (right_height, right_count) =
            self.check_subtree(node.right, Some(id), Some(&node.value), upper, comparator);
        assert_eq!(
            left_height, right_height,
            "Both sides of {:?} should have the same black height.",
            node.value
        );

        let own = if node.is_red() { 0 } else { 1 };
        (left_height + own, left_count + right_count + 1)
    }
}
