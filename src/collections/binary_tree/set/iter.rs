use std::iter::FusedIterator;
use std::vec;

use super::{Comparator, NodeId, OrderedSet, Side, Tree};

/// The direction of a traversal over an [`OrderedSet`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    #[default]
    Ascending,
    Descending,
}

impl Order {
    /// The side whose spine is descended before anything is yielded.
    pub(crate) const fn first_side(self) -> Side {
        match self {
            Order::Ascending => Side::Left,
            Order::Descending => Side::Right,
        }
    }
}

/// An in-order walk with an explicit stack, shared by [`Iter`] and [`Cursor`](super::Cursor).
///
/// The walk holds no reference to the tree it's walking, only node ids, so it is up to the owner to
/// make sure the tree hasn't changed between steps.
#[derive(Debug, Clone)]
pub(crate) struct Walk {
    stack: Vec<NodeId>,
    order: Order,
}

impl Walk {
    pub fn new<T>(tree: &Tree<T>, order: Order) -> Walk {
        let mut walk = Walk {
            stack: Vec::with_capacity(tree.stack_capacity()),
            order,
        };
        walk.seed(tree);
        walk
    }

    pub const fn order(&self) -> Order {
        self.order
    }

    /// Restarts the walk from the root of `tree`.
    pub fn seed<T>(&mut self, tree: &Tree<T>) {
        self.stack.clear();
        self.push_spine(tree, tree.root);
    }

    pub fn clear(&mut self) {
        self.stack.clear();
    }

    pub fn step<T>(&mut self, tree: &Tree<T>) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.push_spine(tree, tree.node(id).child(self.order.first_side().opposite()));
        Some(id)
    }

    fn push_spine<T>(&mut self, tree: &Tree<T>, mut link: Option<NodeId>) {
        let side = self.order.first_side();
        while let Some(id) = link {
            self.stack.push(id);
            link = tree.node(id).child(side);
        }
    }
}

impl<T, C: Comparator<T>> IntoIterator for OrderedSet<T, C> {
    type Item = T;

    type IntoIter = IntoIter<T>;

    fn into_iter(mut self) -> Self::IntoIter {
        IntoIter(self.tree.take_sorted().into_iter())
    }
}

/// A type for owned iteration over an [`OrderedSet`], in ascending order. Produces values of type
/// `T`, and can be reversed.
pub struct IntoIter<T>(pub(crate) vec::IntoIter<T>);

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<'a, T, C: Comparator<T>> IntoIterator for &'a OrderedSet<T, C> {
    type Item = &'a T;

    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A type for borrowed iteration over an [`OrderedSet`]. Produces values of type `&T`, in the
/// [`Order`] it was created with.
///
/// See [`OrderedSet::iter`] and [`OrderedSet::iter_rev`].
pub struct Iter<'a, T> {
    pub(crate) tree: &'a Tree<T>,
    pub(crate) walk: Walk,
    pub(crate) remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(tree: &'a Tree<T>, order: Order) -> Iter<'a, T> {
        Iter {
            tree,
            walk: Walk::new(tree, order),
            remaining: tree.len(),
        }
    }

    pub const fn order(&self) -> Order {
        self.walk.order()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        let id = self.walk.step(tree)?;
        self.remaining -= 1;
        Some(tree.value(id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            tree: self.tree,
            walk: self.walk.clone(),
            remaining: self.remaining,
        }
    }
}
