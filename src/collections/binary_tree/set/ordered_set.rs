use std::fmt::{self, Debug, Display, Formatter};
use std::ops::{BitAnd, BitOr, BitXor, ControlFlow, Sub};
use std::sync::atomic::{AtomicU64, Ordering};
use std::vec;

use log::debug;

use super::{
    Comparator, Cursor, EmptySet, Iter, Natural, Order, SetOptions, Side, Tree, algebra,
};
use crate::collections::traits::set::{Set, SetView, with_views};
use crate::util::fmt::DebugRaw;
use crate::util::result::ResultExtension;

/// Every set gets a distinct id, so that a [`Cursor`] can tell whether it's being used with the
/// set that created it.
static NEXT_SET_ID: AtomicU64 = AtomicU64::new(0);

fn next_set_id() -> u64 {
    NEXT_SET_ID.fetch_add(1, Ordering::Relaxed)
}

/// A set of unique values kept in order by a [`Comparator`], implemented as a red-black tree.
///
/// By default, values are ordered by their [`Ord`] implementation. Any other total order can be
/// used through [`OrderedSet::with_comparator`] or [`SetOptions`].
///
/// It is a logic error for a value to be modified in a way that changes its order relative to the
/// other values while it is in the set. Because of this, OrderedSet's API only exposes shared
/// references to its values.
///
/// Every structural change (successful insertion or removal, clearing, or retaining) increments the
/// set's [`version`](OrderedSet::version), which is how a [`Cursor`] detects that it has been
/// invalidated.
///
/// # Time Complexity
/// For this analysis of time complexity, variables are defined as follows:
/// - `n`: The number of items in the OrderedSet.
/// - `m`: The number of items in the other operand of a set operation.
///
/// | Method | Complexity |
/// |-|-|
/// | `len` | `O(1)` |
/// | `insert` | `O(log n)` |
/// | `remove` | `O(log n)` |
/// | `contains` | `O(log n)` |
/// | `first` / `last` | `O(log n)` |
/// | `pop_first` / `pop_last` | `O(log n)` |
/// | `clear` | `O(n)` |
/// | `union` | `O((n + m) log(n + m))` |
/// | `intersection` | `O(min(n, m) * lookup)`* |
/// | `difference` | `O(n * lookup)`* |
///
/// \* Where `lookup` is the cost of a membership test in the other operand, `O(log m)` for another
/// OrderedSet or `O(1)` expected for a hash-based set, plus the cost of inserting the result.
pub struct OrderedSet<T, C: Comparator<T> = Natural> {
    pub(crate) tree: Tree<T>,
    pub(crate) options: SetOptions<T, C>,
    pub(crate) version: u64,
    pub(crate) id: u64,
}

impl<T: Ord> OrderedSet<T> {
    /// Creates a new, empty OrderedSet ordered by `T`'s [`Ord`] implementation.
    pub fn new() -> OrderedSet<T> {
        OrderedSet::with_options(SetOptions::new())
    }
}

impl<T, C: Comparator<T>> OrderedSet<T, C> {
    /// Creates a new, empty OrderedSet ordered by `comparator`.
    pub fn with_comparator(comparator: C) -> OrderedSet<T, C> {
        OrderedSet::with_options(SetOptions::with_comparator(comparator))
    }

    /// Creates a new, empty OrderedSet with the provided `options`.
    pub fn with_options(options: SetOptions<T, C>) -> OrderedSet<T, C> {
        OrderedSet {
            tree: Tree::new(),
            options,
            version: 0,
            id: next_set_id(),
        }
    }

    /// Returns the number of elements in the OrderedSet.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns true if the OrderedSet contains no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of structural changes made to the OrderedSet since it was created.
    pub const fn version(&self) -> u64 {
        self.version
    }

    pub const fn options(&self) -> &SetOptions<T, C> {
        &self.options
    }

    pub const fn comparator(&self) -> &C {
        &self.options.comparator
    }

    pub const fn is_concurrent(&self) -> bool {
        self.options.concurrent
    }

    /// Inserts `value` into the OrderedSet, returning true if it wasn't already present. If an
    /// equal value is present, the set isn't changed and `value` is dropped.
    pub fn insert(&mut self, value: T) -> bool {
        let inserted = self.tree.insert(value, &self.options.comparator);
        if inserted {
            self.touch();
        }
        inserted
    }

    /// Inserts every item, returning the number of items which weren't already present.
    pub fn insert_all<I: IntoIterator<Item = T>>(&mut self, items: I) -> usize {
        items.into_iter().map(|item| self.insert(item)).filter(|new| *new).count()
    }

    /// Removes the value equal to `value` from the OrderedSet, returning true if it was present.
    pub fn remove(&mut self, value: &T) -> bool {
        self.take(value).is_some()
    }

    /// Removes and returns the value equal to `value`, if there is one.
    pub fn take(&mut self, value: &T) -> Option<T> {
        let id = self.tree.lookup(value, &self.options.comparator)?;
        let removed = self.tree.remove_node(id);
        self.touch();
        Some(removed)
    }

    /// Returns true if the OrderedSet contains a value equal to `value`.
    pub fn contains(&self, value: &T) -> bool {
        self.tree.lookup(value, &self.options.comparator).is_some()
    }

    /// Returns a reference to the stored value equal to `value`, if there is one.
    pub fn get(&self, value: &T) -> Option<&T> {
        let id = self.tree.lookup(value, &self.options.comparator)?;
        Some(self.tree.value(id))
    }

    /// Returns the smallest value in the OrderedSet.
    ///
    /// # Panics
    /// Panics if the OrderedSet is empty.
    pub fn first(&self) -> &T {
        self.try_first().ok_or(EmptySet).throw()
    }

    pub fn try_first(&self) -> Option<&T> {
        Some(self.tree.value(self.tree.extreme(Side::Left)?))
    }

    /// Returns the largest value in the OrderedSet.
    ///
    /// # Panics
    /// Panics if the OrderedSet is empty.
    pub fn last(&self) -> &T {
        self.try_last().ok_or(EmptySet).throw()
    }

    pub fn try_last(&self) -> Option<&T> {
        Some(self.tree.value(self.tree.extreme(Side::Right)?))
    }

    /// Removes and returns the smallest value in the OrderedSet.
    pub fn pop_first(&mut self) -> Option<T> {
        self.pop(Side::Left)
    }

    /// Removes and returns the largest value in the OrderedSet.
    pub fn pop_last(&mut self) -> Option<T> {
        self.pop(Side::Right)
    }

    fn pop(&mut self, side: Side) -> Option<T> {
        let id = self.tree.extreme(side)?;
        let removed = self.tree.remove_node(id);
        self.touch();
        Some(removed)
    }

    /// Removes every value from the OrderedSet. This always counts as a structural change, even if
    /// the set was already empty.
    pub fn clear(&mut self) {
        debug!("Clearing OrderedSet of {} elements", self.len());
        self.tree.clear();
        self.touch();
    }

    /// Retains only the values for which `predicate` returns true, visiting them in ascending
    /// order. Returns the number of values removed.
    ///
    /// The tree is rebuilt from the retained values, so retaining from a non-empty set always
    /// counts as a structural change, even if nothing was removed. If `predicate` panics, the
    /// values it had already rejected stay removed and every other value is put back.
    pub fn retain<F: FnMut(&T) -> bool>(&mut self, mut predicate: F) -> usize {
        if self.is_empty() {
            return 0;
        }

        let before = self.len();
        self.touch();

        let pending = self.tree.take_sorted().into_iter();
        let mut refill = Refill {
            tree: &mut self.tree,
            comparator: &self.options.comparator,
            pending,
        };
        // The value under test stays in pending until it's decided on.
        while let Some(keep) = refill.pending.as_slice().first().map(&mut predicate) {
            let value = refill.pending.next();
            if keep && let Some(value) = value {
                refill.tree.insert(value, refill.comparator);
            }
        }
        drop(refill);

        before - self.len()
    }

    /// Returns an iterator over the values in ascending order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.tree, Order::Ascending)
    }

    /// Returns an iterator over the values in descending order.
    pub fn iter_rev(&self) -> Iter<'_, T> {
        Iter::new(&self.tree, Order::Descending)
    }

    /// Creates a [`Cursor`] over this set, which doesn't borrow the set between steps but is
    /// invalidated by any structural change.
    pub fn cursor(&self, order: Order) -> Cursor<T> {
        Cursor::new(self, order)
    }

    /// Copies the values into a [`Vec`] in ascending order.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Copies the values into a [`Vec`] in ascending order, using the deep copy function from the
    /// set's options if there is one.
    pub fn to_vec_deep(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().map(|value| self.options.copy_of(value)).collect()
    }

    /// Creates a copy of the OrderedSet using the deep copy function from its options if there is
    /// one. The copy has the same shape as the original, so no rebalancing takes place.
    pub fn deep_clone(&self) -> OrderedSet<T, C>
    where
        T: Clone,
        C: Clone,
    {
        OrderedSet {
            tree: self.tree.map_values(|value| self.options.copy_of(value)),
            options: self.options.clone(),
            version: 0,
            id: next_set_id(),
        }
    }

    /// Creates an empty set with the same options as this one.
    pub fn empty_like(&self) -> OrderedSet<T, C>
    where
        C: Clone,
    {
        OrderedSet::with_options(self.options.clone())
    }

    /// Creates a set containing every value that is in `self` or `other`. (`self ∪ other`)
    pub fn union<S: Set<T>>(&self, other: &S) -> OrderedSet<T, C>
    where
        T: Clone,
        C: Clone,
    {
        let mut result = self.empty_like();
        with_views(self, other, |this, other| algebra::union(&mut result, this, other));
        result
    }

    /// Creates a set containing every value that is in both `self` and `other`. (`self ∩ other`)
    pub fn intersection<S: Set<T>>(&self, other: &S) -> OrderedSet<T, C>
    where
        T: Clone,
        C: Clone,
    {
        let mut result = self.empty_like();
        with_views(self, other, |this, other| algebra::intersection(&mut result, this, other));
        result
    }

    /// Creates a set containing every value that is in `self` but not `other`. (`self \ other`)
    pub fn difference<S: Set<T>>(&self, other: &S) -> OrderedSet<T, C>
    where
        T: Clone,
        C: Clone,
    {
        let mut result = self.empty_like();
        with_views(self, other, |this, other| algebra::difference(&mut result, this, other));
        result
    }

    /// Creates a set containing every value that is in exactly one of `self` and `other`.
    /// (`self △ other`)
    pub fn symmetric_difference<S: Set<T>>(&self, other: &S) -> OrderedSet<T, C>
    where
        T: Clone,
        C: Clone,
    {
        let mut result = self.empty_like();
        with_views(self, other, |this, other| {
            algebra::symmetric_difference(&mut result, this, other)
        });
        result
    }

    fn touch(&mut self) {
        self.version += 1;
    }
}

/// Reinserts whatever is left in `pending` when dropped, so that a panicking predicate in
/// [`OrderedSet::retain`] can't lose values it never looked at.
struct Refill<'a, T, C: Comparator<T>> {
    tree: &'a mut Tree<T>,
    comparator: &'a C,
    pending: vec::IntoIter<T>,
}

impl<T, C: Comparator<T>> Drop for Refill<'_, T, C> {
    fn drop(&mut self) {
        for value in self.pending.by_ref() {
            self.tree.insert(value, self.comparator);
        }
    }
}

#[cfg(test)]
impl<T: Debug, C: Comparator<T>> OrderedSet<T, C> {
    /// Test-only access to the tree's invariant checks, returning the black height.
    pub(crate) fn check_invariants(&self) -> usize {
        self.tree.check_invariants(&self.options.comparator)
    }
}

impl<T, C: Comparator<T>> SetView<T> for OrderedSet<T, C> {
    fn len(&self) -> usize {
        self.tree.len()
    }

    fn contains_unlocked(&self, item: &T) -> bool {
        self.contains(item)
    }

    fn visit(&self, f: &mut dyn FnMut(&T) -> ControlFlow<()>) {
        for item in self.iter() {
            if f(item).is_break() {
                break;
            }
        }
    }
}

impl<T, C: Comparator<T>> Set<T> for OrderedSet<T, C> {
    fn with_view<R>(&self, f: impl FnOnce(&dyn SetView<T>) -> R) -> R {
        f(self)
    }

    fn add_all<I: IntoIterator<Item = T>>(&mut self, items: I) -> usize {
        self.insert_all(items)
    }
}

impl<T: Ord> Default for OrderedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, C: Comparator<T> + Clone> Clone for OrderedSet<T, C> {
    fn clone(&self) -> Self {
        OrderedSet {
            tree: self.tree.clone(),
            options: self.options.clone(),
            version: 0,
            id: next_set_id(),
        }
    }
}

impl<T: PartialEq, C: Comparator<T>> PartialEq for OrderedSet<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq, C: Comparator<T>> Eq for OrderedSet<T, C> {}

impl<T: Ord> FromIterator<T> for OrderedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = OrderedSet::new();
        set.insert_all(iter);
        set
    }
}

impl<T, C: Comparator<T>> Extend<T> for OrderedSet<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.insert_all(iter);
    }
}

impl<T: Clone, C: Comparator<T> + Clone> BitOr for &OrderedSet<T, C> {
    type Output = OrderedSet<T, C>;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl<T: Clone, C: Comparator<T> + Clone> BitAnd for &OrderedSet<T, C> {
    type Output = OrderedSet<T, C>;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.intersection(rhs)
    }
}

impl<T: Clone, C: Comparator<T> + Clone> Sub for &OrderedSet<T, C> {
    type Output = OrderedSet<T, C>;

    fn sub(self, rhs: Self) -> Self::Output {
        self.difference(rhs)
    }
}

impl<T: Clone, C: Comparator<T> + Clone> BitXor for &OrderedSet<T, C> {
    type Output = OrderedSet<T, C>;

    fn bitxor(self, rhs: Self) -> Self::Output {
        self.symmetric_difference(rhs)
    }
}

impl<T: Debug, C: Comparator<T>> Debug for OrderedSet<T, C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderedSet")
            .field("nodes", &DebugRaw(format!("\n{}\n", self.tree.draw(self.tree.root))))
            .field("len", &self.len())
            .field("version", &self.version)
            .field("concurrent", &self.options.concurrent)
            .finish()
    }
}

impl<T: Display, C: Comparator<T>> Display for OrderedSet<T, C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (index, value) in self.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{value}")?;
        }
        write!(f, "}}")
    }
}
