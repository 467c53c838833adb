use std::fmt::{self, Debug, Formatter};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::warn;

use super::{Comparator, Cursor, CursorError, Natural, Order, OrderedSet, SetOptions, algebra};
use crate::collections::traits::set::{Set, SetView, with_views};

/// An [`OrderedSet`] behind a read-write lock, so that it can be shared between threads and
/// modified through a shared reference.
///
/// Every method takes the lock for its whole duration: the write lock for methods that change the
/// set and the read lock for everything else. Set operations take the read locks of both operands
/// before looking at either, in a fixed order so that two threads combining the same two sets can't
/// deadlock. A [`Cursor`] holds no lock between steps and instead detects changes made by other
/// threads, see [`Cursor::next_shared`].
///
/// A poisoned lock is recovered from rather than propagated. A comparator only runs before a
/// method starts changing the tree, and [`OrderedSet::retain`] puts back every value its predicate
/// hadn't rejected when it panics, so a panic never leaves the set inconsistent.
pub struct SharedOrderedSet<T, C: Comparator<T> = Natural> {
    pub(crate) inner: RwLock<OrderedSet<T, C>>,
}

impl<T: Ord> SharedOrderedSet<T> {
    pub fn new() -> SharedOrderedSet<T> {
        SharedOrderedSet::from(OrderedSet::new())
    }
}

impl<T, C: Comparator<T>> SharedOrderedSet<T, C> {
    pub fn with_comparator(comparator: C) -> SharedOrderedSet<T, C> {
        SharedOrderedSet::from(OrderedSet::with_comparator(comparator))
    }

    pub fn with_options(options: SetOptions<T, C>) -> SharedOrderedSet<T, C> {
        SharedOrderedSet::from(OrderedSet::with_options(options))
    }

    /// Acquires the read lock, allowing several reads to happen without other threads changing the
    /// set in between.
    pub fn read(&self) -> RwLockReadGuard<'_, OrderedSet<T, C>> {
        self.inner.read().unwrap_or_else(|poisoned| {
            warn!("Recovering SharedOrderedSet from a poisoned lock");
            PoisonError::into_inner(poisoned)
        })
    }

    /// Acquires the write lock, allowing several changes to be made as one step from the point of
    /// view of other threads.
    pub fn write(&self) -> RwLockWriteGuard<'_, OrderedSet<T, C>> {
        self.inner.write().unwrap_or_else(|poisoned| {
            warn!("Recovering SharedOrderedSet from a poisoned lock");
            PoisonError::into_inner(poisoned)
        })
    }

    pub fn into_inner(self) -> OrderedSet<T, C> {
        self.inner.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn version(&self) -> u64 {
        self.read().version()
    }

    pub fn is_concurrent(&self) -> bool {
        self.read().is_concurrent()
    }

    pub fn insert(&self, value: T) -> bool {
        self.write().insert(value)
    }

    pub fn insert_all<I: IntoIterator<Item = T>>(&self, items: I) -> usize {
        self.write().insert_all(items)
    }

    pub fn remove(&self, value: &T) -> bool {
        self.write().remove(value)
    }

    pub fn take(&self, value: &T) -> Option<T> {
        self.write().take(value)
    }

    pub fn contains(&self, value: &T) -> bool {
        self.read().contains(value)
    }

    /// Returns a copy of the smallest value.
    ///
    /// # Panics
    /// Panics if the set is empty.
    pub fn first(&self) -> T
    where
        T: Clone,
    {
        self.read().first().clone()
    }

    pub fn try_first(&self) -> Option<T>
    where
        T: Clone,
    {
        self.read().try_first().cloned()
    }

    /// Returns a copy of the largest value.
    ///
    /// # Panics
    /// Panics if the set is empty.
    pub fn last(&self) -> T
    where
        T: Clone,
    {
        self.read().last().clone()
    }

    pub fn try_last(&self) -> Option<T>
    where
        T: Clone,
    {
        self.read().try_last().cloned()
    }

    pub fn pop_first(&self) -> Option<T> {
        self.write().pop_first()
    }

    pub fn pop_last(&self) -> Option<T> {
        self.write().pop_last()
    }

    pub fn clear(&self) {
        self.write().clear()
    }

    pub fn retain<F: FnMut(&T) -> bool>(&self, predicate: F) -> usize {
        self.write().retain(predicate)
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.read().to_vec()
    }

    pub fn to_vec_deep(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.read().to_vec_deep()
    }

    /// Creates a [`Cursor`] over the set. The read lock is only held while the cursor is created.
    pub fn cursor(&self, order: Order) -> Cursor<T> {
        self.read().cursor(order)
    }

    fn empty_like(&self) -> OrderedSet<T, C>
    where
        C: Clone,
    {
        self.read().empty_like()
    }

    /// See [`OrderedSet::union`].
    pub fn union<S: Set<T>>(&self, other: &S) -> SharedOrderedSet<T, C>
    where
        T: Clone,
        C: Clone,
    {
        let mut result = self.empty_like();
        with_views(self, other, |this, other| algebra::union(&mut result, this, other));
        SharedOrderedSet::from(result)
    }

    /// See [`OrderedSet::intersection`].
    pub fn intersection<S: Set<T>>(&self, other: &S) -> SharedOrderedSet<T, C>
    where
        T: Clone,
        C: Clone,
    {
        let mut result = self.empty_like();
        with_views(self, other, |this, other| algebra::intersection(&mut result, this, other));
        SharedOrderedSet::from(result)
    }

    /// See [`OrderedSet::difference`].
    pub fn difference<S: Set<T>>(&self, other: &S) -> SharedOrderedSet<T, C>
    where
        T: Clone,
        C: Clone,
    {
        let mut result = self.empty_like();
        with_views(self, other, |this, other| algebra::difference(&mut result, this, other));
        SharedOrderedSet::from(result)
    }

    /// See [`OrderedSet::symmetric_difference`].
    pub fn symmetric_difference<S: Set<T>>(&self, other: &S) -> SharedOrderedSet<T, C>
    where
        T: Clone,
        C: Clone,
    {
        let mut result = self.empty_like();
        with_views(self, other, |this, other| {
            algebra::symmetric_difference(&mut result, this, other)
        });
        SharedOrderedSet::from(result)
    }
}

impl<T> Cursor<T> {
    /// Restarts the traversal of a [`SharedOrderedSet`], holding its read lock while doing so.
    pub fn start_shared<C: Comparator<T>>(
        &mut self,
        set: &SharedOrderedSet<T, C>,
    ) -> Result<(), CursorError> {
        self.start(&*set.read())
    }

    /// Yields a copy of the next element of a [`SharedOrderedSet`]. The read lock is held for the
    /// duration of the step only, so changes made by other threads between steps are reported as
    /// [`ConcurrentModification`](super::ConcurrentModification) errors.
    pub fn next_shared<C: Comparator<T>>(
        &mut self,
        set: &SharedOrderedSet<T, C>,
    ) -> Result<Option<T>, CursorError>
    where
        T: Clone,
    {
        let guard = set.read();
        Ok(self.advance(&*guard)?.map(|id| guard.tree.value(id).clone()))
    }
}

impl<T, C: Comparator<T>> Set<T> for SharedOrderedSet<T, C> {
    fn with_view<R>(&self, f: impl FnOnce(&dyn SetView<T>) -> R) -> R {
        f(&*self.read())
    }

    fn add_all<I: IntoIterator<Item = T>>(&mut self, items: I) -> usize {
        self.insert_all(items)
    }
}

impl<T, C: Comparator<T>> From<OrderedSet<T, C>> for SharedOrderedSet<T, C> {
    fn from(value: OrderedSet<T, C>) -> Self {
        SharedOrderedSet {
            inner: RwLock::new(value),
        }
    }
}

impl<T: Ord> Default for SharedOrderedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> FromIterator<T> for SharedOrderedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        SharedOrderedSet::from(OrderedSet::from_iter(iter))
    }
}

impl<T: Debug, C: Comparator<T>> Debug for SharedOrderedSet<T, C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedOrderedSet")
            .field("inner", &*self.read())
            .finish()
    }
}

#[cfg(test)]
impl<T, C: Comparator<T>> SharedOrderedSet<T, C> {
    /// Test-only check of whether a writer could currently acquire the lock.
    pub(crate) fn is_read_locked(&self) -> bool {
        self.inner.try_write().is_err()
    }
}
