use std::fmt::{self, Debug, Formatter};
use std::ops::Deref;

use log::debug;

use super::{
    Comparator, ConcurrentModification, CursorError, ForeignCursor, NodeId, Order, OrderedSet,
    ReadOnlyElement, Walk,
};
use crate::util::result::ResultExtension;

type Predicate<T> = Box<dyn FnMut(&T) -> bool + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CursorState {
    Active,
    Exhausted,
    Invalidated,
}

/// A restartable traversal over an [`OrderedSet`] which doesn't borrow the set between steps.
///
/// Unlike [`Iter`](super::Iter), a Cursor can be kept while the set is modified, but doing so
/// invalidates it. The cursor remembers the set's version when it was created and checks it before
/// every step, failing with [`ConcurrentModification`] once it changes. An invalidated cursor stays
/// invalidated, even after [`start`](Cursor::start).
///
/// ```
/// use ordered_collections::collections::binary_tree::set::{Order, OrderedSet};
///
/// let mut set = OrderedSet::from_iter([3, 1, 4, 5, 9, 2, 6]);
/// let mut cursor = set.cursor(Order::Descending).filter(|n| n % 2 == 1);
///
/// assert_eq!(*cursor.next(&set).unwrap().unwrap(), 9);
/// assert_eq!(*cursor.next(&set).unwrap().unwrap(), 5);
///
/// set.insert(7);
/// assert!(cursor.next(&set).is_err());
/// ```
pub struct Cursor<T> {
    pub(crate) walk: Walk,
    pub(crate) set_id: u64,
    pub(crate) version: u64,
    state: CursorState,
    filter: Option<Predicate<T>>,
    take_while: Option<Predicate<T>>,
}

impl<T> Cursor<T> {
    pub(crate) fn new<C: Comparator<T>>(set: &OrderedSet<T, C>, order: Order) -> Cursor<T> {
        Cursor {
            walk: Walk::new(&set.tree, order),
            set_id: set.id,
            version: set.version,
            state: CursorState::Active,
            filter: None,
            take_while: None,
        }
    }

    /// Only yields elements for which `predicate` returns true. Skipped elements are still
    /// traversed in order, and combine with any previous filter.
    pub fn filter<F>(mut self, mut predicate: F) -> Cursor<T>
    where
        F: FnMut(&T) -> bool + Send + 'static,
        T: 'static,
    {
        let combined: Predicate<T> = match self.filter.take() {
            Some(mut previous) => Box::new(move |item: &T| previous(item) && predicate(item)),
            None => Box::new(predicate),
        };
        self.filter = Some(combined);
        self
    }

    /// Ends the traversal at the first element for which `predicate` returns false. The predicate
    /// sees every traversed element, including those rejected by [`filter`](Cursor::filter).
    pub fn take_while<F>(mut self, mut predicate: F) -> Cursor<T>
    where
        F: FnMut(&T) -> bool + Send + 'static,
        T: 'static,
    {
        let combined: Predicate<T> = match self.take_while.take() {
            Some(mut previous) => Box::new(move |item: &T| previous(item) && predicate(item)),
            None => Box::new(predicate),
        };
        self.take_while = Some(combined);
        self
    }

    pub const fn order(&self) -> Order {
        self.walk.order()
    }

    /// Returns true once the cursor has failed because its set was modified.
    pub fn is_invalidated(&self) -> bool {
        self.state == CursorState::Invalidated
    }

    /// Restarts the traversal from the first element of `set`.
    pub fn start<C: Comparator<T>>(&mut self, set: &OrderedSet<T, C>) -> Result<(), CursorError> {
        self.validate(set)?;
        self.walk.seed(&set.tree);
        self.state = CursorState::Active;
        Ok(())
    }

    /// Yields the next element of `set`, or None once the traversal is over.
    pub fn next<'a, C: Comparator<T>>(
        &mut self,
        set: &'a OrderedSet<T, C>,
    ) -> Result<Option<Element<'a, T>>, CursorError> {
        Ok(self.advance(set)?.map(|id| Element(set.tree.value(id))))
    }

    /// Checks `set` against the cursor, then walks to the next element that passes the filter.
    pub(crate) fn advance<C: Comparator<T>>(
        &mut self,
        set: &OrderedSet<T, C>,
    ) -> Result<Option<NodeId>, CursorError> {
        self.validate(set)?;
        if self.state == CursorState::Exhausted {
            return Ok(None);
        }

        while let Some(id) = self.walk.step(&set.tree) {
            let value = set.tree.value(id);
            if let Some(take_while) = &mut self.take_while
                && !take_while(value)
            {
                break;
            }
            if self.filter.as_mut().is_none_or(|filter| filter(value)) {
                return Ok(Some(id));
            }
        }

        self.walk.clear();
        self.state = CursorState::Exhausted;
        Ok(None)
    }

    fn validate<C: Comparator<T>>(&mut self, set: &OrderedSet<T, C>) -> Result<(), CursorError> {
        if self.set_id != set.id {
            return Err(ForeignCursor.into());
        }

        if self.state == CursorState::Invalidated || self.version != set.version {
            if self.state != CursorState::Invalidated {
                debug!(
                    "Cursor invalidated, set version changed from {} to {}",
                    self.version, set.version
                );
                self.walk.clear();
                self.state = CursorState::Invalidated;
            }
            return Err(ConcurrentModification {
                expected: self.version,
                found: set.version,
            }.into());
        }

        Ok(())
    }
}

impl<T> Debug for Cursor<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("order", &self.order())
            .field("version", &self.version)
            .field("state", &self.state)
            .field("filtered", &self.filter.is_some())
            .field("take_while", &self.take_while.is_some())
            .finish()
    }
}

/// A read-only handle to an element of an [`OrderedSet`], produced by a [`Cursor`].
///
/// Writing through the handle always fails: changing an element in place could move it out of
/// order without the tree knowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Element<'a, T>(&'a T);

impl<'a, T> Element<'a, T> {
    pub const fn get(&self) -> &'a T {
        self.0
    }

    /// Always fails with [`ReadOnlyElement`], dropping `value`.
    pub fn try_replace(&mut self, value: T) -> Result<T, ReadOnlyElement> {
        drop(value);
        Err(ReadOnlyElement)
    }

    /// # Panics
    /// Always panics, see [`try_replace`](Element::try_replace).
    #[track_caller]
    pub fn replace(&mut self, value: T) -> T {
        self.try_replace(value).throw()
    }
}

impl<T> Deref for Element<'_, T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        self.0
    }
}
