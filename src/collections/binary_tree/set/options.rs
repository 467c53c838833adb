use std::cmp::Ordering;
use std::fmt::{self, Debug, Formatter};
use std::marker::PhantomData;

use super::OrderedSet;
#[cfg(feature = "sync")]
use super::SharedOrderedSet;

/// A total order over values of type `T`.
///
/// Implemented for [`Natural`], which defers to [`Ord`], and for any
/// `Fn(&T, &T) -> Ordering`, so a closure or function can be passed wherever a comparator is
/// expected. It is a logic error for a comparator to be inconsistent, or for the result of
/// comparing two values to change while they're in a set.
pub trait Comparator<T> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

impl<T, F: Fn(&T, &T) -> Ordering> Comparator<T> for F {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// The comparator used by default, which orders values by their [`Ord`] implementation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Natural;

impl<T: Ord> Comparator<T> for Natural {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// A builder for [`OrderedSet`]s (and [`SharedOrderedSet`]s), holding the configuration that is
/// shared by a set and every set derived from it through set algebra.
///
/// ```
/// use ordered_collections::collections::binary_tree::set::SetOptions;
///
/// let mut set = SetOptions::with_comparator(|a: &i32, b: &i32| b.cmp(a))
///     .concurrent(true)
///     .build();
/// set.insert_all([1, 3, 2]);
/// assert_eq!(set.to_vec(), [3, 2, 1]);
/// ```
pub struct SetOptions<T, C: Comparator<T> = Natural> {
    pub(crate) comparator: C,
    pub(crate) deep_copy: Option<fn(&T) -> T>,
    pub(crate) concurrent: bool,
    pub(crate) _phantom: PhantomData<fn(&T, &T) -> Ordering>,
}

impl<T: Ord> SetOptions<T> {
    /// Creates options for a set ordered by `T`'s [`Ord`] implementation.
    pub const fn new() -> SetOptions<T> {
        SetOptions::with_comparator(Natural)
    }
}

impl<T, C: Comparator<T>> SetOptions<T, C> {
    /// Creates options for a set ordered by the provided `comparator`.
    pub const fn with_comparator(comparator: C) -> SetOptions<T, C> {
        SetOptions {
            comparator,
            deep_copy: None,
            concurrent: false,
            _phantom: PhantomData,
        }
    }

    /// Sets the function used by the "deep" copying methods, such as
    /// [`OrderedSet::deep_clone`]. Without one, those methods fall back to [`Clone`].
    pub fn deep_copy(mut self, deep_copy: fn(&T) -> T) -> SetOptions<T, C> {
        self.deep_copy = Some(deep_copy);
        self
    }

    /// Hints that the set will be used for large aggregate scans which may be split across threads.
    /// The hint is carried by the set and every set derived from it, but doesn't change the
    /// behaviour of the tree itself.
    pub fn concurrent(mut self, concurrent: bool) -> SetOptions<T, C> {
        self.concurrent = concurrent;
        self
    }

    pub const fn comparator(&self) -> &C {
        &self.comparator
    }

    pub const fn is_concurrent(&self) -> bool {
        self.concurrent
    }

    pub const fn has_deep_copy(&self) -> bool {
        self.deep_copy.is_some()
    }

    /// Copies `value` with the deep copy function, or [`Clone`] if there isn't one.
    pub(crate) fn copy_of(&self, value: &T) -> T
    where
        T: Clone,
    {
        match self.deep_copy {
            Some(deep_copy) => deep_copy(value),
            None => value.clone(),
        }
    }

    /// Creates an empty set without a lock.
    pub fn build(self) -> OrderedSet<T, C> {
        OrderedSet::with_options(self)
    }

    /// Creates an empty set protected by a read-write lock, which can be modified through a shared
    /// reference.
    #[cfg(feature = "sync")]
    pub fn build_shared(self) -> SharedOrderedSet<T, C> {
        SharedOrderedSet::with_options(self)
    }
}

impl<T: Ord> Default for SetOptions<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C: Comparator<T> + Clone> Clone for SetOptions<T, C> {
    fn clone(&self) -> Self {
        SetOptions {
            comparator: self.comparator.clone(),
            deep_copy: self.deep_copy,
            concurrent: self.concurrent,
            _phantom: PhantomData,
        }
    }
}

impl<T, C: Comparator<T> + Debug> Debug for SetOptions<T, C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetOptions")
            .field("comparator", &self.comparator)
            .field("deep_copy", &self.deep_copy.is_some())
            .field("concurrent", &self.concurrent)
            .finish()
    }
}
