use std::collections::{BTreeSet, HashSet};
use std::hash::{BuildHasher, Hash};
use std::ops::ControlFlow;
use std::ptr;

/// Read access to the elements of a set, with any locking already taken care of.
///
/// This trait is dyn compatible, which is what allows set algebra to be written once for every
/// pair of set types: both operands are seen as `&dyn SetView<T>` by the time any element is
/// touched.
pub trait SetView<T> {
    /// Returns the number of elements in the set.
    fn len(&self) -> usize;

    /// Returns true if the set contains no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if the set contains `item`.
    ///
    /// This never acquires a lock. A view is only ever handed out while any lock the underlying set
    /// needs is already held, see [`Set::with_view`].
    fn contains_unlocked(&self, item: &T) -> bool;

    /// Calls `f` with every element of the set until it returns [`ControlFlow::Break`]. Ordered
    /// sets visit their elements in ascending order.
    fn visit(&self, f: &mut dyn FnMut(&T) -> ControlFlow<()>);
}

/// The capability every set type exposes so that it can take part in set algebra with sets of a
/// different type.
pub trait Set<T> {
    /// Calls `f` with a view of this set, holding whatever lock the set requires for reading until
    /// `f` returns.
    fn with_view<R>(&self, f: impl FnOnce(&dyn SetView<T>) -> R) -> R;

    /// Inserts every item, returning how many of them weren't already present.
    fn add_all<I: IntoIterator<Item = T>>(&mut self, items: I) -> usize;

    /// Returns the number of elements in the set.
    fn count(&self) -> usize {
        self.with_view(|view| view.len())
    }

    /// Copies every element of the set into a [`Vec`], in ascending order if the set is ordered.
    fn to_snapshot(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.with_view(|view| {
            let mut snapshot = Vec::with_capacity(view.len());
            view.visit(&mut |item| {
                snapshot.push(item.clone());
                ControlFlow::Continue(())
            });
            snapshot
        })
    }

    /// Returns true if `other` contains all elements of `self`. (`self ⊆ other`)
    fn is_subset<S: Set<T>>(&self, other: &S) -> bool {
        with_views(self, other, |this, other| {
            this.len() <= other.len() && all(this, |item| other.contains_unlocked(item))
        })
    }

    /// Returns true if `self` contains all elements of `other`. (`self ⊇ other`)
    fn is_superset<S: Set<T>>(&self, other: &S) -> bool {
        with_views(self, other, |this, other| {
            other.len() <= this.len() && all(other, |item| this.contains_unlocked(item))
        })
    }

    /// Returns true if `self` and `other` have no elements in common. (`self ∩ other = ∅`)
    fn is_disjoint<S: Set<T>>(&self, other: &S) -> bool {
        with_views(self, other, |this, other| {
            let (scan, lookup) = smaller_first(this, other);
            all(scan, |item| !lookup.contains_unlocked(item))
        })
    }
}

/// Calls `f` with views of both `a` and `b`, in that order.
///
/// Locks are always taken in order of the sets' addresses, regardless of which one is `a`, so two
/// threads combining the same pair of locked sets in opposite orders can't deadlock each other.
/// When `a` and `b` are the same set, its lock is only taken once.
pub fn with_views<T, A, B, R>(
    a: &A,
    b: &B,
    f: impl FnOnce(&dyn SetView<T>, &dyn SetView<T>) -> R,
) -> R
where
    A: Set<T> + ?Sized,
    B: Set<T> + ?Sized,
{
    let a_addr = ptr::from_ref(a).cast::<()>();
    let b_addr = ptr::from_ref(b).cast::<()>();

    if a_addr == b_addr {
        a.with_view(|view| f(view, view))
    } else if a_addr < b_addr {
        a.with_view(|a| b.with_view(|b| f(a, b)))
    } else {
        b.with_view(|b| a.with_view(|a| f(a, b)))
    }
}

/// Orders two views so that the one with fewer elements comes first. Ties keep `a` first.
pub(crate) fn smaller_first<'a, T>(
    a: &'a dyn SetView<T>,
    b: &'a dyn SetView<T>,
) -> (&'a dyn SetView<T>, &'a dyn SetView<T>) {
    if b.len() < a.len() {
        (b, a)
    } else {
        (a, b)
    }
}

fn all<T>(view: &dyn SetView<T>, mut predicate: impl FnMut(&T) -> bool) -> bool {
    let mut result = true;
    view.visit(&mut |item| {
        if predicate(item) {
            ControlFlow::Continue(())
        } else {
            result = false;
            ControlFlow::Break(())
        }
    });
    result
}

impl<T: Hash + Eq, B: BuildHasher> SetView<T> for HashSet<T, B> {
    fn len(&self) -> usize {
        HashSet::len(self)
    }

    fn contains_unlocked(&self, item: &T) -> bool {
        HashSet::contains(self, item)
    }

    fn visit(&self, f: &mut dyn FnMut(&T) -> ControlFlow<()>) {
        for item in self {
            if f(item).is_break() {
                break;
            }
        }
    }
}

impl<T: Hash + Eq, B: BuildHasher> Set<T> for HashSet<T, B> {
    fn with_view<R>(&self, f: impl FnOnce(&dyn SetView<T>) -> R) -> R {
        f(self)
    }

    fn add_all<I: IntoIterator<Item = T>>(&mut self, items: I) -> usize {
        items.into_iter().map(|item| self.insert(item)).filter(|new| *new).count()
    }
}

impl<T: Ord> SetView<T> for BTreeSet<T> {
    fn len(&self) -> usize {
        BTreeSet::len(self)
    }

    fn contains_unlocked(&self, item: &T) -> bool {
        BTreeSet::contains(self, item)
    }

    fn visit(&self, f: &mut dyn FnMut(&T) -> ControlFlow<()>) {
        for item in self {
            if f(item).is_break() {
                break;
            }
        }
    }
}

impl<T: Ord> Set<T> for BTreeSet<T> {
    fn with_view<R>(&self, f: impl FnOnce(&dyn SetView<T>) -> R) -> R {
        f(self)
    }

    fn add_all<I: IntoIterator<Item = T>>(&mut self, items: I) -> usize {
        items.into_iter().map(|item| self.insert(item)).filter(|new| *new).count()
    }
}
