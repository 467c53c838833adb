//! Set operations between two views of any kind of set, collected into an [`OrderedSet`].
//!
//! Each function only inserts into `result`, which is expected to start empty. Both operands are
//! plain views, so whatever locks they need are already held by the caller.

use std::ops::ControlFlow;

use log::debug;

use super::{Comparator, OrderedSet};
use crate::collections::traits::set::{SetView, smaller_first};

pub(crate) fn union<T: Clone, C: Comparator<T>>(
    result: &mut OrderedSet<T, C>,
    lhs: &dyn SetView<T>,
    rhs: &dyn SetView<T>,
) {
    debug!("Union of {} and {} elements", lhs.len(), rhs.len());
    copy_where(result, lhs, |_| true);
    copy_where(result, rhs, |_| true);
}

pub(crate) fn intersection<T: Clone, C: Comparator<T>>(
    result: &mut OrderedSet<T, C>,
    lhs: &dyn SetView<T>,
    rhs: &dyn SetView<T>,
) {
    let (scan, lookup) = smaller_first(lhs, rhs);
    debug!("Intersection scanning {} elements against {}", scan.len(), lookup.len());
    copy_where(result, scan, |item| lookup.contains_unlocked(item));
}

pub(crate) fn difference<T: Clone, C: Comparator<T>>(
    result: &mut OrderedSet<T, C>,
    lhs: &dyn SetView<T>,
    rhs: &dyn SetView<T>,
) {
    debug!("Difference scanning {} elements against {}", lhs.len(), rhs.len());
    copy_where(result, lhs, |item| !rhs.contains_unlocked(item));
}

pub(crate) fn symmetric_difference<T: Clone, C: Comparator<T>>(
    result: &mut OrderedSet<T, C>,
    lhs: &dyn SetView<T>,
    rhs: &dyn SetView<T>,
) {
    difference(result, lhs, rhs);
    difference(result, rhs, lhs);
}

fn copy_where<T: Clone, C: Comparator<T>>(
    result: &mut OrderedSet<T, C>,
    source: &dyn SetView<T>,
    mut keep: impl FnMut(&T) -> bool,
) {
    source.visit(&mut |item| {
        if keep(item) {
            result.insert(item.clone());
        }
        ControlFlow::Continue(())
    });
}
