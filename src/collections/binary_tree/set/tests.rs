#![cfg(test)]

use std::cell::Cell;
use std::collections::{BTreeSet, HashSet};
use std::ops::ControlFlow;
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::*;
use crate::collections::traits::{Set, SetView};
use crate::util::alloc::DropCounter;
use crate::util::logging;
use crate::util::panic::assert_panics;

fn drain_cursor<C: Comparator<i32>>(
    cursor: &mut Cursor<i32>,
    set: &OrderedSet<i32, C>,
) -> Vec<i32> {
    let mut values = Vec::new();
    while let Some(element) = cursor
        .next(set)
        .expect("The set shouldn't change during the traversal.")
    {
        values.push(*element);
    }
    values
}

fn random_set(rng: &mut ChaCha8Rng, len: usize, max: i32) -> OrderedSet<i32> {
    (0..len).map(|_| rng.gen_range(0..max)).collect()
}

#[test]
fn test_insert_and_remove() {
    logging::init();
    let mut set = OrderedSet::new();

    assert!(set.insert(5), "Inserting into an empty set should succeed.");
    assert!(!set.insert(5), "Inserting a duplicate should be rejected.");
    assert!(set.insert(3));
    assert!(set.insert(8));
    assert_eq!(set.len(), 3);
    assert!(set.contains(&3) && !set.contains(&4));

    assert!(set.remove(&3), "Removing a present value should succeed.");
    assert!(!set.remove(&3), "Removing an absent value should fail.");
    assert!(!set.contains(&3));
    assert!(set.insert(3), "A removed value should be insertable again.");

    assert_eq!(set.len(), 3);
    assert_eq!(
        set.iter().count(),
        set.len(),
        "The length should match the number of values traversed."
    );
    set.check_invariants();
}

#[test]
fn test_random_operations_keep_invariants() {
    logging::init();
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);
    let mut set = OrderedSet::new();
    let mut model = BTreeSet::new();

    for _ in 0..3000 {
        let value = rng.gen_range(0..250);
        if rng.gen_bool(0.6) {
            assert_eq!(
                set.insert(value),
                model.insert(value),
                "Insertion of {value} should only succeed if it was absent."
            );
        } else {
            assert_eq!(
                set.remove(&value),
                model.remove(&value),
                "Removal of {value} should only succeed if it was present."
            );
        }
        set.check_invariants();
    }

    assert_eq!(set.len(), model.len());
    assert_eq!(set.to_vec(), model.into_iter().collect::<Vec<_>>());

    while let Some(value) = set.pop_last() {
        assert!(!set.contains(&value));
        set.check_invariants();
    }
    assert!(set.is_empty());
}

#[test]
fn test_black_height_bound() {
    let mut set = OrderedSet::new();
    set.insert_all(1..=1023);

    let black_height = set.check_invariants();
    assert!(
        black_height <= 11,
        "Sequential insertion should still produce a balanced tree, got a black height of \
        {black_height}."
    );
}

#[test]
fn test_shuffled_round_trip() {
    let mut rng = ChaCha8Rng::seed_from_u64(17);
    let mut values: Vec<i32> = (1..=500).collect();
    values.shuffle(&mut rng);

    let set = OrderedSet::from_iter(values);
    assert_eq!(
        set.iter().copied().collect::<Vec<_>>(),
        (1..=500).collect::<Vec<_>>(),
        "Ascending iteration should yield every value in order."
    );
    assert_eq!(
        set.iter_rev().copied().collect::<Vec<_>>(),
        (1..=500).rev().collect::<Vec<_>>(),
        "Descending iteration should yield every value in reverse order."
    );
    assert_eq!(set.iter().len(), 500);
    assert_eq!(set.iter_rev().order(), Order::Descending);

    let mut owned = set.into_iter();
    assert_eq!(owned.next(), Some(1));
    assert_eq!(owned.next_back(), Some(500));
    assert_eq!(owned.len(), 498);
}

#[test]
fn test_seeded_insert_then_remove() {
    logging::init();
    let mut rng = ChaCha8Rng::seed_from_u64(1024);
    let mut set = OrderedSet::new();
    let mut inserted = Vec::new();

    for _ in 0..1024 {
        let value = rng.r#gen::<i32>();
        if set.insert(value) {
            inserted.push(value);
        }
    }
    assert_eq!(set.len(), inserted.len());

    for value in &inserted {
        assert!(set.remove(value), "Every inserted value should be removable.");
    }
    set.check_invariants();
    assert_eq!(set.len(), 0, "Removing every inserted value should empty the set.");
}

#[test]
fn test_first_and_last() {
    let mut set = OrderedSet::from_iter([4, 2, 9, 7]);
    assert_eq!(*set.first(), 2);
    assert_eq!(*set.last(), 9);

    assert_eq!(set.pop_first(), Some(2));
    assert_eq!(set.pop_last(), Some(9));
    assert_eq!(set.to_vec(), [4, 7]);
    assert_eq!(set.get(&7), Some(&7));
    assert_eq!(set.get(&9), None);

    let empty: OrderedSet<i32> = OrderedSet::new();
    assert_eq!(empty.try_first(), None);
    assert_eq!(empty.try_last(), None);
    assert_panics!(
        {
            empty.first();
        },
        "Accessing the first value of an empty set should panic."
    );
    assert_panics!(
        {
            empty.last();
        },
        "Accessing the last value of an empty set should panic."
    );
}

#[test]
fn test_version_counts_structural_changes() {
    let mut set = OrderedSet::new();
    assert_eq!(set.version(), 0);

    set.insert(1);
    assert_eq!(set.version(), 1);
    set.insert(1);
    assert_eq!(set.version(), 1, "A rejected duplicate isn't a structural change.");
    set.remove(&2);
    assert_eq!(set.version(), 1, "Removing an absent value isn't a structural change.");
    set.remove(&1);
    assert_eq!(set.version(), 2);

    set.clear();
    assert_eq!(set.version(), 3, "Clearing should count even when the set is empty.");

    set.insert_all([1, 2, 3]);
    assert_eq!(set.version(), 6);
    assert_eq!(set.retain(|_| true), 0);
    assert_eq!(
        set.version(),
        7,
        "Retaining rebuilds the tree, so it should count even when nothing is removed."
    );
    assert_eq!(set.retain(|n| *n != 2), 1);
    assert_eq!(set.version(), 8);

    set.pop_first();
    assert_eq!(set.take(&3), Some(3));
    assert_eq!(set.version(), 10);

    let mut empty: OrderedSet<i32> = OrderedSet::new();
    assert_eq!(empty.retain(|_| false), 0);
    assert_eq!(empty.version(), 0, "Retaining from an empty set changes nothing.");
}

#[test]
fn test_retain_invalidates_cursors() {
    let mut set = OrderedSet::from_iter(0..=8);
    let mut cursor = set.cursor(Order::Ascending);
    assert_eq!(cursor.next(&set).map(|e| e.map(|e| *e)), Ok(Some(0)));
    assert_eq!(cursor.next(&set).map(|e| e.map(|e| *e)), Ok(Some(1)));

    assert_eq!(set.retain(|_| true), 0);
    assert!(
        cursor.next(&set).is_err_and(|e| e.is_concurrent_modification()),
        "A cursor shouldn't walk a tree that retain has rebuilt."
    );

    let mut cursor = set.cursor(Order::Ascending);
    assert_eq!(
        drain_cursor(&mut cursor, &set),
        (0..=8).collect::<Vec<_>>(),
        "A cursor created after retain should see the rebuilt tree in order."
    );
}

#[test]
fn test_retain_with_panicking_predicate() {
    logging::init();
    let mut set = OrderedSet::from_iter(1..=10);
    let before = set.version();

    assert_panics!(
        {
            set.retain(|n| {
                if *n == 5 {
                    panic!("Refusing to decide on 5.");
                }
                n % 2 == 0
            });
        },
        "The predicate's panic should propagate."
    );

    assert_eq!(
        set.to_vec(),
        [2, 4, 5, 6, 7, 8, 9, 10],
        "Only values rejected before the panic should be removed."
    );
    assert!(set.version() > before, "Removals before the panic should bump the version.");
    set.check_invariants();
}

#[test]
fn test_cursor_invalidation() {
    logging::init();
    let mut set = OrderedSet::from_iter(1..=10);
    let mut cursor = set.cursor(Order::Ascending);

    assert_eq!(cursor.next(&set).map(|e| e.map(|e| *e)), Ok(Some(1)));
    assert_eq!(cursor.next(&set).map(|e| e.map(|e| *e)), Ok(Some(2)));

    assert!(!set.insert(5), "Duplicates shouldn't be inserted.");
    set.remove(&42);
    assert_eq!(
        cursor.next(&set).map(|e| e.map(|e| *e)),
        Ok(Some(3)),
        "Failed mutations shouldn't invalidate a cursor."
    );

    set.insert(11);
    assert_eq!(
        cursor.next(&set).map(|e| e.map(|e| *e)),
        Err(CursorError::ConcurrentModification(ConcurrentModification {
            expected: 10,
            found: 11,
        })),
        "A cursor should fail after its set was modified."
    );
    assert!(cursor.is_invalidated());

    assert!(
        cursor.start(&set).is_err_and(|e| e.is_concurrent_modification()),
        "Restarting shouldn't revive an invalidated cursor."
    );
    assert!(cursor.next(&set).is_err());

    let mut fresh = set.cursor(Order::Ascending);
    set.clear();
    assert!(
        fresh.next(&set).is_err(),
        "Clearing should invalidate cursors."
    );
}

#[test]
fn test_cursor_restart() {
    let set = OrderedSet::from_iter([3, 1, 2]);
    let mut cursor = set.cursor(Order::Descending);

    assert_eq!(drain_cursor(&mut cursor, &set), [3, 2, 1]);
    assert!(
        cursor.next(&set).is_ok_and(|element| element.is_none()),
        "An exhausted cursor should keep returning None."
    );

    cursor.start(&set).expect("The set hasn't changed.");
    assert_eq!(
        drain_cursor(&mut cursor, &set),
        [3, 2, 1],
        "Restarting should traverse the set again from the beginning."
    );
}

#[test]
fn test_cursor_filter_and_take_while() {
    let set = OrderedSet::from_iter(1..=20);

    let mut cursor = set
        .cursor(Order::Ascending)
        .filter(|n| n % 3 == 0)
        .take_while(|n| *n < 13);
    assert_eq!(drain_cursor(&mut cursor, &set), [3, 6, 9, 12]);

    let mut cursor = set
        .cursor(Order::Ascending)
        .filter(|n| n % 2 == 0)
        .take_while(|n| *n != 7);
    assert_eq!(
        drain_cursor(&mut cursor, &set),
        [2, 4, 6],
        "The take_while predicate should also see elements rejected by the filter."
    );

    let mut cursor = set
        .cursor(Order::Descending)
        .filter(|n| n % 2 == 0)
        .filter(|n| n % 5 == 0);
    assert_eq!(
        drain_cursor(&mut cursor, &set),
        [20, 10],
        "Filters should combine."
    );
}

#[test]
fn test_foreign_cursor() {
    let set = OrderedSet::from_iter([1, 2, 3]);
    let copy = set.clone();
    let mut cursor = set.cursor(Order::Ascending);

    assert_eq!(
        cursor.next(&copy).map(|e| e.map(|e| *e)),
        Err(CursorError::ForeignCursor(ForeignCursor)),
        "A cursor should refuse to traverse a set other than its own."
    );
    assert!(!cursor.is_invalidated());

    let error = cursor.start(&copy).expect_err("The copy is a different set.");
    assert!(error.is_foreign_cursor());
    assert!(ForeignCursor::try_from(error).is_ok());
    assert!(ConcurrentModification::try_from(error).is_err());

    assert_eq!(drain_cursor(&mut cursor, &set), [1, 2, 3]);
}

#[test]
fn test_element_is_read_only() {
    let set = OrderedSet::from_iter([1, 2, 3]);
    let mut cursor = set.cursor(Order::Ascending);
    let mut element = cursor
        .next(&set)
        .expect("The set hasn't changed.")
        .expect("The set isn't empty.");

    assert_eq!(element.try_replace(10), Err(ReadOnlyElement));
    assert_panics!(
        {
            element.replace(10);
        },
        "Writing through an element should panic."
    );
    assert_eq!(*element.get(), 1);
    assert_eq!(set.to_vec(), [1, 2, 3]);
}

#[test]
fn test_set_algebra() {
    logging::init();
    let a = OrderedSet::from_iter([1, 2, 3, 4]);
    let b = OrderedSet::from_iter([3, 4, 5, 6]);

    assert_eq!(a.intersection(&b).to_vec(), [3, 4]);
    assert_eq!(a.union(&b).to_vec(), [1, 2, 3, 4, 5, 6]);
    assert_eq!(a.difference(&b).to_vec(), [1, 2]);
    assert_eq!(a.symmetric_difference(&b).to_vec(), [1, 2, 5, 6]);

    assert_eq!(&a & &b, a.intersection(&b));
    assert_eq!(&a | &b, a.union(&b));
    assert_eq!(&a - &b, a.difference(&b));
    assert_eq!(&a ^ &b, a.symmetric_difference(&b));

    assert_eq!(a.version(), 4, "Set operations shouldn't modify their operands.");
    assert_eq!(b.to_vec(), [3, 4, 5, 6]);
}

#[test]
fn test_set_algebra_laws() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);

    for _ in 0..20 {
        let a = random_set(&mut rng, 60, 100);
        let b = random_set(&mut rng, 40, 100);

        assert_eq!(a.union(&a), a, "A set's union with itself should be the same set.");
        assert_eq!(a.intersection(&a), a);
        assert!(a.difference(&a).is_empty());
        assert_eq!(
            a.intersection(&b),
            b.intersection(&a),
            "Intersection should be commutative."
        );
        assert_eq!(a.union(&b), b.union(&a), "Union should be commutative.");
        assert_eq!(
            a.difference(&b).union(&a.intersection(&b)),
            a,
            "A set should be split exactly by a difference and an intersection."
        );

        let intersection = a.intersection(&b);
        assert!(intersection.is_subset(&a) && intersection.is_subset(&b));
        assert!(a.union(&b).is_superset(&b));
        assert!(a.difference(&b).is_disjoint(&b));
        intersection.check_invariants();
    }
}

#[test]
fn test_set_algebra_with_other_set_types() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let a = random_set(&mut rng, 50, 80);
    let b = random_set(&mut rng, 50, 80);
    let hashed: HashSet<i32> = b.iter().copied().collect();
    let sorted: BTreeSet<i32> = b.iter().copied().collect();

    assert_eq!(a.union(&hashed), a.union(&b));
    assert_eq!(
        a.intersection(&hashed),
        a.intersection(&b),
        "A hash-backed operand should give the same result as an equal ordered set."
    );
    assert_eq!(a.difference(&hashed), a.difference(&b));
    assert_eq!(a.symmetric_difference(&hashed), a.symmetric_difference(&b));

    assert_eq!(a.intersection(&sorted), a.intersection(&b));
    assert_eq!(a.symmetric_difference(&sorted), a.symmetric_difference(&b));

    assert!(Set::is_subset(&hashed, &a.union(&b)));
    assert_eq!(hashed.count(), b.len());
    assert_eq!(sorted.to_snapshot(), b.to_vec());

    let mut grown = hashed.clone();
    assert_eq!(grown.add_all(a.to_vec()), a.difference(&b).len());
    assert_eq!(grown.len(), a.union(&b).len());
}

/// A hash-backed set which counts how often it's asked about membership.
struct CountingSet {
    items: HashSet<i32>,
    lookups: Cell<usize>,
}

impl CountingSet {
    fn new(items: impl IntoIterator<Item = i32>) -> CountingSet {
        CountingSet {
            items: items.into_iter().collect(),
            lookups: Cell::new(0),
        }
    }
}

impl SetView<i32> for CountingSet {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn contains_unlocked(&self, item: &i32) -> bool {
        self.lookups.set(self.lookups.get() + 1);
        self.items.contains(item)
    }

    fn visit(&self, f: &mut dyn FnMut(&i32) -> ControlFlow<()>) {
        self.items.visit(f)
    }
}

impl Set<i32> for CountingSet {
    fn with_view<R>(&self, f: impl FnOnce(&dyn SetView<i32>) -> R) -> R {
        f(self)
    }

    fn add_all<I: IntoIterator<Item = i32>>(&mut self, items: I) -> usize {
        self.items.add_all(items)
    }
}

#[test]
fn test_intersection_scans_smaller_operand() {
    let small = OrderedSet::from_iter([3, 50, 97, 200, 400]);
    let large = CountingSet::new(0..100);

    assert_eq!(small.intersection(&large).to_vec(), [3, 50, 97]);
    assert_eq!(
        large.lookups.get(),
        small.len(),
        "The larger operand should be looked up once per element of the smaller one."
    );

    let large = OrderedSet::from_iter(0..100);
    let small = CountingSet::new([3, 50, 200]);
    assert_eq!(large.intersection(&small).to_vec(), [3, 50]);
    assert_eq!(
        small.lookups.get(),
        0,
        "The smaller operand should be scanned, never looked up."
    );
}

#[test]
fn test_custom_comparator() {
    let by_length = |a: &String, b: &String| a.len().cmp(&b.len()).then_with(|| a.cmp(b));
    let mut set = OrderedSet::with_comparator(by_length);
    set.insert_all(["ccc", "a", "bb", "aa", "b"].map(String::from));

    assert_eq!(set.to_vec(), ["a", "b", "aa", "bb", "ccc"]);
    set.check_invariants();

    let mut set = OrderedSet::with_comparator(|a: &String, b: &String| {
        a.to_lowercase().cmp(&b.to_lowercase())
    });
    assert!(set.insert(String::from("Apple")));
    assert!(
        !set.insert(String::from("apple")),
        "Values the comparator considers equal should be duplicates."
    );
    assert_eq!(
        set.get(&String::from("APPLE")).map(String::as_str),
        Some("Apple"),
        "Lookups should go through the comparator."
    );

    let filtered = set.union(&set).difference(&set);
    assert!(filtered.is_empty());
}

#[test]
fn test_deep_copy() {
    let mut set = SetOptions::<Arc<i32>>::new()
        .deep_copy(|value| Arc::new(**value))
        .build();
    set.insert_all([3, 1, 2].map(Arc::new));
    assert!(set.options().has_deep_copy());

    let shallow = set.to_vec();
    let deep = set.to_vec_deep();
    assert_eq!(shallow, deep);
    assert!(
        set.iter().zip(&shallow).all(|(a, b)| Arc::ptr_eq(a, b)),
        "A plain copy should share its values."
    );
    assert!(
        set.iter().zip(&deep).all(|(a, b)| !Arc::ptr_eq(a, b)),
        "A deep copy should go through the deep copy function."
    );

    let copy = set.deep_clone();
    assert_eq!(copy, set);
    assert_eq!(copy.version(), 0);
    assert!(copy.iter().zip(set.iter()).all(|(a, b)| !Arc::ptr_eq(a, b)));
    copy.check_invariants();

    let plain = OrderedSet::from_iter([1, 2].map(Arc::new));
    assert!(!plain.options().has_deep_copy());
    assert!(
        plain.deep_clone().iter().zip(plain.iter()).all(|(a, b)| Arc::ptr_eq(a, b)),
        "Without a deep copy function, Clone should be used."
    );
}

#[test]
fn test_concurrent_hint_propagates() {
    let mut hinted = SetOptions::new().concurrent(true).build();
    hinted.insert_all([1, 2, 3]);
    let plain = OrderedSet::from_iter([2, 3, 4]);

    assert!(hinted.is_concurrent());
    assert!(!plain.is_concurrent());
    assert!(hinted.union(&plain).is_concurrent());
    assert!(hinted.intersection(&plain).is_concurrent());
    assert!(
        !plain.difference(&hinted).is_concurrent(),
        "A result should take its options from the left operand."
    );
    assert!(hinted.clone().is_concurrent());
}

#[test]
fn test_drops() {
    let drops = DropCounter::new();
    let mut set = OrderedSet::new();
    for key in 0..100 {
        set.insert(drops.track(key));
    }
    assert!(!set.insert(drops.track(5)));
    assert_eq!(drops.get(), 1, "A rejected duplicate should be dropped.");

    let lookup = drops.track(10);
    let taken = set.take(&lookup);
    assert_eq!(taken.as_ref().map(|t| t.key), Some(10));
    drop(taken);
    drop(lookup);
    assert_eq!(drops.get(), 3);

    drop(set.pop_first());
    assert_eq!(drops.get(), 4);

    assert_eq!(set.retain(|t| t.key % 2 == 0), 50);
    assert_eq!(drops.get(), 54, "Values rejected by retain should be dropped.");
    set.check_invariants();

    set.clear();
    assert_eq!(drops.get(), 102, "Clearing should drop every value.");

    set.insert_all((100..110).map(|key| drops.track(key)));
    let mut owned = set.into_iter();
    drop(owned.next());
    drop(owned);
    assert_eq!(drops.get(), 112, "Every value should be dropped exactly once.");
}

#[test]
fn test_formatting() {
    let set = OrderedSet::from_iter([1, 2, 3]);
    assert_eq!(set.to_string(), "{1, 2, 3}");
    assert_eq!(OrderedSet::<i32>::new().to_string(), "{}");

    let debug = format!("{set:?}");
    assert!(debug.contains("(2: B)"), "The root should be drawn black: {debug}");
    assert!(debug.contains("(1: R)") && debug.contains("(3: R)"));
}

#[test]
fn test_clone_and_equality() {
    let mut set = OrderedSet::from_iter([5, 1, 3]);
    let copy = set.clone();

    assert_eq!(copy, set);
    assert_eq!(copy.version(), 0, "A clone should start with a fresh version.");

    set.extend([7, 9]);
    assert_ne!(copy, set);
    assert_eq!((&set).into_iter().copied().collect::<Vec<_>>(), [1, 3, 5, 7, 9]);
}

#[cfg(feature = "sync")]
mod shared {
    use std::thread;

    use super::*;

    #[test]
    fn test_threads_insert_and_remove() {
        logging::init();
        let set: SharedOrderedSet<i32> = SharedOrderedSet::new();

        thread::scope(|scope| {
            for worker in 0..4 {
                let set = &set;
                scope.spawn(move || {
                    for value in 0..250 {
                        assert!(set.insert(worker * 250 + value));
                    }
                });
            }
            scope.spawn(|| {
                for _ in 0..50 {
                    let snapshot = set.to_vec();
                    assert!(
                        snapshot.windows(2).all(|pair| pair[0] < pair[1]),
                        "Readers should only ever see a sorted set."
                    );
                }
            });
        });
        assert_eq!(set.len(), 1000);
        set.read().check_invariants();

        thread::scope(|scope| {
            for parity in 0..2 {
                let set = &set;
                scope.spawn(move || {
                    for value in (parity..1000).step_by(2) {
                        assert!(set.remove(&value));
                    }
                });
            }
        });
        assert!(set.is_empty());
        set.read().check_invariants();
    }

    #[test]
    fn test_reciprocal_set_operations() {
        let a: SharedOrderedSet<i32> = (0..200).collect();
        let b: SharedOrderedSet<i32> = (100..300).collect();

        thread::scope(|scope| {
            let left = scope.spawn(|| {
                (0..100).map(|_| a.intersection(&b).len()).collect::<Vec<_>>()
            });
            let right = scope.spawn(|| {
                (0..100).map(|_| b.intersection(&a).len()).collect::<Vec<_>>()
            });
            scope.spawn(|| {
                for value in 1000..1100 {
                    a.insert(value);
                    b.insert(value - 700);
                }
            });

            let left = left.join().expect("Intersection shouldn't panic.");
            let right = right.join().expect("Intersection shouldn't panic.");
            assert!(
                left.iter().chain(&right).all(|len| *len == 100),
                "Writers outside the overlap shouldn't change the intersection."
            );
        });
    }

    #[test]
    fn test_cursor_sees_other_threads() {
        let set: SharedOrderedSet<i32> = (1..=5).collect();
        let mut cursor = set.cursor(Order::Ascending);

        assert_eq!(cursor.next_shared(&set), Ok(Some(1)));
        assert_eq!(cursor.next_shared(&set), Ok(Some(2)));

        thread::scope(|scope| {
            scope.spawn(|| set.insert(6));
        });
        assert!(
            cursor.next_shared(&set).is_err_and(|e| e.is_concurrent_modification()),
            "A write from another thread should invalidate the cursor."
        );

        let mut cursor = set.cursor(Order::Descending);
        assert_eq!(cursor.next_shared(&set), Ok(Some(6)));
        cursor.start_shared(&set).expect("The set hasn't changed.");
        assert_eq!(cursor.next_shared(&set), Ok(Some(6)));
    }

    #[test]
    fn test_views_hold_the_read_lock() {
        let set: SharedOrderedSet<i32> = (1..=3).collect();
        let other = OrderedSet::from_iter([2, 3, 4]);

        assert!(!set.is_read_locked());
        assert!(set.with_view(|view| view.len() == 3 && set.is_read_locked()));
        assert!(
            crate::collections::traits::with_views(&set, &set, |a, b| {
                a.len() == b.len() && set.is_read_locked()
            }),
            "Combining a set with itself should only take its lock once."
        );
        assert!(!set.is_read_locked());

        assert_eq!(set.union(&other).to_vec(), [1, 2, 3, 4]);
        assert_eq!(other.difference(&set).to_vec(), [4]);
        assert_eq!(set.symmetric_difference(&other).to_vec(), [1, 4]);
        assert!(set.intersection(&other).is_subset(&set));
    }

    #[test]
    fn test_options_and_poisoning() {
        let set = SetOptions::new().concurrent(true).build_shared();
        set.insert_all([3, 1, 2]);
        assert!(set.is_concurrent());
        assert_eq!(set.first(), 1);
        assert_eq!(set.try_last(), Some(3));

        assert_panics!({
            let _guard = set.write();
            panic!("Poisoning the lock.");
        });
        assert!(set.inner.is_poisoned());
        assert_eq!(set.len(), 3, "A poisoned set should still be readable.");
        assert!(set.insert(4), "A poisoned set should still be writable.");

        let inner = set.into_inner();
        assert_eq!(inner.to_vec(), [1, 2, 3, 4]);
        assert!(inner.is_concurrent());
    }
}
