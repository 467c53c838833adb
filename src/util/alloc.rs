#![cfg(test)]

use std::cmp::Ordering;
use std::sync::Arc;
use std::sync::atomic::{self, AtomicUsize};

/// A shared counter of how many [`Tracked`] values have been dropped.
#[derive(Debug, Default, Clone)]
pub struct DropCounter(Arc<AtomicUsize>);

impl DropCounter {
    pub fn new() -> DropCounter {
        DropCounter::default()
    }

    pub fn track(&self, key: i32) -> Tracked {
        Tracked {
            key,
            drops: self.clone(),
        }
    }

    pub fn get(&self) -> usize {
        self.0.load(atomic::Ordering::SeqCst)
    }
}

/// A value which is ordered by `key` alone and counts its own drop.
#[derive(Debug, Clone)]
pub struct Tracked {
    pub key: i32,
    drops: DropCounter,
}

impl PartialEq for Tracked {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Tracked {}

impl PartialOrd for Tracked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tracked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.drops.0.fetch_add(1, atomic::Ordering::SeqCst);
    }
}
