use std::error::Error;
use std::fmt::{self, Display, Formatter};

use derive_more::{Display, Error, From, IsVariant, TryInto};

#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
#[display("Attempted to access the first or last element of an empty OrderedSet!")]
pub struct EmptySet;

/// The set a [`Cursor`](super::Cursor) was traversing changed since the cursor was created. The
/// cursor can't be used again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConcurrentModification {
    pub expected: u64,
    pub found: u64,
}

impl Display for ConcurrentModification {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "OrderedSet was modified during traversal (version {} became {})!",
            self.expected, self.found
        )
    }
}

impl Error for ConcurrentModification {}

#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
#[display("Cursor was used with a different set to the one that created it!")]
pub struct ForeignCursor;

#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
#[display("Elements of an OrderedSet can't be modified in place, doing so could break its order!")]
pub struct ReadOnlyElement;

#[derive(Debug, Display, Error, From, TryInto, IsVariant, Clone, Copy, PartialEq, Eq)]
pub enum CursorError {
    ConcurrentModification(ConcurrentModification),
    ForeignCursor(ForeignCursor),
}
