//! A module containing [`OrderedSet`] and associated types.
//!
//! Iteration over a set comes in two flavours. [`Iter`] and [`IntoIter`] behave like any other
//! std iterator and borrow or consume the set. A [`Cursor`] holds no borrow between steps,
//! which allows it to outlive changes to the set, at the cost of failing with a
//! [`CursorError`] once one happens.
//!
//! As a note, there is no mutable iterator over the elements of a set because mutating the entries
//! in place would cause a logic error.
//!
//! [`OrderedSet`] is also re-exported under the parent module.

mod algebra;
mod cursor;
mod error;
mod iter;
mod node;
mod options;
mod ordered_set;
#[cfg(feature = "sync")]
mod shared;
mod tests;
mod tree;

pub use cursor::*;
pub use error::*;
pub use iter::*;
pub use options::*;
pub use ordered_set::*;
#[cfg(feature = "sync")]
pub use shared::*;

pub(crate) use node::*;
pub(crate) use tree::*;
