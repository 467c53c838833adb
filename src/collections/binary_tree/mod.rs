//! Binary search tree collections. Currently revolves around [`OrderedSet`], a red-black tree set,
//! and its thread-safe counterpart [`SharedOrderedSet`].

pub mod set;

#[doc(inline)]
pub use set::OrderedSet;
#[cfg(feature = "sync")]
#[doc(inline)]
pub use set::SharedOrderedSet;
