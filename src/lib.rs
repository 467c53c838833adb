//! Ordered, in-memory collections built around a red-black tree set.
//!
//! # Purpose
//! The centrepiece of this crate is [`OrderedSet`](collections::binary_tree::OrderedSet), a
//! self-balancing binary search tree which keeps its elements sorted by a user supplied total
//! order. The interesting parts are the ones a plain binary tree doesn't need: rotations,
//! recolouring after insertion and the six cases of rebalancing after removal.
//!
//! # Method
//! Nodes are stored in an arena and refer to each other by index, which means the parent
//! back-links needed for bottom-up rebalancing never pretend to own anything. Removing a node
//! swaps the last node in the arena into its slot, so the arena is always exactly as long as the
//! set.
//!
//! Set algebra (union, intersection, difference) is written against the
//! [`Set`](collections::traits::Set) capability rather than a concrete type, so an `OrderedSet`
//! can be combined with a [`std::collections::HashSet`] or any other container implementing it.
//!
//! # Error Handling
//! Most misuse is a bug on the caller's side, so the ergonomic methods panic with a strongly typed
//! error's message, while `try_` variants return an [`Option`] or [`Result`] instead. Errors are
//! small structs implementing [`Error`](std::error::Error), combined into enums for static
//! dispatch.
//!
//! # Threading
//! [`OrderedSet`](collections::binary_tree::OrderedSet) relies on the borrow checker for
//! exclusive access. With the `sync` feature (enabled by default),
//! [`SharedOrderedSet`](collections::binary_tree::SharedOrderedSet) wraps a set in a read-write
//! lock so that it can be mutated through a shared reference.
//!
//! # Logging
//! The crate logs through the [`log`] facade and never installs a logger itself.

#![warn(clippy::missing_safety_doc)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(clippy::missing_panics_doc)]
#![warn(clippy::unwrap_used)]
#![allow(clippy::module_inception)]

pub mod collections;

pub(crate) mod util;
