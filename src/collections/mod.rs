//! Collection types and the capabilities they share.
//!
//! # Purpose
//! [`binary_tree`] holds the red-black tree set along with its iterators, cursors and
//! thread-safe wrapper. [`traits`] holds the [`Set`](traits::Set) capability which lets different
//! kinds of set take part in the same set algebra.

pub mod binary_tree;
pub mod traits;
