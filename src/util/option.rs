use std::hint;

pub(crate) trait OptionExtension<T> {
    unsafe fn unreachable(self) -> T;
}

impl<T> OptionExtension<T> for Option<T> {
    /// Unwraps a link which the structure of the collection guarantees to be present, such as the
    /// grandparent of a red node with a red parent.
    ///
    /// Debug builds hit [`unreachable!`] if the guarantee is broken, release builds use
    /// [`unreachable_unchecked`](hint::unreachable_unchecked). No panic or safety docs are needed
    /// at call sites beyond stating which invariant makes [`None`] impossible.
    unsafe fn unreachable(self) -> T {
        match self {
            Some(val) => val,
            None if cfg!(debug_assertions) => unreachable!("structurally guaranteed link missing"),
            // SAFETY: Callers only use this method where an invariant of the collection rules out
            // None.
            None => unsafe { hint::unreachable_unchecked() },
        }
    }
}
