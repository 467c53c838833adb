use std::error::Error;

pub(crate) trait ResultExtension<T, E: Error> {
    /// Like [`Result::unwrap`], but panics with the error's own message rather than its [`Debug`]
    /// representation. Used by the panicking counterparts of `try_` methods.
    ///
    /// # Panics
    /// Panics if the [`Result`] is an [`Err`].
    fn throw(self) -> T;
}

impl<T, E: Error> ResultExtension<T, E> for Result<T, E> {
    #[track_caller]
    fn throw(self) -> T {
        match self {
            Ok(val) => val,
            Err(error) => panic!("{error}"),
        }
    }
}
