pub mod alloc;
pub mod fmt;
pub mod logging;
pub mod option;
pub mod panic;
pub mod result;
