//! Various errors occurring while handling MP4 files.

use std::fmt::{Debug, Display};

mod native_error;

mod create_error;
mod dump_error;
mod invalid_handle_error;
mod open_error;

pub use self::create_error::CreateError;
pub use self::dump_error::DumpError;
pub use self::invalid_handle_error::{InvalidHandleError, Operation};
pub use self::native_error::NativeError;
pub use self::open_error::OpenError;

/// An error occurring while working with an MP4 file handle.
pub trait Error: PartialEq + Debug + Display {
    /// Generate a human-readable version of the error.
    fn error_message(&self) -> String {
        format!("{}", &self)
    }
}
