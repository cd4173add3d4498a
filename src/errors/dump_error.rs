use std::fmt::{Display, Formatter, Result as FmtResult};
use std::io::ErrorKind;

use super::{InvalidHandleError, NativeError};
use crate::util::RawHandle;

/// An error occurring while the native library describes an open file (dump or info).
#[derive(Debug, PartialEq)]
pub enum DumpError {
    /// The handle is not open.
    InvalidHandle(InvalidHandleError),
    /// The native library reported an internal failure for this handle.
    Native(RawHandle, NativeError),
    /// The sink written to raised an error.
    SinkError(ErrorKind),
}

impl super::Error for DumpError {}

impl From<InvalidHandleError> for DumpError {
    fn from(error: InvalidHandleError) -> Self {
        DumpError::InvalidHandle(error)
    }
}

impl Display for DumpError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DumpError::InvalidHandle(error) => Display::fmt(error, f),
            DumpError::Native(handle, error) => write!(
                f,
                "Error while describing handle {}: The native library failed ('{}')",
                handle, error
            ),
            DumpError::SinkError(error) => write!(
                f,
                "Error while describing file: The output destination failed ('{:?}')",
                error
            ),
        }
    }
}
