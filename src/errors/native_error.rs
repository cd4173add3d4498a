use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::io::{Error as IoError, ErrorKind};

use mp4::Error as WrappedError;

/// An error raised and described by the native MP4 library.
#[derive(Clone, PartialEq, Eq)]
pub struct NativeError {
    kind: Option<ErrorKind>,
    message: String,
}

impl NativeError {
    /// Message returned if the native library does not specify an error.
    pub const MISSING_MESSAGE: &'static str = "<Unknown MP4 error>";

    pub(crate) fn unknown_handle() -> Self {
        NativeError {
            kind: None,
            message: String::from("Handle is not known to the native library"),
        }
    }

    /// The I/O error kind, if the native library failed while accessing the disk.
    pub fn io_kind(&self) -> Option<ErrorKind> {
        self.kind
    }
}

impl Debug for NativeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self.kind {
            Some(kind) => write!(f, "'{}' ({:?})", self, kind),
            None => write!(f, "'{}'", self),
        }
    }
}

impl Display for NativeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self.message.is_empty() {
            true => f.write_str(NativeError::MISSING_MESSAGE),
            false => f.write_str(&self.message),
        }
    }
}

impl From<WrappedError> for NativeError {
    fn from(error: WrappedError) -> Self {
        match error {
            WrappedError::IoError(error) => error.into(),
            error => NativeError {
                kind: None,
                message: error.to_string(),
            },
        }
    }
}

impl From<IoError> for NativeError {
    fn from(error: IoError) -> Self {
        NativeError {
            kind: Some(error.kind()),
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Error as IoError, ErrorKind};

    use super::NativeError;

    #[test]
    fn test_io_kind_survives() {
        let error = NativeError::from(mp4::Error::IoError(IoError::new(
            ErrorKind::UnexpectedEof,
            "truncated",
        )));
        assert_eq!(error.io_kind(), Some(ErrorKind::UnexpectedEof));
        assert_eq!(error.to_string(), "truncated");
    }

    #[test]
    fn test_invalid_data() {
        let error = NativeError::from(mp4::Error::InvalidData("bad box"));
        assert_eq!(error.io_kind(), None);
        assert!(error.to_string().contains("bad box"));
    }
}
