use std::fmt::{Display, Formatter, Result as FmtResult};
use std::io::ErrorKind;
use std::path::PathBuf;

use super::NativeError;

/// An error occurring during the creation of a new container.
#[derive(Debug, PartialEq)]
pub enum CreateError {
    /// The destination could not be created or truncated.
    Inaccessible(PathBuf, ErrorKind),
    /// The native library failed to start the container.
    Native(PathBuf, NativeError),
}

impl super::Error for CreateError {}

impl CreateError {
    /// The path the failed creation was attempted on.
    pub fn path(&self) -> &PathBuf {
        match self {
            CreateError::Inaccessible(path, _) | CreateError::Native(path, _) => path,
        }
    }
}

impl Display for CreateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "Error during creation of '{}': ", self.path().display())?;
        match self {
            CreateError::Inaccessible(_, kind) => {
                write!(f, "The destination is not writable ('{:?}')", kind)
            }
            CreateError::Native(_, error) => {
                write!(f, "The native library failed ('{}')", error)
            }
        }
    }
}
