use std::fmt::{Display, Formatter, Result as FmtResult};
use std::io::ErrorKind;
use std::path::PathBuf;

use super::NativeError;

/// An error occurring while opening an existing container for reading or modification.
#[derive(Debug, PartialEq)]
pub enum OpenError {
    /// The file could not be accessed on disk.
    Inaccessible(PathBuf, ErrorKind),
    /// The native library rejected the file as a container.
    InvalidContainer(PathBuf, NativeError),
}

impl super::Error for OpenError {}

impl OpenError {
    /// The path the failed open was attempted on.
    pub fn path(&self) -> &PathBuf {
        match self {
            OpenError::Inaccessible(path, _) | OpenError::InvalidContainer(path, _) => path,
        }
    }
}

impl Display for OpenError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "Error during opening of '{}': ", self.path().display())?;
        match self {
            OpenError::Inaccessible(_, kind) => {
                write!(f, "The file is not accessible ('{:?}')", kind)
            }
            OpenError::InvalidContainer(_, error) => {
                write!(f, "The file is not a valid MP4 container ('{}')", error)
            }
        }
    }
}
