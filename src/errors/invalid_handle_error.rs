use std::fmt::{Display, Formatter, Result as FmtResult};

/// An operation which requires an open file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Querying the file name.
    GetFilename,
    /// Dumping the box structure.
    Dump,
    /// Describing the file or one of its tracks.
    Info,
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(match self {
            Operation::GetFilename => "get_filename",
            Operation::Dump => "dump",
            Operation::Info => "info",
        })
    }
}

/// An operation was invoked on a handle which was never opened or is already closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidHandleError(pub Operation);

impl super::Error for InvalidHandleError {}

impl Display for InvalidHandleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "Error during {}: MP4FileHandle is no longer valid (file has been closed)",
            self.0
        )
    }
}
