use std::fmt::{Display, Formatter, Result as FmtResult};

/// A raw handle to a file opened by the native MP4 library.
#[derive(Clone, Copy, Debug, Hash, PartialOrd, PartialEq, Eq, Ord)]
pub struct RawHandle(pub u64);

impl RawHandle {
    /// The sentinel meaning "no open file". Never returned by a successful open.
    pub const INVALID: RawHandle = RawHandle(0);

    /// Checks whether the value differs from the invalid sentinel. Never calls into native code.
    pub const fn is_valid(self) -> bool {
        self.0 != RawHandle::INVALID.0
    }
}

impl Default for RawHandle {
    fn default() -> Self {
        RawHandle::INVALID
    }
}

impl From<u64> for RawHandle {
    fn from(raw_value: u64) -> Self {
        RawHandle(raw_value)
    }
}

impl Display for RawHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{:#x}", self.0)
    }
}
