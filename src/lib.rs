//! This crate provides close-once handles to MP4 containers opened by a native MP4 library.
#![deny(missing_docs)]

pub mod errors;
mod file_handle;
mod native;
mod util;

pub use self::file_handle::{
    file_info, get_log_level, scoped, set_log_level, FileHandle, Scope,
};
pub use self::native::LogLevel;
pub use self::util::RawHandle;
