use std::fmt::{Display, Formatter, Result as FmtResult};
use std::io::Write;
use std::ops::{Deref, DerefMut};
use std::path::Path;

use super::errors::{
    CreateError, DumpError, InvalidHandleError, NativeError, OpenError, Operation,
};
use super::native::{self, Failure, LogLevel};
use super::util::RawHandle;

/// An owned handle to a file opened by the native MP4 library.
///
/// The native handle is closed exactly once: either by [`FileHandle::close`] or when the
/// wrapper is dropped. Afterwards, every operation except `close` and `is_valid` fails with
/// an [`InvalidHandleError`].
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FileHandle {
    handle: RawHandle,
}

impl FileHandle {
    /// Create a handle which refers to no file.
    pub fn new() -> Self {
        FileHandle::default()
    }

    /// Open an existing container for reading.
    pub fn open_read<P: AsRef<Path>>(path: P) -> Result<FileHandle, OpenError> {
        let path = path.as_ref();
        native::read(path)
            .map(|handle| FileHandle { handle })
            .map_err(|failure| FileHandle::open_error(path, failure))
    }

    /// Open an existing container for reading and writing.
    pub fn open_modify<P: AsRef<Path>>(path: P) -> Result<FileHandle, OpenError> {
        FileHandle::open_modify_with_flags(path, 0)
    }

    /// Open an existing container for reading and writing. The flags are passed to the native
    /// library without interpretation.
    pub fn open_modify_with_flags<P: AsRef<Path>>(
        path: P,
        flags: u32,
    ) -> Result<FileHandle, OpenError> {
        let path = path.as_ref();
        native::modify(path, flags)
            .map(|handle| FileHandle { handle })
            .map_err(|failure| FileHandle::open_error(path, failure))
    }

    /// Create a new container, overwriting an existing file. The flags are passed to the
    /// native library without interpretation.
    pub fn create<P: AsRef<Path>>(path: P, flags: u32) -> Result<FileHandle, CreateError> {
        let path = path.as_ref();
        native::create(path, flags)
            .map(|handle| FileHandle { handle })
            .map_err(|failure| match failure {
                Failure::Io(error) => CreateError::Inaccessible(path.to_path_buf(), error.kind()),
                Failure::Native(error) => CreateError::Native(path.to_path_buf(), error),
            })
    }

    fn open_error(path: &Path, failure: Failure) -> OpenError {
        match failure {
            Failure::Io(error) => OpenError::Inaccessible(path.to_path_buf(), error.kind()),
            Failure::Native(error) => OpenError::InvalidContainer(path.to_path_buf(), error),
        }
    }

    /// Checks whether the handle refers to an open file. Never calls into native code.
    pub fn is_valid(&self) -> bool {
        self.handle.is_valid()
    }

    /// The underlying native handle. Its validity can be queried without native calls.
    pub fn raw(&self) -> RawHandle {
        self.handle
    }

    fn require(&self, operation: Operation) -> Result<RawHandle, InvalidHandleError> {
        match self.is_valid() {
            true => Ok(self.handle),
            false => Err(InvalidHandleError(operation)),
        }
    }

    /// The file name as recorded by the native library.
    pub fn get_filename(&self) -> Result<String, InvalidHandleError> {
        let handle = self.require(Operation::GetFilename)?;
        native::filename(handle).map_err(|_| InvalidHandleError(Operation::GetFilename))
    }

    /// Close the file. Closing an invalid handle is a no-op.
    pub fn close(&mut self) {
        self.close_with_flags(0)
    }

    /// Close the file, passing the flags to the native library without interpretation.
    pub fn close_with_flags(&mut self, flags: u32) {
        if !self.is_valid() {
            return;
        }
        let handle = std::mem::replace(&mut self.handle, RawHandle::INVALID);
        native::close(handle, flags);
    }

    /// Dump the box structure of the file as text.
    pub fn dump(&self, include_implicit_values: bool) -> Result<String, DumpError> {
        let mut buffer = Vec::new();
        self.dump_to(&mut buffer, include_implicit_values)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// Dump the box structure of the file into a sink.
    pub fn dump_to<W: Write>(
        &self,
        mut sink: W,
        include_implicit_values: bool,
    ) -> Result<(), DumpError> {
        let handle = self.require(Operation::Dump)?;
        native::dump(handle, include_implicit_values, &mut sink).map_err(|failure| match failure {
            Failure::Io(error) => DumpError::SinkError(error.kind()),
            Failure::Native(error) => DumpError::Native(handle, error),
        })
    }

    /// Describe the whole file (`None` or track id 0) or a single track.
    ///
    /// A track id which does not exist is not an error but yields `Ok(None)`.
    pub fn info(&self, track_id: Option<u32>) -> Result<Option<String>, DumpError> {
        let handle = self.require(Operation::Info)?;
        native::info(handle, track_id).map_err(|failure| match failure {
            Failure::Io(error) => DumpError::SinkError(error.kind()),
            Failure::Native(error) => DumpError::Native(handle, error),
        })
    }

    /// Enter a scope which closes the handle when it ends, on every exit path.
    pub fn enter(&mut self) -> Scope<'_> {
        Scope(self)
    }
}

impl Drop for FileHandle {
    fn drop(&mut self) {
        self.close();
    }
}

impl Display for FileHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self.is_valid() {
            true => f.write_str("<MP4FileHandle (valid)>"),
            false => f.write_str("<MP4FileHandle (closed)>"),
        }
    }
}

/// A scoped acquisition of a [`FileHandle`], closing it once the scope is dropped.
#[derive(Debug)]
pub struct Scope<'a>(&'a mut FileHandle);

impl Deref for Scope<'_> {
    type Target = FileHandle;

    fn deref(&self) -> &FileHandle {
        self.0
    }
}

impl DerefMut for Scope<'_> {
    fn deref_mut(&mut self) -> &mut FileHandle {
        self.0
    }
}

impl Drop for Scope<'_> {
    fn drop(&mut self) {
        self.0.close();
    }
}

/// Run `body` with the open handle and close it afterwards, even if `body` fails or panics.
pub fn scoped<T, C: FnOnce(&mut FileHandle) -> T>(handle: &mut FileHandle, body: C) -> T {
    let mut scope = handle.enter();
    body(&mut *scope)
}

/// Open the path for reading, describe it and close it again.
pub fn file_info<P: AsRef<Path>>(
    path: P,
    track_id: Option<u32>,
) -> Result<Option<String>, OpenError> {
    let path = path.as_ref();
    let mut handle = FileHandle::open_read(path)?;
    match scoped(&mut handle, |handle| handle.info(track_id)) {
        Ok(info) => Ok(info),
        Err(DumpError::Native(_, error)) => {
            Err(OpenError::InvalidContainer(path.to_path_buf(), error))
        }
        Err(_) => Err(OpenError::InvalidContainer(
            path.to_path_buf(),
            NativeError::unknown_handle(),
        )),
    }
}

/// Set the verbosity of the native library for the whole process.
pub fn set_log_level(level: LogLevel) {
    native::log_set_level(level)
}

/// The current verbosity of the native library.
pub fn get_log_level() -> LogLevel {
    native::log_get_level()
}

#[cfg(test)]
mod tests {
    use crate::errors::{InvalidHandleError, Operation};
    use crate::native;
    use crate::util::RawHandle;

    use super::FileHandle;

    #[test]
    fn test_default_is_invalid() {
        let mut handle = FileHandle::new();
        assert!(!handle.is_valid());
        assert_eq!(handle.raw(), RawHandle::INVALID);
        assert_eq!(
            handle.get_filename(),
            Err(InvalidHandleError(Operation::GetFilename))
        );
        handle.close();
        handle.close_with_flags(1);
        assert!(!handle.is_valid());
        assert_eq!(handle.to_string(), "<MP4FileHandle (closed)>");
    }

    #[test]
    fn test_create_and_reopen() {
        let directory = tempfile::TempDir::new().expect("Unable to create temporary directory");
        let path = directory.path().join("created.mp4");

        let mut handle = FileHandle::create(&path, 0).expect("Creating file failed");
        assert!(handle.is_valid());
        assert_eq!(handle.to_string(), "<MP4FileHandle (valid)>");
        handle.close();
        assert!(path.is_file());

        let handle = FileHandle::open_read(&path).expect("Reopening created file failed");
        assert_eq!(
            handle.info(None).expect("Info failed").as_deref(),
            Some("Track\tType\tInfo\n")
        );
        assert_eq!(handle.info(Some(1)).expect("Info failed"), None);
    }

    #[test]
    fn test_native_handle_closed_once() {
        let directory = tempfile::TempDir::new().expect("Unable to create temporary directory");
        let path = directory.path().join("created.mp4");

        // Dropping an open handle closes it.
        let raw = {
            let handle = FileHandle::create(&path, 0).expect("Creating file failed");
            assert!(native::is_open(handle.raw()));
            handle.raw()
        };
        assert!(!native::is_open(raw));

        // Dropping after an explicit close does not reach the native library again.
        let mut handle = FileHandle::open_read(&path).expect("Reopening created file failed");
        let raw = handle.raw();
        handle.close();
        assert!(!native::is_open(raw));
        assert_eq!(handle.raw(), RawHandle::INVALID);
        drop(handle);

        // Scopes close exactly once as well.
        let mut handle = FileHandle::open_modify(&path).expect("Reopening created file failed");
        let raw = handle.raw();
        {
            let mut scope = handle.enter();
            scope.close();
        }
        assert!(!native::is_open(raw));
        assert!(!handle.is_valid());
    }
}
