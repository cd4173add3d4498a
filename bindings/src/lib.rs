#![allow(clippy::missing_safety_doc)] // Well, using C-pointers *is* unsafe...

extern crate static_vcruntime;

use std::convert::TryFrom;
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int, c_uint};
use std::ptr::{null, null_mut};

use mp4_handle::{
    errors::Error, get_log_level, set_log_level, FileHandle as RawFileHandle, LogLevel,
};

struct Environment(*mut *mut Status);

impl From<*mut *mut Status> for Environment {
    fn from(value: *mut *mut Status) -> Self {
        Self(value)
    }
}

impl Environment {
    pub fn execute<T, C: FnOnce() -> Result<T, String>>(self, body: C) -> *mut T {
        match body() {
            Ok(value) => Box::into_raw(Box::new(value)),
            Err(error) => {
                self.fail(&error);
                null_mut()
            }
        }
    }

    /// Like `execute`, but hands out an owned C string. `Ok(None)` returns nullptr without status.
    pub fn execute_text<C: FnOnce() -> Result<Option<String>, String>>(
        self,
        body: C,
    ) -> *mut c_char {
        let text = body().and_then(|text| {
            text.map(|text| {
                CString::new(text).map_err(|_| String::from("Result contains a NUL character"))
            })
            .transpose()
        });
        match text {
            Ok(Some(text)) => text.into_raw(),
            Ok(None) => null_mut(),
            Err(error) => {
                self.fail(&error);
                null_mut()
            }
        }
    }

    fn fail(&self, error: &str) {
        if !self.0.is_null() {
            let status = Environment::create_status(error);
            unsafe {
                std::ptr::write(self.0, status);
            }
        }
    }

    pub fn create_status<T: AsRef<str>>(description: T) -> *mut Status {
        let message = CString::new(description.as_ref().replace('\0', ""))
            .unwrap_or_else(|_| CString::default());
        Box::into_raw(Box::new(Status(message)))
    }

    pub fn parse_str<'a>(c_string: *const c_char) -> Result<&'a str, String> {
        (!c_string.is_null())
            .then(|| unsafe { CStr::from_ptr(c_string) })
            .ok_or_else(|| String::from("Path not specified"))
            .and_then(|raw_str| {
                raw_str
                    .to_str()
                    .map_err(|_| String::from("Path contains invalid UTF8"))
            })
    }

    pub fn handle<'a>(file_handle: *const FileHandle) -> Result<&'a RawFileHandle, String> {
        unsafe { file_handle.as_ref() }
            .map(|file_handle| &file_handle.0)
            .ok_or_else(|| String::from("File handle not specified"))
    }

    pub fn destroy<T>(pointer: *mut T) {
        if pointer.is_null() {
            return;
        }
        unsafe {
            drop(Box::from_raw(pointer));
        }
    }
}

/// The status of the operation.
pub struct Status(CString);

/// The handle to an MP4 file.
pub struct FileHandle(RawFileHandle);

/// Open an existing MP4 file for reading.
///
/// @param path The path to the MP4 file.
///
/// @param status Contains the error code of the failure if and only if the return value is nullptr. Setting this value to nullptr is safe and will not save the error code.
///
/// @return A handle to the file or nullptr on failure.
#[no_mangle]
pub unsafe extern "C" fn OpenRead(
    path: *const c_char,
    status: *mut *mut Status,
) -> *mut FileHandle {
    Environment::from(status).execute(|| {
        let path = Environment::parse_str(path)?;
        RawFileHandle::open_read(path)
            .map(FileHandle)
            .map_err(|error| error.error_message())
    })
}

/// Open an existing MP4 file for reading and writing.
///
/// @param path The path to the MP4 file.
///
/// @param flags Flags passed to the native library without interpretation. Use 0 by default.
///
/// @param status Contains the error code of the failure if and only if the return value is nullptr. Setting this value to nullptr is safe and will not save the error code.
///
/// @return A handle to the file or nullptr on failure.
#[no_mangle]
pub unsafe extern "C" fn OpenModify(
    path: *const c_char,
    flags: c_uint,
    status: *mut *mut Status,
) -> *mut FileHandle {
    Environment::from(status).execute(|| {
        let path = Environment::parse_str(path)?;
        RawFileHandle::open_modify_with_flags(path, flags)
            .map(FileHandle)
            .map_err(|error| error.error_message())
    })
}

/// Create a new MP4 file, overwriting an existing one.
///
/// @param path The path of the new MP4 file.
///
/// @param flags Flags passed to the native library without interpretation. Use 0 by default.
///
/// @param status Contains the error code of the failure if and only if the return value is nullptr. Setting this value to nullptr is safe and will not save the error code.
///
/// @return A handle to the file or nullptr on failure.
#[no_mangle]
pub unsafe extern "C" fn Create(
    path: *const c_char,
    flags: c_uint,
    status: *mut *mut Status,
) -> *mut FileHandle {
    Environment::from(status).execute(|| {
        let path = Environment::parse_str(path)?;
        RawFileHandle::create(path, flags)
            .map(FileHandle)
            .map_err(|error| error.error_message())
    })
}

/// Create a handle which refers to no file.
///
/// @return A handle which is not valid. It still needs to be destroyed.
#[no_mangle]
pub extern "C" fn NewFileHandle() -> *mut FileHandle {
    Box::into_raw(Box::new(FileHandle(RawFileHandle::new())))
}

/// Close the file of a handle. Closing an invalid handle is a safe no-op.
///
/// @param file_handle The file handle. Passing nullptr is a safe no-op.
///
/// @param flags Flags passed to the native library without interpretation. Use 0 by default.
#[no_mangle]
pub unsafe extern "C" fn Close(file_handle: *mut FileHandle, flags: c_uint) {
    if let Some(file_handle) = file_handle.as_mut() {
        file_handle.0.close_with_flags(flags);
    }
}

/// Check whether a handle refers to an open file.
///
/// @param file_handle The file handle.
///
/// @return 1 if the handle is open, 0 otherwise (including nullptr).
#[no_mangle]
pub unsafe extern "C" fn IsValid(file_handle: *const FileHandle) -> c_int {
    match file_handle.as_ref() {
        Some(file_handle) if file_handle.0.is_valid() => 1,
        _ => 0,
    }
}

/// Return the file name recorded by the native library.
///
/// @param file_handle The file handle.
///
/// @param status Contains the error code of the failure if and only if the return value is nullptr. Setting this value to nullptr is safe and will not save the error code.
///
/// @return The file name, which must be released with DestroyString, or nullptr on failure.
#[no_mangle]
pub unsafe extern "C" fn GetFilename(
    file_handle: *const FileHandle,
    status: *mut *mut Status,
) -> *mut c_char {
    Environment::from(status).execute_text(|| {
        Environment::handle(file_handle)?
            .get_filename()
            .map(Some)
            .map_err(|error| error.error_message())
    })
}

/// Dump the box structure of a file as text.
///
/// @param file_handle The file handle.
///
/// @param include_implicit_values Non-zero to include the sample tables.
///
/// @param status Contains the error code of the failure if and only if the return value is nullptr. Setting this value to nullptr is safe and will not save the error code.
///
/// @return The dump, which must be released with DestroyString, or nullptr on failure.
#[no_mangle]
pub unsafe extern "C" fn Dump(
    file_handle: *const FileHandle,
    include_implicit_values: c_int,
    status: *mut *mut Status,
) -> *mut c_char {
    Environment::from(status).execute_text(|| {
        Environment::handle(file_handle)?
            .dump(include_implicit_values != 0)
            .map(Some)
            .map_err(|error| error.error_message())
    })
}

/// Describe a file or one of its tracks.
///
/// @param file_handle The file handle.
///
/// @param track_id The track of interest or 0 for the whole file.
///
/// @param status Contains the error code of the failure if and only if the return value is nullptr. Setting this value to nullptr is safe and will not save the error code.
///
/// @return The description, which must be released with DestroyString. Returns nullptr without setting the status if the track does not exist.
#[no_mangle]
pub unsafe extern "C" fn Info(
    file_handle: *const FileHandle,
    track_id: c_uint,
    status: *mut *mut Status,
) -> *mut c_char {
    Environment::from(status).execute_text(|| {
        Environment::handle(file_handle)?
            .info(Some(track_id))
            .map_err(|error| error.error_message())
    })
}

/// Set the verbosity of the native library for the whole process.
///
/// @param level The level from 0 (MP4_LOG_NONE) to 7 (MP4_LOG_VERBOSE4).
///
/// @return 1 if the level was set, 0 if it is out of range.
#[no_mangle]
pub extern "C" fn SetLogLevel(level: c_int) -> c_int {
    match LogLevel::try_from(level) {
        Ok(level) => {
            set_log_level(level);
            1
        }
        Err(_) => 0,
    }
}

/// Return the verbosity of the native library.
///
/// @return The level from 0 (MP4_LOG_NONE) to 7 (MP4_LOG_VERBOSE4).
#[no_mangle]
pub extern "C" fn GetLogLevel() -> c_int {
    get_log_level() as c_int
}

/// Destroy a file handle, closing its file if still open.
///
/// @param file_handle The file handle. Passing nullptr is a safe no-op.
#[no_mangle]
pub unsafe extern "C" fn DestroyFileHandle(file_handle: *mut FileHandle) {
    Environment::destroy(file_handle)
}

/// Destroy a status.
///
/// @param status The status. Passing nullptr is a safe no-op.
#[no_mangle]
pub unsafe extern "C" fn DestroyStatus(status: *mut Status) {
    Environment::destroy(status)
}

/// Destroy a string returned by this library.
///
/// @param text The string. Passing nullptr is a safe no-op.
#[no_mangle]
pub unsafe extern "C" fn DestroyString(text: *mut c_char) {
    if !text.is_null() {
        drop(CString::from_raw(text));
    }
}

/// Return the error message associated with a status.
///
/// @param status The status of interest.
///
/// @return A human-readable description of the failure.
#[no_mangle]
pub unsafe extern "C" fn GetMessage(status: *const Status) -> *const c_char {
    match status.as_ref() {
        Some(value) => value.0.as_ptr(),
        None => null(),
    }
}
