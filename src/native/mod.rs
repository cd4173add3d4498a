//! The native MP4 layer. Files are addressed by raw handles stored in a process-global table,
//! the container format itself is handled entirely by the `mp4` crate.
#[macro_use]
mod logging;
mod report;

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Error as IoError, Write};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use mp4::{FtypBox, Mp4Config, Mp4Reader, Mp4Writer};

use crate::errors::NativeError;
use crate::util::RawHandle;

pub use self::logging::LogLevel;

mod constants {
    use mp4::FourCC;

    pub const MAJOR_BRAND: FourCC = FourCC { value: *b"isom" };
    pub const MINOR_VERSION: u32 = 512;
    pub const COMPATIBLE_BRANDS: [FourCC; 3] = [
        FourCC { value: *b"isom" },
        FourCC { value: *b"iso2" },
        FourCC { value: *b"mp41" },
    ];
    pub const TIMESCALE: u32 = 1000;
}

/// The failure of a native call.
#[derive(Debug)]
pub(crate) enum Failure {
    /// The file or the output destination raised an error.
    Io(IoError),
    /// The native library itself failed.
    Native(NativeError),
}

impl From<IoError> for Failure {
    fn from(error: IoError) -> Self {
        Failure::Io(error)
    }
}

impl From<mp4::Error> for Failure {
    fn from(error: mp4::Error) -> Self {
        Failure::Native(error.into())
    }
}

enum Access {
    Read(Mp4Reader<BufReader<File>>),
    Modify(Mp4Reader<BufReader<File>>),
    Create(Option<Mp4Writer<BufWriter<File>>>, FtypBox),
}

struct NativeFile {
    filename: String,
    flags: u32,
    access: Access,
}

struct Table {
    next: AtomicU64,
    files: Mutex<HashMap<RawHandle, Arc<Mutex<NativeFile>>>>,
}

fn table() -> &'static Table {
    static TABLE: OnceLock<Table> = OnceLock::new();
    TABLE.get_or_init(|| Table {
        next: AtomicU64::new(1),
        files: Mutex::new(HashMap::new()),
    })
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn register(file: NativeFile) -> RawHandle {
    let table = table();
    let handle = RawHandle(table.next.fetch_add(1, Ordering::Relaxed));
    lock(&table.files).insert(handle, Arc::new(Mutex::new(file)));
    handle
}

fn lookup(handle: RawHandle) -> Result<Arc<Mutex<NativeFile>>, Failure> {
    lock(&table().files)
        .get(&handle)
        .cloned()
        .ok_or_else(|| Failure::Native(NativeError::unknown_handle()))
}

fn parse(file: File) -> Result<Mp4Reader<BufReader<File>>, Failure> {
    let size = file.metadata()?.len();
    Ok(Mp4Reader::read_header(BufReader::new(file), size)?)
}

/// Open an existing container read-only.
pub(crate) fn read(path: &Path) -> Result<RawHandle, Failure> {
    let reader = parse(File::open(path)?)?;
    let filename = path.to_string_lossy().into_owned();
    native_log!(
        LogLevel::Verbose1,
        "{}: {} track(s), major brand '{}'",
        filename,
        reader.tracks().len(),
        reader.major_brand()
    );

    let handle = register(NativeFile {
        filename,
        flags: 0,
        access: Access::Read(reader),
    });
    native_log!(LogLevel::Info, "{}: opened '{}' for reading", handle, path.display());
    Ok(handle)
}

/// Open an existing container for reading and writing.
pub(crate) fn modify(path: &Path, flags: u32) -> Result<RawHandle, Failure> {
    let file = OpenOptions::new().read(true).write(true).open(path)?;
    let reader = parse(file)?;

    let handle = register(NativeFile {
        filename: path.to_string_lossy().into_owned(),
        flags,
        access: Access::Modify(reader),
    });
    native_log!(
        LogLevel::Info,
        "{}: opened '{}' for modification (flags {:#x})",
        handle,
        path.display(),
        flags
    );
    Ok(handle)
}

/// Create a new container, truncating an existing file.
pub(crate) fn create(path: &Path, flags: u32) -> Result<RawHandle, Failure> {
    let file = File::create(path)?;
    let config = Mp4Config {
        major_brand: constants::MAJOR_BRAND,
        minor_version: constants::MINOR_VERSION,
        compatible_brands: constants::COMPATIBLE_BRANDS.to_vec(),
        timescale: constants::TIMESCALE,
    };
    let ftyp = FtypBox {
        major_brand: constants::MAJOR_BRAND,
        minor_version: constants::MINOR_VERSION,
        compatible_brands: config.compatible_brands.clone(),
    };
    let writer = Mp4Writer::write_start(BufWriter::new(file), &config)?;

    let handle = register(NativeFile {
        filename: path.to_string_lossy().into_owned(),
        flags,
        access: Access::Create(Some(writer), ftyp),
    });
    native_log!(
        LogLevel::Info,
        "{}: created '{}' (flags {:#x})",
        handle,
        path.display(),
        flags
    );
    Ok(handle)
}

/// Close a handle. Returns false if the handle is not known, which is not an error.
pub(crate) fn close(handle: RawHandle, flags: u32) -> bool {
    let entry = match lock(&table().files).remove(&handle) {
        Some(entry) => entry,
        None => {
            native_log!(LogLevel::Warning, "{}: close of unknown handle ignored", handle);
            return false;
        }
    };

    let mut guard = lock(&entry);
    let file = &mut *guard;
    if let Access::Create(writer, _) = &mut file.access {
        if let Some(writer) = writer.take() {
            if let Err(error) = finish(writer) {
                native_log!(
                    LogLevel::Error,
                    "{}: finishing '{}' failed: {:?}",
                    handle,
                    file.filename,
                    error
                );
            }
        }
    }
    native_log!(
        LogLevel::Info,
        "{}: closed '{}' (open flags {:#x}, close flags {:#x})",
        handle,
        file.filename,
        file.flags,
        flags
    );
    true
}

fn finish(mut writer: Mp4Writer<BufWriter<File>>) -> Result<(), Failure> {
    writer.write_end()?;
    let mut file = writer.into_writer();
    file.flush()?;
    Ok(())
}

/// Whether the table still holds an entry for the handle.
#[cfg(test)]
pub(crate) fn is_open(handle: RawHandle) -> bool {
    lock(&table().files).contains_key(&handle)
}

/// The file name as recorded when the handle was opened.
pub(crate) fn filename(handle: RawHandle) -> Result<String, Failure> {
    let file = lookup(handle)?;
    let file = lock(&file);
    Ok(file.filename.clone())
}

/// Write the box structure into a sink.
pub(crate) fn dump(
    handle: RawHandle,
    include_implicit: bool,
    sink: &mut dyn Write,
) -> Result<(), Failure> {
    let file = lookup(handle)?;
    let file = lock(&file);
    native_log!(
        LogLevel::Verbose2,
        "{}: dumping '{}' (implicit values: {})",
        handle,
        file.filename,
        include_implicit
    );
    match &file.access {
        Access::Read(reader) | Access::Modify(reader) => {
            report::dump_reader(reader, include_implicit, sink)
        }
        Access::Create(_, ftyp) => report::dump_created(ftyp, sink),
    }
}

/// Describe the whole file or a single track. Unknown tracks yield `None`.
pub(crate) fn info(handle: RawHandle, track_id: Option<u32>) -> Result<Option<String>, Failure> {
    let file = lookup(handle)?;
    let file = lock(&file);
    let info = match &file.access {
        Access::Read(reader) | Access::Modify(reader) => report::info(reader, track_id),
        Access::Create(..) => report::info_empty(track_id),
    };
    if info.is_none() {
        native_log!(
            LogLevel::Verbose1,
            "{}: no track {:?} in '{}'",
            handle,
            track_id,
            file.filename
        );
    }
    Ok(info)
}

pub(crate) fn log_set_level(level: LogLevel) {
    logging::set_level(level);
}

pub(crate) fn log_get_level() -> LogLevel {
    logging::level()
}

#[cfg(test)]
mod tests {
    use super::{close, filename, is_open, RawHandle};

    #[test]
    fn test_unknown_handles() {
        let handle = RawHandle(u64::MAX);
        assert!(!is_open(handle));
        assert!(!close(handle, 0));
        assert!(filename(handle).is_err());
    }

    #[test]
    fn test_create_registers_fresh_handles() {
        let directory = tempfile::TempDir::new().expect("Unable to create temporary directory");
        let first = super::create(&directory.path().join("first.mp4"), 0).expect("Create failed");
        let second = super::create(&directory.path().join("second.mp4"), 0).expect("Create failed");

        assert!(first.is_valid());
        assert!(second.is_valid());
        assert_ne!(first, second);
        assert!(is_open(first) && is_open(second));

        assert!(close(first, 0));
        assert!(!is_open(first));
        assert!(!close(first, 0));
        assert!(close(second, 0));
    }
}
