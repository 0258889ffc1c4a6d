//! Filesystem access for the static file handler.
//!
//! Both calls are synchronous. Only socket I/O is non-blocking in this
//! server; a slow disk stalls the reactor thread for the duration of the
//! call.

use std::fs::File;
use std::io;
use std::path::Path;

/// Size in bytes of the regular file at `path`, or `None` if there is no
/// such file.
pub fn file_length(path: &Path) -> Option<u64> {
    std::fs::metadata(path)
        .ok()
        .filter(|meta| meta.is_file())
        .map(|meta| meta.len())
}

/// Opens `path` for reading.
pub fn open_for_read(path: &Path) -> io::Result<File> {
    File::open(path)
}
