//! Readable / Writable / Seekable / Closable
//!
//! Each trait covers one capability of a buffered file handle. The
//! `readable`/`writable` queries report whether the handle's open mode grants
//! the capability; the operations themselves fail with
//! [`FsError::NotReadable`](crate::error::FsError::NotReadable) or
//! [`FsError::NotWritable`](crate::error::FsError::NotWritable) otherwise.

use crate::error::Result;

/// Reference point for [`Seekable::seek`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whence {
    /// Absolute offset from the start; must be non-negative
    Start,
    /// Relative to the current position; clamped at 0
    Current,
    /// Relative to the end; must be zero or negative, clamped at 0
    End,
}

/// Reading capability
pub trait Readable {
    /// Whether the open mode allows reading
    fn readable(&self) -> bool;

    /// Read up to `size` bytes, or everything left when `size` is `None`
    ///
    /// Returns fewer bytes at end of file and an empty vector once the
    /// position is at or past the end.
    ///
    /// # Errors
    ///
    /// Fails if the handle is closed or not readable.
    fn read(&mut self, size: Option<usize>) -> Result<Vec<u8>>;

    /// Read one line including its trailing `\n`, stopping after `limit`
    /// bytes if given
    ///
    /// # Errors
    ///
    /// Fails if the handle is closed or not readable.
    fn read_line(&mut self, limit: Option<usize>) -> Result<Vec<u8>>;

    /// Read all remaining bytes
    ///
    /// # Errors
    ///
    /// Fails if the handle is closed or not readable.
    fn read_to_end(&mut self) -> Result<Vec<u8>> {
        self.read(None)
    }
}

/// Writing capability
pub trait Writable {
    /// Whether the open mode allows writing
    fn writable(&self) -> bool;

    /// Write `data` at the current position and return the bytes written
    ///
    /// # Errors
    ///
    /// Fails if the handle is closed or not writable.
    fn write(&mut self, data: &[u8]) -> Result<usize>;

    /// Resize the content to `size` bytes (current length when `None`)
    ///
    /// Growing pads with zero bytes. Returns the resulting size.
    ///
    /// # Errors
    ///
    /// Fails if the handle is closed.
    fn truncate(&mut self, size: Option<u64>) -> Result<u64>;

    /// Push buffered content to the remote
    ///
    /// # Errors
    ///
    /// Fails if the remote rejects the upload.
    fn flush(&mut self) -> Result<()>;
}

/// Cursor positioning capability
pub trait Seekable {
    /// Move the cursor and return the new absolute position
    ///
    /// # Errors
    ///
    /// Fails if the handle is closed, on a negative [`Whence::Start`] offset
    /// or a positive [`Whence::End`] offset.
    fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64>;

    /// Current absolute position
    fn tell(&self) -> u64;

    /// Always `true` for buffered handles
    fn seekable(&self) -> bool {
        true
    }
}

/// Release capability
pub trait Closable {
    /// Flush and release the handle; later calls are no-ops
    ///
    /// # Errors
    ///
    /// Fails if the final flush fails. The handle is closed regardless.
    fn close(&mut self) -> Result<()>;

    fn closed(&self) -> bool;
}
