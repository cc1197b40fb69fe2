//! Buffered random-access handle over a whole-object remote resource
//!
//! The remote store can only download or upload complete objects, so a
//! [`RemoteFile`] downloads the resource once when opened, serves every
//! read/write/seek/truncate from an owned in-memory buffer, and uploads the
//! whole buffer on flush or close.
//!
//! # Example
//!
//! ```rust,ignore
//! use webdavfs::traits::Whence;
//!
//! let mut file = fs.open_file("/notes.txt", "r+b")?;
//! file.seek(-4, Whence::End)?;
//! file.write(b"done")?;
//! file.close()?; // uploads the full content
//! ```

use crate::error::{FsError, Op, Result};
use crate::mode::OpenMode;
use crate::protocol::{RemoteClient, RemoteError};
use crate::traits::{Closable, Readable, Seekable, Whence, Writable};
use std::fmt;
use std::io;
use std::sync::Arc;
use tracing::{debug, warn};

/// In-memory view of one remote resource for a single open/close lifetime
///
/// The handle holds no connection, only the shared client and the remote
/// path needed to re-issue the upload. Positions past the end are allowed
/// (as with local files); a write there fills the gap with zero bytes.
pub struct RemoteFile<C: RemoteClient> {
    client: Arc<C>,
    /// Path as seen by the caller
    path: String,
    /// Path handed to the client (root prefix applied)
    remote_path: String,
    mode: OpenMode,
    buffer: Vec<u8>,
    position: u64,
    closed: bool,
}

impl<C: RemoteClient> RemoteFile<C> {
    /// Open `path` and materialize its content
    ///
    /// Truncating modes (`w`, `x`) start from an empty buffer without a
    /// download. Otherwise the whole object is downloaded; a missing object
    /// is an error only when the mode requires an existing file (`r`, `r+`)
    /// and an empty buffer otherwise. Append mode starts at the end.
    ///
    /// # Errors
    ///
    /// - [`FsError::InvalidMode`] for an illegal mode string
    /// - [`FsError::ResourceNotFound`] for a missing file in a read mode
    /// - [`FsError::Transport`] for any other remote failure
    pub fn open(
        client: Arc<C>,
        path: impl Into<String>,
        remote_path: impl Into<String>,
        mode: &str,
    ) -> Result<Self> {
        let path = path.into();
        let remote_path = remote_path.into();
        let mode = OpenMode::parse(mode)?;

        let buffer = if mode.truncate() {
            Vec::new()
        } else {
            let mut sink = Vec::new();
            match client.download(&remote_path, &mut sink) {
                Ok(_) => sink,
                Err(RemoteError::NotFound(_) | RemoteError::ParentNotFound(_)) => {
                    if mode.requires_existing() {
                        return Err(FsError::not_found(path, Op::Open));
                    }
                    Vec::new()
                }
                Err(err) => return Err(FsError::from_remote(err, &path, Op::Open)),
            }
        };

        let position = if mode.appending() {
            buffer.len() as u64
        } else {
            0
        };

        debug!(
            "Opened {} ({}) via {}: {} bytes",
            path,
            mode,
            client.name(),
            buffer.len()
        );

        Ok(Self {
            client,
            path,
            remote_path,
            mode,
            buffer,
            position,
            closed: false,
        })
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn mode(&self) -> &OpenMode {
        &self.mode
    }

    /// Current buffered size in bytes
    #[must_use]
    pub fn len(&self) -> u64 {
        self.buffer.len() as u64
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    fn check_open(&self, op: Op) -> Result<()> {
        if self.closed {
            return Err(FsError::ClosedHandle {
                path: self.path.clone(),
                op,
            });
        }
        Ok(())
    }

    fn check_readable(&self) -> Result<()> {
        self.check_open(Op::Read)?;
        if !self.mode.reading() {
            return Err(FsError::NotReadable {
                path: self.path.clone(),
            });
        }
        Ok(())
    }

    fn check_writable(&self, op: Op) -> Result<()> {
        self.check_open(op)?;
        if !self.mode.writing() {
            return Err(FsError::NotWritable {
                path: self.path.clone(),
            });
        }
        Ok(())
    }

    fn invalid_argument(&self, op: Op, reason: String) -> FsError {
        FsError::InvalidArgument {
            path: self.path.clone(),
            op,
            reason,
        }
    }

    /// Zero-extend the buffer to `new_len`, failing instead of aborting
    /// when the allocation is impossible
    fn grow_to(&mut self, new_len: usize, op: Op) -> Result<()> {
        let additional = new_len.saturating_sub(self.buffer.len());
        if let Err(e) = self.buffer.try_reserve(additional) {
            return Err(self.invalid_argument(op, format!("cannot grow to {new_len} bytes: {e}")));
        }
        self.buffer.resize(new_len, 0);
        Ok(())
    }

    /// Read up to `size` bytes from the cursor, or the rest when `None`
    ///
    /// # Errors
    ///
    /// [`FsError::ClosedHandle`] or [`FsError::NotReadable`].
    pub fn read(&mut self, size: Option<usize>) -> Result<Vec<u8>> {
        self.check_readable()?;
        let len = self.buffer.len();
        let start = usize::try_from(self.position).unwrap_or(usize::MAX);
        if start >= len {
            return Ok(Vec::new());
        }
        let end = size.map_or(len, |n| start.saturating_add(n).min(len));
        let chunk = self.buffer[start..end].to_vec();
        self.position = end as u64;
        Ok(chunk)
    }

    /// Read through the next `\n` (inclusive), at most `limit` bytes
    ///
    /// # Errors
    ///
    /// [`FsError::ClosedHandle`] or [`FsError::NotReadable`].
    pub fn read_line(&mut self, limit: Option<usize>) -> Result<Vec<u8>> {
        self.check_readable()?;
        let len = self.buffer.len();
        let start = usize::try_from(self.position).unwrap_or(usize::MAX);
        if start >= len {
            return Ok(Vec::new());
        }
        let mut end = self.buffer[start..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(len, |idx| start + idx + 1);
        if let Some(limit) = limit {
            end = end.min(start.saturating_add(limit));
        }
        let line = self.buffer[start..end].to_vec();
        self.position = end as u64;
        Ok(line)
    }

    /// Iterate over the remaining lines
    pub fn lines(&mut self) -> Lines<'_, C> {
        Lines {
            file: self,
            done: false,
        }
    }

    /// Write `data` at the cursor
    ///
    /// Overlapping content is overwritten in place and the buffer grows as
    /// needed. In append mode the data always lands at the end.
    ///
    /// # Errors
    ///
    /// [`FsError::ClosedHandle`], [`FsError::NotWritable`], or
    /// [`FsError::InvalidArgument`] when the cursor is so far past the end
    /// that the buffer cannot grow to reach it.
    pub fn write(&mut self, data: &[u8]) -> Result<usize> {
        self.check_writable(Op::Write)?;
        if self.mode.appending() {
            self.position = self.buffer.len() as u64;
        }
        let end = usize::try_from(self.position)
            .ok()
            .and_then(|start| start.checked_add(data.len()))
            .ok_or_else(|| {
                self.invalid_argument(Op::Write, format!("position {} out of range", self.position))
            })?;
        let start = end - data.len();
        if end > self.buffer.len() {
            self.grow_to(end, Op::Write)?;
        }
        self.buffer[start..end].copy_from_slice(data);
        self.position = end as u64;
        Ok(data.len())
    }

    /// Move the cursor
    ///
    /// The cursor may land past the end of the buffer, so `tell()` can
    /// exceed `len()` while the handle is idle. Reads there return nothing;
    /// the next write zero-fills the gap and the cursor is back within the
    /// content afterwards. A [`Whence::Current`] move saturates at both ends
    /// of the `u64` range.
    ///
    /// # Errors
    ///
    /// [`FsError::ClosedHandle`], or [`FsError::InvalidArgument`] for a
    /// negative offset from the start or a positive offset from the end.
    pub fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64> {
        self.check_open(Op::Seek)?;
        self.position = match whence {
            Whence::Start => u64::try_from(offset).map_err(|_| {
                self.invalid_argument(Op::Seek, format!("negative seek position {offset}"))
            })?,
            Whence::Current => offset_from(self.position, offset),
            Whence::End => {
                if offset > 0 {
                    return Err(self.invalid_argument(
                        Op::Seek,
                        format!("positive seek position {offset}"),
                    ));
                }
                offset_from(self.buffer.len() as u64, offset)
            }
        };
        Ok(self.position)
    }

    #[must_use]
    pub fn tell(&self) -> u64 {
        self.position
    }

    /// Resize the content, zero-padding on growth
    ///
    /// The cursor is clamped to the new size.
    ///
    /// # Errors
    ///
    /// [`FsError::ClosedHandle`], [`FsError::NotWritable`], or
    /// [`FsError::InvalidArgument`] for a size the buffer cannot hold.
    pub fn truncate(&mut self, size: Option<u64>) -> Result<u64> {
        self.check_writable(Op::Truncate)?;
        let size = size.unwrap_or(self.buffer.len() as u64);
        let new_len = usize::try_from(size)
            .map_err(|_| self.invalid_argument(Op::Truncate, format!("size {size} too large")))?;
        if new_len > self.buffer.len() {
            self.grow_to(new_len, Op::Truncate)?;
        } else {
            self.buffer.truncate(new_len);
        }
        self.position = self.position.min(size);
        Ok(size)
    }

    /// Upload the entire buffer, replacing the remote content
    ///
    /// Does nothing for handles that are not writable.
    ///
    /// # Errors
    ///
    /// [`FsError::ClosedHandle`], [`FsError::ResourceNotFound`] if the
    /// parent collection vanished, or [`FsError::Transport`].
    pub fn flush(&mut self) -> Result<()> {
        self.check_open(Op::Flush)?;
        if !self.mode.writing() {
            return Ok(());
        }
        debug!("Flushing {} ({} bytes)", self.path, self.buffer.len());
        let mut source = self.buffer.as_slice();
        self.client
            .upload(&self.remote_path, &mut source)
            .map_err(|e| FsError::from_remote(e, &self.path, Op::Flush))?;
        Ok(())
    }

    /// Flush and release the buffer; later calls do nothing
    ///
    /// # Errors
    ///
    /// Returns the flush failure. The handle is closed either way.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        debug!("Closing {}", self.path);
        let flushed = self.flush();
        self.closed = true;
        self.buffer = Vec::new();
        self.position = 0;
        flushed
    }

    #[must_use]
    pub fn closed(&self) -> bool {
        self.closed
    }
}

fn offset_from(base: u64, offset: i64) -> u64 {
    if offset >= 0 {
        base.saturating_add(offset.unsigned_abs())
    } else {
        base.saturating_sub(offset.unsigned_abs())
    }
}

impl<C: RemoteClient> Drop for RemoteFile<C> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!("Failed to flush {} on drop: {}", self.path, e);
        }
    }
}

impl<C: RemoteClient> fmt::Debug for RemoteFile<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RemoteFile({:?}, {:?})", self.path, self.mode.as_str())
    }
}

/// Iterator returned by [`RemoteFile::lines`]
pub struct Lines<'a, C: RemoteClient> {
    file: &'a mut RemoteFile<C>,
    done: bool,
}

impl<C: RemoteClient> Iterator for Lines<'_, C> {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.file.read_line(None) {
            Ok(line) if line.is_empty() => {
                self.done = true;
                None
            }
            Ok(line) => Some(Ok(line)),
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<C: RemoteClient> Readable for RemoteFile<C> {
    fn readable(&self) -> bool {
        !self.closed && self.mode.reading()
    }

    fn read(&mut self, size: Option<usize>) -> Result<Vec<u8>> {
        RemoteFile::read(self, size)
    }

    fn read_line(&mut self, limit: Option<usize>) -> Result<Vec<u8>> {
        RemoteFile::read_line(self, limit)
    }
}

impl<C: RemoteClient> Writable for RemoteFile<C> {
    fn writable(&self) -> bool {
        !self.closed && self.mode.writing()
    }

    fn write(&mut self, data: &[u8]) -> Result<usize> {
        RemoteFile::write(self, data)
    }

    fn truncate(&mut self, size: Option<u64>) -> Result<u64> {
        RemoteFile::truncate(self, size)
    }

    fn flush(&mut self) -> Result<()> {
        RemoteFile::flush(self)
    }
}

impl<C: RemoteClient> Seekable for RemoteFile<C> {
    fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64> {
        RemoteFile::seek(self, offset, whence)
    }

    fn tell(&self) -> u64 {
        RemoteFile::tell(self)
    }
}

impl<C: RemoteClient> Closable for RemoteFile<C> {
    fn close(&mut self) -> Result<()> {
        RemoteFile::close(self)
    }

    fn closed(&self) -> bool {
        RemoteFile::closed(self)
    }
}

impl<C: RemoteClient> io::Read for RemoteFile<C> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let chunk = RemoteFile::read(self, Some(buf.len()))?;
        buf[..chunk.len()].copy_from_slice(&chunk);
        Ok(chunk.len())
    }
}

impl<C: RemoteClient> io::Write for RemoteFile<C> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(RemoteFile::write(self, buf)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(RemoteFile::flush(self)?)
    }
}

impl<C: RemoteClient> io::Seek for RemoteFile<C> {
    fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
        let (offset, whence) = match pos {
            io::SeekFrom::Start(n) => (
                i64::try_from(n).map_err(|_| {
                    io::Error::new(io::ErrorKind::InvalidInput, "seek offset out of range")
                })?,
                Whence::Start,
            ),
            io::SeekFrom::Current(n) => (n, Whence::Current),
            io::SeekFrom::End(n) => (n, Whence::End),
        };
        Ok(RemoteFile::seek(self, offset, whence)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::MemoryClient;
    use rstest::rstest;

    fn client_with(path: &str, content: &[u8]) -> Arc<MemoryClient> {
        let client = Arc::new(MemoryClient::new());
        client.insert_file(path, content);
        client
    }

    fn open(client: &Arc<MemoryClient>, path: &str, mode: &str) -> RemoteFile<MemoryClient> {
        RemoteFile::open(Arc::clone(client), path, path, mode).unwrap()
    }

    #[test]
    fn open_missing_for_read_fails() {
        let client = Arc::new(MemoryClient::new());
        let err = RemoteFile::open(Arc::clone(&client), "/missing.txt", "/missing.txt", "r")
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn open_missing_for_write_creates_empty_on_close() {
        let client = Arc::new(MemoryClient::new());
        let mut file = open(&client, "/new.bin", "wb");
        assert!(file.is_empty());
        file.close().unwrap();
        assert_eq!(client.contents("/new.bin").unwrap(), b"");
    }

    #[test]
    fn invalid_mode_is_rejected() {
        let client = Arc::new(MemoryClient::new());
        let err = RemoteFile::open(client, "/a", "/a", "rw").unwrap_err();
        assert!(matches!(err, FsError::InvalidMode { .. }));
    }

    #[test]
    fn read_advances_by_returned_bytes() {
        let client = client_with("/f", b"hello");
        let mut file = open(&client, "/f", "rb");
        assert_eq!(file.read(Some(2)).unwrap(), b"he");
        assert_eq!(file.tell(), 2);
        assert_eq!(file.read(Some(10)).unwrap(), b"llo");
        assert_eq!(file.tell(), 5);
        assert_eq!(file.read(None).unwrap(), b"");
        file.seek(1, Whence::Start).unwrap();
        assert_eq!(file.read(None).unwrap(), b"ello");
    }

    #[test]
    fn write_overwrites_in_place_and_extends() {
        let client = client_with("/f", b"hello");
        let mut file = open(&client, "/f", "r+b");
        file.seek(3, Whence::Start).unwrap();
        assert_eq!(file.write(b"LOWORLD").unwrap(), 7);
        assert_eq!(file.tell(), 10);
        file.close().unwrap();
        assert_eq!(client.contents("/f").unwrap(), b"helLOWORLD");
    }

    #[test]
    fn write_past_end_zero_fills() {
        let client = Arc::new(MemoryClient::new());
        let mut file = open(&client, "/f", "wb");
        file.seek(3, Whence::Start).unwrap();
        file.write(b"x").unwrap();
        file.close().unwrap();
        assert_eq!(client.contents("/f").unwrap(), b"\0\0\0x");
    }

    #[test]
    fn truncating_mode_discards_existing_content() {
        let client = client_with("/f", b"hello");
        let mut file = open(&client, "/f", "wb");
        assert!(file.is_empty());
        assert_eq!(client.download_count(), 0);
        file.write(b"ab").unwrap();
        file.close().unwrap();
        assert_eq!(client.contents("/f").unwrap(), b"ab");
    }

    #[test]
    fn append_mode_starts_at_end_and_always_appends() {
        let client = client_with("/log", b"one\n");
        let mut file = open(&client, "/log", "a+b");
        assert_eq!(file.tell(), 4);
        file.write(b"two\n").unwrap();
        file.seek(0, Whence::Start).unwrap();
        assert_eq!(file.read_line(None).unwrap(), b"one\n");
        file.write(b"three\n").unwrap();
        file.close().unwrap();
        assert_eq!(client.contents("/log").unwrap(), b"one\ntwo\nthree\n");
    }

    #[rstest]
    #[case(0, Whence::Start, 2, Some(0))]
    #[case(-1, Whence::Start, 2, None)]
    #[case(1, Whence::End, 2, None)]
    #[case(-5, Whence::Current, 2, Some(0))]
    #[case(1, Whence::Current, 2, Some(3))]
    #[case(-2, Whence::End, 2, Some(8))]
    #[case(-50, Whence::End, 2, Some(0))]
    fn seek_bounds(
        #[case] offset: i64,
        #[case] whence: Whence,
        #[case] from: i64,
        #[case] expected: Option<u64>,
    ) {
        let client = client_with("/f", b"0123456789");
        let mut file = open(&client, "/f", "rb");
        file.seek(from, Whence::Start).unwrap();
        match expected {
            Some(pos) => {
                assert_eq!(file.seek(offset, whence).unwrap(), pos);
                assert_eq!(file.tell(), pos);
            }
            None => {
                assert!(matches!(
                    file.seek(offset, whence),
                    Err(FsError::InvalidArgument { .. })
                ));
                assert_eq!(file.tell(), from as u64);
            }
        }
    }

    #[test]
    fn truncate_grow_pads_with_zeros() {
        let client = client_with("/f", b"abc");
        let mut file = open(&client, "/f", "r+b");
        assert_eq!(file.truncate(Some(5)).unwrap(), 5);
        file.close().unwrap();
        assert_eq!(client.contents("/f").unwrap(), b"abc\0\0");
    }

    #[test]
    fn truncate_shrink_keeps_prefix_and_clamps_position() {
        let client = client_with("/f", b"abc");
        let mut file = open(&client, "/f", "r+b");
        file.seek(0, Whence::End).unwrap();
        assert_eq!(file.truncate(Some(1)).unwrap(), 1);
        assert_eq!(file.tell(), 1);
        assert_eq!(file.truncate(None).unwrap(), 1);
        file.close().unwrap();
        assert_eq!(client.contents("/f").unwrap(), b"a");
    }

    #[test]
    fn mode_gates_reads_and_writes() {
        let client = client_with("/f", b"abc");
        let mut reader = open(&client, "/f", "rb");
        assert!(matches!(reader.write(b"x"), Err(FsError::NotWritable { .. })));
        assert!(matches!(reader.truncate(Some(0)), Err(FsError::NotWritable { .. })));
        assert!(!Writable::writable(&reader));

        let mut writer = open(&client, "/f", "ab");
        assert!(matches!(writer.read(None), Err(FsError::NotReadable { .. })));
        assert!(!Readable::readable(&writer));
    }

    #[test]
    fn read_only_close_does_not_upload() {
        let client = client_with("/f", b"abc");
        let mut file = open(&client, "/f", "rb");
        client.insert_file("/f", b"changed");
        file.close().unwrap();
        assert_eq!(client.contents("/f").unwrap(), b"changed");
    }

    #[test]
    fn closed_handle_rejects_operations_and_close_is_idempotent() {
        let client = client_with("/f", b"abc");
        let mut file = open(&client, "/f", "r+b");
        file.close().unwrap();
        file.close().unwrap();
        assert!(file.closed());
        assert!(matches!(file.read(None), Err(FsError::ClosedHandle { .. })));
        assert!(matches!(file.write(b"x"), Err(FsError::ClosedHandle { .. })));
        assert!(matches!(
            file.seek(0, Whence::Start),
            Err(FsError::ClosedHandle { .. })
        ));
        assert!(matches!(file.flush(), Err(FsError::ClosedHandle { .. })));
    }

    #[test]
    fn drop_flushes_writable_handle() {
        let client = Arc::new(MemoryClient::new());
        {
            let mut file = open(&client, "/dropped", "wb");
            file.write(b"kept").unwrap();
        }
        assert_eq!(client.contents("/dropped").unwrap(), b"kept");
    }

    #[test]
    fn lines_iterates_remaining_content() {
        let client = client_with("/f", b"a\nbb\nccc");
        let mut file = open(&client, "/f", "rb");
        let lines: Vec<Vec<u8>> = file.lines().collect::<Result<_>>().unwrap();
        assert_eq!(lines, vec![b"a\n".to_vec(), b"bb\n".to_vec(), b"ccc".to_vec()]);
    }

    #[test]
    fn write_after_saturated_seek_is_rejected() {
        let client = client_with("/f", b"abc");
        let mut file = open(&client, "/f", "r+b");
        file.seek(i64::MAX, Whence::Start).unwrap();
        assert_eq!(file.seek(i64::MAX, Whence::Current).unwrap(), u64::MAX - 1);

        let err = file.write(b"abc").unwrap_err();
        assert!(matches!(err, FsError::InvalidArgument { op: Op::Write, .. }));
        assert_eq!(file.len(), 3);
        assert_eq!(file.tell(), u64::MAX - 1);
    }

    #[test]
    fn write_far_past_end_is_rejected() {
        let client = client_with("/f", b"abc");
        let mut file = open(&client, "/f", "r+b");
        file.seek(i64::MAX, Whence::Start).unwrap();

        let err = file.write(b"x").unwrap_err();
        assert!(matches!(err, FsError::InvalidArgument { op: Op::Write, .. }));
        assert_eq!(file.len(), 3);

        file.seek(0, Whence::End).unwrap();
        file.write(b"d").unwrap();
        file.close().unwrap();
        assert_eq!(client.contents("/f").unwrap(), b"abcd");
    }

    #[test]
    fn truncate_to_impossible_size_is_rejected() {
        let client = client_with("/f", b"abc");
        let mut file = open(&client, "/f", "r+b");

        let err = file.truncate(Some(1 << 63)).unwrap_err();
        assert!(matches!(err, FsError::InvalidArgument { op: Op::Truncate, .. }));
        let err = file.truncate(Some(u64::MAX)).unwrap_err();
        assert!(matches!(err, FsError::InvalidArgument { op: Op::Truncate, .. }));
        assert_eq!(file.len(), 3);
    }

    #[test]
    fn idle_cursor_may_rest_past_end() {
        let client = client_with("/f", b"abc");
        let mut file = open(&client, "/f", "r+b");
        assert_eq!(file.seek(10, Whence::Start).unwrap(), 10);
        assert!(file.tell() > file.len());
        assert_eq!(file.read(None).unwrap(), b"");
        assert_eq!(file.read_line(None).unwrap(), b"");
        assert_eq!(file.len(), 3);
    }

    #[test]
    fn lines_stops_after_an_error() {
        let client = client_with("/f", b"a\nb\n");
        let mut file = open(&client, "/f", "rb");
        file.close().unwrap();

        let mut lines = file.lines();
        assert!(matches!(lines.next(), Some(Err(FsError::ClosedHandle { .. }))));
        assert!(lines.next().is_none());
        assert!(lines.next().is_none());
    }

    #[test]
    fn read_line_honours_limit() {
        let client = client_with("/f", b"abcdef\n");
        let mut file = open(&client, "/f", "rb");
        assert_eq!(file.read_line(Some(3)).unwrap(), b"abc");
        assert_eq!(file.read_line(None).unwrap(), b"def\n");
    }

    #[test]
    fn std_io_traits_compose() {
        use std::io::{Read, Seek, SeekFrom};

        let client = client_with("/src", b"payload");
        let mut src = open(&client, "/src", "rb");
        let mut dst = open(&client, "/dst", "wb");
        let copied = io::copy(&mut src, &mut dst).unwrap();
        assert_eq!(copied, 7);
        dst.close().unwrap();
        assert_eq!(client.contents("/dst").unwrap(), b"payload");

        Seek::seek(&mut src, SeekFrom::End(-4)).unwrap();
        let mut tail = String::new();
        src.read_to_string(&mut tail).unwrap();
        assert_eq!(tail, "load");
    }
}
