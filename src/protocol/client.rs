//! `RemoteClient` trait for whole-object remote stores
//!
//! The store addresses resources by absolute, `/`-separated paths. It only
//! moves entire objects: a download streams the whole resource into a sink
//! and an upload replaces the whole resource from a source.

use std::collections::BTreeMap;
use std::io::{Read, Write};
use thiserror::Error;

/// Result alias for remote client calls
pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

/// Failure reported by a remote client
///
/// The two not-found conditions are distinguished so the adapter can decide
/// which path (source or destination) to blame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// The addressed resource does not exist
    #[error("remote resource not found: {0}")]
    NotFound(String),

    /// The parent collection of the addressed resource does not exist
    #[error("remote parent not found: {0}")]
    ParentNotFound(String),

    /// Any other remote failure (network, auth, server error)
    #[error("{0}")]
    Other(String),
}

/// Blocking client for a WebDAV-style remote store
///
/// Every call blocks the invoking thread for the full round trip. Timeouts,
/// retries and connection handling are the implementation's concern.
///
/// # Examples
///
/// ```rust,ignore
/// use webdavfs::protocol::RemoteClient;
///
/// fn size_of<C: RemoteClient>(client: &C, path: &str) -> usize {
///     let mut sink = Vec::new();
///     client.download(path, &mut sink).map(|_| sink.len()).unwrap_or(0)
/// }
/// ```
pub trait RemoteClient: Send + Sync + 'static {
    /// Check whether a resource exists at `path`
    fn check(&self, path: &str) -> bool;

    /// Check whether `path` is a collection
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::NotFound`] if nothing exists at `path`.
    fn is_dir(&self, path: &str) -> RemoteResult<bool>;

    /// Fetch the raw property set of a resource
    ///
    /// Keys and values are whatever the server reports (`name`, `size`,
    /// `modified`, `created`, `etag`, ...). Sets are heterogeneous: a
    /// collection may omit `size`, a file may omit `type`.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::NotFound`] if nothing exists at `path`.
    fn info(&self, path: &str) -> RemoteResult<BTreeMap<String, String>>;

    /// List the child names of a collection, in server order
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::NotFound`] if the collection does not exist.
    fn list(&self, path: &str) -> RemoteResult<Vec<String>>;

    /// Create a collection
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::ParentNotFound`] if the parent is missing.
    fn mkdir(&self, path: &str) -> RemoteResult<()>;

    /// Delete a resource (recursively for collections)
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::NotFound`] if nothing exists at `path`.
    fn clean(&self, path: &str) -> RemoteResult<()>;

    /// Copy `src` to `dst`, replacing `dst` if present
    ///
    /// # Errors
    ///
    /// [`RemoteError::NotFound`] for a missing source,
    /// [`RemoteError::ParentNotFound`] for a missing destination parent.
    fn copy(&self, src: &str, dst: &str) -> RemoteResult<()>;

    /// Move `src` to `dst`
    ///
    /// # Errors
    ///
    /// Same conditions as [`RemoteClient::copy`], plus
    /// [`RemoteError::Other`] if `dst` exists and `overwrite` is false.
    fn move_to(&self, src: &str, dst: &str, overwrite: bool) -> RemoteResult<()>;

    /// Stream the whole resource into `sink`
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::NotFound`] if nothing exists at `path`.
    fn download(&self, path: &str, sink: &mut dyn Write) -> RemoteResult<u64>;

    /// Replace the whole resource with the bytes read from `source`
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::ParentNotFound`] if the parent is missing.
    fn upload(&self, path: &str, source: &mut dyn Read) -> RemoteResult<u64>;

    /// Client name for log messages
    fn name(&self) -> &'static str {
        "unknown"
    }
}
