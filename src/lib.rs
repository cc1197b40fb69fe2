//! webdavfs - filesystem abstraction over WebDAV-style remote stores
//!
//! A WebDAV server only moves whole objects: a resource is downloaded or
//! uploaded in one piece. This crate presents such a store as a
//! hierarchical filesystem with random-access file handles.
//!
//! - [`WebDavFs`] maps path operations (stat, list, make/remove directory,
//!   copy, move, ...) onto a [`RemoteClient`] and returns typed errors.
//! - [`RemoteFile`] buffers one resource in memory, supports
//!   read/write/seek/truncate and uploads the whole buffer on flush.
//! - [`Info`] normalizes heterogeneous remote properties into fixed
//!   `basic`/`details`/`access` namespaces.
//!
//! ```rust,ignore
//! use webdavfs::{connect, Credentials, RemoteConfig};
//!
//! let config = RemoteConfig::new("memory://", Credentials::new("me", "pw"))?;
//! let fs = connect(config)?;
//! fs.make_dir("/docs", false)?;
//! fs.set_bytes("/docs/a.txt", b"hello")?;
//! assert_eq!(fs.list("/docs")?, vec!["a.txt"]);
//! ```

pub mod backends;
pub mod cli;
pub mod config;
pub mod error;
pub mod fs;
pub mod info;
pub mod mode;
pub mod path;
pub mod protocol;
pub mod remote_file;
pub mod traits;

pub use backends::{connect, BundledClient, LocalClient, MemoryClient};
pub use config::{Credentials, RemoteConfig};
pub use error::{FsError, Op, Result};
pub use fs::{FsMeta, SubDir, WebDavFs};
pub use info::{Info, ResourceType};
pub use mode::OpenMode;
pub use protocol::{RemoteClient, RemoteError};
pub use remote_file::RemoteFile;
pub use traits::{Closable, Readable, Seekable, Whence, Writable};
