//! Error types for webdavfs
//!
//! Every failure surfaced by the filesystem adapter or a file handle is an
//! [`FsError`]. Path-bearing variants carry the offending path and the
//! operation that was attempted, so messages always read like
//! `resource not found: /a/b.txt (open)`.

use crate::protocol::RemoteError;
use std::fmt;
use std::io;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, FsError>;

/// Operation being attempted when an error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Exists,
    IsDir,
    Stat,
    List,
    MakeDir,
    Open,
    Read,
    Write,
    Seek,
    Truncate,
    Flush,
    Remove,
    RemoveDir,
    SetBytes,
    SetInfo,
    Create,
    Copy,
    Move,
}

impl Op {
    /// Short lowercase name used in error messages and log fields
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exists => "exists",
            Self::IsDir => "isdir",
            Self::Stat => "stat",
            Self::List => "list",
            Self::MakeDir => "makedir",
            Self::Open => "open",
            Self::Read => "read",
            Self::Write => "write",
            Self::Seek => "seek",
            Self::Truncate => "truncate",
            Self::Flush => "flush",
            Self::Remove => "remove",
            Self::RemoveDir => "removedir",
            Self::SetBytes => "setbytes",
            Self::SetInfo => "setinfo",
            Self::Create => "create",
            Self::Copy => "copy",
            Self::Move => "move",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors produced by the filesystem adapter and remote file handles
#[derive(Debug, Error)]
pub enum FsError {
    /// The path does not exist on the remote
    #[error("resource not found: {path} ({op})")]
    ResourceNotFound { path: String, op: Op },

    /// A file or directory already exists at the destination
    #[error("resource already exists: {path} ({op})")]
    AlreadyExists { path: String, op: Op },

    /// A file was expected but the path is a directory
    #[error("expected a file, found a directory: {path} ({op})")]
    ExpectedFile { path: String, op: Op },

    /// A directory was expected but the path is not one
    #[error("not a directory: {path} ({op})")]
    NotADirectory { path: String, op: Op },

    /// Directory still has children
    #[error("directory not empty: {path} ({op})")]
    DirectoryNotEmpty { path: String, op: Op },

    /// Attempt to remove `/`
    #[error("the root directory cannot be removed")]
    CannotRemoveRoot,

    /// Mode string could not be parsed or is not allowed here
    #[error("invalid mode {mode:?}: {reason}")]
    InvalidMode { mode: String, reason: &'static str },

    /// Path contains characters the remote cannot represent
    #[error("invalid path {path:?}: {reason}")]
    InvalidPath { path: String, reason: &'static str },

    /// Handle was not opened for reading
    #[error("file not open for reading: {path}")]
    NotReadable { path: String },

    /// Handle was not opened for writing
    #[error("file not open for writing: {path}")]
    NotWritable { path: String },

    /// Operation on a handle after `close`
    #[error("I/O operation on closed file: {path} ({op})")]
    ClosedHandle { path: String, op: Op },

    /// Bad seek or truncate argument
    #[error("invalid argument for {op} on {path}: {reason}")]
    InvalidArgument {
        path: String,
        op: Op,
        reason: String,
    },

    /// Remote failure that is not one of the distinguished not-found conditions
    #[error("transport error during {op} on {path}: {message}")]
    Transport {
        path: String,
        op: Op,
        message: String,
    },

    /// Configuration rejected at construction time
    #[error("configuration error: {0}")]
    Config(String),
}

impl FsError {
    pub(crate) fn not_found(path: impl Into<String>, op: Op) -> Self {
        Self::ResourceNotFound {
            path: path.into(),
            op,
        }
    }

    pub(crate) fn exists(path: impl Into<String>, op: Op) -> Self {
        Self::AlreadyExists {
            path: path.into(),
            op,
        }
    }

    /// Map a remote failure onto the adapter's taxonomy.
    ///
    /// Both not-found conditions become [`FsError::ResourceNotFound`] naming
    /// `path`; callers that need to attribute parent-not-found to a different
    /// path (copy/move destinations) match on [`RemoteError`] themselves.
    pub(crate) fn from_remote(err: RemoteError, path: &str, op: Op) -> Self {
        match err {
            RemoteError::NotFound(_) | RemoteError::ParentNotFound(_) => {
                Self::not_found(path, op)
            }
            RemoteError::Other(message) => Self::Transport {
                path: path.to_string(),
                op,
                message,
            },
        }
    }

    /// Check whether this error reports a missing resource
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ResourceNotFound { .. })
    }
}

impl From<FsError> for io::Error {
    fn from(err: FsError) -> Self {
        let kind = match &err {
            FsError::ResourceNotFound { .. } => io::ErrorKind::NotFound,
            FsError::AlreadyExists { .. } => io::ErrorKind::AlreadyExists,
            FsError::ExpectedFile { .. } => io::ErrorKind::IsADirectory,
            FsError::NotADirectory { .. } => io::ErrorKind::NotADirectory,
            FsError::DirectoryNotEmpty { .. } => io::ErrorKind::DirectoryNotEmpty,
            FsError::CannotRemoveRoot
            | FsError::NotReadable { .. }
            | FsError::NotWritable { .. } => io::ErrorKind::PermissionDenied,
            FsError::InvalidMode { .. }
            | FsError::InvalidPath { .. }
            | FsError::InvalidArgument { .. }
            | FsError::Config(_) => io::ErrorKind::InvalidInput,
            FsError::ClosedHandle { .. } | FsError::Transport { .. } => io::ErrorKind::Other,
        };
        io::Error::new(kind, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_path_and_operation() {
        let err = FsError::not_found("/missing.txt", Op::Open);
        assert_eq!(err.to_string(), "resource not found: /missing.txt (open)");

        let err = FsError::DirectoryNotEmpty {
            path: "/d".into(),
            op: Op::RemoveDir,
        };
        assert_eq!(err.to_string(), "directory not empty: /d (removedir)");
    }

    #[test]
    fn remote_not_found_conditions_collapse() {
        let err = FsError::from_remote(RemoteError::ParentNotFound("/a".into()), "/a/b", Op::MakeDir);
        assert!(err.is_not_found());

        let err = FsError::from_remote(RemoteError::Other("503".into()), "/a", Op::Flush);
        assert!(matches!(err, FsError::Transport { ref message, .. } if message == "503"));
    }

    #[test]
    fn io_error_kinds() {
        let io_err: io::Error = FsError::exists("/x", Op::Copy).into();
        assert_eq!(io_err.kind(), io::ErrorKind::AlreadyExists);

        let io_err: io::Error = FsError::NotReadable { path: "/x".into() }.into();
        assert_eq!(io_err.kind(), io::ErrorKind::PermissionDenied);
    }
}
