//! Filesystem adapter over a remote client
//!
//! [`WebDavFs`] maps path-oriented filesystem operations onto a
//! [`RemoteClient`]. Each operation normalizes its path, checks the remote
//! state it depends on and raises a typed [`FsError`] before delegating, so
//! callers never have to interpret an ambiguous remote failure.
//!
//! # Locking
//!
//! One instance-wide mutex serializes the compound check-then-act sequences:
//! the pre-flight checks of [`WebDavFs::open_file`], the collision check and
//! transfer of [`WebDavFs::copy`]/[`WebDavFs::move_to`], the
//! exists-then-truncate of [`WebDavFs::create`], and [`WebDavFs::set_bytes`].
//! The lock is not held while a [`RemoteFile`] downloads on open or uploads
//! on flush. Two handles open on the same path race and the last flush wins.

use crate::config::RemoteConfig;
use crate::error::{FsError, Op, Result};
use crate::info::Info;
use crate::mode::OpenMode;
use crate::path;
use crate::protocol::{RemoteClient, RemoteError};
use crate::remote_file::RemoteFile;
use crate::traits::Readable;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Static capabilities of the filesystem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FsMeta {
    pub case_insensitive: bool,
    pub invalid_path_chars: &'static str,
    pub network: bool,
    pub read_only: bool,
    pub thread_safe: bool,
    pub unicode_paths: bool,
    pub virtual_fs: bool,
}

const META: FsMeta = FsMeta {
    case_insensitive: false,
    invalid_path_chars: "\0",
    network: true,
    read_only: false,
    thread_safe: true,
    unicode_paths: true,
    virtual_fs: false,
};

/// Filesystem view of a remote whole-object store
pub struct WebDavFs<C: RemoteClient> {
    config: RemoteConfig,
    client: Arc<C>,
    lock: Mutex<()>,
}

impl<C: RemoteClient> WebDavFs<C> {
    /// Build a filesystem from a configuration and the client that reaches it
    #[must_use]
    pub fn new(config: RemoteConfig, client: C) -> Self {
        Self::with_shared_client(config, Arc::new(client))
    }

    /// Build a filesystem sharing an existing client
    #[must_use]
    pub fn with_shared_client(config: RemoteConfig, client: Arc<C>) -> Self {
        debug!(
            "Filesystem for {} via {} (root: {:?})",
            config.endpoint(),
            client.name(),
            config.root()
        );
        Self {
            config,
            client,
            lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    #[must_use]
    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    /// Static feature flags
    #[must_use]
    pub fn meta(&self) -> FsMeta {
        META
    }

    /// Path as sent to the client
    fn remote(&self, path: &str) -> String {
        path::with_root(self.config.root(), path)
    }

    fn transport(path: &str, op: Op, err: RemoteError) -> FsError {
        FsError::from_remote(err, path, op)
    }

    /// Check whether anything exists at `path`
    ///
    /// # Errors
    ///
    /// Returns [`FsError::InvalidPath`] for an invalid path.
    pub fn exists(&self, path: &str) -> Result<bool> {
        let path = path::normalize(path)?;
        Ok(self.exists_at(&path))
    }

    fn exists_at(&self, path: &str) -> bool {
        path::is_root(path) || self.client.check(&self.remote(path))
    }

    /// Check whether `path` is a directory; missing paths are not
    ///
    /// # Errors
    ///
    /// [`FsError::InvalidPath`], or [`FsError::Transport`] when the remote
    /// fails for a reason other than absence.
    pub fn is_dir(&self, path: &str) -> Result<bool> {
        let path = path::normalize(path)?;
        self.is_dir_at(&path)
    }

    fn is_dir_at(&self, path: &str) -> Result<bool> {
        if path::is_root(path) {
            return Ok(true);
        }
        match self.client.is_dir(&self.remote(path)) {
            Ok(is_dir) => Ok(is_dir),
            Err(RemoteError::NotFound(_) | RemoteError::ParentNotFound(_)) => Ok(false),
            Err(err) => Err(Self::transport(path, Op::IsDir, err)),
        }
    }

    /// Fetch normalized information about `path`
    ///
    /// The root is answered locally. Other paths are queried fresh on every
    /// call; the entry is marked as a directory whenever the remote confirms
    /// it, even if the raw properties carry no type.
    ///
    /// # Errors
    ///
    /// [`FsError::ResourceNotFound`] if the path does not exist.
    pub fn stat(&self, path: &str) -> Result<Info> {
        let path = path::normalize(path)?;
        self.stat_at(&path)
    }

    fn stat_at(&self, path: &str) -> Result<Info> {
        if path::is_root(path) {
            return Ok(Info::root());
        }
        let raw = self
            .client
            .info(&self.remote(path))
            .map_err(|e| Self::transport(path, Op::Stat, e))?;
        let mut info = Info::from_raw(&raw);
        if info.basic.name.is_empty() {
            info.basic.name = path::basename(path).to_string();
        }
        if self.is_dir_at(path)? {
            info.mark_dir();
        }
        Ok(info)
    }

    /// List child names of a directory, in remote order
    ///
    /// # Errors
    ///
    /// [`FsError::ResourceNotFound`] or [`FsError::NotADirectory`].
    pub fn list(&self, path: &str) -> Result<Vec<String>> {
        let path = path::normalize(path)?;
        self.list_at(&path)
    }

    fn list_at(&self, path: &str) -> Result<Vec<String>> {
        if !self.stat_at(path)?.is_dir() {
            return Err(FsError::NotADirectory {
                path: path.to_string(),
                op: Op::List,
            });
        }
        self.client
            .list(&self.remote(path))
            .map_err(|e| Self::transport(path, Op::List, e))
    }

    /// Create a directory and return a view of it
    ///
    /// With `recreate`, an existing directory (including the root) is
    /// accepted as is.
    ///
    /// # Errors
    ///
    /// [`FsError::AlreadyExists`] if the path exists (and `recreate` does
    /// not apply), [`FsError::ResourceNotFound`] if the parent is missing.
    pub fn make_dir(&self, path: &str, recreate: bool) -> Result<SubDir<'_, C>> {
        let path = path::normalize(path)?;

        if path::is_root(&path) {
            if !recreate {
                return Err(FsError::exists(path, Op::MakeDir));
            }
        } else if !(recreate && self.is_dir_at(&path)?) {
            if self.exists_at(&path) {
                return Err(FsError::exists(path, Op::MakeDir));
            }
            debug!("Creating directory {}", path);
            self.client
                .mkdir(&self.remote(&path))
                .map_err(|e| Self::transport(&path, Op::MakeDir, e))?;
        }

        Ok(SubDir { fs: self, path })
    }

    /// View an existing directory
    ///
    /// # Errors
    ///
    /// [`FsError::ResourceNotFound`] or [`FsError::NotADirectory`].
    pub fn open_dir(&self, path: &str) -> Result<SubDir<'_, C>> {
        let path = path::normalize(path)?;
        if !self.stat_at(&path)?.is_dir() {
            return Err(FsError::NotADirectory { path, op: Op::Open });
        }
        Ok(SubDir { fs: self, path })
    }

    /// Open a binary file handle
    ///
    /// # Errors
    ///
    /// - [`FsError::InvalidMode`] for an illegal or text mode
    /// - [`FsError::ResourceNotFound`] when a read mode targets a missing file
    /// - [`FsError::ExpectedFile`] when the path is a directory
    /// - [`FsError::AlreadyExists`] for an exclusive mode on an existing path
    /// - [`FsError::Transport`] if the initial download fails
    pub fn open_file(&self, path: &str, mode: &str) -> Result<RemoteFile<C>> {
        let path = path::normalize(path)?;
        let parsed = OpenMode::parse(mode)?;
        parsed.validate_bin()?;

        debug!("open_file: {}, {}", path, mode);
        {
            let _guard = self.lock.lock();
            self.preflight(&path, &parsed)?;
        }
        RemoteFile::open(Arc::clone(&self.client), path.clone(), self.remote(&path), mode)
    }

    fn preflight(&self, path: &str, mode: &OpenMode) -> Result<()> {
        match self.stat_at(path) {
            Err(err) if err.is_not_found() => {
                if mode.requires_existing() {
                    return Err(FsError::not_found(path, Op::Open));
                }
                Ok(())
            }
            Err(err) => Err(err),
            Ok(info) => {
                if info.is_dir() {
                    return Err(FsError::ExpectedFile {
                        path: path.to_string(),
                        op: Op::Open,
                    });
                }
                if mode.exclusive() {
                    return Err(FsError::exists(path, Op::Open));
                }
                Ok(())
            }
        }
    }

    /// Read a whole file
    ///
    /// # Errors
    ///
    /// Same as [`WebDavFs::open_file`] in `rb` mode.
    pub fn get_bytes(&self, path: &str) -> Result<Vec<u8>> {
        let mut file = self.open_file(path, "rb")?;
        let data = Readable::read_to_end(&mut file)?;
        file.close()?;
        Ok(data)
    }

    /// Replace a file's content with a single upload
    ///
    /// # Errors
    ///
    /// [`FsError::ExpectedFile`] for a directory,
    /// [`FsError::ResourceNotFound`] if the parent is missing.
    pub fn set_bytes(&self, path: &str, contents: &[u8]) -> Result<()> {
        let path = path::normalize(path)?;
        let _guard = self.lock.lock();
        if self.is_dir_at(&path)? {
            return Err(FsError::ExpectedFile {
                path,
                op: Op::SetBytes,
            });
        }
        let mut source = contents;
        self.client
            .upload(&self.remote(&path), &mut source)
            .map_err(|e| Self::transport(&path, Op::SetBytes, e))?;
        Ok(())
    }

    /// Accept a metadata update; properties are not writable remotely
    ///
    /// # Errors
    ///
    /// [`FsError::ResourceNotFound`] if the path does not exist.
    pub fn set_info(&self, path: &str) -> Result<()> {
        let path = path::normalize(path)?;
        if !self.exists_at(&path) {
            return Err(FsError::not_found(path, Op::SetInfo));
        }
        Ok(())
    }

    /// Create an empty file unless one exists
    ///
    /// Returns `false` without touching the remote when the path exists and
    /// `wipe` is not set; otherwise writes an empty file and returns `true`.
    ///
    /// # Errors
    ///
    /// [`FsError::ExpectedFile`] for a directory,
    /// [`FsError::ResourceNotFound`] if the parent is missing.
    pub fn create(&self, path: &str, wipe: bool) -> Result<bool> {
        let path = path::normalize(path)?;
        let mode = OpenMode::parse("wb")?;
        let _guard = self.lock.lock();
        if !wipe && self.exists_at(&path) {
            return Ok(false);
        }
        self.preflight(&path, &mode)?;
        let mut file = RemoteFile::open(
            Arc::clone(&self.client),
            path.clone(),
            self.remote(&path),
            mode.as_str(),
        )?;
        file.truncate(Some(0))?;
        file.close()
            .map_err(|e| match e {
                FsError::ResourceNotFound { path, .. } => FsError::not_found(path, Op::Create),
                other => other,
            })?;
        Ok(true)
    }

    /// Remove a file
    ///
    /// # Errors
    ///
    /// [`FsError::ResourceNotFound`] or [`FsError::ExpectedFile`].
    pub fn remove(&self, path: &str) -> Result<()> {
        let path = path::normalize(path)?;
        if !self.exists_at(&path) {
            return Err(FsError::not_found(path, Op::Remove));
        }
        if self.stat_at(&path)?.is_dir() {
            return Err(FsError::ExpectedFile {
                path,
                op: Op::Remove,
            });
        }
        debug!("Removing file {}", path);
        self.client
            .clean(&self.remote(&path))
            .map_err(|e| Self::transport(&path, Op::Remove, e))
    }

    /// Remove an empty directory
    ///
    /// # Errors
    ///
    /// [`FsError::CannotRemoveRoot`], [`FsError::ResourceNotFound`],
    /// [`FsError::NotADirectory`] or [`FsError::DirectoryNotEmpty`].
    pub fn remove_dir(&self, path: &str) -> Result<()> {
        let path = path::normalize(path)?;
        if path::is_root(&path) {
            return Err(FsError::CannotRemoveRoot);
        }
        if !self.exists_at(&path) {
            return Err(FsError::not_found(path, Op::RemoveDir));
        }
        if !self.is_dir_at(&path)? {
            return Err(FsError::NotADirectory {
                path,
                op: Op::RemoveDir,
            });
        }
        let children = self
            .client
            .list(&self.remote(&path))
            .map_err(|e| Self::transport(&path, Op::RemoveDir, e))?;
        if !children.is_empty() {
            return Err(FsError::DirectoryNotEmpty {
                path,
                op: Op::RemoveDir,
            });
        }
        debug!("Removing directory {}", path);
        self.client
            .clean(&self.remote(&path))
            .map_err(|e| Self::transport(&path, Op::RemoveDir, e))
    }

    /// Copy `src` to `dst` on the remote
    ///
    /// # Errors
    ///
    /// [`FsError::AlreadyExists`] if `dst` exists and `overwrite` is false;
    /// [`FsError::ResourceNotFound`] naming `src` when it is missing, or
    /// naming `dst` when its parent is missing.
    pub fn copy(&self, src: &str, dst: &str, overwrite: bool) -> Result<()> {
        self.transfer(src, dst, overwrite, Op::Copy)
    }

    /// Move `src` to `dst` on the remote
    ///
    /// # Errors
    ///
    /// Same as [`WebDavFs::copy`].
    pub fn move_to(&self, src: &str, dst: &str, overwrite: bool) -> Result<()> {
        self.transfer(src, dst, overwrite, Op::Move)
    }

    fn transfer(&self, src: &str, dst: &str, overwrite: bool, op: Op) -> Result<()> {
        let src = path::normalize(src)?;
        let dst = path::normalize(dst)?;
        let _guard = self.lock.lock();
        if !overwrite && self.exists_at(&dst) {
            return Err(FsError::exists(dst, op));
        }

        debug!("{} {} -> {} (overwrite: {})", op, src, dst, overwrite);
        let (remote_src, remote_dst) = (self.remote(&src), self.remote(&dst));
        let result = match op {
            Op::Move => self.client.move_to(&remote_src, &remote_dst, overwrite),
            _ => self.client.copy(&remote_src, &remote_dst),
        };
        result.map_err(|err| match err {
            RemoteError::NotFound(_) => FsError::not_found(src.clone(), op),
            RemoteError::ParentNotFound(_) => FsError::not_found(dst.clone(), op),
            RemoteError::Other(message) => FsError::Transport {
                path: src.clone(),
                op,
                message,
            },
        })
    }
}

impl<C: RemoteClient> fmt::Debug for WebDavFs<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WebDavFs({:?})", self.config.endpoint())
    }
}

/// A directory on a [`WebDavFs`], addressed relative to its path
pub struct SubDir<'fs, C: RemoteClient> {
    fs: &'fs WebDavFs<C>,
    path: String,
}

impl<'fs, C: RemoteClient> SubDir<'fs, C> {
    /// Absolute path of this directory
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    fn child(&self, name: &str) -> String {
        path::join(&self.path, name)
    }

    /// # Errors
    ///
    /// Same as [`WebDavFs::list`].
    pub fn list(&self) -> Result<Vec<String>> {
        self.fs.list(&self.path)
    }

    /// # Errors
    ///
    /// Same as [`WebDavFs::stat`].
    pub fn stat(&self) -> Result<Info> {
        self.fs.stat(&self.path)
    }

    /// # Errors
    ///
    /// Same as [`WebDavFs::open_file`].
    pub fn open_file(&self, name: &str, mode: &str) -> Result<RemoteFile<C>> {
        self.fs.open_file(&self.child(name), mode)
    }

    /// # Errors
    ///
    /// Same as [`WebDavFs::make_dir`].
    pub fn make_dir(&self, name: &str, recreate: bool) -> Result<SubDir<'fs, C>> {
        self.fs.make_dir(&self.child(name), recreate)
    }
}

impl<C: RemoteClient> fmt::Debug for SubDir<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubDir({:?})", self.path)
    }
}
