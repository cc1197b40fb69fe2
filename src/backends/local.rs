//! Local directory remote store
//!
//! [`LocalClient`] treats a directory on disk as the remote store behind
//! `file://` endpoints. Files are only ever read or written whole, so it
//! exercises the same code paths as a real WebDAV server.

use crate::protocol::{RemoteClient, RemoteError, RemoteResult};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;

/// Remote store rooted at a local directory
#[derive(Debug, Clone)]
pub struct LocalClient {
    base: PathBuf,
}

impl LocalClient {
    /// Create a client serving the directory at `base`
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::NotFound`] if `base` is not an existing
    /// directory.
    pub fn new(base: impl Into<PathBuf>) -> RemoteResult<Self> {
        let base = base.into();
        if !base.is_dir() {
            return Err(RemoteError::NotFound(base.display().to_string()));
        }
        Ok(Self { base })
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let relative = path.trim_start_matches('/');
        if relative.is_empty() {
            self.base.clone()
        } else {
            self.base.join(relative)
        }
    }

    fn parent_exists(target: &Path) -> bool {
        target.parent().is_some_and(Path::is_dir)
    }

    fn map_err(err: &io::Error, path: &str) -> RemoteError {
        match err.kind() {
            io::ErrorKind::NotFound => RemoteError::NotFound(path.to_string()),
            _ => RemoteError::Other(format!("{path}: {err}")),
        }
    }

    fn remove_any(target: &Path) -> io::Result<()> {
        if target.is_dir() {
            fs::remove_dir_all(target)
        } else {
            fs::remove_file(target)
        }
    }

    fn copy_tree(src: &Path, dst: &Path) -> io::Result<()> {
        if src.is_dir() {
            fs::create_dir(dst)?;
            for entry in fs::read_dir(src)? {
                let entry = entry?;
                Self::copy_tree(&entry.path(), &dst.join(entry.file_name()))?;
            }
            Ok(())
        } else {
            fs::copy(src, dst).map(|_| ())
        }
    }

    fn check_transfer(&self, src: &str, dst: &str) -> RemoteResult<(PathBuf, PathBuf)> {
        let from = self.resolve(src);
        let to = self.resolve(dst);
        if !from.exists() {
            return Err(RemoteError::NotFound(src.to_string()));
        }
        if !Self::parent_exists(&to) {
            return Err(RemoteError::ParentNotFound(dst.to_string()));
        }
        Ok((from, to))
    }
}

fn rfc3339(time: io::Result<SystemTime>) -> Option<String> {
    time.ok().map(|t| DateTime::<Utc>::from(t).to_rfc3339())
}

impl RemoteClient for LocalClient {
    fn check(&self, path: &str) -> bool {
        self.resolve(path).exists()
    }

    fn is_dir(&self, path: &str) -> RemoteResult<bool> {
        fs::metadata(self.resolve(path))
            .map(|m| m.is_dir())
            .map_err(|e| Self::map_err(&e, path))
    }

    fn info(&self, path: &str) -> RemoteResult<BTreeMap<String, String>> {
        let target = self.resolve(path);
        let metadata = fs::metadata(&target).map_err(|e| Self::map_err(&e, path))?;

        let mut props = BTreeMap::new();
        let name = path.rsplit('/').next().unwrap_or_default();
        props.insert("name".to_string(), name.to_string());
        props.insert(
            "type".to_string(),
            if metadata.is_dir() { "directory" } else { "file" }.to_string(),
        );
        if metadata.is_file() {
            props.insert("size".to_string(), metadata.len().to_string());
        }
        if let Some(t) = rfc3339(metadata.modified()) {
            props.insert("modified".to_string(), t);
        }
        if let Some(t) = rfc3339(metadata.accessed()) {
            props.insert("accessed".to_string(), t);
        }
        if let Some(t) = rfc3339(metadata.created()) {
            props.insert("created".to_string(), t);
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::MetadataExt;
            props.insert("uid".to_string(), metadata.uid().to_string());
            props.insert("gid".to_string(), metadata.gid().to_string());
            props.insert(
                "permissions".to_string(),
                format!("{:o}", metadata.mode() & 0o7777),
            );
            props.insert("metadata_changed".to_string(), metadata.ctime().to_string());
        }

        Ok(props)
    }

    fn list(&self, path: &str) -> RemoteResult<Vec<String>> {
        let entries = fs::read_dir(self.resolve(path)).map_err(|e| Self::map_err(&e, path))?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Self::map_err(&e, path))?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }

    fn mkdir(&self, path: &str) -> RemoteResult<()> {
        let target = self.resolve(path);
        if !Self::parent_exists(&target) {
            return Err(RemoteError::ParentNotFound(path.to_string()));
        }
        fs::create_dir(&target).map_err(|e| RemoteError::Other(format!("{path}: {e}")))
    }

    fn clean(&self, path: &str) -> RemoteResult<()> {
        let target = self.resolve(path);
        if !target.exists() {
            return Err(RemoteError::NotFound(path.to_string()));
        }
        Self::remove_any(&target).map_err(|e| Self::map_err(&e, path))
    }

    fn copy(&self, src: &str, dst: &str) -> RemoteResult<()> {
        let (from, to) = self.check_transfer(src, dst)?;
        if from == to {
            return Ok(());
        }
        if to.exists() {
            Self::remove_any(&to).map_err(|e| Self::map_err(&e, dst))?;
        }
        debug!("Copying {} to {}", from.display(), to.display());
        Self::copy_tree(&from, &to).map_err(|e| RemoteError::Other(format!("{src} -> {dst}: {e}")))
    }

    fn move_to(&self, src: &str, dst: &str, overwrite: bool) -> RemoteResult<()> {
        let (from, to) = self.check_transfer(src, dst)?;
        if from == to {
            return Ok(());
        }
        if to.exists() {
            if !overwrite {
                return Err(RemoteError::Other(format!("412 Precondition Failed: {dst} exists")));
            }
            Self::remove_any(&to).map_err(|e| Self::map_err(&e, dst))?;
        }
        fs::rename(&from, &to).map_err(|e| RemoteError::Other(format!("{src} -> {dst}: {e}")))
    }

    fn download(&self, path: &str, sink: &mut dyn Write) -> RemoteResult<u64> {
        let target = self.resolve(path);
        if target.is_dir() {
            return Err(RemoteError::Other(format!("{path} is a collection")));
        }
        let mut file = fs::File::open(&target).map_err(|e| Self::map_err(&e, path))?;
        io::copy(&mut file, sink).map_err(|e| RemoteError::Other(format!("{path}: {e}")))
    }

    fn upload(&self, path: &str, source: &mut dyn Read) -> RemoteResult<u64> {
        let target = self.resolve(path);
        if !Self::parent_exists(&target) {
            return Err(RemoteError::ParentNotFound(path.to_string()));
        }
        if target.is_dir() {
            return Err(RemoteError::Other(format!("{path} is a collection")));
        }
        let mut file =
            fs::File::create(&target).map_err(|e| RemoteError::Other(format!("{path}: {e}")))?;
        io::copy(source, &mut file).map_err(|e| RemoteError::Other(format!("{path}: {e}")))
    }

    fn name(&self) -> &'static str {
        "local"
    }
}
