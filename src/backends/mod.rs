//! Bundled remote client implementations
//!
//! These clients provide the [`RemoteClient`] contract without a network:
//! an in-process object store and a local directory treated as an object
//! store. HTTP clients implement the same trait outside this crate and are
//! handed to [`WebDavFs::new`] directly.

pub mod local;
pub mod memory;

pub use local::LocalClient;
pub use memory::MemoryClient;

use crate::config::RemoteConfig;
use crate::error::{FsError, Result};
use crate::fs::WebDavFs;
use crate::protocol::{RemoteClient, RemoteResult};
use std::collections::BTreeMap;
use std::io::{Read, Write};

/// One of the clients shipped with this crate, chosen by endpoint scheme
#[derive(Debug)]
pub enum BundledClient {
    Memory(MemoryClient),
    Local(LocalClient),
}

impl BundledClient {
    /// Build the client matching `config`'s endpoint scheme
    ///
    /// `memory://` gives an empty in-process store and `file://<dir>` serves
    /// an existing local directory.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::Config`] for any other scheme or a missing
    /// directory.
    pub fn from_config(config: &RemoteConfig) -> Result<Self> {
        match config.scheme().as_deref() {
            Some("memory") => Ok(Self::Memory(MemoryClient::new())),
            Some("file") => LocalClient::new(config.location())
                .map(Self::Local)
                .map_err(|e| FsError::Config(format!("cannot serve {}: {e}", config.endpoint()))),
            Some(other) => Err(FsError::Config(format!(
                "no bundled client for scheme {other:?}; supply a RemoteClient implementation"
            ))),
            None => Err(FsError::Config(format!(
                "endpoint {:?} has no scheme",
                config.endpoint()
            ))),
        }
    }

    fn inner(&self) -> &dyn RemoteClient {
        match self {
            Self::Memory(client) => client,
            Self::Local(client) => client,
        }
    }
}

/// Build a filesystem over the bundled client selected by `config`
///
/// # Errors
///
/// Same as [`BundledClient::from_config`].
pub fn connect(config: RemoteConfig) -> Result<WebDavFs<BundledClient>> {
    let client = BundledClient::from_config(&config)?;
    Ok(WebDavFs::new(config, client))
}

impl RemoteClient for BundledClient {
    fn check(&self, path: &str) -> bool {
        self.inner().check(path)
    }

    fn is_dir(&self, path: &str) -> RemoteResult<bool> {
        self.inner().is_dir(path)
    }

    fn info(&self, path: &str) -> RemoteResult<BTreeMap<String, String>> {
        self.inner().info(path)
    }

    fn list(&self, path: &str) -> RemoteResult<Vec<String>> {
        self.inner().list(path)
    }

    fn mkdir(&self, path: &str) -> RemoteResult<()> {
        self.inner().mkdir(path)
    }

    fn clean(&self, path: &str) -> RemoteResult<()> {
        self.inner().clean(path)
    }

    fn copy(&self, src: &str, dst: &str) -> RemoteResult<()> {
        self.inner().copy(src, dst)
    }

    fn move_to(&self, src: &str, dst: &str, overwrite: bool) -> RemoteResult<()> {
        self.inner().move_to(src, dst, overwrite)
    }

    fn download(&self, path: &str, sink: &mut dyn Write) -> RemoteResult<u64> {
        self.inner().download(path, sink)
    }

    fn upload(&self, path: &str, source: &mut dyn Read) -> RemoteResult<u64> {
        self.inner().upload(path, source)
    }

    fn name(&self) -> &'static str {
        self.inner().name()
    }
}
