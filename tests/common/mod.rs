//! Shared helpers for integration tests

use std::ops::Deref;
use tempfile::TempDir;
use webdavfs::{connect, BundledClient, Credentials, RemoteConfig, WebDavFs};

/// Which bundled client backs a test filesystem
#[derive(Debug, Clone, Copy)]
pub enum Backend {
    Memory,
    Local,
}

/// A filesystem plus whatever keeps its storage alive
pub struct TestFs {
    fs: WebDavFs<BundledClient>,
    _temp_dir: Option<TempDir>,
}

impl Deref for TestFs {
    type Target = WebDavFs<BundledClient>;

    fn deref(&self) -> &Self::Target {
        &self.fs
    }
}

fn credentials() -> Credentials {
    Credentials::new("tester", "secret")
}

/// Build a filesystem over the requested backend
pub fn test_fs(backend: Backend) -> TestFs {
    match backend {
        Backend::Memory => {
            let config = RemoteConfig::new("memory://tests", credentials()).unwrap();
            TestFs {
                fs: connect(config).unwrap(),
                _temp_dir: None,
            }
        }
        Backend::Local => {
            let temp_dir = TempDir::new().unwrap();
            let endpoint = format!("file://{}", temp_dir.path().display());
            let config = RemoteConfig::new(endpoint, credentials()).unwrap();
            TestFs {
                fs: connect(config).unwrap(),
                _temp_dir: Some(temp_dir),
            }
        }
    }
}
