//! In-process remote store
//!
//! [`MemoryClient`] keeps every resource in a locked map and mirrors the
//! behavior of a WebDAV server: whole-object transfers, collections that
//! must exist before children are created, and distinguished not-found
//! conditions. It backs `memory://` endpoints and the test suite.

use crate::path;
use crate::protocol::{RemoteClient, RemoteError, RemoteResult};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

#[derive(Debug, Clone)]
enum Node {
    File {
        data: Vec<u8>,
        created: DateTime<Utc>,
        modified: DateTime<Utc>,
    },
    Collection {
        created: DateTime<Utc>,
    },
}

impl Node {
    fn is_collection(&self) -> bool {
        matches!(self, Self::Collection { .. })
    }
}

/// Thread-safe in-memory object store
#[derive(Debug)]
pub struct MemoryClient {
    nodes: Mutex<BTreeMap<String, Node>>,
    offline: AtomicBool,
    uploads: AtomicU64,
    downloads: AtomicU64,
}

impl Default for MemoryClient {
    fn default() -> Self {
        Self::new()
    }
}

fn is_child(parent: &str, candidate: &str) -> bool {
    candidate != "/" && path::dirname(candidate) == parent
}

fn is_within(root: &str, candidate: &str) -> bool {
    candidate == root
        || (candidate.starts_with(root) && candidate.as_bytes().get(root.len()) == Some(&b'/'))
}

impl MemoryClient {
    /// Create a store holding only the root collection
    #[must_use]
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert("/".to_string(), Node::Collection { created: Utc::now() });
        Self {
            nodes: Mutex::new(nodes),
            offline: AtomicBool::new(false),
            uploads: AtomicU64::new(0),
            downloads: AtomicU64::new(0),
        }
    }

    fn key(path: &str) -> RemoteResult<String> {
        path::normalize(path).map_err(|e| RemoteError::Other(e.to_string()))
    }

    fn online(&self) -> RemoteResult<()> {
        if self.offline.load(Ordering::Relaxed) {
            return Err(RemoteError::Other("connection refused".to_string()));
        }
        Ok(())
    }

    /// Simulate an unreachable server; every call fails with a transport error
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::Relaxed);
    }

    /// Number of uploads performed so far
    #[must_use]
    pub fn upload_count(&self) -> u64 {
        self.uploads.load(Ordering::Relaxed)
    }

    /// Number of downloads performed so far
    #[must_use]
    pub fn download_count(&self) -> u64 {
        self.downloads.load(Ordering::Relaxed)
    }

    /// Store a file directly, creating missing parent collections
    pub fn insert_file(&self, path: &str, data: &[u8]) {
        let Ok(key) = Self::key(path) else { return };
        let now = Utc::now();
        let mut nodes = self.nodes.lock();
        let mut parent = path::dirname(&key).to_string();
        while !nodes.contains_key(&parent) {
            nodes.insert(parent.clone(), Node::Collection { created: now });
            parent = path::dirname(&parent).to_string();
        }
        let created = match nodes.get(&key) {
            Some(Node::File { created, .. }) => *created,
            _ => now,
        };
        nodes.insert(
            key,
            Node::File {
                data: data.to_vec(),
                created,
                modified: now,
            },
        );
    }

    /// Content of a stored file, `None` for collections and missing paths
    #[must_use]
    pub fn contents(&self, path: &str) -> Option<Vec<u8>> {
        let key = Self::key(path).ok()?;
        match self.nodes.lock().get(&key) {
            Some(Node::File { data, .. }) => Some(data.clone()),
            _ => None,
        }
    }

    fn check_parent(nodes: &BTreeMap<String, Node>, key: &str) -> RemoteResult<()> {
        let parent = path::dirname(key);
        match nodes.get(parent) {
            Some(node) if node.is_collection() => Ok(()),
            _ => Err(RemoteError::ParentNotFound(parent.to_string())),
        }
    }

    fn subtree(nodes: &BTreeMap<String, Node>, root: &str) -> Vec<(String, Node)> {
        nodes
            .iter()
            .filter(|(k, _)| is_within(root, k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    fn remove_subtree(nodes: &mut BTreeMap<String, Node>, root: &str) {
        nodes.retain(|k, _| !is_within(root, k));
    }

    fn transfer(&self, src: &str, dst: &str, keep_source: bool, overwrite: bool) -> RemoteResult<()> {
        self.online()?;
        let src = Self::key(src)?;
        let dst = Self::key(dst)?;
        let mut nodes = self.nodes.lock();
        if !nodes.contains_key(&src) {
            return Err(RemoteError::NotFound(src));
        }
        Self::check_parent(&nodes, &dst)?;
        if src == dst {
            return Ok(());
        }
        if is_within(&src, &dst) {
            return Err(RemoteError::Other(format!(
                "cannot place {src} inside itself at {dst}"
            )));
        }
        if !overwrite && nodes.contains_key(&dst) {
            return Err(RemoteError::Other(format!(
                "412 Precondition Failed: {dst} exists"
            )));
        }

        let moved = Self::subtree(&nodes, &src);
        Self::remove_subtree(&mut nodes, &dst);
        if !keep_source {
            Self::remove_subtree(&mut nodes, &src);
        }
        for (key, node) in moved {
            let relocated = format!("{dst}{}", &key[src.len()..]);
            nodes.insert(relocated, node);
        }
        Ok(())
    }
}

impl RemoteClient for MemoryClient {
    fn check(&self, path: &str) -> bool {
        if self.online().is_err() {
            return false;
        }
        Self::key(path).is_ok_and(|key| self.nodes.lock().contains_key(&key))
    }

    fn is_dir(&self, path: &str) -> RemoteResult<bool> {
        self.online()?;
        let key = Self::key(path)?;
        self.nodes
            .lock()
            .get(&key)
            .map(Node::is_collection)
            .ok_or(RemoteError::NotFound(key))
    }

    fn info(&self, path: &str) -> RemoteResult<BTreeMap<String, String>> {
        self.online()?;
        let key = Self::key(path)?;
        let nodes = self.nodes.lock();
        let node = nodes.get(&key).ok_or_else(|| RemoteError::NotFound(key.clone()))?;

        // Like most servers, no explicit resource type is reported
        let mut props = BTreeMap::new();
        props.insert("name".to_string(), path::basename(&key).to_string());
        match node {
            Node::File {
                data,
                created,
                modified,
            } => {
                props.insert("size".to_string(), data.len().to_string());
                props.insert("created".to_string(), created.to_rfc3339());
                props.insert("modified".to_string(), modified.to_rfc2822());
                props.insert("etag".to_string(), format!("\"{:x}-{}\"", data.len(), modified.timestamp()));
            }
            Node::Collection { created } => {
                props.insert("created".to_string(), created.to_rfc3339());
            }
        }
        Ok(props)
    }

    fn list(&self, path: &str) -> RemoteResult<Vec<String>> {
        self.online()?;
        let key = Self::key(path)?;
        let nodes = self.nodes.lock();
        match nodes.get(&key) {
            Some(node) if node.is_collection() => Ok(nodes
                .keys()
                .filter(|k| is_child(&key, k))
                .map(|k| path::basename(k).to_string())
                .collect()),
            Some(_) => Err(RemoteError::Other(format!("{key} is not a collection"))),
            None => Err(RemoteError::NotFound(key)),
        }
    }

    fn mkdir(&self, path: &str) -> RemoteResult<()> {
        self.online()?;
        let key = Self::key(path)?;
        let mut nodes = self.nodes.lock();
        Self::check_parent(&nodes, &key)?;
        if nodes.contains_key(&key) {
            return Err(RemoteError::Other(format!("405 Method Not Allowed: {key} exists")));
        }
        nodes.insert(key, Node::Collection { created: Utc::now() });
        Ok(())
    }

    fn clean(&self, path: &str) -> RemoteResult<()> {
        self.online()?;
        let key = Self::key(path)?;
        let mut nodes = self.nodes.lock();
        if !nodes.contains_key(&key) {
            return Err(RemoteError::NotFound(key));
        }
        Self::remove_subtree(&mut nodes, &key);
        if key == "/" {
            nodes.insert(key, Node::Collection { created: Utc::now() });
        }
        Ok(())
    }

    fn copy(&self, src: &str, dst: &str) -> RemoteResult<()> {
        self.transfer(src, dst, true, true)
    }

    fn move_to(&self, src: &str, dst: &str, overwrite: bool) -> RemoteResult<()> {
        self.transfer(src, dst, false, overwrite)
    }

    fn download(&self, path: &str, sink: &mut dyn Write) -> RemoteResult<u64> {
        self.online()?;
        let key = Self::key(path)?;
        let data = match self.nodes.lock().get(&key) {
            Some(Node::File { data, .. }) => data.clone(),
            Some(Node::Collection { .. }) => {
                return Err(RemoteError::Other(format!("{key} is a collection")))
            }
            None => return Err(RemoteError::NotFound(key)),
        };
        sink.write_all(&data)
            .map_err(|e| RemoteError::Other(format!("failed to write download sink: {e}")))?;
        self.downloads.fetch_add(1, Ordering::Relaxed);
        Ok(data.len() as u64)
    }

    fn upload(&self, path: &str, source: &mut dyn Read) -> RemoteResult<u64> {
        self.online()?;
        let key = Self::key(path)?;
        let mut data = Vec::new();
        source
            .read_to_end(&mut data)
            .map_err(|e| RemoteError::Other(format!("failed to read upload source: {e}")))?;

        let now = Utc::now();
        let mut nodes = self.nodes.lock();
        Self::check_parent(&nodes, &key)?;
        let created = match nodes.get(&key) {
            Some(Node::Collection { .. }) => {
                return Err(RemoteError::Other(format!("{key} is a collection")))
            }
            Some(Node::File { created, .. }) => *created,
            None => now,
        };
        let len = data.len() as u64;
        nodes.insert(
            key,
            Node::File {
                data,
                created,
                modified: now,
            },
        );
        self.uploads.fetch_add(1, Ordering::Relaxed);
        Ok(len)
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
