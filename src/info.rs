//! Normalized resource information
//!
//! Remote servers report heterogeneous property sets. [`Info::from_raw`]
//! classifies each raw key into one of three fixed namespaces through a
//! static lookup table. Keys outside the table land in [`Info::other`]
//! untouched; nothing is invented.

use chrono::{DateTime, TimeZone, Utc};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Namespace a raw property key belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Basic,
    Details,
    Access,
    Other,
}

const NAMESPACE_TABLE: &[(&str, Namespace)] = &[
    ("name", Namespace::Basic),
    ("type", Namespace::Details),
    ("accessed", Namespace::Details),
    ("modified", Namespace::Details),
    ("created", Namespace::Details),
    ("metadata_changed", Namespace::Details),
    ("size", Namespace::Details),
    ("permissions", Namespace::Access),
    ("user", Namespace::Access),
    ("uid", Namespace::Access),
    ("group", Namespace::Access),
    ("gid", Namespace::Access),
];

impl Namespace {
    /// Classify a raw property key
    #[must_use]
    pub fn classify(key: &str) -> Self {
        NAMESPACE_TABLE
            .iter()
            .find(|(k, _)| *k == key)
            .map_or(Self::Other, |(_, ns)| *ns)
    }
}

/// Kind of remote resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResourceType {
    #[default]
    File,
    Directory,
}

impl ResourceType {
    fn from_raw(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "directory" | "dir" | "collection" | "1" => Self::Directory,
            _ => Self::File,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Directory => "directory",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `basic` namespace
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Basic {
    pub name: String,
    pub is_dir: bool,
}

/// `details` namespace
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Details {
    pub resource_type: ResourceType,
    pub accessed: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
    pub created: Option<DateTime<Utc>>,
    pub metadata_changed: Option<DateTime<Utc>>,
    pub size: Option<u64>,
}

/// `access` namespace
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Access {
    pub permissions: Option<String>,
    pub user: Option<String>,
    pub uid: Option<u32>,
    pub group: Option<String>,
    pub gid: Option<u32>,
}

/// Normalized information about a remote resource
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Info {
    pub basic: Basic,
    pub details: Details,
    pub access: Access,
    /// Raw properties outside the three namespaces
    pub other: BTreeMap<String, String>,
}

impl Info {
    /// Synthetic entry for the root directory
    #[must_use]
    pub fn root() -> Self {
        let mut info = Self::default();
        info.mark_dir();
        info
    }

    /// Normalize a raw property set
    ///
    /// Empty values are treated as absent. Values that cannot be coerced
    /// (a non-numeric `size`, an unparseable date) are dropped.
    #[must_use]
    pub fn from_raw(raw: &BTreeMap<String, String>) -> Self {
        let mut info = Self::default();

        for (key, value) in raw {
            match Namespace::classify(key) {
                Namespace::Basic => info.basic.name.clone_from(value),
                Namespace::Details => info.set_detail(key, value),
                Namespace::Access => info.set_access(key, value),
                Namespace::Other => {
                    info.other.insert(key.clone(), value.clone());
                }
            }
        }

        info
    }

    fn set_detail(&mut self, key: &str, value: &str) {
        if value.is_empty() {
            return;
        }
        let details = &mut self.details;
        match key {
            "type" => {
                details.resource_type = ResourceType::from_raw(value);
                self.basic.is_dir = details.resource_type == ResourceType::Directory;
            }
            "size" => details.size = parse_size(value),
            "accessed" => details.accessed = parse_time(key, value),
            "modified" => details.modified = parse_time(key, value),
            "created" => details.created = parse_time(key, value),
            "metadata_changed" => details.metadata_changed = parse_time(key, value),
            _ => {}
        }
    }

    fn set_access(&mut self, key: &str, value: &str) {
        if value.is_empty() {
            return;
        }
        let access = &mut self.access;
        match key {
            "permissions" => access.permissions = Some(value.to_string()),
            "user" => access.user = Some(value.to_string()),
            "group" => access.group = Some(value.to_string()),
            "uid" => access.uid = value.trim().parse().ok(),
            "gid" => access.gid = value.trim().parse().ok(),
            _ => {}
        }
    }

    /// Flag this entry as a directory
    pub fn mark_dir(&mut self) {
        self.basic.is_dir = true;
        self.details.resource_type = ResourceType::Directory;
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.basic.name
    }

    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.basic.is_dir
    }

    #[must_use]
    pub fn is_file(&self) -> bool {
        !self.basic.is_dir
    }

    /// Size in bytes, 0 when the remote did not report one
    #[must_use]
    pub fn size(&self) -> u64 {
        self.details.size.unwrap_or(0)
    }

    #[must_use]
    pub fn resource_type(&self) -> ResourceType {
        self.details.resource_type
    }

    /// One-line description used by the CLI
    #[must_use]
    pub fn summary(&self) -> String {
        let modified = self
            .details
            .modified
            .map_or_else(|| "-".to_string(), |t| t.to_rfc3339());
        format!(
            "{} {} (size: {}, modified: {})",
            self.resource_type(),
            if self.name().is_empty() { "/" } else { self.name() },
            self.size(),
            modified
        )
    }
}

/// Coerce a raw size to a non-negative integer
fn parse_size(value: &str) -> Option<u64> {
    let value = value.trim();
    if let Ok(size) = value.parse::<u64>() {
        return Some(size);
    }
    match value.parse::<f64>() {
        Ok(size) if size.is_finite() => Some(size.max(0.0) as u64),
        _ => {
            debug!("Dropping unparseable size {:?}", value);
            None
        }
    }
}

/// Parse RFC 3339, RFC 2822 (HTTP-date) or epoch-seconds timestamps
fn parse_time(key: &str, value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(value) {
        return Some(t.with_timezone(&Utc));
    }
    if let Ok(t) = DateTime::parse_from_rfc2822(value) {
        return Some(t.with_timezone(&Utc));
    }
    if let Ok(secs) = value.parse::<f64>() {
        if secs.is_finite() {
            let nanos = (secs.fract() * 1e9) as u32;
            if let Some(t) = Utc.timestamp_opt(secs.trunc() as i64, nanos).single() {
                return Some(t);
            }
        }
    }
    debug!("Dropping unparseable {} timestamp {:?}", key, value);
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn classifies_keys_into_namespaces() {
        assert_eq!(Namespace::classify("name"), Namespace::Basic);
        assert_eq!(Namespace::classify("size"), Namespace::Details);
        assert_eq!(Namespace::classify("gid"), Namespace::Access);
        assert_eq!(Namespace::classify("etag"), Namespace::Other);
    }

    #[test]
    fn normalizes_typical_webdav_properties() {
        let info = Info::from_raw(&raw(&[
            ("name", "report.pdf"),
            ("size", "1024"),
            ("modified", "Mon, 12 Jan 2015 10:00:00 GMT"),
            ("created", "2015-01-12T09:00:00Z"),
            ("etag", "\"abc\""),
            ("content_type", "application/pdf"),
        ]));

        assert_eq!(info.name(), "report.pdf");
        assert!(info.is_file());
        assert_eq!(info.resource_type(), ResourceType::File);
        assert_eq!(info.size(), 1024);
        assert_eq!(
            info.details.modified.unwrap().to_rfc3339(),
            "2015-01-12T10:00:00+00:00"
        );
        assert!(info.details.created.is_some());
        assert_eq!(info.other.len(), 2);
        assert_eq!(info.other["etag"], "\"abc\"");
    }

    #[test]
    fn size_is_never_negative() {
        assert_eq!(Info::from_raw(&raw(&[("size", "-12")])).details.size, Some(0));
        assert_eq!(Info::from_raw(&raw(&[("size", "12.7")])).details.size, Some(12));
        assert_eq!(Info::from_raw(&raw(&[("size", "huge")])).details.size, None);
        assert_eq!(Info::from_raw(&raw(&[("size", "")])).details.size, None);
    }

    #[test]
    fn directory_type_sets_is_dir() {
        let info = Info::from_raw(&raw(&[("name", "d"), ("type", "directory")]));
        assert!(info.is_dir());
        assert_eq!(info.resource_type(), ResourceType::Directory);
    }

    #[test]
    fn access_fields_are_parsed() {
        let info = Info::from_raw(&raw(&[
            ("user", "alice"),
            ("uid", "1000"),
            ("gid", "oops"),
            ("permissions", "rw-r--r--"),
        ]));
        assert_eq!(info.access.user.as_deref(), Some("alice"));
        assert_eq!(info.access.uid, Some(1000));
        assert_eq!(info.access.gid, None);
        assert_eq!(info.access.permissions.as_deref(), Some("rw-r--r--"));
    }

    #[test]
    fn epoch_timestamps() {
        let info = Info::from_raw(&raw(&[("accessed", "1420970400")]));
        assert_eq!(
            info.details.accessed.unwrap().to_rfc3339(),
            "2015-01-11T10:00:00+00:00"
        );
    }

    #[test]
    fn root_is_a_nameless_directory() {
        let info = Info::root();
        assert!(info.is_dir());
        assert_eq!(info.name(), "");
        assert!(info.summary().starts_with("directory /"));
    }
}
