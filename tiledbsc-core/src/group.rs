use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Logical path (`/`-joined member names) to physical URI.
pub type ResolvedMap = BTreeMap<String, String>;

/// The kind of object stored at a URI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Group,
    Array,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectKind::Group => write!(f, "group"),
            ObjectKind::Array => write!(f, "array"),
        }
    }
}

/// A single entry of a group, as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    pub uri: String,
    pub kind: ObjectKind,
}

/// Read access to a hierarchical group store.
///
/// Groups are opened into handles owned by the caller; dropping the handle
/// closes the group. Member enumeration is index based, mirroring the
/// TileDB group API.
///
/// All methods take `&self` to support stores with internal locking (e.g., RocksDB).
pub trait GroupStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// An open, read-only group.
    type Group;

    /// Opens the group at `uri` for reading.
    fn open_group(&self, uri: &str) -> Result<Self::Group, Self::Error>;

    /// The normalized URI an open group was opened at.
    fn group_uri<'g>(&self, group: &'g Self::Group) -> &'g str;

    /// Number of direct members of an open group.
    fn member_count(&self, group: &Self::Group) -> Result<u64, Self::Error>;

    /// The member at `index`, with `index < member_count(group)`.
    fn member(&self, group: &Self::Group, index: u64) -> Result<Member, Self::Error>;

    /// The kind of object at `uri`, or None if nothing is stored there.
    fn object_kind(&self, uri: &str) -> Result<Option<ObjectKind>, Self::Error>;
}

/// Write access used to populate a store.
///
/// Resolvers never write; this exists so backends can be loaded from a
/// [`Manifest`](crate::Manifest) or built up in tests.
pub trait GroupWriter {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Creates an empty group at `uri`.
    fn create_group(&self, uri: &str) -> Result<(), Self::Error>;

    /// Records an array at `uri`.
    fn create_array(&self, uri: &str) -> Result<(), Self::Error>;

    /// Adds a member to the group at `group_uri`.
    ///
    /// When `relative` is true, `uri` is a path relative to the group and the
    /// stored member URI is `group_uri/uri`. The member's kind is taken from
    /// the object stored at the resulting URI, which must already exist.
    fn add_member(
        &self,
        group_uri: &str,
        name: &str,
        uri: &str,
        relative: bool,
    ) -> Result<(), Self::Error>;
}
