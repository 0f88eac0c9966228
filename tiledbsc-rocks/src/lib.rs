//! RocksDB-backed group catalog for tiledbsc.
//!
//! Each object is one CBOR record keyed by its normalized URI.

use std::path::Path;
use std::sync::{Mutex, PoisonError};

use rocksdb::{DB, Options};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tiledbsc_core::uri::{join_uri, normalize};
use tiledbsc_core::{GroupError, GroupStore, GroupWriter, Member, ObjectKind};
use tracing::trace;

#[derive(Debug, Error)]
pub enum RocksGroupError {
    #[error("RocksDB error: {0}")]
    Rocks(#[from] rocksdb::Error),
    #[error("CBOR error: {0}")]
    Codec(String),
    #[error(transparent)]
    Group(#[from] GroupError),
}

#[derive(Debug, Serialize, Deserialize)]
enum ObjectRecord {
    Array,
    Group { members: Vec<Member> },
}

impl ObjectRecord {
    fn kind(&self) -> ObjectKind {
        match self {
            ObjectRecord::Array => ObjectKind::Array,
            ObjectRecord::Group { .. } => ObjectKind::Group,
        }
    }
}

/// An open group of a [`RocksGroupStore`], holding the members read at open time.
#[derive(Debug, Clone)]
pub struct RocksGroup {
    uri: String,
    members: Vec<Member>,
}

impl RocksGroup {
    pub fn uri(&self) -> &str {
        &self.uri
    }
}

/// A persistent group catalog backed by RocksDB.
///
/// Writes are read-modify-write on a single record and are serialized by an
/// internal lock; reads go straight to the database.
pub struct RocksGroupStore {
    db: DB,
    writes: Mutex<()>,
}

impl RocksGroupStore {
    /// Opens a catalog at the given path.
    ///
    /// Creates the database if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RocksGroupError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        let db = DB::open(&opts, path)?;
        Ok(Self {
            db,
            writes: Mutex::new(()),
        })
    }

    fn read(&self, key: &str) -> Result<Option<ObjectRecord>, RocksGroupError> {
        let Some(bytes) = self.db.get_pinned(key.as_bytes())? else {
            return Ok(None);
        };
        let record = ciborium::from_reader(&*bytes)
            .map_err(|e| RocksGroupError::Codec(e.to_string()))?;
        Ok(Some(record))
    }

    fn write(&self, key: &str, record: &ObjectRecord) -> Result<(), RocksGroupError> {
        let mut bytes = Vec::new();
        ciborium::into_writer(record, &mut bytes)
            .map_err(|e| RocksGroupError::Codec(e.to_string()))?;
        self.db.put(key.as_bytes(), bytes)?;
        Ok(())
    }

    fn create(&self, uri: &str, record: ObjectRecord) -> Result<(), RocksGroupError> {
        let key = normalize(uri);
        let _writing = self.writes.lock().unwrap_or_else(PoisonError::into_inner);
        if self.read(&key)?.is_some() {
            return Err(GroupError::AlreadyExists(key).into());
        }
        trace!(uri = %key, kind = ?record.kind(), "creating object");
        self.write(&key, &record)
    }
}

impl GroupStore for RocksGroupStore {
    type Error = RocksGroupError;
    type Group = RocksGroup;

    fn open_group(&self, uri: &str) -> Result<Self::Group, Self::Error> {
        let key = normalize(uri);
        match self.read(&key)? {
            Some(ObjectRecord::Group { members }) => Ok(RocksGroup { uri: key, members }),
            Some(ObjectRecord::Array) => Err(GroupError::NotAGroup(key).into()),
            None => Err(GroupError::NotFound(key).into()),
        }
    }

    fn group_uri<'g>(&self, group: &'g Self::Group) -> &'g str {
        &group.uri
    }

    fn member_count(&self, group: &Self::Group) -> Result<u64, Self::Error> {
        Ok(group.members.len() as u64)
    }

    fn member(&self, group: &Self::Group, index: u64) -> Result<Member, Self::Error> {
        usize::try_from(index)
            .ok()
            .and_then(|i| group.members.get(i))
            .cloned()
            .ok_or_else(|| {
                GroupError::MemberIndex {
                    uri: group.uri.clone(),
                    index,
                }
                .into()
            })
    }

    fn object_kind(&self, uri: &str) -> Result<Option<ObjectKind>, Self::Error> {
        Ok(self.read(&normalize(uri))?.map(|record| record.kind()))
    }
}

impl GroupWriter for RocksGroupStore {
    type Error = RocksGroupError;

    fn create_group(&self, uri: &str) -> Result<(), Self::Error> {
        self.create(uri, ObjectRecord::Group { members: Vec::new() })
    }

    fn create_array(&self, uri: &str) -> Result<(), Self::Error> {
        self.create(uri, ObjectRecord::Array)
    }

    fn add_member(
        &self,
        group_uri: &str,
        name: &str,
        uri: &str,
        relative: bool,
    ) -> Result<(), Self::Error> {
        let group_key = normalize(group_uri);
        let target = if relative {
            join_uri(&group_key, uri)
        } else {
            uri.to_string()
        };

        let _writing = self.writes.lock().unwrap_or_else(PoisonError::into_inner);
        let kind = self
            .read(&normalize(&target))?
            .map(|record| record.kind())
            .ok_or_else(|| GroupError::NotFound(target.clone()))?;

        let mut members = match self.read(&group_key)? {
            Some(ObjectRecord::Group { members }) => members,
            Some(ObjectRecord::Array) => return Err(GroupError::NotAGroup(group_key).into()),
            None => return Err(GroupError::NotFound(group_key).into()),
        };
        if members.iter().any(|m| m.name == name) {
            return Err(GroupError::DuplicateMember {
                group: group_key,
                name: name.to_string(),
            }
            .into());
        }
        members.push(Member {
            name: name.to_string(),
            uri: target,
            kind,
        });
        self.write(&group_key, &ObjectRecord::Group { members })
    }
}
