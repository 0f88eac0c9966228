use std::collections::{HashMap, HashSet};
use std::sync::{PoisonError, RwLock};

use indexmap::IndexMap;

use crate::error::GroupError;
use crate::group::{GroupStore, GroupWriter, Member, ObjectKind};
use crate::uri::{join_uri, normalize};

#[derive(Debug)]
enum Object {
    Array,
    Group(IndexMap<String, Member>),
}

impl Object {
    fn kind(&self) -> ObjectKind {
        match self {
            Object::Array => ObjectKind::Array,
            Object::Group(_) => ObjectKind::Group,
        }
    }
}

/// An open group of a [`MemoryGroupStore`].
///
/// Holds a snapshot of the members taken when the group was opened, so
/// later writes to the store are not visible through an open handle.
#[derive(Debug, Clone)]
pub struct MemoryGroup {
    uri: String,
    members: Vec<Member>,
}

impl MemoryGroup {
    pub fn uri(&self) -> &str {
        &self.uri
    }
}

/// An in-memory group store.
///
/// Useful for testing and as a reference implementation. Members keep their
/// insertion order. URIs are compared after stripping trailing `/`.
#[derive(Debug, Default)]
pub struct MemoryGroupStore {
    objects: RwLock<HashMap<String, Object>>,
    denied: RwLock<HashSet<String>>,
}

impl MemoryGroupStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later `open_group(uri)` fail with [`GroupError::AccessDenied`].
    pub fn deny(&self, uri: &str) {
        self.denied
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(normalize(uri));
    }

    fn create(&self, uri: &str, object: Object) -> Result<(), GroupError> {
        let key = normalize(uri);
        let mut objects = self.objects.write().unwrap_or_else(PoisonError::into_inner);
        if objects.contains_key(&key) {
            return Err(GroupError::AlreadyExists(key));
        }
        objects.insert(key, object);
        Ok(())
    }
}

impl GroupStore for MemoryGroupStore {
    type Error = GroupError;
    type Group = MemoryGroup;

    fn open_group(&self, uri: &str) -> Result<Self::Group, Self::Error> {
        let key = normalize(uri);
        if self
            .denied
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&key)
        {
            return Err(GroupError::AccessDenied(key));
        }
        let objects = self.objects.read().unwrap_or_else(PoisonError::into_inner);
        match objects.get(&key) {
            Some(Object::Group(members)) => Ok(MemoryGroup {
                members: members.values().cloned().collect(),
                uri: key,
            }),
            Some(Object::Array) => Err(GroupError::NotAGroup(key)),
            None => Err(GroupError::NotFound(key)),
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
            .ok_or_else(|| GroupError::MemberIndex {
                uri: group.uri.clone(),
                index,
            })
    }

    fn object_kind(&self, uri: &str) -> Result<Option<ObjectKind>, Self::Error> {
        let objects = self.objects.read().unwrap_or_else(PoisonError::into_inner);
        Ok(objects.get(&normalize(uri)).map(Object::kind))
    }
}

impl GroupWriter for MemoryGroupStore {
    type Error = GroupError;

    fn create_group(&self, uri: &str) -> Result<(), Self::Error> {
        self.create(uri, Object::Group(IndexMap::new()))
    }

    fn create_array(&self, uri: &str) -> Result<(), Self::Error> {
        self.create(uri, Object::Array)
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

        let mut objects = self.objects.write().unwrap_or_else(PoisonError::into_inner);
        let kind = objects
            .get(&normalize(&target))
            .map(Object::kind)
            .ok_or_else(|| GroupError::NotFound(target.clone()))?;

        match objects.get_mut(&group_key) {
            Some(Object::Group(members)) => {
                if members.contains_key(name) {
                    return Err(GroupError::DuplicateMember {
                        group: group_key,
                        name: name.to_string(),
                    });
                }
                members.insert(
                    name.to_string(),
                    Member {
                        name: name.to_string(),
                        uri: target,
                        kind,
                    },
                );
                Ok(())
            }
            Some(Object::Array) => Err(GroupError::NotAGroup(group_key)),
            None => Err(GroupError::NotFound(group_key)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_missing_group() {
        let store = MemoryGroupStore::new();

        let err = store.open_group("file:///nope").unwrap_err();

        assert_eq!(err, GroupError::NotFound("file:///nope".to_string()));
    }

    #[test]
    fn open_array_as_group() {
        let store = MemoryGroupStore::new();
        store.create_array("file:///data/obs").unwrap();

        let err = store.open_group("file:///data/obs").unwrap_err();

        assert!(matches!(err, GroupError::NotAGroup(_)));
    }

    #[test]
    fn members_keep_insertion_order() {
        let store = MemoryGroupStore::new();
        store.create_group("/soma").unwrap();
        store.create_array("/soma/var").unwrap();
        store.create_array("/soma/obs").unwrap();
        store.add_member("/soma", "var", "var", true).unwrap();
        store.add_member("/soma", "obs", "obs", true).unwrap();

        let group = store.open_group("/soma/").unwrap();

        assert_eq!(store.member_count(&group).unwrap(), 2);
        assert_eq!(store.member(&group, 0).unwrap().name, "var");
        assert_eq!(store.member(&group, 1).unwrap().name, "obs");
        assert!(matches!(
            store.member(&group, 2),
            Err(GroupError::MemberIndex { index: 2, .. })
        ));
    }

    #[test]
    fn relative_member_resolves_against_group() {
        let store = MemoryGroupStore::new();
        store.create_group("file:///data/R/").unwrap();
        store.create_array("file:///data/R/X").unwrap();
        store.add_member("file:///data/R/", "X", "X", true).unwrap();

        let group = store.open_group("file:///data/R").unwrap();
        let member = store.member(&group, 0).unwrap();

        assert_eq!(member.uri, "file:///data/R/X");
        assert_eq!(member.kind, ObjectKind::Array);
    }

    #[test]
    fn add_member_requires_existing_target() {
        let store = MemoryGroupStore::new();
        store.create_group("/soma").unwrap();

        let err = store.add_member("/soma", "obs", "obs", true).unwrap_err();

        assert_eq!(err, GroupError::NotFound("/soma/obs".to_string()));
    }

    #[test]
    fn add_member_rejects_duplicate_name() {
        let store = MemoryGroupStore::new();
        store.create_group("/soma").unwrap();
        store.create_array("/a").unwrap();
        store.create_array("/b").unwrap();
        store.add_member("/soma", "obs", "/a", false).unwrap();

        let err = store.add_member("/soma", "obs", "/b", false).unwrap_err();

        assert!(matches!(err, GroupError::DuplicateMember { .. }));
    }

    #[test]
    fn create_twice_fails() {
        let store = MemoryGroupStore::new();
        store.create_group("/soma").unwrap();

        assert_eq!(
            store.create_array("/soma/").unwrap_err(),
            GroupError::AlreadyExists("/soma".to_string())
        );
    }

    #[test]
    fn open_handle_is_a_snapshot() {
        let store = MemoryGroupStore::new();
        store.create_group("/soma").unwrap();
        let group = store.open_group("/soma").unwrap();

        store.create_array("/soma/obs").unwrap();
        store.add_member("/soma", "obs", "obs", true).unwrap();

        assert_eq!(store.member_count(&group).unwrap(), 0);
        let reopened = store.open_group("/soma").unwrap();
        assert_eq!(store.member_count(&reopened).unwrap(), 1);
    }

    #[test]
    fn denied_group() {
        let store = MemoryGroupStore::new();
        store.create_group("tiledb://acct/private").unwrap();
        store.deny("tiledb://acct/private");

        let err = store.open_group("tiledb://acct/private").unwrap_err();

        assert!(matches!(err, GroupError::AccessDenied(_)));
    }

    #[test]
    fn object_kind() {
        let store = MemoryGroupStore::new();
        store.create_group("/soma").unwrap();
        store.create_array("/soma/obs").unwrap();

        assert_eq!(store.object_kind("/soma").unwrap(), Some(ObjectKind::Group));
        assert_eq!(store.object_kind("/soma/obs").unwrap(), Some(ObjectKind::Array));
        assert_eq!(store.object_kind("/soma/var").unwrap(), None);
    }
}
