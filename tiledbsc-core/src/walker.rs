//! Member iteration and depth-first traversal over open groups.
//!
//! Both resolvers are built on [`walk`]: the walker owns iteration and
//! recursion, the caller decides per member whether to descend.

use tracing::{trace, warn};

use crate::group::{GroupStore, Member, ResolvedMap};
use crate::uri::normalize;

/// Lazy iterator over the direct members of an open group.
///
/// Produced by [`members`]. Finite and single pass; re-open the group to
/// iterate again.
pub struct Members<'a, S: GroupStore> {
    store: &'a S,
    group: &'a S::Group,
    next: u64,
    count: u64,
}

/// Iterates the direct members of `group`.
pub fn members<'a, S: GroupStore>(
    store: &'a S,
    group: &'a S::Group,
) -> Result<Members<'a, S>, S::Error> {
    let count = store.member_count(group)?;
    Ok(Members {
        store,
        group,
        next: 0,
        count,
    })
}

impl<S: GroupStore> Iterator for Members<'_, S> {
    type Item = Result<Member, S::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.count {
            return None;
        }
        let index = self.next;
        self.next += 1;
        Some(self.store.member(self.group, index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.count - self.next).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

/// What [`walk`] should do with a member.
pub enum Visit<G> {
    /// Continue with the next sibling.
    Skip,
    /// Recurse into `group` (already opened by the visitor), using `path` as
    /// the parent path of its members. The handle is dropped once the
    /// sub-tree has been walked.
    Enter { group: G, path: String },
}

/// Walks `group` depth first, calling `visit` with each member and the
/// logical path of the group it belongs to (empty at the root).
///
/// A member whose URI names a group on the current branch (the root
/// included) would loop forever; it is logged and skipped without reaching
/// `visit`. The first error, from the store or from `visit`, aborts the walk.
pub fn walk<S, F>(store: &S, group: &S::Group, parent: &str, visit: &mut F) -> Result<(), S::Error>
where
    S: GroupStore,
    F: FnMut(&Member, &str) -> Result<Visit<S::Group>, S::Error>,
{
    let mut branch = vec![store.group_uri(group).to_string()];
    walk_branch(store, group, parent, &mut branch, visit)
}

fn walk_branch<S, F>(
    store: &S,
    group: &S::Group,
    parent: &str,
    branch: &mut Vec<String>,
    visit: &mut F,
) -> Result<(), S::Error>
where
    S: GroupStore,
    F: FnMut(&Member, &str) -> Result<Visit<S::Group>, S::Error>,
{
    for member in members(store, group)? {
        let member = member?;
        trace!(parent, name = %member.name, kind = ?member.kind, uri = %member.uri, "member");
        if branch.contains(&normalize(&member.uri)) {
            warn!(parent, name = %member.name, uri = %member.uri, "skipping cyclic member");
            continue;
        }
        if let Visit::Enter { group, path } = visit(&member, parent)? {
            branch.push(store.group_uri(&group).to_string());
            let walked = walk_branch(store, &group, &path, branch, visit);
            branch.pop();
            walked?;
        }
    }
    Ok(())
}

/// Joins a member name onto a logical parent path.
pub fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}

/// Maps member name to member URI for the direct members of the group at
/// `uri`. Does not recurse.
pub fn member_uris<S: GroupStore>(store: &S, uri: &str) -> Result<ResolvedMap, S::Error> {
    let group = store.open_group(uri)?;
    members(store, &group)?
        .map(|member| member.map(|m| (m.name, m.uri)))
        .collect()
}
