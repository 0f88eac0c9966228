use std::cell::OnceCell;

use tracing::{debug, instrument};

use crate::group::{GroupStore, ObjectKind, ResolvedMap};
use crate::soma::Soma;
use crate::uri::normalize;
use crate::walker::{Visit, members, walk};

/// Name of the array whose presence marks a group as a SOMA.
pub const SOMA_MARKER: &str = "obs";

/// Returns true if `group` has an array member named [`SOMA_MARKER`].
pub fn is_soma<S: GroupStore>(store: &S, group: &S::Group) -> Result<bool, S::Error> {
    for member in members(store, group)? {
        let member = member?;
        if member.name == SOMA_MARKER && member.kind == ObjectKind::Array {
            return Ok(true);
        }
    }
    Ok(false)
}

/// A collection of SOMAs rooted at a group.
///
/// Sub-groups that are SOMAs are recorded under their member name; any other
/// sub-group is treated as a nested collection and its SOMAs are merged into
/// the same flat map. Arrays directly inside a collection are ignored.
pub struct SomaCollection<'s, S: GroupStore> {
    store: &'s S,
    uri: String,
    somas: OnceCell<ResolvedMap>,
}

impl<'s, S: GroupStore> SomaCollection<'s, S> {
    /// Creates a collection handle rooted at `uri`. Trailing `/` are removed.
    pub fn open(store: &'s S, uri: impl AsRef<str>) -> Self {
        SomaCollection {
            store,
            uri: normalize(uri.as_ref()),
            somas: OnceCell::new(),
        }
    }

    /// The normalized root URI.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Returns every SOMA reachable from the collection, keyed by member name.
    ///
    /// SOMA URIs are recorded exactly as the store reports them: collection
    /// members may live under other storage backends or namespaces, so they
    /// are never rewritten relative to the collection root.
    ///
    /// Every sub-group is opened to check for the SOMA marker; if any of them
    /// cannot be opened the whole listing fails. Memoized like
    /// [`Soma::list_arrays`].
    #[instrument(skip(self), fields(uri = %self.uri))]
    pub fn list_somas(&self) -> Result<&ResolvedMap, S::Error> {
        if let Some(somas) = self.somas.get() {
            return Ok(somas);
        }
        let somas = self.build_uri_map()?;
        debug!(somas = somas.len(), "resolved collection");
        Ok(self.somas.get_or_init(|| somas))
    }

    /// Opens a [`Soma`] for every SOMA of the collection, keyed by name.
    pub fn somas(&self) -> Result<Vec<(&str, Soma<'s, S>)>, S::Error> {
        Ok(self
            .list_somas()?
            .iter()
            .map(|(name, uri)| (name.as_str(), Soma::open(self.store, uri)))
            .collect())
    }

    fn build_uri_map(&self) -> Result<ResolvedMap, S::Error> {
        let root = self.store.open_group(&self.uri)?;
        let mut somas = ResolvedMap::new();

        walk(self.store, &root, "", &mut |member, _| {
            if member.kind != ObjectKind::Group {
                return Ok(Visit::Skip);
            }
            let group = self.store.open_group(&member.uri)?;
            if is_soma(self.store, &group)? {
                debug!(name = %member.name, uri = %member.uri, "found soma");
                somas.insert(member.name.clone(), member.uri.clone());
                Ok(Visit::Skip)
            } else {
                // Nested collection: flatten its SOMAs into this map.
                Ok(Visit::Enter {
                    group,
                    path: String::new(),
                })
            }
        })?;

        Ok(somas)
    }
}
