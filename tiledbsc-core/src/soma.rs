use std::cell::OnceCell;

use tracing::{debug, instrument};

use crate::group::{GroupStore, ObjectKind, ResolvedMap};
use crate::uri::{is_tiledb_uri, join_uri, normalize};
use crate::walker::{Visit, join_path, walk};

#[derive(Debug, Default)]
struct Listing {
    arrays: ResolvedMap,
    uri_override: bool,
}

/// A single-cell dataset rooted at a group.
///
/// [`list_arrays`](Soma::list_arrays) flattens every array reachable from the
/// root into a map keyed by its `/`-joined logical path. The first successful
/// listing is memoized; build a new `Soma` to observe later store changes.
pub struct Soma<'s, S: GroupStore> {
    store: &'s S,
    uri: String,
    listing: OnceCell<Listing>,
}

impl<'s, S: GroupStore> Soma<'s, S> {
    /// Creates a dataset handle rooted at `uri`. Trailing `/` are removed.
    ///
    /// Nothing is read from the store until the first listing.
    pub fn open(store: &'s S, uri: impl AsRef<str>) -> Self {
        Soma {
            store,
            uri: normalize(uri.as_ref()),
            listing: OnceCell::new(),
        }
    }

    /// The normalized root URI.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Returns every array of the dataset, keyed by logical path.
    ///
    /// Array URIs registered under `tiledb://` are replaced by `root/path`
    /// when the root itself is not registered, so a dataset copied to a new
    /// location still resolves its arrays under the new root. Under a
    /// registered root, member URIs are used as reported.
    ///
    /// Fails if any group in the tree cannot be opened; nothing is memoized
    /// in that case.
    #[instrument(skip(self), fields(uri = %self.uri))]
    pub fn list_arrays(&self) -> Result<&ResolvedMap, S::Error> {
        if let Some(listing) = self.listing.get() {
            return Ok(&listing.arrays);
        }
        let listing = self.build_uri_map()?;
        debug!(
            arrays = listing.arrays.len(),
            uri_override = listing.uri_override,
            "resolved soma"
        );
        Ok(&self.listing.get_or_init(|| listing).arrays)
    }

    /// True if the last listing rewrote at least one registered array URI
    /// relative to the root. False before the first successful listing.
    pub fn group_uri_override(&self) -> bool {
        self.listing.get().is_some_and(|l| l.uri_override)
    }

    fn build_uri_map(&self) -> Result<Listing, S::Error> {
        let root = self.store.open_group(&self.uri)?;
        let root_registered = is_tiledb_uri(&self.uri);
        let mut listing = Listing::default();

        walk(self.store, &root, "", &mut |member, parent| {
            let path = join_path(parent, &member.name);
            match member.kind {
                ObjectKind::Group => Ok(Visit::Enter {
                    group: self.store.open_group(&member.uri)?,
                    path,
                }),
                ObjectKind::Array => {
                    let uri = if is_tiledb_uri(&member.uri) && !root_registered {
                        // Registered member under an unregistered root:
                        // address it through the root instead.
                        let uri = join_uri(&self.uri, &path);
                        debug!(%path, member_uri = %member.uri, %uri, "overriding member uri");
                        listing.uri_override = true;
                        uri
                    } else {
                        member.uri.clone()
                    };
                    listing.arrays.insert(path, uri);
                    Ok(Visit::Skip)
                }
            }
        })?;

        Ok(listing)
    }
}
