use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::group::GroupWriter;
use crate::uri::is_tiledb_uri;

/// Declarative description of a store layout.
///
/// ```json
/// {
///   "arrays": ["file:///data/soco/pbmc/obs", "tiledb://acct/X-abc123"],
///   "groups": {
///     "file:///data/soco": [{ "name": "pbmc" }],
///     "file:///data/soco/pbmc": [
///       { "name": "obs" },
///       { "name": "X", "uri": "tiledb://acct/X-abc123" }
///     ]
///   }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub arrays: Vec<String>,
    /// Group URI to its members, in member order.
    #[serde(default)]
    pub groups: IndexMap<String, Vec<ManifestMember>>,
}

/// A group member as written in a [`Manifest`].
///
/// Without a `uri` the member lives under the group at its own name. With a
/// `uri`, `relative` defaults to false for `tiledb://` URIs and true
/// otherwise; a relative member is stored as `group/name`, so local layouts
/// stay relocatable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestMember {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative: Option<bool>,
}

impl ManifestMember {
    /// The URI to hand to [`GroupWriter::add_member`], and whether it is
    /// relative to the group.
    pub fn target(&self) -> (&str, bool) {
        match &self.uri {
            None => (self.name.as_str(), true),
            Some(uri) => {
                let relative = self.relative.unwrap_or_else(|| !is_tiledb_uri(uri));
                if relative {
                    (self.name.as_str(), true)
                } else {
                    (uri.as_str(), false)
                }
            }
        }
    }
}

impl Manifest {
    /// Writes the layout: arrays first, then groups, then members, so
    /// members may reference any object of the manifest.
    pub fn apply<W: GroupWriter>(&self, writer: &W) -> Result<(), W::Error> {
        for uri in &self.arrays {
            writer.create_array(uri)?;
        }
        for uri in self.groups.keys() {
            writer.create_group(uri)?;
        }
        for (group, members) in &self.groups {
            for member in members {
                let (uri, relative) = member.target();
                writer.add_member(group, &member.name, uri, relative)?;
            }
        }
        Ok(())
    }
}
