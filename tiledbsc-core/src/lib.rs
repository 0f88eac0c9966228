//! Resolves the group layout of a TileDB single-cell store into flat
//! name → URI maps.
//!
//! Core concepts:
//! - **GroupStore**: the storage backend; opens groups and enumerates their members
//! - **Member**: a `(name, uri, kind)` entry of a group, where kind is group or array
//! - **Soma**: a dataset; resolves every array reachable from its root group
//! - **SomaCollection**: a collection; resolves every dataset reachable from its root
//!
//! # Example
//!
//! ```
//! use tiledbsc_core::{GroupWriter, MemoryGroupStore, Soma, SomaCollection};
//!
//! let store = MemoryGroupStore::new();
//! store.create_group("file:///data/soco").unwrap();
//! store.create_group("file:///data/soco/pbmc").unwrap();
//! store.create_array("file:///data/soco/pbmc/obs").unwrap();
//! store.add_member("file:///data/soco/pbmc", "obs", "obs", true).unwrap();
//! store.add_member("file:///data/soco", "pbmc", "pbmc", true).unwrap();
//!
//! let soco = SomaCollection::open(&store, "file:///data/soco/");
//! for (name, uri) in soco.list_somas().unwrap() {
//!     let soma = Soma::open(&store, uri);
//!     assert_eq!(name, "pbmc");
//!     assert_eq!(soma.list_arrays().unwrap().len(), 1);
//! }
//! ```

mod collection;
mod error;
mod group;
mod manifest;
mod memory;
mod soma;
pub mod uri;
mod walker;

pub use collection::{SOMA_MARKER, SomaCollection, is_soma};
pub use error::GroupError;
pub use group::{GroupStore, GroupWriter, Member, ObjectKind, ResolvedMap};
pub use manifest::{Manifest, ManifestMember};
pub use memory::{MemoryGroup, MemoryGroupStore};
pub use soma::Soma;
pub use uri::{UriKind, is_tiledb_uri};
pub use walker::{Members, Visit, join_path, member_uris, members, walk};
