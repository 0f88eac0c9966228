//! URI classification and normalization.
//!
//! URIs are treated as opaque strings. The only structure the resolvers care
//! about is whether a URI is registered under a `tiledb://` namespace, which is
//! decided by a prefix test rather than a full parse.

/// Prefix of URIs addressed through the TileDB Cloud registry.
pub const TILEDB_SCHEME: &str = "tiledb://";

/// How a URI is addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UriKind {
    /// Registered under a `tiledb://` namespace.
    Registered,
    /// Filesystem-like location: local path, `file://`, `s3://`, ...
    Path,
}

impl UriKind {
    pub fn of(uri: &str) -> Self {
        if uri.starts_with(TILEDB_SCHEME) {
            UriKind::Registered
        } else {
            UriKind::Path
        }
    }
}

/// Returns true if `uri` is registered under a `tiledb://` namespace.
pub fn is_tiledb_uri(uri: &str) -> bool {
    UriKind::of(uri) == UriKind::Registered
}

/// Removes all trailing `/` from `uri`.
pub fn normalize(uri: &str) -> String {
    uri.trim_end_matches('/').to_string()
}

/// Appends a relative path to a base URI.
pub fn join_uri(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path)
}
