/// Errors reported by group backends.
///
/// The in-memory store returns these directly; persistent backends wrap them
/// alongside their own I/O errors. Resolvers never translate them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GroupError {
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("access denied: {0}")]
    AccessDenied(String),
    #[error("not a group: {0}")]
    NotAGroup(String),
    #[error("object already exists: {0}")]
    AlreadyExists(String),
    #[error("group {group} already has a member named {name}")]
    DuplicateMember { group: String, name: String },
    #[error("member index {index} out of range for group {uri}")]
    MemberIndex { uri: String, index: u64 },
}
