//! Error types for registry operations.

use core::fmt;

/// Why a registry mutation was rejected.
///
/// Every variant leaves the tree and the target object unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RegistryError {
    /// Object is already live (double register)
    AlreadyRegistered,
    /// Object is not live (magic mismatch)
    NotRegistered,
    /// Target parent already has a child with this name
    DuplicateName,
    /// A directory component of the path does not exist
    MissingParent,
    /// Final path segment is empty
    InvalidName,
    /// Object still has children linked under it
    HasChildren,
    /// Slot cannot be released while the object is live
    StillRegistered,
    /// Operation is not allowed on the root object
    RootObject,
    /// Handle does not name a reserved slot
    InvalidHandle,
    /// Registry lock held elsewhere
    Busy,
}

impl RegistryError {
    /// Whether the error comes from a violated precondition (a caller bug)
    /// rather than from the current tree contents.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            RegistryError::AlreadyRegistered
                | RegistryError::NotRegistered
                | RegistryError::RootObject
                | RegistryError::InvalidHandle
        )
    }
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::AlreadyRegistered => write!(f, "object is already registered"),
            RegistryError::NotRegistered => write!(f, "object is not registered"),
            RegistryError::DuplicateName => write!(f, "parent already has a child with this name"),
            RegistryError::MissingParent => write!(f, "path names a parent that does not exist"),
            RegistryError::InvalidName => write!(f, "object name is empty"),
            RegistryError::HasChildren => write!(f, "object still has children"),
            RegistryError::StillRegistered => write!(f, "object must be unregistered first"),
            RegistryError::RootObject => write!(f, "operation not allowed on the root object"),
            RegistryError::InvalidHandle => write!(f, "handle does not name a reserved object"),
            RegistryError::Busy => write!(f, "registry lock is held"),
        }
    }
}

/// Returned by `reserve` when every slot is taken; hands the value back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Full<T>(pub T);

impl<T> Full<T> {
    /// Recover the value that could not be stored.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Display for Full<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "object arena is full")
    }
}
