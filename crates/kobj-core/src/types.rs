//! Core registry types
//!
//! Plain data shared by the tree, the list primitives and the runtime
//! wrapper. Nothing here depends on a HAL.

use core::fmt;

use crate::config::NAME_MAX;
use crate::path::clamp_name;

/// Handle to an object slot in an [`ObjectTree`](crate::ObjectTree).
///
/// Index 0 is always the root; user slots are `1..=capacity`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectId(pub u16);

impl ObjectId {
    /// The singleton root object.
    pub const ROOT: ObjectId = ObjectId(0);

    /// Whether this handle names the root.
    pub const fn is_root(self) -> bool {
        self.0 == 0
    }

    /// Raw slot index.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "obj#{}", self.0)
    }
}

/// Fixed-capacity object name.
///
/// Holds at most [`NAME_MAX`] bytes. Longer input is truncated, which can
/// split a multi-byte character; [`ObjectName::as_str`] then shows the
/// valid prefix while comparisons keep using the raw bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectName {
    bytes: [u8; NAME_MAX],
    len: u8,
}

impl ObjectName {
    /// The empty name.
    pub const EMPTY: ObjectName = ObjectName {
        bytes: [0; NAME_MAX],
        len: 0,
    };

    /// Build a name from the first `NAME_MAX` bytes of `bytes`.
    pub const fn new(bytes: &[u8]) -> Self {
        let len = if bytes.len() < NAME_MAX {
            bytes.len()
        } else {
            NAME_MAX
        };
        let mut buf = [0u8; NAME_MAX];
        let mut i = 0;
        while i < len {
            buf[i] = bytes[i];
            i += 1;
        }
        Self {
            bytes: buf,
            len: len as u8,
        }
    }

    /// Stored bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    /// Stored length in bytes.
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Whether the name is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether `segment` names this object.
    ///
    /// Only the first `NAME_MAX` bytes of `segment` take part, so any
    /// segment sharing a truncated name's prefix matches it.
    pub fn matches(&self, segment: &[u8]) -> bool {
        clamp_name(segment) == self.as_bytes()
    }

    /// The longest valid UTF-8 prefix of the stored bytes.
    pub fn as_str(&self) -> &str {
        let bytes = self.as_bytes();
        match core::str::from_utf8(bytes) {
            Ok(s) => s,
            Err(e) => core::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or_default(),
        }
    }
}

impl Default for ObjectName {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl From<&str> for ObjectName {
    fn from(name: &str) -> Self {
        Self::new(name.as_bytes())
    }
}

impl PartialEq<str> for ObjectName {
    fn eq(&self, other: &str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl PartialEq<&str> for ObjectName {
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // pad() so dumps can left-align names to a fixed column
        f.pad(self.as_str())
    }
}

impl fmt::Debug for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectName({:?})", self.as_str())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ObjectName {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ObjectName {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct NameVisitor;

        impl serde::de::Visitor<'_> for NameVisitor {
            type Value = ObjectName;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object name")
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<ObjectName, E> {
                Ok(ObjectName::new(v.as_bytes()))
            }
        }

        deserializer.deserialize_str(NameVisitor)
    }
}

/// What `unregister` does with a node that still has children.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnregisterPolicy {
    /// Unlink anyway; children keep pointing at the dead parent and drop
    /// out of path lookups until they are unregistered or the parent is
    /// registered again.
    #[default]
    Orphan,
    /// Refuse with [`RegistryError::HasChildren`](crate::RegistryError::HasChildren).
    RejectNonEmpty,
}

/// One node visited by a pre-order walk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeEntry {
    /// Object visited
    pub id: ObjectId,
    /// Distance from the walk's starting node (0 for the start itself)
    pub depth: usize,
    /// Object name at the time of the walk
    pub name: ObjectName,
}
