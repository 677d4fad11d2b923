//! Build-time configuration
//!
//! Name capacity is selected with cargo features so that every crate in a
//! firmware image agrees on the buffer size.

/// Maximum stored object-name length in bytes.
#[cfg(not(any(feature = "name-max-32", feature = "name-max-64")))]
pub const NAME_MAX: usize = 16;

/// Maximum stored object-name length in bytes.
#[cfg(all(feature = "name-max-32", not(feature = "name-max-64")))]
pub const NAME_MAX: usize = 32;

/// Maximum stored object-name length in bytes.
#[cfg(feature = "name-max-64")]
pub const NAME_MAX: usize = 64;

/// Tag stored in a live object. Anything else means "not registered".
pub const OBJECT_MAGIC: u32 = 0xDEAD_BEEF;

/// Path separator.
pub const SEPARATOR: u8 = b'/';

/// Name of the singleton root object.
pub const ROOT_NAME: &str = "root";

/// Columns of indentation per tree level in a dump.
pub const DUMP_INDENT: usize = 5;

/// Arena capacity used by the process-wide registry.
pub const DEFAULT_CAPACITY: usize = 64;
