//! Kernel Object Registry
//!
//! Runtime wrapper around the pure [`kobj_core::ObjectTree`]:
//! - Interrupt masking through [`kobj_hal::CriticalSection`]
//! - Reader/writer locking that never spins inside a masked section
//! - Event logging via the `log` facade
//! - Tree dumps through the HAL print sink
//! - A process-wide singleton in [`global`]
//!
//! # Example
//!
//! ```
//! use kobj_hal::NullHal;
//! use kobj_registry::{ObjectId, ObjectRegistry};
//!
//! let registry: ObjectRegistry<NullHal, &str, 8> = ObjectRegistry::new(NullHal);
//! let bus = registry.reserve("i2c bus").unwrap();
//! let dev = registry.reserve("temp sensor").unwrap();
//!
//! registry.register(bus, "i2c0").unwrap();
//! registry.register(dev, "/i2c0/tmp102").unwrap();
//!
//! assert_eq!(registry.find("i2c0/tmp102"), Some(dev));
//! assert_eq!(registry.parent_get(dev), Some(bus));
//! assert_eq!(registry.parent_get(bus), Some(ObjectId::ROOT));
//! ```
//!
//! # Verification
//!
//! 1. **Unit and integration tests**: scenario coverage with a recording HAL
//! 2. **Property tests** (`proptest`): random operation sequences against the
//!    invariant checker
//! 3. **Loom tests** (`cargo test --features loom`): lock discipline under
//!    concurrent mutators

#![no_std]
extern crate alloc;

pub mod global;
mod registry;


pub use registry::{ObjectRegistry, ReserveError};

// Re-export core types so ports depend on one crate
pub use kobj_core::{
    InvariantViolation, Object, ObjectId, ObjectName, ObjectTree, RegistryError, TreeEntry,
    UnregisterPolicy, DEFAULT_CAPACITY, NAME_MAX,
};
pub use kobj_hal::{CriticalSection, NullHal, ObjectHal};
