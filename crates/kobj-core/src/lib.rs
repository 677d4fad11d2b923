//! Kernel Object Core - Pure Object Tree for Formal Verification
//!
//! This crate contains the **pure, HAL-free** object tree behind the kernel
//! object registry. It names kernel objects (devices, buses, drivers) by
//! `/`-separated paths without allocating per object.
//!
//! # Design Principles
//!
//! 1. **No HAL dependency**: Interrupt masking, locking and output live in
//!    `kobj-registry`
//! 2. **No allocation on hot paths**: Fixed arena, intrusive lists, inline names
//! 3. **Handles, not pointers**: Objects are addressed by [`ObjectId`]; links
//!    by [`LinkId`](list::LinkId)
//! 4. **Verifiable**: Small enough for Kani harnesses over tiny arenas
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        kobj-core                            │
//! │                   (Pure Object Tree)                        │
//! │                                                             │
//! │   ┌───────────────┐    ┌───────────────┐                   │
//! │   │  ObjectTree   │    │  PathCursor   │                   │
//! │   │  - root       │───▶│  one segment  │                   │
//! │   │  - slots[N]   │    │  per hop      │                   │
//! │   └───────────────┘    └───────────────┘                   │
//! │          │                                                  │
//! │          ▼                                                  │
//! │   ┌───────────────┐    ┌───────────────┐                   │
//! │   │  list         │    │  Invariants   │                   │
//! │   │  circular,    │    │  Assertions   │                   │
//! │   │  arena-backed │    └───────────────┘                   │
//! │   └───────────────┘                                         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              │ used by
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     kobj-registry                           │
//! │                   (Runtime Wrapper)                         │
//! │                                                             │
//! │   - Interrupt masking via kobj-hal                          │
//! │   - Reader/writer lock around the tree                      │
//! │   - Event logging and tree dumps                            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Verification Strategy
//!
//! - **Kani proofs**: List symmetry, invariants preserved by register/unregister
//! - **Property tests**: Random operation sequences checked against invariants
//! - **Loom tests**: Lock discipline of the runtime wrapper
//!
//! # Module Organization
//!
//! - `config` - Compile-time constants (`NAME_MAX`, magic, capacity)
//! - `types` - Handles, names, policies and walk entries
//! - `list` - Intrusive circular list over arena links
//! - `path` - Allocation-free path cursor
//! - `tree` - `ObjectTree` with all registry operations
//! - `error` - `RegistryError` and `Full`
//! - `invariants` - Formal invariant assertions for verification

#![no_std]
extern crate alloc;

pub mod config;
pub mod error;
pub mod invariants;
pub mod list;
pub mod path;
pub mod tree;
pub mod types;

// Re-export all public types for convenient access
pub use config::{DEFAULT_CAPACITY, DUMP_INDENT, NAME_MAX, OBJECT_MAGIC, ROOT_NAME};
pub use error::{Full, RegistryError};
pub use invariants::{check_all_invariants, check_structure, orphans, InvariantViolation};
pub use tree::{Children, Descent, Object, ObjectTree, Walk};
pub use types::{ObjectId, ObjectName, TreeEntry, UnregisterPolicy};
