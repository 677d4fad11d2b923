//! Process-wide registry singleton
//!
//! Most firmware has exactly one object tree. [`REGISTRY`] is that tree,
//! statically allocated with [`DEFAULT_CAPACITY`] slots and no payload. The
//! board support code installs its HAL once at boot with [`install_hal`];
//! until then every hook is a no-op.
//!
//! The free functions below forward to [`REGISTRY`].

use alloc::vec::Vec;
use core::fmt;

use kobj_core::{InvariantViolation, Object, ObjectId, ObjectTree, RegistryError, DEFAULT_CAPACITY};
use kobj_hal::ObjectHal;
use spin::Once;

use crate::registry::{ObjectRegistry, ReserveError};

static HAL: Once<&'static dyn ObjectHal> = Once::new();

/// Install the platform HAL used by [`REGISTRY`].
///
/// Only the first call has an effect; returns whether this call installed.
pub fn install_hal(hal: &'static dyn ObjectHal) -> bool {
    let mut installed = false;
    HAL.call_once(|| {
        installed = true;
        hal
    });
    installed
}

/// Forwards every hook to the HAL passed to [`install_hal`].
#[derive(Clone, Copy, Debug, Default)]
pub struct GlobalHal;

impl ObjectHal for GlobalHal {
    fn disable_interrupts(&self) -> bool {
        HAL.get().map_or(true, |hal| hal.disable_interrupts())
    }

    fn enable_interrupts(&self) {
        if let Some(hal) = HAL.get() {
            hal.enable_interrupts();
        }
    }

    fn print(&self, line: fmt::Arguments<'_>) {
        if let Some(hal) = HAL.get() {
            hal.print(line);
        }
    }

    fn check(&self, ok: bool, what: &'static str) {
        if let Some(hal) = HAL.get() {
            hal.check(ok, what);
        }
    }
}

/// The process-wide registry.
pub static REGISTRY: ObjectRegistry<GlobalHal, (), DEFAULT_CAPACITY> =
    ObjectRegistry::new(GlobalHal);

/// See [`ObjectRegistry::find`].
pub fn find(path: &str) -> Option<ObjectId> {
    REGISTRY.find(path)
}

/// See [`ObjectRegistry::register`].
pub fn register(id: ObjectId, path: &str) -> Result<(), RegistryError> {
    REGISTRY.register(id, path)
}

/// See [`ObjectRegistry::unregister`].
pub fn unregister(id: ObjectId) -> Result<(), RegistryError> {
    REGISTRY.unregister(id)
}

/// See [`ObjectRegistry::parent_get`].
pub fn parent_get(id: ObjectId) -> Option<ObjectId> {
    REGISTRY.parent_get(id)
}

/// See [`ObjectRegistry::tree_print`].
pub fn tree_print(from: Option<ObjectId>) {
    REGISTRY.tree_print(from)
}

/// Claim a slot in the singleton arena.
pub fn reserve() -> Result<ObjectId, ReserveError<()>> {
    REGISTRY.reserve(())
}

/// See [`ObjectRegistry::release`].
pub fn release(id: ObjectId) -> Result<(), RegistryError> {
    REGISTRY.release(id)
}

/// See [`ObjectRegistry::with_tree`].
pub fn with_tree<R>(f: impl FnOnce(&ObjectTree<(), DEFAULT_CAPACITY>) -> R) -> R {
    REGISTRY.with_tree(f)
}

/// See [`ObjectRegistry::with_object`].
pub fn with_object<R>(id: ObjectId, f: impl FnOnce(&Object) -> R) -> Option<R> {
    REGISTRY.with_object(id, |object, _| f(object))
}

/// See [`ObjectRegistry::check_invariants`].
pub fn check_invariants() -> Vec<InvariantViolation> {
    REGISTRY.check_invariants()
}
