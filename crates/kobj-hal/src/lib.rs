//! Platform hook trait for the kernel object registry
//!
//! The registry core never touches hardware. Everything platform-specific
//! it needs goes through [`ObjectHal`]:
//!
//! - Interrupt masking around every registry lock acquisition
//! - A line-oriented print sink for tree dumps
//! - An assertion hook for precondition checks
//!
//! Every hook is a no-op by default, so a port only overrides what it has.
//!
//! # Platform Implementations
//!
//! - **Host / tests**: [`NullHal`], or a recording mock
//! - **Cortex-M**: `cpsid i` / `cpsie i`, RTT or UART for `print`
//! - **x86_64**: `cli` / `sti`, COM1 serial for `print`

#![no_std]

use core::fmt;

pub mod critical;

pub use critical::CriticalSection;

/// Platform hooks consumed by the object registry.
///
/// Implementations must be `Sync` because the registry is usually a
/// `static` shared between thread context and interrupt handlers.
pub trait ObjectHal: Sync {
    // === Interrupts ===

    /// Mask interrupts on the current core.
    ///
    /// Returns whether interrupts were enabled before the call. A
    /// [`CriticalSection`] only unmasks on drop when this was `true`, which
    /// makes nested sections safe.
    fn disable_interrupts(&self) -> bool {
        true
    }

    /// Unmask interrupts on the current core.
    ///
    /// Called when the outermost [`CriticalSection`] is dropped, on every
    /// exit path.
    fn enable_interrupts(&self) {}

    // === Output ===

    /// Emit one line of text to the platform console.
    ///
    /// The line carries no terminator; the sink appends whatever its
    /// console needs (`\r\n` on a UART).
    fn print(&self, _line: fmt::Arguments<'_>) {}

    // === Assertions ===

    /// Report a precondition check.
    ///
    /// `ok` is false when the precondition described by `what` was violated.
    /// A debug port may panic here; the registry still rejects the call with
    /// an error when the hook returns.
    fn check(&self, _ok: bool, _what: &'static str) {}
}

impl<H: ObjectHal + ?Sized> ObjectHal for &H {
    fn disable_interrupts(&self) -> bool {
        (**self).disable_interrupts()
    }

    fn enable_interrupts(&self) {
        (**self).enable_interrupts()
    }

    fn print(&self, line: fmt::Arguments<'_>) {
        (**self).print(line)
    }

    fn check(&self, ok: bool, what: &'static str) {
        (**self).check(ok, what)
    }
}

/// HAL with every hook left as a no-op.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NullHal;

impl ObjectHal for NullHal {}
