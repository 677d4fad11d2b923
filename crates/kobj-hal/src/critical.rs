//! Scoped interrupt masking
//!
//! A [`CriticalSection`] masks interrupts when it is created and unmasks
//! them when it is dropped. Because the unmask lives in `Drop`, it runs on
//! normal return, on `?` early returns, and while unwinding from a panic
//! raised by [`ObjectHal::check`].
//!
//! Sections nest: only the outermost guard unmasks, so a lookup made from
//! inside a locked read does not open an interrupt window.

use crate::ObjectHal;

/// RAII guard that keeps interrupts masked for its lifetime.
#[must_use = "interrupts are unmasked as soon as the guard is dropped"]
pub struct CriticalSection<'a, H: ObjectHal + ?Sized> {
    hal: &'a H,
    /// Interrupts were enabled on entry
    restore: bool,
}

impl<'a, H: ObjectHal + ?Sized> CriticalSection<'a, H> {
    /// Mask interrupts and return the guard.
    pub fn enter(hal: &'a H) -> Self {
        let restore = hal.disable_interrupts();
        Self { hal, restore }
    }

    /// The HAL this section was entered on.
    pub fn hal(&self) -> &'a H {
        self.hal
    }
}

impl<H: ObjectHal + ?Sized> Drop for CriticalSection<'_, H> {
    fn drop(&mut self) {
        if self.restore {
            self.hal.enable_interrupts();
        }
    }
}

impl<H: ObjectHal + ?Sized> core::fmt::Debug for CriticalSection<'_, H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CriticalSection")
            .field("restore", &self.restore)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
