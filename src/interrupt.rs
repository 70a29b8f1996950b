//! Global interrupt enable/disable, with a nesting-aware RAII guard.
//!
//! `spec.md §5` requires interrupts disabled from trap entry to the next
//! exit to user mode, and requires every write to the current-thread /
//! current-process globals to happen with interrupts disabled. This module
//! is the single choke point for both.

#[cfg(target_arch = "riscv64")]
mod hw {
    use riscv::register::sstatus;

    #[inline]
    pub fn enable() {
        unsafe { sstatus::set_sie() };
    }

    #[inline]
    pub fn disable() {
        unsafe { sstatus::clear_sie() };
    }

    #[inline]
    pub fn is_enabled() -> bool {
        sstatus::read().sie()
    }
}

#[cfg(not(target_arch = "riscv64"))]
mod hw {
    use core::sync::atomic::{AtomicBool, Ordering};

    static ENABLED: AtomicBool = AtomicBool::new(false);

    #[inline]
    pub fn enable() {
        ENABLED.store(true, Ordering::SeqCst);
    }

    #[inline]
    pub fn disable() {
        ENABLED.store(false, Ordering::SeqCst);
    }

    #[inline]
    pub fn is_enabled() -> bool {
        ENABLED.load(Ordering::SeqCst)
    }
}

use core::sync::atomic::{AtomicUsize, Ordering};

/// Nesting depth of [`disable_nested`] guards currently held.
static NEST_COUNT: AtomicUsize = AtomicUsize::new(0);
/// Interrupt state saved by the outermost nested guard, restored when it drops.
static SAVED_STATE: AtomicUsize = AtomicUsize::new(0);

/// Globally enables supervisor interrupts.
#[inline]
pub fn enable() {
    hw::enable();
}

/// Globally disables supervisor interrupts.
#[inline]
pub fn disable() {
    hw::disable();
}

/// Returns whether supervisor interrupts are currently enabled.
#[inline]
pub fn is_enabled() -> bool {
    hw::is_enabled()
}

/// RAII guard disabling interrupts for the lifetime of the critical section.
///
/// Nested guards compose correctly: only the outermost guard's drop
/// restores the interrupt state that was in effect before the first guard
/// was taken.
pub struct NestedGuard {
    _private: (),
}

/// Disables interrupts, returning a guard that restores the prior state on
/// drop. Safe to call while already inside another such guard.
pub fn disable_nested() -> NestedGuard {
    let was_enabled = is_enabled();
    disable();

    if NEST_COUNT.fetch_add(1, Ordering::Acquire) == 0 {
        SAVED_STATE.store(was_enabled as usize, Ordering::Relaxed);
    }

    NestedGuard { _private: () }
}

impl Drop for NestedGuard {
    fn drop(&mut self) {
        if NEST_COUNT.fetch_sub(1, Ordering::Release) == 1 {
            if SAVED_STATE.load(Ordering::Relaxed) != 0 {
                enable();
            }
        }
    }
}
