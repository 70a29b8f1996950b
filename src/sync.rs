//! A spinlock that disables interrupts for the duration of the critical
//! section, so a timer interrupt can never fire while the lock is held and
//! re-enter code that is already holding it.
//!
//! Modeled on the teaching kernel's `sync::spin::mutex::SpinMutex`, minus the
//! per-cpu holder bookkeeping that made sense for its SMP-shaped API but has
//! no referent on Epoxy's single hart.

use core::cell::UnsafeCell;
use core::ops::{Deref, DerefMut};
use core::sync::atomic::{AtomicBool, Ordering};

use crate::interrupt::{self, NestedGuard};

pub struct SpinMutex<T> {
    locked: AtomicBool,
    data: UnsafeCell<T>,
}

unsafe impl<T: Send> Sync for SpinMutex<T> {}

impl<T> SpinMutex<T> {
    pub const fn new(data: T) -> Self {
        Self {
            locked: AtomicBool::new(false),
            data: UnsafeCell::new(data),
        }
    }

    /// Disables interrupts, spins until the lock is acquired, and returns a
    /// guard releasing both on drop.
    ///
    /// There is exactly one hart, so contention only ever happens against
    /// code that forgot to disable interrupts before touching the data;
    /// the spin loop exists to fail loudly (hang) rather than race.
    pub fn lock(&self) -> SpinMutexGuard<'_, T> {
        let intr_guard = interrupt::disable_nested();
        while self
            .locked
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            core::hint::spin_loop();
        }
        SpinMutexGuard {
            mutex: self,
            _intr_guard: intr_guard,
        }
    }
}

pub struct SpinMutexGuard<'a, T> {
    mutex: &'a SpinMutex<T>,
    _intr_guard: NestedGuard,
}

impl<T> Deref for SpinMutexGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        unsafe { &*self.mutex.data.get() }
    }
}

impl<T> DerefMut for SpinMutexGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        unsafe { &mut *self.mutex.data.get() }
    }
}

impl<T> Drop for SpinMutexGuard<'_, T> {
    fn drop(&mut self) {
        self.mutex.locked.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_allows_mutation_and_unlocks_on_drop() {
        let m = SpinMutex::new(0u32);
        {
            let mut guard = m.lock();
            *guard += 1;
        }
        assert_eq!(*m.lock(), 1);
    }

    #[test]
    fn nested_lock_on_disjoint_mutexes_does_not_deadlock() {
        let a = SpinMutex::new(1u32);
        let b = SpinMutex::new(2u32);
        let ga = a.lock();
        let gb = b.lock();
        assert_eq!(*ga + *gb, 3);
    }
}
