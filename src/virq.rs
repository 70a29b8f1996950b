//! Virtual interrupts: a triggered bit plus a bounded FIFO wait list
//! (`spec.md §4.7`).

use crate::config::NUM_THREADS;
use crate::plic::IrqSource;
use crate::sync::SpinMutexGuard;
use crate::thread::ThreadId;

/// Index into the static virtual-interrupt table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirqId(pub usize);

/// A fixed-capacity FIFO queue of waiting threads, sized by the total
/// thread count so it can never overflow (`spec.md §3` VirtIRQ invariant:
/// "bounded by total thread count").
///
/// Grounded on the original implementation's bounded `vector<T, CAPACITY>`
/// (`original_source`), reimplemented here as a ring buffer over a fixed
/// array rather than a shiftable vector.
pub struct WaitList {
    slots: [Option<ThreadId>; NUM_THREADS],
    head: usize,
    len: usize,
}

impl WaitList {
    pub const fn new() -> Self {
        Self {
            slots: [None; NUM_THREADS],
            head: 0,
            len: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Appends `thread` to the tail. Panics if the list is already at
    /// capacity — this is a kernel-invariant violation (more waiters than
    /// threads exist), not a runtime condition callers need to handle.
    pub fn push_back(&mut self, thread: ThreadId) {
        assert!(self.len < NUM_THREADS, "virq wait list overflow");
        let tail = (self.head + self.len) % NUM_THREADS;
        self.slots[tail] = Some(thread);
        self.len += 1;
    }

    /// Removes and returns the head of the queue, in arrival order.
    pub fn pop_front(&mut self) -> Option<ThreadId> {
        if self.len == 0 {
            return None;
        }
        let thread = self.slots[self.head].take();
        self.head = (self.head + 1) % NUM_THREADS;
        self.len -= 1;
        thread
    }
}

struct VirqState {
    triggered: bool,
    bound_source: Option<IrqSource>,
    waiters: WaitList,
}

/// A single virtual interrupt: a triggered flag, an optional binding to a
/// physical PLIC-routed source, and a bounded FIFO of blocked waiters.
pub struct Virq {
    state: VirqState,
}

impl Virq {
    pub const fn unbound() -> Self {
        Self {
            state: VirqState {
                triggered: false,
                bound_source: None,
                waiters: WaitList::new(),
            },
        }
    }

    pub const fn bound_to(source: IrqSource) -> Self {
        Self {
            state: VirqState {
                triggered: false,
                bound_source: Some(source),
                waiters: WaitList::new(),
            },
        }
    }

    /// Sets the triggered flag; wakes the head waiter, if any.
    ///
    /// Returns the thread that was woken, so the caller (the trigger
    /// kernel object) can mark it Runnable — `Virq` itself does not touch
    /// thread state, only the wait-list bookkeeping.
    pub fn trigger(&mut self) -> Option<ThreadId> {
        self.state.triggered = true;
        self.state.waiters.pop_front()
    }

    /// Reads and clears the triggered flag. If it was set and a physical
    /// source is bound, returns that source so the caller can re-arm
    /// (unmask) it.
    pub fn consume(&mut self) -> (bool, Option<IrqSource>) {
        let was_triggered = self.state.triggered;
        self.state.triggered = false;
        let rearm = if was_triggered {
            self.state.bound_source
        } else {
            None
        };
        (was_triggered, rearm)
    }

    /// Enqueues `thread` as a new waiter. The caller is responsible for
    /// having already marked it Blocked (`spec.md §4.7`: "thread must be
    /// Runnable on entry; becomes Blocked").
    pub fn enqueue_waiter(&mut self, thread: ThreadId) {
        self.state.waiters.push_back(thread);
    }

    #[cfg(test)]
    pub fn reset_for_test(&mut self) {
        self.state.triggered = false;
        self.state.waiters = WaitList::new();
    }
}

/// Locks and returns the virtual interrupt at `id` in the static table.
pub fn get(id: VirqId) -> SpinMutexGuard<'static, Virq> {
    crate::image::VIRQS[id.0].lock()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_without_waiters_only_sets_the_flag() {
        let mut v = Virq::unbound();
        assert_eq!(v.trigger(), None);
        assert_eq!(v.consume(), (true, None));
    }

    #[test]
    fn consume_is_idempotent_per_trigger() {
        let mut v = Virq::unbound();
        v.trigger();
        assert_eq!(v.consume(), (true, None));
        assert_eq!(v.consume(), (false, None));
    }

    #[test]
    fn waiters_are_woken_fifo() {
        let mut v = Virq::unbound();
        v.enqueue_waiter(ThreadId(1));
        v.enqueue_waiter(ThreadId(2));
        v.enqueue_waiter(ThreadId(3));

        assert_eq!(v.trigger(), Some(ThreadId(1)));
        assert_eq!(v.trigger(), Some(ThreadId(2)));
        assert_eq!(v.trigger(), Some(ThreadId(3)));
        assert_eq!(v.trigger(), None);
    }

    #[test]
    fn bound_source_is_returned_only_when_flag_was_set() {
        let mut v = Virq::bound_to(IrqSource(5));
        assert_eq!(v.consume(), (false, None));
        v.trigger();
        assert_eq!(v.consume(), (true, Some(IrqSource(5))));
    }
}
