//! Kernel objects: the one polymorphic handle every syscall ultimately
//! invokes (`spec.md §4.6`).
//!
//! The original source dispatches virtually; `spec.md §9` ("Polymorphic
//! kernel objects") asks for a tagged-variant enum instead, so dispatch is
//! a single `match` with no indirect calls and no vtable.

pub mod log;

use crate::result::SyscallResult;
use crate::state;
use crate::thread::{self, ThreadId, ThreadState};
use crate::virq::{self, VirqId};
use log::LogObject;

/// Index into the static kernel-object table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelObjectId(pub usize);

/// Why an invocation does not return control to the caller in the
/// ordinary way (`spec.md §9` "Exit path without return").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DivergingAction {
    /// Enter the scheduler; some thread (possibly this one) will run next.
    Reschedule,
    /// The last thread has exited; request firmware shutdown.
    Shutdown,
}

/// Result of invoking a kernel object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvokeOutcome {
    /// The syscall completes normally; write `code` into `a0` and resume
    /// the caller.
    Continue(SyscallResult),
    /// The caller will not resume via the ordinary path; act on `action`
    /// instead (`spec.md §4.2`: "may instead block the current thread and
    /// hand control to the scheduler, or it may terminate the process").
    DoesNotReturn(DivergingAction),
}

/// One kernel service, statically allocated, reached only through a
/// process's capability table.
pub enum KernelObject {
    Log(LogObject),
    Exit,
    VirqTrigger(VirqId),
    VirqWait(VirqId),
}

impl KernelObject {
    /// Invokes this object on behalf of the current `thread` with syscall
    /// argument `a1`.
    ///
    /// Only `a1` is consumed by any object in this design (the log
    /// object's character payload); `a2..a4` are reserved for future
    /// objects and are never read here, matching `spec.md §4.6`'s
    /// "Individual objects in this design never fail" and pass the rest
    /// of the payload through untouched.
    pub fn invoke(&self, thread: ThreadId, a1: usize) -> InvokeOutcome {
        match self {
            KernelObject::Log(log) => {
                log.write_byte(a1 as u8);
                InvokeOutcome::Continue(SyscallResult::Ok)
            }
            KernelObject::Exit => invoke_exit(thread),
            KernelObject::VirqTrigger(id) => invoke_trigger(*id),
            KernelObject::VirqWait(id) => invoke_wait(thread, *id),
        }
    }
}

fn invoke_exit(thread: ThreadId) -> InvokeOutcome {
    thread::get(thread).state = ThreadState::Exited;
    if state::thread_exited() > 0 {
        InvokeOutcome::DoesNotReturn(DivergingAction::Reschedule)
    } else {
        InvokeOutcome::DoesNotReturn(DivergingAction::Shutdown)
    }
}

fn invoke_trigger(id: VirqId) -> InvokeOutcome {
    if let Some(waiter) = virq::get(id).trigger() {
        thread::get(waiter).state = ThreadState::Runnable;
    }
    InvokeOutcome::Continue(SyscallResult::Ok)
}

/// Returns the kernel object at `id` in the static kernel-object table.
pub fn get(id: KernelObjectId) -> &'static KernelObject {
    &crate::image::KOBJECTS[id.0]
}

fn invoke_wait(thread: ThreadId, id: VirqId) -> InvokeOutcome {
    let (was_triggered, rearm) = virq::get(id).consume();
    if was_triggered {
        if let Some(source) = rearm {
            crate::plic::unmask(source);
        }
        return InvokeOutcome::Continue(SyscallResult::Ok);
    }

    thread::get(thread).state = ThreadState::Blocked;
    virq::get(id).enqueue_waiter(thread);
    InvokeOutcome::DoesNotReturn(DivergingAction::Reschedule)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Threads 0/1 belong to the image's processes 0/1 (`image.rs`); the exit
    // tests below only touch these two, and the virq tests only touch
    // thread 2 (process A) and the image's single virq, so the two groups
    // never contend over the same static slot.
    fn reset_runnable(id: ThreadId) {
        thread::get(id).state = ThreadState::Runnable;
    }

    #[test]
    fn exit_reschedules_while_other_threads_remain_runnable() {
        state::reset_for_test(2);
        reset_runnable(ThreadId(0));
        reset_runnable(ThreadId(1));

        let outcome = invoke_exit(ThreadId(0));

        assert_eq!(outcome, InvokeOutcome::DoesNotReturn(DivergingAction::Reschedule));
        assert_eq!(thread::get(ThreadId(0)).state, ThreadState::Exited);

        reset_runnable(ThreadId(0));
    }

    #[test]
    fn exit_of_the_last_thread_requests_shutdown() {
        state::reset_for_test(1);
        reset_runnable(ThreadId(1));

        let outcome = invoke_exit(ThreadId(1));

        assert_eq!(outcome, InvokeOutcome::DoesNotReturn(DivergingAction::Shutdown));

        reset_runnable(ThreadId(1));
    }

    #[test]
    fn trigger_before_wait_is_observed_without_blocking() {
        virq::get(VirqId(0)).reset_for_test();
        reset_runnable(ThreadId(2));

        invoke_trigger(VirqId(0));
        let outcome = invoke_wait(ThreadId(2), VirqId(0));

        assert_eq!(outcome, InvokeOutcome::Continue(SyscallResult::Ok));
        assert_eq!(thread::get(ThreadId(2)).state, ThreadState::Runnable);

        virq::get(VirqId(0)).reset_for_test();
    }

    #[test]
    fn wait_before_trigger_blocks_then_trigger_wakes_it() {
        virq::get(VirqId(0)).reset_for_test();
        reset_runnable(ThreadId(2));

        let outcome = invoke_wait(ThreadId(2), VirqId(0));
        assert_eq!(outcome, InvokeOutcome::DoesNotReturn(DivergingAction::Reschedule));
        assert_eq!(thread::get(ThreadId(2)).state, ThreadState::Blocked);

        invoke_trigger(VirqId(0));
        assert_eq!(thread::get(ThreadId(2)).state, ThreadState::Runnable);

        virq::get(VirqId(0)).reset_for_test();
    }
}
