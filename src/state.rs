//! Global kernel state: the current-thread/current-process markers and the
//! running-thread counter (`spec.md §3` GlobalState, `§9` "Global mutable
//! state").
//!
//! These are process-wide singletons, written only with interrupts
//! disabled. Everything else in the kernel reaches them only through the
//! accessors here, never through a raw static.

use crate::config::NUM_THREADS;
use crate::process::ProcessId;
use crate::sync::SpinMutex;
use crate::thread::ThreadId;

static CURRENT_THREAD: SpinMutex<Option<ThreadId>> = SpinMutex::new(None);
static CURRENT_PROCESS: SpinMutex<Option<ProcessId>> = SpinMutex::new(None);
static RUNNING_THREADS: SpinMutex<usize> = SpinMutex::new(NUM_THREADS);

pub fn current_thread() -> Option<ThreadId> {
    *CURRENT_THREAD.lock()
}

pub fn set_current_thread(thread: ThreadId) {
    *CURRENT_THREAD.lock() = Some(thread);
}

pub fn current_process() -> Option<ProcessId> {
    *CURRENT_PROCESS.lock()
}

pub fn set_current_process(process: ProcessId) {
    *CURRENT_PROCESS.lock() = Some(process);
}

/// Decrements the running-thread counter and returns the new value.
///
/// Called exactly once per thread exit (`spec.md §4.6` Exit object).
pub fn thread_exited() -> usize {
    let mut count = RUNNING_THREADS.lock();
    *count -= 1;
    *count
}

#[cfg(test)]
pub fn reset_for_test(running_threads: usize) {
    *CURRENT_THREAD.lock() = None;
    *CURRENT_PROCESS.lock() = None;
    *RUNNING_THREADS.lock() = running_threads;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thread_exited_counts_down_to_zero_exactly_once() {
        reset_for_test(2);
        assert_eq!(thread_exited(), 1);
        assert_eq!(thread_exited(), 0);
    }
}
