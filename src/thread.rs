//! Threads: the schedulable entity (`spec.md §3`).

use crate::process::ProcessId;
use crate::sync::SpinMutexGuard;
use crate::trap::frame::TrapFrame;

/// Index into the static thread table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadState {
    Runnable,
    Blocked,
    Exited,
}

/// A thread: the process it belongs to, its saved register file, and its
/// scheduling state.
///
/// A thread never outlives its process reference — both live in static
/// tables for the whole kernel lifetime, so the reference is a plain id,
/// not a borrow (`spec.md §9` "Cyclic references").
pub struct Thread {
    pub process: ProcessId,
    pub frame: TrapFrame,
    pub state: ThreadState,
}

impl Thread {
    pub const fn new(process: ProcessId, frame: TrapFrame) -> Self {
        Self {
            process,
            frame,
            state: ThreadState::Runnable,
        }
    }
}

/// Locks and returns the thread at `id` in the static thread table.
pub fn get(id: ThreadId) -> SpinMutexGuard<'static, Thread> {
    crate::image::THREADS[id.0].lock()
}
