//! Round-robin scheduling (`spec.md §4.3`).

use crate::config::NUM_THREADS;
use crate::sync::SpinMutex;
use crate::thread::{ThreadId, ThreadState};

/// The round-robin cursor, initialised to `NUM_THREADS - 1` ("last but
/// one") so that the first scheduling decision considers thread 0 first —
/// the open question in `spec.md §9` is resolved this way, matching the
/// original implementation's own comment that pointing one before the
/// start is "mostly cosmetical to ensure we schedule thread[0] initially".
static CURSOR: SpinMutex<usize> = SpinMutex::new(NUM_THREADS - 1);

/// Finds the next runnable thread starting one past `cursor`, wrapping
/// around, examining each of `n` threads at most once.
///
/// `thread_state` is queried rather than passed as a slice so the real
/// scheduler can look threads up one at a time (each behind its own lock)
/// instead of needing a consistent snapshot of all of them; for tests, it
/// is simply indexing into a plain array.
pub fn pick_next<F: Fn(usize) -> ThreadState>(cursor: usize, n: usize, thread_state: F) -> Option<usize> {
    for step in 1..=n {
        let index = (cursor + step) % n;
        if thread_state(index) == ThreadState::Runnable {
            return Some(index);
        }
    }
    None
}

#[cfg(target_arch = "riscv64")]
mod hw {
    use super::*;
    use crate::address_space;
    use crate::sbi;
    use crate::state;
    use crate::timer;
    use crate::trap;

    /// Selects the next runnable thread and activates it, or idles if none
    /// exists. Never returns (`spec.md §4.3`).
    pub fn schedule() -> ! {
        let previous = *CURSOR.lock();

        let chosen = pick_next(previous, NUM_THREADS, |i| crate::thread::get(ThreadId(i)).state);

        match chosen {
            Some(index) => {
                *CURSOR.lock() = index;
                timer::arm_next_slice();
                trap::enable_timer_interrupt();
                activate(ThreadId(index))
            }
            None => idle(),
        }
    }

    /// Installs `thread` as current and transfers control to user mode.
    /// Never returns (`spec.md §4.4`).
    pub fn activate(thread: ThreadId) -> ! {
        state::set_current_thread(thread);

        let process_id = crate::thread::get(thread).process;
        let process = crate::process::get(process_id);
        address_space::activate(process_id, process.page_table_root);

        let frame_ptr = {
            let guard = crate::thread::get(thread);
            &guard.frame as *const _
        };
        trap::exit_to_user(frame_ptr)
    }

    fn idle() -> ! {
        log::info!("no runnable thread, idling");
        trap::enable_timer_interrupt();
        unsafe {
            riscv::register::sstatus::set_sie();
        }
        loop {
            unsafe { riscv::asm::wfi() };
        }
    }

    /// Requests firmware shutdown (`spec.md §4.6` Exit object, counter == 0
    /// case). Never returns.
    pub fn shutdown() -> ! {
        log::info!("all threads exited, requesting shutdown");
        sbi::shutdown(false)
    }
}

#[cfg(not(target_arch = "riscv64"))]
mod hw {
    use super::ThreadId;

    pub fn schedule() -> ! {
        panic!("scheduler::schedule is only meaningful on target_arch = riscv64")
    }

    pub fn activate(_thread: ThreadId) -> ! {
        panic!("scheduler::activate is only meaningful on target_arch = riscv64")
    }

    pub fn shutdown() -> ! {
        panic!("scheduler::shutdown is only meaningful on target_arch = riscv64")
    }
}

pub use hw::{activate, schedule, shutdown};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_the_first_runnable_thread_after_the_cursor() {
        let states = [
            ThreadState::Runnable,
            ThreadState::Blocked,
            ThreadState::Runnable,
            ThreadState::Exited,
        ];
        assert_eq!(pick_next(0, 4, |i| states[i]), Some(2));
    }

    #[test]
    fn wraps_around_to_find_a_thread_before_the_cursor() {
        let states = [ThreadState::Runnable, ThreadState::Blocked, ThreadState::Blocked];
        assert_eq!(pick_next(1, 3, |i| states[i]), Some(0));
    }

    #[test]
    fn returns_none_when_nothing_is_runnable() {
        let states = [ThreadState::Blocked, ThreadState::Exited];
        assert_eq!(pick_next(0, 2, |i| states[i]), None);
    }

    #[test]
    fn first_decision_from_the_initial_cursor_picks_thread_zero() {
        let states = [ThreadState::Runnable; NUM_THREADS];
        let initial_cursor = NUM_THREADS - 1;
        assert_eq!(pick_next(initial_cursor, NUM_THREADS, |i| states[i]), Some(0));
    }

    #[test]
    fn round_robin_visits_every_runnable_thread_exactly_once_per_window() {
        let n = 5;
        let states = [ThreadState::Runnable; 5];
        let mut cursor = n - 1;
        let mut seen = [0u32; 5];
        for _ in 0..n {
            let chosen = pick_next(cursor, n, |i| states[i]).unwrap();
            seen[chosen] += 1;
            cursor = chosen;
        }
        assert!(seen.iter().all(|&count| count == 1));
    }
}
