//! Timer arithmetic and programming (`spec.md §4.3`).
//!
//! The tick-count math is portable and host-testable; reading the current
//! tick count and programming the next deadline are firmware/CSR
//! operations and are arch-gated.

use crate::boards::CLOCK_FREQ;
use crate::config::SCHEDULE_RATE_HZ;

/// Number of `time` CSR ticks in one scheduling time slice.
pub const TIME_SLICE: usize = CLOCK_FREQ / SCHEDULE_RATE_HZ;

/// Computes the absolute deadline for the next time slice, wrapping on
/// overflow the same way the hardware counter does.
pub const fn next_deadline(now: usize) -> usize {
    now.wrapping_add(TIME_SLICE)
}

#[cfg(target_arch = "riscv64")]
mod hw {
    use riscv::register::time;

    pub fn now() -> usize {
        time::read()
    }

    /// Programs the next timer interrupt and clears any interrupt already
    /// latched for the one that just fired.
    pub fn arm(deadline: usize) {
        crate::sbi::set_timer(deadline as u64);
    }
}

#[cfg(not(target_arch = "riscv64"))]
mod hw {
    pub fn now() -> usize {
        0
    }

    pub fn arm(_deadline: usize) {}
}

pub use hw::{arm, now};

/// Arms the timer for one time slice ahead of the current tick count,
/// returning the deadline that was programmed (`spec.md §8` property 3).
pub fn arm_next_slice() -> usize {
    let deadline = next_deadline(now());
    arm(deadline);
    deadline
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_deadline_is_now_plus_slice() {
        assert_eq!(next_deadline(1000), 1000 + TIME_SLICE);
    }

    #[test]
    fn next_deadline_wraps_like_the_hardware_counter() {
        assert_eq!(next_deadline(usize::MAX), TIME_SLICE - 1);
    }
}
