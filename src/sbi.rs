//! The firmware interface (`spec.md §6`): console output, timer
//! programming, and shutdown, carried over SBI's legacy extensions.
//!
//! Calls are a function-id/extension-id pair in `a6`/`a7` with arguments in
//! `a0`/`a1` — `sbi_rt` is the teacher's chosen wrapper over that
//! convention, kept unchanged here. Firmware calls are assumed infallible
//! and their return values are not inspected, by design (`spec.md §7`).

#[cfg(target_arch = "riscv64")]
mod hw {
    /// Writes one character to the console (legacy extension 1).
    pub fn console_putchar(c: usize) {
        #[allow(deprecated)]
        sbi_rt::legacy::console_putchar(c);
    }

    /// Requests a firmware shutdown (legacy extension 8). Never returns.
    pub fn shutdown(failure: bool) -> ! {
        use sbi_rt::{system_reset, NoReason, Shutdown, SystemFailure};
        if failure {
            system_reset(Shutdown, SystemFailure);
        } else {
            system_reset(Shutdown, NoReason);
        }
        unreachable!("firmware shutdown call did not take effect")
    }

    /// Programs the next timer interrupt at absolute time `deadline`
    /// (legacy extension 0; the 64-bit deadline is split across two
    /// argument registers on 32-bit platforms, handled internally by
    /// `sbi_rt`).
    pub fn set_timer(deadline: u64) {
        sbi_rt::set_timer(deadline);
    }
}

#[cfg(not(target_arch = "riscv64"))]
mod hw {
    pub fn console_putchar(_c: usize) {}

    pub fn shutdown(_failure: bool) -> ! {
        panic!("sbi::shutdown is only meaningful on target_arch = riscv64")
    }

    pub fn set_timer(_deadline: u64) {}
}

pub use hw::{console_putchar, set_timer, shutdown};
