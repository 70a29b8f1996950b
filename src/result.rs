//! The syscall result code returned to user mode in `a0` (`spec.md §6`).

use strum_macros::Display;

/// Outcome of a syscall dispatch, encoded as the small integer a process
/// reads back out of `a0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[repr(isize)]
pub enum SyscallResult {
    /// The capability was invoked successfully.
    #[strum(serialize = "ok")]
    Ok = 0,
    /// The capability index named by `a0` had no entry in the calling
    /// process's capability table.
    #[strum(serialize = "no_cap")]
    NoCap = 1,
}

impl SyscallResult {
    pub const fn code(self) -> isize {
        self as isize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_the_wire_values() {
        assert_eq!(SyscallResult::Ok.code(), 0);
        assert_eq!(SyscallResult::NoCap.code(), 1);
    }
}
