//! Address-space activation (`spec.md §4.5`).

use crate::process::{PageTableRoot, ProcessId};
use crate::state;

#[cfg(target_arch = "riscv64")]
mod hw {
    use crate::process::PageTableRoot;
    use riscv::asm::sfence_vma_all;
    use riscv::register::satp;

    pub fn write_root(root: PageTableRoot) {
        unsafe { satp::write(root.0 as usize) };
        sfence_vma_all();
    }
}

#[cfg(not(target_arch = "riscv64"))]
mod hw {
    use crate::process::PageTableRoot;

    pub fn write_root(_root: PageTableRoot) {}
}

/// Activates `process`'s address space if it is not already current
/// (`spec.md §4.5`: "if the process is already current, no-op").
///
/// Returns whether the root register was actually written, so callers
/// (and tests) can check the caching property directly (`spec.md §8`
/// property 8).
pub fn activate(process: ProcessId, root: PageTableRoot) -> bool {
    if state::current_process() == Some(process) {
        return false;
    }
    state::set_current_process(process);
    hw::write_root(root);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_activation_of_the_same_process_writes_once() {
        state::reset_for_test(1);
        let root = PageTableRoot(0x42);
        assert!(activate(ProcessId(0), root));
        assert!(!activate(ProcessId(0), root));
        assert!(!activate(ProcessId(0), root));
    }

    #[test]
    fn switching_process_activates_again() {
        state::reset_for_test(1);
        assert!(activate(ProcessId(0), PageTableRoot(0x1)));
        assert!(activate(ProcessId(1), PageTableRoot(0x2)));
    }
}
