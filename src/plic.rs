//! Platform-Level Interrupt Controller driver (`spec.md §6`), used only by
//! virtual interrupts that are bound to a physical source.
//!
//! The register layout follows the SiFive/QEMU `virt` PLIC: per-source
//! priority words, a per-hart enable bitmap, a per-hart threshold word, and
//! a claim/complete register. Only hart 0, context 1 (S-mode) is wired —
//! Epoxy never runs on more than one hart (`spec.md §1` Non-goals).

/// Identifies one physical interrupt line the PLIC routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IrqSource(pub u32);

#[cfg(target_arch = "riscv64")]
mod hw {
    use super::IrqSource;

    const PLIC_BASE: usize = 0x0c00_0000;
    const PRIORITY_BASE: usize = PLIC_BASE;
    const PENDING_BASE: usize = PLIC_BASE + 0x1000;
    const S_MODE_ENABLE_BASE: usize = PLIC_BASE + 0x2080;
    const S_MODE_THRESHOLD: usize = PLIC_BASE + 0x20_1000;
    const S_MODE_CLAIM: usize = PLIC_BASE + 0x20_1004;

    unsafe fn write(addr: usize, value: u32) {
        (addr as *mut u32).write_volatile(value);
    }

    unsafe fn read(addr: usize) -> u32 {
        (addr as *const u32).read_volatile()
    }

    pub fn set_priority(source: IrqSource, priority: u32) {
        unsafe { write(PRIORITY_BASE + source.0 as usize * 4, priority) };
    }

    pub fn set_threshold(threshold: u32) {
        unsafe { write(S_MODE_THRESHOLD, threshold) };
    }

    fn enable_word_and_bit(source: IrqSource) -> (usize, u32) {
        let word = source.0 as usize / 32;
        let bit = source.0 % 32;
        (S_MODE_ENABLE_BASE + word * 4, bit)
    }

    pub fn unmask(source: IrqSource) {
        let (addr, bit) = enable_word_and_bit(source);
        unsafe {
            let current = read(addr);
            write(addr, current | (1 << bit));
        }
    }

    pub fn mask(source: IrqSource) {
        let (addr, bit) = enable_word_and_bit(source);
        unsafe {
            let current = read(addr);
            write(addr, current & !(1 << bit));
        }
    }

    /// Claims the highest-priority pending interrupt, if any.
    pub fn claim() -> Option<IrqSource> {
        let id = unsafe { read(S_MODE_CLAIM) };
        if id == 0 {
            None
        } else {
            Some(IrqSource(id))
        }
    }

    pub fn complete(source: IrqSource) {
        unsafe { write(S_MODE_CLAIM, source.0) };
    }

    #[allow(dead_code)]
    pub fn is_pending(source: IrqSource) -> bool {
        let word = PENDING_BASE + (source.0 as usize / 32) * 4;
        let bit = source.0 % 32;
        unsafe { read(word) & (1 << bit) != 0 }
    }
}

#[cfg(not(target_arch = "riscv64"))]
mod hw {
    use super::IrqSource;

    pub fn set_priority(_source: IrqSource, _priority: u32) {}
    pub fn set_threshold(_threshold: u32) {}
    pub fn unmask(_source: IrqSource) {}
    pub fn mask(_source: IrqSource) {}
    pub fn claim() -> Option<IrqSource> {
        None
    }
    pub fn complete(_source: IrqSource) {}
}

pub use hw::{claim, complete, mask, set_priority, set_threshold, unmask};
