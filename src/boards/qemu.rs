//! Timing constants for the QEMU `virt` machine.

/// Frequency, in Hz, of the `time` CSR on QEMU's `virt` board.
pub const CLOCK_FREQ: usize = 10_000_000;
