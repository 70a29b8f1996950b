//! Board-specific timing constants.
//!
//! The kernel core only needs a clock frequency to convert a schedule rate
//! into a tick count; everything else about a board (memory map, device
//! tree) is the harden tool's concern, not the kernel's.

#[cfg(feature = "board_qemu")]
#[path = "qemu.rs"]
mod selected;

pub use selected::CLOCK_FREQ;
