//! Epoxy: a statically configured microkernel for RISC-V supervisor mode.
//!
//! The crate is split so that everything which does not touch real
//! hardware — capability lookup, scheduler cursor math, the virq wait
//! list, trap classification, log line buffering — builds and tests on
//! the host. Anything that reaches a CSR, firmware call, or memory-mapped
//! register lives behind `#[cfg(target_arch = "riscv64")]` and is only
//! meaningfully exercised on target.

#![cfg_attr(not(test), no_std)]
#![cfg_attr(not(test), feature(custom_test_frameworks))]
#![cfg_attr(not(test), test_runner(crate::test_framework::test_runner))]
#![cfg_attr(not(test), reexport_test_harness_main = "test_main")]

pub mod address_space;
pub mod boards;
pub mod capability;
pub mod config;
pub mod console;
pub mod image;
pub mod interrupt;
pub mod kobject;
pub mod lang_items;
pub mod logging;
pub mod plic;
pub mod process;
pub mod result;
pub mod sbi;
pub mod scheduler;
pub mod state;
pub mod sync;
pub mod test_framework;
pub mod thread;
pub mod timer;
pub mod trap;
pub mod virq;
