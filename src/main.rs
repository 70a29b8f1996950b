//! Boot shell: architectural init, then hand off to the scheduler
//! (`spec.md §6` "Boot handoff"). Everything else lives in the library.

#![no_std]
#![no_main]
#![cfg_attr(test, allow(unused))]

use epoxy::logging;

#[cfg(target_arch = "riscv64")]
mod boot {
    use core::arch::{asm, naked_asm};
    use riscv::register::sstatus;

    const BOOT_STACK_SIZE: usize = 64 * 1024;

    #[repr(align(16))]
    struct BootStack([u8; BOOT_STACK_SIZE]);

    static mut BOOT_STACK: BootStack = BootStack([0; BOOT_STACK_SIZE]);

    #[naked]
    #[no_mangle]
    #[link_section = ".text.entry"]
    unsafe extern "C" fn _start() -> ! {
        naked_asm!(
            "
            la sp, {boot_stack}
            li t0, {boot_stack_size}
            add sp, sp, t0
            tail {rust_main}
            ",
            boot_stack = sym BOOT_STACK,
            boot_stack_size = const BOOT_STACK_SIZE,
            rust_main = sym super::rust_main,
        )
    }

    /// Performs the architectural init described in `spec.md §6`, in
    /// order: deny execute-implies-read, keep interrupts disabled until
    /// set up, allow supervisor access to user pages, install the trap
    /// vector, and zero `sscratch` as the kernel-mode marker.
    pub fn arch_init() {
        unsafe {
            sstatus::clear_mxr();
            sstatus::clear_sie();
            sstatus::set_sum();
        }
        epoxy::trap::init();
    }

    pub fn clear_bss() {
        extern "C" {
            fn sbss();
            fn ebss();
        }
        unsafe {
            let start = sbss as usize;
            let end = ebss as usize;
            core::slice::from_raw_parts_mut(start as *mut u8, end - start).fill(0);
        }
    }

    #[allow(dead_code)]
    fn fence_instruction_cache() {
        unsafe { asm!("fence.i", options(nostack)) };
    }
}

#[cfg(target_arch = "riscv64")]
#[no_mangle]
extern "C" fn rust_main() -> ! {
    boot::clear_bss();
    logging::init();
    boot::arch_init();

    log::info!("Epoxy booting");
    log::info!("{} processes, {} threads configured", epoxy::config::NUM_PROCESSES, epoxy::config::NUM_THREADS);

    #[cfg(test)]
    test_main();

    epoxy::scheduler::schedule()
}

// This binary only ever builds for target_arch = "riscv64" — the host
// tier of testing runs `cargo test --lib` against the library crate
// instead, where every hardware-touching module has a no-op stand-in.
