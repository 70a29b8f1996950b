//! Trap entry and dispatch (`spec.md §4.1`).
//!
//! Classification of the cause register is portable and host-testable;
//! everything that touches the saved frame, CSRs, or control transfer back
//! to user mode is arch-gated.

pub mod frame;

use crate::kobject::{self, DivergingAction, InvokeOutcome};
use crate::process;
use crate::result::SyscallResult;
use crate::thread::ThreadId;
use frame::{SyscallArgs, TrapFrame};

/// What kind of trap a raw `scause` value describes (`spec.md §4.1`
/// "Classification").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrapCause {
    TimerInterrupt,
    OtherInterrupt(usize),
    UserEnvCall,
    OtherUserException(usize),
    KernelException(usize),
}

/// Classifies a raw `scause` register value. The top bit distinguishes
/// interrupt from exception; the remaining bits are the code.
///
/// `from_supervisor` is whether the trapped context was already in
/// supervisor mode (read from `sscratch` or `sstatus.spp` by the caller) —
/// needed to distinguish a kernel exception (always fatal) from a user one.
pub fn classify(scause: usize, from_supervisor: bool) -> TrapCause {
    let is_interrupt = scause >> (usize::BITS - 1) == 1;
    let code = scause & !(1 << (usize::BITS - 1));

    const TIMER_INTERRUPT_CODE: usize = 5;
    const ENV_CALL_FROM_U_MODE_CODE: usize = 8;

    match (is_interrupt, from_supervisor) {
        (true, _) if code == TIMER_INTERRUPT_CODE => TrapCause::TimerInterrupt,
        (true, _) => TrapCause::OtherInterrupt(code),
        (false, true) => TrapCause::KernelException(code),
        (false, false) if code == ENV_CALL_FROM_U_MODE_CODE => TrapCause::UserEnvCall,
        (false, false) => TrapCause::OtherUserException(code),
    }
}

/// Runs the syscall path of `spec.md §4.2` against an already-fetched
/// frame: decodes the args, advances the pc, looks up and invokes the
/// capability, and writes the result back.
///
/// Returns `None` when the syscall completed and the same thread should
/// resume; `Some(action)` when the dispatcher must hand off instead
/// (`spec.md §9` "Exit path without return").
pub fn handle_syscall(thread: ThreadId, frame: &mut TrapFrame) -> Option<DivergingAction> {
    frame.advance_past_ecall();
    let args = SyscallArgs::from(frame);

    let process_id = crate::thread::get(thread).process;
    let process = process::get(process_id);

    let outcome = match process.capabilities.lookup(args.cap_index) {
        Some(kobject_id) => kobject::get(kobject_id).invoke(thread, args.a1),
        None => InvokeOutcome::Continue(SyscallResult::NoCap),
    };

    match outcome {
        InvokeOutcome::Continue(result) => {
            frame.set_a0(result.code() as usize);
            None
        }
        InvokeOutcome::DoesNotReturn(action) => Some(action),
    }
}

#[cfg(target_arch = "riscv64")]
mod hw {
    use core::arch::{asm, naked_asm};
    use riscv::register::{scause, sepc, sie, sscratch, sstatus, stval, stvec};
    use riscv::register::utvec::TrapMode;

    use super::{frame::TrapFrame, handle_syscall, TrapCause};
    use crate::kobject::DivergingAction;
    use crate::state;

    const KERNEL_STACK_SIZE: usize = 64 * 1024;

    #[repr(align(16))]
    struct KernelStack([u8; KERNEL_STACK_SIZE]);

    static mut KERNEL_STACK: KernelStack = KernelStack([0; KERNEL_STACK_SIZE]);

    /// Installs the trap vector and clears `sscratch` to the kernel marker
    /// (`spec.md §6` "Boot handoff").
    pub fn init() {
        unsafe {
            stvec::write(trap_entry_asm as usize, TrapMode::Direct);
            sscratch::write(0);
        }
    }

    /// Enables the timer interrupt (`spec.md §4.3` step 2).
    pub fn enable_timer_interrupt() {
        unsafe { sie::set_stimer() };
    }

    /// Disables the timer interrupt (`spec.md §4.1`: ack on entry).
    pub fn disable_timer_interrupt() {
        unsafe { sie::clear_stimer() };
    }

    /// Clears any outstanding LR/SC reservation (`spec.md §4.4` step 3) by
    /// issuing a store-conditional to a real local's address, matching
    /// `original_source`'s `clear_lrsc_reservation` (`sc.d zero, zero,
    /// (%[mem])` against `&sc_dummy`) rather than address 0.
    pub fn clear_load_reservation() {
        let mut sc_dummy: u64 = 0;
        let addr: *mut u64 = &mut sc_dummy;
        unsafe {
            asm!(
                "sc.d zero, zero, 0({addr})",
                addr = in(reg) addr,
                options(nostack),
            );
        }
    }

    /// Installs `frame` as the current hardware context and transfers
    /// control to user mode. Never returns (`spec.md §4.4`).
    ///
    /// Caller is responsible for steps 1-2 (recording current thread,
    /// activating the address space); this covers steps 3-7.
    pub fn exit_to_user(frame: *const TrapFrame) -> ! {
        clear_load_reservation();
        unsafe {
            sstatus::clear_spp();
            sscratch::write(frame as usize);
            sepc::write((*frame).pc);
        }
        unsafe { restore_and_sret(frame) }
    }

    #[naked]
    unsafe extern "C" fn restore_and_sret(_frame: *const TrapFrame) -> ! {
        naked_asm!(
            "
            mv t6, a0
            ld ra,  0*8(t6)
            ld sp,  1*8(t6)
            ld gp,  2*8(t6)
            ld tp,  3*8(t6)
            ld t0,  4*8(t6)
            ld t1,  5*8(t6)
            ld t2,  6*8(t6)
            ld s0,  7*8(t6)
            ld s1,  8*8(t6)
            ld a0,  9*8(t6)
            ld a1, 10*8(t6)
            ld a2, 11*8(t6)
            ld a3, 12*8(t6)
            ld a4, 13*8(t6)
            ld a5, 14*8(t6)
            ld a6, 15*8(t6)
            ld a7, 16*8(t6)
            ld s2, 17*8(t6)
            ld s3, 18*8(t6)
            ld s4, 19*8(t6)
            ld s5, 20*8(t6)
            ld s6, 21*8(t6)
            ld s7, 22*8(t6)
            ld s8, 23*8(t6)
            ld s9, 24*8(t6)
            ld s10, 25*8(t6)
            ld s11, 26*8(t6)
            ld t3, 27*8(t6)
            ld t4, 28*8(t6)
            ld t5, 29*8(t6)
            ld t6, 30*8(t6)
            sret
            "
        )
    }

    #[repr(align(4))]
    #[naked]
    unsafe extern "C" fn trap_entry_asm() -> ! {
        naked_asm!(
            "
            csrrw t6, sscratch, t6
            beqz t6, 2f

            sd ra,  0*8(t6)
            sd sp,  1*8(t6)
            sd gp,  2*8(t6)
            sd tp,  3*8(t6)
            sd t0,  4*8(t6)
            sd t1,  5*8(t6)
            sd t2,  6*8(t6)
            sd s0,  7*8(t6)
            sd s1,  8*8(t6)
            sd a0,  9*8(t6)
            sd a1, 10*8(t6)
            sd a2, 11*8(t6)
            sd a3, 12*8(t6)
            sd a4, 13*8(t6)
            sd a5, 14*8(t6)
            sd a6, 15*8(t6)
            sd a7, 16*8(t6)
            sd s2, 17*8(t6)
            sd s3, 18*8(t6)
            sd s4, 19*8(t6)
            sd s5, 20*8(t6)
            sd s6, 21*8(t6)
            sd s7, 22*8(t6)
            sd s8, 23*8(t6)
            sd s9, 24*8(t6)
            sd s10, 25*8(t6)
            sd s11, 26*8(t6)
            sd t3, 27*8(t6)
            sd t4, 28*8(t6)
            sd t5, 29*8(t6)

            csrr t5, sscratch
            sd t5, 30*8(t6)

            csrr t5, sepc
            sd t5, 31*8(t6)

            csrw sscratch, zero

            mv a0, t6
            la sp, {kernel_stack}
            li t0, {kernel_stack_size}
            add sp, sp, t0

            tail {rust_trap_entry}

        2:
            tail {rust_kernel_trap_fatal}
            ",
            kernel_stack = sym KERNEL_STACK,
            kernel_stack_size = const KERNEL_STACK_SIZE,
            rust_trap_entry = sym rust_trap_entry,
            rust_kernel_trap_fatal = sym rust_kernel_trap_fatal,
        )
    }

    /// Entered on every user-mode trap, running on the kernel stack with a
    /// pointer to the interrupted thread's (now fully saved) frame.
    ///
    /// Never returns: every path ends either by re-entering user mode
    /// through [`exit_to_user`] (via the scheduler) or by requesting
    /// shutdown.
    #[no_mangle]
    extern "C" fn rust_trap_entry(frame: *mut TrapFrame) -> ! {
        let scause = scause::read().bits();
        let cause = super::classify(scause, false);

        let thread = state::current_thread().expect("trap with no current thread");
        let frame = unsafe { &mut *frame };

        match cause {
            TrapCause::TimerInterrupt => {
                disable_timer_interrupt();
                crate::scheduler::schedule();
            }
            TrapCause::UserEnvCall => match handle_syscall(thread, frame) {
                None => crate::scheduler::activate(thread),
                Some(DivergingAction::Reschedule) => crate::scheduler::schedule(),
                Some(DivergingAction::Shutdown) => crate::scheduler::shutdown(),
            },
            TrapCause::OtherUserException(code) => {
                // spec.md §9 open question: intended policy is thread
                // termination; not implemented in this version.
                panic!("unhandled user exception, cause = {code:#x}, stval = {:#x}", stval::read().bits());
            }
            TrapCause::OtherInterrupt(code) => {
                panic!("unhandled interrupt, cause = {code:#x}");
            }
            TrapCause::KernelException(code) => {
                panic!(
                    "exception from supervisor mode, cause = {code:#x}, sepc = {:#x}, stval = {:#x}",
                    sepc::read(),
                    stval::read().bits(),
                );
            }
        }
    }

    #[no_mangle]
    extern "C" fn rust_kernel_trap_fatal() -> ! {
        panic!(
            "trap while sscratch was zero: scause = {:#x}, sepc = {:#x}, stval = {:#x}",
            scause::read().bits(),
            sepc::read(),
            stval::read().bits(),
        );
    }

}

#[cfg(target_arch = "riscv64")]
pub use hw::{clear_load_reservation, disable_timer_interrupt, enable_timer_interrupt, exit_to_user, init};

#[cfg(not(target_arch = "riscv64"))]
mod hw {
    pub fn init() {}
    pub fn enable_timer_interrupt() {}
    pub fn disable_timer_interrupt() {}
    pub fn clear_load_reservation() {}
    pub fn exit_to_user(_frame: *const super::frame::TrapFrame) -> ! {
        panic!("trap::exit_to_user is only meaningful on target_arch = riscv64")
    }
}

#[cfg(not(target_arch = "riscv64"))]
pub use hw::{clear_load_reservation, disable_timer_interrupt, enable_timer_interrupt, exit_to_user, init};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_interrupt_is_classified() {
        assert_eq!(classify(1usize << (usize::BITS - 1) | 5, false), TrapCause::TimerInterrupt);
    }

    #[test]
    fn user_ecall_is_classified() {
        assert_eq!(classify(8, false), TrapCause::UserEnvCall);
    }

    #[test]
    fn exception_from_supervisor_is_always_kernel_exception() {
        assert_eq!(classify(8, true), TrapCause::KernelException(8));
    }

    #[test]
    fn other_user_exception_is_distinguished_from_ecall() {
        assert_eq!(classify(3, false), TrapCause::OtherUserException(3));
    }

    // Thread 3 belongs to the image's process B (`image.rs`), capability
    // table `[LOG_PB, EXIT, EXIT, EXIT, VIRQ_TRIGGER]` (length 5).
    #[test]
    fn handle_syscall_dispatches_valid_capability_and_preserves_extra_args() {
        let mut frame = TrapFrame::zeroed();
        frame.pc = 0x2000;
        frame.set_a0(0); // capability 0: LOG_PB
        frame.x[10] = b'x' as usize; // a1
        frame.x[11] = 0xAA; // a2
        frame.x[12] = 0xBB; // a3
        frame.x[13] = 0xCC; // a4

        let outcome = handle_syscall(ThreadId(3), &mut frame);

        assert_eq!(outcome, None);
        assert_eq!(frame.a0(), SyscallResult::Ok.code() as usize);
        assert_eq!(frame.a2(), 0xAA);
        assert_eq!(frame.a3(), 0xBB);
        assert_eq!(frame.a4(), 0xCC);
        assert_eq!(frame.pc, 0x2004);
    }

    #[test]
    fn handle_syscall_out_of_range_capability_returns_nocap_without_invoking() {
        let mut frame = TrapFrame::zeroed();
        frame.pc = 0x3000;
        frame.set_a0(99); // out of range for process B's 5-entry table

        let outcome = handle_syscall(ThreadId(3), &mut frame);

        assert_eq!(outcome, None);
        assert_eq!(frame.a0(), SyscallResult::NoCap.code() as usize);
        assert_eq!(frame.pc, 0x3004);
    }
}
