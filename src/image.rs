//! The static system image.
//!
//! In a real deployment every table in this file is emitted by the offline
//! harden tool (`spec.md §1` Out of scope): it assigns process ids, builds
//! each process's page tables and capability table, and picks the thread
//! entry points. This module stands in for that tool's output with a small
//! fixed configuration, wired up at compile time exactly as the tool's
//! output would be linked in.

use crate::capability::CapabilityTable;
use crate::config::{NUM_KOBJECTS, NUM_PROCESSES, NUM_THREADS, NUM_VIRQS};
use crate::kobject::log::LogObject;
use crate::kobject::{KernelObject, KernelObjectId};
use crate::process::{PageTableRoot, Process, ProcessId};
use crate::sync::SpinMutex;
use crate::thread::Thread;
use crate::trap::frame::TrapFrame;
use crate::virq::{Virq, VirqId};

const LOG_P0: KernelObjectId = KernelObjectId(0);
const LOG_P1: KernelObjectId = KernelObjectId(1);
const LOG_PA: KernelObjectId = KernelObjectId(2);
const LOG_PB: KernelObjectId = KernelObjectId(3);
const EXIT: KernelObjectId = KernelObjectId(4);
const VIRQ_WAIT: KernelObjectId = KernelObjectId(5);
const VIRQ_TRIGGER: KernelObjectId = KernelObjectId(6);

const V0: VirqId = VirqId(0);

pub static KOBJECTS: [KernelObject; NUM_KOBJECTS] = [
    KernelObject::Log(LogObject::new(Some("P0"))),
    KernelObject::Log(LogObject::new(Some("P1"))),
    KernelObject::Log(LogObject::new(Some("PA"))),
    KernelObject::Log(LogObject::new(Some("PB"))),
    KernelObject::Exit,
    KernelObject::VirqWait(V0),
    KernelObject::VirqTrigger(V0),
];

pub static VIRQS: [SpinMutex<Virq>; NUM_VIRQS] = [SpinMutex::new(Virq::unbound())];

const PROCESS_0_CAPS: [KernelObjectId; 2] = [LOG_P0, EXIT];
const PROCESS_1_CAPS: [KernelObjectId; 2] = [LOG_P1, EXIT];
// Padded to length 4 so that index 3 is a valid capability slot: the
// harden tool fills unused slots with a harmless repeat rather than
// leaving a gap, since the table must stay dense (spec.md §3).
const PROCESS_A_CAPS: [KernelObjectId; 4] = [LOG_PA, EXIT, EXIT, VIRQ_WAIT];
const PROCESS_B_CAPS: [KernelObjectId; 5] = [LOG_PB, EXIT, EXIT, EXIT, VIRQ_TRIGGER];

pub static PROCESSES: [Process; NUM_PROCESSES] = [
    Process::new(
        CapabilityTable::new(&PROCESS_0_CAPS),
        PageTableRoot(0x8000_0000_0000_0001),
    ),
    Process::new(
        CapabilityTable::new(&PROCESS_1_CAPS),
        PageTableRoot(0x8000_0000_0000_0002),
    ),
    Process::new(
        CapabilityTable::new(&PROCESS_A_CAPS),
        PageTableRoot(0x8000_0000_0000_0003),
    ),
    Process::new(
        CapabilityTable::new(&PROCESS_B_CAPS),
        PageTableRoot(0x8000_0000_0000_0004),
    ),
];

/// Initial program counter for each process's first (and, in this image,
/// only) thread (`spec.md §6` "User entry-point table").
const USER_ENTRY_POINTS: [usize; NUM_PROCESSES] = [
    0x1000_0000,
    0x1000_0000,
    0x1000_0000,
    0x1000_0000,
];

const USER_STACK_TOP: usize = 0x2000_0000;

pub static THREADS: [SpinMutex<Thread>; NUM_THREADS] = [
    SpinMutex::new(Thread::new(
        ProcessId(0),
        TrapFrame::initial(USER_ENTRY_POINTS[0], USER_STACK_TOP),
    )),
    SpinMutex::new(Thread::new(
        ProcessId(1),
        TrapFrame::initial(USER_ENTRY_POINTS[1], USER_STACK_TOP),
    )),
    SpinMutex::new(Thread::new(
        ProcessId(2),
        TrapFrame::initial(USER_ENTRY_POINTS[2], USER_STACK_TOP),
    )),
    SpinMutex::new(Thread::new(
        ProcessId(3),
        TrapFrame::initial(USER_ENTRY_POINTS[3], USER_STACK_TOP),
    )),
];
