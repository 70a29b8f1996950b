//! Processes: identity, capability table, and address space (`spec.md
//! §3, §4.5`).

use crate::capability::CapabilityTable;

/// Index into the static process table; also the index used to look up a
/// process's page-table root (`spec.md §3`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessId(pub usize);

/// A page-table root register value: translation mode, address-space id,
/// and root page-table physical page number, packed the way `satp`
/// expects it (`spec.md §6`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTableRoot(pub u64);

/// A process: a capability table plus a page-table root, furnished by the
/// harden tool and never mutated after boot.
pub struct Process {
    pub capabilities: CapabilityTable,
    pub page_table_root: PageTableRoot,
}

impl Process {
    pub const fn new(capabilities: CapabilityTable, page_table_root: PageTableRoot) -> Self {
        Self {
            capabilities,
            page_table_root,
        }
    }
}

/// Returns the process at `id` in the static process table.
pub fn get(id: ProcessId) -> &'static Process {
    &crate::image::PROCESSES[id.0]
}
