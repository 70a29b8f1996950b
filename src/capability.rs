//! Capability tables and lookup (`spec.md §3, §4.2`).
//!
//! A capability table is a fixed, build-time-determined sequence of
//! references to kernel objects. Per the cyclic-reference design note, a
//! reference is an index into the global kernel-object table, not a pointer.

use crate::kobject::KernelObjectId;

/// A process's fixed-length view onto the objects it may invoke.
///
/// Borrowed from the static system image; a process never owns its table.
#[derive(Debug, Clone, Copy)]
pub struct CapabilityTable {
    entries: &'static [KernelObjectId],
}

impl CapabilityTable {
    pub const fn new(entries: &'static [KernelObjectId]) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolves capability index `index` to a kernel-object id.
    ///
    /// Returns `None` for any index outside `[0, len())`, including negative
    /// indices encoded as the ABI's invalid sentinel — the caller passes a
    /// signed register value in, so out-of-range covers both "too large"
    /// and "negative" uniformly.
    pub fn lookup(&self, index: isize) -> Option<KernelObjectId> {
        let index: usize = index.try_into().ok()?;
        self.entries.get(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: CapabilityTable = CapabilityTable::new(&[KernelObjectId(0), KernelObjectId(3)]);

    #[test]
    fn in_range_indices_resolve() {
        assert_eq!(TABLE.lookup(0), Some(KernelObjectId(0)));
        assert_eq!(TABLE.lookup(1), Some(KernelObjectId(3)));
    }

    #[test]
    fn negative_sentinel_is_rejected() {
        assert_eq!(TABLE.lookup(-1), None);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        assert_eq!(TABLE.lookup(2), None);
        assert_eq!(TABLE.lookup(7), None);
    }

    #[test]
    fn empty_table_rejects_everything() {
        let empty = CapabilityTable::new(&[]);
        assert_eq!(empty.lookup(0), None);
    }
}
