use once_cell::sync::OnceCell;

use crate::container::key::Erased;

/// Empty-or-filled cache slot guarding one shared instance.
///
/// Who owns the slot decides the sharing policy: a singleton registration
/// owns one slot for its whole builder lineage, while a scoped registration
/// allocates a fresh slot in every scope it is replayed into.
pub(crate) struct CacheSlot {
    cell: OnceCell<Erased>,
}

impl CacheSlot {
    pub(crate) fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// Returns the cached instance, invoking `fill` exactly once across all
    /// callers while the slot is still empty.
    pub(crate) fn get_or_fill(&self, fill: impl FnOnce() -> Erased) -> Erased {
        self.cell.get_or_init(fill).clone()
    }

    #[cfg(test)]
    pub(crate) fn is_filled(&self) -> bool {
        self.cell.get().is_some()
    }
}
