/// Index into a list whose length can change underneath it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionState {
    index: usize,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// User picked slot `k`. The UI only offers valid slots.
    pub fn select(&mut self, k: usize) {
        self.index = k;
    }

    /// Snap back to the first slot when the list no longer reaches the
    /// current index. Returns `true` when the index moved.
    pub fn reconcile(&mut self, len: usize) -> bool {
        if self.index >= len && self.index != 0 {
            tracing::debug!(index = self.index, len, "selection out of range, resetting");
            self.index = 0;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shrinking_below_index_resets() {
        let mut sel = SelectionState::new();
        sel.select(2);
        assert!(!sel.reconcile(3));
        assert_eq!(sel.index(), 2);
        assert!(sel.reconcile(2));
        assert_eq!(sel.index(), 0);
    }

    #[test]
    fn empty_list_keeps_zero() {
        let mut sel = SelectionState::new();
        assert!(!sel.reconcile(0));
        assert_eq!(sel.index(), 0);
    }

    #[test]
    fn growing_list_keeps_index() {
        let mut sel = SelectionState::new();
        sel.select(1);
        assert!(!sel.reconcile(5));
        assert_eq!(sel.index(), 1);
    }
}
