//! Generation-stamped lazy slots.
//!
//! Each slot remembers the cursor generation it was filled in. A slot whose
//! stamp differs from the cursor's current generation reads as empty, so a
//! retarget invalidates every slot by bumping a single counter.

use std::cell::RefCell;
use std::fmt;

/// Monotonic retarget counter. Generation 0 means "never targeted".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(pub(crate) u64);

impl Generation {
    pub(crate) fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

pub(crate) struct Memo<T> {
    slot: RefCell<Option<(Generation, T)>>,
}

impl<T: Clone> Memo<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slot: RefCell::new(None),
        }
    }

    /// Value stored for `generation`, if any.
    pub(crate) fn get(&self, generation: Generation) -> Option<T> {
        match &*self.slot.borrow() {
            Some((stamp, value)) if *stamp == generation => Some(value.clone()),
            _ => None,
        }
    }

    pub(crate) fn set(&self, generation: Generation, value: T) {
        *self.slot.borrow_mut() = Some((generation, value));
    }

    /// Return the stored value or compute and store it.
    ///
    /// `compute` runs with the slot unborrowed, so it may read other memos.
    pub(crate) fn get_or_insert_with(&self, generation: Generation, compute: impl FnOnce() -> T) -> T {
        if let Some(value) = self.get(generation) {
            return value;
        }
        let value = compute();
        self.set(generation, value.clone());
        value
    }

    pub(crate) fn invalidate(&self) {
        *self.slot.borrow_mut() = None;
    }
}

impl<T> fmt::Debug for Memo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stamp = self.slot.borrow().as_ref().map(|(g, _)| *g);
        f.debug_struct("Memo").field("stamp", &stamp).finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_computes_once_per_generation() {
        let memo: Memo<u32> = Memo::new();
        let calls = Cell::new(0);
        let g1 = Generation::default().next();

        let compute = || {
            calls.set(calls.get() + 1);
            7
        };
        assert_eq!(memo.get_or_insert_with(g1, compute), 7);
        assert_eq!(memo.get_or_insert_with(g1, || 99), 7);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_stale_generation_reads_empty() {
        let memo: Memo<&str> = Memo::new();
        let g1 = Generation::default().next();
        let g2 = g1.next();

        memo.set(g1, "first");
        assert_eq!(memo.get(g1), Some("first"));
        assert_eq!(memo.get(g2), None);
        assert_eq!(memo.get_or_insert_with(g2, || "second"), "second");
        assert_eq!(memo.get(g1), None);
    }

    #[test]
    fn test_invalidate() {
        let memo: Memo<bool> = Memo::new();
        let g = Generation(3);
        memo.set(g, true);
        memo.invalidate();
        assert_eq!(memo.get(g), None);
    }
}
