//! Candidate id sequence

/// Ascending person ids starting at 1
///
/// Bounded sources stop after `count` ids. Unbounded sources never end on
/// their own and rely on the not-found threshold downstream.
#[derive(Debug, Clone)]
pub struct IdSource {
    next: u64,
    last: Option<u64>,
}

impl IdSource {
    pub fn bounded(count: u64) -> Self {
        Self {
            next: 1,
            last: Some(count),
        }
    }

    pub fn unbounded() -> Self {
        Self {
            next: 1,
            last: None,
        }
    }
}

impl Iterator for IdSource {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.last.is_some_and(|last| self.next > last) {
            return None;
        }
        let id = self.next;
        self.next = self.next.checked_add(1)?;
        Some(id)
    }
}
