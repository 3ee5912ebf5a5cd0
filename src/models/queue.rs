//! Per-book reservation queue
//!
//! [`BookQueue`] is the in-memory image of one book's active reservations,
//! loaded while the book row is locked. Inserts and removals are computed
//! here and the changed positions written back in the same transaction, so
//! the active positions of a book always form `1..=N`.

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slot {
    reservation_id: i32,
    stored: i32,
    position: i32,
}

#[derive(Debug, Clone, Default)]
pub struct BookQueue {
    book_id: i32,
    slots: Vec<Slot>,
    repaired: bool,
}

impl BookQueue {
    /// Build from `(reservation_id, stored_position)` pairs of active reservations.
    ///
    /// Entries are ordered by stored position (ties by id) and renumbered
    /// `1..=N`; if that changes anything the queue is flagged as repaired.
    pub fn load(book_id: i32, entries: impl IntoIterator<Item = (i32, i32)>) -> Self {
        let mut slots: Vec<Slot> = entries
            .into_iter()
            .map(|(reservation_id, stored)| Slot {
                reservation_id,
                stored,
                position: stored,
            })
            .collect();
        slots.sort_by_key(|s| (s.stored, s.reservation_id));

        let mut repaired = false;
        for (idx, slot) in slots.iter_mut().enumerate() {
            let expected = idx as i32 + 1;
            if slot.position != expected {
                slot.position = expected;
                repaired = true;
            }
        }

        Self {
            book_id,
            slots,
            repaired,
        }
    }

    pub fn book_id(&self) -> i32 {
        self.book_id
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Loaded positions had gaps or duplicates
    pub fn was_repaired(&self) -> bool {
        self.repaired
    }

    pub fn position_of(&self, reservation_id: i32) -> Option<i32> {
        self.slots
            .iter()
            .find(|s| s.reservation_id == reservation_id)
            .map(|s| s.position)
    }

    /// Reserve a place for a new reservation and return it.
    ///
    /// With no request the entry goes to the back. A requested place shifts
    /// every entry at or after it back by one; requests past the end append.
    pub fn insert(&mut self, requested: Option<i32>) -> AppResult<i32> {
        let next = self.slots.len() as i32 + 1;
        let position = match requested {
            None => next,
            Some(p) if p < 1 => {
                return Err(AppError::Validation(format!(
                    "Queue position must be at least 1, got {}",
                    p
                )))
            }
            Some(p) => p.min(next),
        };

        for slot in self.slots.iter_mut().filter(|s| s.position >= position) {
            slot.position += 1;
        }

        Ok(position)
    }

    /// Take a reservation out of the queue, closing the gap it leaves.
    ///
    /// Returns its position before removal, or `None` if it was not queued.
    pub fn remove(&mut self, reservation_id: i32) -> Option<i32> {
        let idx = self
            .slots
            .iter()
            .position(|s| s.reservation_id == reservation_id)?;
        let removed = self.slots.remove(idx);

        for slot in self.slots.iter_mut().filter(|s| s.position > removed.position) {
            slot.position -= 1;
        }

        Some(removed.position)
    }

    /// Reservations whose position differs from what is stored
    pub fn changes(&self) -> Vec<(i32, i32)> {
        self.slots
            .iter()
            .filter(|s| s.position != s.stored)
            .map(|s| (s.reservation_id, s.position))
            .collect()
    }

    /// Current positions in queue order
    pub fn positions(&self) -> Vec<(i32, i32)> {
        self.slots
            .iter()
            .map(|s| (s.reservation_id, s.position))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_contiguous(queue: &BookQueue) {
        let mut positions: Vec<i32> = queue.positions().into_iter().map(|(_, p)| p).collect();
        positions.sort_unstable();
        let expected: Vec<i32> = (1..=queue.len() as i32).collect();
        assert_eq!(positions, expected);
    }

    #[test]
    fn test_append_to_empty_queue() {
        let mut queue = BookQueue::load(7, Vec::new());
        assert_eq!(queue.book_id(), 7);
        assert_eq!(queue.insert(None).unwrap(), 1);
        assert!(queue.changes().is_empty());
    }

    #[test]
    fn test_append_goes_after_last() {
        let mut queue = BookQueue::load(1, vec![(10, 1), (11, 2), (12, 3)]);
        assert_eq!(queue.insert(None).unwrap(), 4);
        assert!(queue.changes().is_empty());
    }

    #[test]
    fn test_insert_shifts_later_entries() {
        let mut queue = BookQueue::load(1, vec![(10, 1), (11, 2), (12, 3)]);
        assert_eq!(queue.insert(Some(2)).unwrap(), 2);

        let mut changes = queue.changes();
        changes.sort_unstable();
        assert_eq!(changes, vec![(11, 3), (12, 4)]);
        assert_eq!(queue.position_of(10), Some(1));
    }

    #[test]
    fn test_insert_at_front() {
        let mut queue = BookQueue::load(1, vec![(10, 1), (11, 2)]);
        assert_eq!(queue.insert(Some(1)).unwrap(), 1);
        assert_eq!(queue.positions(), vec![(10, 2), (11, 3)]);
    }

    #[test]
    fn test_insert_past_end_appends() {
        let mut queue = BookQueue::load(1, vec![(10, 1), (11, 2)]);
        assert_eq!(queue.insert(Some(40)).unwrap(), 3);
        assert!(queue.changes().is_empty());
    }

    #[test]
    fn test_insert_rejects_zero() {
        let mut queue = BookQueue::load(1, vec![(10, 1)]);
        assert!(matches!(queue.insert(Some(0)), Err(AppError::Validation(_))));
        assert!(queue.changes().is_empty());
    }

    #[test]
    fn test_remove_compacts_greater_positions() {
        let mut queue = BookQueue::load(1, vec![(1, 1), (2, 2), (3, 3)]);
        assert_eq!(queue.remove(1), Some(1));
        assert_eq!(queue.positions(), vec![(2, 1), (3, 2)]);
        assert_contiguous(&queue);
    }

    #[test]
    fn test_remove_middle_leaves_earlier_alone() {
        let mut queue = BookQueue::load(1, vec![(1, 1), (2, 2), (3, 3), (4, 4)]);
        assert_eq!(queue.remove(3), Some(3));
        assert_eq!(queue.changes(), vec![(4, 3)]);
        assert_eq!(queue.position_of(1), Some(1));
        assert_eq!(queue.position_of(2), Some(2));
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut queue = BookQueue::load(1, vec![(1, 1)]);
        assert_eq!(queue.remove(99), None);
        assert!(queue.changes().is_empty());
    }

    #[test]
    fn test_load_repairs_gaps_and_duplicates() {
        let queue = BookQueue::load(1, vec![(5, 4), (3, 2), (4, 2)]);
        assert!(queue.was_repaired());
        assert_eq!(queue.positions(), vec![(3, 1), (4, 2), (5, 3)]);
        let mut changes = queue.changes();
        changes.sort_unstable();
        assert_eq!(changes, vec![(3, 1), (5, 3)]);
    }

    #[test]
    fn test_contiguous_after_mixed_operations() {
        let mut queue = BookQueue::load(1, Vec::new());
        let mut next_id = 1;
        for requested in [None, None, Some(1), None, Some(3), Some(10)] {
            let position = queue.insert(requested).unwrap();
            // Commit the new entry the way the repository does after INSERT
            let mut entries = queue.positions();
            entries.push((next_id, position));
            queue = BookQueue::load(1, entries);
            assert!(!queue.was_repaired());
            next_id += 1;
        }
        assert_eq!(queue.len(), 6);

        queue.remove(3);
        queue.remove(6);
        let positions: Vec<i32> = queue.positions().into_iter().map(|(_, p)| p).collect();
        assert_eq!(positions, vec![1, 2, 3, 4]);
    }
}
