//! Weekly availability grid.
//!
//! Members of a group mark the hours of the week they are free. The grid
//! covers seven days (0 = Monday) and sixteen hourly slots starting at 08:00.
//! [`aggregate`] folds the individual slots into per-cell attendance counts
//! and percentages. Nothing here is persisted; the grid is recomputed on
//! every request from the stored slots.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// Number of days in the grid.
pub const DAYS_PER_WEEK: u8 = 7;

/// First hour of the day covered by the grid (08:00).
pub const FIRST_HOUR: u8 = 8;

/// Number of hourly slots per day (08:00 through 23:00).
pub const HOURS_PER_DAY: u8 = 16;

/// Last hour of the day covered by the grid (inclusive).
pub const LAST_HOUR: u8 = FIRST_HOUR + HOURS_PER_DAY - 1;

/// Total number of cells in a grid.
pub const CELLS_PER_GRID: usize = DAYS_PER_WEEK as usize * HOURS_PER_DAY as usize;

/// A single hour of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Slot {
    day: u8,
    hour: u8,
}

impl Slot {
    /// Build a slot, rejecting days outside `0..=6` and hours outside `8..=23`.
    pub fn new(day: u8, hour: u8) -> Result<Self, CoreError> {
        if day >= DAYS_PER_WEEK {
            return Err(CoreError::Validation(format!(
                "day_of_week must be between 0 and {}, got {day}",
                DAYS_PER_WEEK - 1
            )));
        }
        if !(FIRST_HOUR..=LAST_HOUR).contains(&hour) {
            return Err(CoreError::Validation(format!(
                "hour must be between {FIRST_HOUR} and {LAST_HOUR}, got {hour}"
            )));
        }
        Ok(Self { day, hour })
    }

    /// Build a slot from database columns (`SMALLINT`).
    pub fn from_db(day: i16, hour: i16) -> Result<Self, CoreError> {
        let day = u8::try_from(day)
            .map_err(|_| CoreError::Validation(format!("day_of_week out of range: {day}")))?;
        let hour = u8::try_from(hour)
            .map_err(|_| CoreError::Validation(format!("hour out of range: {hour}")))?;
        Self::new(day, hour)
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    /// Position of this slot in a day-major cell vector.
    fn index(&self) -> usize {
        self.day as usize * HOURS_PER_DAY as usize + (self.hour - FIRST_HOUR) as usize
    }
}

/// One cell of an aggregated grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridCell {
    pub day: u8,
    pub hour: u8,
    /// Number of considered members free in this hour.
    pub free_count: usize,
    /// Ids of the free members, ascending.
    pub free_member_ids: Vec<DbId>,
    /// `free_count` as a rounded percentage of the considered members.
    pub percentage: u8,
}

/// Aggregated availability for a set of members.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvailabilityGrid {
    /// Number of members the percentages are computed against.
    pub member_count: usize,
    /// All cells, ordered by day then hour.
    pub cells: Vec<GridCell>,
}

impl AvailabilityGrid {
    /// Look up the cell for a slot.
    pub fn cell(&self, slot: Slot) -> &GridCell {
        &self.cells[slot.index()]
    }

    /// Best-attended cells, highest percentage first.
    ///
    /// Only cells with at least one free member and a percentage of at least
    /// `min_percentage` qualify. Ties are broken by earlier day, then earlier hour.
    pub fn best_slots(&self, limit: usize, min_percentage: u8) -> Vec<&GridCell> {
        let mut ranked: Vec<&GridCell> = self
            .cells
            .iter()
            .filter(|c| c.free_count > 0 && c.percentage >= min_percentage)
            .collect();
        ranked.sort_by(|a, b| {
            b.percentage
                .cmp(&a.percentage)
                .then(a.day.cmp(&b.day))
                .then(a.hour.cmp(&b.hour))
        });
        ranked.truncate(limit);
        ranked
    }

    /// Cells where every considered member is free.
    pub fn fully_available(&self) -> Vec<&GridCell> {
        if self.member_count == 0 {
            return Vec::new();
        }
        self.cells
            .iter()
            .filter(|c| c.free_count == self.member_count)
            .collect()
    }
}

/// Fold individual availability into a grid.
///
/// - `member_ids`: everyone currently in the group.
/// - `entries`: `(user_id, slot)` pairs as stored.
/// - `filter`: optional subset of members to consider; ids that are not
///   members of the group are ignored.
///
/// Entries from users outside the considered population are dropped and a
/// repeated `(user, slot)` pair counts once.
pub fn aggregate<I>(member_ids: &[DbId], entries: I, filter: Option<&[DbId]>) -> AvailabilityGrid
where
    I: IntoIterator<Item = (DbId, Slot)>,
{
    let population: HashSet<DbId> = match filter {
        Some(wanted) => {
            let wanted: HashSet<DbId> = wanted.iter().copied().collect();
            member_ids
                .iter()
                .copied()
                .filter(|id| wanted.contains(id))
                .collect()
        }
        None => member_ids.iter().copied().collect(),
    };

    let mut free: Vec<BTreeSet<DbId>> = vec![BTreeSet::new(); CELLS_PER_GRID];
    for (user_id, slot) in entries {
        if population.contains(&user_id) {
            free[slot.index()].insert(user_id);
        }
    }

    let member_count = population.len();
    let cells = free
        .into_iter()
        .enumerate()
        .map(|(i, ids)| {
            let free_count = ids.len();
            GridCell {
                day: (i / HOURS_PER_DAY as usize) as u8,
                hour: FIRST_HOUR + (i % HOURS_PER_DAY as usize) as u8,
                free_count,
                free_member_ids: ids.into_iter().collect(),
                percentage: percentage(free_count, member_count),
            }
        })
        .collect();

    AvailabilityGrid {
        member_count,
        cells,
    }
}

/// Rounded share of `count` in `total`, as 0..=100. Zero when `total` is zero.
fn percentage(count: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((count * 100 + total / 2) / total) as u8
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn slot(day: u8, hour: u8) -> Slot {
        Slot::new(day, hour).unwrap()
    }

    // -- Slot ----------------------------------------------------------------

    #[test]
    fn slot_accepts_grid_bounds() {
        assert!(Slot::new(0, 8).is_ok());
        assert!(Slot::new(6, 23).is_ok());
    }

    #[test]
    fn slot_rejects_out_of_range() {
        assert_matches!(Slot::new(7, 10), Err(CoreError::Validation(_)));
        assert_matches!(Slot::new(0, 7), Err(CoreError::Validation(_)));
        assert_matches!(Slot::new(0, 24), Err(CoreError::Validation(_)));
    }

    #[test]
    fn slot_from_db_rejects_negative() {
        assert_matches!(Slot::from_db(-1, 9), Err(CoreError::Validation(_)));
        assert_matches!(Slot::from_db(1, -9), Err(CoreError::Validation(_)));
        assert_eq!(Slot::from_db(2, 12).unwrap(), slot(2, 12));
    }

    // -- aggregate -----------------------------------------------------------

    #[test]
    fn grid_has_every_cell_in_order() {
        let grid = aggregate(&[1], Vec::new(), None);
        assert_eq!(grid.cells.len(), 112);
        assert_eq!((grid.cells[0].day, grid.cells[0].hour), (0, 8));
        assert_eq!((grid.cells[15].day, grid.cells[15].hour), (0, 23));
        assert_eq!((grid.cells[16].day, grid.cells[16].hour), (1, 8));
        assert_eq!((grid.cells[111].day, grid.cells[111].hour), (6, 23));
    }

    #[test]
    fn percentages_are_rounded() {
        let entries = vec![(1, slot(0, 9)), (2, slot(0, 9)), (1, slot(0, 10))];
        let grid = aggregate(&[1, 2, 3], entries, None);

        assert_eq!(grid.member_count, 3);
        assert_eq!(grid.cell(slot(0, 9)).free_count, 2);
        assert_eq!(grid.cell(slot(0, 9)).percentage, 67);
        assert_eq!(grid.cell(slot(0, 10)).percentage, 33);
        assert_eq!(grid.cell(slot(0, 11)).percentage, 0);
    }

    #[test]
    fn empty_group_yields_zero_everywhere() {
        let grid = aggregate(&[], vec![(1, slot(3, 12))], None);
        assert_eq!(grid.member_count, 0);
        assert!(grid.cells.iter().all(|c| c.percentage == 0 && c.free_count == 0));
        assert!(grid.fully_available().is_empty());
    }

    #[test]
    fn non_members_are_ignored() {
        let grid = aggregate(&[1, 2], vec![(1, slot(1, 8)), (99, slot(1, 8))], None);
        let cell = grid.cell(slot(1, 8));
        assert_eq!(cell.free_count, 1);
        assert_eq!(cell.free_member_ids, vec![1]);
        assert_eq!(cell.percentage, 50);
    }

    #[test]
    fn duplicate_entries_count_once() {
        let grid = aggregate(&[1, 2], vec![(2, slot(4, 20)), (2, slot(4, 20))], None);
        assert_eq!(grid.cell(slot(4, 20)).free_count, 1);
    }

    #[test]
    fn filter_narrows_population() {
        let entries = vec![(1, slot(2, 18)), (2, slot(2, 18)), (3, slot(2, 19))];
        let grid = aggregate(&[1, 2, 3], entries, Some(&[1, 3]));

        assert_eq!(grid.member_count, 2);
        assert_eq!(grid.cell(slot(2, 18)).free_member_ids, vec![1]);
        assert_eq!(grid.cell(slot(2, 18)).percentage, 50);
        assert_eq!(grid.cell(slot(2, 19)).percentage, 50);
    }

    #[test]
    fn filter_ignores_ids_outside_group() {
        let grid = aggregate(&[1, 2], vec![(1, slot(0, 8))], Some(&[1, 42]));
        assert_eq!(grid.member_count, 1);
        assert_eq!(grid.cell(slot(0, 8)).percentage, 100);
    }

    #[test]
    fn free_member_ids_are_sorted() {
        let entries = vec![(9, slot(5, 14)), (3, slot(5, 14)), (5, slot(5, 14))];
        let grid = aggregate(&[3, 5, 9], entries, None);
        assert_eq!(grid.cell(slot(5, 14)).free_member_ids, vec![3, 5, 9]);
    }

    // -- ranking -------------------------------------------------------------

    #[test]
    fn best_slots_orders_by_percentage_then_time() {
        let entries = vec![
            (1, slot(3, 10)),
            (2, slot(3, 10)),
            (1, slot(1, 12)),
            (2, slot(1, 12)),
            (1, slot(0, 8)),
        ];
        let grid = aggregate(&[1, 2], entries, None);
        let best = grid.best_slots(10, 0);

        let order: Vec<(u8, u8, u8)> = best.iter().map(|c| (c.day, c.hour, c.percentage)).collect();
        assert_eq!(order, vec![(1, 12, 100), (3, 10, 100), (0, 8, 50)]);
    }

    #[test]
    fn best_slots_respects_limit_and_threshold() {
        let entries = vec![(1, slot(0, 8)), (1, slot(0, 9)), (2, slot(0, 9))];
        let grid = aggregate(&[1, 2], entries, None);

        assert_eq!(grid.best_slots(1, 0).len(), 1);
        let strict = grid.best_slots(10, 75);
        assert_eq!(strict.len(), 1);
        assert_eq!(strict[0].hour, 9);
    }

    #[test]
    fn best_slots_skips_empty_cells_even_at_zero_threshold() {
        let grid = aggregate(&[1], Vec::new(), None);
        assert!(grid.best_slots(5, 0).is_empty());
    }

    #[test]
    fn fully_available_requires_everyone() {
        let entries = vec![(1, slot(6, 22)), (2, slot(6, 22)), (1, slot(6, 23))];
        let grid = aggregate(&[1, 2], entries, None);
        let full = grid.fully_available();
        assert_eq!(full.len(), 1);
        assert_eq!((full[0].day, full[0].hour), (6, 22));
    }
}
