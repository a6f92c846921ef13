//! Geometry of the day grid: one row per hour, four quarter cells per row.
//! This is the input boundary where terminal cells become slot indices; the
//! paint engine never sees coordinates.

use ratatui::layout::Rect;

use crate::model::SLOTS_PER_DAY;

pub(super) const HOURS: u16 = 24;
pub(super) const QUARTERS_PER_HOUR: u16 = 4;

/// Width of the "HH:00" gutter to the left of the cells.
pub(super) const LABEL_WIDTH: u16 = 6;

/// Width of one quarter cell, border column included.
pub(super) const CELL_WIDTH: u16 = 5;

pub(super) fn grid_width() -> u16 {
    LABEL_WIDTH + QUARTERS_PER_HOUR * CELL_WIDTH
}

/// Resolve a terminal position inside `area` to a slot index, if it lands
/// on a quarter cell.
pub(super) fn slot_at(area: Rect, column: u16, row: u16) -> Option<usize> {
    let row = row.checked_sub(area.y)?;
    if row >= HOURS.min(area.height) {
        return None;
    }
    let x = column.checked_sub(area.x)?.checked_sub(LABEL_WIDTH)?;
    let quarter = x / CELL_WIDTH;
    if quarter >= QUARTERS_PER_HOUR || column >= area.x + area.width {
        return None;
    }

    let index = (row * QUARTERS_PER_HOUR + quarter) as usize;
    (index < SLOTS_PER_DAY).then_some(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> Rect {
        Rect::new(2, 3, grid_width(), HOURS)
    }

    #[test]
    fn first_cell_of_each_hour() {
        assert_eq!(slot_at(area(), 2 + LABEL_WIDTH, 3), Some(0));
        assert_eq!(slot_at(area(), 2 + LABEL_WIDTH, 3 + 8), Some(32));
        assert_eq!(slot_at(area(), 2 + LABEL_WIDTH, 3 + 23), Some(92));
    }

    #[test]
    fn quarters_within_an_hour() {
        let x = 2 + LABEL_WIDTH;
        assert_eq!(slot_at(area(), x + CELL_WIDTH - 1, 3), Some(0));
        assert_eq!(slot_at(area(), x + CELL_WIDTH, 3), Some(1));
        assert_eq!(slot_at(area(), x + 3 * CELL_WIDTH, 3), Some(3));
    }

    #[test]
    fn gutter_and_outside_miss() {
        assert_eq!(slot_at(area(), 2, 3), None);
        assert_eq!(slot_at(area(), 2 + LABEL_WIDTH - 1, 3), None);
        assert_eq!(slot_at(area(), 0, 3), None);
        assert_eq!(slot_at(area(), 2 + LABEL_WIDTH, 2), None);
        assert_eq!(slot_at(area(), 2 + LABEL_WIDTH, 3 + 24), None);
        assert_eq!(slot_at(area(), 2 + grid_width(), 3), None);
    }

    #[test]
    fn clipped_area_hides_clipped_rows() {
        let clipped = Rect::new(0, 0, grid_width(), 10);
        assert_eq!(slot_at(clipped, LABEL_WIDTH, 9), Some(36));
        assert_eq!(slot_at(clipped, LABEL_WIDTH, 10), None);
    }
}
