//! The day grid: 96 quarter-hour slots and the transaction that makes a
//! drag gesture atomic. Slots touched during an open transaction keep a
//! snapshot of their previous state so a failed commit can put every one of
//! them back exactly as it was.

use std::collections::BTreeMap;

use anyhow::{Result, bail};
use time::Date;

use crate::color::{self, UNASSIGNED_BORDER, UNASSIGNED_FILL};
use crate::model::{Activity, ActivityId, SLOTS_PER_DAY, SheetPayload};

#[derive(Clone, Debug, PartialEq)]
pub struct Slot {
    pub activity_id: ActivityId,
    pub fill: String,
    pub border: String,

    /// Transaction-scoped marker: set while a paint of this slot has not
    /// been committed or rolled back yet.
    pub pending: bool,
}

impl Slot {
    fn unassigned() -> Self {
        Self {
            activity_id: ActivityId::unassigned(),
            fill: UNASSIGNED_FILL.to_string(),
            border: UNASSIGNED_BORDER.to_string(),
            pending: false,
        }
    }
}

/// Exact pre-transaction state of a touched slot.
#[derive(Clone, Debug, PartialEq)]
pub struct SlotSnapshot {
    pub activity_id: ActivityId,
    pub fill: String,
    pub border: String,
}

impl SlotSnapshot {
    fn of(slot: &Slot) -> Self {
        Self {
            activity_id: slot.activity_id.clone(),
            fill: slot.fill.clone(),
            border: slot.border.clone(),
        }
    }
}

/// The mutations of one drag gesture. At most one transaction is open per
/// sheet; each touched slot is snapshotted exactly once, on first contact.
#[derive(Debug, Default)]
pub struct Transaction {
    open: bool,
    snapshots: BTreeMap<usize, SlotSnapshot>,
}

impl Transaction {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn touched(&self) -> usize {
        self.snapshots.len()
    }

    pub fn has_snapshot(&self, index: usize) -> bool {
        self.snapshots.contains_key(&index)
    }

    pub(crate) fn begin(&mut self) {
        self.open = true;
    }

    /// Close the transaction and hand over its snapshot set. The open flag
    /// clears here, at gesture release, before the commit outcome is known.
    pub(crate) fn close(&mut self) -> BTreeMap<usize, SlotSnapshot> {
        self.open = false;
        std::mem::take(&mut self.snapshots)
    }

    fn record(&mut self, index: usize, snapshot: SlotSnapshot) {
        self.snapshots.entry(index).or_insert(snapshot);
    }
}

/// The 96 ordered slot states for one date. Slot index is the quarter-hour
/// offset from midnight and doubles as the wire encoding order.
#[derive(Debug)]
pub struct DaySheet {
    date: Date,
    slots: Vec<Slot>,
}

impl DaySheet {
    /// A fresh sheet with every slot unassigned.
    pub fn unassigned(date: Date) -> Self {
        Self {
            date,
            slots: (0..SLOTS_PER_DAY).map(|_| Slot::unassigned()).collect(),
        }
    }

    /// Build a sheet from a server payload. Anything other than exactly 96
    /// cells is rejected before the sheet can reach the network again.
    pub fn hydrate(date: Date, payload: &SheetPayload) -> Result<Self> {
        if payload.quarters.len() != SLOTS_PER_DAY {
            bail!(
                "sheet for {} is broken: expected {} quarters, got {}",
                crate::model::format_sheet_date(date),
                SLOTS_PER_DAY,
                payload.quarters.len()
            );
        }
        let slots = payload
            .quarters
            .iter()
            .map(|cell| Slot {
                activity_id: cell.id.clone(),
                fill: cell.color.clone(),
                border: cell.border_color.clone(),
                pending: false,
            })
            .collect();
        Ok(Self { date, slots })
    }

    pub fn date(&self) -> Date {
        self.date
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// The 96 activity ids in index order, ready for transmission.
    pub fn quarters(&self) -> Vec<ActivityId> {
        self.slots.iter().map(|s| s.activity_id.clone()).collect()
    }

    pub fn has_pending(&self) -> bool {
        self.slots.iter().any(|s| s.pending)
    }

    /// Paint one slot with the given activity inside the open transaction.
    /// A slot is painted at most once per transaction: the snapshot taken on
    /// first contact must survive, so later touches of the same slot in the
    /// same gesture are no-ops.
    pub(crate) fn paint(&mut self, index: usize, activity: &Activity, txn: &mut Transaction) {
        let Some(slot) = self.slots.get_mut(index) else {
            return;
        };
        if txn.has_snapshot(index) {
            return;
        }

        txn.record(index, SlotSnapshot::of(slot));

        slot.activity_id = activity.id.clone();
        slot.fill = activity.color.clone();
        slot.border = color::border_for(&activity.color);
        slot.pending = true;
    }

    /// Put a slot back verbatim from its snapshot.
    pub(crate) fn restore(&mut self, index: usize, snapshot: &SlotSnapshot) {
        let Some(slot) = self.slots.get_mut(index) else {
            return;
        };
        slot.activity_id = snapshot.activity_id.clone();
        slot.fill = snapshot.fill.clone();
        slot.border = snapshot.border.clone();
        slot.pending = false;
    }

    pub(crate) fn clear_pending(&mut self) {
        for slot in &mut self.slots {
            slot.pending = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuarterCell;

    fn test_date() -> Date {
        crate::model::parse_sheet_date("2013-02-05").unwrap()
    }

    fn work() -> Activity {
        Activity {
            id: ActivityId("7".to_string()),
            title: "Work".to_string(),
            color: "#ff0000".to_string(),
        }
    }

    fn meetings() -> Activity {
        Activity {
            id: ActivityId("8".to_string()),
            title: "Meetings".to_string(),
            color: "#00ff00".to_string(),
        }
    }

    #[test]
    fn fresh_sheet_has_96_unassigned_slots() {
        let sheet = DaySheet::unassigned(test_date());
        assert_eq!(sheet.len(), SLOTS_PER_DAY);
        assert!(sheet.slots().iter().all(|s| s.activity_id.is_unassigned()));
        assert!(!sheet.has_pending());
    }

    #[test]
    fn hydrate_rejects_short_payloads() {
        let payload = SheetPayload {
            quarters: vec![
                QuarterCell {
                    id: ActivityId::unassigned(),
                    color: UNASSIGNED_FILL.to_string(),
                    border_color: UNASSIGNED_BORDER.to_string(),
                };
                95
            ],
            total: 0.0,
            summary: Vec::new(),
        };
        assert!(DaySheet::hydrate(test_date(), &payload).is_err());
    }

    #[test]
    fn paint_sets_colors_and_derives_border() {
        let mut sheet = DaySheet::unassigned(test_date());
        let mut txn = Transaction::default();
        txn.begin();

        sheet.paint(10, &work(), &mut txn);

        let slot = sheet.slot(10).unwrap();
        assert_eq!(slot.activity_id, work().id);
        assert_eq!(slot.fill, "#ff0000");
        assert_eq!(slot.border, "#cc0000");
        assert!(slot.pending);
    }

    #[test]
    fn snapshot_is_written_once_per_transaction() {
        let mut sheet = DaySheet::unassigned(test_date());
        let mut txn = Transaction::default();
        txn.begin();

        sheet.paint(10, &work(), &mut txn);
        sheet.paint(10, &work(), &mut txn);
        sheet.paint(10, &meetings(), &mut txn);

        assert_eq!(txn.touched(), 1);
        // Later touches in the same gesture do not repaint either.
        assert_eq!(sheet.slot(10).unwrap().activity_id, work().id);

        let snapshots = txn.close();
        assert_eq!(
            snapshots.get(&10).unwrap().activity_id,
            ActivityId::unassigned()
        );
    }

    #[test]
    fn repaint_is_idempotent() {
        let mut sheet = DaySheet::unassigned(test_date());

        let mut txn = Transaction::default();
        txn.begin();
        sheet.paint(10, &work(), &mut txn);
        let once = sheet.slot(10).unwrap().clone();

        sheet.paint(10, &work(), &mut txn);
        assert_eq!(sheet.slot(10).unwrap(), &once);
    }

    #[test]
    fn restore_reverts_exactly_and_clears_pending() {
        let mut sheet = DaySheet::unassigned(test_date());
        let mut txn = Transaction::default();
        txn.begin();

        sheet.paint(10, &work(), &mut txn);
        sheet.paint(11, &work(), &mut txn);
        let snapshots = txn.close();

        for (index, snapshot) in &snapshots {
            sheet.restore(*index, snapshot);
        }

        for index in [10usize, 11] {
            let slot = sheet.slot(index).unwrap();
            assert_eq!(slot.activity_id, ActivityId::unassigned());
            assert_eq!(slot.fill, UNASSIGNED_FILL);
            assert_eq!(slot.border, UNASSIGNED_BORDER);
            assert!(!slot.pending);
        }
        assert_eq!(sheet.len(), SLOTS_PER_DAY);
    }

    #[test]
    fn out_of_range_paint_is_ignored() {
        let mut sheet = DaySheet::unassigned(test_date());
        let mut txn = Transaction::default();
        txn.begin();

        sheet.paint(SLOTS_PER_DAY, &work(), &mut txn);
        assert_eq!(txn.touched(), 0);
        assert_eq!(sheet.len(), SLOTS_PER_DAY);
    }
}
