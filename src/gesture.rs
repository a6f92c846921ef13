//! Turns pointer events into paint operations and transaction boundaries.
//! The input boundary resolves whatever the UI toolkit reports into integer
//! slot indices before events reach here; no coordinates cross this line.

use std::collections::BTreeMap;

use time::Date;

use crate::model::{Activity, ActivityId, SLOTS_PER_DAY, SheetSummary};
use crate::remote::{CommitError, SheetSync};
use crate::sheet::{DaySheet, SlotSnapshot, Transaction};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerTarget {
    Slot(usize),
    Outside,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEvent {
    Press {
        button: PointerButton,
        target: PointerTarget,
    },
    Move {
        /// Button currently held, if any. Moves without the primary button
        /// held are ignored; stale move events can arrive after release.
        button: Option<PointerButton>,
        target: PointerTarget,
    },
    /// Release fires wherever the pointer is, grid or not, so a drag that
    /// leaves the grid still closes cleanly.
    Release { button: PointerButton },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GestureState {
    #[default]
    Idle,
    Painting,
}

/// A closed transaction on its way to the server. The controller's open
/// flag is already cleared when this value exists; a new gesture may begin
/// while this one is unresolved, and a late rollback will overwrite
/// whatever that newer gesture painted, since restore acts on raw slot
/// indices. That overlap is accepted behavior, kept observable here rather
/// than hidden in callback timing.
#[derive(Debug)]
pub struct PendingCommit {
    pub date: Date,
    pub quarters: Vec<ActivityId>,
    snapshots: BTreeMap<usize, SlotSnapshot>,
}

impl PendingCommit {
    /// Resolve against the sync seam: on success the pending markers clear
    /// and the painted grid becomes the next baseline; on a sync failure
    /// every touched slot is restored verbatim. A validation failure sends
    /// nothing and touches nothing.
    pub fn resolve(
        self,
        sync: &dyn SheetSync,
        sheet: &mut DaySheet,
    ) -> Result<SheetSummary, CommitError> {
        if self.quarters.len() != SLOTS_PER_DAY {
            return Err(CommitError::Validation(self.quarters.len()));
        }
        match sync.commit(self.date, &self.quarters) {
            Ok(summary) => {
                sheet.clear_pending();
                Ok(summary)
            }
            Err(err @ CommitError::Validation(_)) => Err(err),
            Err(err @ CommitError::Sync(_)) => {
                self.rollback(sheet);
                Err(err)
            }
        }
    }

    /// Apply every snapshot back verbatim and drop all pending markers.
    pub fn rollback(self, sheet: &mut DaySheet) {
        for (index, snapshot) in &self.snapshots {
            sheet.restore(*index, snapshot);
        }
        sheet.clear_pending();
    }

    pub fn touched(&self) -> usize {
        self.snapshots.len()
    }
}

/// Two-state machine: `Idle` until a primary press over a slot, `Painting`
/// until the matching release. Cycles for the life of the app.
#[derive(Debug, Default)]
pub struct GestureController {
    state: GestureState,
    txn: Transaction,
}

impl GestureController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn transaction(&self) -> &Transaction {
        &self.txn
    }

    /// Feed one pointer event. Returns the closed transaction as a
    /// `PendingCommit` when a gesture completes; everything else returns
    /// `None`.
    pub fn on_pointer(
        &mut self,
        event: PointerEvent,
        sheet: &mut DaySheet,
        activity: &Activity,
    ) -> Option<PendingCommit> {
        match event {
            PointerEvent::Press {
                button: PointerButton::Primary,
                target: PointerTarget::Slot(index),
            } => {
                if !self.txn.is_open() {
                    self.txn.begin();
                }
                self.state = GestureState::Painting;
                sheet.paint(index, activity, &mut self.txn);
                None
            }

            PointerEvent::Move {
                button: Some(PointerButton::Primary),
                target: PointerTarget::Slot(index),
            } if self.state == GestureState::Painting => {
                sheet.paint(index, activity, &mut self.txn);
                None
            }

            PointerEvent::Release {
                button: PointerButton::Primary,
            } if self.state == GestureState::Painting => {
                self.state = GestureState::Idle;
                let snapshots = self.txn.close();
                Some(PendingCommit {
                    date: sheet.date(),
                    quarters: sheet.quarters(),
                    snapshots,
                })
            }

            // Non-primary buttons, presses outside the grid, moves without
            // the button held, and releases with nothing open.
            _ => None,
        }
    }
}
