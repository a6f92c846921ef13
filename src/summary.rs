//! Projects a sheet summary payload into displayable totals. Row order is
//! whatever the server sent.

use crate::model::{ActivityId, SheetSummary};

#[derive(Clone, Debug, PartialEq)]
pub struct SummaryRow {
    pub id: ActivityId,
    pub color: String,
    pub sum: String,
    pub title: String,
}

pub fn format_hours(hours: f64) -> String {
    format!("{hours:.2}")
}

pub fn total(summary: &SheetSummary) -> String {
    format_hours(summary.total)
}

pub fn rows(summary: &SheetSummary) -> Vec<SummaryRow> {
    summary
        .summary
        .iter()
        .map(|entry| SummaryRow {
            id: entry.id.clone(),
            color: entry.color.clone(),
            sum: format_hours(entry.sum),
            title: entry.title.clone(),
        })
        .collect()
}
