use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use time::Date;
use time::format_description::FormatItem;

/// A day is 24 hours of four quarter-hour slots each.
pub const SLOTS_PER_DAY: usize = 96;

/// Activity id as the server hands it out. `"-1"` is the unassigned
/// sentinel ("not working").
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActivityId(pub String);

impl ActivityId {
    pub fn unassigned() -> Self {
        Self("-1".to_string())
    }

    pub fn is_unassigned(&self) -> bool {
        self.0 == "-1"
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub title: String,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SummaryEntry {
    pub id: ActivityId,
    pub title: String,
    pub color: String,
    pub sum: f64,
}

/// Per-day totals as returned by a sheet write or read. Replaces any
/// previously displayed summary wholesale.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SheetSummary {
    pub total: f64,

    #[serde(default)]
    pub summary: Vec<SummaryEntry>,
}

/// One cell of a hydrated sheet: the activity id plus the colors the
/// server resolved for it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuarterCell {
    pub id: ActivityId,
    pub color: String,

    #[serde(rename = "border-color")]
    pub border_color: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SheetPayload {
    pub quarters: Vec<QuarterCell>,
    pub total: f64,

    #[serde(default)]
    pub summary: Vec<SummaryEntry>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PutSheetRequest {
    pub quarters: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActivitiesResponse {
    pub activities: Vec<Activity>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActivityResponse {
    pub activity: Activity,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActivityRequest {
    pub title: String,
    pub color: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub base_url: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientConfig {
    pub version: u32,

    #[serde(default)]
    pub remote: Option<RemoteConfig>,

    #[serde(default)]
    pub preferred_activity: Option<Activity>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            version: 1,
            remote: None,
            preferred_activity: None,
        }
    }
}

/// Wire encoding of a day: the 96 activity ids in slot-index order, in the
/// sheet's literal list serialization.
pub fn encode_quarters(ids: &[ActivityId]) -> String {
    ids.iter()
        .map(|id| id.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

pub fn decode_quarters(encoded: &str) -> Vec<ActivityId> {
    encoded
        .split(',')
        .map(|id| ActivityId(id.to_string()))
        .collect()
}

fn sheet_date_fmt() -> &'static [FormatItem<'static>] {
    static FMT: OnceLock<Vec<FormatItem<'static>>> = OnceLock::new();
    FMT.get_or_init(|| {
        time::format_description::parse("[year]-[month padding:zero]-[day padding:zero]")
            .expect("valid date format")
    })
}

pub fn parse_sheet_date(s: &str) -> Result<Date> {
    Date::parse(s, sheet_date_fmt()).with_context(|| format!("parse date {s:?} (want YYYY-MM-DD)"))
}

pub fn format_sheet_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarters_round_trip_in_slot_order() {
        let ids = vec![
            ActivityId("3".to_string()),
            ActivityId::unassigned(),
            ActivityId("12".to_string()),
        ];
        let encoded = encode_quarters(&ids);
        assert_eq!(encoded, "3,-1,12");
        assert_eq!(decode_quarters(&encoded), ids);
    }

    #[test]
    fn sheet_dates_parse_and_format() {
        let date = parse_sheet_date("2013-02-05").unwrap();
        assert_eq!(format_sheet_date(date), "2013-02-05");
        assert!(parse_sheet_date("2013-2-5").is_err());
        assert!(parse_sheet_date("not-a-date").is_err());
    }

    #[test]
    fn quarter_cell_uses_css_style_border_key() {
        let cell = QuarterCell {
            id: ActivityId::unassigned(),
            color: "#fff".to_string(),
            border_color: "#ccc".to_string(),
        };
        let json = serde_json::to_value(&cell).unwrap();
        assert_eq!(json["border-color"], "#ccc");
    }
}
