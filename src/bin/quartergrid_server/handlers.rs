use super::*;

use quartergrid::color;
use quartergrid::model::{
    ActivitiesResponse, Activity, ActivityRequest, ActivityResponse, PutSheetRequest, QuarterCell,
    SLOTS_PER_DAY, SheetPayload, SheetSummary, SummaryEntry, decode_quarters,
};

#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
pub(super) struct ActivityTable {
    pub(super) next_id: u64,
    pub(super) items: Vec<Activity>,
}

impl ActivityTable {
    fn find(&self, id: &str) -> Option<&Activity> {
        self.items.iter().find(|a| a.id.as_str() == id)
    }
}

pub(super) async fn list_activities(State(state): State<Arc<AppState>>) -> Json<ActivitiesResponse> {
    let activities = state.activities.read().await;
    Json(ActivitiesResponse {
        activities: activities.items.clone(),
    })
}

pub(super) async fn create_activity(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ActivityRequest>,
) -> Result<Json<ActivityResponse>, Response> {
    validate_activity_fields(&payload).map_err(bad_request)?;

    let activity = {
        let mut activities = state.activities.write().await;
        let id = activities.next_id;
        activities.next_id += 1;
        let activity = Activity {
            id: ActivityId(id.to_string()),
            title: payload.title,
            color: payload.color,
        };
        activities.items.push(activity.clone());
        activity
    };

    persist(&state).await?;
    log::info!("created activity {}", activity.id.as_str());
    Ok(Json(ActivityResponse { activity }))
}

pub(super) async fn update_activity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<ActivityRequest>,
) -> Result<Json<ActivityResponse>, Response> {
    validate_activity_fields(&payload).map_err(bad_request)?;

    let activity = {
        let mut activities = state.activities.write().await;
        let Some(activity) = activities.items.iter_mut().find(|a| a.id.as_str() == id) else {
            return Err(not_found());
        };
        activity.title = payload.title;
        activity.color = payload.color;
        activity.clone()
    };

    persist(&state).await?;
    Ok(Json(ActivityResponse { activity }))
}

pub(super) async fn delete_activity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, Response> {
    {
        let mut activities = state.activities.write().await;
        let before = activities.items.len();
        activities.items.retain(|a| a.id.as_str() != id);
        if activities.items.len() == before {
            return Err(not_found());
        }
    }

    persist(&state).await?;
    Ok(Json(serde_json::json!({"status": "ok"})))
}

pub(super) async fn get_sheet(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
) -> Result<Json<SheetPayload>, Response> {
    validate_sheet_date(&date).map_err(bad_request)?;

    let sheets = state.sheets.read().await;
    let activities = state.activities.read().await;

    let unassigned = vec![ActivityId::unassigned(); SLOTS_PER_DAY];
    let quarters = sheets.get(&date).unwrap_or(&unassigned);

    let cells = quarters
        .iter()
        .map(|id| match activities.find(id.as_str()) {
            Some(activity) => QuarterCell {
                id: id.clone(),
                color: activity.color.clone(),
                border_color: color::border_for(&activity.color),
            },
            None => QuarterCell {
                id: ActivityId::unassigned(),
                color: color::UNASSIGNED_FILL.to_string(),
                border_color: color::UNASSIGNED_BORDER.to_string(),
            },
        })
        .collect();

    let summary = compute_summary(quarters, &activities);
    Ok(Json(SheetPayload {
        quarters: cells,
        total: summary.total,
        summary: summary.summary,
    }))
}

pub(super) async fn put_sheet(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
    Json(payload): Json<PutSheetRequest>,
) -> Result<Json<SheetSummary>, Response> {
    validate_sheet_date(&date).map_err(bad_request)?;

    let quarters = decode_quarters(&payload.quarters);
    if quarters.len() != SLOTS_PER_DAY {
        return Err(bad_request(anyhow::anyhow!(
            "a timesheet must contain {} quarters, not {}",
            SLOTS_PER_DAY,
            quarters.len()
        )));
    }

    {
        let mut sheets = state.sheets.write().await;
        sheets.insert(date.clone(), quarters.clone());
    }
    persist(&state).await?;
    log::info!("updated sheet {}", date);

    let activities = state.activities.read().await;
    Ok(Json(compute_summary(&quarters, &activities)))
}

/// Per-activity totals for one day: each quarter is 0.25 hours. Rows appear
/// in order of first appearance in the day; unassigned quarters are not
/// working time and stay out of the summary.
fn compute_summary(quarters: &[ActivityId], activities: &ActivityTable) -> SheetSummary {
    let mut order: Vec<&ActivityId> = Vec::new();
    let mut counts: HashMap<&ActivityId, u32> = HashMap::new();

    for id in quarters {
        if id.is_unassigned() {
            continue;
        }
        let count = counts.entry(id).or_insert(0);
        if *count == 0 {
            order.push(id);
        }
        *count += 1;
    }

    let mut total = 0.0;
    let mut summary = Vec::new();
    for id in order {
        let sum = f64::from(counts[id]) / 4.0;
        total += sum;
        let (title, color) = match activities.find(id.as_str()) {
            Some(a) => (a.title.clone(), a.color.clone()),
            None => ("Unknown".to_string(), color::UNASSIGNED_FILL.to_string()),
        };
        summary.push(SummaryEntry {
            id: id.clone(),
            title,
            color,
            sum,
        });
    }

    SheetSummary { total, summary }
}

async fn persist(state: &Arc<AppState>) -> Result<(), Response> {
    let sheets = state.sheets.read().await;
    let activities = state.activities.read().await;
    persist_state_to_disk(&state.data_dir, &sheets, &activities).map_err(internal_error)
}

fn validate_activity_fields(payload: &ActivityRequest) -> anyhow::Result<()> {
    if payload.title.trim().is_empty() {
        anyhow::bail!("activity title cannot be empty");
    }
    if !valid_color_hex(&payload.color) {
        anyhow::bail!("activity color must be a #rgb or #rrggbb hex value");
    }
    Ok(())
}
