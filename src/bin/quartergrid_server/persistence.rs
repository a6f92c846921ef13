use super::*;

use std::path::Path as FsPath;

use quartergrid::model::Activity;

const STATE_FILE: &str = "state.json";

#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
pub(super) struct StoredState {
    pub(super) version: u32,

    #[serde(default)]
    pub(super) next_activity_id: u64,

    #[serde(default)]
    pub(super) activities: Vec<Activity>,

    #[serde(default)]
    pub(super) sheets: HashMap<String, Vec<ActivityId>>,
}

pub(super) fn load_state_from_disk(data_dir: &FsPath) -> Result<StoredState> {
    let path = data_dir.join(STATE_FILE);
    if !path.exists() {
        return Ok(StoredState {
            version: 1,
            next_activity_id: 1,
            ..StoredState::default()
        });
    }
    let bytes = std::fs::read(&path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_slice(&bytes).context("parse state.json")
}

pub(super) fn persist_state_to_disk(
    data_dir: &FsPath,
    sheets: &HashMap<String, Vec<ActivityId>>,
    activities: &ActivityTable,
) -> Result<()> {
    let state = StoredState {
        version: 1,
        next_activity_id: activities.next_id,
        activities: activities.items.clone(),
        sheets: sheets.clone(),
    };
    let bytes = serde_json::to_vec_pretty(&state).context("serialize server state")?;
    write_atomic_overwrite(&data_dir.join(STATE_FILE), &bytes).context("write state.json")
}

fn write_atomic_overwrite(path: &FsPath, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).context("create parent directories")?;
    }
    let tmp = path.with_extension(format!("tmp.{}", std::process::id()));
    std::fs::write(&tmp, bytes).with_context(|| format!("write temp file {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}
