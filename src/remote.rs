//! HTTP client for the sheet server. One batched write per gesture: the
//! whole day is sent in a single request and either adopted wholesale or
//! rolled back wholesale by the caller.

use anyhow::{Context, Result};
use thiserror::Error;
use time::Date;

use crate::model::{
    ActivitiesResponse, Activity, ActivityId, ActivityRequest, ActivityResponse, PutSheetRequest,
    RemoteConfig, SLOTS_PER_DAY, SheetPayload, SheetSummary, encode_quarters, format_sheet_date,
};

/// Why a commit did not produce a new baseline.
#[derive(Debug, Error)]
pub enum CommitError {
    /// The grid failed local validation; nothing was sent.
    #[error("sheet is broken: expected 96 quarters, found {0}")]
    Validation(usize),

    /// Transport failure or non-success response. The two are handled
    /// identically: the full transaction rolls back.
    #[error("sheet update failed: {0:#}")]
    Sync(anyhow::Error),
}

/// The commit seam between the gesture engine and the network. Injected so
/// tests can substitute the transport.
pub trait SheetSync {
    fn commit(&self, date: Date, quarters: &[ActivityId]) -> Result<SheetSummary, CommitError>;
}

pub struct RemoteClient {
    remote: RemoteConfig,
    client: reqwest::blocking::Client,
}

impl RemoteClient {
    pub fn new(remote: RemoteConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("quartergrid")
            .build()
            .context("build reqwest client")?;
        Ok(Self { remote, client })
    }

    pub fn remote(&self) -> &RemoteConfig {
        &self.remote
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.remote.base_url, path)
    }

    pub fn fetch_sheet(&self, date: Date) -> Result<SheetPayload> {
        let resp = self
            .client
            .get(self.url(&format!("/api/sheet/{}", format_sheet_date(date))))
            .send()
            .context("fetch sheet")?;
        ensure_ok(resp, "fetch sheet")?
            .json()
            .context("parse sheet")
    }

    pub fn list_activities(&self) -> Result<Vec<Activity>> {
        let resp = self
            .client
            .get(self.url("/api/activities"))
            .send()
            .context("list activities")?;
        let body: ActivitiesResponse = ensure_ok(resp, "list activities")?
            .json()
            .context("parse activities")?;
        Ok(body.activities)
    }

    pub fn create_activity(&self, title: &str, color: &str) -> Result<Activity> {
        let resp = self
            .client
            .post(self.url("/api/activities"))
            .json(&ActivityRequest {
                title: title.to_string(),
                color: color.to_string(),
            })
            .send()
            .context("create activity")?;
        let body: ActivityResponse = ensure_ok(resp, "create activity")?
            .json()
            .context("parse created activity")?;
        Ok(body.activity)
    }

    pub fn update_activity(&self, id: &ActivityId, title: &str, color: &str) -> Result<Activity> {
        let resp = self
            .client
            .put(self.url(&format!("/api/activity/{}", id.as_str())))
            .json(&ActivityRequest {
                title: title.to_string(),
                color: color.to_string(),
            })
            .send()
            .context("update activity")?;
        let body: ActivityResponse = ensure_ok(resp, "update activity")?
            .json()
            .context("parse updated activity")?;
        Ok(body.activity)
    }

    pub fn delete_activity(&self, id: &ActivityId) -> Result<()> {
        let resp = self
            .client
            .delete(self.url(&format!("/api/activity/{}", id.as_str())))
            .send()
            .context("delete activity")?;
        ensure_ok(resp, "delete activity")?;
        Ok(())
    }

    fn put_sheet(&self, date: Date, quarters: &[ActivityId]) -> Result<SheetSummary> {
        let resp = self
            .client
            .put(self.url(&format!("/api/sheet/{}", format_sheet_date(date))))
            .json(&PutSheetRequest {
                quarters: encode_quarters(quarters),
            })
            .send()
            .context("send sheet update")?;
        ensure_ok(resp, "sheet update")?
            .json()
            .context("parse sheet update response")
    }
}

impl SheetSync for RemoteClient {
    fn commit(&self, date: Date, quarters: &[ActivityId]) -> Result<SheetSummary, CommitError> {
        if quarters.len() != SLOTS_PER_DAY {
            return Err(CommitError::Validation(quarters.len()));
        }
        // Commits are not retried: the caller decides whether to repeat the
        // gesture after a rollback.
        self.put_sheet(date, quarters).map_err(CommitError::Sync)
    }
}

fn ensure_ok(
    resp: reqwest::blocking::Response,
    label: &str,
) -> Result<reqwest::blocking::Response> {
    resp.error_for_status()
        .with_context(|| format!("{} status", label))
}
