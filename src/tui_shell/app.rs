use std::io::{self, IsTerminal};

use anyhow::{Context, Result};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use time::Date;

use crate::gesture::{GestureController, GestureState, PendingCommit};
use crate::model::{Activity, ActivityId, SheetSummary};
use crate::remote::{CommitError, RemoteClient};
use crate::sheet::DaySheet;
use crate::store::ClientStore;

use super::event_loop;

pub(super) fn run(store: ClientStore, date: Date) -> Result<()> {
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        anyhow::bail!("TUI requires an interactive terminal (TTY)");
    }

    let mut app = App::load(store, date)?;

    let mut stdout = io::stdout();
    enable_raw_mode().context("enable raw mode")?;
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    let res = event_loop::run_loop(&mut terminal, &mut app);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture).ok();
    terminal.show_cursor().ok();

    res
}

pub(super) struct SelectorState {
    pub(super) items: Vec<Activity>,
    pub(super) selected: usize,
}

pub(super) struct App {
    pub(super) store: ClientStore,
    pub(super) remote: RemoteClient,

    pub(super) date: Date,
    pub(super) sheet: DaySheet,
    pub(super) gesture: GestureController,

    pub(super) activities: Vec<Activity>,
    pub(super) current_activity: Activity,
    pub(super) summary: SheetSummary,

    pub(super) selector: Option<SelectorState>,

    // Where the hour rows landed on the last draw; the mouse handler
    // resolves slot indices against this.
    pub(super) grid_area: Option<Rect>,

    pub(super) last_error: Option<String>,
    pub(super) status: Option<String>,

    pub(super) quit: bool,
}

impl App {
    fn load(store: ClientStore, date: Date) -> Result<App> {
        let cfg = store.read_config()?;
        let remote_cfg = cfg
            .remote
            .clone()
            .context("no remote configured (run `quartergrid remote set --url ...`)")?;
        let remote = RemoteClient::new(remote_cfg)?;

        let payload = remote.fetch_sheet(date)?;
        let sheet = DaySheet::hydrate(date, &payload)?;
        let summary = SheetSummary {
            total: payload.total,
            summary: payload.summary,
        };
        let activities = remote.list_activities()?;

        // Start with the activity painted last time, if it still exists.
        let current_activity = cfg
            .preferred_activity
            .filter(|preferred| activities.iter().any(|a| a.id == preferred.id))
            .unwrap_or_else(not_working);

        Ok(App {
            store,
            remote,
            date,
            sheet,
            gesture: GestureController::new(),
            activities,
            current_activity,
            summary,
            selector: None,
            grid_area: None,
            last_error: None,
            status: None,
            quit: false,
        })
    }

    /// Resolve a finished gesture against the server and surface the
    /// outcome. On a sync failure the sheet has already been restored by
    /// the time this returns.
    pub(super) fn finish_gesture(&mut self, pending: PendingCommit) {
        match pending.resolve(&self.remote, &mut self.sheet) {
            Ok(summary) => {
                self.summary = summary;
                self.status = Some("saved".to_string());
                self.last_error = None;
            }
            Err(CommitError::Validation(found)) => {
                self.last_error = Some(format!(
                    "sheet is broken ({found} quarters); press r to reload the day"
                ));
            }
            Err(err @ CommitError::Sync(_)) => {
                log::warn!("{err}");
                self.last_error =
                    Some("could not save the sheet; changes were reverted".to_string());
            }
        }
    }

    pub(super) fn refresh(&mut self) {
        let date = self.date;
        if let Err(err) = self.reload(date) {
            self.last_error = Some(format!("{err:#}"));
        } else {
            self.status = Some("reloaded".to_string());
        }
    }

    pub(super) fn change_date(&mut self, days: i8) {
        // Never swap the sheet out from under an open gesture.
        if self.gesture.state() == GestureState::Painting {
            return;
        }
        let next = if days < 0 {
            self.date.previous_day()
        } else {
            self.date.next_day()
        };
        let Some(next) = next else {
            return;
        };
        if let Err(err) = self.reload(next) {
            self.last_error = Some(format!("{err:#}"));
        }
    }

    fn reload(&mut self, date: Date) -> Result<()> {
        let payload = self.remote.fetch_sheet(date)?;
        self.sheet = DaySheet::hydrate(date, &payload)?;
        self.summary = SheetSummary {
            total: payload.total,
            summary: payload.summary,
        };
        self.date = date;
        self.last_error = None;
        Ok(())
    }

    pub(super) fn open_selector(&mut self) {
        let mut items = vec![not_working()];
        items.extend(self.activities.iter().cloned());
        let selected = items
            .iter()
            .position(|a| a.id == self.current_activity.id)
            .unwrap_or(0);
        self.selector = Some(SelectorState { items, selected });
    }

    pub(super) fn pick_selected_activity(&mut self) {
        let Some(selector) = self.selector.take() else {
            return;
        };
        let Some(activity) = selector.items.get(selector.selected) else {
            return;
        };
        self.current_activity = activity.clone();
        self.remember_preferred(activity);
        self.status = Some(format!("painting with {}", activity.title));
    }

    // Best effort: losing the stored preference must not interrupt editing.
    fn remember_preferred(&self, activity: &Activity) {
        let Ok(mut cfg) = self.store.read_config() else {
            return;
        };
        cfg.preferred_activity = Some(activity.clone());
        self.store.write_config(&cfg).ok();
    }
}

pub(super) fn not_working() -> Activity {
    Activity {
        id: ActivityId::unassigned(),
        title: "Not working".to_string(),
        color: "#fff".to_string(),
    }
}
