use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use clap::Parser;
use tokio::sync::RwLock;

use quartergrid::model::ActivityId;

#[path = "quartergrid_server/handlers.rs"]
mod handlers;
use self::handlers::*;
#[path = "quartergrid_server/persistence.rs"]
mod persistence;
use self::persistence::*;
#[path = "quartergrid_server/validators.rs"]
mod validators;
use self::validators::*;

struct AppState {
    data_dir: PathBuf,

    /// Sheets by YYYY-MM-DD date: the 96 activity ids in slot order.
    sheets: RwLock<HashMap<String, Vec<ActivityId>>>,

    activities: RwLock<ActivityTable>,
}

#[derive(Parser)]
#[command(name = "quartergrid-server")]
#[command(about = "Quartergrid sheet server (development)", long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: SocketAddr,

    /// Write bound address to this file (dev/test convenience)
    #[arg(long)]
    addr_file: Option<PathBuf>,

    /// Data directory
    #[arg(long, default_value = "./quartergrid-data")]
    data_dir: PathBuf,
}

#[tokio::main]
async fn main() {
    env_logger::init();
    if let Err(err) = run().await {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let args = Args::parse();
    std::fs::create_dir_all(&args.data_dir)
        .with_context(|| format!("create data dir {}", args.data_dir.display()))?;

    // Best-effort load so the dev server survives restarts.
    let stored = load_state_from_disk(&args.data_dir).context("load server state")?;

    let state = Arc::new(AppState {
        data_dir: args.data_dir,
        sheets: RwLock::new(stored.sheets),
        activities: RwLock::new(ActivityTable {
            next_id: stored.next_activity_id,
            items: stored.activities,
        }),
    });

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/api/activities", get(list_activities).post(create_activity))
        .route(
            "/api/activity/:id",
            put(update_activity).delete(delete_activity),
        )
        .route("/api/sheet/:date", get(get_sheet).put(put_sheet))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("bind {}", args.addr))?;

    let local_addr = listener.local_addr().context("read listener local addr")?;
    log::info!("quartergrid-server listening on {}", local_addr);
    eprintln!("quartergrid-server listening on {}", local_addr);

    if let Some(addr_file) = &args.addr_file {
        std::fs::write(addr_file, local_addr.to_string())
            .with_context(|| format!("write addr file {}", addr_file.display()))?;
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

fn bad_request(err: anyhow::Error) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({"error": err.to_string()})),
    )
        .into_response()
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({"error": "not found"})),
    )
        .into_response()
}

fn internal_error(err: anyhow::Error) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({"error": err.to_string()})),
    )
        .into_response()
}
