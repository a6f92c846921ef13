use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use quartergrid::model::{
    ActivityId, RemoteConfig, format_sheet_date, parse_sheet_date,
};
use quartergrid::remote::RemoteClient;
use quartergrid::store::ClientStore;
use quartergrid::summary;

#[derive(Parser)]
#[command(name = "quartergrid")]
#[command(about = "Quarter-hour timesheet editor", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the sheet editor for a day
    Sheet {
        /// Date to edit (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Print a day's sheet and summary
    Show {
        /// Date to show (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage activities
    Activity {
        #[command(subcommand)]
        command: ActivityCommands,
    },

    /// Configure or show the remote
    Remote {
        #[command(subcommand)]
        command: RemoteCommands,
    },
}

#[derive(Subcommand)]
enum ActivityCommands {
    /// List activities
    List {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },
    /// Create an activity
    Add { title: String, color: String },
    /// Update an activity's title and color
    Update {
        id: String,
        title: String,
        color: String,
    },
    /// Delete an activity
    Del { id: String },
}

#[derive(Subcommand)]
enum RemoteCommands {
    /// Show the configured remote
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Set the configured remote
    Set {
        #[arg(long)]
        url: String,
    },
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let store = ClientStore::open_default()?;

    match cli.command {
        Commands::Sheet { date } => {
            let date = resolve_date(date)?;
            quartergrid::tui_shell::run(store, date)?;
        }

        Commands::Show { date, json } => {
            let date = resolve_date(date)?;
            let remote = require_remote(&store)?;
            let payload = remote.fetch_sheet(date)?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&payload).context("serialize sheet json")?
                );
            } else {
                println!("sheet: {}", format_sheet_date(date));
                println!("total: {}", summary::format_hours(payload.total));
                for entry in &payload.summary {
                    println!(
                        "{: >6}  {}  {}",
                        summary::format_hours(entry.sum),
                        entry.title,
                        entry.color
                    );
                }
            }
        }

        Commands::Activity { command } => {
            let remote = require_remote(&store)?;
            match command {
                ActivityCommands::List { json } => {
                    let activities = remote.list_activities()?;
                    if json {
                        println!(
                            "{}",
                            serde_json::to_string_pretty(&activities)
                                .context("serialize activities json")?
                        );
                    } else {
                        for a in activities {
                            println!("{}  {}  {}", a.id.as_str(), a.color, a.title);
                        }
                    }
                }
                ActivityCommands::Add { title, color } => {
                    let activity = remote.create_activity(&title, &color)?;
                    println!("{}", activity.id.as_str());
                }
                ActivityCommands::Update { id, title, color } => {
                    remote.update_activity(&ActivityId(id), &title, &color)?;
                    println!("Updated");
                }
                ActivityCommands::Del { id } => {
                    remote.delete_activity(&ActivityId(id))?;
                    println!("Deleted");
                }
            }
        }

        Commands::Remote { command } => match command {
            RemoteCommands::Show { json } => {
                let cfg = store.read_config()?;
                if json {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&cfg.remote).context("serialize remote json")?
                    );
                } else if let Some(remote) = cfg.remote {
                    println!("url: {}", remote.base_url);
                } else {
                    println!("No remote configured");
                }
            }
            RemoteCommands::Set { url } => {
                let mut cfg = store.read_config()?;
                cfg.remote = Some(RemoteConfig { base_url: url });
                store.write_config(&cfg)?;
                println!("Remote configured");
            }
        },
    }

    Ok(())
}

fn resolve_date(date: Option<String>) -> Result<time::Date> {
    match date {
        Some(s) => parse_sheet_date(&s),
        None => Ok(time::OffsetDateTime::now_utc().date()),
    }
}

fn require_remote(store: &ClientStore) -> Result<RemoteClient> {
    let cfg = store.read_config()?;
    let remote = cfg
        .remote
        .context("no remote configured (run `quartergrid remote set --url ...`)")?;
    RemoteClient::new(remote)
}
