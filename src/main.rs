//! Habit Sync CLI Entry Point

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use habit_sync::commands;
use habit_sync::domain::ChecklistItem;
use habit_sync::repository::{default_data_dir, ConfigStore};
use habit_sync::AppState;

#[derive(Parser, Debug)]
#[command(name = "habit-sync", version, about = "Sync a Notion habit checklist with the widget store")]
struct Cli {
    /// Directory for config, widget store and logs (default: platform data dir).
    #[arg(long, global = true, value_name = "PATH")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Choose the database to sync by name.
    Setup { name: String },
    /// Pull the checklist and publish it to the widget store.
    Refresh,
    /// Pull and print the checklist.
    #[command(alias = "ls")]
    List,
    /// Toggle one item in the app.
    Toggle { id: String },
    /// Toggle one item as the widget would.
    WidgetToggle { id: String },
    /// Print what the widget shows right now.
    WidgetView,
    /// Print recent log lines.
    Logs,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => default_data_dir().map_err(|e| e.to_string())?,
    };
    if let Err(err) = rolling_logger::init_logger(data_dir.join("logs"), "HabitSync") {
        eprintln!("Failed to init logger: {}", err);
    }

    let config_store = ConfigStore::in_dir(&data_dir);

    match cli.command {
        Commands::Setup { name } => {
            let config = commands::setup_database(&config_store, name)?;
            println!("Syncing database \"{}\"", config.database_name);
            return Ok(());
        }
        Commands::Logs => {
            for line in commands::recent_logs()? {
                println!("{}", line);
            }
            return Ok(());
        }
        _ => {}
    }

    let config = config_store.load_with_env().map_err(|e| e.to_string())?;
    let state = AppState::bootstrap(config, &data_dir).map_err(|e| e.to_string())?;

    match cli.command {
        Commands::Refresh => {
            commands::initialize_engine(&state).await?;
            let items = commands::refresh_habits(&state).await?;
            println!("Published {} habits", items.len());
        }
        Commands::List => {
            commands::initialize_engine(&state).await?;
            commands::refresh_habits(&state).await?;
            print_items(&commands::list_habits(&state).await?);
        }
        Commands::Toggle { id } => {
            commands::initialize_engine(&state).await?;
            commands::refresh_habits(&state).await?;
            print_items(&commands::toggle_habit(&state, id).await?);
        }
        Commands::WidgetToggle { id } => {
            let outcome = commands::widget_toggle(&state, id).await?;
            if let Some(removed) = outcome.toggle.removed {
                println!("Removed {}", removed);
            }
            // Let the deferred patch finish before the process exits
            if let Some(patch) = outcome.patch {
                if let Err(err) = patch.await {
                    log::warn!("Deferred patch task aborted: {}", err);
                }
            }
        }
        Commands::WidgetView => {
            let timeline = commands::widget_view(&state).await?;
            for entry in &timeline.entries {
                println!("[{}] {}  ({})", mark(entry.checked), entry.title, entry.id);
            }
            println!("next refresh: {}", timeline.next_refresh.to_rfc3339());
        }
        Commands::Setup { .. } | Commands::Logs => {}
    }

    Ok(())
}

fn mark(checked: bool) -> char {
    if checked {
        'x'
    } else {
        ' '
    }
}

fn print_items(items: &[ChecklistItem]) {
    for item in items {
        println!("[{}] {}  ({})", mark(item.checked), item.label, item.id);
    }
}
