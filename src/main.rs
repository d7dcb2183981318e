use std::path::PathBuf;

use anyhow::{anyhow, Context};
use chrono::Local;
use directories::ProjectDirs;
use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Command::*, CommandLineArgs};
use lifeflow::config::Config;
use lifeflow::interface;
use lifeflow::model::NewActivity;
use lifeflow::storage::{KeyValueStorage, SqliteStorage};
use lifeflow::store::ActivityStore;

const LOG_ENV: &str = "LIFEFLOW_LOG";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "lifeflow", "lifeflow")
}

fn find_default_config_file() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
}

fn find_default_db_file() -> anyhow::Result<PathBuf> {
    let dirs = project_dirs().ok_or_else(|| anyhow!("Failed to find a data directory."))?;
    let root_dir = dirs.data_dir();
    std::fs::create_dir_all(root_dir)
        .with_context(|| format!("Failed to create directory {}.", root_dir.display()))?;
    Ok(root_dir.join("db.sqlite"))
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_logging();

    // Get the command-line arguments.
    let CommandLineArgs {
        action,
        db_file,
        config,
    } = CommandLineArgs::from_args();

    let config = match config.or_else(find_default_config_file) {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };

    // Unpack the database file.
    let db_file = match db_file.or_else(|| config.database.clone()) {
        Some(path) => path,
        None => find_default_db_file()?,
    };

    let mut storage = SqliteStorage::open(&db_file)
        .with_context(|| format!("Failed to open database {}.", db_file.display()))?;

    if let Init = action {
        if storage.get(&config.storage_key)?.is_none() {
            storage.set(&config.storage_key, "[]")?;
        }
        println!("Initialized {}.", db_file.display());
        return Ok(());
    }

    let mut store = ActivityStore::load(storage, &config.storage_key, config.on_corrupt_data)
        .context("Failed to load activities.")?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    // Perform the action.
    match action {
        Add {
            name,
            duration,
            category,
            at,
            note,
        } => {
            let time = at.unwrap_or_else(|| Local::now().format("%H:%M").to_string());
            let candidate = NewActivity {
                name,
                time,
                duration: i64::from(duration),
                category,
                note,
            };
            interface::add_activity(&mut store, &mut out, candidate)
        }
        Rm { id } => interface::remove_activity(&mut store, &mut out, id),
        List { json: true } => interface::list_json(&store, &mut out),
        List { json: false } => interface::list(&store, &mut out),
        Timeline => interface::timeline(&store, &mut out),
        Today => interface::today(&store, &mut out),
        Metrics => interface::metrics(&store, &mut out),
        Categories => interface::categories(&mut out),
        Init => Ok(()),
    }?;
    Ok(())
}
