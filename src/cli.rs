use std::path::PathBuf;

use humantime::parse_duration;
use structopt::StructOpt;

use lifeflow::category::Category;
use lifeflow::model::ActivityId;

#[derive(Debug, StructOpt)]
pub enum Command {
    /// Plan a new activity.
    Add {
        /// What you are going to do.
        #[structopt()]
        name: String,

        /// How long it takes: plain minutes ("30") or a human duration ("1h 30m").
        #[structopt(parse(try_from_str = parse_minutes))]
        duration: u32,

        /// One of: work, health, learning, leisure, family, outdoor, personal.
        #[structopt()]
        category: Category,

        /// Start time as HH:MM. Defaults to now.
        #[structopt(short, long)]
        at: Option<String>,

        /// A free-text note.
        #[structopt(short, long)]
        note: Option<String>,
    },
    /// Remove an activity by id.
    Rm {
        #[structopt()]
        id: ActivityId,
    },
    /// List all activities by start time.
    List {
        /// Print the stored activities as JSON.
        #[structopt(long)]
        json: bool,
    },
    /// Show the activities on an hourly grid.
    Timeline,
    /// List the activities created today.
    Today,
    /// Show activity count, planned time and the balance score.
    Metrics,
    /// Show the available categories.
    Categories,
    /// Init the activity database.
    Init,
}

#[derive(Debug, StructOpt)]
#[structopt(name = "lifeflow", about = "A minimalistic life-balance activity planner.")]
pub struct CommandLineArgs {
    #[structopt(subcommand)]
    pub action: Command,

    /// Use a different database file.
    #[structopt(parse(from_os_str), short, long)]
    pub db_file: Option<PathBuf>,

    /// Use a different configuration file.
    #[structopt(parse(from_os_str), long)]
    pub config: Option<PathBuf>,
}

/// Minutes from either a bare integer or a humantime duration.
pub fn parse_minutes(value: &str) -> Result<u32, String> {
    if let Ok(minutes) = value.trim().parse::<u32>() {
        return Ok(minutes);
    }
    let duration = parse_duration(value).map_err(|err| err.to_string())?;
    u32::try_from(duration.as_secs() / 60).map_err(|err| err.to_string())
}
