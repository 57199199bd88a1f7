use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use exporter_engine::ExportFormat;

mod logging;
mod replay;
mod settings;

use logging::LogDestination;

#[derive(Debug, Parser)]
#[command(name = "dm-exporter")]
#[command(about = "Scrolls a virtualized message list back to the top and exports every message.")]
#[command(version)]
struct Cli {
    /// Where log lines go
    #[arg(long, value_enum, default_value = "file", global = true)]
    log: LogDestination,

    /// Log at debug level
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Replay a directory of captured frames (newest first by file name) and export
    Replay(ReplayArgs),

    /// Write the default configuration as RON
    Config {
        /// Target file
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
}

#[derive(Debug, clap::Args)]
pub struct ReplayArgs {
    /// Directory with `*.html` frames
    #[arg(value_name = "FRAMES_DIR")]
    pub frames_dir: PathBuf,

    /// RON config file; defaults apply when absent
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Export formats, comma separated
    #[arg(long = "format", value_delimiter = ',', default_value = "txt,json,md")]
    pub formats: Vec<ExportFormat>,

    /// Output directory
    #[arg(long, default_value = ".")]
    pub out: PathBuf,

    /// Stop manually after this many seconds, exporting what was found so far
    #[arg(long, value_name = "SECS")]
    pub time_limit: Option<u64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::initialize(cli.log, cli.verbose);

    match cli.command {
        Commands::Replay(args) => replay::run(&args),
        Commands::Config { path } => {
            let written = settings::save_config(&path, &exporter_core::ExporterConfig::default())?;
            println!("Wrote default config to {}", written.display());
            Ok(())
        }
    }
}
