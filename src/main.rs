use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use gtasks::bootstrap::{build_store, init_logging};
use gtasks::core::config::{self, CliOverrides};
use gtasks::tui;

#[derive(Parser)]
#[command(name = "gtasks", about = "Terminal dashboard for your task lists")]
struct Args {
    /// Work against the local offline store instead of the hosted service
    #[arg(long)]
    offline: bool,

    /// Offline data file (default: ~/.config/gtasks/offline.json)
    #[arg(long)]
    data_file: Option<PathBuf>,

    /// Where to write the log (default: ~/.config/gtasks/gtasks.log)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let file_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("gtasks: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let cli = CliOverrides {
        offline: args.offline,
        data_file: args.data_file,
        log_file: args.log_file,
    };
    let resolved = config::resolve(&file_config, &cli);

    if let Err(e) = init_logging(&resolved) {
        eprintln!(
            "gtasks: cannot open log file {}: {}",
            resolved.log_file.display(),
            e
        );
        return ExitCode::FAILURE;
    }
    log::info!("gtasks starting up with {:?} store", resolved.store);

    let store = match build_store(&resolved) {
        Ok(store) => store,
        Err(e) => {
            log::warn!("Store setup failed: {}", e);
            eprintln!("gtasks: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match tui::run(resolved, store) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::warn!("Terminal error: {}", e);
            eprintln!("gtasks: terminal error: {}", e);
            ExitCode::FAILURE
        }
    }
}
