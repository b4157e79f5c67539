use std::process::ExitCode;

use scene_cli::{init_logging, parse_or_usage, ReaderArgs};
use scene_pipeline::read_scene;
use tracing::{error, info};

fn main() -> ExitCode {
    let Some(args) = parse_or_usage::<ReaderArgs, _, _>(std::env::args_os()) else {
        return ExitCode::SUCCESS;
    };
    if let Err(e) = init_logging(&args.log_level) {
        eprintln!("failed to install logger: {e}");
    }

    let config = match args.into_config() {
        Ok(config) => config,
        Err(message) => {
            println!("{message}");
            return ExitCode::SUCCESS;
        }
    };

    info!("scene-reader v{}", env!("CARGO_PKG_VERSION"));
    match read_scene(&config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "reading failed");
            ExitCode::FAILURE
        }
    }
}
