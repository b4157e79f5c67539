use std::process::ExitCode;

use scene_cli::{init_logging, parse_or_usage, WriterArgs};
use scene_pipeline::{package_scene, Collaborators};
use tracing::{error, info};

fn main() -> ExitCode {
    let Some(args) = parse_or_usage::<WriterArgs, _, _>(std::env::args_os()) else {
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

    info!("scene-writer v{}", env!("CARGO_PKG_VERSION"));
    match package_scene(&config, &Collaborators::reference()) {
        Ok(summary) => {
            info!(
                document = %summary.document.display(),
                frames = summary.frames,
                body_parts = summary.body_parts,
                "done"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(%err, "packaging failed");
            ExitCode::FAILURE
        }
    }
}
