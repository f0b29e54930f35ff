//! proc-tracker entrypoint: sample the named processes every period until a
//! fatal condition, then exit non-zero.

use clap::Parser;
use proc_tracker::{
    cli::Cli,
    collectors::SysinfoSource,
    config::TrackerConfig,
    error::FatalError,
    logging::StructuredLogger,
    sampler::Sampler,
};
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();
    let config = TrackerConfig::load(&TrackerConfig::path_from_env());

    if let Err(e) = StructuredLogger::init(&config.log) {
        eprintln!("failed to install logger: {}", e);
    }

    info!("Tracking the following processes: {:?}", cli.names);

    let err = match Sampler::new(SysinfoSource::new(), cli.names, &config).and_then(|s| s.run()) {
        Ok(never) => match never {},
        Err(e) => e,
    };

    match &err {
        FatalError::NoneFound => info!("None of the provided processes were found. Exiting"),
        other => error!(error = %other, "fatal"),
    }
    std::process::exit(err.exit_code());
}
