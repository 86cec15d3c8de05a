use anyhow::Result;
use clap::Parser;
use querybench_app::{Args, logging, run};
use querybench_settings::QueryBenchSettings;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let settings = match &args.config {
        Some(path) => QueryBenchSettings::load_from(path)?,
        None => QueryBenchSettings::load()?,
    };

    let log_dir = querybench_settings::log_dir().unwrap_or_else(|_| PathBuf::from("logs"));
    let _log_guard = logging::init(logging::LoggingConfig::from_settings(
        &settings.logging,
        log_dir,
    ))?;

    run(settings, args).await
}
