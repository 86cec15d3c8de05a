use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "querybench")]
#[command(about = "Interactive MySQL query workbench with SQL completion")]
#[command(version)]
pub struct Args {
    /// Settings file (defaults to <config dir>/querybench/settings.json)
    #[arg(short, long, env = "QUERYBENCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Connection profile to select on startup
    #[arg(short = 'C', long, env = "QUERYBENCH_CONNECTION")]
    pub connection: Option<String>,

    /// Database to select on startup
    #[arg(short, long, env = "QUERYBENCH_DATABASE")]
    pub database: Option<String>,
}
