use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "dirtally",
    version,
    about = "Audit disk usage of every top-level directory under a root"
)]
pub struct Cli {
    /// INI file with a [Directories] section
    #[arg(short, long, default_value = "config.ini")]
    pub config: PathBuf,

    /// Hide per-directory progress spinners
    #[arg(short, long)]
    pub quiet: bool,

    /// Write debug-level events to the diagnostic log
    #[arg(short, long)]
    pub verbose: bool,
}
