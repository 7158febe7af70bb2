mod check;
mod init;


pub use check::*;
use clap::Subcommand;
pub use init::*;
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum ConfigCmd {
    /// Validate a config file and exit
    Check {
        /// Path to the config file
        #[arg(default_value = "accesswatch.toml")]
        path: PathBuf,

        /// Print errors without colors
        #[arg(short, long, default_value = "false")]
        plain: bool,
    },

    /// Print a commented default config, or write it to PATH
    Init {
        /// File to create; refuses to overwrite
        path: Option<PathBuf>,
    },
}

pub fn run(cmd: ConfigCmd) -> anyhow::Result<()> {
    match cmd {
        ConfigCmd::Check { path, plain } => check(path, plain),
        ConfigCmd::Init { path } => init(path),
    }
}
