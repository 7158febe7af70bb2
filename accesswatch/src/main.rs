use accesswatch_core::cli;
use accesswatch_core::cli::watch::{WatchArgs, run_watch};
use accesswatch_core::logging::init_logging;
use clap::{Parser, Subcommand};
use tracing::error;

#[derive(Parser, Debug)]
#[command(
    name = "accesswatch",
    version,
    about = "accesswatch: live access-log dashboard"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Subscribe to an access stream and show live aggregates
    Watch(WatchArgs),

    /// Config file tooling
    Config {
        #[command(subcommand)]
        cmd: cli::config::ConfigCmd,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Watch(args) => {
            init_logging();

            if let Err(e) = run_watch(args).await {
                error!(error = %e, "watch failed");
                eprintln!("watch error: {e:#}");
                std::process::exit(1);
            }
        }

        Command::Config { cmd } => {
            if let Err(e) = cli::config::run(cmd) {
                eprintln!("config error: {e:#}");
                std::process::exit(1);
            }
        }
    }
}
