use crate::conf::{ConfigError, load_config};
use owo_colors::OwoColorize;
use std::path::PathBuf;

pub fn check(path: PathBuf, plain: bool) -> anyhow::Result<()> {
    match load_config(&path) {
        Ok(cfg) => {
            let s = &cfg.stream;
            println!("✔ Config loaded successfully");
            match &s.endpoint {
                Some(endpoint) => println!("✔ endpoint {endpoint}"),
                None => println!("✔ no endpoint (use --endpoint or --stdin)"),
            }
            println!("✔ tick every {}ms", s.tick_interval_ms);
            println!(
                "✔ chart keeps {} points, log keeps {} events",
                s.chart_capacity, s.log_capacity
            );
            if !cfg.filter.is_empty() {
                println!("✔ initial filter {:?}", cfg.filter);
            }
            Ok(())
        }
        Err(err) => {
            print_config_error(&err, plain);
            std::process::exit(1);
        }
    }
}

fn print_config_error(err: &ConfigError, plain: bool) {
    if plain {
        eprintln!("error: {err}");
    } else {
        eprintln!();
        eprintln!("{}: {}", "error".red().bold(), err);
    }
    if let Some(hint) = config_error_hint(err) {
        eprintln!();
        eprintln!("{hint}");
    }
}

pub fn config_error_hint(err: &ConfigError) -> Option<&'static str> {
    match err {
        ConfigError::ReadFile { .. } => Some(
            "Create a starting point with:\n\
             \n\
             accesswatch config init accesswatch.toml",
        ),

        ConfigError::Invalid {
            field: "stream.endpoint",
            ..
        } => Some(
            "The endpoint must be an http or https URL serving text/event-stream.\n\
             \n\
             Example:\n\
             \n\
             [stream]\n\
             endpoint = \"http://localhost:8080/api/stream/access\"",
        ),

        ConfigError::Invalid {
            field: "filter.method",
            ..
        } => Some(
            "Methods match exactly; write them in upper case or leave them empty.\n\
             \n\
             Example:\n\
             \n\
             [filter]\n\
             method = \"POST\"",
        ),

        ConfigError::Invalid { .. } => Some(
            "Intervals and capacities must be greater than zero.",
        ),

        ConfigError::Parse { .. } => None,
    }
}
