use crate::conf::DEFAULT_CONFIG;
use anyhow::{Context, Result, bail};
use std::fs;
use std::path::PathBuf;

pub fn init(path: Option<PathBuf>) -> Result<()> {
    let Some(path) = path else {
        print!("{DEFAULT_CONFIG}");
        return Ok(());
    };

    if path.exists() {
        bail!("{} already exists", path.display());
    }

    fs::write(&path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to create {}", path.display()))?;

    println!("✔ Wrote default config to {}", path.display());
    println!();
    println!("Next steps:");
    println!("  accesswatch config check {}", path.display());
    println!("  accesswatch watch --config {}", path.display());

    Ok(())
}
