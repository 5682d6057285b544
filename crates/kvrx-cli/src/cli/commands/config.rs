//! `kvrx config` – show where the config lives and what it resolves to.

use anyhow::Result;
use kvrx_core::config::KvrxConfig;
use std::path::Path;

pub fn run_config(path: &Path, cfg: &KvrxConfig) -> Result<()> {
    println!("# {}", path.display());
    print!("{}", toml::to_string_pretty(cfg)?);
    Ok(())
}
