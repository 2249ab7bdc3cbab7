//! `interledger-node init`: write a default node configuration.

use clap::Args;
use std::path::Path;

use crate::config::NodeConfig;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing configuration file.
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: &InitArgs, config_path: &Path) -> anyhow::Result<()> {
    if config_path.exists() && !args.force {
        anyhow::bail!(
            "configuration file already exists at {} (use --force to overwrite)",
            config_path.display()
        );
    }

    NodeConfig::default().save(config_path)?;
    tracing::info!(path = %config_path.display(), "wrote default config");
    println!("Initialized interledger node at {}", config_path.display());
    println!("Run 'interledger-node scenario redeem' to try a scripted flow.");
    Ok(())
}
