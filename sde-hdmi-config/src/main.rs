//! sde-hdmi-config: check hdmi.toml and build the device blob

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use sde_hdmi_config::{load_file, to_blob};

#[derive(Parser)]
#[command(name = "sde-hdmi-config", about = "SDE HDMI configuration tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a configuration and print a summary
    Check {
        /// Path to hdmi.toml
        config: PathBuf,
    },
    /// Write the postcard blob for a configuration
    Blob {
        /// Path to hdmi.toml
        config: PathBuf,
        /// Output file
        #[arg(short, long, default_value = "hdmi.bin")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Check { config } => {
            let parsed = load_file(&config)
                .with_context(|| format!("loading {}", config.display()))?;
            for display in &parsed.displays {
                let kind = if display.non_pluggable {
                    "fixed"
                } else {
                    "hotplug"
                };
                println!(
                    "{:<16} ctrl {} {:<8} {} mode(s)",
                    display.name.as_str(),
                    display.ctrl_idx,
                    kind,
                    display.modes.len()
                );
            }
            println!("{}: ok", config.display());
        }
        Command::Blob { config, output } => {
            let parsed = load_file(&config)
                .with_context(|| format!("loading {}", config.display()))?;
            let blob = to_blob(&parsed)?;
            fs::write(&output, &blob)
                .with_context(|| format!("writing {}", output.display()))?;
            println!("wrote {} bytes to {}", blob.len(), output.display());
        }
    }

    Ok(())
}
