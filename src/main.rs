mod config;
mod icon;
mod png;
mod raster;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use config::AppConfig;

#[derive(Parser)]
#[command(name = "pwa-icons", about = "Generate PWA icons and favicons")]
struct Cli {
    /// TOML configuration file (defaults are used when omitted)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output directory, overriding the configured one
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Re-read every written icon and validate it
    #[arg(long)]
    verify: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the summary
    let level = if cli.verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("pwa_icons={level}").parse()?);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(out_dir) = cli.out_dir {
        config.out_dir = out_dir;
    }
    config.validate().context("Invalid configuration")?;

    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    info!(
        "Generating {} icons into {}",
        config.icons.len(),
        config.out_dir.display()
    );
    let written = icon::generate_all(&config.out_dir, &config.text, &config.icons)?;

    if cli.verify {
        for (path, spec) in written.iter().zip(&config.icons) {
            icon::verify::verify_file(path, spec.size)?;
        }
        info!("Verified {} icons", written.len());
    }

    println!("Generated icons:");
    for path in &written {
        println!("- {}", path.display());
    }
    Ok(())
}
