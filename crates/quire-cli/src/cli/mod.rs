//! CLI entry and dispatch.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use quire_core::config::{Config, paths};

mod commands;

#[derive(Parser)]
#[command(name = "quire")]
#[command(version)]
#[command(about = "Browse a directory of markdown documents from a terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Overrides applied on top of the config file.
#[derive(clap::Args, Debug, Clone, Default)]
struct SiteArgs {
    /// Directory holding root.md and posts/
    #[arg(long, value_name = "DIR")]
    content: Option<PathBuf>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Serve the site to telnet clients
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to bind
        #[arg(short, long)]
        port: Option<u16>,

        #[command(flatten)]
        site: SiteArgs,
    },
    /// Browse the site in this terminal
    Browse {
        #[command(flatten)]
        site: SiteArgs,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

impl SiteArgs {
    fn apply(self, config: &mut Config) {
        if let Some(content) = self.content {
            config.content_root = content;
        }
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                show_config_path();
                Ok(())
            }
            ConfigCommands::Init => init_config(),
        },
        Commands::Browse { site } => {
            let mut config = Config::load().context("load config")?;
            site.apply(&mut config);
            commands::browse::run(&config)
        }
        Commands::Serve { host, port, site } => {
            let mut config = Config::load().context("load config")?;
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            site.apply(&mut config);

            let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
            rt.block_on(commands::serve::run(config))
        }
    }
}

/// Prints the config path on stdout; a hint goes to stderr when the file
/// does not exist yet.
fn show_config_path() {
    let path = paths::config_path();
    println!("{}", path.display());
    if !path.exists() {
        eprintln!("(not created yet; `quire config init` writes the defaults)");
    }
}

fn init_config() -> Result<()> {
    let path = paths::config_path();
    Config::init(&path).with_context(|| format!("init config at {}", path.display()))?;
    let defaults = Config::default();
    println!("Wrote default config to {}", path.display());
    println!(
        "Serving {} on {} from {}",
        defaults.site_name,
        defaults.bind_addr(),
        defaults.content_root.display()
    );
    Ok(())
}
