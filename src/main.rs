use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod finder;
mod render;

#[derive(Parser)]
struct Args {
    /// The command to execute
    #[command(subcommand)]
    command: MdpagesCommand,
}

#[derive(Parser)]
struct ServeArgs {
    /// The address to bind to
    #[arg(short, long, default_value = "0.0.0.0")]
    bind: String,

    /// The port to bind to
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Open the site in the default browser
    #[arg(short, long, default_value = "false")]
    open: bool,

    /// The path to the configuration file
    #[arg(short, long, default_value = "mdpages.yaml")]
    config_file: Option<PathBuf>,
}

#[derive(Parser)]
struct RenderArgs {
    /// The URL path to resolve (e.g. "/docs/getting-started")
    path: String,

    /// The path to the configuration file
    #[arg(short, long, default_value = "mdpages.yaml")]
    config_file: Option<PathBuf>,
}

#[derive(Parser)]
struct CheckArgs {
    /// The path to the configuration file
    #[arg(short, long, default_value = "mdpages.yaml")]
    config_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum MdpagesCommand {
    /// Serve the template root on a local port
    Serve(ServeArgs),

    /// Resolve a single URL path and print the rendered HTML
    Render(RenderArgs),

    /// Validate every Markdown page under the template root
    Check(CheckArgs),
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    match args.command {
        MdpagesCommand::Serve(args) => {
            commands::serve::run(&args).await?;
        }
        MdpagesCommand::Render(args) => {
            commands::render::run(&args)?;
        }
        MdpagesCommand::Check(args) => {
            commands::check::run(&args)?;
        }
    }

    Ok(())
}
