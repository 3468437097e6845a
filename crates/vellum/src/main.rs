//! Vellum CLI - personal blog generator.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "vellum")]
#[command(about = "Personal blog generator")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to blog.toml config file
    #[arg(short, long, default_value = "blog.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a blog in the current directory
    Init {
        /// Skip interactive prompts, use defaults
        #[arg(short, long)]
        yes: bool,
    },

    /// Start development server with live reload
    Dev {
        /// Port to listen on
        #[arg(short, long, default_value = "7777")]
        port: u16,

        /// Do not open browser
        #[arg(long)]
        no_open: bool,
    },

    /// Build the static site
    Build {
        /// Output directory (defaults to config or "dist")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip minification
        #[arg(long)]
        no_minify: bool,
    },

    /// Preview the built site
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// Directory to serve
        #[arg(short, long, default_value = "dist")]
        dir: PathBuf,

        /// Do not open browser
        #[arg(long)]
        no_open: bool,
    },

    /// Edit the post collection and print the updated JSON
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// List all posts
    List,

    /// Add a new post at the top of the collection
    Add {
        /// Post title
        #[arg(short, long)]
        title: String,

        /// Post body in Markdown
        #[arg(short, long)]
        content: String,
    },

    /// Edit an existing post in place
    Edit {
        /// Post id
        id: String,

        /// New title
        #[arg(short, long)]
        title: String,

        /// New body in Markdown
        #[arg(short, long)]
        content: String,
    },

    /// Delete a post
    Delete {
        /// Post id
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Print the collection as indented JSON
    Export,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    // Execute command
    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(yes).await?;
        }
        Commands::Dev { port, no_open } => {
            commands::dev::run(&cli.config, port, !no_open).await?;
        }
        Commands::Build { output, no_minify } => {
            let minify = if no_minify { Some(false) } else { None };
            commands::build::run(&cli.config, output, minify).await?;
        }
        Commands::Serve { port, dir, no_open } => {
            commands::serve::run(port, dir, !no_open).await?;
        }
        Commands::Admin { command } => {
            commands::admin::run(&cli.config, command)?;
        }
    }

    Ok(())
}
