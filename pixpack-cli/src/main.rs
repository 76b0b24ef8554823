use anyhow::Result;
use clap::{Parser, Subcommand};
use pixpack_cli::commands;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "pixpack")]
#[command(about = "Pixpack - Store files and directory trees in the pixels of a PNG", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack files and directories into one image
    Encode {
        /// Files or directories to pack
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output image
        #[arg(short, long)]
        output: PathBuf,

        /// Follow symbolic links inside directories
        #[arg(long)]
        follow_links: bool,

        /// JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Show a progress bar
        #[arg(long)]
        progress: bool,
    },

    /// Restore the files stored in one or more images
    Decode {
        /// Images, or directories containing images
        #[arg(required = true)]
        images: Vec<PathBuf>,

        /// Directory to extract into
        #[arg(short, long)]
        output: PathBuf,

        /// Follow symbolic links inside directories
        #[arg(long)]
        follow_links: bool,

        /// Image extension to look for inside directories
        #[arg(long)]
        extension: Option<String>,

        /// JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Show a progress bar
        #[arg(long)]
        progress: bool,
    },

    /// List the files stored in an image without extracting them
    List {
        /// Image to inspect
        image: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // Logs go to stderr so `list --json` output stays parseable
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Execute command
    match cli.command {
        Commands::Encode {
            inputs,
            output,
            follow_links,
            config,
            progress,
        } => {
            let config = commands::load_config(config.as_deref(), follow_links, None)?;
            commands::encode::execute(&inputs, &output, &config, progress).map(|_| ())
        }

        Commands::Decode {
            images,
            output,
            follow_links,
            extension,
            config,
            progress,
        } => {
            let config =
                commands::load_config(config.as_deref(), follow_links, extension.as_deref())?;
            commands::decode::execute(&images, &output, &config, progress).map(|_| ())
        }

        Commands::List { image, json } => commands::list::execute(&image, json).map(|_| ()),
    }
}
