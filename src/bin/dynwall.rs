use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "dynwall",
    version,
    about = "Create a dynamic wallpaper (HEIC) from time-tagged images."
)]
struct Cli {
    /// Path to JSON manifest describing frames and 24-hour schedule.
    #[arg(long)]
    config: PathBuf,

    /// Destination HEIC file path (will be created or overwritten).
    #[arg(long)]
    output: PathBuf,

    /// HEIF encoder quality (1-100).
    #[arg(long, default_value_t = dynwall::DEFAULT_QUALITY, value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,

    /// How to handle mismatched image sizes: 'fit' resizes to match the first frame; 'strict'
    /// fails.
    #[arg(long, value_enum, default_value_t = ResizeChoice::Fit)]
    resize_mode: ResizeChoice,

    /// Print debug diagnostics to stderr.
    #[arg(long, short)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ResizeChoice {
    Fit,
    Strict,
}

impl From<ResizeChoice> for dynwall::ResizeMode {
    fn from(c: ResizeChoice) -> Self {
        match c {
            ResizeChoice::Fit => Self::Fit,
            ResizeChoice::Strict => Self::Strict,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let opts = dynwall::BuildOpts {
        quality: cli.quality,
        resize_mode: cli.resize_mode.into(),
    };

    match dynwall::build_dynamic_wallpaper(&cli.config, &cli.output, opts) {
        Ok(path) => {
            println!("Created dynamic wallpaper: {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
