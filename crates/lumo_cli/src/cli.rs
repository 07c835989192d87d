use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;

/// Custom enum for log levels that can be used with clap's ValueEnum
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convert our custom LogLevel enum to log crate's LevelFilter
impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Command line arguments structure using clap derive macros
#[derive(Parser)]
#[command(name = "lumo")]
#[command(about = "A small CPU path tracer")]
pub struct Args {
    /// Set the logging level (defaults to "info")
    #[arg(long, default_value = "info", help = "Set the logging level")]
    pub log_level: LogLevel,

    /// Worker thread count (defaults to all cores)
    #[arg(long, help = "Worker thread count (defaults to all cores)")]
    pub threads: Option<usize>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Render a scene file to an image
    Render {
        /// Scene text file to render
        scene: PathBuf,

        /// Output image path (.png or .ppm)
        output: PathBuf,

        /// Sampling seed; equal seeds give identical images
        #[arg(long, default_value = "0")]
        seed: u64,
    },

    /// Compare two rendered images pixel by pixel
    Compare {
        /// Reference image
        left: PathBuf,

        /// Candidate image
        right: PathBuf,
    },

    /// Generate a fixture scene file
    Generate {
        /// Output scene text path
        output: PathBuf,

        /// Number of random boxes in the fixture
        #[arg(long, default_value = "50")]
        count: usize,

        /// Wall distance from the room center
        #[arg(long, default_value = "5.0")]
        extent: f32,

        /// Placement seed
        #[arg(long, default_value = "0")]
        seed: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_args() {
        let args = Args::parse_from(["lumo", "render", "scene.txt", "out.png", "--seed", "7"]);
        match args.command {
            Command::Render { scene, output, seed } => {
                assert_eq!(scene, PathBuf::from("scene.txt"));
                assert_eq!(output, PathBuf::from("out.png"));
                assert_eq!(seed, 7);
            }
            _ => panic!("expected render subcommand"),
        }
    }

    #[test]
    fn test_generate_defaults() {
        let args = Args::parse_from(["lumo", "generate", "scene.txt"]);
        match args.command {
            Command::Generate { count, extent, seed, .. } => {
                assert_eq!(count, 50);
                assert_eq!(extent, 5.0);
                assert_eq!(seed, 0);
            }
            _ => panic!("expected generate subcommand"),
        }
    }
}
