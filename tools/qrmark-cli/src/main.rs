//! QRMark CLI — Command-line interface for stamping QR codes onto images.
//!
//! Usage:
//!   qrmark composite <HOST> <QR> -o <OUT>   Stamp a QR code onto an image
//!   qrmark submit --host <H> --qr <Q> -o <OUT>
//!                                           Run files through the upload handler
//!   qrmark plan <HOST>                      Show where the stamp would land
//!   qrmark config                           Show or initialize configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use qrmark_common::config::{AppConfig, CompositeOptions, LoggingConfig, PlacementPolicy};

mod commands;

#[derive(Parser)]
#[command(
    name = "qrmark",
    about = "Stamp a translucent QR code onto the corner of an image",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Per-invocation overrides of the configured compositing parameters.
#[derive(clap::Args, Debug, Clone, Default)]
struct StampArgs {
    /// What to do when the margin does not fit: clamp|reject
    #[arg(long)]
    placement: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Stamp a QR code onto a host image
    Composite {
        /// Host image path
        host: PathBuf,

        /// QR code image path
        qr: PathBuf,

        /// Output PNG path
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        stamp: StampArgs,
    },

    /// Feed two files through the upload handler, as a web form would
    Submit {
        /// Host image upload
        #[arg(long)]
        host: Option<PathBuf>,

        /// QR code image upload
        #[arg(long)]
        qr: Option<PathBuf>,

        /// Where to write the response body on success
        #[arg(short, long)]
        output: PathBuf,

        /// Staging root (defaults to the configured staging directory)
        #[arg(long)]
        staging: Option<PathBuf>,

        /// Keep the per-request staging directory
        #[arg(long)]
        keep_staging: bool,

        #[command(flatten)]
        stamp: StampArgs,
    },

    /// Show the stamp placement for a host image
    Plan {
        /// Host image path
        host: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        stamp: StampArgs,
    },

    /// Show the effective configuration
    Config {
        /// Write the default configuration file
        #[arg(long)]
        init: bool,
    },
}

impl StampArgs {
    fn apply(&self, base: CompositeOptions) -> anyhow::Result<CompositeOptions> {
        let mut options = base;
        if let Some(placement) = &self.placement {
            options.placement = placement.parse::<PlacementPolicy>()?;
        }
        Ok(options)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load();

    // Initialize logging
    let level = if cli.verbose {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };
    qrmark_common::logging::init_logging(&LoggingConfig {
        level,
        json: cli.json_logs || config.logging.json,
    });

    match cli.command {
        Commands::Composite {
            host,
            qr,
            output,
            stamp,
        } => commands::composite::run(host, qr, output, stamp.apply(config.compositor)?),
        Commands::Submit {
            host,
            qr,
            output,
            staging,
            keep_staging,
            stamp,
        } => commands::submit::run(
            host,
            qr,
            output,
            staging.unwrap_or_else(|| config.staging_dir.clone()),
            keep_staging,
            stamp.apply(config.compositor)?,
        ),
        Commands::Plan { host, json, stamp } => {
            commands::plan::run(host, json, stamp.apply(config.compositor)?)
        }
        Commands::Config { init } => commands::config::run(config, init),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamp_args_override_configured_options() {
        let args = StampArgs {
            placement: Some("reject".to_string()),
        };
        let options = args.apply(CompositeOptions::default()).unwrap();
        assert_eq!(options.placement, PlacementPolicy::Reject);
    }

    #[test]
    fn stamp_args_reject_unknown_policy() {
        let args = StampArgs {
            placement: Some("center".to_string()),
        };
        assert!(args.apply(CompositeOptions::default()).is_err());
    }

    #[test]
    fn cli_has_no_alpha_or_margin_flags() {
        for flag in ["--alpha", "--margin"] {
            assert!(
                Cli::try_parse_from(["qrmark", "plan", "a.png", flag, "1"]).is_err(),
                "{flag} should not parse"
            );
        }
    }

    #[test]
    fn cli_parses_submit_without_qr() {
        let cli = Cli::try_parse_from(["qrmark", "submit", "--host", "a.png", "-o", "out.png"])
            .unwrap();
        match cli.command {
            Commands::Submit { host, qr, .. } => {
                assert_eq!(host, Some(PathBuf::from("a.png")));
                assert!(qr.is_none());
            }
            _ => panic!("expected submit"),
        }
    }
}
