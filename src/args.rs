use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use pcdview::{Encoding, FallbackPolicy, LoadOptions};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Application log level
    #[arg(long, env = "PCDVIEW_LOG", default_value = "info", global = true)]
    pub rust_log: LevelFilter,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Decode a PCD file and report its point count, bounds and colors.
    Info {
        /// PCD file to load
        file: PathBuf,

        /// JSON file with loader options.  Flags below override it.
        #[arg(long, env = "PCDVIEW_CONFIG")]
        config: Option<PathBuf>,

        /// Downsample to at most this many points.
        #[arg(long, env = "PCDVIEW_MAX_POINTS")]
        max_points: Option<usize>,

        /// Keep every decoded point.
        #[arg(long, conflicts_with = "max_points")]
        no_downsample: bool,

        /// Report the placeholder cloud instead of failing when the file
        /// cannot be decoded.
        #[arg(long, env = "PCDVIEW_FALLBACK")]
        fallback: bool,

        /// Print the summary as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Re-encode a PCD file as ASCII or binary, keeping every point.
    Convert {
        input: PathBuf,

        output: PathBuf,

        #[arg(long, value_enum, default_value = "binary")]
        encoding: OutputEncoding,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputEncoding {
    Ascii,
    Binary,
}

impl From<OutputEncoding> for Encoding {
    fn from(encoding: OutputEncoding) -> Self {
        match encoding {
            OutputEncoding::Ascii => Encoding::Ascii,
            OutputEncoding::Binary => Encoding::Binary,
        }
    }
}

/// Applies command-line overrides on top of `base`.
pub fn apply_overrides(
    mut base: LoadOptions,
    max_points: Option<usize>,
    no_downsample: bool,
    fallback: bool,
) -> LoadOptions {
    if no_downsample {
        base.max_points = None;
    } else if max_points.is_some() {
        base.max_points = max_points;
    }
    if fallback {
        base.fallback = FallbackPolicy::Placeholder;
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_info_flags() {
        let args = Args::try_parse_from([
            "pcdview",
            "info",
            "scan.pcd",
            "--max-points",
            "1000",
            "--fallback",
        ])
        .unwrap();
        match args.command {
            Command::Info {
                file,
                max_points,
                fallback,
                ..
            } => {
                assert_eq!(file, PathBuf::from("scan.pcd"));
                assert_eq!(max_points, Some(1000));
                assert!(fallback);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn overrides_take_precedence() {
        let options = apply_overrides(LoadOptions::default(), Some(10), false, true);
        assert_eq!(options.max_points, Some(10));
        assert_eq!(options.fallback, FallbackPolicy::Placeholder);

        let options = apply_overrides(LoadOptions::default(), None, true, false);
        assert_eq!(options.max_points, None);
        assert_eq!(options.fallback, FallbackPolicy::Propagate);
    }
}
