use std::path::PathBuf;

use clap::{ArgAction, Parser, builder::RangedU64ValueParser};

use crate::{
    output::OutputFormat,
    parsers::OspfVersion,
    topology::correlation::{CorrelationConfig, DEFAULT_MAX_ITERATIONS, TieBreak},
};

/// Builds a hostname-keyed OSPF topology from per-device neighbor captures.
#[derive(Parser, Debug, Clone)]
#[command(name = "ospf-topology", version, about, long_about = None)]
pub struct Args {
    /// Directory of neighbor-table captures, one file per device named after it
    #[arg(short, long, env = "OSPF_TOPOLOGY_NEIGHBORS")]
    pub neighbors: PathBuf,

    /// Directory of `show ip ospf` / `show ospf overview` captures giving each device's router-id
    #[arg(short, long, env = "OSPF_TOPOLOGY_OVERVIEW")]
    pub overview: Option<PathBuf>,

    /// Only accept neighbor captures of this OSPF version (2 or 3)
    #[arg(short, long, env = "OSPF_TOPOLOGY_PROTOCOL")]
    pub protocol: Option<OspfVersion>,

    /// Output directory
    #[arg(long, env = "OSPF_TOPOLOGY_OUT", default_value = ".")]
    pub out: PathBuf,

    /// Outputs to write; all of them when not given
    #[arg(short, long = "format", value_enum)]
    pub formats: Vec<OutputFormat>,

    /// Sweep cap for each iterated correlation pass
    #[arg(
        long,
        env = "OSPF_TOPOLOGY_MAX_ITERATIONS",
        default_value_t = DEFAULT_MAX_ITERATIONS,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub max_iterations: usize,

    /// What the neighborhood pass does when several devices match equally well
    #[arg(long, value_enum, default_value_t = TieBreak::Strict)]
    pub tie_break: TieBreak,

    /// More output per occurrence (-v info, -vv debug, -vvv trace). RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Settings of one run, resolved from the command line and environment.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub neighbors: PathBuf,
    pub overview: Option<PathBuf>,
    pub protocol: Option<OspfVersion>,
    pub out: PathBuf,
    pub formats: Vec<OutputFormat>,
    pub correlation: CorrelationConfig,
}

impl From<Args> for BuildConfig {
    fn from(args: Args) -> Self {
        let mut formats = if args.formats.is_empty() {
            OutputFormat::ALL.to_vec()
        } else {
            args.formats
        };
        formats.sort();
        formats.dedup();

        BuildConfig {
            neighbors: args.neighbors,
            overview: args.overview,
            protocol: args.protocol,
            out: args.out,
            formats,
            correlation: CorrelationConfig {
                max_iterations: args.max_iterations,
                tie_break: args.tie_break,
            },
        }
    }
}

/// Default log filter for a `-v` count.
pub fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
