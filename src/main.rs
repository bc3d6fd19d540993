mod config;
mod network;
mod output;
mod parsers;
mod topology;

use std::time::{Duration, Instant, SystemTime};

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use config::{Args, BuildConfig, log_level};
use output::write_outputs;
use parsers::ospf_parser::source::CaptureDirectory;
use topology::TopologyBuilder;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| log_level(args.verbose).into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    run(BuildConfig::from(args))
}

fn run(config: BuildConfig) -> anyhow::Result<()> {
    let started = Instant::now();

    let mut source = CaptureDirectory::new(&config.neighbors);
    if let Some(dir) = &config.overview {
        source = source.with_overviews(dir);
    }
    if let Some(version) = config.protocol {
        source = source.with_protocol(version);
    }

    let builder = TopologyBuilder::from_source(&mut source, config.correlation)
        .with_context(|| format!("failed to load captures from {}", config.neighbors.display()))?;
    info!(
        devices = builder.device_count(),
        links = builder.link_count(),
        "captures loaded"
    );
    if builder.link_count() == 0 {
        warn!(
            dir = %config.neighbors.display(),
            "no neighbor links found, the topology will be empty"
        );
    }

    let build = builder.build_schema();
    let written = write_outputs(&build, &config.out, &config.formats, SystemTime::now())
        .with_context(|| format!("failed to write outputs to {}", config.out.display()))?;

    let elapsed = whole_millis(started.elapsed());
    info!(
        nodes = build.topology.len(),
        unmapped = build.correlation.unmapped.len(),
        elapsed = %humantime::format_duration(elapsed),
        "done"
    );
    for path in written {
        println!("{}", path.display());
    }
    Ok(())
}

/// Drops sub-millisecond precision so the logged duration stays readable.
fn whole_millis(elapsed: Duration) -> Duration {
    Duration::from_millis(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
}
