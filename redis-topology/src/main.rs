//! redis-topology
//!
//! Walks a Redis deployment from one or more seed nodes and prints the
//! replication/sentinel graph it finds.

use anyhow::{Context, Result};
use clap::Parser;
use redis_topology::{
    DiscoveryConfig, GraphBuilder, OutputFormat, RedisInfoClient, RendererRegistry,
    UnresolvedEdgePolicy, logging,
};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "redis-topology")]
#[command(about = "Discover the replication and sentinel topology of a Redis deployment", long_about = None)]
#[command(version)]
struct Args {
    /// Seed addresses, comma separated (host:port,host:port)
    #[arg(short, long)]
    addr: Option<String>,

    /// Password sent to every node
    #[arg(short, long)]
    pass: Option<String>,

    /// Output format: graphviz, debug or json
    #[arg(short, long)]
    output: Option<String>,

    /// YAML configuration file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Drop unreachable replicas/masters instead of keeping placeholders
    #[arg(long)]
    omit_unresolved: bool,

    /// Per-node connect + INFO timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn into_config(self) -> Result<(DiscoveryConfig, bool)> {
        let mut config = match &self.config {
            Some(path) => DiscoveryConfig::from_file(path)
                .with_context(|| format!("Failed to load config {:?}", path))?,
            None => DiscoveryConfig::default(),
        };

        if let Some(addr) = &self.addr {
            config.seeds = DiscoveryConfig::parse_seeds(addr);
        }
        if let Some(pass) = self.pass {
            config.password = Some(pass);
        }
        if let Some(output) = &self.output {
            config.output = output.parse::<OutputFormat>()?;
        }
        if self.omit_unresolved {
            config.unresolved_edges = UnresolvedEdgePolicy::Omit;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.query_timeout_ms = timeout_ms;
        }

        Ok((config, self.verbose))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let (config, verbose) = Args::parse().into_config()?;

    logging::init(&config.logging, verbose)?;
    config
        .validate()
        .context("Flag addr not set and no seeds in config")?;

    // Resolve the renderer before touching the network
    let registry = RendererRegistry::with_defaults();
    let renderer = registry.get(config.output)?;

    info!(
        "Discovering from {} seed(s), output {}",
        config.seeds.len(),
        config.output
    );

    let client = RedisInfoClient::new(config.query_timeout());
    let mut builder = GraphBuilder::new(client, config.credential().map(str::to_string))
        .with_policy(config.unresolved_edges);
    builder.build_graph(&config.seeds).await;
    let topology = builder.into_topology();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    renderer
        .render(&topology, &mut out)
        .context("Failed to write output")?;
    out.flush()?;

    Ok(())
}
