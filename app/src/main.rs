use std::path::PathBuf;

use bar_compare::BarCompare;
use clap::{Args, Parser, Subcommand};
use common::aggregate::Aggregation;
use default_benches::ReportFormat;
use eyre::Result;
use tracing::error;
use tracing_subscriber::{
    EnvFilter,
    fmt::{layer, time::ChronoLocal},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::config::ComparisonConfig;

mod compare;
mod config;

const MODULES: &[&str] = &[
    "common",
    "block",
    "etcd",
    "iperf3",
    "memcached",
    "rabbitmq",
    "redis",
    "default_benches",
    "bar_compare",
];

#[derive(Parser)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long)]
    log: Vec<String>,
}

#[derive(Args)]
struct ReportArgs {
    /// Input reports in series order, followed by the output image (.png or .svg)
    #[arg(required = true, num_args = 2..)]
    paths: Vec<PathBuf>,
    /// Legend entry per input report, in order
    #[arg(short, long = "name")]
    names: Vec<String>,
    /// Bar width in axis units
    #[arg(long)]
    bar_width: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare block throughput reports
    Block {
        /// How runs against the same block are folded: sum, first or last
        #[arg(short, long)]
        aggregation: Aggregation,
        #[command(flatten)]
        args: ReportArgs,
    },
    /// Compare etcd benchmark summaries
    Etcd(ReportArgs),
    /// Compare iperf3 JSON reports
    Iperf3(ReportArgs),
    /// Compare memtier_benchmark JSON reports against memcached
    Memcached(ReportArgs),
    /// Compare RabbitMQ PerfTest outputs
    Rabbitmq(ReportArgs),
    /// Compare redis-benchmark CSV outputs
    Redis(ReportArgs),
    /// Run a comparison described by a YAML file
    Compare {
        #[arg(short, long)]
        config: String,
    },
    /// Print the labels a report format is normalized to
    Labels { format: ReportFormat },
}

fn from_args(
    format: ReportFormat,
    aggregation: Option<Aggregation>,
    args: ReportArgs,
) -> Result<ComparisonConfig> {
    ComparisonConfig::from_paths(format, args.paths, aggregation, args.bar_width, args.names)
}

fn main() -> Result<()> {
    let log_level = std::env::var("RUST_LOG").unwrap_or("warn".to_owned());
    let args = Cli::parse();

    let mut env_filter = EnvFilter::new(format!("bench_compare={log_level}"));
    for log in &args.log {
        env_filter = env_filter.add_directive(log.parse()?);
    }
    for module in MODULES {
        if !args.log.iter().any(|x| x.starts_with(module)) {
            env_filter = env_filter.add_directive(format!("{module}={log_level}").parse()?);
        }
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            layer()
                .with_writer(std::io::stderr)
                .with_timer(ChronoLocal::new("%v %k:%M:%S %z".to_owned()))
                .compact(),
        )
        .init();

    let config = match args.command {
        Commands::Block { aggregation, args } => {
            from_args(ReportFormat::Block, Some(aggregation), args)?
        }
        Commands::Etcd(args) => from_args(ReportFormat::Etcd, None, args)?,
        Commands::Iperf3(args) => from_args(ReportFormat::Iperf3, None, args)?,
        Commands::Memcached(args) => from_args(ReportFormat::Memcached, None, args)?,
        Commands::Rabbitmq(args) => from_args(ReportFormat::Rabbitmq, None, args)?,
        Commands::Redis(args) => from_args(ReportFormat::Redis, None, args)?,
        Commands::Compare { config } => ComparisonConfig::load(&config)?,
        Commands::Labels { format } => return print_labels(format),
    };

    if let Err(err) = compare::run_comparison(&config, &BarCompare) {
        error!("{err:#}");
        return Err(err);
    }
    println!("Chart written to {}", config.output.display());
    Ok(())
}

fn print_labels(format: ReportFormat) -> Result<()> {
    let aggregation = format.needs_aggregation().then_some(Aggregation::Sum);
    let parser = format.parser(aggregation)?;
    let labels = parser.label_set();
    for (i, label) in labels.labels().iter().enumerate() {
        let axis = match labels.secondary_from() {
            Some(k) if i >= k => "secondary",
            _ => "primary",
        };
        println!("{:>2} {} -> {} ({axis})", i, label.key, label.display);
    }
    Ok(())
}
