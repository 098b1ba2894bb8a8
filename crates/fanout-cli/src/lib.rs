//! Command-line driver for Fanout
//!
//! Each subcommand runs one aggregation against the simulated source and
//! renders the result to stdout. Logs go to stderr.

#![warn(unreachable_pub)]

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use fanout_core::{
    AggregationResult, Aggregator, FetchConfig, ImmediateClock, SimulatedSource, Strategy, UserId,
};
use fanout_render::Format;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// What a subcommand asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// One partial-tolerant strategy
    Run(Strategy),
    /// The fail-fast aggregation
    Content,
    /// Both strategies, with timings
    Compare,
}

/// Output encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    /// Rendered text or HTML
    Rendered(Format),
    /// Pretty-printed JSON
    Json,
}

/// Resolved options for one invocation
#[derive(Debug, Clone)]
pub struct Settings {
    /// Requested user
    pub user_id: UserId,
    /// Output encoding
    pub output: Output,
    /// Fetch configuration after overrides
    pub config: FetchConfig,
    /// Skip simulated latency
    pub instant: bool,
}

/// Build the argument parser
#[must_use]
pub fn command() -> Command {
    Command::new("fanout")
        .version(fanout_core::VERSION)
        .about("Compare sequential and parallel content aggregation")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("user")
                .long("user")
                .global(true)
                .default_value("1")
                .value_parser(value_parser!(u64))
                .help("User identifier to fetch"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Path to a TOML fetch configuration"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .global(true)
                .value_parser(value_parser!(u64))
                .help("Seed for reproducible failure injection"),
        )
        .arg(
            Arg::new("failure-rate")
                .long("failure-rate")
                .global(true)
                .value_parser(value_parser!(f64))
                .help("Probability that a comment fetch fails"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .global(true)
                .default_value("text")
                .value_parser(["text", "html", "json"])
                .help("Output format"),
        )
        .arg(
            Arg::new("instant")
                .long("instant")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Skip simulated latency"),
        )
        .subcommand(Command::new("sequential").about("Fetch everything one request at a time"))
        .subcommand(Command::new("parallel").about("Overlap independent requests"))
        .subcommand(
            Command::new("content").about("Fail-fast fetch; exits non-zero on upstream failure"),
        )
        .subcommand(Command::new("compare").about("Run both strategies and report timings"))
}

/// Resolve the subcommand and its options
pub fn parse(matches: &ArgMatches) -> anyhow::Result<(Mode, Settings)> {
    let (name, args) = matches
        .subcommand()
        .context("a subcommand is required")?;

    let mode = match name {
        "sequential" => Mode::Run(Strategy::Sequential),
        "parallel" => Mode::Run(Strategy::Parallel),
        "content" => Mode::Content,
        "compare" => Mode::Compare,
        other => anyhow::bail!("unknown subcommand: {other}"),
    };

    Ok((mode, settings(args)?))
}

fn settings(args: &ArgMatches) -> anyhow::Result<Settings> {
    let mut config = match args.get_one::<PathBuf>("config") {
        Some(path) => FetchConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => FetchConfig::default(),
    };
    if let Some(seed) = args.get_one::<u64>("seed") {
        config = config.with_seed(*seed);
    }
    if let Some(rate) = args.get_one::<f64>("failure-rate") {
        config = config.with_failure_rate(*rate);
    }
    config.validate()?;

    let output = match args.get_one::<String>("format").map(String::as_str) {
        Some("json") => Output::Json,
        Some("html") => Output::Rendered(Format::Html),
        _ => Output::Rendered(Format::Text),
    };

    Ok(Settings {
        user_id: UserId(args.get_one::<u64>("user").copied().unwrap_or(1)),
        output,
        config,
        instant: args.get_flag("instant"),
    })
}

/// Simulated source for `settings`
#[must_use]
pub fn source(settings: &Settings) -> SimulatedSource {
    let source = SimulatedSource::from_config(&settings.config);
    if settings.instant {
        source.with_clock(Arc::new(ImmediateClock))
    } else {
        source
    }
}

/// Run `mode` and return what should be printed
pub async fn execute(mode: Mode, settings: &Settings) -> anyhow::Result<String> {
    let aggregator = Aggregator::new(source(settings));

    match mode {
        Mode::Run(strategy) => {
            let result = aggregator.run(strategy, settings.user_id).await;
            encode(&result, settings.output)
        }
        Mode::Content => {
            let content = aggregator.user_content(settings.user_id).await?;
            encode(&AggregationResult::from(content), settings.output)
        }
        Mode::Compare => {
            let mut runs = Vec::with_capacity(Strategy::ALL.len());
            for strategy in Strategy::ALL {
                let (result, elapsed) = aggregator.run_timed(strategy, settings.user_id).await;
                runs.push((strategy, result, elapsed));
            }
            compare_report(&runs, settings.output)
        }
    }
}

fn encode(result: &AggregationResult, output: Output) -> anyhow::Result<String> {
    match output {
        Output::Json => Ok(serde_json::to_string_pretty(result)?),
        Output::Rendered(format) => Ok(fanout_render::render(result, format)),
    }
}

fn compare_report(
    runs: &[(Strategy, AggregationResult, Duration)],
    output: Output,
) -> anyhow::Result<String> {
    if output == Output::Json {
        let report: serde_json::Map<String, serde_json::Value> = runs
            .iter()
            .map(|(strategy, result, elapsed)| {
                let entry = serde_json::json!({
                    "elapsedMs": u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
                    "result": result,
                });
                (strategy.name().to_string(), entry)
            })
            .collect();
        return Ok(serde_json::to_string_pretty(&report)?);
    }

    let mut out = String::new();
    for (strategy, result, elapsed) in runs {
        out.push_str(&format!("=== {strategy} ===\n"));
        out.push_str(&encode(result, output)?);
        out.push('\n');
        out.push_str(&format!("{strategy} fetch took {} ms\n\n", elapsed.as_millis()));
    }
    Ok(out)
}

/// Install the stderr log subscriber (`RUST_LOG` overrides the `info` default)
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
