use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::info;
use serde::Serialize;

use u_vrptw::alns::{Search, SearchConfig};
use u_vrptw::io::{load_instance, SolutionReport};

/// Solves technician routing instances with destroy/repair search.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Arguments {
    /// Instance files, solved one after another.
    #[arg(required = true)]
    instances: Vec<PathBuf>,

    /// Iteration budget per instance [default: 5000]
    #[arg(short, long)]
    iterations: Option<usize>,

    /// Random seed (fresh entropy when omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// JSON file with search parameters; flags override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print reports as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Log improvements (`RUST_LOG` takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
struct InstanceJson<'a> {
    instance: String,
    elapsed: f64,
    iterations: usize,
    improvements: usize,
    report: &'a SolutionReport,
}

fn search_config(args: &Arguments) -> Result<SearchConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let data = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str::<SearchConfig>(&data)
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => SearchConfig::default(),
    };
    if let Some(n) = args.iterations {
        config.max_iterations = n;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    config.validate().map_err(|e| anyhow!(e))?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Arguments::parse();
    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = search_config(&args)?;
    let started = Instant::now();

    for (i, path) in args.instances.iter().enumerate() {
        info!("instance {} ({}) start", i, path.display());
        let instance_started = Instant::now();

        let loaded =
            load_instance(path).with_context(|| format!("loading {}", path.display()))?;
        let search = Search::new(&loaded.instance, config.clone()).map_err(|e| anyhow!(e))?;
        let result = search.run();
        let report = SolutionReport::new(&loaded, &result.best);
        let elapsed = instance_started.elapsed().as_secs_f64();

        if args.json {
            let out = InstanceJson {
                instance: path.display().to_string(),
                elapsed,
                iterations: result.iterations,
                improvements: result.improvements,
                report: &report,
            };
            println!("{}", serde_json::to_string(&out)?);
        } else {
            println!("+) Instance {} ({})", i, path.display());
            println!("{report}");
            println!("\t=> solved in {elapsed:.3}s");
        }
    }

    info!(
        "{} instance(s) in {:.3}s",
        args.instances.len(),
        started.elapsed().as_secs_f64()
    );
    Ok(())
}
