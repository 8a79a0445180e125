//! Facility Layout CLI
//!
//! Usage:
//!   facility-layout [OPTIONS] [FILE]
//!
//! Options:
//!   -i, --industry <ID>             Industry id or alias (e.g. automotive, oil_gas)
//!   -k, --knowledge-base <FILE>     Extra industry catalog (TOML), merged over the built-in one
//!       --check                     Lint the layout; warnings go to stderr, exit 2 if any
//!       --path <X1,Y1,X2,Y2>        Print an orthogonal path and exit
//!       --list-industries           List known industries and exit
//!   -h, --help                      Print help

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use facility_layout::asset::{read_assets, read_assets_file};
use facility_layout::layout::{lint, Canvas};
use facility_layout::{
    compute_orthogonal_path, generate_layout_with_config, KnowledgeBase, LayoutConfig,
    LayoutOptions,
};

#[derive(Parser)]
#[command(name = "facility-layout")]
#[command(about = "Deterministic facility layout from industrial asset inventories")]
struct Cli {
    /// JSON array of asset records (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Industry id or alias used to classify units
    #[arg(short, long, default_value = "")]
    industry: String,

    /// Canvas width
    #[arg(long, default_value_t = 1200.0)]
    width: f64,

    /// Canvas height
    #[arg(long, default_value_t = 800.0)]
    height: f64,

    /// Key the layout seed is derived from (defaults to industry and unit names)
    #[arg(long)]
    seed_key: Option<String>,

    /// Extra industry catalog (TOML), merged over the built-in one
    #[arg(short = 'k', long)]
    knowledge_base: Option<PathBuf>,

    /// Minimum clearance between buildings
    #[arg(long)]
    gap: Option<f64>,

    /// Free border along every canvas edge
    #[arg(long)]
    margin: Option<f64>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Lint the computed layout; warnings go to stderr and the exit code is 2
    #[arg(long)]
    check: bool,

    /// Print the orthogonal path between two points and exit
    #[arg(long, value_name = "X1,Y1,X2,Y2", value_parser = parse_path_arg)]
    path: Option<PathArg>,

    /// List the industries of the knowledge base and exit
    #[arg(long)]
    list_industries: bool,

    /// Log pipeline stages (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy)]
struct PathArg([f64; 4]);

fn parse_path_arg(value: &str) -> Result<PathArg, String> {
    let parts = value
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|e| format!("invalid coordinate '{}': {}", part.trim(), e))
        })
        .collect::<Result<Vec<_>, _>>()?;
    match parts.as_slice() {
        [x1, y1, x2, y2] => Ok(PathArg([*x1, *y1, *x2, *y2])),
        _ => Err(format!("expected 4 coordinates, got {}", parts.len())),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Some(PathArg([x1, y1, x2, y2])) = cli.path {
        let path = compute_orthogonal_path(x1, y1, x2, y2);
        print_json(&path, cli.pretty);
        return;
    }

    // Load knowledge base
    let kb = match &cli.knowledge_base {
        Some(path) => match KnowledgeBase::from_file(path) {
            Ok(extra) => KnowledgeBase::builtin().merge(extra),
            Err(e) => {
                eprintln!("Error loading knowledge base '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => KnowledgeBase::builtin(),
    };

    if cli.list_industries {
        for industry in &kb.industries {
            println!("{}\t{}", industry.id, industry.name);
        }
        return;
    }

    // Read input
    let assets = match &cli.input {
        Some(path) => match read_assets_file(path) {
            Ok(assets) => assets,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => match read_assets(io::stdin().lock()) {
            Ok(assets) => assets,
            Err(e) => {
                eprintln!("Error reading from stdin: {}", e);
                std::process::exit(1);
            }
        },
    };

    let mut config = LayoutConfig::new();
    if let Some(gap) = cli.gap {
        config = config.with_min_gap(gap);
    }
    if let Some(margin) = cli.margin {
        config = config.with_margin(margin);
    }

    let mut options = LayoutOptions::new(cli.industry, cli.width, cli.height);
    options.seed_key = cli.seed_key;

    let result = generate_layout_with_config(&assets, &options, &kb, &config);
    print_json(&result, cli.pretty);

    if cli.check {
        let warnings = lint::check(&result, Canvas::new(options.width, options.height), &config);
        for warning in &warnings {
            eprintln!("warning: {}", warning);
        }
        if !warnings.is_empty() {
            std::process::exit(2);
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match rendered {
        Ok(json) => {
            let mut stdout = io::stdout().lock();
            if let Err(e) = writeln!(stdout, "{}", json) {
                eprintln!("Error writing output: {}", e);
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            std::process::exit(1);
        }
    }
}
