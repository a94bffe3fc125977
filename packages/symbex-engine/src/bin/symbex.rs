//! Symbex CLI
//!
//! Runs the path explorer over syntax trees exported as JSON by a front-end.
//!
//! # Usage
//!
//! ```bash
//! # Analyze every function of a module tree
//! cargo run --bin symbex --release -- analyze tree.json
//!
//! # One function, thorough preset, JSON output
//! cargo run --bin symbex --release -- analyze tree.json --function f --preset thorough --format json
//!
//! # Print the effective configuration
//! cargo run --bin symbex --release -- config --preset fast
//! ```
//!
//! Exit codes: 0 on success, 2 when the tree cannot be parsed, 1 otherwise.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use symbex_engine::config::{ExplorerConfig, Preset};
use symbex_engine::features::path_explorer::{AnalysisReport, AnalyzeUseCase, AnalyzeUseCaseImpl};
use symbex_engine::shared::models::{FunctionUnit, ModuleUnit};
use symbex_engine::SymbexError;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "symbex")]
#[command(about = "Symbolic execution: test inputs for reachable branches, proofs for dead ones", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a module or function tree
    Analyze {
        /// JSON syntax tree (module with `functions`, or a single function)
        tree: PathBuf,

        /// YAML configuration file (takes precedence over --preset)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Configuration preset
        #[arg(short, long, default_value = "balanced")]
        preset: String,

        /// Only analyze the named function
        #[arg(short, long)]
        function: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Print the effective configuration as YAML
    Config {
        /// Configuration preset
        #[arg(short, long, default_value = "balanced")]
        preset: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            match err.downcast_ref::<SymbexError>() {
                Some(SymbexError::ParseFailure(_)) => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Analyze {
            tree,
            config,
            preset,
            function,
            format,
        } => {
            let config = load_config(config, &preset)?;
            analyze(tree, config, function, format)
        }
        Commands::Config { preset } => {
            let config = ExplorerConfig::preset(Preset::from_str(&preset)?);
            print!("{}", config.to_yaml()?);
            Ok(())
        }
    }
}

fn load_config(path: Option<PathBuf>, preset: &str) -> anyhow::Result<ExplorerConfig> {
    match path {
        Some(path) => ExplorerConfig::from_yaml(&path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(ExplorerConfig::preset(Preset::from_str(preset)?)),
    }
}

/// Module tree if the document has `functions`, single function otherwise
fn load_module(text: &str) -> symbex_engine::Result<ModuleUnit> {
    let document: serde_json::Value =
        serde_json::from_str(text).map_err(|e| SymbexError::parse_failure(e.to_string()))?;

    if document.get("functions").is_some() {
        ModuleUnit::from_json(text)
    } else {
        Ok(ModuleUnit {
            functions: vec![FunctionUnit::from_json(text)?],
        })
    }
}

fn analyze(
    tree: PathBuf,
    config: ExplorerConfig,
    function: Option<String>,
    format: Format,
) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&tree)
        .with_context(|| format!("reading {}", tree.display()))?;
    let mut module = load_module(&text)?;

    if let Some(name) = &function {
        module.functions.retain(|f| &f.name == name);
        if module.functions.is_empty() {
            bail!("no function named '{}' in {}", name, tree.display());
        }
    }

    let usecase = AnalyzeUseCaseImpl::new(config)?;
    let reports = usecase.analyze_module(&module);

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
        Format::Text => reports.iter().for_each(print_report),
    }
    Ok(())
}

fn print_report(report: &AnalysisReport) {
    println!("{}", report.summary());
    for test_case in &report.test_cases {
        println!("  test   {}", test_case);
    }
    for violation in &report.violations {
        println!("  unsat  {}", violation);
    }
    for diagnostic in &report.diagnostics {
        println!("  diag   {}", diagnostic);
    }
}
