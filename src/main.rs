use anyhow::Result;
use clap::{Parser, Subcommand};

use greencode::{config, web};

mod cli;

#[derive(Debug, Parser)]
#[command(name = "greencode")]
#[command(about = "Energy-aware code optimization from the command line")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Submit code for optimization and show scores, savings and variants
    Optimize {
        /// Source file to optimize (reads stdin when omitted or `-`)
        file: Option<String>,
        /// Optimization goal: energy_efficiency, performance, memory_efficiency, readability
        #[arg(long, default_value = "energy_efficiency")]
        context: String,
        /// Model key to request (default: configured default model)
        #[arg(long)]
        model: Option<String>,
        /// Disable advanced analysis
        #[arg(long)]
        basic: bool,
        /// Do not ask for fast/green variants
        #[arg(long)]
        no_variants: bool,
        /// Code to display: base (default), fast, green
        #[arg(long, default_value = "base")]
        show: String,
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Check the analysis service and local setup
    Health,
    /// List the models the service offers
    Models {
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Ask the service to drop its cached models
    ClearCache,
    /// Show statistics from the local event log
    Stats {
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
        /// Only include the last N days of data
        #[arg(long)]
        days: Option<u32>,
    },
    /// Show the effective configuration
    Config,
    /// Launch the local playground
    Web {
        /// Address to bind
        #[arg(long, default_value = web::DEFAULT_ADDR)]
        addr: String,
    },
}

fn main() -> Result<()> {
    let app = App::parse();

    match app.command {
        Commands::Optimize {
            file,
            context,
            model,
            basic,
            no_variants,
            show,
            format,
        } => cli::run_optimize(cli::OptimizeOptions {
            file,
            context,
            model,
            basic,
            no_variants,
            show,
            format: cli::OutputFormat::from_str_opt(Some(&format)),
        }),
        Commands::Health => cli::run_health(),
        Commands::Models { format } => {
            cli::run_models(cli::OutputFormat::from_str_opt(Some(&format)))
        }
        Commands::ClearCache => cli::run_clear_cache(),
        Commands::Stats { format, days } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_stats(fmt, days)
        }
        Commands::Config => cli::run_config_show(),
        Commands::Web { addr } => web::serve(&addr, config::load()),
    }
}
