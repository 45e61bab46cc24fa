use clap::{Parser, Subcommand};
use std::path::PathBuf;
use wiki_pagerank::{pipeline, Config};

#[derive(Parser)]
#[command(
    name = "wiki-pagerank",
    version,
    about = "Rank Wikipedia articles by PageRank, straight from the SQL dumps"
)]
struct Cli {
    /// Path to the config file
    #[arg(long, global = true, default_value = Config::DEFAULT_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse dumps (or read caches), iterate PageRank and write the score file
    Compute {
        /// Override the configured damping factor
        #[arg(long)]
        damping: Option<f64>,
        /// Override the configured iteration cap
        #[arg(long)]
        iterations: Option<usize>,
        /// Override the configured L1 convergence threshold
        #[arg(long)]
        tolerance: Option<f64>,
    },
    /// Sort a list of titles (one per line) by previously computed scores
    Sort {
        /// Titles to sort
        #[arg(long, default_value = "page-titles.txt")]
        input: PathBuf,
        /// Where to write `log10(score)\ttitle` lines
        #[arg(long, default_value = "page-titles-sorted.txt")]
        output: PathBuf,
    },
    /// Write a config file with default settings
    InitConfig,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if matches!(cli.command, Commands::InitConfig) {
        Config::write_default(&cli.config)?;
        println!("Default config written to {}", cli.config.display());
        return Ok(());
    }

    let mut config = Config::load_from(&cli.config)?;

    match cli.command {
        Commands::Compute {
            damping,
            iterations,
            tolerance,
        } => {
            if let Some(damping) = damping {
                config.damping = damping;
            }
            if let Some(iterations) = iterations {
                config.max_iterations = iterations;
            }
            if tolerance.is_some() {
                config.tolerance = tolerance;
            }
            pipeline::run(&config).await?;
        }
        Commands::Sort { input, output } => {
            pipeline::sort_title_file(&config, &input, &output).await?;
        }
        Commands::InitConfig => {}
    }

    Ok(())
}
