use clap::Parser;
use tracing_subscriber::EnvFilter;

use ortho_pipeline::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("ortho_pipeline=debug,info")
    } else {
        EnvFilter::new("ortho_pipeline=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::Fetch(args) => {
            cli::fetch::run(args, cli.format)?;
        }
        cli::Commands::Align(args) => {
            cli::align::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Search(args) => {
            cli::search::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::BestHit(args) => {
            cli::best_hit::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Concat(args) => {
            cli::concat::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Merge(args) => {
            cli::merge::run(args, cli.format)?;
        }
        cli::Commands::Tree(args) => {
            cli::tree::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
