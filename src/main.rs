//! FAAB blogger CLI entrypoint.
//! Runs the pipeline once and prints where the post was written.

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "faab-blogger", version, about = "Generate fantasy football FAAB blog posts")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full workflow and publish the post.
    Generate {
        /// Number of players to include in the report
        #[arg(
            long,
            default_value_t = 10,
            allow_negative_numbers = true,
            value_parser = clap::value_parser!(i64).range(1..)
        )]
        top_n: i64,
    },
}

/// Compact logs by default; `FAAB_LOG_JSON=1` switches to JSON lines.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("faab_blogger=info,warn"));
    let json = std::env::var("FAAB_LOG_JSON")
        .ok()
        .is_some_and(|v| v == "1");

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Command::Generate { top_n } => {
            tracing::info!(top_n, "launching FAAB blogger pipeline");
            let top_n = usize::try_from(top_n)?;
            let path = faab_blogger::generate(top_n).await?;
            println!("Blog post generated -> {}", path.display());
        }
    }
    Ok(())
}
