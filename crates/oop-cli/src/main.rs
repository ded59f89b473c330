//! Binary entrypoint for oopnlp.
use clap::Parser;
use oop_cli::{run, Cli};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG overrides the verbosity flag
    let default_filter = if cli.verbose {
        "oop_core=debug,oop_registry=debug,oop_io=debug,oop_cli=debug"
    } else {
        "oop_core=info,oop_registry=info,oop_io=info,oop_cli=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    run(cli).await
}
