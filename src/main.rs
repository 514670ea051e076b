use fspeek::cli;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Help, version and usage errors exit here, before anything is logged
    let cli = cli::parse();

    // Initialize tracing; logs go to stderr so stdout carries only file content
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.verbosity().filter_directive().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting fspeek v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = cli::run(cli.into_config()).await {
        std::process::exit(cli::fatal(&e));
    }
}
