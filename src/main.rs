use std::env;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env("ARKLEDGER_LOG")
                .unwrap_or_else(|_| EnvFilter::new("arkledger=info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = env::args().collect();
    std::process::exit(arkledger::cli::run_with_args(&args));
}
