use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "healthmate-server")]
#[command(about = "Workout, lifestyle and meal recommendation server", long_about = None)]
struct Args {
    /// Config file (default: healthmate-server.yaml if present)
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let default_filter = if args.debug {
        "healthmate_rs=debug,tower_http=debug"
    } else {
        "healthmate_rs=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = healthmate_rs::run(args.config.as_deref(), args.debug).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
