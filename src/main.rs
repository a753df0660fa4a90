use clap::Parser;
use inboxer::cli::{handle_setup, Cli};
use inboxer::SetupOutcome;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// cargo run --bin inboxer-setup -- /path/to/credentials.json
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inboxer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match handle_setup(&cli).await? {
        SetupOutcome::AlreadyConfigured => println!("Credentials already set, nothing to do."),
        SetupOutcome::Authorized => println!("Credentials saved."),
    }
    Ok(())
}
