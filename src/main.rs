use fastslowly::{commands::Cli, libs::messages::macros::is_debug_mode};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if is_debug_mode() {
        tracing_subscriber::registry()
            .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "fastslowly=debug".into()))
            .with(fmt::layer())
            .init();
    }

    Cli::menu().await
}
