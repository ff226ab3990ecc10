use relay_service::{api::run_api_server, config::Config};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("{:?}", error);
            std::process::exit(1);
        }
    };

    if let Err(error) = run_api_server(config).await {
        tracing::error!(error = %error, "Server terminated");
        std::process::exit(1);
    }
}
