use tracing::error;
use tracing_subscriber::EnvFilter;

use vitrine::config::Settings;
use vitrine::server;

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "could not load settings");
            std::process::exit(2);
        }
    };
    if let Err(e) = server::serve(&settings).await {
        error!(error = %e, "server stopped");
        std::process::exit(1);
    }
}
