use tally_app::app::{run, AppConfig};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let config = AppConfig::from_env().unwrap_or_default();
    if let Err(err) = run(config) {
        eprintln!("Failed to build Tally report: {err:#}");
        std::process::exit(1);
    }
}
