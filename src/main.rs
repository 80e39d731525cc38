use std::process::ExitCode;
use taxi_dashboard::cache::DatasetCache;
use taxi_dashboard::logging::init_default_logging;
use taxi_dashboard::server::run_server;
use taxi_dashboard::settings::DashboardSettings;
use tracing::error;

#[actix_web::main]
async fn main() -> ExitCode {
    init_default_logging();
    let settings = DashboardSettings::default();

    let mut cache = DatasetCache::new();
    let dataset = match cache.get_or_load(&settings.sources).await {
        Ok(dataset) => dataset,
        Err(e) => {
            error!("Failed to load the trip data: {}", e);
            eprintln!("Failed to load the trip data: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = run_server(&settings, dataset).await {
        error!("Server stopped with an error: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
