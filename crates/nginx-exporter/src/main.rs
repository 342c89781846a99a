//! NGINX exporter binary

use nginx_exporter::{Config, Exporter, setup_tracing};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // Configuration comes first: it drives logging setup
    let loaded = Config::locate().and_then(|path| {
        let config = Config::load_from_file(&path)?;
        Ok((path, config))
    });
    let (config_path, config) = match loaded {
        Ok(loaded) => loaded,
        Err(e) => {
            // Can't use tracing yet - not initialized
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let _telemetry_guard =
        match setup_tracing(&config.logging, &config.telemetry, config.log_level()).await {
            Ok(guard) => guard,
            Err(e) => {
                eprintln!("{}", e);
                return ExitCode::FAILURE;
            }
        };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %config_path.display(),
        "NGINX exporter starting"
    );

    let exporter = match Exporter::new(&config) {
        Ok(exporter) => exporter,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = exporter.run().await {
        tracing::error!(error = %e, "Exporter failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
