use lager_scan::address::MemoryAddressBar;
use lager_scan::app::{Controller, ControllerSettings};
use lager_scan::config::Config;
use lager_scan::scan::{DeviceCamera, LineDecoder};
use lager_scan::store::PostgrestStore;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so the rendered view owns stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lager_scan=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env()?;

    tracing::info!("Starting lager-scan...");
    tracing::info!(
        "Store: {} (table {})",
        config.store_url,
        config.schema.table
    );
    match &config.schema.movement_table {
        Some(table) => tracing::info!("Movement logging enabled: table={}", table),
        None => tracing::info!("Movement logging disabled"),
    }

    let store = PostgrestStore::from_config(&config)?;
    let camera = DeviceCamera::new(config.scanner_device.clone());
    let (decoder, feed) = LineDecoder::new();

    // A deep link may be given as the first argument
    let location = match std::env::args().nth(1) {
        Some(link) => config.app_origin.join(&link)?,
        None => config.app_origin.clone(),
    };
    let address = MemoryAddressBar::new(location);

    let controller = Controller::new(
        store,
        camera,
        decoder,
        address,
        ControllerSettings::from_config(&config),
    );

    lager_scan::console::run(controller, feed).await
}
