mod app;
mod config;
mod format;
mod library;
mod logging;
mod runtime;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _guard = logging::init();
    tracing::info!("cadence {} starting", env!("CARGO_PKG_VERSION"));
    runtime::run()
}
