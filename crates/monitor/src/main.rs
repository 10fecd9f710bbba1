//! Flood Risk Monitor - Main Entry Point

use monitor::{init_logging, MonitorConfig, Pipeline};
use output_consumers::{TracingAlarm, TracingDisplay};
use sensor_acquisition::SimulatedJoystick;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = MonitorConfig::load()?;
    init_logging(&config.logging)?;

    info!("=== Flood Monitor v{} ===", env!("CARGO_PKG_VERSION"));

    let source = SimulatedJoystick::new(config.acquisition.simulation_period_cycles);
    let pipeline = Pipeline::start(&config, source, TracingDisplay, TracingAlarm)?;

    tokio::signal::ctrl_c().await?;
    info!("Interrupt received");

    let report = pipeline.shutdown().await;
    for (consumer, stats) in &report.stats.consumers {
        info!(
            "Consumer '{}': {} delivered, {} dropped ({:.1}%)",
            consumer,
            stats.sent,
            stats.dropped,
            stats.drop_ratio() * 100.0
        );
    }
    info!(
        "Readings: {} delivered, {} dropped",
        report.stats.readings.sent, report.stats.readings.dropped
    );

    Ok(())
}
