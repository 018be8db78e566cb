use streamer::logging::setup_logging;
use streamer::signals::shutdown_signal;
use streamer::StreamerBuilder;
use tracing::warn;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_logging();
    // installed before connecting so an early interrupt still shuts down cleanly
    let shutdown = shutdown_signal();

    let mut streamer = StreamerBuilder::from_env()?;
    if let Err(err) = streamer.run(shutdown).await {
        if err.is_host_unavailable() {
            warn!("check that the visualization host is running, that its TCP server is active,");
            warn!("and that port {} is available", streamer.config().host_address.port());
        }
        return Err(err.into());
    }
    Ok(())
}
