use crate::agent::Roster;
use crate::config::{StreamerConfig, ADDRESS_VAR, SEED_VAR};
use crate::error::StreamerError;
use crate::movement::{RandomSource, RngSource};
use crate::transport::{wrap_stream, ReplyStream, UpdateSink};
use futures::{SinkExt, StreamExt};
use rand::rngs::StdRng;
use std::future::Future;
use std::io;
use tokio::net::TcpStream;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

pub mod agent;
pub mod config;
pub mod error;
pub mod logging;
pub mod movement;
pub mod signals;
pub mod transport;

pub struct StreamerBuilder {}

impl StreamerBuilder {
    pub fn from_env() -> Result<Streamer, StreamerError> {
        let address = std::env::var(ADDRESS_VAR).ok();
        let seed = std::env::var(SEED_VAR).ok();
        let config =
            StreamerConfig::default().with_overrides(address.as_deref(), seed.as_deref())?;
        Streamer::new(config)
    }
}

pub struct Streamer<R = RngSource<StdRng>> {
    config: StreamerConfig,
    roster: Roster,
    random: R,
}

impl Streamer {
    pub fn new(config: StreamerConfig) -> Result<Self, StreamerError> {
        let random = RngSource::from_seed(config.seed);
        Self::with_random(config, random)
    }
}

impl<R: RandomSource> Streamer<R> {
    pub fn with_random(config: StreamerConfig, random: R) -> Result<Self, StreamerError> {
        config.validate()?;
        let roster = Roster::from_specs(&config.agents);
        Ok(Self {
            config,
            roster,
            random,
        })
    }

    pub fn config(&self) -> &StreamerConfig {
        &self.config
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Connects to the host and streams until `shutdown` resolves or something fails.
    ///
    /// There is exactly one connection attempt, and `shutdown` is honoured
    /// while it is in flight. Once connected the socket is closed on every way
    /// out of the loop.
    pub async fn run(&mut self, shutdown: impl Future<Output = ()>) -> Result<(), StreamerError> {
        tokio::pin!(shutdown);
        let outcome = self.connect_and_stream(&mut shutdown).await;
        info!("connection closed");
        outcome
    }

    async fn connect_and_stream(
        &mut self,
        shutdown: &mut (impl Future<Output = ()> + Unpin),
    ) -> Result<(), StreamerError> {
        let addr = self.config.host_address;
        info!(host = %addr, "connecting, press Ctrl+C to stop");

        let socket = tokio::select! {
            biased;
            _ = &mut *shutdown => {
                info!("shutdown requested before the host answered");
                return Ok(());
            }
            connected = TcpStream::connect(addr) => {
                connected.map_err(|source| StreamerError::Connect { addr, source })?
            }
        };
        info!(agents = self.roster.agents().len(), "connected, streaming positions");

        let (mut replies, mut sink) = wrap_stream(socket);
        let outcome = self.stream(&mut replies, &mut sink, shutdown).await;

        if let Err(err) = sink.close().await {
            debug!(error = %err, "socket was already gone while closing");
        }
        outcome
    }

    async fn stream(
        &mut self,
        replies: &mut ReplyStream,
        sink: &mut UpdateSink,
        shutdown: &mut (impl Future<Output = ()> + Unpin),
    ) -> Result<(), StreamerError> {
        loop {
            self.step(replies, sink).await?;

            // only the idle part of a tick is interruptible
            tokio::select! {
                _ = &mut *shutdown => {
                    info!("shutdown requested, stopping the stream");
                    return Ok(());
                }
                _ = sleep(self.config.tick_interval) => {}
            }
        }
    }

    /// One tick: walk, and if anything moved send everyone's position and
    /// give the host a short window to answer.
    async fn step(
        &mut self,
        replies: &mut ReplyStream,
        sink: &mut UpdateSink,
    ) -> Result<(), StreamerError> {
        let report = self.roster.tick(&mut self.random, &self.config.thresholds);
        if !report.any_movement() {
            return Ok(());
        }

        sink.send(self.roster.position_update())
            .await
            .map_err(StreamerError::Send)?;

        info!(moved = report.movements.len(), "movement detected");
        for movement in report.loggable(self.config.thresholds.log) {
            let pos = movement.to;
            info!("  {}: X={:.3}, Y={:.3}, Z={:.3}", movement.name, pos.x, pos.y, pos.z);
        }

        self.await_ack(replies).await
    }

    async fn await_ack(&self, replies: &mut ReplyStream) -> Result<(), StreamerError> {
        match timeout(self.config.ack_wait, replies.next()).await {
            // nothing yet, the reply (if any) is picked up after a later send
            Err(_elapsed) => Ok(()),
            Ok(None) => Err(StreamerError::HostClosed),
            Ok(Some(Ok(reply))) => {
                info!("host acknowledged the update");
                debug!(%reply, "acknowledgment payload");
                Ok(())
            }
            Ok(Some(Err(err)))
                if matches!(
                    err.kind(),
                    io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof
                ) =>
            {
                debug!(error = %err, "discarding unparsable reply");
                Ok(())
            }
            Ok(Some(Err(err))) => {
                warn!(error = %err, "reading the acknowledgment failed");
                Ok(())
            }
        }
    }
}
