use crate::error::StreamerError;
use protocol::Position;
use std::collections::HashSet;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;

pub const DEFAULT_HOST_ADDRESS: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 5500));
pub const DEFAULT_MOVEMENT_THRESHOLD: f64 = 0.01;
pub const DEFAULT_LOG_THRESHOLD: f64 = 0.005;
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);
pub const DEFAULT_ACK_WAIT: Duration = Duration::from_millis(50);

pub const ADDRESS_VAR: &str = "STREAMER_ADDRESS";
pub const SEED_VAR: &str = "STREAMER_SEED";

/// Starting state of one agent.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentSpec {
    pub name: String,
    pub start: Position,
    pub speed: f64,
}

impl AgentSpec {
    pub fn new(name: impl Into<String>, start: impl Into<Position>, speed: f64) -> Self {
        Self {
            name: name.into(),
            start: start.into(),
            speed,
        }
    }
}

/// Distances a step must exceed to count.
///
/// `movement` gates whether a step is committed and sent to the host,
/// `log` whether a committed step is echoed to the operator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub movement: f64,
    pub log: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            movement: DEFAULT_MOVEMENT_THRESHOLD,
            log: DEFAULT_LOG_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StreamerConfig {
    pub host_address: SocketAddr,
    pub agents: Vec<AgentSpec>,
    pub thresholds: Thresholds,
    pub tick_interval: Duration,
    pub ack_wait: Duration,
    /// Fixed seed for the random walk. `None` seeds from the OS.
    pub seed: Option<u64>,
}

pub fn default_agents() -> Vec<AgentSpec> {
    vec![
        AgentSpec::new("agent1", [0.0, 0.5, 0.0], 0.1),
        AgentSpec::new("agent2", [2.0, 0.5, 0.0], 0.15),
        AgentSpec::new("agent3", [-2.0, 0.5, 0.0], 0.12),
    ]
}

impl Default for StreamerConfig {
    fn default() -> Self {
        Self {
            host_address: DEFAULT_HOST_ADDRESS,
            agents: default_agents(),
            thresholds: Thresholds::default(),
            tick_interval: DEFAULT_TICK_INTERVAL,
            ack_wait: DEFAULT_ACK_WAIT,
            seed: None,
        }
    }
}

impl StreamerConfig {
    /// Applies overrides on top of the defaults. Unset keys keep the default.
    pub fn with_overrides(
        mut self,
        address: Option<&str>,
        seed: Option<&str>,
    ) -> Result<Self, StreamerError> {
        if let Some(address) = address {
            self.host_address = address
                .parse()
                .map_err(|_err| StreamerError::invalid_setting(ADDRESS_VAR, address))?;
        }
        if let Some(seed) = seed {
            self.seed = Some(
                seed.parse()
                    .map_err(|_err| StreamerError::invalid_setting(SEED_VAR, seed))?,
            );
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), StreamerError> {
        if self.agents.is_empty() {
            return Err(StreamerError::InvalidConfig("no agents configured".into()));
        }
        let mut seen = HashSet::new();
        for agent in &self.agents {
            if !seen.insert(agent.name.as_str()) {
                return Err(StreamerError::InvalidConfig(format!(
                    "agent {} is configured twice",
                    agent.name
                )));
            }
            if !agent.speed.is_finite() || agent.speed < 0.0 {
                return Err(StreamerError::InvalidConfig(format!(
                    "agent {} has an invalid speed {}",
                    agent.name, agent.speed
                )));
            }
        }
        let Thresholds { movement, log } = self.thresholds;
        if !(movement.is_finite() && movement >= 0.0 && log.is_finite() && log >= 0.0) {
            return Err(StreamerError::InvalidConfig(format!(
                "thresholds must be finite and non-negative (movement {movement}, log {log})"
            )));
        }
        if self.tick_interval.is_zero() {
            return Err(StreamerError::InvalidConfig("tick interval must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_constants() {
        let config = StreamerConfig::default();
        assert_eq!(config.host_address, "127.0.0.1:5500".parse().unwrap());
        assert_eq!(config.agents.len(), 3);
        assert_eq!(config.agents[1], AgentSpec::new("agent2", [2.0, 0.5, 0.0], 0.15));
        assert_eq!(config.thresholds.movement, 0.01);
        assert_eq!(config.thresholds.log, 0.005);
        assert_eq!(config.tick_interval, Duration::from_millis(100));
        assert_eq!(config.ack_wait, Duration::from_millis(50));
        assert!(config.seed.is_none());
        config.validate().unwrap();
    }

    #[test]
    fn overrides_replace_address_and_seed() {
        let config = StreamerConfig::default()
            .with_overrides(Some("10.0.0.2:6000"), Some("99"))
            .unwrap();
        assert_eq!(config.host_address, "10.0.0.2:6000".parse().unwrap());
        assert_eq!(config.seed, Some(99));
    }

    #[test]
    fn bad_overrides_name_the_variable() {
        let err = StreamerConfig::default()
            .with_overrides(Some("localhost"), None)
            .unwrap_err();
        assert!(err.to_string().contains(ADDRESS_VAR));

        let err = StreamerConfig::default()
            .with_overrides(None, Some("-1"))
            .unwrap_err();
        assert!(err.to_string().contains(SEED_VAR));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut config = StreamerConfig::default();
        config.agents.push(AgentSpec::new("agent1", [9.0, 0.5, 9.0], 0.1));
        assert!(matches!(config.validate(), Err(StreamerError::InvalidConfig(_))));
    }

    #[test]
    fn negative_speed_and_empty_roster_are_rejected() {
        let mut config = StreamerConfig::default();
        config.agents[0].speed = -0.1;
        assert!(config.validate().is_err());

        let config = StreamerConfig {
            agents: Vec::new(),
            ..StreamerConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
