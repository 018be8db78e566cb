use crate::config::{AgentSpec, Thresholds};
use crate::movement::{generate_movement, RandomSource};
use protocol::{AgentRecord, HostMessage, Position};

pub struct Agent {
    pub(crate) name: String,
    pub(crate) current_position: Position,
    pub(crate) last_reported: Position,
    pub(crate) speed: f64,
}

impl Agent {
    pub fn new(name: impl Into<String>, position: Position, speed: f64) -> Self {
        Self {
            name: name.into(),
            current_position: position,
            last_reported: position,
            speed,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Position {
        self.current_position
    }

    pub fn last_reported(&self) -> Position {
        self.last_reported
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// True when `candidate` is further than `threshold` from the last reported position.
    pub fn has_moved(&self, candidate: &Position, threshold: f64) -> bool {
        candidate.distance(&self.last_reported) > threshold
    }

    pub fn update_position(&mut self, new_position: Position) {
        self.current_position = new_position;
        self.last_reported = new_position;
    }

    fn record(&self) -> AgentRecord {
        AgentRecord {
            name: self.name.clone(),
            position: self.current_position,
        }
    }
}

impl From<&AgentSpec> for Agent {
    fn from(spec: &AgentSpec) -> Self {
        Agent::new(spec.name.clone(), spec.start, spec.speed)
    }
}

/// A committed move of one agent during a tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Movement {
    pub name: String,
    pub from: Position,
    pub to: Position,
}

impl Movement {
    pub fn distance(&self) -> f64 {
        self.from.distance(&self.to)
    }
}

#[derive(Debug, Default)]
pub struct TickReport {
    pub movements: Vec<Movement>,
}

impl TickReport {
    pub fn any_movement(&self) -> bool {
        !self.movements.is_empty()
    }

    /// The moves worth echoing to the operator.
    pub fn loggable(&self, log_threshold: f64) -> impl Iterator<Item = &Movement> + '_ {
        self.movements
            .iter()
            .filter(move |movement| movement.distance() > log_threshold)
    }
}

/// Every simulated agent, in the order they were configured.
pub struct Roster {
    agents: Vec<Agent>,
}

impl Roster {
    pub fn new(agents: Vec<Agent>) -> Self {
        Self { agents }
    }

    pub fn from_specs(specs: &[AgentSpec]) -> Self {
        Self::new(specs.iter().map(Agent::from).collect())
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn get(&self, name: &str) -> Option<&Agent> {
        self.agents.iter().find(|agent| agent.name == name)
    }

    /// Advances every agent by one step of the walk.
    ///
    /// A candidate is only committed when it is further than the movement
    /// threshold from the agent's last reported position; otherwise the agent
    /// stays where it is for this tick.
    pub fn tick(&mut self, random: &mut impl RandomSource, thresholds: &Thresholds) -> TickReport {
        let mut report = TickReport::default();
        for agent in self.agents.iter_mut() {
            let candidate = generate_movement(&agent.current_position, agent.speed, &mut *random);
            if agent.has_moved(&candidate, thresholds.movement) {
                let from = agent.current_position;
                agent.update_position(candidate);
                report.movements.push(Movement {
                    name: agent.name.clone(),
                    from,
                    to: candidate,
                });
            }
        }
        report
    }

    /// Current positions of all agents, moved or not.
    pub fn position_update(&self) -> HostMessage {
        HostMessage::position_update(self.agents.iter().map(Agent::record).collect())
    }
}
