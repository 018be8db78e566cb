use serde::{Deserialize, Serialize};

/// A point in the host's world space. `y` is up.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance between two positions.
    pub fn distance(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

impl From<[f64; 3]> for Position {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

/// One agent's entry in a position update.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct AgentRecord {
    pub name: String,
    pub position: Position,
}

// These are the messages the streamer sends to the host.
// The tag lands in a top level "type" field so the host can switch on it
// before looking at the payload.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostMessage {
    PositionUpdate { data: Vec<AgentRecord> },
}

impl HostMessage {
    pub fn position_update(data: Vec<AgentRecord>) -> Self {
        HostMessage::PositionUpdate { data }
    }

    pub fn records(&self) -> &[AgentRecord] {
        match self {
            HostMessage::PositionUpdate { data } => data,
        }
    }
}

/// Whatever the host writes back. No schema is enforced, only that it parses as json.
pub type HostReply = serde_json::Value;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> HostMessage {
        HostMessage::position_update(vec![
            AgentRecord {
                name: "agent1".to_string(),
                position: Position::new(0.05, 0.5, -0.05),
            },
            AgentRecord {
                name: "agent2".to_string(),
                position: Position::new(2.0, 0.5, 0.0),
            },
        ])
    }

    #[test]
    fn position_update_wire_shape() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "position_update",
                "data": [
                    {"name": "agent1", "position": {"x": 0.05, "y": 0.5, "z": -0.05}},
                    {"name": "agent2", "position": {"x": 2.0, "y": 0.5, "z": 0.0}}
                ]
            })
        );
    }

    #[test]
    fn decoding_the_payload_gives_back_the_message() {
        let bytes = serde_json::to_vec(&sample()).unwrap();
        let decoded: HostMessage = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(decoded, sample());
        assert_eq!(decoded.records().len(), 2);
    }

    #[test]
    fn unknown_message_type_is_rejected() {
        let raw = r#"{"type":"despawn","data":[]}"#;
        assert!(serde_json::from_str::<HostMessage>(raw).is_err());
    }

    #[test]
    fn distance_is_euclidean() {
        let a = Position::new(0.0, 0.5, 0.0);
        let b = Position::new(3.0, 0.5, 4.0);
        assert_eq!(a.distance(&b), 5.0);
        assert_eq!(b.distance(&a), 5.0);
        assert_eq!(a.distance(&a), 0.0);
    }
}
