// src/models/agents.rs
// Agents reported by the live feed and the store that holds their latest state.

use nannou::prelude::*;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("malformed feed message: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unexpected OSC address {0}")]
    Address(String),
    #[error("feed message carries no string payload")]
    Payload,
}

/// Feed producers use either numeric or string ids.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(untagged)]
pub enum AgentId {
    Number(i64),
    Text(String),
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentId::Number(n) => write!(f, "{}", n),
            AgentId::Text(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct FeedPosition {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AgentUpdate {
    pub id: AgentId,
    pub position: FeedPosition,
    #[serde(default)]
    pub direction: f32,
    #[serde(default)]
    pub speed: f32,
    #[serde(default)]
    pub lap: u32,
    #[serde(default = "default_fuel")]
    pub fuel: f32,
    #[serde(default = "default_state")]
    pub state: String,
}

fn default_fuel() -> f32 {
    100.0
}

fn default_state() -> String {
    "running".to_string()
}

impl AgentUpdate {
    pub fn position(&self) -> Point2 {
        pt2(self.position.x, self.position.y)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FeedMessage {
    Batch { agents: Vec<AgentUpdate> },
    Single(AgentUpdate),
}

/// Parses one feed payload: `{"agents": [...]}` or a single agent object.
pub fn parse_feed_message(json: &str) -> Result<Vec<AgentUpdate>, FeedError> {
    // The untagged enum hides the real cause, so retry as a single agent to
    // surface a useful error.
    match serde_json::from_str::<FeedMessage>(json) {
        Ok(FeedMessage::Batch { agents }) => Ok(agents),
        Ok(FeedMessage::Single(agent)) => Ok(vec![agent]),
        Err(_) => {
            let agent: AgentUpdate = serde_json::from_str(json)?;
            Ok(vec![agent])
        }
    }
}

pub type AgentSnapshot = Arc<BTreeMap<AgentId, AgentUpdate>>;

/// Latest state per agent. Updates land a frame at a time and publish a new
/// snapshot; readers keep whatever snapshot they already hold.
#[derive(Debug, Clone, Default)]
pub struct AgentStore {
    snapshot: AgentSnapshot,
}

impl AgentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> AgentSnapshot {
        Arc::clone(&self.snapshot)
    }

    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }

    pub fn get(&self, id: &AgentId) -> Option<&AgentUpdate> {
        self.snapshot.get(id)
    }

    /// Applies a frame's worth of updates. An empty batch keeps the current
    /// snapshot.
    pub fn apply_batch(&mut self, updates: Vec<AgentUpdate>) {
        if updates.is_empty() {
            return;
        }
        let mut next = self.snapshot.as_ref().clone();
        for update in updates {
            next.insert(update.id.clone(), update);
        }
        self.snapshot = Arc::new(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_agent_with_defaults() {
        let updates = parse_feed_message(r#"{"id": 7, "position": {"x": 1.5, "y": -2}}"#).unwrap();
        assert_eq!(updates.len(), 1);
        let agent = &updates[0];
        assert_eq!(agent.id, AgentId::Number(7));
        assert_eq!(agent.position(), pt2(1.5, -2.0));
        assert_eq!(agent.direction, 0.0);
        assert_eq!(agent.speed, 0.0);
        assert_eq!(agent.lap, 0);
        assert_eq!(agent.fuel, 100.0);
        assert_eq!(agent.state, "running");
    }

    #[test]
    fn test_batch_message() {
        let json = r#"{"agents": [
            {"id": "car-a", "position": {"x": 0, "y": 0}, "speed": 12.5, "lap": 2},
            {"id": "car-b", "position": {"x": 10, "y": 5}, "state": "pit"}
        ]}"#;
        let updates = parse_feed_message(json).unwrap();
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].id, AgentId::Text("car-a".into()));
        assert_eq!(updates[0].lap, 2);
        assert_eq!(updates[1].state, "pit");
    }

    #[test]
    fn test_malformed_messages_rejected() {
        assert!(parse_feed_message("not json").is_err());
        assert!(parse_feed_message(r#"{"position": {"x": 0, "y": 0}}"#).is_err());
        assert!(parse_feed_message(r#"{"id": 1}"#).is_err());
    }

    #[test]
    fn test_batch_replaces_by_id() {
        let mut store = AgentStore::new();
        store.apply_batch(parse_feed_message(r#"{"id": 1, "position": {"x": 0, "y": 0}}"#).unwrap());
        let held = store.snapshot();

        store.apply_batch(
            parse_feed_message(
                r#"{"agents": [{"id": 1, "position": {"x": 5, "y": 5}}, {"id": 2, "position": {"x": 1, "y": 1}}]}"#,
            )
            .unwrap(),
        );
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(&AgentId::Number(1)).unwrap().position(), pt2(5.0, 5.0));
        // a reader's snapshot is not touched by later batches
        assert_eq!(held.len(), 1);
        assert_eq!(held[&AgentId::Number(1)].position(), pt2(0.0, 0.0));
    }

    #[test]
    fn test_empty_batch_keeps_snapshot() {
        let mut store = AgentStore::new();
        let before = store.snapshot();
        store.apply_batch(Vec::new());
        assert!(Arc::ptr_eq(&before, &store.snapshot()));
    }
}
