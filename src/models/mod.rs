pub mod agents;
pub mod geometry;
pub mod obstacle;
pub mod trace_session;
pub mod track;

pub use agents::{parse_feed_message, AgentId, AgentSnapshot, AgentStore, AgentUpdate, FeedError};
pub use geometry::{Transform2D, TransformStack, Viewport};
pub use obstacle::{IdStamp, Obstacle, ObstacleId, ObstacleKind, ObstacleSet};
pub use trace_session::{TraceError, TracePath, TracePhase, TraceSession};
pub use track::{TrackKind, TrackShape};
