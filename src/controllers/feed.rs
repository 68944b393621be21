// src/controllers/feed.rs
// Live feed controller. Agent updates arrive as JSON strings on the /feed
// OSC address; each frame drains the socket into one batch.

use nannou_osc as osc;
use std::error::Error;

use crate::models::{parse_feed_message, AgentUpdate, FeedError};

pub const FEED_ADDRESS: &str = "/feed";

pub struct FeedController {
    receiver: osc::Receiver,
    dropped: usize,
}

impl FeedController {
    pub fn new(port: u16) -> Result<Self, Box<dyn Error>> {
        let receiver = osc::receiver(port)?;
        log::info!("Listening for feed messages on port {}", port);

        Ok(Self {
            receiver,
            dropped: 0,
        })
    }

    /// Drains everything that arrived since the last frame. Bad messages are
    /// logged and skipped.
    pub fn poll(&mut self) -> Vec<AgentUpdate> {
        let mut batch = Vec::new();
        for (packet, _addr) in self.receiver.try_iter() {
            for message in packet.into_msgs() {
                match decode_message(&message) {
                    Ok(updates) => batch.extend(updates),
                    Err(e) => {
                        self.dropped += 1;
                        log::warn!("Dropping feed message: {}", e);
                    }
                }
            }
        }
        batch
    }

    /// Messages rejected since startup.
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

pub fn decode_message(message: &osc::Message) -> Result<Vec<AgentUpdate>, FeedError> {
    if message.addr != FEED_ADDRESS {
        return Err(FeedError::Address(message.addr.clone()));
    }
    match message.args.as_slice() {
        [osc::Type::String(json)] => parse_feed_message(json),
        _ => Err(FeedError::Payload),
    }
}
