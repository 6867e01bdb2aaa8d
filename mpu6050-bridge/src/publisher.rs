//! rosbridge publisher client.

use std::fmt::Display;

use futures_util::{Sink, SinkExt};
use imu_bridge_common::{
    Advertisement, RosbridgeConfig, TopicMessage, VECTOR3_TYPE, WsStream, encode,
};
use serde::Serialize;
use thiserror::Error;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, trace, warn};

/// Error type for publishing operations.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Connection to {url} failed: {message}")]
    Connection { url: String, message: String },
    #[error("Send failed: {0}")]
    Send(String),
    #[error("Serialization failed: {0}")]
    Serialization(String),
    #[error("Topic '{0}' has not been advertised")]
    NotAdvertised(String),
}

/// Identifiers and type of one published topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopicSpec {
    /// `id` of the advertise operation
    pub advertise_id: &'static str,
    /// `id` of every publish operation
    pub publish_id: &'static str,
    pub topic: &'static str,
    pub msg_type: &'static str,
}

impl TopicSpec {
    pub fn advertisement(&self) -> Advertisement {
        Advertisement::new(self.advertise_id, self.topic, self.msg_type)
    }

    /// A zeroed publish message for this topic.
    pub fn message(&self) -> TopicMessage {
        TopicMessage::publish(self.publish_id, self.topic)
    }
}

/// Accelerometer topic.
pub const ACCEL_TOPIC: TopicSpec = TopicSpec {
    advertise_id: "IMU_WS_AC",
    publish_id: "MPU_accel",
    topic: "/MPU6050/Accel",
    msg_type: VECTOR3_TYPE,
};

/// Gyroscope topic.
pub const GYRO_TOPIC: TopicSpec = TopicSpec {
    advertise_id: "IMU_WS_GY",
    publish_id: "MPU_gyro",
    topic: "/MPU6050/Gyro",
    msg_type: VECTOR3_TYPE,
};

/// Publisher for sending messages to rosbridge.
///
/// Generic over the frame sink so it can run on a live WebSocket or on an
/// in-memory sink. A topic must be advertised before anything is published
/// on it.
#[derive(Debug)]
pub struct RosbridgePublisher<S> {
    sink: S,
    advertised: Vec<Advertisement>,
    sent: u64,
}

impl RosbridgePublisher<WsStream> {
    /// Open the session to rosbridge. There is no retry.
    pub async fn connect(config: &RosbridgeConfig) -> Result<Self, PublishError> {
        let stream = imu_bridge_common::connect(config)
            .await
            .map_err(|e| match e {
                imu_bridge_common::Error::Connection { url, message } => {
                    PublishError::Connection { url, message }
                }
                other => PublishError::Connection {
                    url: config.url(),
                    message: other.to_string(),
                },
            })?;

        Ok(Self::new(stream))
    }
}

impl<S> RosbridgePublisher<S>
where
    S: Sink<Message> + Unpin,
    S::Error: Display,
{
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            advertised: Vec::new(),
            sent: 0,
        }
    }

    /// Advertise a topic. Advertising the same topic twice is a no-op.
    pub async fn advertise(&mut self, spec: &TopicSpec) -> Result<(), PublishError> {
        if self.is_advertised(spec.topic) {
            debug!(topic = spec.topic, "Topic already advertised");
            return Ok(());
        }

        let advertisement = spec.advertisement();
        self.send_frame(&advertisement).await?;

        info!(
            topic = spec.topic,
            id = spec.advertise_id,
            msg_type = spec.msg_type,
            "Advertised topic"
        );
        self.advertised.push(advertisement);
        Ok(())
    }

    /// Publish a message on an advertised topic.
    pub async fn send(&mut self, message: &TopicMessage) -> Result<(), PublishError> {
        if !self.is_advertised(&message.topic) {
            return Err(PublishError::NotAdvertised(message.topic.clone()));
        }

        self.send_frame(message).await?;
        self.sent += 1;

        trace!(topic = %message.topic, msg = ?message.msg, "Published");
        Ok(())
    }

    /// Whether `topic` has been advertised on this session.
    pub fn is_advertised(&self, topic: &str) -> bool {
        self.advertised.iter().any(|a| a.topic == topic)
    }

    /// Number of publish messages sent so far.
    pub fn sent(&self) -> u64 {
        self.sent
    }

    /// Close the session without sending any further operation frames.
    ///
    /// Failures are logged; the session is going away either way.
    pub async fn close(mut self) {
        if let Err(e) = self.sink.close().await {
            warn!(error = %e, "Error closing rosbridge session");
        }
        debug!(sent = self.sent, "rosbridge session closed");
    }

    /// Release the underlying sink without closing it, e.g. to inspect the
    /// frames an in-memory sink collected.
    pub fn into_inner(self) -> S {
        self.sink
    }

    async fn send_frame<T: Serialize>(&mut self, value: &T) -> Result<(), PublishError> {
        let text = encode(value).map_err(|e| PublishError::Serialization(e.to_string()))?;
        self.sink
            .send(Message::Text(text.into()))
            .await
            .map_err(|e| PublishError::Send(e.to_string()))
    }
}
