//! rosbridge v2 protocol messages.
//!
//! Only the two operations a publishing client needs are modelled:
//! `advertise` and `publish`.

use serde::{Deserialize, Serialize};

/// ROS message type of a three-component vector.
pub const VECTOR3_TYPE: &str = "geometry_msgs/Vector3";

/// rosbridge operation tag (the `op` field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Op {
    Advertise,
    Publish,
}

impl Op {
    /// Wire name of the operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Op::Advertise => "advertise",
            Op::Publish => "publish",
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// `geometry_msgs/Vector3` payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl From<[f64; 3]> for Vector3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

/// Declares a topic and its message type to the bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advertisement {
    pub op: Op,
    pub id: String,
    pub topic: String,
    #[serde(rename = "type")]
    pub msg_type: String,
}

impl Advertisement {
    pub fn new(
        id: impl Into<String>,
        topic: impl Into<String>,
        msg_type: impl Into<String>,
    ) -> Self {
        Self {
            op: Op::Advertise,
            id: id.into(),
            topic: topic.into(),
            msg_type: msg_type.into(),
        }
    }
}

/// A `publish` operation carrying a [`Vector3`].
///
/// Instances are meant to be built once per topic and have their `msg`
/// overwritten on every cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicMessage {
    pub op: Op,
    pub id: String,
    pub topic: String,
    pub msg: Vector3,
}

impl TopicMessage {
    /// Create a publish message with a zeroed payload.
    pub fn publish(id: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            op: Op::Publish,
            id: id.into(),
            topic: topic.into(),
            msg: Vector3::default(),
        }
    }

    /// Overwrite the payload in place.
    pub fn set(&mut self, value: Vector3) {
        self.msg = value;
    }
}
