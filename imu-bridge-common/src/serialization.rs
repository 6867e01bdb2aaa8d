use serde::{Serialize, de::DeserializeOwned};

use crate::error::{Error, Result};

/// Encode a value as a JSON text frame payload.
///
/// rosbridge expects one JSON object per WebSocket text frame.
pub fn encode<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Error::from)
}

/// Decode a JSON text frame payload.
pub fn decode<T: DeserializeOwned>(text: &str) -> Result<T> {
    serde_json::from_str(text).map_err(Error::from)
}

/// Read the `op` field of a frame without decoding the rest.
pub fn peek_op(text: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(text).ok()?;
    value.get("op")?.as_str().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{Op, TopicMessage, Vector3};

    #[test]
    fn test_encode_publish() {
        let mut msg = TopicMessage::publish("MPU_accel", "/MPU6050/Accel");
        msg.set(Vector3::new(0.0, 0.0, 1.0));

        let text = encode(&msg).unwrap();
        assert!(text.contains(r#""op":"publish""#));
        assert!(text.contains(r#""topic":"/MPU6050/Accel""#));

        let decoded: TopicMessage = decode(&text).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_decode_rejects_wrong_op() {
        let text = r#"{"op":"subscribe","id":"a","topic":"/t","msg":{"x":0,"y":0,"z":0}}"#;
        assert!(decode::<TopicMessage>(text).is_err());
    }

    #[test]
    fn test_peek_op() {
        assert_eq!(
            peek_op(r#"{"op":"advertise","topic":"/x"}"#).as_deref(),
            Some(Op::Advertise.as_str())
        );
        assert_eq!(peek_op(r#"{"topic":"/x"}"#), None);
        assert_eq!(peek_op("not json"), None);
    }
}
