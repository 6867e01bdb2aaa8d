//! Integration tests for imu-bridge-common library.

use futures_util::{SinkExt, StreamExt};
use imu_bridge_common::{
    Advertisement, Op, RosbridgeConfig, TopicMessage, VECTOR3_TYPE, Vector3, connect, decode,
    encode, parse_config, peek_op,
};
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio_tungstenite::{accept_async, tungstenite::Message};

#[test]
fn test_full_message_workflow() {
    let adv = Advertisement::new("IMU_WS_AC", "/MPU6050/Accel", VECTOR3_TYPE);
    let mut msg = TopicMessage::publish("MPU_accel", "/MPU6050/Accel");

    msg.set(Vector3::new(0.01, -0.02, 1.0));
    let first = encode(&msg).expect("encode failed");
    msg.set(Vector3::new(0.5, 0.5, 0.5));
    let second = encode(&msg).expect("encode failed");

    assert_eq!(peek_op(&encode(&adv).unwrap()).as_deref(), Some("advertise"));

    let decoded: TopicMessage = decode(&first).expect("decode failed");
    assert_eq!(decoded.msg, Vector3::new(0.01, -0.02, 1.0));
    assert_eq!(decoded.topic, adv.topic);

    let decoded: TopicMessage = decode(&second).expect("decode failed");
    assert_eq!(decoded.msg, Vector3::new(0.5, 0.5, 0.5));
    assert_eq!(decoded.op, Op::Publish);
}

#[test]
fn test_nested_bridge_config() {
    #[derive(Deserialize)]
    struct Outer {
        bridge: RosbridgeConfig,
    }

    let outer: Outer = parse_config(r#"{ bridge: { host: "10.0.0.5" } }"#).unwrap();
    assert_eq!(outer.bridge.url(), "ws://10.0.0.5:9090");
}

#[tokio::test]
async fn test_connect_and_send_frames() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        let mut frames = Vec::new();
        while let Some(Ok(frame)) = ws.next().await {
            match frame {
                Message::Text(text) => frames.push(text.as_str().to_string()),
                Message::Close(_) => break,
                _ => {}
            }
        }
        frames
    });

    let config = RosbridgeConfig {
        host: "127.0.0.1".to_string(),
        port,
    };
    let mut ws = connect(&config).await.expect("connect failed");

    let adv = Advertisement::new("IMU_WS_GY", "/MPU6050/Gyro", VECTOR3_TYPE);
    ws.send(Message::Text(encode(&adv).unwrap().into()))
        .await
        .unwrap();
    ws.close(None).await.unwrap();

    let frames = server.await.unwrap();
    assert_eq!(frames.len(), 1);
    let received: Advertisement = decode(&frames[0]).unwrap();
    assert_eq!(received, adv);
}
