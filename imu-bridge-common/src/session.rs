use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use crate::config::RosbridgeConfig;
use crate::error::{Error, Result};

/// WebSocket stream to a rosbridge server.
pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Open a WebSocket session to rosbridge using the provided configuration.
pub async fn connect(config: &RosbridgeConfig) -> Result<WsStream> {
    if config.host.is_empty() {
        return Err(Error::Config("rosbridge host must not be empty".to_string()));
    }

    let url = config.url();

    tracing::info!(url = %url, "Connecting to rosbridge");

    let (stream, response) = tokio_tungstenite::connect_async(url.as_str())
        .await
        .map_err(|e| Error::Connection {
            url: url.clone(),
            message: e.to_string(),
        })?;

    tracing::info!(url = %url, status = %response.status(), "Connected to rosbridge");

    Ok(stream)
}
