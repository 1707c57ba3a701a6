//! Single-round-trip RPC transport over WebSocket.
//!
//! Each call opens one connection to `ws://<host:port>/nevv/<RequestType>`,
//! sends the encoded request as one binary frame, waits for exactly one
//! binary frame back and closes the connection. Nothing is pooled or reused.

use futures_util::{SinkExt, StreamExt};
use log::debug;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::Message;
use url::Url;

use crate::error::TransportError;
use crate::schema::{Fields, Schema};

/// Path prefix the voting nodes register their handlers under.
pub const APP_PREFIX: &str = "nevv";

/// Message-oriented transport to a single voting node.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Sends one encoded request and resolves with the raw bytes of the
    /// first (and only) inbound message, or a connection-level failure.
    async fn send(
        &self,
        address: &str,
        kind: &str,
        schema: &Schema,
        payload: &Fields,
    ) -> Result<Vec<u8>, TransportError>;
}

/// Stateless production transport. One WebSocket connection per call,
/// released on every exit path.
#[derive(Clone, Copy, Debug, Default)]
pub struct WsTransport;

impl Transport for WsTransport {
    async fn send(
        &self,
        address: &str,
        kind: &str,
        schema: &Schema,
        payload: &Fields,
    ) -> Result<Vec<u8>, TransportError> {
        let url = target(address, kind)?;
        let encoding = schema.encode(payload)?;

        debug!("sending {} to {}", kind, url);
        let (mut stream, _) = connect_async(url.as_str()).await.map_err(|e| {
            debug!("connecting to {} failed: {}", url, e);
            TransportError::Connect { url: url.clone() }
        })?;

        if let Err(e) = stream.send(Message::Binary(encoding)).await {
            debug!("sending to {} failed: {}", url, e);
            return Err(TransportError::Connect { url });
        }

        let outcome = loop {
            match stream.next().await {
                Some(Ok(Message::Binary(raw))) => break Ok(raw),
                Some(Ok(Message::Close(frame))) => break Err(close_error(&url, frame)),
                // Control frames are not part of the request/response contract.
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    debug!("receiving from {} failed: {}", url, e);
                    break Err(TransportError::Connect { url: url.clone() });
                }
                None => break Err(TransportError::ClosedWithoutResponse { url: url.clone() }),
            }
        };

        // Single-use connection, close regardless of the outcome.
        let _ = stream.close(None).await;
        outcome
    }
}

fn close_error(
    url: &str,
    frame: Option<tokio_tungstenite::tungstenite::protocol::CloseFrame<'_>>,
) -> TransportError {
    match frame {
        Some(frame) if frame.code != CloseCode::Normal || !frame.reason.is_empty() => {
            TransportError::UncleanClose {
                url: url.to_string(),
                reason: frame.reason.into_owned(),
            }
        }
        _ => TransportError::ClosedWithoutResponse {
            url: url.to_string(),
        },
    }
}

/// Builds the connection target for a request type. Node addresses may come
/// as `tcp://host:port` (roster descriptors), `ws://host:port` or a bare
/// `host:port` pair.
fn target(address: &str, kind: &str) -> Result<String, TransportError> {
    let host = extract_host(address)?;
    Ok(format!("ws://{}/{}/{}", host, APP_PREFIX, kind))
}

fn extract_host(address: &str) -> Result<String, TransportError> {
    let bad_address = || TransportError::BadAddress(address.to_string());

    let parsed = if address.contains("://") {
        Url::parse(address)
    } else {
        Url::parse(&format!("tcp://{}", address))
    }
    .map_err(|_| bad_address())?;

    let host = parsed.host_str().ok_or_else(bad_address)?;
    Ok(match parsed.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}
