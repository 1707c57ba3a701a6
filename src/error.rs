use thiserror::Error;

use crate::election::Stage;

/// Connection-level failures of the single-round-trip RPC transport.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("could not connect to {url}")]
    Connect { url: String },

    #[error("connection to {url} closed: {reason}")]
    UncleanClose { url: String, reason: String },

    #[error("connection to {url} closed before a response arrived")]
    ClosedWithoutResponse { url: String },

    #[error("invalid node address: {0}")]
    BadAddress(String),

    #[error("failed to encode request: {0}")]
    Encode(#[from] SchemaError),
}

/// Failures of the lookup-by-name message schema registry.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("unknown message type: {0}")]
    UnknownType(String),

    #[error("{message} is missing required field {field}")]
    MissingField { message: String, field: String },

    #[error("{message} field {field} is not {expected}")]
    WrongKind {
        message: String,
        field: String,
        expected: &'static str,
    },

    #[error("malformed message encoding: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("malformed point encoding")]
    MalformedPoint,

    #[error("point coordinates do not lie on the curve")]
    NotOnCurve,

    #[error("no public key available for encryption")]
    MissingPublicKey,

    #[error("operation produced the point at infinity")]
    InfinitePoint,
}

/// Everything an election lifecycle operation can surface to its caller.
#[derive(Debug, Error)]
pub enum ElectionError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("failed to decode response: {0}")]
    Decode(#[from] SchemaError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error("{0} not part of roster")]
    UnknownNode(String),

    #[error("{operation} is not allowed while the election is {stage}")]
    InvalidState {
        operation: &'static str,
        stage: Stage,
    },

    #[error("roster must contain at least one node")]
    EmptyRoster,
}
