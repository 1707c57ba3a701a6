//! Client-side driver for a mix-net based distributed e-voting protocol.
//!
//! An [`Election`] walks one election through its lifecycle — distributed
//! key generation, ballot casting, mix-net shuffling and result fetching —
//! by exchanging single-round-trip RPCs with a roster of voting nodes over
//! WebSocket.

pub mod configs;
pub mod crypto_schemes;
pub mod data;
pub mod election;
pub mod error;
pub mod schema;
pub mod transport;

pub use crate::crypto_schemes::Curve;
pub use crate::data::{Ballot, Node, Roster};
pub use crate::election::{Election, ElectionConfig, Stage};
pub use crate::error::{CryptoError, ElectionError, SchemaError, TransportError};
pub use crate::schema::{Fields, Schema, SchemaRegistry, Value};
pub use crate::transport::{Transport, WsTransport};
