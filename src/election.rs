//! Election lifecycle state machine.
//!
//! One `Election` tracks a single election through key generation, ballot
//! casting, mix-net shuffling and result fetching. Every phase method builds
//! a request from the schema registry, delegates to the transport and folds
//! the decoded response into local state. Out-of-order calls are rejected
//! with [`ElectionError::InvalidState`] instead of leaking into a downstream
//! primitive.

use std::fmt;

use log::{debug, info};

use crate::crypto_schemes::Curve;
use crate::data::{Ballot, Roster};
use crate::error::{CryptoError, ElectionError, SchemaError};
use crate::schema::{self, Fields, SchemaRegistry, Value};
use crate::transport::Transport;

/// Lifecycle stage of an election, as observed by this client.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Created,
    KeyGenerated,
    Shuffled,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Created => "created",
            Stage::KeyGenerated => "key-generated",
            Stage::Shuffled => "shuffled",
        })
    }
}

/// Immutable identity of one election.
pub struct ElectionConfig<C> {
    pub name: String,
    pub roster: Roster,
    pub registry: SchemaRegistry,
    pub curve: C,
}

/// Client-side state of one election.
pub struct Election<C: Curve, T: Transport> {
    name: String,
    roster: Roster,
    registry: SchemaRegistry,
    curve: C,
    transport: T,
    contact: String,
    stage: Stage,
    key: Option<C::Point>,
    hash: Option<String>,
    ballots: Vec<Ballot>,
    shuffle_result: Vec<Ballot>,
}

impl<C: Curve, T: Transport> Election<C, T> {
    pub fn new(config: ElectionConfig<C>, transport: T) -> Result<Self, ElectionError> {
        let contact = config
            .roster
            .contact()
            .ok_or(ElectionError::EmptyRoster)?
            .address
            .clone();
        Ok(Election {
            name: config.name,
            roster: config.roster,
            registry: config.registry,
            curve: config.curve,
            transport,
            contact,
            stage: Stage::Created,
            key: None,
            hash: None,
            ballots: Vec::new(),
            shuffle_result: Vec::new(),
        })
    }

    /// Asks the roster to run distributed key generation. On success the
    /// election key and hash are set and casting becomes possible.
    pub async fn generate(&mut self) -> Result<(), ElectionError> {
        self.expect(Stage::Created, "generate")?;
        let request = self.registry.lookup("GenerateRequest")?;
        let response = self.registry.lookup("GenerateResponse")?;

        let mut data = Fields::new();
        data.insert("Name".to_string(), Value::Text(self.name.clone()));
        data.insert("Roster".to_string(), self.roster.to_value());

        let raw = self
            .transport
            .send(&self.contact, "GenerateRequest", request, &data)
            .await?;
        let decoded = response.decode(&raw)?;

        let key = schema::get_record(response.name(), &decoded, "Key")?;
        // Coordinates are transmitted in reversed byte order; restore the
        // canonical order before handing them to the curve.
        let mut x = schema::get_bytes(response.name(), key, "X")?.to_vec();
        let mut y = schema::get_bytes(response.name(), key, "Y")?.to_vec();
        x.reverse();
        y.reverse();
        let point = self.curve.point(&x, &y)?;
        let hash = hex::encode(schema::get_bytes(response.name(), &decoded, "Hash")?);

        self.key = Some(point);
        self.hash = Some(hash);
        self.stage = Stage::KeyGenerated;
        info!("election {}: key generated", self.name);
        Ok(())
    }

    /// Encrypts `vote` under the election key and casts the resulting
    /// ballot. The locally produced ballot is appended on success; the
    /// response body is trusted, not re-validated.
    pub async fn cast(&mut self, vote: &[u8]) -> Result<(), ElectionError> {
        self.expect(Stage::KeyGenerated, "cast")?;
        let request = self.registry.lookup("CastRequest")?;
        let key = self.key.as_ref().ok_or(CryptoError::MissingPublicKey)?;
        let ballot = self.curve.encrypt(key, vote)?;

        let mut data = Fields::new();
        data.insert("Election".to_string(), Value::Text(self.name.clone()));
        data.insert("Ballot".to_string(), Value::Bytes(ballot.0.clone()));

        self.transport
            .send(&self.contact, "CastRequest", request, &data)
            .await?;
        self.ballots.push(ballot);
        debug!(
            "election {}: ballot {} cast",
            self.name,
            self.ballots.len()
        );
        Ok(())
    }

    /// Asks the roster to mix the cast ballots. Idempotent: repeating the
    /// call after a successful shuffle reports success again.
    pub async fn shuffle(&mut self) -> Result<(), ElectionError> {
        if self.stage == Stage::Created {
            return Err(ElectionError::InvalidState {
                operation: "shuffle",
                stage: self.stage,
            });
        }
        let request = self.registry.lookup("ShuffleRequest")?;

        let mut data = Fields::new();
        data.insert("Election".to_string(), Value::Text(self.name.clone()));

        self.transport
            .send(&self.contact, "ShuffleRequest", request, &data)
            .await?;
        self.stage = Stage::Shuffled;
        info!("election {}: ballots shuffled", self.name);
        Ok(())
    }

    /// Fetches the shuffle result attributed to the node at `node_address`,
    /// replacing any previously fetched result. The block selector
    /// `ballots cast locally + roster position + 1` is a fixed wire-contract
    /// convention and must be mirrored exactly.
    pub async fn fetch(&mut self, node_address: &str) -> Result<&[Ballot], ElectionError> {
        self.expect(Stage::Shuffled, "fetch")?;
        let position = self
            .roster
            .position(node_address)
            .ok_or_else(|| ElectionError::UnknownNode(node_address.to_string()))?;
        let request = self.registry.lookup("FetchRequest")?;
        let response = self.registry.lookup("FetchResponse")?;

        let block = (self.ballots.len() + position + 1) as u64;
        let mut data = Fields::new();
        data.insert("Election".to_string(), Value::Text(self.name.clone()));
        data.insert("Block".to_string(), Value::Uint(block));

        let raw = self
            .transport
            .send(&self.contact, "FetchRequest", request, &data)
            .await?;
        let decoded = response.decode(&raw)?;

        let list = schema::get_list(response.name(), &decoded, "Ballots")?;
        let mut ballots = Vec::with_capacity(list.len());
        for entry in list {
            let bytes = entry.as_bytes().ok_or_else(|| SchemaError::WrongKind {
                message: response.name().to_string(),
                field: "Ballots".to_string(),
                expected: "a list of bytes",
            })?;
            ballots.push(Ballot(bytes.to_vec()));
        }

        self.shuffle_result = ballots;
        debug!(
            "election {}: fetched block {} with {} ballots",
            self.name,
            block,
            self.shuffle_result.len()
        );
        Ok(&self.shuffle_result)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn key(&self) -> Option<&C::Point> {
        self.key.as_ref()
    }

    /// Hex-encoded election hash, set together with the key.
    pub fn hash(&self) -> Option<&str> {
        self.hash.as_deref()
    }

    /// Ballots cast by this client, in call order.
    pub fn ballots(&self) -> &[Ballot] {
        &self.ballots
    }

    /// Result of the most recent successful fetch.
    pub fn shuffle_result(&self) -> &[Ballot] {
        &self.shuffle_result
    }

    pub fn is_shuffled(&self) -> bool {
        self.stage == Stage::Shuffled
    }

    fn expect(&self, stage: Stage, operation: &'static str) -> Result<(), ElectionError> {
        if self.stage == stage {
            Ok(())
        } else {
            Err(ElectionError::InvalidState {
                operation,
                stage: self.stage,
            })
        }
    }
}
