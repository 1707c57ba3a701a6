//! Message field model and the lookup-by-name schema registry.
//!
//! Every request/response travelling between the client and a voting node is
//! a flat mapping of field names to [`Value`]s. A [`Schema`] knows which
//! fields a message type requires and turns a mapping into the binary frame
//! sent over the wire (and back).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// A single field value inside a protocol message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Text(String),
    Bytes(Vec<u8>),
    Uint(u64),
    List(Vec<Value>),
    Record(Fields),
}

pub type Fields = BTreeMap<String, Value>;

impl Value {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<u64> {
        match self {
            Value::Uint(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Fields> {
        match self {
            Value::Record(fields) => Some(fields),
            _ => None,
        }
    }
}

/// Schema of one message type: its name and the fields it must carry.
#[derive(Clone, Copy, Debug)]
pub struct Schema {
    name: &'static str,
    required: &'static [&'static str],
}

impl Schema {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Binary-encodes a constructed message, checking required fields first.
    pub fn encode(&self, fields: &Fields) -> Result<Vec<u8>, SchemaError> {
        self.check(fields)?;
        Ok(serde_json::to_vec(fields)?)
    }

    /// Decodes raw response bytes back into field values.
    pub fn decode(&self, raw: &[u8]) -> Result<Fields, SchemaError> {
        let fields: Fields = serde_json::from_slice(raw)?;
        self.check(&fields)?;
        Ok(fields)
    }

    fn check(&self, fields: &Fields) -> Result<(), SchemaError> {
        for field in self.required {
            if !fields.contains_key(*field) {
                return Err(SchemaError::MissingField {
                    message: self.name.to_string(),
                    field: field.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Extraction helpers shared by the election layer. Each one reports the
/// message name so a schema mismatch names the offending response type.
pub fn get_text<'a>(message: &str, fields: &'a Fields, field: &str) -> Result<&'a str, SchemaError> {
    get(message, fields, field)?
        .as_text()
        .ok_or_else(|| wrong_kind(message, field, "text"))
}

pub fn get_bytes<'a>(
    message: &str,
    fields: &'a Fields,
    field: &str,
) -> Result<&'a [u8], SchemaError> {
    get(message, fields, field)?
        .as_bytes()
        .ok_or_else(|| wrong_kind(message, field, "bytes"))
}

pub fn get_uint(message: &str, fields: &Fields, field: &str) -> Result<u64, SchemaError> {
    get(message, fields, field)?
        .as_uint()
        .ok_or_else(|| wrong_kind(message, field, "an unsigned integer"))
}

pub fn get_list<'a>(
    message: &str,
    fields: &'a Fields,
    field: &str,
) -> Result<&'a [Value], SchemaError> {
    get(message, fields, field)?
        .as_list()
        .ok_or_else(|| wrong_kind(message, field, "a list"))
}

pub fn get_record<'a>(
    message: &str,
    fields: &'a Fields,
    field: &str,
) -> Result<&'a Fields, SchemaError> {
    get(message, fields, field)?
        .as_record()
        .ok_or_else(|| wrong_kind(message, field, "a record"))
}

fn get<'a>(message: &str, fields: &'a Fields, field: &str) -> Result<&'a Value, SchemaError> {
    fields.get(field).ok_or_else(|| SchemaError::MissingField {
        message: message.to_string(),
        field: field.to_string(),
    })
}

fn wrong_kind(message: &str, field: &str, expected: &'static str) -> SchemaError {
    SchemaError::WrongKind {
        message: message.to_string(),
        field: field.to_string(),
        expected,
    }
}

const SCHEMAS: &[Schema] = &[
    Schema {
        name: "GenerateRequest",
        required: &["Name", "Roster"],
    },
    Schema {
        name: "GenerateResponse",
        required: &["Key", "Hash"],
    },
    Schema {
        name: "CastRequest",
        required: &["Election", "Ballot"],
    },
    Schema {
        name: "CastResponse",
        required: &[],
    },
    Schema {
        name: "ShuffleRequest",
        required: &["Election"],
    },
    Schema {
        name: "ShuffleResponse",
        required: &[],
    },
    Schema {
        name: "FetchRequest",
        required: &["Election", "Block"],
    },
    Schema {
        name: "FetchResponse",
        required: &["Ballots"],
    },
];

/// Registry of every message type the voting protocol knows about.
#[derive(Clone, Debug, Default)]
pub struct SchemaRegistry;

impl SchemaRegistry {
    pub fn new() -> Self {
        SchemaRegistry
    }

    pub fn lookup(&self, name: &str) -> Result<&'static Schema, SchemaError> {
        SCHEMAS
            .iter()
            .find(|schema| schema.name == name)
            .ok_or_else(|| SchemaError::UnknownType(name.to_string()))
    }
}
