//! Request model for the document data service.
//!
//! A request is one of five operations against a named, versioned entity,
//! carrying a JSON body (a document to write or a query to run). Requests
//! are constructed fresh per invocation and immutable after construction.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// The set of operations the data service supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Insert,
    Find,
    Update,
    Save,
    Delete,
}

/// Error returned when parsing an operation name that the service
/// does not support.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown operation '{0}': expected one of insert, find, update, save, delete")]
pub struct UnknownOperation(pub String);

impl Operation {
    /// All supported operations, in declaration order.
    pub const ALL: [Operation; 5] = [
        Operation::Insert,
        Operation::Find,
        Operation::Update,
        Operation::Save,
        Operation::Delete,
    ];

    /// The lower-case wire name of this operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Insert => "insert",
            Operation::Find => "find",
            Operation::Update => "update",
            Operation::Save => "save",
            Operation::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "insert" => Ok(Operation::Insert),
            "find" => Ok(Operation::Find),
            "update" => Ok(Operation::Update),
            "save" => Ok(Operation::Save),
            "delete" => Ok(Operation::Delete),
            other => Err(UnknownOperation(other.to_string())),
        }
    }
}

/// Reference to a named entity, optionally pinned to a schema version.
///
/// An empty or whitespace-only version normalizes to `None`, so a request
/// built from an empty version carries no version at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    /// Entity (schema/collection) name.
    pub name: String,
    /// Entity schema version, if pinned.
    pub version: Option<String>,
}

impl EntityRef {
    /// Create a reference to `name` at `version`. An empty version means
    /// "latest" and is stored as `None`.
    pub fn new(name: &str, version: &str) -> Self {
        let version = version.trim();
        Self {
            name: name.to_string(),
            version: if version.is_empty() {
                None
            } else {
                Some(version.to_string())
            },
        }
    }

    /// Create an unversioned reference to `name`.
    pub fn unversioned(name: &str) -> Self {
        Self {
            name: name.to_string(),
            version: None,
        }
    }
}

/// A single request against the data service.
///
/// Each variant corresponds to one supported operation and carries the
/// target entity and the JSON body (document set or query).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "lowercase")]
pub enum DataRequest {
    Insert { entity: EntityRef, body: Value },
    Find { entity: EntityRef, body: Value },
    Update { entity: EntityRef, body: Value },
    Save { entity: EntityRef, body: Value },
    Delete { entity: EntityRef, body: Value },
}

impl DataRequest {
    /// Build the request variant matching `operation`.
    pub fn new(operation: Operation, entity: EntityRef, body: Value) -> Self {
        match operation {
            Operation::Insert => DataRequest::Insert { entity, body },
            Operation::Find => DataRequest::Find { entity, body },
            Operation::Update => DataRequest::Update { entity, body },
            Operation::Save => DataRequest::Save { entity, body },
            Operation::Delete => DataRequest::Delete { entity, body },
        }
    }

    pub fn insert(entity: EntityRef, body: Value) -> Self {
        DataRequest::Insert { entity, body }
    }

    pub fn find(entity: EntityRef, body: Value) -> Self {
        DataRequest::Find { entity, body }
    }

    pub fn update(entity: EntityRef, body: Value) -> Self {
        DataRequest::Update { entity, body }
    }

    pub fn save(entity: EntityRef, body: Value) -> Self {
        DataRequest::Save { entity, body }
    }

    pub fn delete(entity: EntityRef, body: Value) -> Self {
        DataRequest::Delete { entity, body }
    }

    /// The operation this request performs.
    pub fn operation(&self) -> Operation {
        match self {
            DataRequest::Insert { .. } => Operation::Insert,
            DataRequest::Find { .. } => Operation::Find,
            DataRequest::Update { .. } => Operation::Update,
            DataRequest::Save { .. } => Operation::Save,
            DataRequest::Delete { .. } => Operation::Delete,
        }
    }

    /// The entity this request targets.
    pub fn entity(&self) -> &EntityRef {
        match self {
            DataRequest::Insert { entity, .. }
            | DataRequest::Find { entity, .. }
            | DataRequest::Update { entity, .. }
            | DataRequest::Save { entity, .. }
            | DataRequest::Delete { entity, .. } => entity,
        }
    }

    /// The JSON body of this request.
    pub fn body(&self) -> &Value {
        match self {
            DataRequest::Insert { body, .. }
            | DataRequest::Find { body, .. }
            | DataRequest::Update { body, .. }
            | DataRequest::Save { body, .. }
            | DataRequest::Delete { body, .. } => body,
        }
    }
}
