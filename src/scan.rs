//! Node classification and extraction: the recursive walk that locates AST
//! node objects inside an arbitrarily shaped JSON value.
//!
//! A node is any object carrying a string under the discriminator key
//! (`nodeType` in solc output). Descent is guided by the container-field
//! allow-list but never limited by it: every object and array is entered,
//! so a stale allow-list can cost relation precision, never extraction
//! recall.

use serde_json::Value;
use thiserror::Error;

use crate::fields::FieldSet;

/// Discriminator key used by the Solidity compiler.
pub const DEFAULT_DISCRIMINATOR: &str = "nodeType";

#[derive(Debug, Error)]
pub enum ScanError {
    /// `type_of` was called on a value with no string-valued discriminator.
    #[error("not an AST node: missing string-valued `{discriminator}` key")]
    NotANode { discriminator: String },
}

/// The classifier/extractor pair, parameterized by discriminator key and
/// container-field allow-list.
#[derive(Clone, Debug)]
pub struct Scanner {
    discriminator: String,
    fields: FieldSet,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new(DEFAULT_DISCRIMINATOR, FieldSet::solc())
    }
}

impl Scanner {
    pub fn new(discriminator: impl Into<String>, fields: FieldSet) -> Self {
        Self {
            discriminator: discriminator.into(),
            fields,
        }
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    /// True iff `value` is an object with a string under the discriminator
    /// key.
    pub fn is_node(&self, value: &Value) -> bool {
        value.get(&self.discriminator).is_some_and(Value::is_string)
    }

    /// The node's type label. Calling this on a non-node is a contract
    /// violation and fails loudly, never with a placeholder label.
    pub fn type_of<'a>(&self, node: &'a Value) -> Result<&'a str, ScanError> {
        node.get(&self.discriminator)
            .and_then(Value::as_str)
            .ok_or_else(|| ScanError::NotANode {
                discriminator: self.discriminator.clone(),
            })
    }

    /// True if a field may hold child node content: its key is allow-listed
    /// or its value is itself a node.
    pub fn is_candidate_field(&self, key: &str, value: &Value) -> bool {
        self.fields.contains(key) || self.is_node(value)
    }

    /// Every node reachable from `value`, depth-first pre-order, `value`
    /// itself first when it qualifies. Pure function of its input.
    pub fn extract_nodes<'a>(&self, value: &'a Value) -> Vec<&'a Value> {
        let mut out = Vec::new();
        self.extract_into(value, &mut out);
        out
    }

    fn extract_into<'a>(&self, value: &'a Value, out: &mut Vec<&'a Value>) {
        if self.is_node(value) {
            out.push(value);
        }
        match value {
            Value::Object(map) => {
                for (key, val) in map {
                    if self.is_candidate_field(key, val) {
                        self.extract_into(val, out);
                    } else if val.is_object() || val.is_array() {
                        // catch-all: nested structure outside the allow-list
                        // may still hold nodes
                        self.extract_into(val, out);
                    }
                }
            }
            Value::Array(items) => {
                for item in items {
                    if item.is_object() || item.is_array() {
                        self.extract_into(item, out);
                    }
                }
            }
            _ => {}
        }
    }

    /// The nearest nodes reachable from `value` without passing through
    /// another node: non-node objects and arrays are flattened through,
    /// recursion stops at the first node on each path.
    pub fn child_nodes<'a>(&self, value: &'a Value) -> Vec<&'a Value> {
        let mut out = Vec::new();
        self.frontier_into(value, &mut out);
        out
    }

    fn frontier_into<'a>(&self, value: &'a Value, out: &mut Vec<&'a Value>) {
        if self.is_node(value) {
            out.push(value);
            return;
        }
        match value {
            Value::Object(map) => {
                for val in map.values() {
                    self.frontier_into(val, out);
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.frontier_into(item, out);
                }
            }
            _ => {}
        }
    }
}

// ------------------------------- Tests ------------------------------------ //
