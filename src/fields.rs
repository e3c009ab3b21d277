//! Container-field allow-list: object keys empirically known to hold child
//! AST content in solc output.
//!
//! This is a heuristic, not a schema. The set is expected to be incomplete
//! for new compiler versions and other AST dialects, so it lives behind one
//! swappable value instead of literals scattered through the traversal.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::Context;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Keys observed to carry child nodes in Solidity compiler AST output.
const SOLC_FIELD_NAMES: &[&str] = &[
    "nodes",
    "foreign",
    "body",
    "arguments",
    "declarations",
    "baseContracts",
    "functions",
    "events",
    "modifiers",
    "variables",
    "parameters",
    "returnParameters",
    "condition",
    "trueBody",
    "falseBody",
    "initialization",
    "value",
    "assignment",
    "leftHandSide",
    "rightHandSide",
    "expression",
    "vReturnValue",
    "vFunctionCall",
    "vTryCall",
    "statements",
    "documentation",
    "typeName",
    "type",
    "element",
    "memberName",
    "members",
    "attributes",
    "components",
    "arrayExpression",
    "indexExpression",
    "base",
    "expressionName",
    "memberExpression",
    "newExpression",
    "expressionType",
    "superFunction",
    "constructor",
    "fallbackReceive",
    "receiveEther",
    "fallback",
    "symbolAliases",
    "originalName",
    "nameLocation",
    "functionSelector",
];

static SOLC: Lazy<FieldSet> = Lazy::new(|| SOLC_FIELD_NAMES.iter().copied().collect());

/// A named set of container field keys. Serializes as a plain JSON array of
/// strings so dialect extensions can be shipped as data.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSet {
    names: BTreeSet<String>,
}

impl FieldSet {
    /// The built-in solc allow-list.
    pub fn solc() -> Self {
        SOLC.clone()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.names.contains(key)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Add extra field names; new dialects layer on top of the built-ins.
    pub fn extend<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names.extend(names.into_iter().map(Into::into));
    }

    /// Load a field set from a JSON array file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read field set '{}'", path.display()))?;
        serde_json::from_str(&source)
            .with_context(|| format!("failed to parse field set '{}'", path.display()))
    }
}

impl<S: Into<String>> FromIterator<S> for FieldSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl IntoIterator for FieldSet {
    type Item = String;
    type IntoIter = std::collections::btree_set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.into_iter()
    }
}

// ------------------------------- Tests ------------------------------------ //
