//! Corpus accumulators: the parent-type → child-type adjacency relation and
//! the per-type instance counts, plus the ordering policy the reports
//! consume.
//!
//! Both tables only grow, and `merge` is commutative and associative on
//! contents (set union, count sum), so per-file results can be combined in
//! any order. Key insertion order is the discovery order used to break
//! sort ties.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde_json::Value;

use crate::scan::{ScanError, Scanner};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeRelation {
    children: IndexMap<String, BTreeSet<String>>,
    counts: IndexMap<String, u64>,
}

impl TypeRelation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one extracted node: count its type, and add the type of every
    /// frontier node under each candidate child field as a child.
    ///
    /// A child found through any depth of non-node containers inside one
    /// field still counts as immediate; a child inside another node does
    /// not — that edge belongs to the inner node.
    pub fn observe(&mut self, scanner: &Scanner, node: &Value) -> Result<(), ScanError> {
        let label = scanner.type_of(node)?.to_string();
        *self.counts.entry(label.clone()).or_insert(0) += 1;

        let mut kids = BTreeSet::new();
        if let Some(map) = node.as_object() {
            for (key, val) in map {
                if !scanner.is_candidate_field(key, val) {
                    continue;
                }
                for child in scanner.child_nodes(val) {
                    kids.insert(scanner.type_of(child)?.to_string());
                }
            }
        }
        self.children.entry(label).or_default().extend(kids);
        Ok(())
    }

    /// Fold another accumulator in: child-set union, count sum. Keys new to
    /// `self` are appended after its own, preserving discovery order.
    pub fn merge(&mut self, other: Self) {
        for (label, kids) in other.children {
            self.children.entry(label).or_default().extend(kids);
        }
        for (label, count) in other.counts {
            *self.counts.entry(label).or_insert(0) += count;
        }
    }

    /// Give every counted type a (possibly empty) child entry, so leaf
    /// types show up in the relation report.
    pub fn backfill(&mut self) {
        let labels: Vec<String> = self.counts.keys().cloned().collect();
        for label in labels {
            self.children.entry(label).or_default();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Distinct type labels observed.
    pub fn distinct_types(&self) -> usize {
        self.children.len()
    }

    /// Sum of all instance counts; equals the number of nodes extracted
    /// across the corpus.
    pub fn total_nodes(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn children_of(&self, label: &str) -> Option<&BTreeSet<String>> {
        self.children.get(label)
    }

    pub fn count_of(&self, label: &str) -> u64 {
        self.counts.get(label).copied().unwrap_or(0)
    }

    /// Ascending by child-set size; ties keep discovery order (stable sort,
    /// no secondary key).
    pub fn by_child_count(&self) -> Vec<(&str, &BTreeSet<String>)> {
        let mut rows: Vec<_> = self
            .children
            .iter()
            .map(|(label, kids)| (label.as_str(), kids))
            .collect();
        rows.sort_by_key(|(_, kids)| kids.len());
        rows
    }

    /// Descending by instance count; ties keep discovery order.
    pub fn by_count(&self) -> Vec<(&str, u64)> {
        let mut rows: Vec<_> = self
            .counts
            .iter()
            .map(|(label, count)| (label.as_str(), *count))
            .collect();
        rows.sort_by_key(|(_, count)| std::cmp::Reverse(*count));
        rows
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn observe_all(scanner: &Scanner, doc: &Value) -> TypeRelation {
        let mut relation = TypeRelation::new();
        for node in scanner.extract_nodes(doc) {
            relation.observe(scanner, node).unwrap();
        }
        relation.backfill();
        relation
    }

    fn kids(relation: &TypeRelation, label: &str) -> Vec<String> {
        relation
            .children_of(label)
            .unwrap()
            .iter()
            .cloned()
            .collect()
    }

    #[test]
    fn block_return_literal_example() {
        let scanner = Scanner::default();
        let doc = json!({
            "nodeType": "Block",
            "statements": [
                {"nodeType": "Return", "value": {"nodeType": "Literal"}}
            ]
        });
        let relation = observe_all(&scanner, &doc);

        assert_eq!(kids(&relation, "Block"), ["Return"]);
        assert_eq!(kids(&relation, "Return"), ["Literal"]);
        assert!(kids(&relation, "Literal").is_empty());
        assert_eq!(relation.count_of("Block"), 1);
        assert_eq!(relation.count_of("Return"), 1);
        assert_eq!(relation.count_of("Literal"), 1);
        assert_eq!(relation.total_nodes(), 3);
    }

    #[test]
    fn children_flatten_through_non_node_containers() {
        let scanner = Scanner::default();
        let doc = json!({
            "nodeType": "TupleExpression",
            "components": [[{"nodeType": "Identifier"}], null, {"nodeType": "Literal"}]
        });
        let relation = observe_all(&scanner, &doc);
        assert_eq!(kids(&relation, "TupleExpression"), ["Identifier", "Literal"]);
    }

    #[test]
    fn non_candidate_fields_record_no_edge() {
        let scanner = Scanner::default();
        // `typeDescriptions` is neither allow-listed nor a node itself, so
        // the Identifier inside it is extracted and counted but not linked
        // as a child of Assignment.
        let doc = json!({
            "nodeType": "Assignment",
            "typeDescriptions": {"inner": [{"nodeType": "Identifier"}]}
        });
        let relation = observe_all(&scanner, &doc);
        assert!(kids(&relation, "Assignment").is_empty());
        assert_eq!(relation.count_of("Identifier"), 1);
    }

    #[test]
    fn node_valued_fields_are_candidates_even_off_list() {
        let scanner = Scanner::default();
        let doc = json!({
            "nodeType": "ForStatement",
            "loopExpression": {"nodeType": "ExpressionStatement"}
        });
        let relation = observe_all(&scanner, &doc);
        assert_eq!(kids(&relation, "ForStatement"), ["ExpressionStatement"]);
    }

    #[test]
    fn completeness_every_extracted_label_is_a_key() {
        let scanner = Scanner::default();
        let doc = json!({
            "nodeType": "SourceUnit",
            "nodes": [
                {"nodeType": "PragmaDirective"},
                {"nodeType": "ContractDefinition", "nodes": [
                    {"nodeType": "VariableDeclaration"}
                ]}
            ]
        });
        let relation = observe_all(&scanner, &doc);
        for node in scanner.extract_nodes(&doc) {
            let label = scanner.type_of(node).unwrap();
            assert!(relation.children_of(label).is_some(), "missing {label}");
        }
    }

    #[test]
    fn observing_the_same_corpus_twice_is_idempotent_on_sets() {
        let scanner = Scanner::default();
        let doc = json!({
            "nodeType": "Block",
            "statements": [{"nodeType": "Return"}, {"nodeType": "Return"}]
        });
        let once = observe_all(&scanner, &doc);
        let twice = observe_all(&scanner, &doc);
        assert_eq!(once, twice);
        assert_eq!(kids(&once, "Block"), ["Return"]);
    }

    #[test]
    fn merge_is_commutative_on_contents() {
        let scanner = Scanner::default();
        let a = observe_all(
            &scanner,
            &json!({"nodeType": "Block", "statements": [{"nodeType": "Return"}]}),
        );
        let b = observe_all(
            &scanner,
            &json!({"nodeType": "Block", "statements": [{"nodeType": "Break"}]}),
        );

        let mut ab = a.clone();
        ab.merge(b.clone());
        let mut ba = b;
        ba.merge(a);

        // IndexMap equality ignores key order, so this compares contents.
        assert_eq!(ab, ba);
        assert_eq!(kids(&ab, "Block"), ["Break", "Return"]);
        assert_eq!(ab.count_of("Block"), 2);
        assert_eq!(ab.total_nodes(), 4);
    }

    #[test]
    fn ordering_is_stable_on_ties() {
        let scanner = Scanner::default();
        let doc = json!({
            "nodeType": "Block",
            "statements": [
                {"nodeType": "EmitStatement"},
                {"nodeType": "PlaceholderStatement"}
            ]
        });
        let relation = observe_all(&scanner, &doc);

        // Both leaves have zero children; discovery order decides.
        let rows = relation.by_child_count();
        let leaves: Vec<&str> = rows
            .iter()
            .filter(|(_, kids)| kids.is_empty())
            .map(|(label, _)| *label)
            .collect();
        assert_eq!(leaves, ["EmitStatement", "PlaceholderStatement"]);

        // All counts are 1; discovery order decides again.
        let by_count: Vec<&str> = relation.by_count().iter().map(|(l, _)| *l).collect();
        assert_eq!(
            by_count,
            ["Block", "EmitStatement", "PlaceholderStatement"]
        );
    }

    #[test]
    fn census_matches_extraction() {
        // Cross-check: the frequency total must equal an independent naive
        // recursive count of discriminator-bearing objects.
        fn naive_count(value: &Value) -> u64 {
            let own = u64::from(
                value
                    .get("nodeType")
                    .is_some_and(Value::is_string),
            );
            own + match value {
                Value::Object(map) => map.values().map(naive_count).sum(),
                Value::Array(items) => items.iter().map(naive_count).sum(),
                _ => 0,
            }
        }

        let scanner = Scanner::default();
        let doc = json!({
            "nodeType": "SourceUnit",
            "nodes": [
                {"nodeType": "ContractDefinition", "nodes": [
                    {"nodeType": "FunctionDefinition", "body": {
                        "nodeType": "Block",
                        "statements": [{"nodeType": "Return"}]
                    }}
                ]}
            ],
            "absolutePath": "a.sol",
            "exportedSymbols": {"C": [1]}
        });
        let relation = observe_all(&scanner, &doc);
        assert_eq!(relation.total_nodes(), naive_count(&doc));
        assert_eq!(relation.total_nodes(), 5);
    }
}
