//! Rendering for the two planning reports: the bucketed relation report
//! (fewest distinct children first, for bottom-up visitor work) and the
//! descending frequency table.
//!
//! Both render to a `String`; only the CLI prints.

use std::fmt::Write;

use colored::Colorize;

use crate::relation::TypeRelation;

const RULE_WIDTH: usize = 70;
const TABLE_WIDTH: usize = 50;

/// Bucketed relation report, ascending by distinct-child count. Child
/// names render lexicographically inside each entry; entry order on ties
/// is discovery order.
pub fn relation_report(relation: &TypeRelation) -> String {
    let rows = relation.by_child_count();
    let mut out = String::new();

    let _ = writeln!(out, "Found {} unique node types", rows.len());
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));

    for (label, children) in &rows {
        let count = children.len();
        let names: Vec<&str> = children.iter().map(String::as_str).collect();
        match count {
            0 => {
                let _ = writeln!(
                    out,
                    "\n{}: {}",
                    label.bold(),
                    "no children (start here)".green().bold()
                );
            }
            1..=2 => {
                let noun = if count == 1 { "child" } else { "children" };
                let _ = writeln!(out, "\n{}: {count} {noun}", label.bold());
                let _ = writeln!(out, "   [{}]", names.join(", "));
            }
            3..=5 => {
                let _ = writeln!(out, "\n{}: {count} children", label.bold());
                for name in &names {
                    let _ = writeln!(out, "   - {name}");
                }
            }
            _ => {
                let _ = writeln!(out, "\n{}: {count} children", label.bold());
                let _ = writeln!(out, "   {}", names.join(", "));
            }
        }
        let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
    }

    let leaves = rows.iter().filter(|(_, c)| c.is_empty()).count();
    let small = rows
        .iter()
        .filter(|(_, c)| (1..=5).contains(&c.len()))
        .count();
    let large = rows
        .iter()
        .filter(|(_, c)| (6..=20).contains(&c.len()))
        .count();

    let _ = writeln!(out, "\n{}", "=".repeat(RULE_WIDTH));
    let _ = writeln!(out, "\nTotal: {} node types", rows.len());
    let _ = writeln!(out, "   {leaves} with no children");
    let _ = writeln!(out, "   {small} with 1-5 children");
    let _ = writeln!(out, "   {large} with 6-20 children");
    out
}

/// Fixed-width frequency table, descending by count, discovery order on
/// ties, with the grand total last.
pub fn frequency_report(relation: &TypeRelation) -> String {
    let rows = relation.by_count();
    let mut out = String::new();

    let _ = writeln!(out, "Found {} unique node types:", rows.len());
    let _ = writeln!(out, "{}", "-".repeat(TABLE_WIDTH));
    for (label, count) in &rows {
        let _ = writeln!(out, "{count:>6} : {label}");
    }
    let _ = writeln!(out, "{}", "-".repeat(TABLE_WIDTH));
    let _ = writeln!(out, "Total: {} nodes", relation.total_nodes());
    out
}

// ------------------------------- Tests ------------------------------------ //
