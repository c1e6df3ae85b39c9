//! @acp:module "Matrix Evaluator"
//! @acp:summary "Decide which widgets are applicable for a set of selected attributes"
//! @acp:domain cli
//! @acp:layer logic

use std::collections::BTreeSet;

use super::types::*;

/// Names of applicable widgets.
///
/// A widget is dropped when it has no name, is kill-listed or has status OFF.
/// With no attributes selected everything else is shown. Otherwise every
/// selected attribute is inspected: any Kill vetoes, else any Include or Rank
/// admits, else the widget is hidden.
pub fn evaluate(
    table: &ProfileTable,
    selected: &BTreeSet<String>,
    kill_list: &BTreeSet<String>,
) -> BTreeSet<String> {
    let attributes: Vec<&String> = selected.iter().collect();
    table
        .records()
        .iter()
        .map(|record| verdict_for(record, &attributes, kill_list))
        .filter(|v| v.included)
        .map(|v| v.widget)
        .collect()
}

/// One verdict per record, in table order.
///
/// When several attributes agree, the reason names the first one in
/// `precedence` (attributes outside it follow in name order).
pub fn explain(
    table: &ProfileTable,
    selected: &BTreeSet<String>,
    kill_list: &BTreeSet<String>,
    precedence: &AttributePrecedence,
) -> Vec<Verdict> {
    for attr in selected {
        if !table.has_attribute(attr) {
            tracing::debug!(sheet = table.key(), attribute = %attr, "Selected attribute has no column");
        }
    }

    let arranged = precedence.arrange(selected);
    let attributes: Vec<&String> = arranged.iter().collect();
    table
        .records()
        .iter()
        .map(|record| verdict_for(record, &attributes, kill_list))
        .collect()
}

fn verdict_for(record: &WidgetRecord, selected: &[&String], kill_list: &BTreeSet<String>) -> Verdict {
    let (included, reason) = decide(record, selected, kill_list);
    tracing::trace!(widget = %record.name, included, reason = %reason, "Evaluated widget");
    Verdict {
        widget: record.name.clone(),
        included,
        reason,
    }
}

fn decide(record: &WidgetRecord, selected: &[&String], kill_list: &BTreeSet<String>) -> (bool, Reason) {
    if !record.has_name() {
        return (false, Reason::MissingName);
    }
    if kill_list.contains(&record.name) {
        return (false, Reason::KillListed);
    }
    if record.is_off() {
        return (false, Reason::StatusOff);
    }
    if selected.is_empty() {
        return (true, Reason::DefaultShown);
    }

    // Full scan: a later Kill must still beat an earlier Include.
    let mut admitted_by: Option<(&String, Directive)> = None;
    for attr in selected {
        match record.directive(attr) {
            Directive::Kill => {
                return (
                    false,
                    Reason::KilledBy {
                        attribute: attr.to_string(),
                    },
                )
            }
            d if d.includes() && admitted_by.is_none() => admitted_by = Some((*attr, d)),
            _ => {}
        }
    }

    match admitted_by {
        Some((attr, Directive::Rank(rank))) => (
            true,
            Reason::RankedBy {
                attribute: attr.to_string(),
                rank,
            },
        ),
        Some((attr, _)) => (
            true,
            Reason::IncludedBy {
                attribute: attr.to_string(),
            },
        ),
        None => (false, Reason::NoMatchingAttribute),
    }
}
