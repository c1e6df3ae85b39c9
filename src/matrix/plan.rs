//! @acp:module "Matrix Plan"
//! @acp:summary "Run applicability, ordering and sectioning as one evaluation pass"
//! @acp:domain cli
//! @acp:layer logic

use std::collections::BTreeSet;

use super::evaluator::explain;
use super::ordering::{order, partition};
use super::types::*;

/// Build the display plan for one table and request.
///
/// Pure: the same table and request always produce the same plan, so callers
/// may cache plans keyed on their inputs.
pub fn build_plan(table: &ProfileTable, request: &PlanRequest) -> DisplayPlan {
    let verdicts = explain(
        table,
        &request.selected,
        &request.kill_list,
        &request.precedence,
    );

    let (shown, excluded): (Vec<Verdict>, Vec<Verdict>) =
        verdicts.into_iter().partition(|v| v.included);
    let applicable: BTreeSet<String> = shown.into_iter().map(|v| v.widget).collect();

    let placements = order(table, &request.selected, &request.precedence, &applicable);
    let sections = partition(
        table,
        &placements,
        &request.section_order,
        request.section_policy,
    );

    let plan = DisplayPlan {
        sheet: table.key().to_string(),
        selected: request.precedence.arrange(&request.selected),
        sections,
        excluded,
    };
    tracing::debug!(
        sheet = %plan.sheet,
        shown = plan.widget_count(),
        hidden = plan.excluded.len(),
        sections = plan.sections.len(),
        "Built display plan"
    );
    plan
}
