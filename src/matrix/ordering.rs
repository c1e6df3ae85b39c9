//! @acp:module "Matrix Ordering"
//! @acp:summary "Precedence-scoped ranking and section partitioning of applicable widgets"
//! @acp:domain cli
//! @acp:layer logic

use std::collections::{BTreeSet, HashMap, HashSet};

use super::types::*;

/// Order applicable widgets.
///
/// Precedence attributes are walked in their fixed order; for each one that is
/// selected, the still-unplaced widgets it ranks are appended by ascending rank
/// (ties keep table order). A widget is placed by the first attribute that
/// ranks it. Whatever is left follows in table order.
///
/// Selected attributes missing from `precedence` never rank anything.
pub fn order(
    table: &ProfileTable,
    selected: &BTreeSet<String>,
    precedence: &AttributePrecedence,
    applicable: &BTreeSet<String>,
) -> Vec<Placement> {
    let mut remaining: Vec<&WidgetRecord> = table
        .records()
        .iter()
        .filter(|r| r.has_name() && applicable.contains(&r.name))
        .collect();
    let mut placements = Vec::with_capacity(remaining.len());

    for attr in precedence.iter().filter(|a| selected.contains(*a)) {
        let mut ranked: Vec<(&WidgetRecord, f64)> = remaining
            .iter()
            .filter_map(|r| r.directive(attr).ordering_rank().map(|n| (*r, n)))
            .collect();
        if ranked.is_empty() {
            continue;
        }

        // sort_by is stable, equal ranks keep table order
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
        tracing::debug!(attribute = %attr, count = ranked.len(), "Placing ranked widgets");

        let placed: HashSet<&str> = ranked.iter().map(|(r, _)| r.name.as_str()).collect();
        remaining.retain(|r| !placed.contains(r.name.as_str()));
        placements.extend(ranked.into_iter().map(|(r, n)| Placement {
            widget: r.name.clone(),
            placed_by: Some(attr.clone()),
            rank: Some(n),
        }));
    }

    placements.extend(remaining.into_iter().map(|r| Placement {
        widget: r.name.clone(),
        placed_by: None,
        rank: None,
    }));

    placements
}

/// [`order`] reduced to widget names
pub fn order_names(
    table: &ProfileTable,
    selected: &BTreeSet<String>,
    precedence: &AttributePrecedence,
    applicable: &BTreeSet<String>,
) -> Vec<String> {
    order(table, selected, precedence, applicable)
        .into_iter()
        .map(|p| p.widget)
        .collect()
}

/// Group ordered placements into sections.
///
/// Listed sections come first in `section_order`; widgets keep their relative
/// order inside each section. Sections outside the list are appended in
/// first-seen order or dropped, per `policy`. Empty sections are skipped.
pub fn partition(
    table: &ProfileTable,
    placements: &[Placement],
    section_order: &SectionOrder,
    policy: SectionPolicy,
) -> Vec<PlannedSection> {
    let mut names: Vec<&str> = Vec::new();
    let mut listed: HashSet<&str> = HashSet::new();
    for section in section_order.iter() {
        if listed.insert(section.as_str()) {
            names.push(section);
        }
    }

    let mut grouped: HashMap<&str, Vec<PlannedWidget>> = HashMap::new();
    for placement in placements {
        let record = match table.get(&placement.widget) {
            Some(record) => record,
            None => continue,
        };
        let section = record.section.as_str();
        if !listed.contains(section) {
            match policy {
                SectionPolicy::Append => {
                    if !grouped.contains_key(section) {
                        names.push(section);
                    }
                }
                SectionPolicy::Drop => {
                    tracing::debug!(
                        widget = %placement.widget,
                        section = %section,
                        "Dropping widget in unlisted section"
                    );
                    continue;
                }
            }
        }
        grouped.entry(section).or_default().push(PlannedWidget {
            name: placement.widget.clone(),
            image_ref: record.image_ref.clone(),
            placed_by: placement.placed_by.clone(),
            rank: placement.rank,
        });
    }

    names
        .into_iter()
        .filter_map(|name| {
            grouped.remove(name).map(|widgets| PlannedSection {
                name: name.to_string(),
                widgets,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn precedence(items: &[&str]) -> AttributePrecedence {
        AttributePrecedence::new(items.iter().map(|s| s.to_string()).collect())
    }

    fn sections(items: &[&str]) -> SectionOrder {
        SectionOrder::new(items.iter().map(|s| s.to_string()).collect())
    }

    fn table() -> ProfileTable {
        ProfileTable::new(
            "test",
            vec![
                WidgetRecord::new("A", "S1").with_directive("EV", Directive::Rank(2.0)),
                WidgetRecord::new("B", "S1").with_directive("EV", Directive::Rank(1.0)),
                WidgetRecord::new("C", "S2")
                    .with_directive("TOU", Directive::Rank(1.0))
                    .with_directive("EV", Directive::Rank(3.0)),
                WidgetRecord::new("D", "S2").with_directive("TOU", Directive::Include),
                WidgetRecord::new("E", "S3").with_directive("EV", Directive::Rank(1.0)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_ranks_ascending_with_stable_ties() {
        let names = order_names(
            &table(),
            &set(&["EV"]),
            &precedence(&["EV", "TOU"]),
            &set(&["A", "B", "E", "D"]),
        );
        // B and E tie on rank 1 and keep table order
        assert_eq!(names, vec!["B", "E", "A", "D"]);
    }

    #[test]
    fn test_first_precedence_attribute_places_widget() {
        let all = set(&["A", "B", "C", "D", "E"]);
        let ev_first = order(&table(), &set(&["EV", "TOU"]), &precedence(&["EV", "TOU"]), &all);
        let c = ev_first.iter().find(|p| p.widget == "C").unwrap();
        assert_eq!(c.placed_by.as_deref(), Some("EV"));
        assert_eq!(c.rank, Some(3.0));

        let tou_first = order_names(&table(), &set(&["EV", "TOU"]), &precedence(&["TOU", "EV"]), &all);
        assert_eq!(tou_first, vec!["C", "B", "E", "A", "D"]);
    }

    #[test]
    fn test_unselected_precedence_attribute_does_not_rank() {
        let names = order_names(
            &table(),
            &set(&["TOU"]),
            &precedence(&["EV", "TOU"]),
            &set(&["A", "B", "C"]),
        );
        assert_eq!(names, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_non_positive_rank_falls_to_tail() {
        let table = ProfileTable::new(
            "test",
            vec![
                WidgetRecord::new("Zero", "S").with_directive("EV", Directive::Rank(0.0)),
                WidgetRecord::new("One", "S").with_directive("EV", Directive::Rank(1.0)),
            ],
        )
        .unwrap();
        let placements = order(&table, &set(&["EV"]), &precedence(&["EV"]), &set(&["Zero", "One"]));
        assert_eq!(placements[0].widget, "One");
        assert_eq!(placements[1].widget, "Zero");
        assert_eq!(placements[1].placed_by, None);
    }

    #[test]
    fn test_partition_appends_unlisted_sections() {
        let all = set(&["A", "B", "C", "D", "E"]);
        let placements = order(&table(), &set(&["EV"]), &precedence(&["EV"]), &all);
        let planned = partition(&table(), &placements, &sections(&["S2", "S1"]), SectionPolicy::Append);
        let layout: Vec<(&str, Vec<&str>)> = planned
            .iter()
            .map(|s| (s.name.as_str(), s.widgets.iter().map(|w| w.name.as_str()).collect()))
            .collect();
        assert_eq!(
            layout,
            vec![
                ("S2", vec!["C", "D"]),
                ("S1", vec!["B", "A"]),
                ("S3", vec!["E"]),
            ]
        );
    }

    #[test]
    fn test_partition_drops_unlisted_sections() {
        let all = set(&["A", "B", "E"]);
        let placements = order(&table(), &set(&["EV"]), &precedence(&["EV"]), &all);
        let planned = partition(&table(), &placements, &sections(&["S1", "S1"]), SectionPolicy::Drop);
        assert_eq!(planned.len(), 1);
        assert_eq!(planned[0].name, "S1");
        assert_eq!(planned[0].widgets.len(), 2);
    }
}
