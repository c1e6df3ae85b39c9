//! @acp:module "Matrix Types"
//! @acp:summary "Widget records, directives and display plan types"
//! @acp:domain cli
//! @acp:layer types

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use crate::error::{CxmError, Result};

/// Section assigned to widgets whose section cell is blank
pub const UNASSIGNED_SECTION: &str = "Unassigned";

/// Per-(widget, attribute) rule value
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "rank", rename_all = "lowercase")]
pub enum Directive {
    /// No opinion
    #[default]
    Pass,
    /// Forces inclusion without a position
    Include,
    /// Vetoes the widget, beats every Include
    Kill,
    /// Includes the widget and weights its position (lower first)
    Rank(f64),
}

impl Directive {
    /// Whether this directive votes the widget in
    pub fn includes(&self) -> bool {
        matches!(self, Directive::Include | Directive::Rank(_))
    }

    /// Rank usable for ordering. Ranks must be strictly positive.
    pub fn ordering_rank(&self) -> Option<f64> {
        match self {
            Directive::Rank(n) if n.is_finite() && *n > 0.0 => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Directive::Pass => write!(f, "pass"),
            Directive::Include => write!(f, "include"),
            Directive::Kill => write!(f, "kill"),
            Directive::Rank(n) => write!(f, "rank {}", n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WidgetStatus {
    On,
    Off,
}

/// One row of a profile table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetRecord {
    pub name: String,

    pub section: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<WidgetStatus>,

    #[serde(default)]
    pub directives: BTreeMap<String, Directive>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
}

impl WidgetRecord {
    pub fn new(name: impl Into<String>, section: impl Into<String>) -> Self {
        let section = section.into();
        Self {
            name: name.into(),
            section: if section.trim().is_empty() {
                UNASSIGNED_SECTION.to_string()
            } else {
                section
            },
            status: None,
            directives: BTreeMap::new(),
            image_ref: None,
        }
    }

    pub fn with_directive(mut self, attribute: impl Into<String>, directive: Directive) -> Self {
        self.directives.insert(attribute.into(), directive);
        self
    }

    pub fn with_status(mut self, status: WidgetStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_image(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = Some(image_ref.into());
        self
    }

    /// Directive under `attribute`; absent columns read as Pass
    pub fn directive(&self, attribute: &str) -> Directive {
        self.directives.get(attribute).copied().unwrap_or_default()
    }

    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }

    pub fn is_off(&self) -> bool {
        self.status == Some(WidgetStatus::Off)
    }
}

/// Ordered widget records for one sheet (customer type / fuel / meter combination)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileTable {
    key: String,
    attributes: Vec<String>,
    records: Vec<WidgetRecord>,
    /// Named records by name, positions into `records`
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl ProfileTable {
    /// Build a table, rejecting duplicate non-empty widget names.
    ///
    /// Attribute columns are collected from the records in first-seen order.
    pub fn new(key: impl Into<String>, records: Vec<WidgetRecord>) -> Result<Self> {
        let mut attributes: Vec<String> = Vec::new();
        for record in &records {
            for attr in record.directives.keys() {
                if !attributes.contains(attr) {
                    attributes.push(attr.clone());
                }
            }
        }
        Self::with_attributes(key, attributes, records)
    }

    /// Build a table with an explicit attribute column list (header order)
    pub fn with_attributes(
        key: impl Into<String>,
        attributes: Vec<String>,
        records: Vec<WidgetRecord>,
    ) -> Result<Self> {
        let key = key.into();
        let mut index = HashMap::with_capacity(records.len());
        for (i, record) in records.iter().enumerate().filter(|(_, r)| r.has_name()) {
            if index.insert(record.name.clone(), i).is_some() {
                return Err(CxmError::DuplicateWidget {
                    sheet: key,
                    name: record.name.clone(),
                });
            }
        }
        Ok(Self {
            key,
            attributes,
            records,
            index,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn records(&self) -> &[WidgetRecord] {
        &self.records
    }

    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    pub fn has_attribute(&self, attribute: &str) -> bool {
        self.attributes.iter().any(|a| a == attribute)
    }

    pub fn get(&self, name: &str) -> Option<&WidgetRecord> {
        self.index.get(name).map(|&i| &self.records[i])
    }

    /// Table position of a named record
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn default_precedence() -> Vec<String> {
    ["EV", "TOU", "Solar", "BudgetBilling", "DemandCharge", "Regular"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_sections() -> Vec<String> {
    ["Overview", "Usage", "Billing", "Solar", "EV", "Programs"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Fixed priority order among attributes, used only for ordering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributePrecedence(Vec<String>);

impl AttributePrecedence {
    pub fn new(attributes: Vec<String>) -> Self {
        Self(attributes)
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    pub fn position(&self, attribute: &str) -> Option<usize> {
        self.0.iter().position(|a| a == attribute)
    }

    /// Sort attributes by precedence; attributes outside the list follow in name order
    pub fn arrange<'a, I>(&self, attributes: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut out: Vec<String> = attributes.into_iter().cloned().collect();
        out.sort_by(|a, b| {
            let pa = self.position(a).unwrap_or(usize::MAX);
            let pb = self.position(b).unwrap_or(usize::MAX);
            pa.cmp(&pb).then_with(|| a.cmp(b))
        });
        out.dedup();
        out
    }
}

impl Default for AttributePrecedence {
    fn default() -> Self {
        Self(default_precedence())
    }
}

impl From<Vec<String>> for AttributePrecedence {
    fn from(v: Vec<String>) -> Self {
        Self(v)
    }
}

/// Fixed display order of sections
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionOrder(Vec<String>);

impl SectionOrder {
    pub fn new(sections: Vec<String>) -> Self {
        Self(sections)
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    pub fn contains(&self, section: &str) -> bool {
        self.0.iter().any(|s| s == section)
    }
}

impl Default for SectionOrder {
    fn default() -> Self {
        Self(default_sections())
    }
}

impl From<Vec<String>> for SectionOrder {
    fn from(v: Vec<String>) -> Self {
        Self(v)
    }
}

/// What to do with sections missing from the [`SectionOrder`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionPolicy {
    /// Emit them after the listed sections, in first-seen order
    #[default]
    Append,
    Drop,
}

/// Attribute catalog entry (descriptions shown next to the selector)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeInfo {
    pub id: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub color: Option<String>,
}

/// Everything a caller chooses for one evaluation pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanRequest {
    pub selected: BTreeSet<String>,
    pub kill_list: BTreeSet<String>,
    pub precedence: AttributePrecedence,
    pub section_order: SectionOrder,
    pub section_policy: SectionPolicy,
}

impl PlanRequest {
    pub fn select(mut self, attribute: impl Into<String>) -> Self {
        self.selected.insert(attribute.into());
        self
    }

    pub fn kill(mut self, widget: impl Into<String>) -> Self {
        self.kill_list.insert(widget.into());
        self
    }

    pub fn precedence(mut self, precedence: impl Into<AttributePrecedence>) -> Self {
        self.precedence = precedence.into();
        self
    }

    pub fn sections(mut self, order: impl Into<SectionOrder>, policy: SectionPolicy) -> Self {
        self.section_order = order.into();
        self.section_policy = policy;
        self
    }
}

/// Why a widget is or is not shown
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Reason {
    MissingName,
    KillListed,
    StatusOff,
    DefaultShown,
    KilledBy { attribute: String },
    IncludedBy { attribute: String },
    RankedBy { attribute: String, rank: f64 },
    NoMatchingAttribute,
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::MissingName => write!(f, "Record has no widget name"),
            Reason::KillListed => write!(f, "Widget is on the kill list"),
            Reason::StatusOff => write!(f, "Widget status is OFF"),
            Reason::DefaultShown => write!(f, "Default pass"),
            Reason::KilledBy { attribute } => write!(f, "{} dimension kills this element", attribute),
            Reason::IncludedBy { attribute } => {
                write!(f, "{} dimension includes this element", attribute)
            }
            Reason::RankedBy { attribute, rank } => {
                write!(f, "{} dimension includes this element (rank {})", attribute, rank)
            }
            Reason::NoMatchingAttribute => write!(f, "No selected dimension includes this element"),
        }
    }
}

/// Applicability decision for one record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub widget: String,
    pub included: bool,
    pub reason: Reason,
}

/// Position decision for one applicable widget
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub widget: String,
    /// Precedence attribute whose rank placed the widget; `None` for the unranked tail
    pub placed_by: Option<String>,
    pub rank: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedWidget {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placed_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedSection {
    pub name: String,
    pub widgets: Vec<PlannedWidget>,
}

/// Ordered, section-partitioned result of one evaluation pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayPlan {
    pub sheet: String,
    /// Selected attributes in precedence order
    pub selected: Vec<String>,
    pub sections: Vec<PlannedSection>,
    /// Verdicts for records that were not shown
    pub excluded: Vec<Verdict>,
}

impl DisplayPlan {
    /// Widget names in final display order
    pub fn widget_names(&self) -> Vec<&str> {
        self.sections
            .iter()
            .flat_map(|s| s.widgets.iter().map(|w| w.name.as_str()))
            .collect()
    }

    pub fn section(&self, name: &str) -> Option<&PlannedSection> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn widget_count(&self) -> usize {
        self.sections.iter().map(|s| s.widgets.len()).sum()
    }
}
