//! @acp:module "List Command"
//! @acp:summary "List sheets, attributes and widgets of the configured workbook"
//! @acp:domain cli
//! @acp:layer handler

use anyhow::{anyhow, Result};
use console::{style, Style};

use crate::config::Config;
use crate::matrix::{AttributeInfo, Directive, Workbook};

/// What to list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListTarget {
    Sheets,
    Attributes,
    Widgets,
}

impl std::str::FromStr for ListTarget {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sheets" => Ok(ListTarget::Sheets),
            "attributes" | "dimensions" => Ok(ListTarget::Attributes),
            "widgets" | "elements" => Ok(ListTarget::Widgets),
            _ => Err(anyhow!("Unknown list target: {}", s)),
        }
    }
}

/// Execute the list command
pub fn execute_list(target: ListTarget, config: &Config) -> Result<()> {
    let workbook = config.workbook()?;

    match target {
        ListTarget::Sheets => {
            println!("Available sheets ({}):\n", workbook.sheets.len());
            for key in workbook.sheet_keys() {
                match workbook.sheet(key) {
                    Ok(table) => println!(
                        "  {:32} {} widgets, {} attributes",
                        key,
                        table.len(),
                        table.attributes().len()
                    ),
                    Err(e) => println!("  {:32} {}", key, style(e).red()),
                }
            }
        }
        ListTarget::Attributes => {
            let attributes = attribute_catalog(&workbook, config.sheet.as_deref())?;
            println!("Dimension descriptions:\n");
            for info in attributes {
                let color = info
                    .color
                    .as_deref()
                    .map(Style::from_dotted_str)
                    .unwrap_or_else(Style::new);
                println!(
                    "  {:16} {}",
                    color.bold().apply_to(&info.id),
                    info.description
                        .as_deref()
                        .unwrap_or("Description not available.")
                );
            }
        }
        ListTarget::Widgets => {
            let key = workbook.resolve_sheet_key(config.sheet.as_deref())?;
            let table = workbook.sheet(&key)?;
            println!("Widgets in {} ({}):\n", key, table.len());
            for record in table.records() {
                let rules: Vec<String> = record
                    .directives
                    .iter()
                    .filter(|(_, d)| **d != Directive::Pass)
                    .map(|(attr, d)| format!("{}={}", attr, d))
                    .collect();
                let off = if record.is_off() { " [off]" } else { "" };
                println!(
                    "  {:28} {:12} {}{}",
                    record.name,
                    record.section,
                    rules.join(" "),
                    off
                );
            }
        }
    }

    Ok(())
}

/// Catalog entries, plus bare entries for sheet columns the catalog omits
pub fn attribute_catalog(workbook: &Workbook, sheet: Option<&str>) -> Result<Vec<AttributeInfo>> {
    let mut catalog = workbook.attributes.clone();
    let keys: Vec<String> = match sheet {
        Some(key) => vec![workbook.resolve_sheet_key(Some(key))?],
        None => workbook.sheet_keys().iter().map(|k| k.to_string()).collect(),
    };
    for key in keys {
        let table = workbook.sheet(&key)?;
        for attr in table.attributes() {
            if !catalog.iter().any(|a| &a.id == attr) {
                catalog.push(AttributeInfo {
                    id: attr.clone(),
                    description: None,
                    color: None,
                });
            }
        }
    }
    Ok(catalog)
}
