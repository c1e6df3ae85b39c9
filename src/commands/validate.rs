//! @acp:module "Validate Command"
//! @acp:summary "Check that every sheet of a rule table workbook maps and normalizes cleanly"
//! @acp:domain cli
//! @acp:layer handler

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use console::style;
use serde::Serialize;

use crate::matrix::{LoadWarning, Workbook};

/// Options for the validate command
#[derive(Debug, Clone)]
pub struct ValidateOptions {
    /// Workbook to validate
    pub file: PathBuf,
    /// Print the report as JSON
    pub json: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SheetReport {
    pub sheet: String,
    pub widgets: usize,
    pub attributes: usize,
    pub warnings: Vec<LoadWarning>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub sheets: Vec<SheetReport>,
}

impl ValidationReport {
    pub fn failed(&self) -> usize {
        self.sheets.iter().filter(|s| s.error.is_some()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.sheets.iter().map(|s| s.warnings.len()).sum()
    }
}

/// Load every sheet and collect fatal errors and cell warnings
pub fn validate_workbook(workbook: &Workbook) -> ValidationReport {
    let sheets = workbook
        .sheet_keys()
        .into_iter()
        .map(|key| match workbook.load_sheet(key) {
            Ok(loaded) => SheetReport {
                sheet: key.to_string(),
                widgets: loaded.table.len(),
                attributes: loaded.table.attributes().len(),
                warnings: loaded.warnings,
                error: None,
            },
            Err(e) => SheetReport {
                sheet: key.to_string(),
                widgets: 0,
                attributes: 0,
                warnings: Vec::new(),
                error: Some(e.to_string()),
            },
        })
        .collect();
    ValidationReport { sheets }
}

/// Execute the validate command
pub fn execute_validate(options: ValidateOptions) -> Result<()> {
    let workbook = Workbook::load(&options.file)
        .with_context(|| format!("Failed to load workbook {}", options.file.display()))?;
    let report = validate_workbook(&workbook);

    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for sheet in &report.sheets {
            match &sheet.error {
                Some(err) => println!("{} {}: {}", style("✗").red(), sheet.sheet, err),
                None => println!(
                    "{} {}: {} widgets, {} attributes",
                    style("✓").green(),
                    sheet.sheet,
                    sheet.widgets,
                    sheet.attributes
                ),
            }
            for warning in &sheet.warnings {
                println!("    {} {}", style("!").yellow(), warning);
            }
        }
    }

    let failed = report.failed();
    if failed > 0 {
        bail!("{} of {} sheets failed validation", failed, report.sheets.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_workbook_is_valid() {
        let report = validate_workbook(&Workbook::builtin().unwrap());
        assert_eq!(report.failed(), 0);
        assert_eq!(report.warning_count(), 0);
    }

    #[test]
    fn test_report_separates_fatal_and_warning_sheets() {
        let workbook = Workbook::from_json_str(
            r#"{"sheets": {
                "bad": {"rows": [{"Widget": "A", "Tile": "B"}]},
                "noisy": {"rows": [{"Name": "A", "EV": "maybe"}]}
            }}"#,
        )
        .unwrap();
        let report = validate_workbook(&workbook);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.warning_count(), 1);
        assert!(report.sheets[0].error.as_deref().unwrap().contains("ambiguous"));
    }
}
