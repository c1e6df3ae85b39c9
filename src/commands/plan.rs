//! @acp:module "Plan Command"
//! @acp:summary "Compute the ordered, sectioned widget plan for a customer profile"
//! @acp:domain cli
//! @acp:layer handler

use anyhow::{Context, Result};
use console::style;
use serde::Serialize;

use crate::config::Config;
use crate::matrix::{build_plan, render_plan, DisplayPlan, LoadWarning, OutputFormat};

/// Options for the plan command
#[derive(Debug, Clone, Default)]
pub struct PlanOptions {
    /// Output format
    pub format: OutputFormat,
}

/// Plan plus the diagnostics gathered while loading its sheet
#[derive(Debug, Clone, Serialize)]
pub struct PlanOutput {
    pub plan: DisplayPlan,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<LoadWarning>,
    /// Selected attributes with no column in the sheet
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unknown_attributes: Vec<String>,
}

/// Execute the plan command
pub fn execute_plan(options: PlanOptions, config: &Config) -> Result<()> {
    let output = generate_plan(config)?;

    if options.format != OutputFormat::Json {
        print_diagnostics(&output.warnings, &output.unknown_attributes);
    }

    println!("{}", render_plan(&output.plan, options.format)?);
    Ok(())
}

/// Load the configured sheet and build its plan
pub fn generate_plan(config: &Config) -> Result<PlanOutput> {
    let workbook = config
        .workbook()
        .context("Failed to load rule table workbook")?;
    let key = workbook.resolve_sheet_key(config.sheet.as_deref())?;
    let loaded = workbook
        .load_sheet(&key)
        .with_context(|| format!("Failed to read sheet '{}'", key))?;

    let request = config.plan_request();
    let unknown_attributes: Vec<String> = request
        .selected
        .iter()
        .filter(|a| !loaded.table.has_attribute(a))
        .cloned()
        .collect();

    let plan = build_plan(&loaded.table, &request);

    Ok(PlanOutput {
        plan,
        warnings: loaded.warnings,
        unknown_attributes,
    })
}

pub(crate) fn print_diagnostics(warnings: &[LoadWarning], unknown_attributes: &[String]) {
    for warning in warnings {
        eprintln!("{} {}", style("!").yellow(), warning);
    }
    if !unknown_attributes.is_empty() {
        eprintln!(
            "{} Unknown attributes ignored: {}",
            style("!").yellow(),
            unknown_attributes.join(", ")
        );
    }
}
