//! @acp:module "Explain Command"
//! @acp:summary "Show why each widget is or is not included"
//! @acp:domain cli
//! @acp:layer handler

use anyhow::{Context, Result};

use crate::config::Config;
use crate::matrix::{explain, render_verdicts, OutputFormat, Verdict};

use super::plan::print_diagnostics;

/// Options for the explain command
#[derive(Debug, Clone, Default)]
pub struct ExplainOptions {
    pub format: OutputFormat,
    /// Only list widgets that are not shown
    pub hidden_only: bool,
}

/// Execute the explain command
pub fn execute_explain(options: ExplainOptions, config: &Config) -> Result<()> {
    let workbook = config
        .workbook()
        .context("Failed to load rule table workbook")?;
    let key = workbook.resolve_sheet_key(config.sheet.as_deref())?;
    let loaded = workbook.load_sheet(&key)?;
    let request = config.plan_request();

    let unknown: Vec<String> = request
        .selected
        .iter()
        .filter(|a| !loaded.table.has_attribute(a))
        .cloned()
        .collect();
    if options.format != OutputFormat::Json {
        print_diagnostics(&loaded.warnings, &unknown);
        println!("{}\n", summary_line(&key, &request.precedence.arrange(&request.selected)));
    }

    let mut verdicts: Vec<Verdict> = explain(
        &loaded.table,
        &request.selected,
        &request.kill_list,
        &request.precedence,
    );
    if options.hidden_only {
        verdicts.retain(|v| !v.included);
    }

    println!("{}", render_verdicts(&verdicts, options.format)?);
    Ok(())
}

/// Intro line mirroring the rule summary shown next to the selector
pub fn summary_line(sheet: &str, selected: &[String]) -> String {
    if selected.is_empty() {
        format!(
            "{}: no dimensions selected, every widget that is not switched off is shown.",
            sheet
        )
    } else {
        format!(
            "{}: based on the selected dimensions ({}), 'Include' overrides 'Pass', and 'Kill' overrides both 'Include' and 'Pass'.",
            sheet,
            selected.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_line() {
        assert!(summary_line("res", &[]).contains("no dimensions selected"));
        let line = summary_line("res", &["EV".to_string(), "TOU".to_string()]);
        assert!(line.contains("(EV, TOU)"));
    }
}
