//! @acp:module "Matrix Renderer"
//! @acp:summary "Text, markdown and JSON output for display plans and verdicts"
//! @acp:domain cli
//! @acp:layer output

use anyhow::{anyhow, Result};

use super::types::*;

/// Output format for plans and explanations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Markdown,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!("Unknown output format: {}", s)),
        }
    }
}

/// Render a display plan
pub fn render_plan(plan: &DisplayPlan, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(plan).map_err(Into::into),
        OutputFormat::Text => Ok(render_plan_text(plan)),
        OutputFormat::Markdown => Ok(render_plan_markdown(plan)),
    }
}

fn selected_label(plan: &DisplayPlan) -> String {
    if plan.selected.is_empty() {
        "none".to_string()
    } else {
        plan.selected.join(", ")
    }
}

fn placement_note(widget: &PlannedWidget) -> String {
    match (&widget.placed_by, widget.rank) {
        (Some(attr), Some(rank)) => format!("{} #{}", attr, rank),
        _ => String::new(),
    }
}

fn render_plan_text(plan: &DisplayPlan) -> String {
    let mut out = format!("Sheet: {} (selected: {})\n", plan.sheet, selected_label(plan));

    if plan.sections.is_empty() {
        out.push_str("\nNo widgets to display.\n");
    }

    let mut position = 0;
    for section in &plan.sections {
        out.push_str(&format!("\n{}\n", section.name));
        for widget in &section.widgets {
            position += 1;
            let note = placement_note(widget);
            let mut line = format!("  {:>2}. {}", position, widget.name);
            if !note.is_empty() {
                line = format!("{:<40} ({})", line, note);
            }
            if let Some(ref image) = widget.image_ref {
                line.push_str(&format!(" [{}]", image));
            }
            out.push_str(&line);
            out.push('\n');
        }
    }

    if !plan.excluded.is_empty() {
        out.push_str(&format!("\nHidden: {}\n", plan.excluded.len()));
    }

    out.trim_end().to_string()
}

fn render_plan_markdown(plan: &DisplayPlan) -> String {
    let mut out = format!(
        "# {}\n\nSelected dimensions: {}\n",
        plan.sheet,
        selected_label(plan)
    );

    for section in &plan.sections {
        out.push_str(&format!("\n## {}\n\n", section.name));
        for widget in &section.widgets {
            let note = placement_note(widget);
            out.push_str(&format!("1. **{}**", widget.name));
            if !note.is_empty() {
                out.push_str(&format!(" _{}_", note));
            }
            if let Some(ref image) = widget.image_ref {
                out.push_str(&format!(" ![{}]({})", widget.name, image));
            }
            out.push('\n');
        }
    }

    out.trim_end().to_string()
}

/// Render per-widget verdicts as an Element / Status / Reason table
pub fn render_verdicts(verdicts: &[Verdict], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(verdicts).map_err(Into::into),
        OutputFormat::Markdown => {
            let mut out = String::from("| Element | Status | Reason |\n|---|---|---|\n");
            for v in verdicts {
                out.push_str(&format!(
                    "| {} | {} | {} |\n",
                    display_name(v),
                    status_label(v),
                    v.reason
                ));
            }
            Ok(out.trim_end().to_string())
        }
        OutputFormat::Text => {
            let width = verdicts
                .iter()
                .map(|v| display_name(v).len())
                .max()
                .unwrap_or(0)
                .max("Element".len());
            let mut out = format!("{:<width$}  {:<12}  {}\n", "Element", "Status", "Reason");
            for v in verdicts {
                out.push_str(&format!(
                    "{:<width$}  {:<12}  {}\n",
                    display_name(v),
                    status_label(v),
                    v.reason
                ));
            }
            Ok(out.trim_end().to_string())
        }
    }
}

fn display_name(verdict: &Verdict) -> &str {
    if verdict.widget.trim().is_empty() {
        "(unnamed)"
    } else {
        &verdict.widget
    }
}

pub fn status_label(verdict: &Verdict) -> &'static str {
    if verdict.included {
        "Included"
    } else {
        "Not Included"
    }
}
