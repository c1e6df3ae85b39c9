#![forbid(unsafe_code)]

//! @acp:module "CXM Library"
//! @acp:summary "Rule-table driven dashboard widget applicability and ordering"
//! @acp:domain cli
//! @acp:layer api
//! @acp:stability stable
//!
//! # CXM - Dynamic CX configuration matrix
//!
//! Decides which dashboard widgets a customer sees, and in what order,
//! from a declarative rule table instead of hardcoded logic.
//!
//! ## Features
//!
//! - **Kill dominance**: one disqualifying attribute vetoes a widget
//! - **Precedence ranking**: per-attribute ranks, resolved in a fixed attribute order
//! - **Sections**: ordered widgets grouped into a fixed section sequence
//! - **Loose input**: JSON/YAML workbooks in record or spreadsheet-grid form
//!
//! ## Example
//!
//! ```rust,no_run
//! use cxm::{build_plan, PlanRequest, Workbook};
//!
//! fn main() -> anyhow::Result<()> {
//!     let workbook = Workbook::builtin()?;
//!     let table = workbook.sheet("residential-electric-ami")?;
//!
//!     let request = PlanRequest::default().select("EV").select("TOU");
//!     let plan = build_plan(&table, &request);
//!
//!     for section in &plan.sections {
//!         println!("{}: {:?}", section.name, section.widgets);
//!     }
//!     Ok(())
//! }
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod matrix;

// Re-exports
pub use config::{CliOverrides, Config, PartialConfig};
pub use error::{CxmError, Result};
pub use matrix::{
    build_plan, evaluate, explain, order, order_names, partition, AttributeInfo,
    AttributePrecedence, Directive, DisplayPlan, LoadWarning, OutputFormat, Placement,
    PlanRequest, PlannedSection, PlannedWidget, ProfileTable, Reason, SectionOrder,
    SectionPolicy, Verdict, WidgetRecord, WidgetStatus, Workbook, UNASSIGNED_SECTION,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
