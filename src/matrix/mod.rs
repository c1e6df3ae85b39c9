//! @acp:module "Matrix"
//! @acp:summary "Rule-table driven widget applicability, ordering and sectioning"
//! @acp:domain cli
//! @acp:layer feature

pub mod directive;
pub mod evaluator;
pub mod loader;
pub mod ordering;
pub mod plan;
pub mod renderer;
pub mod schema;
pub mod types;

pub use evaluator::{evaluate, explain};
pub use loader::{LoadWarning, LoadedSheet, RawSheet, Workbook};
pub use ordering::{order, order_names, partition};
pub use plan::build_plan;
pub use renderer::{render_plan, render_verdicts, OutputFormat};
pub use schema::{map_columns, ColumnMap, ColumnOverrides};
pub use types::*;
