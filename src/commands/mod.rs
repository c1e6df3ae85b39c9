//! @acp:module "Commands"
//! @acp:summary "CLI command implementations"
//! @acp:domain cli
//! @acp:layer handler
//!
//! Each command is in its own submodule and takes an already merged
//! [`crate::Config`].

pub mod explain;
pub mod init;
pub mod list;
pub mod plan;
pub mod validate;

pub use explain::{execute_explain, ExplainOptions};
pub use init::{execute_init, InitOptions};
pub use list::{execute_list, ListTarget};
pub use plan::{execute_plan, generate_plan, PlanOptions, PlanOutput};
pub use validate::{execute_validate, validate_workbook, ValidateOptions, ValidationReport};
