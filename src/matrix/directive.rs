//! @acp:module "Matrix Directive Parser"
//! @acp:summary "Normalize raw spreadsheet cells into directives and statuses"
//! @acp:domain cli
//! @acp:layer logic
//!
//! Rule tables come from several hand-maintained spreadsheets that never
//! agreed on a vocabulary: numeric 0/non-zero, `KILL`/`PASS` strings, `x`
//! markers and blank cells all show up. Everything is folded into
//! [`Directive`] here so the evaluator never looks at raw values.

use serde_json::Value;
use thiserror::Error;

use super::types::{Directive, WidgetStatus};

/// A cell that could not be read; callers degrade it to Pass (or no status)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CellError {
    #[error("unrecognized value '{0}'")]
    Unrecognized(String),

    #[error("rank {0} is not positive")]
    NonPositiveRank(f64),

    #[error("unsupported cell type")]
    UnsupportedType,
}

/// Parse one attribute cell
pub fn parse_directive(cell: &Value) -> Result<Directive, CellError> {
    match cell {
        Value::Null => Ok(Directive::Pass),
        Value::Bool(true) => Ok(Directive::Include),
        Value::Bool(false) => Ok(Directive::Pass),
        Value::Number(n) => rank_from(n.as_f64().unwrap_or(f64::NAN)),
        Value::String(s) => parse_directive_str(s),
        Value::Array(_) | Value::Object(_) => Err(CellError::UnsupportedType),
    }
}

fn parse_directive_str(raw: &str) -> Result<Directive, CellError> {
    let s = raw.trim();
    match s.to_ascii_lowercase().as_str() {
        "" | "-" | "pass" | "no" | "n" | "false" => Ok(Directive::Pass),
        "kill" | "k" | "x-kill" => Ok(Directive::Kill),
        "include" | "inc" | "x" | "yes" | "y" | "true" => Ok(Directive::Include),
        _ => match s.parse::<f64>() {
            Ok(n) => rank_from(n),
            Err(_) => Err(CellError::Unrecognized(s.to_string())),
        },
    }
}

// Zero is the "off" value of the numeric vocabulary, not a rank.
fn rank_from(n: f64) -> Result<Directive, CellError> {
    if n == 0.0 {
        Ok(Directive::Pass)
    } else if n.is_finite() && n > 0.0 {
        Ok(Directive::Rank(n))
    } else {
        Err(CellError::NonPositiveRank(n))
    }
}

/// Parse a status cell; blank means "no status"
pub fn parse_status(cell: &Value) -> Result<Option<WidgetStatus>, CellError> {
    match cell {
        Value::Null => Ok(None),
        Value::Bool(b) => Ok(Some(if *b { WidgetStatus::On } else { WidgetStatus::Off })),
        Value::Number(n) => match n.as_f64() {
            Some(v) if v == 0.0 => Ok(Some(WidgetStatus::Off)),
            Some(v) if v == 1.0 => Ok(Some(WidgetStatus::On)),
            _ => Err(CellError::Unrecognized(n.to_string())),
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "" => Ok(None),
            "on" | "yes" | "y" | "true" | "1" => Ok(Some(WidgetStatus::On)),
            "off" | "no" | "n" | "false" | "0" => Ok(Some(WidgetStatus::Off)),
            other => Err(CellError::Unrecognized(other.to_string())),
        },
        Value::Array(_) | Value::Object(_) => Err(CellError::UnsupportedType),
    }
}

/// Text content of a name/section/image cell. Blank cells read as `None`.
pub fn cell_text(cell: &Value) -> Option<String> {
    let text = match cell {
        Value::Null => return None,
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(_) | Value::Object(_) => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_vocabulary() {
        assert_eq!(parse_directive(&json!("PASS")).unwrap(), Directive::Pass);
        assert_eq!(parse_directive(&json!(" Kill ")).unwrap(), Directive::Kill);
        assert_eq!(parse_directive(&json!("include")).unwrap(), Directive::Include);
        assert_eq!(parse_directive(&json!("x")).unwrap(), Directive::Include);
        assert_eq!(parse_directive(&json!("")).unwrap(), Directive::Pass);
        assert_eq!(parse_directive(&Value::Null).unwrap(), Directive::Pass);
    }

    #[test]
    fn test_numeric_vocabulary() {
        assert_eq!(parse_directive(&json!(0)).unwrap(), Directive::Pass);
        assert_eq!(parse_directive(&json!(3)).unwrap(), Directive::Rank(3.0));
        assert_eq!(parse_directive(&json!("2")).unwrap(), Directive::Rank(2.0));
        assert_eq!(parse_directive(&json!(1.5)).unwrap(), Directive::Rank(1.5));
    }

    #[test]
    fn test_bad_cells_are_errors() {
        assert_eq!(
            parse_directive(&json!("second")),
            Err(CellError::Unrecognized("second".to_string()))
        );
        assert_eq!(
            parse_directive(&json!(-2)),
            Err(CellError::NonPositiveRank(-2.0))
        );
        assert_eq!(
            parse_directive(&json!(["a"])),
            Err(CellError::UnsupportedType)
        );
    }

    #[test]
    fn test_status_cells() {
        assert_eq!(parse_status(&json!("OFF")).unwrap(), Some(WidgetStatus::Off));
        assert_eq!(parse_status(&json!("on")).unwrap(), Some(WidgetStatus::On));
        assert_eq!(parse_status(&json!(0)).unwrap(), Some(WidgetStatus::Off));
        assert_eq!(parse_status(&json!(" ")).unwrap(), None);
        assert!(parse_status(&json!("maybe")).is_err());
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&json!("  Usage ")), Some("Usage".to_string()));
        assert_eq!(cell_text(&json!(42)), Some("42".to_string()));
        assert_eq!(cell_text(&json!("")), None);
        assert_eq!(cell_text(&Value::Null), None);
    }
}
