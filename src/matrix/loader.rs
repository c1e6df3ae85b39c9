//! @acp:module "Matrix Loader"
//! @acp:summary "Load rule table workbooks and normalize sheets into profile tables"
//! @acp:domain cli
//! @acp:layer io

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use super::directive::{cell_text, parse_directive, parse_status};
use super::schema::{map_columns, normalize_header, ColumnOverrides};
use super::types::{AttributeInfo, Directive, ProfileTable, WidgetRecord};
use crate::error::{CxmError, Result};

/// A rule table document holding one sheet per customer segment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workbook {
    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default)]
    pub metadata: Option<WorkbookMetadata>,

    /// Attribute catalog shown next to the selector
    #[serde(default)]
    pub attributes: Vec<AttributeInfo>,

    pub sheets: BTreeMap<String, RawSheet>,
}

fn default_version() -> String {
    "1.0".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkbookMetadata {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Sheet as written in the document, before schema mapping.
///
/// Either `rows` (one object per widget) or `grid` (header row followed by
/// cell rows, as exported from a spreadsheet) is filled in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSheet {
    #[serde(default)]
    pub columns: ColumnOverrides,

    #[serde(default)]
    pub ignore: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rows: Vec<Map<String, Value>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub grid: Vec<Vec<Value>>,
}

impl RawSheet {
    /// Headers plus cell rows aligned to them
    fn tabulate(&self, sheet: &str) -> Result<(Vec<String>, Vec<Vec<Value>>)> {
        if !self.rows.is_empty() && !self.grid.is_empty() {
            return Err(CxmError::config(format!(
                "sheet '{}' defines both rows and grid",
                sheet
            )));
        }

        if let Some((header_row, cells)) = self.grid.split_first() {
            let headers: Vec<String> = header_row
                .iter()
                .map(|c| cell_text(c).unwrap_or_default())
                .collect();
            let rows = cells
                .iter()
                .map(|row| {
                    (0..headers.len())
                        .map(|i| row.get(i).cloned().unwrap_or(Value::Null))
                        .collect()
                })
                .collect();
            return Ok((headers, rows));
        }

        let mut headers: Vec<String> = Vec::new();
        let mut trimmed_rows: Vec<BTreeMap<&str, &Value>> = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            let mut trimmed = BTreeMap::new();
            for (key, value) in row {
                let key = key.trim();
                if trimmed.insert(key, value).is_some() && !self.is_ignored(key) {
                    return Err(CxmError::DuplicateColumn {
                        sheet: sheet.to_string(),
                        column: key.to_string(),
                    });
                }
                if !headers.iter().any(|h| h == key) {
                    headers.push(key.to_string());
                }
            }
            trimmed_rows.push(trimmed);
        }
        let rows = trimmed_rows
            .iter()
            .map(|trimmed| {
                headers
                    .iter()
                    .map(|h| trimmed.get(h.as_str()).map(|v| (*v).clone()).unwrap_or(Value::Null))
                    .collect()
            })
            .collect();
        Ok((headers, rows))
    }

    fn is_ignored(&self, header: &str) -> bool {
        let header = normalize_header(header);
        self.ignore.iter().any(|i| normalize_header(i) == header)
    }
}

/// Non-fatal problem found while normalizing a sheet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadWarning {
    pub sheet: String,
    /// 1-based data row (header excluded)
    pub row: usize,
    pub column: Option<String>,
    pub message: String,
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.column {
            Some(col) => write!(f, "{} row {} [{}]: {}", self.sheet, self.row, col, self.message),
            None => write!(f, "{} row {}: {}", self.sheet, self.row, self.message),
        }
    }
}

/// A normalized sheet and the degradations applied while reading it
#[derive(Debug, Clone)]
pub struct LoadedSheet {
    pub table: ProfileTable,
    pub warnings: Vec<LoadWarning>,
}

impl Workbook {
    /// Load a workbook from a `.json`, `.yaml` or `.yml` file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase()) {
            Some(ext) if ext == "json" => Self::from_json_str(&content),
            Some(ext) if ext == "yaml" || ext == "yml" => Self::from_yaml_str(&content),
            _ => Err(CxmError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Workbook compiled into the binary, used when no file is configured
    pub fn builtin() -> Result<Self> {
        let json = include_str!("../../matrices/cx.defaults.json");
        Self::from_json_str(json)
    }

    pub fn sheet_keys(&self) -> Vec<&str> {
        self.sheets.keys().map(|k| k.as_str()).collect()
    }

    /// Pick the sheet to evaluate: the requested one, or the only one
    pub fn resolve_sheet_key(&self, requested: Option<&str>) -> Result<String> {
        match requested {
            Some(key) if self.sheets.contains_key(key) => Ok(key.to_string()),
            Some(key) => Err(self.unknown_sheet(key)),
            None if self.sheets.len() == 1 => Ok(self.sheets.keys().next().cloned().unwrap_or_default()),
            None => Err(CxmError::SheetRequired {
                count: self.sheets.len(),
            }),
        }
    }

    pub fn attribute_info(&self, id: &str) -> Option<&AttributeInfo> {
        self.attributes.iter().find(|a| a.id == id)
    }

    /// Normalized table for `key`, discarding warnings (they are still logged)
    pub fn sheet(&self, key: &str) -> Result<ProfileTable> {
        self.load_sheet(key).map(|loaded| loaded.table)
    }

    /// Map columns, normalize every cell and build the table for `key`
    pub fn load_sheet(&self, key: &str) -> Result<LoadedSheet> {
        let raw = self.sheets.get(key).ok_or_else(|| self.unknown_sheet(key))?;
        let (headers, rows) = raw.tabulate(key)?;
        let map = map_columns(key, &headers, &raw.columns, &raw.ignore)?;

        let index_of = |header: &str| headers.iter().position(|h| h == header);
        let name_idx = index_of(&map.name);
        let section_idx = map.section.as_deref().and_then(index_of);
        let status_idx = map.status.as_deref().and_then(index_of);
        let image_idx = map.image.as_deref().and_then(index_of);
        let attr_idx: Vec<(String, usize)> = map
            .attributes
            .iter()
            .filter_map(|a| index_of(a).map(|i| (a.clone(), i)))
            .collect();

        let mut warnings = Vec::new();
        let mut warn = |row: usize, column: Option<&str>, message: String| {
            tracing::warn!(sheet = key, row, column = column.unwrap_or(""), "{}", message);
            warnings.push(LoadWarning {
                sheet: key.to_string(),
                row,
                column: column.map(|c| c.to_string()),
                message,
            });
        };

        let cell = |row: &[Value], idx: Option<usize>| -> Value {
            idx.and_then(|i| row.get(i)).cloned().unwrap_or(Value::Null)
        };

        let mut records = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            let row_no = i + 1;
            let name = cell_text(&cell(row, name_idx)).unwrap_or_default();
            if name.is_empty() {
                warn(
                    row_no,
                    Some(map.name.as_str()),
                    "row has no widget name and is never shown".to_string(),
                );
            }

            let section = cell_text(&cell(row, section_idx)).unwrap_or_default();
            let mut record = WidgetRecord::new(name, section);
            record.image_ref = cell_text(&cell(row, image_idx));

            if let Some(column) = map.status.as_deref() {
                match parse_status(&cell(row, status_idx)) {
                    Ok(status) => record.status = status,
                    Err(e) => warn(row_no, Some(column), format!("{}, status ignored", e)),
                }
            }

            for (attr, idx) in &attr_idx {
                let directive = match parse_directive(&row[*idx]) {
                    Ok(d) => d,
                    Err(e) => {
                        warn(row_no, Some(attr.as_str()), format!("{}, treated as pass", e));
                        Directive::Pass
                    }
                };
                record.directives.insert(attr.clone(), directive);
            }

            records.push(record);
        }

        let table = ProfileTable::with_attributes(key, map.attributes.clone(), records)?;
        tracing::debug!(
            sheet = key,
            widgets = table.len(),
            attributes = table.attributes().len(),
            "Loaded sheet"
        );

        Ok(LoadedSheet { table, warnings })
    }

    fn unknown_sheet(&self, key: &str) -> CxmError {
        CxmError::UnknownSheet {
            sheet: key.to_string(),
            available: self.sheets.keys().cloned().collect(),
        }
    }
}
