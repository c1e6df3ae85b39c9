//! @acp:module "Matrix Schema Mapping"
//! @acp:summary "Validated mapping of sheet headers onto widget fields and attribute columns"
//! @acp:domain cli
//! @acp:layer logic

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{CxmError, Result};

/// Explicit header names for reserved fields, set per sheet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnOverrides {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Result of mapping one sheet's headers
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMap {
    pub name: String,
    pub section: Option<String>,
    pub status: Option<String>,
    pub image: Option<String>,
    /// Attribute columns in header order
    pub attributes: Vec<String>,
}

impl ColumnMap {
    /// Whether `header` is one of the reserved field columns
    pub fn is_field(&self, header: &str) -> bool {
        self.name == header
            || self.section.as_deref() == Some(header)
            || self.status.as_deref() == Some(header)
            || self.image.as_deref() == Some(header)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Section,
    Status,
    Image,
}

impl Field {
    const ALL: [Field; 4] = [Field::Name, Field::Section, Field::Status, Field::Image];

    fn label(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Section => "section",
            Field::Status => "status",
            Field::Image => "image",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Field::Name => &["name", "widget", "widget name", "element", "page", "tile"],
            Field::Section => &["section", "section name", "group"],
            Field::Status => &["status", "on/off", "enabled"],
            Field::Image => &["image", "image ref", "image url", "img"],
        }
    }

    fn override_in(self, overrides: &ColumnOverrides) -> Option<&str> {
        match self {
            Field::Name => overrides.name.as_deref(),
            Field::Section => overrides.section.as_deref(),
            Field::Status => overrides.status.as_deref(),
            Field::Image => overrides.image.as_deref(),
        }
    }
}

/// Lowercase, collapse whitespace, treat `_` and `-` as spaces
pub fn normalize_header(header: &str) -> String {
    header
        .replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Map sheet headers onto reserved fields and attribute columns.
///
/// Explicit overrides win. Otherwise each field is matched against its known
/// spellings; no match for the name field, or more than one match for any
/// field, is an error rather than a guess. So is a header repeated after
/// trimming. Headers spelled like a reserved field never become attributes.
pub fn map_columns(
    sheet: &str,
    headers: &[String],
    overrides: &ColumnOverrides,
    ignore: &[String],
) -> Result<ColumnMap> {
    let headers: Vec<&str> = headers
        .iter()
        .map(|h| h.trim())
        .filter(|h| !h.is_empty())
        .collect();
    let ignored: Vec<String> = ignore.iter().map(|h| normalize_header(h)).collect();

    // Two cells under one header would give a widget two directives for it
    let mut seen = HashSet::new();
    for header in headers.iter().filter(|h| !ignored.contains(&normalize_header(h))) {
        if !seen.insert(*header) {
            return Err(CxmError::DuplicateColumn {
                sheet: sheet.to_string(),
                column: header.to_string(),
            });
        }
    }

    let resolve = |field: Field| -> Result<Option<String>> {
        if let Some(wanted) = field.override_in(overrides) {
            let wanted_norm = normalize_header(wanted);
            return match headers.iter().find(|h| normalize_header(h) == wanted_norm) {
                Some(h) => Ok(Some(h.to_string())),
                None => Err(CxmError::config(format!(
                    "sheet '{}' maps {} to missing column '{}'",
                    sheet,
                    field.label(),
                    wanted
                ))),
            };
        }

        let candidates: Vec<String> = headers
            .iter()
            .filter(|h| field.aliases().contains(&normalize_header(h).as_str()))
            .map(|h| h.to_string())
            .collect();

        match candidates.len() {
            0 => Ok(None),
            1 => Ok(candidates.into_iter().next()),
            _ => Err(CxmError::AmbiguousColumn {
                sheet: sheet.to_string(),
                field: field.label().to_string(),
                candidates,
            }),
        }
    };

    let name = resolve(Field::Name)?.ok_or_else(|| CxmError::MissingNameColumn {
        sheet: sheet.to_string(),
        columns: headers.iter().map(|h| h.to_string()).collect(),
    })?;
    let section = resolve(Field::Section)?;
    let status = resolve(Field::Status)?;
    let image = resolve(Field::Image)?;

    let mut map = ColumnMap {
        name,
        section,
        status,
        image,
        attributes: Vec::new(),
    };

    for header in headers {
        let normalized = normalize_header(header);
        if map.is_field(header) || ignored.contains(&normalized) {
            continue;
        }
        if Field::ALL.iter().any(|f| f.aliases().contains(&normalized.as_str())) {
            tracing::warn!(
                sheet,
                column = header,
                "Column matches a reserved field but another column was mapped to it, ignoring"
            );
            continue;
        }
        map.attributes.push(header.to_string());
    }

    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_maps_alternate_name_spelling() {
        let map = map_columns(
            "res",
            &headers(&["Widget_Name", "Section", "EV", "TOU Rate"]),
            &ColumnOverrides::default(),
            &[],
        )
        .unwrap();
        assert_eq!(map.name, "Widget_Name");
        assert_eq!(map.section.as_deref(), Some("Section"));
        assert_eq!(map.status, None);
        assert_eq!(map.attributes, vec!["EV", "TOU Rate"]);
    }

    #[test]
    fn test_missing_name_column_is_fatal() {
        let err = map_columns(
            "res",
            &headers(&["Section", "EV"]),
            &ColumnOverrides::default(),
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, CxmError::MissingNameColumn { .. }));
    }

    #[test]
    fn test_ambiguous_name_column_is_fatal() {
        let err = map_columns(
            "res",
            &headers(&["Widget", "Element", "EV"]),
            &ColumnOverrides::default(),
            &[],
        )
        .unwrap_err();
        match err {
            CxmError::AmbiguousColumn {
                field, candidates, ..
            } => {
                assert_eq!(field, "name");
                assert_eq!(candidates, vec!["Widget", "Element"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_override_resolves_ambiguity() {
        let overrides = ColumnOverrides {
            name: Some("element".to_string()),
            ..Default::default()
        };
        let map = map_columns(
            "res",
            &headers(&["Widget", "Element", "EV"]),
            &overrides,
            &["widget".to_string()],
        )
        .unwrap();
        assert_eq!(map.name, "Element");
        assert_eq!(map.attributes, vec!["EV"]);
    }

    #[test]
    fn test_override_to_missing_column_errors() {
        let overrides = ColumnOverrides {
            status: Some("Visible".to_string()),
            ..Default::default()
        };
        let err = map_columns("res", &headers(&["Name", "EV"]), &overrides, &[]).unwrap_err();
        assert!(matches!(err, CxmError::Config(_)));
    }

    #[test]
    fn test_repeated_attribute_header_is_fatal() {
        let err = map_columns(
            "res",
            &headers(&["Name", "Section", "EV", " EV "]),
            &ColumnOverrides::default(),
            &[],
        )
        .unwrap_err();
        match err {
            CxmError::DuplicateColumn { sheet, column } => {
                assert_eq!(sheet, "res");
                assert_eq!(column, "EV");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_repeated_ignored_header_is_allowed() {
        let map = map_columns(
            "res",
            &headers(&["Name", "Notes", "EV", "Notes"]),
            &ColumnOverrides::default(),
            &["notes".to_string()],
        )
        .unwrap();
        assert_eq!(map.attributes, vec!["EV"]);
    }

    #[test]
    fn test_overridden_alias_column_is_not_an_attribute() {
        let overrides = ColumnOverrides {
            name: Some("Widget".to_string()),
            ..Default::default()
        };
        let map = map_columns(
            "res",
            &headers(&["Widget", "Name", "EV"]),
            &overrides,
            &[],
        )
        .unwrap();
        assert_eq!(map.name, "Widget");
        assert_eq!(map.attributes, vec!["EV"]);
    }

    #[test]
    fn test_image_and_status_are_not_attributes() {
        let map = map_columns(
            "res",
            &headers(&["Name", "Status", "Image URL", "Solar"]),
            &ColumnOverrides::default(),
            &[],
        )
        .unwrap();
        assert_eq!(map.status.as_deref(), Some("Status"));
        assert_eq!(map.image.as_deref(), Some("Image URL"));
        assert_eq!(map.attributes, vec!["Solar"]);
    }
}
