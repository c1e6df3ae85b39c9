//! @acp:module "Configuration"
//! @acp:summary "Layered configuration: built-in defaults, user file, project file, CLI overrides"
//! @acp:domain cli
//! @acp:layer config

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::matrix::{AttributePrecedence, PlanRequest, SectionOrder, SectionPolicy, Workbook};

/// Default project config file name
pub const CONFIG_FILE: &str = ".cxm.config.json";

fn default_version() -> String {
    "1.0.0".to_string()
}

/// @acp:summary "Main configuration structure"
/// @acp:lock normal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: String,

    /// Rule table workbook (.json/.yaml); the built-in workbook when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workbook: Option<PathBuf>,

    /// Sheet key to evaluate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,

    /// Customer attributes to personalize for
    #[serde(default)]
    pub selected_attributes: Vec<String>,

    /// Widgets hidden regardless of attributes
    #[serde(default)]
    pub kill_widgets: Vec<String>,

    /// Attribute tie-break order used when ranking
    #[serde(default)]
    pub attribute_precedence: AttributePrecedence,

    /// Display order of sections
    #[serde(default)]
    pub section_order: SectionOrder,

    /// Policy for sections missing from `section_order`
    #[serde(default)]
    pub unlisted_sections: SectionPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            workbook: None,
            sheet: None,
            selected_attributes: Vec::new(),
            kill_widgets: Vec::new(),
            attribute_precedence: AttributePrecedence::default(),
            section_order: SectionOrder::default(),
            unlisted_sections: SectionPolicy::default(),
        }
    }
}

/// @acp:summary "Config file layer; only the fields it sets are applied"
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialConfig {
    #[serde(default)]
    pub workbook: Option<PathBuf>,
    #[serde(default)]
    pub sheet: Option<String>,
    #[serde(default)]
    pub selected_attributes: Option<Vec<String>>,
    /// Accumulates across layers
    #[serde(default)]
    pub kill_widgets: Vec<String>,
    #[serde(default)]
    pub attribute_precedence: Option<AttributePrecedence>,
    #[serde(default)]
    pub section_order: Option<SectionOrder>,
    #[serde(default)]
    pub unlisted_sections: Option<SectionPolicy>,
}

impl PartialConfig {
    /// Read a layer; a relative `workbook` resolves against the file's directory
    pub fn load<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut layer: PartialConfig = serde_json::from_str(&content)?;
        if let (Some(workbook), Some(dir)) = (layer.workbook.as_ref(), path.parent()) {
            if workbook.is_relative() && !dir.as_os_str().is_empty() {
                layer.workbook = Some(dir.join(workbook));
            }
        }
        Ok(layer)
    }
}

/// CLI overrides, applied last
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub workbook: Option<PathBuf>,
    pub sheet: Option<String>,
    /// Replaces the configured selection when non-empty
    pub attributes: Vec<String>,
    /// Added to the configured kill list
    pub kill: Vec<String>,
    pub drop_unlisted: bool,
}

impl Config {
    /// @acp:summary "Load config from a full config file"
    pub fn load<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// @acp:summary "Save config to a file"
    pub fn save<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// @acp:summary "Load from default location or fall back to defaults"
    pub fn load_or_default() -> Self {
        Self::load(CONFIG_FILE).unwrap_or_default()
    }

    /// User-level config file location
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("cxm").join("config.json"))
    }

    /// Merge layers: defaults, user config (if present), project config (if present)
    pub fn load_layered(project: Option<&Path>) -> crate::Result<Self> {
        let mut config = Config::default();

        if let Some(user) = Self::user_config_path().filter(|p| p.exists()) {
            tracing::debug!(path = %user.display(), "Applying user config");
            config.apply(PartialConfig::load(&user)?);
        }

        if let Some(path) = project.filter(|p| p.exists()) {
            tracing::debug!(path = %path.display(), "Applying project config");
            config.apply(PartialConfig::load(path)?);
        }

        Ok(config)
    }

    /// Apply one config layer on top of this one
    pub fn apply(&mut self, layer: PartialConfig) {
        if layer.workbook.is_some() {
            self.workbook = layer.workbook;
        }
        if layer.sheet.is_some() {
            self.sheet = layer.sheet;
        }
        if let Some(selected) = layer.selected_attributes {
            self.selected_attributes = selected;
        }
        extend_unique(&mut self.kill_widgets, layer.kill_widgets);
        if let Some(precedence) = layer.attribute_precedence {
            self.attribute_precedence = precedence;
        }
        if let Some(order) = layer.section_order {
            self.section_order = order;
        }
        if let Some(policy) = layer.unlisted_sections {
            self.unlisted_sections = policy;
        }
    }

    /// Apply command-line overrides
    pub fn apply_cli(&mut self, cli: &CliOverrides) {
        if let Some(ref workbook) = cli.workbook {
            self.workbook = Some(workbook.clone());
        }
        if let Some(ref sheet) = cli.sheet {
            self.sheet = Some(sheet.clone());
        }
        if !cli.attributes.is_empty() {
            self.selected_attributes = cli.attributes.clone();
        }
        extend_unique(&mut self.kill_widgets, cli.kill.clone());
        if cli.drop_unlisted {
            self.unlisted_sections = SectionPolicy::Drop;
        }
    }

    /// Load the configured workbook, or the built-in one
    pub fn workbook(&self) -> crate::Result<Workbook> {
        match self.workbook {
            Some(ref path) => Workbook::load(path),
            None => Workbook::builtin(),
        }
    }

    /// Evaluation inputs described by this config
    pub fn plan_request(&self) -> PlanRequest {
        PlanRequest {
            selected: self.selected_attributes.iter().cloned().collect(),
            kill_list: self.kill_widgets.iter().cloned().collect(),
            precedence: self.attribute_precedence.clone(),
            section_order: self.section_order.clone(),
            section_policy: self.unlisted_sections,
        }
    }
}

fn extend_unique(target: &mut Vec<String>, items: Vec<String>) {
    for item in items {
        if !target.contains(&item) {
            target.push(item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.workbook.is_none());
        assert_eq!(config.attribute_precedence.position("EV"), Some(0));
        assert!(config.section_order.contains("Overview"));
        assert_eq!(config.unlisted_sections, SectionPolicy::Append);
    }

    #[test]
    fn test_layer_replaces_set_fields_and_accumulates_kills() {
        let mut config = Config {
            kill_widgets: vec!["Bill Forecast".to_string()],
            selected_attributes: vec!["EV".to_string()],
            ..Default::default()
        };
        let layer: PartialConfig = serde_json::from_str(
            r#"{"sheet": "res", "killWidgets": ["Demand Peaks", "Bill Forecast"], "unlistedSections": "drop"}"#,
        )
        .unwrap();
        config.apply(layer);

        assert_eq!(config.sheet.as_deref(), Some("res"));
        assert_eq!(config.selected_attributes, vec!["EV"]);
        assert_eq!(config.kill_widgets, vec!["Bill Forecast", "Demand Peaks"]);
        assert_eq!(config.unlisted_sections, SectionPolicy::Drop);
    }

    #[test]
    fn test_cli_selection_replaces_config_selection() {
        let mut config = Config {
            selected_attributes: vec!["EV".to_string()],
            ..Default::default()
        };
        config.apply_cli(&CliOverrides {
            attributes: vec!["TOU".to_string(), "Solar".to_string()],
            kill: vec!["Energy Flow".to_string()],
            drop_unlisted: true,
            ..Default::default()
        });
        let request = config.plan_request();
        assert_eq!(request.selected.len(), 2);
        assert!(request.selected.contains("TOU"));
        assert!(request.kill_list.contains("Energy Flow"));
        assert_eq!(request.section_policy, SectionPolicy::Drop);
    }

    #[test]
    fn test_empty_cli_selection_keeps_config() {
        let mut config = Config {
            selected_attributes: vec!["EV".to_string()],
            ..Default::default()
        };
        config.apply_cli(&CliOverrides::default());
        assert_eq!(config.selected_attributes, vec!["EV"]);
    }

    #[test]
    fn test_config_round_trip_uses_camel_case() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("attributePrecedence"));
        assert!(json.contains("\"unlistedSections\":\"append\""));
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Config::default());
    }
}
