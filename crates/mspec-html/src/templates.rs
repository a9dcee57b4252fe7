//! Template loading for the HTML report.
//!
//! Templates use the YAML templates-file format:
//! - Multiple named handlebars templates, each usable as a partial
//! - `report` is the entry point and must be present
//! - A bare `template:` file is accepted as the `report` template

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Name of the entry-point template
pub const REPORT_TEMPLATE: &str = "report";

/// Templates shipped with the crate
pub const DEFAULT_TEMPLATES: &str = include_str!("../templates/report.yaml");

/// Top-level templates file structure
#[derive(Debug, Clone, Deserialize)]
pub struct TemplatesFile {
    pub version: String,
    pub templates: BTreeMap<String, Template>,
}

/// A single template definition
#[derive(Debug, Clone, Deserialize)]
pub struct Template {
    #[serde(default)]
    pub description: String,
    pub template: String,
}

/// Single-template file format
#[derive(Debug, Deserialize)]
pub struct BareTemplateFile {
    pub template: String,
}

impl TemplatesFile {
    /// Load templates from a YAML file
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            format!("Failed to read templates file {}: {}", path.display(), e)
        })?;
        Self::from_yaml(&content)
    }

    /// Parse templates from YAML content
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        if let Ok(file) = serde_yaml::from_str::<TemplatesFile>(yaml) {
            return file.checked();
        }

        if let Ok(bare) = serde_yaml::from_str::<BareTemplateFile>(yaml) {
            let mut templates = BTreeMap::new();
            templates.insert(
                REPORT_TEMPLATE.to_string(),
                Template {
                    description: "Report template".to_string(),
                    template: bare.template,
                },
            );
            return Ok(TemplatesFile {
                version: "1.0".to_string(),
                templates,
            });
        }

        Err("Failed to parse templates YAML".to_string())
    }

    /// The templates bundled with this crate
    pub fn bundled() -> Result<Self, String> {
        Self::from_yaml(DEFAULT_TEMPLATES)
    }

    fn checked(self) -> Result<Self, String> {
        if self.templates.contains_key(REPORT_TEMPLATE) {
            Ok(self)
        } else {
            Err(format!("Templates file has no '{}' template", REPORT_TEMPLATE))
        }
    }

    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    pub fn list_templates(&self) -> Vec<&str> {
        self.templates.keys().map(|s| s.as_str()).collect()
    }
}
