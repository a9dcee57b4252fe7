//! Generator configuration: YAML file plus environment overrides
use mspec_core::ReportError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_OUTPUT_PATH: &str = "MSPEC_REPORT_PATH";
pub const ENV_TIMING: &str = "MSPEC_REPORT_TIMING";
pub const ENV_TEMPLATES: &str = "MSPEC_REPORT_TEMPLATES";

/// What to do when the output path is neither a directory nor a file target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnclassifiedPathPolicy {
    #[default]
    Error,
    /// Write nothing and succeed
    Ignore,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub output_path: PathBuf,
    #[serde(default)]
    pub include_timing_info: bool,
    #[serde(default)]
    pub unclassified_path: UnclassifiedPathPolicy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates_path: Option<PathBuf>,
}

impl GeneratorConfig {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
            include_timing_info: false,
            unclassified_path: UnclassifiedPathPolicy::default(),
            templates_path: None,
        }
    }

    pub fn with_timing_info(mut self, include: bool) -> Self {
        self.include_timing_info = include;
        self
    }

    pub fn with_unclassified_path(mut self, policy: UnclassifiedPathPolicy) -> Self {
        self.unclassified_path = policy;
        self
    }

    pub fn load(path: &Path) -> Result<Self, ReportError> {
        let content = std::fs::read_to_string(path).map_err(|e| ReportError::io(path, e))?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ReportError> {
        serde_yaml::from_str(yaml).map_err(|e| ReportError::Config(e.to_string()))
    }

    /// Apply `MSPEC_REPORT_*` variables from the process environment.
    pub fn apply_env_overrides(self) -> Result<Self, ReportError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self, ReportError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_OUTPUT_PATH) {
            self.output_path = PathBuf::from(path);
        }
        if let Some(raw) = lookup(ENV_TIMING) {
            self.include_timing_info = parse_flag(&raw).ok_or_else(|| {
                ReportError::Config(format!("{} must be true/false, got '{}'", ENV_TIMING, raw))
            })?;
        }
        if let Some(path) = lookup(ENV_TEMPLATES) {
            self.templates_path = Some(PathBuf::from(path));
        }
        Ok(self)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
