//! Caller-facing run configuration
//!
//! The host build step supplies an already-resolved file set and scalar
//! settings; this struct is the whole contract (no build-tool types leak in).
//! Configurations can also be loaded from YAML or JSON files.

use crate::report::{ReportFormat, ReportSpec};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Everything one analysis run needs from the surrounding build environment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Root against which report paths are expressed relatively
    pub base_dir: PathBuf,

    /// Already-resolved source files to analyze
    pub source_files: Vec<PathBuf>,

    /// Whether the whole file set is test source
    pub test_source: bool,

    /// Source language version, e.g. `17`
    pub source_version: Option<String>,

    /// Compiled-output paths (existence re-checked at request build)
    pub binary_paths: Vec<PathBuf>,

    /// Dependency library paths (existence re-checked at request build)
    pub library_paths: Vec<PathBuf>,

    /// Rule keys to enable, e.g. `java:S1186`
    pub include_rules: Vec<String>,

    /// Rule keys to disable; exclusion wins over inclusion
    pub exclude_rules: Vec<String>,

    /// Per-rule parameter overrides; parameter names are case-sensitive and
    /// passed through to the engine unvalidated
    pub rule_parameters: HashMap<String, HashMap<String, String>>,

    /// Maximum tolerated issue count
    pub max_issues: usize,

    /// Always pass, regardless of the issue count
    pub ignore_failures: bool,

    /// Display one console line per issue
    pub show_issues: bool,

    /// Default directory for report output
    pub reports_dir: PathBuf,

    /// Configured report targets
    pub reports: Vec<ReportSpec>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            source_files: Vec::new(),
            test_source: false,
            source_version: None,
            binary_paths: Vec::new(),
            library_paths: Vec::new(),
            include_rules: Vec::new(),
            exclude_rules: Vec::new(),
            rule_parameters: HashMap::new(),
            max_issues: 0,
            ignore_failures: false,
            show_issues: true,
            reports_dir: PathBuf::from("build/reports/analysis"),
            reports: Vec::new(),
        }
    }
}

impl RunConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a YAML or JSON file, dispatched by extension
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match ext {
            "yaml" | "yml" => Ok(serde_yaml::from_str(&content)?),
            "json" => Ok(serde_json::from_str(&content)?),
            _ => Err(ConfigError::Invalid(format!(
                "Unknown config file format: {}",
                ext
            ))),
        }
    }

    /// Enable a report target
    pub fn with_report(mut self, name: &str, format: ReportFormat) -> Self {
        self.reports.push(ReportSpec::new(name, format));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = RunConfig::new();
        assert_eq!(config.max_issues, 0);
        assert!(!config.ignore_failures);
        assert!(config.show_issues);
        assert!(!config.test_source);
        assert_eq!(config.reports_dir, PathBuf::from("build/reports/analysis"));
        assert!(config.reports.is_empty());
    }

    #[test]
    fn test_yaml_deserialize() {
        let yaml = r#"
base_dir: /project
source_files:
  - src/main/App.java
max_issues: 5
ignore_failures: true
exclude_rules:
  - java:S1186
rule_parameters:
  java:S100:
    Exclude: "^test.*"
reports:
  - name: ci
    format: sarif
  - name: dev
    format: html
    enabled: false
"#;
        let config: RunConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.base_dir, PathBuf::from("/project"));
        assert_eq!(config.max_issues, 5);
        assert!(config.ignore_failures);
        assert_eq!(config.exclude_rules, vec!["java:S1186".to_string()]);
        assert_eq!(
            config.rule_parameters["java:S100"]["Exclude"],
            "^test.*".to_string()
        );
        assert_eq!(config.reports.len(), 2);
        assert_eq!(config.reports[0].format, ReportFormat::Sarif);
        assert!(!config.reports[1].enabled);
    }

    #[test]
    fn test_load_dispatches_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let yaml_path = dir.path().join("run.yaml");
        std::fs::write(&yaml_path, "max_issues: 3\n").unwrap();
        assert_eq!(RunConfig::load(&yaml_path).unwrap().max_issues, 3);

        let json_path = dir.path().join("run.json");
        std::fs::write(&json_path, r#"{"max_issues": 4}"#).unwrap();
        assert_eq!(RunConfig::load(&json_path).unwrap().max_issues, 4);

        let other_path = dir.path().join("run.toml");
        std::fs::write(&other_path, "").unwrap();
        assert!(matches!(
            RunConfig::load(&other_path),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_with_report() {
        let config = RunConfig::new()
            .with_report("analysis", ReportFormat::Text)
            .with_report("ci", ReportFormat::Json);
        assert_eq!(config.reports.len(), 2);
        assert!(config.reports.iter().all(|r| r.enabled));
    }
}
