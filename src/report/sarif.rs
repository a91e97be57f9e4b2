//! SARIF (Static Analysis Results Interchange Format) report renderer
//!
//! SARIF 2.1.0 is understood by GitHub code scanning, Azure DevOps, and other
//! CI systems.

use super::ReportRenderer;
use crate::issue::{Issue, Severity};
use serde::Serialize;
use std::collections::BTreeMap;

/// SARIF 2.1.0 renderer
#[derive(Debug)]
pub struct SarifRenderer {
    tool_name: String,
    tool_version: String,
}

impl SarifRenderer {
    pub fn new() -> Self {
        Self {
            tool_name: env!("CARGO_PKG_NAME").to_string(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl Default for SarifRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct SarifReport {
    #[serde(rename = "$schema")]
    schema: &'static str,
    version: &'static str,
    runs: Vec<SarifRun>,
}

#[derive(Serialize)]
struct SarifRun {
    tool: SarifTool,
    results: Vec<SarifResult>,
}

#[derive(Serialize)]
struct SarifTool {
    driver: SarifDriver,
}

#[derive(Serialize)]
struct SarifDriver {
    name: String,
    version: String,
    rules: Vec<SarifRule>,
}

#[derive(Serialize)]
struct SarifRule {
    id: String,
    #[serde(rename = "shortDescription")]
    short_description: SarifMessage,
    #[serde(rename = "defaultConfiguration")]
    default_configuration: SarifConfiguration,
}

#[derive(Serialize)]
struct SarifConfiguration {
    level: &'static str,
}

#[derive(Serialize)]
struct SarifResult {
    #[serde(rename = "ruleId")]
    rule_id: String,
    level: &'static str,
    message: SarifMessage,
    locations: Vec<SarifLocation>,
}

#[derive(Serialize)]
struct SarifMessage {
    text: String,
}

#[derive(Serialize)]
struct SarifLocation {
    #[serde(rename = "physicalLocation")]
    physical_location: SarifPhysicalLocation,
}

#[derive(Serialize)]
struct SarifPhysicalLocation {
    #[serde(rename = "artifactLocation")]
    artifact_location: SarifArtifactLocation,
    region: SarifRegion,
}

#[derive(Serialize)]
struct SarifArtifactLocation {
    uri: String,
}

#[derive(Serialize)]
struct SarifRegion {
    #[serde(rename = "startLine")]
    start_line: usize,
    #[serde(rename = "startColumn")]
    start_column: usize,
}

fn severity_to_level(severity: Severity) -> &'static str {
    match severity {
        Severity::Blocker | Severity::Critical => "error",
        Severity::Major => "warning",
        Severity::Minor | Severity::Info => "note",
    }
}

impl ReportRenderer for SarifRenderer {
    fn render(&self, issues: &[Issue]) -> String {
        // Dedupe rules across issues, first sighting wins
        let mut rules_map = BTreeMap::new();
        for issue in issues {
            rules_map
                .entry(issue.rule_key.to_string())
                .or_insert_with(|| SarifRule {
                    id: issue.rule_key.to_string(),
                    short_description: SarifMessage {
                        text: issue
                            .rule_name
                            .clone()
                            .unwrap_or_else(|| issue.message.clone()),
                    },
                    default_configuration: SarifConfiguration {
                        level: severity_to_level(issue.severity),
                    },
                });
        }

        let results = issues
            .iter()
            .map(|issue| SarifResult {
                rule_id: issue.rule_key.to_string(),
                level: severity_to_level(issue.severity),
                message: SarifMessage {
                    text: issue.message.clone(),
                },
                locations: vec![SarifLocation {
                    physical_location: SarifPhysicalLocation {
                        artifact_location: SarifArtifactLocation {
                            uri: issue.file.display().to_string(),
                        },
                        region: SarifRegion {
                            start_line: issue.line.max(1),
                            start_column: issue.column.max(1),
                        },
                    },
                }],
            })
            .collect();

        let report = SarifReport {
            schema: "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json",
            version: "2.1.0",
            runs: vec![SarifRun {
                tool: SarifTool {
                    driver: SarifDriver {
                        name: self.tool_name.clone(),
                        version: self.tool_version.clone(),
                        rules: rules_map.into_values().collect(),
                    },
                },
                results,
            }],
        };

        serde_json::to_string_pretty(&report).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::sample_issues;
    use super::*;

    #[test]
    fn test_sarif_structure() {
        let output = SarifRenderer::new().render(&sample_issues());
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(parsed["version"], "2.1.0");
        let run = &parsed["runs"][0];
        assert_eq!(run["results"].as_array().unwrap().len(), 3);
        assert_eq!(run["tool"]["driver"]["rules"].as_array().unwrap().len(), 3);
        assert_eq!(run["results"][0]["ruleId"], "java:S1186");
        assert_eq!(
            run["results"][0]["locations"][0]["physicalLocation"]["region"]["startLine"],
            42
        );
    }

    #[test]
    fn test_severity_level_mapping() {
        assert_eq!(severity_to_level(Severity::Blocker), "error");
        assert_eq!(severity_to_level(Severity::Critical), "error");
        assert_eq!(severity_to_level(Severity::Major), "warning");
        assert_eq!(severity_to_level(Severity::Minor), "note");
        assert_eq!(severity_to_level(Severity::Info), "note");
    }
}
