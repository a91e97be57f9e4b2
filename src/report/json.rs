//! JSON report renderer for machine consumption

use super::ReportRenderer;
use crate::issue::{Issue, IssueType, Severity};
use serde::Serialize;

/// Pretty-printed JSON report
#[derive(Debug, Default)]
pub struct JsonRenderer;

impl JsonRenderer {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    issues: Vec<JsonIssue<'a>>,
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonIssue<'a> {
    rule_key: String,
    severity: &'a str,
    #[serde(rename = "type")]
    issue_type: &'a str,
    message: &'a str,
    file: String,
    line: usize,
    column: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    rule_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rule_description: Option<&'a str>,
}

#[derive(Serialize)]
struct JsonSummary {
    total: usize,
    blockers: usize,
    criticals: usize,
    majors: usize,
    minors: usize,
    infos: usize,
    bugs: usize,
    vulnerabilities: usize,
    code_smells: usize,
}

impl ReportRenderer for JsonRenderer {
    fn render(&self, issues: &[Issue]) -> String {
        let count_sev = |s: Severity| issues.iter().filter(|i| i.severity == s).count();
        let count_type = |t: IssueType| issues.iter().filter(|i| i.issue_type == t).count();

        let report = JsonReport {
            issues: issues
                .iter()
                .map(|i| JsonIssue {
                    rule_key: i.rule_key.to_string(),
                    severity: i.severity.as_str(),
                    issue_type: i.issue_type.as_str(),
                    message: &i.message,
                    file: i.file.display().to_string(),
                    line: i.line,
                    column: i.column,
                    rule_name: i.rule_name.as_deref(),
                    rule_description: i.rule_description.as_deref(),
                })
                .collect(),
            summary: JsonSummary {
                total: issues.len(),
                blockers: count_sev(Severity::Blocker),
                criticals: count_sev(Severity::Critical),
                majors: count_sev(Severity::Major),
                minors: count_sev(Severity::Minor),
                infos: count_sev(Severity::Info),
                bugs: count_type(IssueType::Bug),
                vulnerabilities: count_type(IssueType::Vulnerability),
                code_smells: count_type(IssueType::CodeSmell),
            },
        };

        serde_json::to_string_pretty(&report).unwrap_or_default()
    }
}
