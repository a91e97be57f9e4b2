//! Plain-text report renderer

use super::ReportRenderer;
use crate::issue::{Issue, Severity};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Uncolored text report, grouped by file with a summary tail
#[derive(Debug, Default)]
pub struct TextRenderer;

impl TextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl ReportRenderer for TextRenderer {
    fn render(&self, issues: &[Issue]) -> String {
        let mut output = String::new();

        let mut by_file: BTreeMap<PathBuf, Vec<&Issue>> = BTreeMap::new();
        for issue in issues {
            by_file.entry(issue.file.clone()).or_default().push(issue);
        }

        for (file, file_issues) in &by_file {
            output.push_str(&format!("{}\n", file.display()));
            for issue in file_issues {
                output.push_str(&format!(
                    "  {}:{} {} [{}] ({}) {}\n",
                    issue.line,
                    issue.column,
                    issue.severity,
                    issue.rule_key,
                    issue.issue_type.display_name(),
                    issue.message
                ));
                if let Some(description) = &issue.rule_description {
                    output.push_str(&format!("    = {}\n", description));
                }
            }
            output.push('\n');
        }

        let blockers = count(issues, Severity::Blocker);
        let criticals = count(issues, Severity::Critical);
        output.push_str(&format!("{} issue(s) were found.\n", issues.len()));
        if blockers + criticals > 0 {
            output.push_str(&format!(
                "{} blocker(s), {} critical(s)\n",
                blockers, criticals
            ));
        }

        output
    }
}

fn count(issues: &[Issue], severity: Severity) -> usize {
    issues.iter().filter(|i| i.severity == severity).count()
}
