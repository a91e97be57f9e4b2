//! Per-issue console line rendering

use crate::issue::{Issue, IssueType, Severity};
use colored::Colorize;

/// Renders one console line per issue:
/// `<type marker> <severity marker> <rule key> <message> at: <path>:<line>:<column>`
#[derive(Debug)]
pub struct ConsoleRenderer {
    colored: bool,
}

impl ConsoleRenderer {
    pub fn new() -> Self {
        Self { colored: true }
    }

    pub fn without_color(mut self) -> Self {
        self.colored = false;
        self
    }

    /// Display marker for an issue type
    pub fn type_marker(issue_type: IssueType) -> &'static str {
        match issue_type {
            IssueType::Bug => "[bug]",
            IssueType::Vulnerability => "[vulnerability]",
            IssueType::CodeSmell => "[smell]",
            IssueType::SecurityHotspot => "[hotspot]",
        }
    }

    /// Display marker for a severity
    pub fn severity_marker(severity: Severity) -> &'static str {
        match severity {
            Severity::Blocker => "(blocker)",
            Severity::Critical => "(critical)",
            Severity::Major => "(major)",
            Severity::Minor => "(minor)",
            Severity::Info => "(info)",
        }
    }

    pub fn render_issue(&self, issue: &Issue) -> String {
        let type_marker = Self::type_marker(issue.issue_type);
        let severity_marker = Self::severity_marker(issue.severity);
        let rule = issue.rule_key.to_string();

        if !self.colored {
            return format!(
                "{} {} {} {} at: {}",
                type_marker,
                severity_marker,
                rule,
                issue.message,
                issue.position()
            );
        }

        let severity_marker = match issue.severity {
            Severity::Blocker | Severity::Critical => severity_marker.red().bold(),
            Severity::Major => severity_marker.yellow(),
            Severity::Minor | Severity::Info => severity_marker.blue(),
        };
        format!(
            "{} {} {} {} at: {}",
            type_marker.magenta(),
            severity_marker,
            rule.cyan(),
            issue.message,
            issue.position()
        )
    }
}

impl Default for ConsoleRenderer {
    fn default() -> Self {
        Self::new()
    }
}
