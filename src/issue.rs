//! Issue types and the aggregation sink

use crate::engine::RuleDetails;
use crate::rules::RuleKey;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Issue severity, ordered from lowest to highest priority
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational, suggestion only
    Info,
    /// Minor issue, fix when convenient
    Minor,
    /// Moderate issue, should fix
    #[default]
    Major,
    /// Serious issue with high impact
    Critical,
    /// Must fix immediately, blocks release
    Blocker,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Minor => "minor",
            Severity::Major => "major",
            Severity::Critical => "critical",
            Severity::Blocker => "blocker",
        }
    }

    /// Lenient mapping from an engine-reported severity string. Unknown
    /// strings fall back to [`Severity::Major`] so rendering never fails on
    /// catalog drift.
    pub fn from_engine(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "info" => Severity::Info,
            "minor" => Severity::Minor,
            "major" => Severity::Major,
            "critical" => Severity::Critical,
            "blocker" => Severity::Blocker,
            _ => Severity::Major,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Issue category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    /// Code that will break or produce wrong results
    Bug,
    /// Security holes
    Vulnerability,
    /// Maintainability issues, bad patterns
    #[default]
    CodeSmell,
    /// Code needing manual security review
    SecurityHotspot,
}

impl IssueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::Bug => "bug",
            IssueType::Vulnerability => "vulnerability",
            IssueType::CodeSmell => "code_smell",
            IssueType::SecurityHotspot => "security_hotspot",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            IssueType::Bug => "Bug",
            IssueType::Vulnerability => "Vulnerability",
            IssueType::CodeSmell => "Code Smell",
            IssueType::SecurityHotspot => "Security Hotspot",
        }
    }

    /// Lenient mapping from an engine-reported type string. Unknown strings
    /// fall back to [`IssueType::CodeSmell`].
    pub fn from_engine(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "bug" => IssueType::Bug,
            "vulnerability" => IssueType::Vulnerability,
            "code_smell" | "code smell" => IssueType::CodeSmell,
            "security_hotspot" | "security hotspot" => IssueType::SecurityHotspot,
            _ => IssueType::CodeSmell,
        }
    }
}

impl std::fmt::Display for IssueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One reported rule violation at a source location.
///
/// Created from the engine's raw output, enriched once with rule metadata by
/// the aggregator, read-only thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Key of the violated rule
    pub rule_key: RuleKey,
    pub severity: Severity,
    pub issue_type: IssueType,
    /// Human-readable message from the engine
    pub message: String,
    /// File path relative to the request base directory
    pub file: PathBuf,
    /// Start line (1-based)
    pub line: usize,
    /// Start column (1-based)
    pub column: usize,
    /// Rule display name from the catalog, if resolvable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_name: Option<String>,
    /// Rule description from the catalog, if resolvable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_description: Option<String>,
}

impl Issue {
    /// Relative position rendered as `path:line:column`
    pub fn position(&self) -> String {
        format!("{}:{}:{}", self.file.display(), self.line, self.column)
    }
}

/// Append-only sink for one analysis call.
///
/// Preserves engine-reported order; it never sorts. Once analysis completes,
/// the collection is read through [`IssueAggregator::issues`] as many times
/// as needed (report emission and console display enumerate independently).
#[derive(Debug, Default)]
pub struct IssueAggregator {
    issues: Vec<Issue>,
}

impl IssueAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one issue, keeping arrival order
    pub fn collect(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    pub fn collect_all(&mut self, issues: impl IntoIterator<Item = Issue>) {
        self.issues.extend(issues);
    }

    /// Attach rule metadata from a catalog snapshot. A missing catalog entry
    /// leaves the metadata fields empty rather than discarding the issue.
    pub fn enrich(&mut self, catalog: &HashMap<RuleKey, RuleDetails>) {
        for issue in &mut self.issues {
            if let Some(details) = catalog.get(&issue.rule_key) {
                issue.rule_name = Some(details.name.clone());
                issue.rule_description = details.description.clone();
            }
        }
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Read-only view of the aggregated issues
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }
}
