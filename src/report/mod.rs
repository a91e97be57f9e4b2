//! Report rendering and emission

mod console;
mod html;
mod json;
mod sarif;
mod text;

pub use console::ConsoleRenderer;
pub use html::HtmlRenderer;
pub use json::JsonRenderer;
pub use sarif::SarifRenderer;
pub use text::TextRenderer;

use crate::issue::Issue;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error rendering or writing one report. Never fatal to the run.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("report '{name}' could not be written to {path}: {source}")]
    Write {
        name: String,
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Supported report formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Html,
    Json,
    Sarif,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Text => "text",
            ReportFormat::Html => "html",
            ReportFormat::Json => "json",
            ReportFormat::Sarif => "sarif",
        }
    }

    /// File extension for the default output location
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Html => "html",
            ReportFormat::Json => "json",
            ReportFormat::Sarif => "sarif",
        }
    }

    fn renderer(&self) -> Box<dyn ReportRenderer> {
        match self {
            ReportFormat::Text => Box::new(TextRenderer::new()),
            ReportFormat::Html => Box::new(HtmlRenderer::new()),
            ReportFormat::Json => Box::new(JsonRenderer::new()),
            ReportFormat::Sarif => Box::new(SarifRenderer::new()),
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "html" => Ok(ReportFormat::Html),
            "json" => Ok(ReportFormat::Json),
            "sarif" => Ok(ReportFormat::Sarif),
            _ => Err(format!("Unknown report format: {}", s)),
        }
    }
}

/// One configured report target
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSpec {
    /// Report name, used for the default file name
    pub name: String,
    pub format: ReportFormat,
    /// Disabled specs are skipped entirely (no empty file is written)
    pub enabled: bool,
    /// Output file; defaults to `<reports_dir>/<name>.<ext>`
    pub output: Option<PathBuf>,
}

impl Default for ReportSpec {
    fn default() -> Self {
        Self {
            name: "analysis".to_string(),
            format: ReportFormat::Text,
            enabled: true,
            output: None,
        }
    }
}

impl ReportSpec {
    pub fn new(name: &str, format: ReportFormat) -> Self {
        Self {
            name: name.to_string(),
            format,
            ..Self::default()
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    fn resolve_output(&self, reports_dir: &Path) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            reports_dir.join(format!("{}.{}", self.name, self.format.extension()))
        })
    }
}

/// Renders the aggregated issues into one serialized report body
pub trait ReportRenderer: Send + Sync {
    fn render(&self, issues: &[Issue]) -> String;
}

/// What report emission produced: written artifacts plus isolated failures
#[derive(Debug, Default)]
pub struct EmitOutcome {
    /// Locations of successfully written reports
    pub written: Vec<PathBuf>,
    /// Per-format failures; the other formats were still attempted
    pub failures: Vec<ReportError>,
}

/// Renders and writes every enabled [`ReportSpec`].
///
/// Specs are independent: they read the same immutable issue slice and write
/// to distinct locations, so emission runs in parallel and one format's I/O
/// error is recorded without blocking the others.
pub struct ReportEmitter {
    reports_dir: PathBuf,
}

impl ReportEmitter {
    pub fn new(reports_dir: impl Into<PathBuf>) -> Self {
        Self {
            reports_dir: reports_dir.into(),
        }
    }

    pub fn emit(&self, specs: &[ReportSpec], issues: &[Issue]) -> EmitOutcome {
        let results: Vec<Result<PathBuf, ReportError>> = specs
            .par_iter()
            .filter(|spec| spec.enabled)
            .map(|spec| self.emit_one(spec, issues))
            .collect();

        let mut outcome = EmitOutcome::default();
        for result in results {
            match result {
                Ok(path) => outcome.written.push(path),
                Err(e) => outcome.failures.push(e),
            }
        }
        outcome
    }

    fn emit_one(&self, spec: &ReportSpec, issues: &[Issue]) -> Result<PathBuf, ReportError> {
        let path = spec.resolve_output(&self.reports_dir);
        let body = spec.format.renderer().render(issues);

        let write = |path: &Path| -> std::io::Result<()> {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, body.as_bytes())
        };

        write(&path).map_err(|source| ReportError::Write {
            name: spec.name.clone(),
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::issue::{Issue, IssueType, Severity};
    use std::path::PathBuf;

    pub fn issue(rule: &str, severity: Severity, issue_type: IssueType, message: &str) -> Issue {
        Issue {
            rule_key: rule.parse().unwrap(),
            severity,
            issue_type,
            message: message.to_string(),
            file: PathBuf::from("src/main/App.java"),
            line: 42,
            column: 7,
            rule_name: Some("Sample rule".to_string()),
            rule_description: Some("Sample description".to_string()),
        }
    }

    pub fn sample_issues() -> Vec<Issue> {
        vec![
            issue("java:S1186", Severity::Critical, IssueType::Bug, "Empty method body"),
            issue(
                "java:S2068",
                Severity::Blocker,
                IssueType::Vulnerability,
                "Hardcoded credentials",
            ),
            issue(
                "java:S1135",
                Severity::Info,
                IssueType::CodeSmell,
                "Track TODO comments",
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::sample_issues;
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_format_from_str() {
        assert_eq!("text".parse::<ReportFormat>().unwrap(), ReportFormat::Text);
        assert_eq!("HTML".parse::<ReportFormat>().unwrap(), ReportFormat::Html);
        assert_eq!("sarif".parse::<ReportFormat>().unwrap(), ReportFormat::Sarif);
        assert!("xml".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_disabled_spec_writes_nothing() {
        let dir = tempdir().unwrap();
        let emitter = ReportEmitter::new(dir.path());
        let specs = vec![ReportSpec::new("quiet", ReportFormat::Json).disabled()];

        let outcome = emitter.emit(&specs, &sample_issues());
        assert!(outcome.written.is_empty());
        assert!(outcome.failures.is_empty());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_single_spec_produces_one_artifact_with_all_issues() {
        let dir = tempdir().unwrap();
        let emitter = ReportEmitter::new(dir.path());
        let issues = sample_issues();
        let specs = vec![ReportSpec::new("analysis", ReportFormat::Json)];

        let outcome = emitter.emit(&specs, &issues);
        assert!(outcome.failures.is_empty());
        assert_eq!(outcome.written.len(), 1);
        assert_eq!(outcome.written[0], dir.path().join("analysis.json"));

        let body = std::fs::read_to_string(&outcome.written[0]).unwrap();
        for issue in &issues {
            assert!(body.contains(&issue.rule_key.to_string()));
            assert!(body.contains(&issue.message));
        }
    }

    #[test]
    fn test_explicit_output_location_wins() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("nested").join("custom.sarif");
        let emitter = ReportEmitter::new(dir.path().join("unused"));
        let specs =
            vec![ReportSpec::new("ci", ReportFormat::Sarif).with_output(target.clone())];

        let outcome = emitter.emit(&specs, &sample_issues());
        assert_eq!(outcome.written, vec![target.clone()]);
        assert!(target.exists());
    }

    #[test]
    fn test_one_failure_does_not_block_others() {
        let dir = tempdir().unwrap();
        // A directory at the target path makes the write fail
        let blocked = dir.path().join("blocked.txt");
        std::fs::create_dir(&blocked).unwrap();

        let specs = vec![
            ReportSpec::new("blocked", ReportFormat::Text).with_output(blocked),
            ReportSpec::new("fine", ReportFormat::Text),
        ];
        let outcome = ReportEmitter::new(dir.path()).emit(&specs, &sample_issues());

        assert_eq!(outcome.written.len(), 1);
        assert_eq!(outcome.failures.len(), 1);
        assert!(outcome.written[0].ends_with("fine.txt"));
    }

    #[test]
    fn test_all_formats_render_every_issue() {
        let issues = sample_issues();
        for format in [
            ReportFormat::Text,
            ReportFormat::Html,
            ReportFormat::Json,
            ReportFormat::Sarif,
        ] {
            let body = format.renderer().render(&issues);
            for issue in &issues {
                assert!(
                    body.contains(&issue.rule_key.to_string()),
                    "{} report is missing {}",
                    format.as_str(),
                    issue.rule_key
                );
            }
        }
    }
}
