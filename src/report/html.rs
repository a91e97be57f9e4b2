//! HTML report renderer
//!
//! Produces a self-contained page with inline CSS: summary cards by severity
//! and issue type, then one table row per issue.

use super::ReportRenderer;
use crate::issue::{Issue, IssueType, Severity};

/// Standalone HTML report
#[derive(Debug)]
pub struct HtmlRenderer {
    title: String,
}

impl HtmlRenderer {
    pub fn new() -> Self {
        Self {
            title: "Analysis Report".to_string(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportRenderer for HtmlRenderer {
    fn render(&self, issues: &[Issue]) -> String {
        let count_sev = |s: Severity| issues.iter().filter(|i| i.severity == s).count();
        let count_type = |t: IssueType| issues.iter().filter(|i| i.issue_type == t).count();

        let mut rows = String::new();
        for issue in issues {
            rows.push_str(&format!(
                "<tr class=\"sev-{sev}\">\
                 <td class=\"sev\">{sev}</td>\
                 <td>{ty}</td>\
                 <td class=\"rule\">{rule}</td>\
                 <td>{message}</td>\
                 <td class=\"loc\">{file}:{line}:{column}</td>\
                 </tr>\n",
                sev = issue.severity,
                ty = html_escape(issue.issue_type.display_name()),
                rule = html_escape(&issue.rule_key.to_string()),
                message = html_escape(&issue.message),
                file = html_escape(&issue.file.display().to_string()),
                line = issue.line,
                column = issue.column,
            ));
        }

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ font-family: -apple-system, "Segoe UI", sans-serif; margin: 2em; color: #222; }}
h1 {{ font-size: 1.4em; }}
.cards {{ display: flex; gap: 1em; margin: 1em 0; }}
.card {{ border: 1px solid #ddd; border-radius: 6px; padding: 0.6em 1em; min-width: 6em; text-align: center; }}
.card .num {{ font-size: 1.6em; font-weight: bold; display: block; }}
table {{ border-collapse: collapse; width: 100%; }}
th, td {{ border-bottom: 1px solid #eee; padding: 0.4em 0.6em; text-align: left; font-size: 0.9em; }}
.rule {{ font-family: monospace; }}
.loc {{ font-family: monospace; white-space: nowrap; }}
.sev-blocker .sev, .sev-critical .sev {{ color: #c0392b; font-weight: bold; }}
.sev-major .sev {{ color: #e67e22; }}
.sev-minor .sev, .sev-info .sev {{ color: #2980b9; }}
</style>
</head>
<body>
<h1>{title}</h1>
<p>{total} issue(s) were found.</p>
<div class="cards">
<div class="card"><span class="num">{blockers}</span>Blocker</div>
<div class="card"><span class="num">{criticals}</span>Critical</div>
<div class="card"><span class="num">{majors}</span>Major</div>
<div class="card"><span class="num">{minors}</span>Minor</div>
<div class="card"><span class="num">{infos}</span>Info</div>
</div>
<div class="cards">
<div class="card"><span class="num">{bugs}</span>Bugs</div>
<div class="card"><span class="num">{vulns}</span>Vulnerabilities</div>
<div class="card"><span class="num">{smells}</span>Code Smells</div>
</div>
<table>
<thead><tr><th>Severity</th><th>Type</th><th>Rule</th><th>Message</th><th>Location</th></tr></thead>
<tbody>
{rows}</tbody>
</table>
</body>
</html>
"#,
            title = html_escape(&self.title),
            total = issues.len(),
            blockers = count_sev(Severity::Blocker),
            criticals = count_sev(Severity::Critical),
            majors = count_sev(Severity::Major),
            minors = count_sev(Severity::Minor),
            infos = count_sev(Severity::Info),
            bugs = count_type(IssueType::Bug),
            vulns = count_type(IssueType::Vulnerability),
            smells = count_type(IssueType::CodeSmell),
            rows = rows,
        )
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
