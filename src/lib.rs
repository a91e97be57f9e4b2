//! Lintgate - Static Analysis Run Orchestration
//!
//! Drives a pluggable static-analysis engine through a full run and turns the
//! results into reports and a pass/fail decision. The engine itself is an
//! external collaborator supplied by the host; this crate owns rule selection,
//! request assembly, the engine lifecycle, issue aggregation, report emission,
//! and the issue-count threshold verdict.
//!
//! # Architecture
//!
//! ```text
//! RunConfig -> RunCoordinator -> RuleSelection -> AnalysisRequest
//!                             -> EngineInvoker  -> AnalysisEngine
//!                             -> IssueAggregator
//!                             -> ReportEmitter  -> text/json/sarif/html
//!                             -> ThresholdPolicy -> Verdict
//! ```
//!
//! The coordinator walks these stages in order for every run. Engine failures
//! abort the run; report failures are logged and recovered; the threshold
//! decision is always computed, even when `ignore_failures` suppresses it.
//!
//! # Example
//!
//! ```no_run
//! use lintgate::{CancelToken, RunConfig, RunCoordinator};
//! # fn engine_factory() -> impl lintgate::EngineFactory {
//! #     || -> Result<Box<dyn lintgate::AnalysisEngine>, lintgate::EngineError> {
//! #         Err(lintgate::EngineError::Construction("stub".to_string()))
//! #     }
//! # }
//!
//! let config = RunConfig::load(std::path::Path::new("analysis.yaml"))?;
//! let outcome = RunCoordinator::new(config).run(&engine_factory(), &CancelToken::new())?;
//! outcome.ensure_passed()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod coordinator;
pub mod engine;
pub mod issue;
pub mod policy;
pub mod report;
pub mod request;
pub mod rules;

// Re-export main types
pub use config::{ConfigError, RunConfig};
pub use coordinator::{RunCoordinator, RunError, RunOutcome};
pub use engine::{
    AnalysisEngine, AnalysisResults, CancelToken, EngineError, EngineFactory, EngineInvoker,
    EngineRun, RawIssue, RuleDetails,
};
pub use issue::{Issue, IssueAggregator, IssueType, Severity};
pub use policy::{ThresholdPolicy, Verdict};
pub use report::{
    ConsoleRenderer, EmitOutcome, HtmlRenderer, JsonRenderer, ReportEmitter, ReportError,
    ReportFormat, ReportRenderer, ReportSpec, SarifRenderer, TextRenderer,
};
pub use request::{AnalysisRequest, AnalysisRequestBuilder, InputFile};
pub use rules::{RuleKey, RuleSelection, SelectionError};
