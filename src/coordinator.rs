//! Top-level run sequencing
//!
//! One run walks a linear state flow: configure, analyze, aggregate, report,
//! decide. Configuration and engine failures abort immediately; report
//! failures are logged and recovered; the threshold decision is always
//! computed and carried on the outcome.

use crate::config::RunConfig;
use crate::engine::{CancelToken, EngineError, EngineFactory, EngineInvoker};
use crate::issue::{Issue, IssueAggregator};
use crate::policy::{ThresholdPolicy, Verdict};
use crate::report::{ConsoleRenderer, ReportEmitter};
use crate::request::AnalysisRequestBuilder;
use crate::rules::{RuleSelection, SelectionError};
use log::{debug, info, warn};
use std::path::PathBuf;
use thiserror::Error;

/// Fatal outcomes of a run. A failed threshold verdict is not among them;
/// see [`RunOutcome::ensure_passed`].
#[derive(Debug, Error)]
pub enum RunError {
    /// Configuration error: a rule key did not parse
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// The engine could not be initialized
    #[error("engine construction failed: {0}")]
    EngineConstruction(String),

    /// The analysis call itself failed; no partial issues are trusted
    #[error("analysis failed: {0}")]
    EngineFailure(String),

    /// Cooperative cancellation observed; distinct from failure and pass
    #[error("analysis cancelled")]
    Cancelled,

    /// The expected failure mode: analysis succeeded, too many issues
    #[error("{0}")]
    ThresholdExceeded(String),
}

/// Result of one completed run. Immutable after construction.
#[derive(Debug)]
pub struct RunOutcome {
    pub verdict: Verdict,
    /// All aggregated issues, in engine-reported order
    pub issues: Vec<Issue>,
    /// Locations of successfully emitted reports
    pub reports: Vec<PathBuf>,
    /// Number of files the engine indexed
    pub indexed_files: usize,
}

impl RunOutcome {
    pub fn issue_count(&self) -> usize {
        self.verdict.issue_count
    }

    pub fn passed(&self) -> bool {
        self.verdict.passed
    }

    /// Translate a failed verdict into [`RunError::ThresholdExceeded`] so
    /// callers can abort a larger pipeline with `?`.
    pub fn ensure_passed(&self) -> Result<(), RunError> {
        if self.verdict.passed {
            Ok(())
        } else {
            Err(RunError::ThresholdExceeded(self.verdict.message.clone()))
        }
    }
}

/// Sequences one analysis run end to end
pub struct RunCoordinator {
    config: RunConfig,
}

impl RunCoordinator {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run one analysis to completion (or cancellation).
    ///
    /// The engine is constructed via `factory` immediately before the
    /// analysis call and released on every exit path. `cancel` may be set
    /// from another thread to terminate the in-flight analysis.
    pub fn run(
        &self,
        factory: &dyn EngineFactory,
        cancel: &CancelToken,
    ) -> Result<RunOutcome, RunError> {
        let config = &self.config;
        self.log_configuration();

        // Configuring: any failure here aborts before the engine exists
        let selection = RuleSelection::resolve(
            &config.include_rules,
            &config.exclude_rules,
            &config.rule_parameters,
        )?;
        let request = AnalysisRequestBuilder::new(config.base_dir.clone())
            .sources(config.source_files.iter().cloned())
            .binary_paths(config.binary_paths.iter().cloned())
            .library_paths(config.library_paths.iter().cloned())
            .test_source(config.test_source)
            .source_version(config.source_version.clone())
            .selection(selection)
            .build();

        // Analyzing
        let engine_run =
            EngineInvoker::invoke(factory, &request, cancel).map_err(|e| match e {
                EngineError::Construction(msg) => RunError::EngineConstruction(msg),
                EngineError::Cancelled => RunError::Cancelled,
                EngineError::Analysis(msg) | EngineError::Disposal(msg) => {
                    RunError::EngineFailure(msg)
                }
            })?;
        debug!("Files indexed: {}", engine_run.indexed_files);

        // Aggregating
        let mut aggregator = IssueAggregator::new();
        aggregator.collect_all(engine_run.issues);
        aggregator.enrich(&engine_run.rule_details);

        // Reporting: failures are logged, never fatal
        let emitted = ReportEmitter::new(config.reports_dir.clone())
            .emit(&config.reports, aggregator.issues());
        for failure in &emitted.failures {
            warn!("{}", failure);
        }

        if config.show_issues {
            let renderer = ConsoleRenderer::new();
            for issue in aggregator.issues() {
                info!("{}", renderer.render_issue(issue));
            }
        }

        // Deciding
        let policy = ThresholdPolicy::new(config.max_issues, config.ignore_failures);
        let verdict = policy.evaluate(aggregator.len());
        info!("{}", verdict.message);

        Ok(RunOutcome {
            verdict,
            issues: aggregator.into_issues(),
            reports: emitted.written,
            indexed_files: engine_run.indexed_files,
        })
    }

    /// Diagnostic dump of the resolved configuration; not part of the
    /// functional contract
    fn log_configuration(&self) {
        let config = &self.config;
        debug!(
            "Reports: {:?}",
            config
                .reports
                .iter()
                .map(|r| (r.name.as_str(), r.format.as_str(), r.enabled))
                .collect::<Vec<_>>()
        );
        debug!("Include rules: {:?}", config.include_rules);
        debug!("Exclude rules: {:?}", config.exclude_rules);
        debug!("Rule parameters: {:?}", config.rule_parameters);
        debug!("Source files: {}", config.source_files.len());
        debug!("Test source: {}", config.test_source);
        debug!(
            "Max issues: {}, ignore failures: {}",
            config.max_issues, config.ignore_failures
        );
    }
}
