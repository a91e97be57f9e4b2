//! Analysis engine contract and scoped invocation
//!
//! The engine itself is an external collaborator: it loads a rule catalog and
//! analysis plugins, parses sources, and reports raw issues. This module owns
//! only its lifecycle: construct immediately before use, analyze once, and
//! release the instance on every exit path.

use crate::issue::{Issue, IssueType, Severity};
use crate::request::AnalysisRequest;
use crate::rules::RuleKey;
use log::warn;
use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Error from engine construction, analysis, or disposal
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine construction failed: {0}")]
    Construction(String),

    #[error("analysis failed: {0}")]
    Analysis(String),

    #[error("analysis cancelled")]
    Cancelled,

    #[error("engine disposal failed: {0}")]
    Disposal(String),
}

/// Cooperative cancellation flag shared with the engine.
///
/// The engine polls it at its own granularity; there is no hard real-time
/// guarantee. Cloning shares the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of the in-flight analysis
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// One raw diagnostic as reported by the engine, before enrichment
#[derive(Debug, Clone)]
pub struct RawIssue {
    pub rule_key: RuleKey,
    pub severity: Severity,
    pub issue_type: IssueType,
    pub message: String,
    /// Path relative to the request base directory
    pub file: PathBuf,
    pub line: usize,
    pub column: usize,
}

impl RawIssue {
    fn into_issue(self) -> Issue {
        Issue {
            rule_key: self.rule_key,
            severity: self.severity,
            issue_type: self.issue_type,
            message: self.message,
            file: self.file,
            line: self.line,
            column: self.column,
            rule_name: None,
            rule_description: None,
        }
    }
}

/// Raw result of one analysis call
#[derive(Debug, Default)]
pub struct AnalysisResults {
    /// Issues in engine-reported order
    pub issues: Vec<RawIssue>,
    /// Number of files the engine indexed
    pub indexed_files: usize,
}

/// Rule metadata from the engine's loaded catalog
#[derive(Debug, Clone)]
pub struct RuleDetails {
    pub name: String,
    pub description: Option<String>,
    pub severity: Severity,
    pub issue_type: IssueType,
}

/// The external analysis engine, scoped to a single invocation
pub trait AnalysisEngine: Send {
    /// Run one blocking analysis. Implementations observe `cancel` at their
    /// own polling cadence and return [`EngineError::Cancelled`] instead of
    /// partial issues when it fires.
    fn analyze(
        &mut self,
        request: &AnalysisRequest,
        cancel: &CancelToken,
    ) -> Result<AnalysisResults, EngineError>;

    /// Look up rule metadata in the loaded catalog
    fn rule_details(&self, key: &RuleKey) -> Option<RuleDetails>;

    /// Release engine resources
    fn stop(&mut self) -> Result<(), EngineError>;
}

/// Constructs an engine instance. Construction is expensive (rule catalog and
/// plugin loading) and may fail.
pub trait EngineFactory {
    fn create(&self) -> Result<Box<dyn AnalysisEngine>, EngineError>;
}

impl<F> EngineFactory for F
where
    F: Fn() -> Result<Box<dyn AnalysisEngine>, EngineError>,
{
    fn create(&self) -> Result<Box<dyn AnalysisEngine>, EngineError> {
        self()
    }
}

/// Drop guard that stops the engine on every exit path. A disposal failure
/// is downgraded to a warning so it never masks the analysis result.
struct EngineGuard {
    engine: Box<dyn AnalysisEngine>,
}

impl Deref for EngineGuard {
    type Target = dyn AnalysisEngine;

    fn deref(&self) -> &Self::Target {
        self.engine.as_ref()
    }
}

impl DerefMut for EngineGuard {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.engine.as_mut()
    }
}

impl Drop for EngineGuard {
    fn drop(&mut self) {
        if let Err(e) = self.engine.stop() {
            warn!("could not stop the analysis engine: {}", e);
        }
    }
}

/// Output of one engine invocation, usable after the engine is gone
#[derive(Debug, Default)]
pub struct EngineRun {
    /// Issues in engine-reported order, not yet enriched
    pub issues: Vec<Issue>,
    pub indexed_files: usize,
    /// Catalog snapshot for every distinct rule key among the issues.
    /// Lookup misses have no entry.
    pub rule_details: HashMap<RuleKey, RuleDetails>,
}

/// Owns the construct -> analyze -> dispose lifecycle of one invocation
pub struct EngineInvoker;

impl EngineInvoker {
    /// Construct an engine, run one analysis, snapshot the rule catalog for
    /// the reported issues, and release the engine.
    pub fn invoke(
        factory: &dyn EngineFactory,
        request: &AnalysisRequest,
        cancel: &CancelToken,
    ) -> Result<EngineRun, EngineError> {
        // A pre-cancelled run never pays engine construction
        if cancel.is_cancelled() {
            return Err(EngineError::Cancelled);
        }

        let mut engine = EngineGuard {
            engine: factory.create()?,
        };

        let results = engine.analyze(request, cancel)?;

        let mut rule_details = HashMap::new();
        for raw in &results.issues {
            if !rule_details.contains_key(&raw.rule_key) {
                if let Some(details) = engine.rule_details(&raw.rule_key) {
                    rule_details.insert(raw.rule_key.clone(), details);
                }
            }
        }

        Ok(EngineRun {
            issues: results.issues.into_iter().map(RawIssue::into_issue).collect(),
            indexed_files: results.indexed_files,
            rule_details,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    struct ScriptedEngine {
        results: Option<Result<AnalysisResults, EngineError>>,
        catalog: HashMap<RuleKey, RuleDetails>,
        stops: Arc<AtomicUsize>,
        stop_fails: bool,
    }

    impl ScriptedEngine {
        fn ok(issues: Vec<RawIssue>, stops: Arc<AtomicUsize>) -> Self {
            Self {
                results: Some(Ok(AnalysisResults {
                    indexed_files: issues.len(),
                    issues,
                })),
                catalog: HashMap::new(),
                stops,
                stop_fails: false,
            }
        }
    }

    impl AnalysisEngine for ScriptedEngine {
        fn analyze(
            &mut self,
            _request: &AnalysisRequest,
            cancel: &CancelToken,
        ) -> Result<AnalysisResults, EngineError> {
            if cancel.is_cancelled() {
                return Err(EngineError::Cancelled);
            }
            self.results.take().unwrap()
        }

        fn rule_details(&self, key: &RuleKey) -> Option<RuleDetails> {
            self.catalog.get(key).cloned()
        }

        fn stop(&mut self) -> Result<(), EngineError> {
            self.stops.fetch_add(1, Ordering::SeqCst);
            if self.stop_fails {
                Err(EngineError::Disposal("already stopped".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn raw(rule: &str) -> RawIssue {
        RawIssue {
            rule_key: rule.parse().unwrap(),
            severity: Severity::Major,
            issue_type: IssueType::Bug,
            message: "boom".to_string(),
            file: PathBuf::from("src/Foo.java"),
            line: 1,
            column: 1,
        }
    }

    #[test]
    fn test_engine_stopped_after_success() {
        let stops = Arc::new(AtomicUsize::new(0));
        let stops_in_factory = Arc::clone(&stops);
        let factory = move || -> Result<Box<dyn AnalysisEngine>, EngineError> {
            Ok(Box::new(ScriptedEngine::ok(
                vec![raw("java:S1")],
                Arc::clone(&stops_in_factory),
            )))
        };

        let run = EngineInvoker::invoke(
            &factory,
            &AnalysisRequest::default(),
            &CancelToken::new(),
        )
        .unwrap();

        assert_eq!(run.issues.len(), 1);
        assert_eq!(run.indexed_files, 1);
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_engine_stopped_after_analysis_failure() {
        let stops = Arc::new(AtomicUsize::new(0));
        let stops_in_factory = Arc::clone(&stops);
        let factory = move || -> Result<Box<dyn AnalysisEngine>, EngineError> {
            Ok(Box::new(ScriptedEngine {
                results: Some(Err(EngineError::Analysis("corrupt state".to_string()))),
                catalog: HashMap::new(),
                stops: Arc::clone(&stops_in_factory),
                stop_fails: false,
            }))
        };

        let result =
            EngineInvoker::invoke(&factory, &AnalysisRequest::default(), &CancelToken::new());
        assert!(matches!(result, Err(EngineError::Analysis(_))));
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_disposal_failure_does_not_mask_result() {
        let stops = Arc::new(AtomicUsize::new(0));
        let stops_in_factory = Arc::clone(&stops);
        let factory = move || -> Result<Box<dyn AnalysisEngine>, EngineError> {
            let mut engine =
                ScriptedEngine::ok(vec![raw("java:S1")], Arc::clone(&stops_in_factory));
            engine.stop_fails = true;
            Ok(Box::new(engine))
        };

        let run = EngineInvoker::invoke(
            &factory,
            &AnalysisRequest::default(),
            &CancelToken::new(),
        )
        .unwrap();
        assert_eq!(run.issues.len(), 1);
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_pre_cancelled_run_skips_construction() {
        let factory = || -> Result<Box<dyn AnalysisEngine>, EngineError> {
            panic!("engine must not be constructed for a cancelled run")
        };
        let cancel = CancelToken::new();
        cancel.cancel();

        let result = EngineInvoker::invoke(&factory, &AnalysisRequest::default(), &cancel);
        assert!(matches!(result, Err(EngineError::Cancelled)));
    }

    #[test]
    fn test_construction_failure_propagates() {
        let factory = || -> Result<Box<dyn AnalysisEngine>, EngineError> {
            Err(EngineError::Construction("missing plugin".to_string()))
        };
        let result =
            EngineInvoker::invoke(&factory, &AnalysisRequest::default(), &CancelToken::new());
        assert!(matches!(result, Err(EngineError::Construction(_))));
    }

    #[test]
    fn test_catalog_snapshot_covers_distinct_keys() {
        let stops = Arc::new(AtomicUsize::new(0));
        let stops_in_factory = Arc::clone(&stops);
        let factory = move || -> Result<Box<dyn AnalysisEngine>, EngineError> {
            let mut engine = ScriptedEngine::ok(
                vec![raw("java:S1"), raw("java:S1"), raw("java:S2")],
                Arc::clone(&stops_in_factory),
            );
            engine.catalog.insert(
                "java:S1".parse().unwrap(),
                RuleDetails {
                    name: "Rule one".to_string(),
                    description: None,
                    severity: Severity::Major,
                    issue_type: IssueType::Bug,
                },
            );
            Ok(Box::new(engine) as Box<dyn AnalysisEngine>)
        };

        let run = EngineInvoker::invoke(
            &factory,
            &AnalysisRequest::default(),
            &CancelToken::new(),
        )
        .unwrap();
        // S1 resolved, S2 missing from the catalog
        assert_eq!(run.rule_details.len(), 1);
        assert!(run
            .rule_details
            .contains_key(&"java:S1".parse::<RuleKey>().unwrap()));
    }

    #[test]
    fn test_cancel_token_is_shared() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }
}
