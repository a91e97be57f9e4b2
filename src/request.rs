//! Engine request assembly

use crate::rules::RuleSelection;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Property key for the main-scope library paths
pub const PROP_LIBRARIES: &str = "analysis.libraries";
/// Property key for the main-scope compiled-binary paths
pub const PROP_BINARIES: &str = "analysis.binaries";
/// Property key for the test-scope library paths
pub const PROP_TEST_LIBRARIES: &str = "analysis.test.libraries";
/// Property key for the test-scope compiled-binary paths
pub const PROP_TEST_BINARIES: &str = "analysis.test.binaries";
/// Property key for the source language version
pub const PROP_SOURCE_VERSION: &str = "analysis.source.version";

/// One source file handed to the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    /// Path to the file, resolved by the caller
    pub path: PathBuf,
    /// Whether this file belongs to test sources
    pub test_source: bool,
    /// Character encoding label, e.g. `UTF-8`
    pub encoding: String,
}

/// Everything one engine invocation needs. Built fresh per run.
#[derive(Debug, Clone, Default)]
pub struct AnalysisRequest {
    /// Root against which report paths are expressed relatively
    pub base_dir: PathBuf,
    /// Ordered input files
    pub inputs: Vec<InputFile>,
    /// Compiled-output paths that exist on disk
    pub binary_paths: Vec<PathBuf>,
    /// Dependency library paths that exist on disk
    pub library_paths: Vec<PathBuf>,
    /// Language properties for the engine
    pub properties: BTreeMap<String, String>,
    /// Resolved rule selection
    pub selection: RuleSelection,
}

/// Builds an [`AnalysisRequest`] from already-resolved inputs.
///
/// Building is a pure function of its inputs apart from the auxiliary-path
/// existence checks: paths that do not exist are dropped silently, since a
/// compiled-output directory legitimately may not exist yet.
#[derive(Debug, Default)]
pub struct AnalysisRequestBuilder {
    base_dir: PathBuf,
    sources: Vec<PathBuf>,
    binary_paths: Vec<PathBuf>,
    library_paths: Vec<PathBuf>,
    test_source: bool,
    source_version: Option<String>,
    encoding: String,
    selection: RuleSelection,
}

impl AnalysisRequestBuilder {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            encoding: "UTF-8".to_string(),
            ..Self::default()
        }
    }

    pub fn sources(mut self, files: impl IntoIterator<Item = PathBuf>) -> Self {
        self.sources.extend(files);
        self
    }

    pub fn binary_paths(mut self, paths: impl IntoIterator<Item = PathBuf>) -> Self {
        self.binary_paths.extend(paths);
        self
    }

    pub fn library_paths(mut self, paths: impl IntoIterator<Item = PathBuf>) -> Self {
        self.library_paths.extend(paths);
        self
    }

    /// Flag the whole run as test sources. The engine may apply different
    /// rule subsets to test code, so auxiliary paths are then additionally
    /// registered under test-scoped properties.
    pub fn test_source(mut self, test_source: bool) -> Self {
        self.test_source = test_source;
        self
    }

    pub fn source_version(mut self, version: Option<String>) -> Self {
        self.source_version = version;
        self
    }

    pub fn encoding(mut self, encoding: &str) -> Self {
        self.encoding = encoding.to_string();
        self
    }

    pub fn selection(mut self, selection: RuleSelection) -> Self {
        self.selection = selection;
        self
    }

    pub fn build(self) -> AnalysisRequest {
        let binary_paths = existing(self.binary_paths);
        let library_paths = existing(self.library_paths);

        let mut properties = BTreeMap::new();
        properties.insert(PROP_LIBRARIES.to_string(), join_paths(&library_paths));
        properties.insert(PROP_BINARIES.to_string(), join_paths(&binary_paths));
        if self.test_source {
            properties.insert(PROP_TEST_LIBRARIES.to_string(), join_paths(&library_paths));
            properties.insert(PROP_TEST_BINARIES.to_string(), join_paths(&binary_paths));
        }
        if let Some(version) = self.source_version {
            properties.insert(PROP_SOURCE_VERSION.to_string(), version);
        }

        let inputs = self
            .sources
            .into_iter()
            .map(|path| InputFile {
                path,
                test_source: self.test_source,
                encoding: self.encoding.clone(),
            })
            .collect();

        AnalysisRequest {
            base_dir: self.base_dir,
            inputs,
            binary_paths,
            library_paths,
            properties,
            selection: self.selection,
        }
    }
}

fn existing(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    paths.into_iter().filter(|p| p.exists()).collect()
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(",")
}

impl AnalysisRequest {
    /// Path of `file` relative to the request base directory, used when
    /// reporting issue locations
    pub fn relative_path<'a>(&self, file: &'a Path) -> &'a Path {
        file.strip_prefix(&self.base_dir).unwrap_or(file)
    }
}
