//! Rule selection: include/exclude sets and per-rule parameters

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

/// Error resolving a rule selection
#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("malformed rule key '{key}': expected 'repository:key'")]
    MalformedRuleKey { key: String },
}

/// Identifier of a rule: a repository key plus a short key, e.g. `java:S1186`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RuleKey {
    repository: String,
    rule: String,
}

impl RuleKey {
    pub fn new(repository: &str, rule: &str) -> Self {
        Self {
            repository: repository.to_string(),
            rule: rule.to_string(),
        }
    }

    /// Repository (namespace) part, e.g. `java`
    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Short key part, e.g. `S1186`
    pub fn rule(&self) -> &str {
        &self.rule
    }
}

impl fmt::Display for RuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.repository, self.rule)
    }
}

impl FromStr for RuleKey {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        static SHAPE: OnceLock<Regex> = OnceLock::new();
        let shape = SHAPE
            .get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]+:[A-Za-z0-9_.-]+$").unwrap());
        let s = s.trim();
        if !shape.is_match(s) {
            return Err(SelectionError::MalformedRuleKey { key: s.to_string() });
        }
        // Shape guarantees exactly one usable split point
        let (repository, rule) = s.split_once(':').unwrap();
        Ok(Self::new(repository, rule))
    }
}

impl TryFrom<String> for RuleKey {
    type Error = SelectionError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<RuleKey> for String {
    fn from(key: RuleKey) -> Self {
        key.to_string()
    }
}

/// Resolved rule configuration handed to the engine request.
///
/// A key present in both the include and exclude inputs ends up excluded
/// only: silencing a rule is the stronger signal. Parameters configured for
/// an excluded rule are retained so re-enabling the rule later does not lose
/// its configuration; they have no runtime effect while the rule is excluded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSelection {
    included: BTreeSet<RuleKey>,
    excluded: BTreeSet<RuleKey>,
    parameters: BTreeMap<RuleKey, BTreeMap<String, String>>,
}

impl RuleSelection {
    /// Resolve raw include/exclude strings and a raw parameter map.
    ///
    /// The first malformed key aborts the whole resolution; no partial
    /// selection is returned. Duplicates collapse into sets.
    pub fn resolve(
        includes: &[String],
        excludes: &[String],
        parameters: &HashMap<String, HashMap<String, String>>,
    ) -> Result<Self, SelectionError> {
        let excluded: BTreeSet<RuleKey> = excludes
            .iter()
            .map(|s| s.parse())
            .collect::<Result<_, _>>()?;

        let mut included: BTreeSet<RuleKey> = includes
            .iter()
            .map(|s| s.parse())
            .collect::<Result<_, _>>()?;
        // Exclusion wins over inclusion
        included.retain(|k| !excluded.contains(k));

        let mut resolved_params = BTreeMap::new();
        for (raw_key, params) in parameters {
            let key: RuleKey = raw_key.parse()?;
            resolved_params.insert(
                key,
                params
                    .iter()
                    .map(|(name, value)| (name.clone(), value.clone()))
                    .collect(),
            );
        }

        Ok(Self {
            included,
            excluded,
            parameters: resolved_params,
        })
    }

    /// Rules explicitly enabled (never contains an excluded key)
    pub fn included(&self) -> &BTreeSet<RuleKey> {
        &self.included
    }

    /// Rules explicitly disabled
    pub fn excluded(&self) -> &BTreeSet<RuleKey> {
        &self.excluded
    }

    /// Per-rule parameter overrides, parameter names case-sensitive
    pub fn parameters(&self) -> &BTreeMap<RuleKey, BTreeMap<String, String>> {
        &self.parameters
    }

    pub fn is_excluded(&self, key: &RuleKey) -> bool {
        self.excluded.contains(key)
    }
}
