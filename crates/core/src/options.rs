//! Per-load configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything a load needs besides the root path. There is no process-wide
/// default; callers pass this explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadOptions {
    /// Scenario/event specification, e.g. `s1 BAS s2 5m e1 Q0100`. When it
    /// names no scenarios (or no events) the model's own `Model Scenarios`
    /// (`Model Events`) list is used.
    pub scenarios: String,
    /// Variables supplied by the caller. These override `Set Variable`.
    pub variables: BTreeMap<String, String>,
    /// Check that attached files and their sidecars exist.
    pub check_files: bool,
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scenarios(mut self, spec: impl Into<String>) -> Self {
        self.scenarios = spec.into();
        self
    }

    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    pub fn with_check_files(mut self, check: bool) -> Self {
        self.check_files = check;
        self
    }
}
