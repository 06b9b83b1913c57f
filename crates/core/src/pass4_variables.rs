//! Pass 4: variable and scenario/event placeholder substitution.
//!
//! Recognized placeholders:
//!
//! - `<<NAME>>`: a variable, from `Set Variable` or supplied by the caller
//! - `<<~s1~>>`, `~s1~`: a scenario slot (`e` forms for events)
//!
//! Substitution is a single pass over the original value. A bound value that
//! itself contains placeholders is inserted as-is and not expanded again.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;

use crate::component::Components;
use crate::error::UnresolvedPlaceholder;
use crate::scenario::{parse_key, ScenarioEventContext};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<<~([se]\d?)~>>|~([se]\d?)~|<<([^<>]+)>>")
        .expect("placeholder pattern must compile")
});

/// Output of pass 4.
#[derive(Debug, Default)]
pub struct Resolution {
    /// Effective variables, keyed by lowercased name.
    pub variables: BTreeMap<String, String>,
    pub unresolved: Vec<UnresolvedPlaceholder>,
}

/// Effective variable bindings: file-defined ones from active control
/// parts, then the caller's, which win.
pub fn collect_variables(
    components: &Components,
    external: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut variables = BTreeMap::new();
    for component in [&components.control_1d, &components.control_2d] {
        for (name, value) in component.custom_variables() {
            variables.insert(name.to_lowercase(), value.to_owned());
        }
    }
    for (name, value) in external {
        variables.insert(name.to_lowercase(), value.clone());
    }
    variables
}

/// Rewrite every non-logic part's value and re-resolve its attachments.
/// Unresolved placeholders are reported only for active parts.
pub fn resolve_variables(
    components: &mut Components,
    ctx: &ScenarioEventContext,
    external: &BTreeMap<String, String>,
) -> Resolution {
    let variables = collect_variables(components, external);
    let mut unresolved = Vec::new();

    for component in components.iter_mut() {
        for part in component.parts.iter_mut().filter(|p| !p.is_logic()) {
            if !PLACEHOLDER.is_match(&part.raw_value) {
                continue;
            }
            let (value, missing) = substitute(&part.raw_value, &variables, ctx);
            if part.active {
                unresolved.extend(missing.into_iter().map(|placeholder| UnresolvedPlaceholder {
                    placeholder,
                    command: part.command.clone(),
                    file: part.source.file.clone(),
                    line: part.source.line,
                }));
            }
            part.value = value;
            part.refresh_files();
        }
    }

    debug!(
        variables = variables.len(),
        unresolved = unresolved.len(),
        "substituted placeholders"
    );
    Resolution {
        variables,
        unresolved,
    }
}

/// Substitute placeholders in `value`. Returns the new value and the
/// placeholders that had no binding, which are left in place.
pub fn substitute(
    value: &str,
    variables: &BTreeMap<String, String>,
    ctx: &ScenarioEventContext,
) -> (String, Vec<String>) {
    let mut missing = Vec::new();
    let out = PLACEHOLDER.replace_all(value, |caps: &Captures| {
        let bound = match caps.get(1).or_else(|| caps.get(2)) {
            Some(slot) => parse_key(slot.as_str())
                .ok()
                .and_then(|(namespace, n)| ctx.get(namespace, n))
                .map(str::to_owned),
            None => caps
                .get(3)
                .and_then(|name| variables.get(&name.as_str().trim().to_lowercase()))
                .cloned(),
        };
        match bound {
            Some(v) => v,
            None => {
                missing.push(caps[0].to_owned());
                caps[0].to_owned()
            }
        }
    });
    (out.into_owned(), missing)
}
