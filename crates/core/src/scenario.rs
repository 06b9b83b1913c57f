//! Scenario and event bindings supplied by the caller.
//!
//! The usual spelling is a whitespace-separated list of key/value pairs,
//! e.g. `s1 BAS s2 5m e1 Q0100`. Keys starting with `s` bind scenario
//! slots, keys starting with `e` bind event slots. `s` alone is slot 1.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::ast::LogicType;
use crate::error::ScenarioSpecError;

/// Highest slot number a key may carry.
pub const MAX_SLOT: u8 = 9;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioEventContext {
    scenarios: BTreeMap<u8, String>,
    events: BTreeMap<u8, String>,
}

impl ScenarioEventContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a specification string. Rejects the whole string on the first
    /// malformed pair.
    pub fn parse(spec: &str) -> Result<Self, ScenarioSpecError> {
        let mut ctx = ScenarioEventContext::new();
        let tokens: Vec<&str> = spec.split_whitespace().collect();
        for pair in tokens.chunks(2) {
            let key = pair[0];
            let Some(value) = pair.get(1) else {
                return Err(ScenarioSpecError::MissingValue {
                    key: key.to_owned(),
                });
            };
            let (namespace, slot) = parse_key(key)?;
            let map = ctx.map_mut(namespace);
            if map.contains_key(&slot) {
                return Err(ScenarioSpecError::DuplicateSlot {
                    key: key.to_owned(),
                });
            }
            map.insert(slot, (*value).to_owned());
        }
        Ok(ctx)
    }

    /// Replace all slots of one namespace with `values`, numbered from 1.
    pub fn set_from_list(&mut self, namespace: LogicType, values: &[String]) {
        let map = self.map_mut(namespace);
        map.clear();
        for (i, value) in values.iter().take(MAX_SLOT as usize).enumerate() {
            map.insert(i as u8 + 1, value.clone());
        }
    }

    pub fn has(&self, namespace: LogicType) -> bool {
        !self.map(namespace).is_empty()
    }

    pub fn has_scenarios(&self) -> bool {
        self.has(LogicType::Scenario)
    }

    pub fn has_events(&self) -> bool {
        self.has(LogicType::Event)
    }

    pub fn get(&self, namespace: LogicType, slot: u8) -> Option<&str> {
        self.map(namespace).get(&slot).map(String::as_str)
    }

    pub fn scenario(&self, slot: u8) -> Option<&str> {
        self.get(LogicType::Scenario, slot)
    }

    pub fn event(&self, slot: u8) -> Option<&str> {
        self.get(LogicType::Event, slot)
    }

    /// Whether `token` is one of the active values of `namespace`.
    /// Comparison ignores case.
    pub fn is_active(&self, namespace: LogicType, token: &str) -> bool {
        self.map(namespace)
            .values()
            .any(|v| v.eq_ignore_ascii_case(token))
    }

    /// Bindings keyed by slot name (`s1`, `e2`, ...).
    pub fn bindings(&self) -> BTreeMap<String, String> {
        let scenarios = self.scenarios.iter().map(|(k, v)| (format!("s{}", k), v.clone()));
        let events = self.events.iter().map(|(k, v)| (format!("e{}", k), v.clone()));
        scenarios.chain(events).collect()
    }

    fn map(&self, namespace: LogicType) -> &BTreeMap<u8, String> {
        match namespace {
            LogicType::Scenario => &self.scenarios,
            LogicType::Event => &self.events,
        }
    }

    fn map_mut(&mut self, namespace: LogicType) -> &mut BTreeMap<u8, String> {
        match namespace {
            LogicType::Scenario => &mut self.scenarios,
            LogicType::Event => &mut self.events,
        }
    }
}

impl fmt::Display for ScenarioEventContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .bindings()
            .into_iter()
            .map(|(k, v)| format!("{} {}", k, v))
            .collect();
        f.write_str(&parts.join(" "))
    }
}

/// Parse a slot key such as `s`, `S3` or `-e1`.
pub fn parse_key(key: &str) -> Result<(LogicType, u8), ScenarioSpecError> {
    let lower = key.trim_start_matches('-').to_ascii_lowercase();
    let mut chars = lower.chars();
    let namespace = match chars.next() {
        Some('s') => LogicType::Scenario,
        Some('e') => LogicType::Event,
        _ => {
            return Err(ScenarioSpecError::UnknownKey {
                key: key.to_owned(),
            })
        }
    };
    let digits = chars.as_str();
    if digits.is_empty() {
        return Ok((namespace, 1));
    }
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ScenarioSpecError::UnknownKey {
            key: key.to_owned(),
        });
    }
    match digits.parse::<u8>() {
        Ok(slot) if (1..=MAX_SLOT).contains(&slot) => Ok((namespace, slot)),
        _ => Err(ScenarioSpecError::SlotOutOfRange {
            key: key.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scenarios_and_events_into_separate_namespaces() {
        let ctx = ScenarioEventContext::parse("s1 BAS s2 5m e1 Q0100").unwrap();
        assert_eq!(ctx.scenario(1), Some("BAS"));
        assert_eq!(ctx.scenario(2), Some("5m"));
        assert_eq!(ctx.event(1), Some("Q0100"));
        assert_eq!(ctx.event(2), None);
        assert!(ctx.is_active(LogicType::Scenario, "bas"));
        assert!(!ctx.is_active(LogicType::Event, "BAS"));
    }

    #[test]
    fn bare_key_is_slot_one() {
        let ctx = ScenarioEventContext::parse("s DEV -e2 12hr").unwrap();
        assert_eq!(ctx.scenario(1), Some("DEV"));
        assert_eq!(ctx.event(2), Some("12hr"));
    }

    #[test]
    fn empty_spec_is_empty_context() {
        let ctx = ScenarioEventContext::parse("   ").unwrap();
        assert!(!ctx.has_scenarios());
        assert!(!ctx.has_events());
    }

    #[test]
    fn rejects_malformed_specs() {
        assert_eq!(
            ScenarioEventContext::parse("s1 BAS e1").unwrap_err(),
            ScenarioSpecError::MissingValue {
                key: "e1".to_string()
            }
        );
        assert!(matches!(
            ScenarioEventContext::parse("x1 BAS"),
            Err(ScenarioSpecError::UnknownKey { .. })
        ));
        assert!(matches!(
            ScenarioEventContext::parse("s10 BAS"),
            Err(ScenarioSpecError::SlotOutOfRange { .. })
        ));
        assert!(matches!(
            ScenarioEventContext::parse("s BAS s1 DEV"),
            Err(ScenarioSpecError::DuplicateSlot { .. })
        ));
        assert!(matches!(
            ScenarioEventContext::parse("sx BAS"),
            Err(ScenarioSpecError::UnknownKey { .. })
        ));
    }

    #[test]
    fn set_from_list_renumbers_slots() {
        let mut ctx = ScenarioEventContext::parse("s3 OLD").unwrap();
        ctx.set_from_list(LogicType::Scenario, &["A".to_string(), "B".to_string()]);
        assert_eq!(ctx.scenario(1), Some("A"));
        assert_eq!(ctx.scenario(2), Some("B"));
        assert_eq!(ctx.scenario(3), None);
    }

    #[test]
    fn display_round_trips_through_parse() {
        let ctx = ScenarioEventContext::parse("e1 Q0100 s2 5m s1 BAS").unwrap();
        assert_eq!(ctx.to_string(), "e1 Q0100 s1 BAS s2 5m");
        assert_eq!(ScenarioEventContext::parse(&ctx.to_string()).unwrap(), ctx);
    }
}
