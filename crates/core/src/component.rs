//! Components: ordered groups of parts sharing a semantic role.

use serde::{Deserialize, Serialize};

use crate::ast::ComponentKind;
use crate::parts::{Part, PartKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub kind: ComponentKind,
    pub parts: Vec<Part>,
}

impl Component {
    pub fn new(kind: ComponentKind) -> Self {
        Component {
            kind,
            parts: Vec::new(),
        }
    }

    pub fn push(&mut self, part: Part) {
        self.parts.push(part);
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Parts that survive the active scenarios and events.
    pub fn active_parts(&self) -> impl Iterator<Item = &Part> {
        self.parts.iter().filter(|p| p.active)
    }

    /// Parts excluded by scenario/event logic.
    pub fn inactive_parts(&self) -> impl Iterator<Item = &Part> {
        self.parts.iter().filter(|p| !p.active)
    }

    /// Active parts with the given command, in order.
    pub fn find<'a>(&'a self, command: &'a str) -> impl Iterator<Item = &'a Part> + 'a {
        self.active_parts().filter(move |p| p.command == command)
    }

    /// The last active part with the given command; later parts override
    /// earlier ones.
    pub fn last(&self, command: &str) -> Option<&Part> {
        self.active_parts().filter(|p| p.command == command).last()
    }

    /// Names of the 2D domains seen in this component, in first-seen order.
    pub fn domains(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for name in self.parts.iter().filter_map(|p| p.domain.as_ref()) {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        names
    }

    /// Active `Set Variable` parts as `(name, value)` pairs, in order.
    pub fn custom_variables(&self) -> impl Iterator<Item = (&str, &str)> {
        self.active_parts().filter_map(|p| match &p.kind {
            PartKind::SetVariable { name } => Some((name.as_str(), p.value.as_str())),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

/// All four components of a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Components {
    pub control_1d: Component,
    pub control_2d: Component,
    pub geometry: Component,
    pub boundary: Component,
}

impl Default for Components {
    fn default() -> Self {
        Components {
            control_1d: Component::new(ComponentKind::Control1D),
            control_2d: Component::new(ComponentKind::Control2D),
            geometry: Component::new(ComponentKind::Geometry),
            boundary: Component::new(ComponentKind::Boundary),
        }
    }
}

impl Components {
    pub fn get(&self, kind: ComponentKind) -> &Component {
        match kind {
            ComponentKind::Control1D => &self.control_1d,
            ComponentKind::Control2D => &self.control_2d,
            ComponentKind::Geometry => &self.geometry,
            ComponentKind::Boundary => &self.boundary,
        }
    }

    pub fn get_mut(&mut self, kind: ComponentKind) -> &mut Component {
        match kind {
            ComponentKind::Control1D => &mut self.control_1d,
            ComponentKind::Control2D => &mut self.control_2d,
            ComponentKind::Geometry => &mut self.geometry,
            ComponentKind::Boundary => &mut self.boundary,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Component> {
        ComponentKind::ALL.into_iter().map(move |k| self.get(k))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Component> {
        [
            &mut self.control_1d,
            &mut self.control_2d,
            &mut self.geometry,
            &mut self.boundary,
        ]
        .into_iter()
    }

    pub fn part_count(&self) -> usize {
        self.iter().map(Component::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Category;
    use crate::decode::DecodedLine;
    use crate::parts::PartFactory;
    use std::path::Path;

    fn control(lines: &[&str]) -> Component {
        let factory = PartFactory::new();
        let mut component = Component::new(ComponentKind::Control2D);
        for (i, text) in lines.iter().enumerate() {
            let line = DecodedLine {
                number: i as u32 + 1,
                text: text.to_string(),
            };
            let part = factory
                .create_part(&line, Path::new("/m/root.tcf"), Category::Control)
                .unwrap();
            component.push(part);
        }
        component
    }

    #[test]
    fn last_active_part_overrides_earlier_ones() {
        let mut c = control(&["Cell Size == 5", "Timestep == 1", "Cell Size == 2", "Cell Size == 1"]);
        c.parts[3].active = false;
        // the lookup key does not need to outlive the returned part
        let part = {
            let key = String::from("cell size");
            c.last(&key)
        };
        assert_eq!(part.map(|p| p.value.as_str()), Some("2"));
        assert!(c.last("end time").is_none());
        assert_eq!(c.find("cell size").count(), 2);
    }

    #[test]
    fn custom_variables_skip_inactive_parts() {
        let mut c = control(&["Set Variable A == 1", "Set Variable B == 2"]);
        c.parts[1].active = false;
        let vars: Vec<_> = c.custom_variables().collect();
        assert_eq!(vars, vec![("A", "1")]);
    }
}
