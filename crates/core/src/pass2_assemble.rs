//! Pass 2: turn the raw file streams into components.
//!
//! Ranks are processed in the fixed order control/estry, geometry,
//! boundary, whatever order the files were discovered in. Within a rank the
//! stream order from pass 1 is kept, so included content sits where it was
//! included.

use tracing::info;

use crate::ast::{Category, ComponentKind, LogicType};
use crate::component::Components;
use crate::error::Warning;
use crate::parts::{DomainEdge, LogicTerm, PartFactory, PartKind};
use crate::raw_file::RawFileStore;

/// Position of a part inside [`Components`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartRef {
    pub component: ComponentKind,
    pub index: usize,
}

/// Output of pass 2.
#[derive(Debug)]
pub struct Assembly {
    pub components: Components,
    /// Per rank, the parts in textual order with includes expanded. Logic
    /// blocks are evaluated over this order.
    pub order: Vec<Vec<PartRef>>,
    pub warnings: Vec<Warning>,
}

pub fn assemble(store: &RawFileStore, factory: &PartFactory) -> Assembly {
    let mut components = Components::default();
    let mut order = vec![Vec::new(); Category::RANKS];
    let mut warnings = Vec::new();
    let mut domain_count = 0usize;

    for (rank, rank_order) in order.iter_mut().enumerate() {
        let mut in_1d = false;
        let mut logic_stack: Vec<LogicType> = Vec::new();
        let mut active_domain: Option<String> = None;

        for (file_id, file, line) in store.stream(rank) {
            let mut part = match factory.create_part(line, &file.path, file.category) {
                Ok(part) => part,
                Err(warning) => {
                    warnings.push(warning);
                    continue;
                }
            };
            part.origin = file_id;

            part.logic = match &part.kind {
                PartKind::Logic {
                    term: LogicTerm::If,
                    logic_type,
                } => {
                    logic_stack.push(logic_type.unwrap_or(LogicType::Scenario));
                    logic_stack.last().copied()
                }
                PartKind::Logic {
                    term: LogicTerm::EndIf,
                    ..
                } => {
                    let top = logic_stack.last().copied();
                    logic_stack.pop();
                    top
                }
                _ => logic_stack.last().copied(),
            };

            // Domain markers themselves stay with the 2D control parts.
            let mut kind = ComponentKind::for_category(file.category);
            match &part.kind {
                PartKind::Domain(DomainEdge::Start1D) => in_1d = true,
                PartKind::Domain(DomainEdge::End1D) => in_1d = false,
                _ if in_1d && file.category == Category::Control => {
                    kind = ComponentKind::Control1D;
                }
                _ => {}
            }

            if kind == ComponentKind::Control2D {
                match &part.kind {
                    PartKind::Domain(DomainEdge::Start2D { name }) => {
                        domain_count += 1;
                        active_domain = Some(
                            name.clone()
                                .unwrap_or_else(|| format!("domain_{}", domain_count)),
                        );
                        part.domain = active_domain.clone();
                    }
                    PartKind::Domain(DomainEdge::End2D) => part.domain = active_domain.take(),
                    _ => part.domain = active_domain.clone(),
                }
            }

            let component = components.get_mut(kind);
            rank_order.push(PartRef {
                component: kind,
                index: component.len(),
            });
            component.push(part);
        }
    }

    info!(
        control_1d = components.control_1d.len(),
        control_2d = components.control_2d.len(),
        geometry = components.geometry.len(),
        boundary = components.boundary.len(),
        "assembled components"
    );
    Assembly {
        components,
        order,
        warnings,
    }
}
